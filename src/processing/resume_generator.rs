//! ATS-friendly resume regeneration
//!
//! Renders a [`StructuredResume`] into a single-column PDF and, in the same
//! pass, builds the plain-text transcript that the scorer sees. Both outputs
//! share one section order so the re-score reflects the document.

use crate::config::LayoutConfig;
use crate::error::Result;
use crate::processing::document::StructuredResume;
use crate::processing::layout::{PageWriter, Tone};
use log::{debug, info};
use regex::{Captures, Regex};
use std::sync::OnceLock;

const NAME_SIZE: f32 = 18.0;
const HEADER_SIZE: f32 = 14.0;
const BODY_SIZE: f32 = 11.0;
const DETAIL_SIZE: f32 = 10.0;

const HEADER_GAP_MM: f32 = 8.0;
const HEADER_RESERVE_MM: f32 = 20.0;
const ENTRY_GAP_MM: f32 = 3.0;
const EXPERIENCE_GAP_MM: f32 = 5.0;

const FIELD_SEPARATOR: &str = " | ";
const SKILLS_FALLBACK: &str = "technology and development";

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// The rendered PDF and its transcript.
#[derive(Debug, Clone)]
pub struct GeneratedResume {
    pub file_name: String,
    pub document: Vec<u8>,
    pub text: String,
    pub page_count: usize,
}

pub struct ResumeGenerator {
    layout: LayoutConfig,
}

impl Default for ResumeGenerator {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

/// Writes each block to the PDF and the transcript together.
struct Renderer {
    page: PageWriter,
    transcript: String,
}

impl Renderer {
    fn text(&mut self, text: &str, size: f32, bold: bool, tone: Tone) {
        self.page.add_text(text, size, bold, tone);
    }

    fn line(&mut self, line: &str) {
        self.transcript.push_str(line);
        self.transcript.push('\n');
    }

    fn blank(&mut self) {
        self.transcript.push('\n');
    }

    fn section(&mut self, title: &str) {
        self.page.advance(HEADER_GAP_MM);
        self.page.ensure_room(HEADER_RESERVE_MM);

        self.transcript.push_str("\n\n");
        self.line(title);

        self.page.add_text(title, HEADER_SIZE, true, Tone::Primary);
        self.page.add_rule(2.0);
        self.page.advance(5.0);
    }
}

impl ResumeGenerator {
    pub fn new(layout: LayoutConfig) -> Self {
        Self { layout }
    }

    pub fn generate(&self, data: &StructuredResume, file_name: &str) -> Result<GeneratedResume> {
        let title = match data.personal_info.name.trim() {
            "" => "Resume",
            name => name,
        };

        let mut out = Renderer {
            page: PageWriter::new(title, &self.layout)?,
            transcript: String::new(),
        };

        render_contact(&mut out, data);
        render_summary(&mut out, data);
        render_education(&mut out, data);
        render_experience(&mut out, data);
        render_skills(&mut out, data);
        render_projects(&mut out, data);
        render_certifications(&mut out, data);
        render_achievements(&mut out, data);

        let page_count = out.page.page_count();
        let text = optimize_transcript(&out.transcript);
        let document = out.page.finish()?;

        info!(
            "Generated {} ({} page(s), {} bytes)",
            file_name,
            page_count,
            document.len()
        );
        debug!("Transcript has {} words", text.split_whitespace().count());

        Ok(GeneratedResume {
            file_name: file_name.to_string(),
            document,
            text,
            page_count,
        })
    }
}

fn filled(value: &str) -> bool {
    !value.trim().is_empty()
}

fn join_filled<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    parts
        .into_iter()
        .filter(|p| filled(p))
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(FIELD_SEPARATOR)
}

fn render_contact(out: &mut Renderer, data: &StructuredResume) {
    let info = &data.personal_info;

    if filled(&info.name) {
        let name = info.name.trim().to_uppercase();
        out.line(&name);
        out.line("CONTACT INFORMATION");
        out.text(&name, NAME_SIZE, true, Tone::Primary);
    }

    let fields = [
        ("Email", &info.email),
        ("Phone", &info.phone),
        ("LinkedIn", &info.linked_in),
        ("Website", &info.website),
        ("Address", &info.address),
    ];

    let mut contact = Vec::new();
    for (label, value) in fields {
        if filled(value) {
            out.line(&format!("{}: {}", label, value.trim()));
            contact.push(value.trim());
        }
    }

    if !contact.is_empty() {
        out.text(&contact.join(FIELD_SEPARATOR), DETAIL_SIZE, false, Tone::Muted);
        out.blank();
    }

    out.page.advance(HEADER_GAP_MM);
}

/// Boilerplate summary used when the resume has a name but no summary.
pub fn synthesized_summary(skills: &[&str]) -> String {
    let focus = if skills.is_empty() {
        SKILLS_FALLBACK.to_string()
    } else {
        skills.iter().take(3).copied().collect::<Vec<_>>().join(", ")
    };

    format!(
        "Experienced professional with a strong background in {}. Skilled in problem-solving, collaboration, and delivering high-quality results. Demonstrated ability to work effectively in team environments and meet project deadlines. Seeking opportunities to leverage expertise and contribute to innovative projects.",
        focus
    )
}

fn render_summary(out: &mut Renderer, data: &StructuredResume) {
    let summary = if filled(&data.summary) {
        data.summary.trim().to_string()
    } else if filled(&data.personal_info.name) {
        synthesized_summary(&data.listed_skills())
    } else {
        return;
    };

    out.section("PROFESSIONAL SUMMARY");
    out.line(&summary);
    out.text(&summary, BODY_SIZE, false, Tone::Primary);
}

fn render_education(out: &mut Renderer, data: &StructuredResume) {
    if !data.education.first().is_some_and(|e| filled(&e.degree)) {
        return;
    }

    out.section("EDUCATION");
    for edu in data.education.iter().filter(|e| filled(&e.degree)) {
        let heading = join_filled([edu.degree.as_str(), edu.institution.as_str(), edu.location.as_str()]);
        out.line(&heading);
        out.text(&heading, BODY_SIZE, true, Tone::Primary);

        let mut details = Vec::new();
        if filled(&edu.date) {
            let date = normalize_date(&edu.date);
            out.line(&date);
            details.push(date);
        }
        if filled(&edu.gpa) {
            let gpa = format!("GPA: {}", edu.gpa.trim());
            out.line(&gpa);
            details.push(gpa);
        }
        if !details.is_empty() {
            out.text(&details.join(FIELD_SEPARATOR), DETAIL_SIZE, false, Tone::Muted);
        }

        out.blank();
        out.page.advance(ENTRY_GAP_MM);
    }
}

fn render_experience(out: &mut Renderer, data: &StructuredResume) {
    if !data.experience.first().is_some_and(|e| filled(&e.title)) {
        return;
    }

    out.section("PROFESSIONAL EXPERIENCE");
    for exp in data.experience.iter().filter(|e| filled(&e.title)) {
        let heading = join_filled([exp.title.as_str(), exp.company.as_str(), exp.location.as_str()]);
        out.line(&heading);
        out.text(&heading, BODY_SIZE, true, Tone::Primary);

        if filled(&exp.date) {
            let date = normalize_date(&exp.date);
            out.line(&date);
            out.text(&date, DETAIL_SIZE, false, Tone::Muted);
        }

        for detail in exp.description.iter().filter(|d| filled(d)) {
            let bullet = format!("• {}", capitalize_first(detail.trim()));
            out.line(&bullet);
            out.text(&bullet, DETAIL_SIZE, false, Tone::Primary);
        }

        out.blank();
        out.page.advance(EXPERIENCE_GAP_MM);
    }
}

fn render_skills(out: &mut Renderer, data: &StructuredResume) {
    if !data.skills.first().is_some_and(|s| filled(s)) {
        return;
    }

    out.section("SKILLS");
    let skills = data.listed_skills().join(", ");
    out.line(&skills);
    out.text(&skills, BODY_SIZE, false, Tone::Primary);
}

fn render_projects(out: &mut Renderer, data: &StructuredResume) {
    if !data.projects.first().is_some_and(|p| filled(&p.name)) {
        return;
    }

    out.section("PROJECTS");
    for project in data.projects.iter().filter(|p| filled(&p.name)) {
        let heading = join_filled([project.name.as_str(), project.technologies.as_str()]);
        out.line(&heading);
        out.text(&heading, BODY_SIZE, true, Tone::Primary);

        if filled(&project.date) {
            let date = normalize_date(&project.date);
            out.line(&date);
            out.text(&date, DETAIL_SIZE, false, Tone::Muted);
        }
        if filled(&project.description) {
            let description = project.description.trim();
            out.line(description);
            out.text(description, DETAIL_SIZE, false, Tone::Primary);
        }

        out.blank();
        out.page.advance(ENTRY_GAP_MM);
    }
}

fn render_certifications(out: &mut Renderer, data: &StructuredResume) {
    if !data.certifications.first().is_some_and(|c| filled(&c.name)) {
        return;
    }

    out.section("CERTIFICATIONS");
    for cert in data.certifications.iter().filter(|c| filled(&c.name)) {
        let heading = join_filled([cert.name.as_str(), cert.issuer.as_str()]);
        out.line(&heading);
        out.text(&heading, BODY_SIZE, true, Tone::Primary);

        let mut details = Vec::new();
        if filled(&cert.date) {
            let date = normalize_date(&cert.date);
            out.line(&date);
            details.push(date);
        }
        if filled(&cert.credential_id) {
            let credential = format!("Credential ID: {}", cert.credential_id.trim());
            out.line(&credential);
            details.push(credential);
        }
        if !details.is_empty() {
            out.text(&details.join(FIELD_SEPARATOR), DETAIL_SIZE, false, Tone::Muted);
        }

        out.blank();
        out.page.advance(ENTRY_GAP_MM);
    }
}

fn render_achievements(out: &mut Renderer, data: &StructuredResume) {
    if !data.achievements.first().is_some_and(|a| filled(&a.description)) {
        return;
    }

    out.section("ACHIEVEMENTS");
    for achievement in data.achievements.iter().filter(|a| filled(&a.description)) {
        let bullet = format!("• {}", achievement.description.trim());
        out.line(&bullet);
        out.text(&bullet, DETAIL_SIZE, false, Tone::Primary);
    }
    out.blank();
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

struct DatePatterns {
    day_month_year: Regex,
    month_year: Regex,
    month_name_year: Regex,
}

fn date_patterns() -> &'static DatePatterns {
    static PATTERNS: OnceLock<DatePatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| DatePatterns {
        day_month_year: Regex::new(r"\b(\d{1,2})[/.-](\d{1,2})[/.-](\d{4}|\d{2})\b")
            .expect("Invalid numeric date regex"),
        month_year: Regex::new(r"\b(\d{1,2})[/.-](\d{4})\b").expect("Invalid month/year regex"),
        month_name_year: Regex::new(
            r"(?i)\b(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+(?:\d{1,2},?\s+)?(\d{4})\b",
        )
        .expect("Invalid month name regex"),
    })
}

fn expand_year(year: &str) -> String {
    if year.len() != 2 {
        return year.to_string();
    }
    match year.parse::<u32>() {
        Ok(y) if y > 50 => format!("19{}", year),
        _ => format!("20{}", year),
    }
}

fn month_year(month: u32, year: &str) -> Option<String> {
    (1..=12)
        .contains(&month)
        .then(|| format!("{:02}/{}", month, expand_year(year)))
}

/// Rewrite every recognisable date in `date` as `MM/YYYY`.
///
/// Numeric dates are read month-first unless the first component cannot be
/// a month. Unrecognised text, including "Present", passes through.
pub fn normalize_date(date: &str) -> String {
    let patterns = date_patterns();
    let date = date.trim();

    let date = patterns.day_month_year.replace_all(date, |caps: &Captures| {
        let first: u32 = caps[1].parse().unwrap_or(0);
        let second: u32 = caps[2].parse().unwrap_or(0);
        let month = if first > 12 && second <= 12 { second } else { first };
        month_year(month, &caps[3]).unwrap_or_else(|| caps[0].to_string())
    });

    let date = patterns.month_year.replace_all(&date, |caps: &Captures| {
        let month: u32 = caps[1].parse().unwrap_or(0);
        month_year(month, &caps[2]).unwrap_or_else(|| caps[0].to_string())
    });

    let date = patterns.month_name_year.replace_all(&date, |caps: &Captures| {
        let prefix = caps[1].to_lowercase();
        MONTHS
            .iter()
            .position(|m| *m == prefix)
            .and_then(|i| month_year(i as u32 + 1, &caps[2]))
            .unwrap_or_else(|| caps[0].to_string())
    });

    date.into_owned()
}

/// Final clean-up of a generated transcript.
pub fn optimize_transcript(text: &str) -> String {
    static BLANK_RUNS: OnceLock<Regex> = OnceLock::new();
    static BULLETS: OnceLock<Regex> = OnceLock::new();

    let blank_runs = BLANK_RUNS.get_or_init(|| Regex::new(r"\n{3,}").expect("Invalid blank line regex"));
    let bullets = BULLETS.get_or_init(|| Regex::new(r"(?m)^[-*]\s+").expect("Invalid bullet regex"));

    let collapsed = blank_runs.replace_all(text, "\n\n");
    bullets.replace_all(collapsed.trim(), "• ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::document::{Certification, Education, Experience, Project};

    fn sample() -> StructuredResume {
        let mut data = StructuredResume::empty();
        data.personal_info.name = "Jane Doe".to_string();
        data.personal_info.email = "jane@example.com".to_string();
        data.personal_info.phone = "555-123-4567".to_string();
        data.education = vec![Education {
            degree: "B.Tech Computer Science".to_string(),
            institution: "State University".to_string(),
            location: String::new(),
            date: "May 2018".to_string(),
            gpa: "8.7".to_string(),
        }];
        data.experience = vec![Experience {
            title: "Software Engineer".to_string(),
            company: "Acme".to_string(),
            location: "Remote".to_string(),
            date: "15/06/2018 - Present".to_string(),
            description: vec!["developed billing APIs".to_string(), "  ".to_string()],
        }];
        data.skills = vec!["Rust".to_string(), "SQL".to_string()];
        data.projects = vec![Project {
            name: "Checker".to_string(),
            description: "Scores resumes".to_string(),
            technologies: "Rust".to_string(),
            date: String::new(),
        }];
        data.certifications = vec![Certification {
            name: "AWS SA".to_string(),
            issuer: "Amazon".to_string(),
            date: "Mar 2021".to_string(),
            credential_id: "X-1".to_string(),
        }];
        data
    }

    #[test]
    fn test_normalize_date_forms() {
        assert_eq!(normalize_date("May 2018"), "05/2018");
        assert_eq!(normalize_date("September 3, 2019"), "09/2019");
        assert_eq!(normalize_date("06/15/2020"), "06/2020");
        assert_eq!(normalize_date("15.06.2020"), "06/2020");
        assert_eq!(normalize_date("1-2-99"), "01/1999");
        assert_eq!(normalize_date("3/2021"), "03/2021");
        assert_eq!(normalize_date("Jan 2020 - Present"), "01/2020 - Present");
        assert_eq!(normalize_date("2016 - 2020"), "2016 - 2020");
        assert_eq!(normalize_date("Summer internship"), "Summer internship");
    }

    #[test]
    fn test_optimize_transcript() {
        let raw = "\n\nSKILLS\n\n\n\n- Rust\n* SQL\n\n";
        assert_eq!(optimize_transcript(raw), "SKILLS\n\n• Rust\n• SQL");
    }

    #[test]
    fn test_transcript_sections_in_order() {
        let generated = ResumeGenerator::default().generate(&sample(), "Jane_Doe_ATS_Resume.pdf").unwrap();
        let text = &generated.text;

        assert!(text.starts_with("JANE DOE\nCONTACT INFORMATION\nEmail: jane@example.com\nPhone: 555-123-4567"));
        let order = [
            "PROFESSIONAL SUMMARY",
            "EDUCATION",
            "PROFESSIONAL EXPERIENCE",
            "SKILLS",
            "PROJECTS",
            "CERTIFICATIONS",
        ];
        let positions: Vec<usize> = order.iter().map(|h| text.find(h).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));

        assert!(text.contains("B.Tech Computer Science | State University\n05/2018\nGPA: 8.7"));
        assert!(text.contains("Software Engineer | Acme | Remote\n06/2018 - Present\n• Developed billing APIs"));
        assert!(text.contains("Rust, SQL"));
        assert!(text.contains("Checker | Rust\nScores resumes"));
        assert!(text.contains("AWS SA | Amazon\n03/2021\nCredential ID: X-1"));
        assert!(!text.contains("ACHIEVEMENTS"));
        assert!(!text.contains("\n\n\n"));
        assert_eq!(generated.file_name, "Jane_Doe_ATS_Resume.pdf");
        assert!(generated.document.starts_with(b"%PDF"));
        assert_eq!(generated.page_count, 1);
    }

    #[test]
    fn test_summary_synthesized_from_skills() {
        let generated = ResumeGenerator::default().generate(&sample(), "r.pdf").unwrap();
        assert!(generated
            .text
            .contains("Experienced professional with a strong background in Rust, SQL."));

        assert!(synthesized_summary(&[]).contains("background in technology and development."));
    }

    #[test]
    fn test_blank_resume_renders_nothing() {
        let generated = ResumeGenerator::default()
            .generate(&StructuredResume::empty(), "r.pdf")
            .unwrap();
        assert_eq!(generated.text, "");
        assert_eq!(generated.page_count, 1);
    }

    #[test]
    fn test_section_skipped_when_first_entry_blank() {
        let mut data = sample();
        data.education.insert(0, Education::default());
        let generated = ResumeGenerator::default().generate(&data, "r.pdf").unwrap();
        assert!(!generated.text.contains("EDUCATION"));
    }

    #[test]
    fn test_long_resume_paginates() {
        let mut data = sample();
        data.experience[0].description = (0..120)
            .map(|i| format!("Delivered improvement number {} across the platform", i))
            .collect();
        let generated = ResumeGenerator::default().generate(&data, "r.pdf").unwrap();
        assert!(generated.page_count > 1);
    }
}
