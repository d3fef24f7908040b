//! Heuristic resume parser
//!
//! Turns extracted resume text into a [`StructuredResume`] that can be edited
//! and regenerated. Every section heuristic is a separate pure method so it
//! can be pinned down with example-based tests. Parsing never fails: the
//! worst case is an all-blank resume.

use crate::processing::document::{
    Achievement, Certification, Education, Experience, PersonalInfo, Project, StructuredResume,
};
use crate::processing::patterns::{KeywordSet, Patterns};
use log::debug;
use regex::Regex;

pub const EDUCATION_HEADERS: &[&str] = &["education", "academic background", "educational background"];
pub const EXPERIENCE_HEADERS: &[&str] = &[
    "experience",
    "work experience",
    "employment",
    "professional experience",
    "career",
];
pub const SKILLS_HEADERS: &[&str] = &["skills", "technical skills", "core competencies", "competencies"];
pub const PROJECTS_HEADERS: &[&str] = &["projects", "project experience", "project"];
pub const CERTIFICATIONS_HEADERS: &[&str] = &["certifications", "certificates", "certificate"];
pub const ACHIEVEMENTS_HEADERS: &[&str] = &["achievements", "accomplishments", "awards", "honors"];
pub const SUMMARY_HEADERS: &[&str] = &["objective", "summary", "professional summary", "profile", "about"];

/// Keywords that close whichever section is currently open.
pub const SECTION_TERMINATORS: &[&str] = &[
    "education",
    "experience",
    "skills",
    "projects",
    "certifications",
    "achievements",
    "awards",
    "objective",
    "summary",
];

/// Used when no skills section exists.
pub const COMMON_SKILLS: &[&str] = &[
    "javascript", "python", "java", "react", "node", "sql", "html", "css", "mongodb", "express",
];

/// Lines at least this long are never treated as section headers.
pub const HEADER_MAX_CHARS: usize = 50;
pub const SUMMARY_MAX_LINES: usize = 3;

const FIELD_SEPARATOR: &str = " | ";

pub struct ResumeParser {
    patterns: Patterns,
    terminators: KeywordSet,
    fallback_skills: KeywordSet,
    degree: Regex,
    gpa: Regex,
    job_title: Regex,
    bullet: Regex,
    technologies: Regex,
    credential: Regex,
    skill_label: Regex,
}

impl Default for ResumeParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ResumeParser {
    pub fn new() -> Self {
        Self {
            patterns: Patterns::new(),
            terminators: KeywordSet::new(SECTION_TERMINATORS),
            fallback_skills: KeywordSet::new(COMMON_SKILLS),
            degree: Regex::new(
                r"(?i)\b(?:bachelor|master|phd|ph\.d|doctorate|diploma|degree|b\.?tech|m\.?tech|b\.e|m\.e|b\.?sc|m\.?sc)\b",
            )
            .expect("Invalid degree regex"),
            gpa: Regex::new(r"(?i)\b(?:gpa|cgpa|grade)\s*:?\s*(\d+(?:\.\d+)?)").expect("Invalid GPA regex"),
            job_title: Regex::new(
                r"(?i)\b(?:developer|engineer|intern|manager|analyst|designer|consultant|specialist|assistant|lead|senior|junior)\b",
            )
            .expect("Invalid job title regex"),
            bullet: Regex::new(r"^\s*(?:[•*\-]\s*|\d+\.\s+)").expect("Invalid bullet regex"),
            technologies: Regex::new(r"(?i)^\s*(?:technologies|tech stack|tools|built with)\s*:\s*(.+)$")
                .expect("Invalid technologies regex"),
            credential: Regex::new(r"(?i)^\s*credential\s*id\s*:?\s*(.+)$").expect("Invalid credential regex"),
            skill_label: Regex::new(r"^[A-Za-z &/]{2,30}:\s*").expect("Invalid skill label regex"),
        }
    }

    pub fn parse(&self, text: &str) -> StructuredResume {
        if text.trim().is_empty() {
            return StructuredResume::empty();
        }

        let personal_info = PersonalInfo {
            name: self.extract_name(text),
            email: first_match(&self.patterns.email, text),
            phone: first_match(&self.patterns.phone, text),
            linked_in: first_match(&self.patterns.linkedin, text),
            website: self.patterns.find_website(text).unwrap_or_default().to_string(),
            address: self.extract_address(text),
        };

        let skills_section = self.extract_section(text, SKILLS_HEADERS);

        let mut resume = StructuredResume {
            personal_info,
            summary: self.parse_summary(&self.extract_section(text, SUMMARY_HEADERS)),
            education: self.parse_education(&self.extract_section(text, EDUCATION_HEADERS)),
            experience: self.parse_experience(&self.extract_section(text, EXPERIENCE_HEADERS)),
            skills: self.parse_skills(&skills_section, text),
            projects: self.parse_projects(&self.extract_section(text, PROJECTS_HEADERS)),
            certifications: self
                .parse_certifications(&self.extract_section(text, CERTIFICATIONS_HEADERS)),
            achievements: self.parse_achievements(&self.extract_section(text, ACHIEVEMENTS_HEADERS)),
        };
        resume.ensure_rows();

        debug!(
            "Parsed resume: {} education, {} experience, {} skills, {} projects",
            resume.education.len(),
            resume.experience.len(),
            resume.skills.len(),
            resume.projects.len()
        );
        resume
    }

    /// First non-empty line, kept only if it reads like a person's name.
    pub fn extract_name(&self, text: &str) -> String {
        let Some(first) = text.lines().map(str::trim).find(|l| !l.is_empty()) else {
            return String::new();
        };

        let looks_like_name = first.chars().count() < HEADER_MAX_CHARS
            && first.chars().any(char::is_alphabetic)
            && first
                .chars()
                .all(|c| c.is_alphabetic() || c.is_whitespace() || matches!(c, '.' | '-' | '\''));

        if looks_like_name {
            first.to_string()
        } else {
            String::new()
        }
    }

    pub fn extract_address(&self, text: &str) -> String {
        first_match(&self.patterns.address, text)
    }

    /// Lines between the first short line containing one of `headers` and
    /// the next short line containing a section keyword. Empty when no
    /// header is found.
    pub fn extract_section(&self, text: &str, headers: &[&str]) -> String {
        let lines: Vec<&str> = text.lines().collect();
        let is_header_line = |line: &str| line.trim().chars().count() < HEADER_MAX_CHARS;

        let start = lines.iter().position(|line| {
            let lower = line.trim().to_lowercase();
            is_header_line(line) && headers.iter().any(|h| lower.contains(h))
        });
        let Some(start) = start.map(|i| i + 1) else {
            return String::new();
        };

        let end = lines[start..]
            .iter()
            .position(|line| is_header_line(line) && self.terminators.any_in(line))
            .map(|offset| start + offset)
            .unwrap_or(lines.len());

        lines[start..end].join("\n")
    }

    pub fn parse_summary(&self, section: &str) -> String {
        non_blank_lines(section)
            .take(SUMMARY_MAX_LINES)
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string()
    }

    pub fn parse_education(&self, section: &str) -> Vec<Education> {
        let mut entries = Vec::new();
        let mut current: Option<Education> = None;

        for line in non_blank_lines(section) {
            if self.degree.is_match(line) {
                entries.extend(current.take());
                let mut parts = split_fields(line);
                current = Some(Education {
                    degree: parts.next().unwrap_or_default(),
                    institution: parts.next().unwrap_or_default(),
                    location: parts.next().unwrap_or_default(),
                    ..Education::default()
                });
                continue;
            }

            let Some(entry) = current.as_mut() else {
                continue;
            };

            let date = self.patterns.entry_date.find(line);
            let gpa = self.gpa.captures(line);

            if date.is_none() && gpa.is_none() {
                if entry.institution.is_empty() && line.chars().count() > 5 {
                    let mut parts = split_fields(line);
                    entry.institution = parts.next().unwrap_or_default();
                    if entry.location.is_empty() {
                        entry.location = parts.next().unwrap_or_default();
                    }
                }
                continue;
            }

            if let Some(date) = date {
                entry.date = date.as_str().to_string();
            }
            if let Some(caps) = gpa {
                entry.gpa = caps[1].to_string();
            }
        }

        entries.extend(current);
        or_blank(entries)
    }

    pub fn parse_experience(&self, section: &str) -> Vec<Experience> {
        let mut entries = Vec::new();
        let mut current: Option<Experience> = None;

        for line in non_blank_lines(section) {
            let is_bullet = self.is_bullet(line);

            if let Some(entry) = current.as_mut() {
                if is_bullet {
                    let detail = self.strip_bullet(line);
                    if !detail.is_empty() {
                        entry.description.push(detail);
                    }
                    continue;
                }
            }

            if self.job_title.is_match(line) && line.chars().count() < 100 {
                entries.extend(current.take());
                let mut parts = split_fields(line);
                current = Some(Experience {
                    title: parts.next().unwrap_or_default(),
                    company: parts.next().unwrap_or_default(),
                    location: parts.next().unwrap_or_default(),
                    date: String::new(),
                    description: Vec::new(),
                });
                continue;
            }

            let Some(entry) = current.as_mut() else {
                continue;
            };

            if let Some(date) = self.patterns.entry_date.find(line) {
                entry.date = date.as_str().to_string();
                let rest = trim_separators(&format!("{}{}", &line[..date.start()], &line[date.end()..]));
                if entry.company.is_empty() && rest.chars().count() > 3 {
                    entry.company = rest;
                }
            } else if entry.company.is_empty() && line.chars().count() > 3 && line.chars().count() < 100 {
                let mut parts = split_fields(line);
                entry.company = parts.next().unwrap_or_default();
                if entry.location.is_empty() {
                    entry.location = parts.next().unwrap_or_default();
                }
            } else if line.chars().count() > 3 {
                entry.description.push(line.to_string());
            }
        }

        entries.extend(current);
        for entry in entries.iter_mut() {
            if entry.description.is_empty() {
                entry.description.push(String::new());
            }
        }
        or_blank(entries)
    }

    /// Tokens of the skills section; common technology names from the
    /// whole document when there is no section.
    pub fn parse_skills(&self, section: &str, full_text: &str) -> Vec<String> {
        if section.trim().is_empty() {
            let found: Vec<String> = self
                .fallback_skills
                .present_in(full_text)
                .into_iter()
                .map(String::from)
                .collect();
            return or_blank(found);
        }

        let skills: Vec<String> = section
            .split(|c| matches!(c, ',' | ';' | '|' | '•' | '-' | '\n'))
            .map(|token| self.strip_bullet(token))
            .map(|token| self.skill_label.replace(&token, "").trim().to_string())
            .filter(|token| !token.is_empty() && token.chars().count() < HEADER_MAX_CHARS)
            .collect();

        or_blank(skills)
    }

    pub fn parse_projects(&self, section: &str) -> Vec<Project> {
        let mut entries = Vec::new();
        let mut current: Option<Project> = None;

        for line in non_blank_lines(section) {
            let is_bullet = self.is_bullet(line);

            if let Some(entry) = current.as_mut() {
                if let Some(caps) = self.technologies.captures(line) {
                    entry.technologies = caps[1].trim().to_string();
                    continue;
                }
                if is_bullet {
                    append_sentence(&mut entry.description, &self.strip_bullet(line));
                    continue;
                }
                if let Some(date) = self.patterns.entry_date.find(line) {
                    let rest = format!("{}{}", &line[..date.start()], &line[date.end()..]);
                    if trim_separators(&rest).is_empty() {
                        entry.date = date.as_str().to_string();
                        continue;
                    }
                }
            }

            let length = line.chars().count();
            if !is_bullet && length > 5 && length < 100 {
                entries.extend(current.take());
                let mut parts = split_fields(line);
                current = Some(Project {
                    name: parts.next().unwrap_or_default(),
                    technologies: parts.collect::<Vec<_>>().join(", "),
                    ..Project::default()
                });
            } else if let Some(entry) = current.as_mut() {
                append_sentence(&mut entry.description, line);
            }
        }

        entries.extend(current);
        or_blank(entries)
    }

    pub fn parse_certifications(&self, section: &str) -> Vec<Certification> {
        let mut entries: Vec<Certification> = Vec::new();

        for line in non_blank_lines(section) {
            if let Some(caps) = self.credential.captures(line) {
                if let Some(last) = entries.last_mut() {
                    last.credential_id = caps[1].trim().to_string();
                }
                continue;
            }

            let line = self.strip_bullet(line);
            let date = self.patterns.entry_date.find(&line);
            let rest = match date {
                Some(m) => trim_separators(&format!("{}{}", &line[..m.start()], &line[m.end()..])),
                None => line.clone(),
            };

            if rest.chars().count() <= 5 {
                // a date line belongs to the certification above it
                if let (Some(date), Some(last)) = (date, entries.last_mut()) {
                    last.date = date.as_str().to_string();
                }
                continue;
            }

            let (name, issuer) = split_issuer(&rest);
            entries.push(Certification {
                name,
                issuer,
                date: date.map(|m| m.as_str().to_string()).unwrap_or_default(),
                credential_id: String::new(),
            });
        }

        or_blank(entries)
    }

    pub fn parse_achievements(&self, section: &str) -> Vec<Achievement> {
        let achievements: Vec<Achievement> = section
            .split(|c| matches!(c, '•' | '\n'))
            .map(|item| self.strip_bullet(item))
            .filter(|item| !item.is_empty())
            .map(|description| Achievement { description })
            .collect();

        or_blank(achievements)
    }

    fn is_bullet(&self, line: &str) -> bool {
        self.bullet.find(line).is_some_and(|m| !m.as_str().trim().is_empty())
    }

    fn strip_bullet(&self, line: &str) -> String {
        self.bullet.replace(line, "").trim().to_string()
    }
}

fn first_match(pattern: &Regex, text: &str) -> String {
    pattern
        .find(text)
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

fn non_blank_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|line| !line.is_empty())
}

/// Split a `a | b | c` line into trimmed, non-empty fields.
fn split_fields(line: &str) -> impl Iterator<Item = String> + '_ {
    line.split(FIELD_SEPARATOR)
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .map(String::from)
}

fn split_issuer(line: &str) -> (String, String) {
    for separator in [FIELD_SEPARATOR, " - ", " – "] {
        if let Some((name, issuer)) = line.split_once(separator) {
            return (name.trim().to_string(), issuer.trim().to_string());
        }
    }
    (line.trim().to_string(), String::new())
}

fn trim_separators(text: &str) -> String {
    text.trim_matches(|c: char| c.is_whitespace() || matches!(c, '|' | ',' | '-' | '–' | '(' | ')'))
        .to_string()
}

fn append_sentence(target: &mut String, sentence: &str) {
    if sentence.is_empty() {
        return;
    }
    if !target.is_empty() {
        target.push(' ');
    }
    target.push_str(sentence);
}

fn or_blank<T: Default>(mut rows: Vec<T>) -> Vec<T> {
    if rows.is_empty() {
        rows.push(T::default());
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME: &str = "Jane Doe
jane.doe@example.com | 555-123-4567 | linkedin.com/in/janedoe | https://janedoe.dev
42 Maple Street

SUMMARY
Backend engineer focused on data pipelines.
Enjoys mentoring.

EDUCATION
B.Tech in Computer Science
State University | Pune
May 2018
CGPA: 8.7

WORK EXPERIENCE
Software Engineer
Acme Corp
Jun 2018 - Present
- developed billing services
- Led migration to Rust

SKILLS
Rust, Python, SQL
- Docker

PROJECTS
Resume Checker
Technologies: Rust, Tokio
- Scores resumes for ATS compatibility
06/2021

CERTIFICATIONS
AWS Solutions Architect | Amazon
Credential ID: ABC-123

ACHIEVEMENTS
- Won hackathon 2019
- Dean's list";

    #[test]
    fn test_contact_extraction() {
        let parser = ResumeParser::new();
        let data = parser.parse("Reach me at jane.doe@example.com or 555-123-4567");
        assert_eq!(data.personal_info.email, "jane.doe@example.com");
        assert!(!data.personal_info.phone.is_empty());
    }

    #[test]
    fn test_full_parse() {
        let data = ResumeParser::new().parse(RESUME);

        assert_eq!(data.personal_info.name, "Jane Doe");
        assert_eq!(data.personal_info.email, "jane.doe@example.com");
        assert_eq!(data.personal_info.phone, "555-123-4567");
        assert_eq!(data.personal_info.linked_in, "linkedin.com/in/janedoe");
        assert_eq!(data.personal_info.website, "https://janedoe.dev");
        assert_eq!(data.personal_info.address, "42 Maple Street");
        assert_eq!(data.summary, "Backend engineer focused on data pipelines. Enjoys mentoring.");

        let edu = &data.education[0];
        assert_eq!(edu.degree, "B.Tech in Computer Science");
        assert_eq!(edu.institution, "State University");
        assert_eq!(edu.location, "Pune");
        assert_eq!(edu.date, "May 2018");
        assert_eq!(edu.gpa, "8.7");

        let exp = &data.experience[0];
        assert_eq!(exp.title, "Software Engineer");
        assert_eq!(exp.company, "Acme Corp");
        assert_eq!(exp.date, "Jun 2018 - Present");
        assert_eq!(exp.description, vec!["developed billing services", "Led migration to Rust"]);

        assert_eq!(data.skills, vec!["Rust", "Python", "SQL", "Docker"]);

        let project = &data.projects[0];
        assert_eq!(project.name, "Resume Checker");
        assert_eq!(project.technologies, "Rust, Tokio");
        assert_eq!(project.description, "Scores resumes for ATS compatibility");
        assert_eq!(project.date, "06/2021");

        let cert = &data.certifications[0];
        assert_eq!(cert.name, "AWS Solutions Architect");
        assert_eq!(cert.issuer, "Amazon");
        assert_eq!(cert.credential_id, "ABC-123");

        assert_eq!(data.achievements.len(), 2);
        assert_eq!(data.achievements[1].description, "Dean's list");
    }

    #[test]
    fn test_every_list_has_a_row() {
        let parser = ResumeParser::new();
        for text in ["x", "Just one line of text", "12345", RESUME, "EDUCATION\n\nSKILLS"] {
            let data = parser.parse(text);
            assert!(!data.education.is_empty());
            assert!(!data.experience.is_empty());
            assert!(!data.projects.is_empty());
            assert!(!data.certifications.is_empty());
            assert!(!data.achievements.is_empty());
            assert!(!data.skills.is_empty());
            assert!(data.experience.iter().all(|e| !e.description.is_empty()));
        }
    }

    #[test]
    fn test_empty_text_gives_empty_resume() {
        assert_eq!(ResumeParser::new().parse("  \n "), StructuredResume::empty());
    }

    #[test]
    fn test_extract_name_rejects_contact_lines() {
        let parser = ResumeParser::new();
        assert_eq!(parser.extract_name("\n  Mary-Jane O'Neil \nEngineer"), "Mary-Jane O'Neil");
        assert_eq!(parser.extract_name("Email: a@b.com\nJane"), "");
        assert_eq!(parser.extract_name("Call 555 123 4567"), "");
        assert_eq!(
            parser.extract_name("A very long opening sentence that is clearly a summary paragraph"),
            ""
        );
    }

    #[test]
    fn test_extract_section_bounds() {
        let parser = ResumeParser::new();
        let text = "EDUCATION\nB.Sc Physics\nSKILLS\nRust";
        assert_eq!(parser.extract_section(text, EDUCATION_HEADERS), "B.Sc Physics");
        assert_eq!(parser.extract_section(text, SKILLS_HEADERS), "Rust");
        assert_eq!(parser.extract_section(text, PROJECTS_HEADERS), "");
    }

    #[test]
    fn test_skills_fallback_scans_document() {
        let parser = ResumeParser::new();
        let skills = parser.parse_skills("", "Built APIs in Python and React with SQL");
        assert_eq!(skills, vec!["python", "react", "sql"]);
        assert_eq!(parser.parse_skills("", "nothing relevant"), vec![String::new()]);
    }

    #[test]
    fn test_skills_split_on_hyphens() {
        let parser = ResumeParser::new();
        assert_eq!(parser.parse_skills("Python - SQL - React", ""), vec!["Python", "SQL", "React"]);

        let skills = parser.parse_skills("Languages: Rust, C++\n- Docker", "");
        assert_eq!(skills, vec!["Rust", "C++", "Docker"]);
    }

    #[test]
    fn test_experience_date_line_with_company() {
        let parser = ResumeParser::new();
        let exp = parser.parse_experience("Data Analyst\nGlobex, Jan 2020 - Dec 2021\n* Built dashboards");
        assert_eq!(exp[0].company, "Globex");
        assert_eq!(exp[0].date, "Jan 2020 - Dec 2021");
        assert_eq!(exp[0].description, vec!["Built dashboards"]);
    }

    #[test]
    fn test_experience_without_title_is_blank() {
        let parser = ResumeParser::new();
        let exp = parser.parse_experience("Did many things\nfor many years");
        assert_eq!(exp, vec![Experience::default()]);
    }

    #[test]
    fn test_certification_split_and_date() {
        let parser = ResumeParser::new();
        let certs = parser.parse_certifications("Certified Kubernetes Administrator - CNCF\nMar 2022");
        assert_eq!(certs[0].name, "Certified Kubernetes Administrator");
        assert_eq!(certs[0].issuer, "CNCF");
        assert_eq!(certs[0].date, "Mar 2022");
    }

    #[test]
    fn test_degree_keyword_needs_abbreviation_dots() {
        let parser = ResumeParser::new();
        let edu = parser.parse_education("Happy to be here\nMaster of Science\nMassachusetts Institute of Technology");
        assert_eq!(edu.len(), 1);
        assert_eq!(edu[0].degree, "Master of Science");
        assert_eq!(edu[0].institution, "Massachusetts Institute of Technology");
    }
}
