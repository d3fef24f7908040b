//! ATS (Applicant Tracking System) compatibility scoring
//!
//! A resume is scored against a fixed rubric of ten dimensions. Each
//! dimension is an entry in [`RUBRIC`] with a constant point allocation and
//! a pure evaluation function. The allocations add up to [`RUBRIC_MAX_TOTAL`]
//! and the overall score is that total normalised to 0-100.

use crate::input::file_detector::FileType;
use crate::processing::patterns::{KeywordSet, Patterns};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Standard section header synonyms recognised by most ATS parsers.
pub const STANDARD_SECTIONS: &[&str] = &[
    "contact", "contact information", "personal information",
    "education", "educational background", "academic background",
    "experience", "work experience", "employment", "professional experience",
    "skills", "technical skills", "core competencies",
    "projects", "project experience",
    "certifications", "certificates",
    "achievements", "accomplishments", "awards",
    "objective", "summary", "professional summary", "profile",
];

/// Layout vocabulary that usually means tables, images or multi-column designs.
pub const UNFRIENDLY_ELEMENTS: &[&str] = &[
    "table", "chart", "graph", "image", "photo", "picture",
    "header", "footer", "text box", "textbox", "column",
    "multi-column", "graphic", "design element",
];

pub const ACTION_VERBS: &[&str] = &[
    "achieved", "developed", "created", "implemented", "managed", "led",
    "improved", "increased", "reduced", "optimized", "designed", "built",
    "launched", "executed", "delivered", "established", "generated", "produced",
    "coordinated", "collaborated", "analyzed", "resolved", "streamlined", "enhanced",
];

pub const COMMON_KEYWORDS: &[&str] = &[
    "experience", "skills", "education", "project", "certification",
    "achievement", "responsibility", "leadership", "team", "communication",
];

pub const EXCELLENT_THRESHOLD: u32 = 80;
pub const GOOD_THRESHOLD: u32 = 70;
pub const NEEDS_IMPROVEMENT_THRESHOLD: u32 = 60;

/// Word-count bands for the length dimension, best first: (min, max, points).
pub const LENGTH_BANDS: &[(usize, usize, u32)] = &[(400, 800, 10), (300, 1000, 7), (200, 1200, 5)];
pub const LENGTH_FALLBACK_POINTS: u32 = 3;
pub const TOO_SHORT_WORDS: usize = 300;
pub const TOO_LONG_WORDS: usize = 1000;

pub const EMPTY_TEXT_ISSUE: &str = "Resume text is empty";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Excellent,
    Good,
    NeedsImprovement,
    Poor,
}

impl Status {
    /// Overall status for a 0-100 score.
    pub fn from_score(score: u32) -> Self {
        if score >= EXCELLENT_THRESHOLD {
            Status::Excellent
        } else if score >= GOOD_THRESHOLD {
            Status::Good
        } else if score >= NEEDS_IMPROVEMENT_THRESHOLD {
            Status::NeedsImprovement
        } else {
            Status::Poor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Status::Excellent => "excellent",
            Status::Good => "good",
            Status::NeedsImprovement => "needs-improvement",
            Status::Poor => "poor",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionScore {
    pub score: u32,
    pub max: u32,
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub found_sections: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub found_verbs: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreStats {
    pub word_count: usize,
    pub character_count: usize,
    pub sections_found: usize,
    pub action_verbs_found: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreReport {
    pub overall_score: u32,
    pub overall_status: Status,
    pub breakdown: BTreeMap<String, DimensionScore>,
    pub issues: Vec<String>,
    pub suggestions: Vec<String>,
    pub stats: ScoreStats,
}

impl ScoreReport {
    pub fn dimension(&self, name: &str) -> Option<&DimensionScore> {
        self.breakdown.get(name)
    }

    /// Breakdown entries in rubric order.
    pub fn ordered_breakdown(&self) -> Vec<(&'static str, &DimensionScore)> {
        RUBRIC
            .iter()
            .filter_map(|d| self.breakdown.get(d.name).map(|s| (d.name, s)))
            .collect()
    }
}

/// Result of evaluating one rubric dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub score: u32,
    pub status: Status,
    pub issues: Vec<String>,
    pub suggestions: Vec<String>,
    pub found_sections: Option<Vec<String>>,
    pub word_count: Option<usize>,
    pub found_verbs: Option<usize>,
}

impl Evaluation {
    fn new(score: u32, status: Status) -> Self {
        Self {
            score,
            status,
            issues: Vec::new(),
            suggestions: Vec::new(),
            found_sections: None,
            word_count: None,
            found_verbs: None,
        }
    }

    fn issue(&mut self, issue: &str) {
        self.issues.push(issue.to_string());
    }

    fn suggest(&mut self, suggestion: &str) {
        self.suggestions.push(suggestion.to_string());
    }
}

/// Everything a dimension may look at.
pub struct ScoringContext<'a> {
    pub text: &'a str,
    pub lower: String,
    pub file_name: &'a str,
    pub word_count: usize,
    pub lexicon: &'a Lexicon,
}

pub struct RubricDimension {
    pub name: &'static str,
    pub max: u32,
    pub evaluate: fn(&ScoringContext<'_>) -> Evaluation,
}

pub const RUBRIC_MAX_TOTAL: u32 = 110;

pub const RUBRIC: [RubricDimension; 10] = [
    RubricDimension { name: "fileFormat", max: 10, evaluate: evaluate_file_format },
    RubricDimension { name: "contactInfo", max: 15, evaluate: evaluate_contact_info },
    RubricDimension { name: "sectionHeaders", max: 15, evaluate: evaluate_section_headers },
    RubricDimension { name: "resumeLength", max: 10, evaluate: evaluate_length },
    RubricDimension { name: "dateFormats", max: 10, evaluate: evaluate_dates },
    RubricDimension { name: "actionVerbs", max: 10, evaluate: evaluate_action_verbs },
    RubricDimension { name: "quantifiableAchievements", max: 10, evaluate: evaluate_quantifiers },
    RubricDimension { name: "keywordDensity", max: 10, evaluate: evaluate_keyword_density },
    RubricDimension { name: "unfriendlyElements", max: 10, evaluate: evaluate_unfriendly_elements },
    RubricDimension { name: "structure", max: 10, evaluate: evaluate_structure },
];

/// Compiled word lists and patterns used by the rubric.
pub struct Lexicon {
    pub patterns: Patterns,
    sections: KeywordSet,
    unfriendly: KeywordSet,
    action_verbs: KeywordSet,
    keywords: KeywordSet,
    quantifier: Regex,
    percentage: Regex,
    digit: Regex,
    paragraph_break: Regex,
    bullet: Regex,
    caps_header: Regex,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::new()
    }
}

impl Lexicon {
    pub fn new() -> Self {
        Self {
            patterns: Patterns::new(),
            sections: KeywordSet::new(STANDARD_SECTIONS),
            unfriendly: KeywordSet::new(UNFRIENDLY_ELEMENTS),
            action_verbs: KeywordSet::new(ACTION_VERBS),
            keywords: KeywordSet::new(COMMON_KEYWORDS),
            quantifier: Regex::new(
                r"(?i)\d+\s*(?:percent|%|years?|months?|times?|people|users?|projects?|clients?|increase|decrease|improve)",
            )
            .expect("Invalid quantifier regex"),
            percentage: Regex::new(r"%\s*\d+|\d+\s*%").expect("Invalid percentage regex"),
            digit: Regex::new(r"\d").expect("Invalid digit regex"),
            paragraph_break: Regex::new(r"\n\s*\n").expect("Invalid paragraph regex"),
            bullet: Regex::new(r"[•*-]\s+|[1-9]\.\s+").expect("Invalid bullet regex"),
            caps_header: Regex::new(r"(?m)^[A-Z][A-Z\s]+\n").expect("Invalid header regex"),
        }
    }
}

/// Scores resume text against [`RUBRIC`]. Pure and reentrant.
pub struct AtsScorer {
    lexicon: Lexicon,
}

impl Default for AtsScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl AtsScorer {
    pub fn new() -> Self {
        Self {
            lexicon: Lexicon::new(),
        }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn score(&self, text: &str, file_name: &str) -> ScoreReport {
        if text.trim().is_empty() {
            return ScoreReport {
                overall_score: 0,
                overall_status: Status::Poor,
                breakdown: BTreeMap::new(),
                issues: vec![EMPTY_TEXT_ISSUE.to_string()],
                suggestions: Vec::new(),
                stats: ScoreStats {
                    character_count: text.chars().count(),
                    ..ScoreStats::default()
                },
            };
        }

        let context = ScoringContext {
            text,
            lower: text.to_lowercase(),
            file_name,
            word_count: text.split_whitespace().count(),
            lexicon: &self.lexicon,
        };

        let mut score = 0;
        let mut max_score = 0;
        let mut breakdown = BTreeMap::new();
        let mut issues = Vec::new();
        let mut suggestions = Vec::new();
        let mut stats = ScoreStats {
            word_count: context.word_count,
            character_count: text.chars().count(),
            ..ScoreStats::default()
        };

        for dimension in RUBRIC.iter() {
            let evaluation = (dimension.evaluate)(&context);
            let points = evaluation.score.min(dimension.max);

            score += points;
            max_score += dimension.max;
            issues.extend(evaluation.issues);
            suggestions.extend(evaluation.suggestions);

            if let Some(sections) = &evaluation.found_sections {
                stats.sections_found = sections.len();
            }
            if let Some(verbs) = evaluation.found_verbs {
                stats.action_verbs_found = verbs;
            }

            breakdown.insert(
                dimension.name.to_string(),
                DimensionScore {
                    score: points,
                    max: dimension.max,
                    status: evaluation.status,
                    found_sections: evaluation.found_sections,
                    word_count: evaluation.word_count,
                    found_verbs: evaluation.found_verbs,
                },
            );
        }

        let overall_score = percentage(score, max_score);

        ScoreReport {
            overall_score,
            overall_status: Status::from_score(overall_score),
            breakdown,
            issues,
            suggestions,
            stats,
        }
    }
}

fn percentage(score: u32, max_score: u32) -> u32 {
    if max_score == 0 {
        return 0;
    }
    (score as f64 / max_score as f64 * 100.0).round() as u32
}

fn evaluate_file_format(ctx: &ScoringContext<'_>) -> Evaluation {
    if FileType::from_file_name(ctx.file_name).is_ats_preferred() {
        Evaluation::new(10, Status::Good)
    } else {
        let mut eval = Evaluation::new(0, Status::Poor);
        eval.issue("File format not ideal. Use PDF or DOCX.");
        eval
    }
}

fn evaluate_contact_info(ctx: &ScoringContext<'_>) -> Evaluation {
    let patterns = &ctx.lexicon.patterns;
    let has_email = patterns.email.is_match(ctx.text);
    let has_phone = patterns.phone.is_match(ctx.text);
    let has_linkedin = patterns.linkedin.is_match(ctx.text);

    let score = [has_email, has_phone, has_linkedin]
        .iter()
        .filter(|found| **found)
        .count() as u32
        * 5;
    let status = if score >= 10 { Status::Good } else { Status::NeedsImprovement };

    let mut eval = Evaluation::new(score, status);
    if !has_email {
        eval.issue("Missing email address");
        eval.suggest("Add your email address in the contact section");
    }
    if !has_phone {
        eval.issue("Missing phone number");
        eval.suggest("Add your phone number");
    }
    if !has_linkedin {
        eval.suggest("Consider adding your LinkedIn profile URL");
    }
    eval
}

/// Collapse matched header synonyms into categories, first occurrence first.
pub fn canonical_sections(found: &[&str]) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();
    for section in found {
        let category = if section.contains("experience") {
            "experience"
        } else if section.contains("education") {
            "education"
        } else if section.contains("skill") {
            "skills"
        } else if section.contains("contact") {
            "contact"
        } else {
            section
        };
        if !categories.iter().any(|c| c == category) {
            categories.push(category.to_string());
        }
    }
    categories
}

fn evaluate_section_headers(ctx: &ScoringContext<'_>) -> Evaluation {
    let found = ctx.lexicon.sections.present_in(ctx.text);
    let categories = canonical_sections(&found);

    let score = (categories.len() as u32 * 3).min(15);
    let status = if score >= 12 {
        Status::Good
    } else if score >= 9 {
        Status::NeedsImprovement
    } else {
        Status::Poor
    };

    let mut eval = Evaluation::new(score, status);
    if !ctx.lower.contains("education") {
        eval.issue("Missing Education section");
        eval.suggest("Add an Education section with your academic background");
    }
    if !ctx.lower.contains("experience") && !ctx.lower.contains("employment") {
        eval.issue("Missing Work Experience section");
        eval.suggest("Add a Work Experience section");
    }
    if !ctx.lower.contains("skill") {
        eval.issue("Missing Skills section");
        eval.suggest("Add a Skills section listing your technical and soft skills");
    }
    eval.found_sections = Some(categories);
    eval
}

/// Points for a word count according to [`LENGTH_BANDS`].
pub fn length_points(word_count: usize) -> u32 {
    LENGTH_BANDS
        .iter()
        .find(|(min, max, _)| (*min..=*max).contains(&word_count))
        .map(|(_, _, points)| *points)
        .unwrap_or(LENGTH_FALLBACK_POINTS)
}

fn evaluate_length(ctx: &ScoringContext<'_>) -> Evaluation {
    let score = length_points(ctx.word_count);
    let status = if score >= 7 { Status::Good } else { Status::NeedsImprovement };

    let mut eval = Evaluation::new(score, status);
    if ctx.word_count < TOO_SHORT_WORDS {
        eval.issue("Resume is too short");
        eval.suggest("Expand your resume with more details about your experience and achievements");
    }
    if ctx.word_count > TOO_LONG_WORDS {
        eval.issue("Resume is too long");
        eval.suggest("Consider condensing your resume to 1-2 pages for better ATS compatibility");
    }
    eval.word_count = Some(ctx.word_count);
    eval
}

fn evaluate_dates(ctx: &ScoringContext<'_>) -> Evaluation {
    if ctx.lexicon.patterns.has_standard_date(ctx.text) {
        Evaluation::new(10, Status::Good)
    } else {
        let mut eval = Evaluation::new(0, Status::Poor);
        eval.issue("No dates found in standard formats");
        eval.suggest("Add dates to your education and work experience (e.g., MM/YYYY or Month YYYY)");
        eval
    }
}

fn evaluate_action_verbs(ctx: &ScoringContext<'_>) -> Evaluation {
    let found = ctx.lexicon.action_verbs.present_in(ctx.text).len();
    let score = (found as u32 * 2).min(10);
    let status = if score >= 6 { Status::Good } else { Status::NeedsImprovement };

    let mut eval = Evaluation::new(score, status);
    if found < 3 {
        eval.suggest("Use more action verbs to describe your achievements (e.g., developed, created, implemented)");
    }
    eval.found_verbs = Some(found);
    eval
}

fn evaluate_quantifiers(ctx: &ScoringContext<'_>) -> Evaluation {
    let lexicon = ctx.lexicon;
    let has_numbers = lexicon.digit.is_match(ctx.text);

    let score = if lexicon.quantifier.is_match(ctx.text) {
        10
    } else if lexicon.percentage.is_match(ctx.text) || (has_numbers && ctx.word_count > 200) {
        6
    } else if has_numbers {
        3
    } else {
        0
    };
    let status = if score >= 6 { Status::Good } else { Status::NeedsImprovement };

    let mut eval = Evaluation::new(score, status);
    if score < 6 {
        eval.suggest("Add quantifiable achievements with numbers, percentages, or metrics (e.g., \"Increased sales by 25%\")");
    }
    eval
}

fn evaluate_keyword_density(ctx: &ScoringContext<'_>) -> Evaluation {
    let keywords = &ctx.lexicon.keywords;
    let matched = keywords.present_in(ctx.text).len();
    let score = ((matched * 10) / keywords.len().max(1)).min(10) as u32;
    let status = if score >= 7 { Status::Good } else { Status::NeedsImprovement };
    Evaluation::new(score, status)
}

fn evaluate_unfriendly_elements(ctx: &ScoringContext<'_>) -> Evaluation {
    if ctx.lexicon.unfriendly.any_in(ctx.text) {
        let mut eval = Evaluation::new(5, Status::Poor);
        eval.issue("Resume may contain ATS-unfriendly elements (tables, images, etc.)");
        eval.suggest("Avoid using tables, images, graphics, or complex formatting that ATS systems cannot parse");
        eval
    } else {
        Evaluation::new(10, Status::Good)
    }
}

fn evaluate_structure(ctx: &ScoringContext<'_>) -> Evaluation {
    let lexicon = ctx.lexicon;
    let has_paragraphs = lexicon.paragraph_break.find_iter(ctx.text).count() >= 3;
    let has_bullets = lexicon.bullet.is_match(ctx.text);
    let has_clear_sections = lexicon.caps_header.find_iter(ctx.text).count() >= 2;

    let score = if has_clear_sections && has_bullets {
        10
    } else if has_clear_sections || has_bullets {
        7
    } else if has_paragraphs {
        5
    } else {
        3
    };
    let status = if score >= 7 { Status::Good } else { Status::NeedsImprovement };

    let mut eval = Evaluation::new(score, status);
    if !has_bullets {
        eval.suggest("Use bullet points to organize your experience and achievements");
    }
    if !has_clear_sections {
        eval.suggest("Use clear section headers (e.g., EDUCATION, EXPERIENCE, SKILLS)");
    }
    eval
}
