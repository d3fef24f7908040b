//! Compiled patterns shared by the scorer, parser and generator

use aho_corasick::{AhoCorasick, MatchKind};
use regex::Regex;

const MONTHS_ABBREVIATED: &str = "Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec";
const MONTHS_FULL: &str =
    "January|February|March|April|May|June|July|August|September|October|November|December";

/// Contact and date patterns.
pub struct Patterns {
    pub email: Regex,
    pub phone: Regex,
    pub linkedin: Regex,
    pub url: Regex,
    pub address: Regex,
    /// `MM/DD/YYYY`-like numeric dates, plus the `MM/YYYY` form the generator emits.
    pub numeric_date: Regex,
    /// `Mon DD, YYYY`
    pub short_month_date: Regex,
    /// `Month DD, YYYY`
    pub long_month_date: Regex,
    /// Any date-ish fragment worth lifting into an entry's `date` field.
    pub entry_date: Regex,
}

impl Default for Patterns {
    fn default() -> Self {
        Self::new()
    }
}

impl Patterns {
    pub fn new() -> Self {
        let email = Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}")
            .expect("Invalid email regex");

        let phone = Regex::new(r"(?:\+?\d{1,3}[\s.-]?)?\(?\d{3}\)?[\s.-]?\d{3}[\s.-]?\d{4}")
            .expect("Invalid phone regex");

        let linkedin = Regex::new(r"(?i)linkedin\.com/in/[a-zA-Z0-9-]+")
            .expect("Invalid LinkedIn regex");

        let url = Regex::new(
            r"(?i)\b(?:https?://)?(?:www\.)?[a-z0-9-]+(?:\.[a-z0-9-]+)*\.(?:com|org|net|io|dev|edu|gov|co|me|app|ai|in|us|uk|info|xyz)\b(?:/[^\s,;|]*)?",
        )
        .expect("Invalid URL regex");

        let address = Regex::new(
            r"(?i)\b\d+\s+[A-Za-z ]+?\b(?:street|st|avenue|ave|road|rd|drive|dr|lane|ln|boulevard|blvd)\b\.?",
        )
        .expect("Invalid address regex");

        let numeric_date = Regex::new(r"\d{1,2}[/.-]\d{1,2}[/.-]\d{2,4}|\b\d{1,2}/\d{4}\b")
            .expect("Invalid numeric date regex");

        let short_month_date = Regex::new(&format!(
            r"(?i)(?:{})[a-z]*\s+\d{{1,2}},?\s+\d{{4}}",
            MONTHS_ABBREVIATED
        ))
        .expect("Invalid short month date regex");

        let long_month_date = Regex::new(&format!(
            r"(?i)(?:{})\s+\d{{1,2}},?\s+\d{{4}}",
            MONTHS_FULL
        ))
        .expect("Invalid long month date regex");

        let entry_date = Regex::new(&format!(
            r"(?i)\b(?:{m})[a-z]*\.?\s+(?:\d{{1,2}},?\s+)?\d{{4}}(?:\s*[-–]\s*(?:(?:{m})[a-z]*\.?\s+(?:\d{{1,2}},?\s+)?\d{{4}}|present|current))?|\b\d{{1,2}}[/.-]\d{{1,2}}[/.-]\d{{2,4}}\b|\b\d{{1,2}}/\d{{4}}\b|\b(?:19|20)\d{{2}}\s*[-–]\s*(?:(?:19|20)\d{{2}}|present|current)\b",
            m = MONTHS_ABBREVIATED
        ))
        .expect("Invalid entry date regex");

        Self {
            email,
            phone,
            linkedin,
            url,
            address,
            numeric_date,
            short_month_date,
            long_month_date,
            entry_date,
        }
    }

    /// True when any of the three ATS date families occurs in `text`.
    pub fn has_standard_date(&self, text: &str) -> bool {
        self.numeric_date.is_match(text)
            || self.short_month_date.is_match(text)
            || self.long_month_date.is_match(text)
    }

    /// First URL that is neither a LinkedIn link nor part of an email address.
    pub fn find_website<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.url
            .find_iter(text)
            .filter(|m| !m.as_str().to_lowercase().contains("linkedin"))
            .find(|m| {
                let before = text[..m.start()].chars().next_back();
                let after = text[m.end()..].chars().next();
                before != Some('@') && after != Some('@')
            })
            .map(|m| m.as_str())
    }
}

/// Case-insensitive substring lookup for a fixed keyword list.
pub struct KeywordSet {
    keywords: Vec<&'static str>,
    matcher: AhoCorasick,
}

impl KeywordSet {
    pub fn new(keywords: &[&'static str]) -> Self {
        let matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::Standard)
            .build(keywords)
            .expect("Invalid keyword list");

        Self {
            keywords: keywords.to_vec(),
            matcher,
        }
    }

    /// Keywords occurring anywhere in `text`, in list order.
    pub fn present_in(&self, text: &str) -> Vec<&'static str> {
        let mut seen = vec![false; self.keywords.len()];
        for mat in self.matcher.find_overlapping_iter(text) {
            seen[mat.pattern().as_usize()] = true;
        }

        self.keywords
            .iter()
            .zip(seen)
            .filter_map(|(keyword, found)| found.then_some(*keyword))
            .collect()
    }

    pub fn any_in(&self, text: &str) -> bool {
        self.matcher.is_match(text)
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}
