//! Known profile fields merged into parsed resumes

use crate::config::ProfileConfig;
use crate::processing::document::StructuredResume;
use serde::{Deserialize, Serialize};

/// Details the user has already given elsewhere (config file or CLI flags).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalProfile {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub skills: Vec<String>,
}

impl From<&ProfileConfig> for ExternalProfile {
    fn from(config: &ProfileConfig) -> Self {
        Self {
            name: config.name.clone(),
            email: config.email.clone(),
            phone: config.phone.clone(),
            skills: config.skills.clone(),
        }
    }
}

impl ExternalProfile {
    pub fn is_empty(&self) -> bool {
        self.name.trim().is_empty()
            && self.email.trim().is_empty()
            && self.phone.trim().is_empty()
            && self.skills.iter().all(|s| s.trim().is_empty())
    }

    /// Split a comma separated skills string, as typed on a command line.
    pub fn with_skill_list(mut self, skills: &str) -> Self {
        self.skills.extend(
            skills
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from),
        );
        self
    }

    /// Fill blank contact fields; parsed values always win. Skills become
    /// the de-duplicated union, parsed skills first.
    pub fn merge_into(&self, resume: &mut StructuredResume) {
        let info = &mut resume.personal_info;
        fill_blank(&mut info.name, &self.name);
        fill_blank(&mut info.email, &self.email);
        fill_blank(&mut info.phone, &self.phone);

        let mut skills: Vec<String> = Vec::new();
        let candidates = resume
            .skills
            .iter()
            .chain(self.skills.iter())
            .map(|s| s.trim())
            .filter(|s| !s.is_empty());
        for skill in candidates {
            if !skills.iter().any(|known| known == skill) {
                skills.push(skill.to_string());
            }
        }

        resume.skills = skills;
        resume.ensure_rows();
    }
}

fn fill_blank(field: &mut String, value: &str) {
    if field.trim().is_empty() && !value.trim().is_empty() {
        *field = value.trim().to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> ExternalProfile {
        ExternalProfile {
            name: "Jane Doe".to_string(),
            email: "jane@college.edu".to_string(),
            phone: "555-000-1111".to_string(),
            skills: vec!["SQL".to_string(), "Go".to_string()],
        }
    }

    #[test]
    fn test_merge_fills_only_blanks() {
        let mut resume = StructuredResume::empty();
        resume.personal_info.email = "parsed@example.com".to_string();

        profile().merge_into(&mut resume);

        assert_eq!(resume.personal_info.name, "Jane Doe");
        assert_eq!(resume.personal_info.email, "parsed@example.com");
        assert_eq!(resume.personal_info.phone, "555-000-1111");
    }

    #[test]
    fn test_merge_skills_union_parsed_first() {
        let mut resume = StructuredResume::empty();
        resume.skills = vec!["Rust".to_string(), "".to_string(), "SQL".to_string()];

        profile().merge_into(&mut resume);
        assert_eq!(resume.skills, vec!["Rust", "SQL", "Go"]);
    }

    #[test]
    fn test_merge_keeps_blank_skill_row() {
        let mut resume = StructuredResume::empty();
        ExternalProfile::default().merge_into(&mut resume);
        assert_eq!(resume.skills, vec![String::new()]);
    }

    #[test]
    fn test_skill_list_parsing() {
        let profile = ExternalProfile::default().with_skill_list(" Rust, ,Python ");
        assert_eq!(profile.skills, vec!["Rust", "Python"]);
        assert!(!profile.is_empty());
        assert!(ExternalProfile::default().is_empty());
    }
}
