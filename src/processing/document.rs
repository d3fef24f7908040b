//! Structured resume data shared by the parser, the editor and the generator

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub linked_in: String,
    pub website: String,
    pub address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    pub location: String,
    pub date: String,
    pub gpa: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Experience {
    pub title: String,
    pub company: String,
    pub location: String,
    pub date: String,
    pub description: Vec<String>,
}

impl Default for Experience {
    fn default() -> Self {
        Self {
            title: String::new(),
            company: String::new(),
            location: String::new(),
            date: String::new(),
            description: vec![String::new()],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub name: String,
    pub description: String,
    pub technologies: String,
    pub date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Certification {
    pub name: String,
    pub issuer: String,
    pub date: String,
    pub credential_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Achievement {
    pub description: String,
}

/// Editable resume fields. Every list holds at least one (possibly blank) row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StructuredResume {
    pub personal_info: PersonalInfo,
    pub summary: String,
    pub education: Vec<Education>,
    pub experience: Vec<Experience>,
    pub skills: Vec<String>,
    pub projects: Vec<Project>,
    pub certifications: Vec<Certification>,
    pub achievements: Vec<Achievement>,
}

/// List sections of a [`StructuredResume`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Education,
    Experience,
    Skills,
    Projects,
    Certifications,
    Achievements,
}

impl Default for StructuredResume {
    fn default() -> Self {
        Self::empty()
    }
}

impl StructuredResume {
    /// Load edited fields saved by `parse`. Missing keys fall back to defaults.
    pub fn from_json_file(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read resume data from {}", path.display()))?;
        let mut resume: Self = serde_json::from_str(&content)
            .with_context(|| format!("{} is not valid resume JSON", path.display()))?;
        resume.ensure_rows();
        Ok(resume)
    }

    /// All fields blank, one sentinel row per list.
    pub fn empty() -> Self {
        Self {
            personal_info: PersonalInfo::default(),
            summary: String::new(),
            education: vec![Education::default()],
            experience: vec![Experience::default()],
            skills: vec![String::new()],
            projects: vec![Project::default()],
            certifications: vec![Certification::default()],
            achievements: vec![Achievement::default()],
        }
    }

    /// Restore the sentinel row in any list that was emptied.
    pub fn ensure_rows(&mut self) {
        fill_if_empty(&mut self.education);
        fill_if_empty(&mut self.experience);
        fill_if_empty(&mut self.skills);
        fill_if_empty(&mut self.projects);
        fill_if_empty(&mut self.certifications);
        fill_if_empty(&mut self.achievements);
    }

    pub fn add_entry(&mut self, section: Section) {
        match section {
            Section::Education => self.education.push(Education::default()),
            Section::Experience => self.experience.push(Experience::default()),
            Section::Skills => self.skills.push(String::new()),
            Section::Projects => self.projects.push(Project::default()),
            Section::Certifications => self.certifications.push(Certification::default()),
            Section::Achievements => self.achievements.push(Achievement::default()),
        }
    }

    /// Remove a row; removing the only row leaves a blank one in its place.
    /// Returns false when `index` is out of range.
    pub fn remove_entry(&mut self, section: Section, index: usize) -> bool {
        let removed = match section {
            Section::Education => remove_at(&mut self.education, index),
            Section::Experience => remove_at(&mut self.experience, index),
            Section::Skills => remove_at(&mut self.skills, index),
            Section::Projects => remove_at(&mut self.projects, index),
            Section::Certifications => remove_at(&mut self.certifications, index),
            Section::Achievements => remove_at(&mut self.achievements, index),
        };
        self.ensure_rows();
        removed
    }

    pub fn entry_count(&self, section: Section) -> usize {
        match section {
            Section::Education => self.education.len(),
            Section::Experience => self.experience.len(),
            Section::Skills => self.skills.len(),
            Section::Projects => self.projects.len(),
            Section::Certifications => self.certifications.len(),
            Section::Achievements => self.achievements.len(),
        }
    }

    /// Non-blank skills in order.
    pub fn listed_skills(&self) -> Vec<&str> {
        self.skills
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

fn fill_if_empty<T: Default>(rows: &mut Vec<T>) {
    if rows.is_empty() {
        rows.push(T::default());
    }
}

fn remove_at<T>(rows: &mut Vec<T>, index: usize) -> bool {
    if index < rows.len() {
        rows.remove(index);
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_has_sentinel_rows() {
        let resume = StructuredResume::empty();
        for section in [
            Section::Education,
            Section::Experience,
            Section::Skills,
            Section::Projects,
            Section::Certifications,
            Section::Achievements,
        ] {
            assert_eq!(resume.entry_count(section), 1);
        }
        assert_eq!(resume.experience[0].description, vec![String::new()]);
    }

    #[test]
    fn test_remove_last_row_keeps_blank() {
        let mut resume = StructuredResume::empty();
        resume.education[0].degree = "B.Sc".to_string();

        assert!(resume.remove_entry(Section::Education, 0));
        assert_eq!(resume.education, vec![Education::default()]);
        assert!(!resume.remove_entry(Section::Education, 3));
    }

    #[test]
    fn test_add_entry() {
        let mut resume = StructuredResume::empty();
        resume.add_entry(Section::Projects);
        resume.add_entry(Section::Skills);
        assert_eq!(resume.projects.len(), 2);
        assert_eq!(resume.skills.len(), 2);
    }

    #[test]
    fn test_json_shape_uses_camel_case() {
        let mut resume = StructuredResume::empty();
        resume.personal_info.linked_in = "linkedin.com/in/jane".to_string();
        resume.certifications[0].credential_id = "ABC-1".to_string();

        let json = serde_json::to_value(&resume).unwrap();
        assert_eq!(json["personalInfo"]["linkedIn"], "linkedin.com/in/jane");
        assert_eq!(json["certifications"][0]["credentialId"], "ABC-1");
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let resume: StructuredResume =
            serde_json::from_str(r#"{"personalInfo": {"name": "Jane"}, "skills": []}"#).unwrap();
        assert_eq!(resume.personal_info.name, "Jane");
        assert!(resume.skills.is_empty());
        assert_eq!(resume.education.len(), 1);
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.json");
        std::fs::write(&path, r#"{"personalInfo": {"name": "Jane"}, "skills": []}"#).unwrap();

        let resume = StructuredResume::from_json_file(&path).unwrap();
        assert_eq!(resume.personal_info.name, "Jane");
        assert_eq!(resume.skills, vec![String::new()]);
    }

    #[test]
    fn test_from_json_file_errors_name_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        let err = StructuredResume::from_json_file(&missing).unwrap_err();
        assert!(matches!(err, crate::error::ResumeCheckerError::InvalidInput(_)));
        assert!(err.to_string().contains("missing.json"));

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{ not json").unwrap();
        let err = StructuredResume::from_json_file(&broken).unwrap_err();
        assert!(err.to_string().contains("not valid resume JSON"));
    }
}
