//! Resume checker session state machine
//!
//! One session holds at most one resume. Uploading a new file from any
//! state starts over.

use crate::config::Config;
use crate::error::{Result, ResumeCheckerError};
use crate::input::{InputManager, ResumeFile};
use crate::output::formatter::suggest_generated_filename;
use crate::output::report::ScoreComparison;
use crate::processing::ats_scorer::{AtsScorer, ScoreReport};
use crate::processing::document::StructuredResume;
use crate::processing::resume_generator::{GeneratedResume, ResumeGenerator};
use crate::processing::resume_parser::ResumeParser;
use crate::workflow::profile::ExternalProfile;
use log::{info, warn};
use std::time::Duration;

/// A scored upload.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub file_name: String,
    pub text: String,
    pub report: ScoreReport,
}

#[derive(Debug, Clone)]
pub enum CheckerState {
    Idle {
        error: Option<String>,
    },
    Extracting {
        file_name: String,
    },
    Scored(Analysis),
    Editing {
        analysis: Analysis,
        resume: StructuredResume,
    },
    Regenerated {
        analysis: Analysis,
        resume: StructuredResume,
        generated: GeneratedResume,
        report: ScoreReport,
    },
}

impl CheckerState {
    pub fn name(&self) -> &'static str {
        match self {
            CheckerState::Idle { .. } => "idle",
            CheckerState::Extracting { .. } => "extracting",
            CheckerState::Scored(_) => "scored",
            CheckerState::Editing { .. } => "editing",
            CheckerState::Regenerated { .. } => "regenerated",
        }
    }
}

pub struct ResumeChecker {
    input: InputManager,
    scorer: AtsScorer,
    parser: ResumeParser,
    generator: ResumeGenerator,
    extraction_timeout: Duration,
    state: CheckerState,
}

impl Default for ResumeChecker {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl ResumeChecker {
    pub fn new(config: &Config) -> Self {
        Self {
            input: InputManager::new(&config.limits),
            scorer: AtsScorer::new(),
            parser: ResumeParser::new(),
            generator: ResumeGenerator::new(config.layout.clone()),
            extraction_timeout: config.extraction_timeout(),
            state: CheckerState::Idle { error: None },
        }
    }

    pub fn state(&self) -> &CheckerState {
        &self.state
    }

    pub fn last_error(&self) -> Option<&str> {
        match &self.state {
            CheckerState::Idle { error } => error.as_deref(),
            _ => None,
        }
    }

    /// Validate, extract and score an upload. Failures leave the session
    /// idle with the error message recorded.
    pub async fn analyze(&mut self, file: ResumeFile) -> Result<ScoreReport> {
        if let Err(e) = self.input.validate(&file) {
            return Err(self.fail(e));
        }

        self.state = CheckerState::Extracting {
            file_name: file.name.clone(),
        };

        let text = match self
            .input
            .extract_with_timeout(&file, self.extraction_timeout)
            .await
        {
            Ok(text) => text,
            Err(e) => return Err(self.fail(e)),
        };

        let report = self.scorer.score(&text, &file.name);
        info!(
            "Scored {}: {}/100 ({})",
            file.name, report.overall_score, report.overall_status
        );

        self.state = CheckerState::Scored(Analysis {
            file_name: file.name,
            text,
            report: report.clone(),
        });
        Ok(report)
    }

    fn fail(&mut self, error: ResumeCheckerError) -> ResumeCheckerError {
        warn!("Analysis failed: {}", error);
        self.state = CheckerState::Idle {
            error: Some(error.to_string()),
        };
        error
    }

    pub fn analysis(&self) -> Option<&Analysis> {
        match &self.state {
            CheckerState::Scored(analysis)
            | CheckerState::Editing { analysis, .. }
            | CheckerState::Regenerated { analysis, .. } => Some(analysis),
            _ => None,
        }
    }

    /// Parse the scored text into editable fields, filling blanks from
    /// `profile`. From `Regenerated` the previous edits are kept.
    pub fn begin_editing(&mut self, profile: Option<&ExternalProfile>) -> Result<&mut StructuredResume> {
        let state = std::mem::replace(&mut self.state, CheckerState::Idle { error: None });

        let next = match state {
            CheckerState::Scored(analysis) => {
                let mut resume = self.parser.parse(&analysis.text);
                if let Some(profile) = profile {
                    profile.merge_into(&mut resume);
                }
                CheckerState::Editing { analysis, resume }
            }
            CheckerState::Regenerated { analysis, resume, .. } => CheckerState::Editing { analysis, resume },
            editing @ CheckerState::Editing { .. } => editing,
            other => {
                let name = other.name();
                self.state = other;
                return Err(ResumeCheckerError::InvalidState(format!(
                    "Cannot edit a resume while {}; analyze a resume first",
                    name
                )));
            }
        };
        self.state = next;

        self.resume_mut()
            .ok_or_else(|| ResumeCheckerError::InvalidState("Editing did not start".to_string()))
    }

    pub fn resume(&self) -> Option<&StructuredResume> {
        match &self.state {
            CheckerState::Editing { resume, .. } | CheckerState::Regenerated { resume, .. } => Some(resume),
            _ => None,
        }
    }

    /// Mutable access while editing.
    pub fn resume_mut(&mut self) -> Option<&mut StructuredResume> {
        match &mut self.state {
            CheckerState::Editing { resume, .. } => Some(resume),
            _ => None,
        }
    }

    pub fn replace_resume(&mut self, mut replacement: StructuredResume) -> Result<()> {
        let resume = self.resume_mut().ok_or_else(|| {
            ResumeCheckerError::InvalidState("Resume fields can only be replaced while editing".to_string())
        })?;
        replacement.ensure_rows();
        *resume = replacement;
        Ok(())
    }

    /// Render the edited resume and score the result. Missing name or email
    /// keeps the session in `Editing`.
    pub fn generate(&mut self) -> Result<&GeneratedResume> {
        let resume = match &self.state {
            CheckerState::Editing { resume, .. } => resume,
            other => {
                return Err(ResumeCheckerError::InvalidState(format!(
                    "Cannot generate a resume while {}",
                    other.name()
                )))
            }
        };

        validate_required(resume)?;

        let file_name = suggest_generated_filename(&resume.personal_info.name);
        let generated = self.generator.generate(resume, &file_name)?;
        let report = self.scorer.score(&generated.text, &generated.file_name);
        info!(
            "Regenerated resume scored {}/100 ({})",
            report.overall_score, report.overall_status
        );

        match std::mem::replace(&mut self.state, CheckerState::Idle { error: None }) {
            CheckerState::Editing { analysis, resume } => {
                self.state = CheckerState::Regenerated {
                    analysis,
                    resume,
                    generated,
                    report,
                };
            }
            other => {
                self.state = other;
                return Err(ResumeCheckerError::InvalidState("Editing state was lost".to_string()));
            }
        }

        match &self.state {
            CheckerState::Regenerated { generated, .. } => Ok(generated),
            _ => Err(ResumeCheckerError::InvalidState("Generation did not complete".to_string())),
        }
    }

    pub fn generated(&self) -> Option<&GeneratedResume> {
        match &self.state {
            CheckerState::Regenerated { generated, .. } => Some(generated),
            _ => None,
        }
    }

    /// Render the document again from the held fields for saving.
    pub fn download(&self) -> Result<GeneratedResume> {
        match &self.state {
            CheckerState::Regenerated { resume, generated, .. } => {
                self.generator.generate(resume, &generated.file_name)
            }
            other => Err(ResumeCheckerError::InvalidState(format!(
                "Nothing to download while {}",
                other.name()
            ))),
        }
    }

    pub fn comparison(&self) -> Option<ScoreComparison> {
        match &self.state {
            CheckerState::Regenerated { analysis, report, .. } => {
                Some(ScoreComparison::new(&analysis.report, report))
            }
            _ => None,
        }
    }

    /// Back to `Idle`, dropping all session data.
    pub fn reset(&mut self) {
        self.state = CheckerState::Idle { error: None };
    }
}

/// Name and email are required before a resume can be generated.
pub fn validate_required(resume: &StructuredResume) -> Result<()> {
    let mut missing = Vec::new();
    if resume.personal_info.name.trim().is_empty() {
        missing.push("name");
    }
    if resume.personal_info.email.trim().is_empty() {
        missing.push("email");
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ResumeCheckerError::MissingRequiredFields(format!(
            "please fill in {} in the personal information section",
            missing.join(" and ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unsupported_upload_stays_idle_with_error() {
        let mut checker = ResumeChecker::default();
        let err = checker
            .analyze(ResumeFile::new("resume.txt", b"plain".to_vec()))
            .await
            .unwrap_err();

        assert!(matches!(err, ResumeCheckerError::UnsupportedFormat(_)));
        assert_eq!(checker.state().name(), "idle");
        assert!(checker.last_error().is_some());
    }

    #[tokio::test]
    async fn test_corrupt_pdf_returns_to_idle() {
        let mut checker = ResumeChecker::default();
        let err = checker
            .analyze(ResumeFile::new("resume.pdf", b"garbage".to_vec()))
            .await
            .unwrap_err();

        assert!(matches!(err, ResumeCheckerError::CorruptFile(_)));
        assert!(checker.last_error().is_some());
    }

    #[test]
    fn test_editing_requires_scored_resume() {
        let mut checker = ResumeChecker::default();
        let err = checker.begin_editing(None).unwrap_err();
        assert!(matches!(err, ResumeCheckerError::InvalidState(_)));
        assert_eq!(checker.state().name(), "idle");
        assert!(checker.generate().is_err());
        assert!(checker.download().is_err());
        assert!(checker.comparison().is_none());
    }

    #[test]
    fn test_validate_required_lists_missing_fields() {
        let mut resume = StructuredResume::empty();
        let err = validate_required(&resume).unwrap_err();
        assert!(err.to_string().contains("name and email"));

        resume.personal_info.name = "Jane".to_string();
        let err = validate_required(&resume).unwrap_err();
        assert!(err.to_string().contains("email"));
        assert!(!err.to_string().contains("name and"));

        resume.personal_info.email = "jane@example.com".to_string();
        assert!(validate_required(&resume).is_ok());
    }

    #[test]
    fn test_scored_session_round_trip() {
        let text = "Jane Doe\nEmail: jane@example.com\nSKILLS\nPython, SQL, React".to_string();
        let mut checker = ResumeChecker::default();
        let report = checker.scorer.score(&text, "resume.pdf");
        checker.state = CheckerState::Scored(Analysis {
            file_name: "resume.pdf".to_string(),
            text,
            report,
        });

        let resume = checker.begin_editing(None).unwrap();
        resume.personal_info.email.clear();
        assert!(matches!(
            checker.generate().unwrap_err(),
            ResumeCheckerError::MissingRequiredFields(_)
        ));
        assert_eq!(checker.state().name(), "editing");

        checker.resume_mut().unwrap().personal_info.email = "jane@example.com".to_string();
        let generated = checker.generate().unwrap();
        assert_eq!(generated.file_name, "Jane_Doe_ATS_Resume.pdf");
        assert_eq!(checker.state().name(), "regenerated");

        let comparison = checker.comparison().unwrap();
        assert!(comparison.after.overall_score >= comparison.before.overall_score);

        let download = checker.download().unwrap();
        assert_eq!(download.text, checker.generated().unwrap().text);

        checker.reset();
        assert_eq!(checker.state().name(), "idle");
        assert!(checker.analysis().is_none());
    }
}
