//! CLI interface for the resume checker

use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "resume-checker")]
#[command(about = "ATS compatibility checker and resume regenerator")]
#[command(long_about = "Score a PDF or DOCX resume against an ATS rubric, parse it into editable fields and regenerate an ATS-friendly PDF")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract and score a resume
    Check {
        /// Path to resume file (PDF, DOCX, DOC)
        #[arg(short, long)]
        resume: PathBuf,

        /// Output format: console, json
        #[arg(short, long)]
        output: Option<String>,

        /// Show per-dimension details and statistics
        #[arg(short, long)]
        detailed: bool,

        /// Save the report to a file
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Parse a resume into editable JSON fields
    Parse {
        /// Path to resume file (PDF, DOCX, DOC)
        #[arg(short, long)]
        resume: PathBuf,

        /// Write the JSON to a file instead of stdout
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Regenerate an ATS-friendly PDF and compare scores
    Generate {
        /// Path to resume file (PDF, DOCX, DOC)
        #[arg(short, long)]
        resume: PathBuf,

        /// Edited resume fields (JSON from `parse`) to use instead of the parser output
        #[arg(long)]
        data: Option<PathBuf>,

        /// Where to write the generated PDF
        #[arg(long)]
        out: Option<PathBuf>,

        /// Name to use when the resume has none
        #[arg(long)]
        name: Option<String>,

        /// Email to use when the resume has none
        #[arg(long)]
        email: Option<String>,

        /// Phone number to use when the resume has none
        #[arg(long)]
        phone: Option<String>,

        /// Extra skills, comma separated
        #[arg(long)]
        skills: Option<String>,

        /// Output format: console, json
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file path
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" | "text" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        _ => Err(format!("Invalid output format: {}. Supported: console, json", format)),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(parse_output_format("console").unwrap(), OutputFormat::Console);
        assert!(parse_output_format("html").is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        let allowed = ["pdf", "docx", "doc"];
        assert!(validate_file_extension(Path::new("cv.PDF"), &allowed).is_ok());
        assert!(validate_file_extension(Path::new("cv.txt"), &allowed).is_err());
        assert!(validate_file_extension(Path::new("cv"), &allowed).is_err());
    }

    #[test]
    fn test_generate_command_parses() {
        let cli = Cli::try_parse_from([
            "resume-checker",
            "generate",
            "--resume",
            "cv.pdf",
            "--name",
            "Jane Doe",
            "--skills",
            "Rust,SQL",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Commands::Generate { resume, name, skills, .. } => {
                assert_eq!(resume, PathBuf::from("cv.pdf"));
                assert_eq!(name.as_deref(), Some("Jane Doe"));
                assert_eq!(skills.as_deref(), Some("Rust,SQL"));
            }
            _ => panic!("expected generate command"),
        }
    }
}
