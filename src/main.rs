//! Resume checker: ATS scoring and ATS-friendly resume regeneration

use clap::Parser;
use log::{error, info, warn};
use resume_checker::cli::{self, Cli, Commands, ConfigAction};
use resume_checker::config::{Config, OutputFormat};
use resume_checker::error::{Result, ResumeCheckerError};
use resume_checker::input::manager::ACCEPTED_EXTENSIONS;
use resume_checker::input::ResumeFile;
use resume_checker::output::formatter::{save_bytes_to_file, save_report_to_file, suggest_filename};
use resume_checker::output::{AnalysisReport, ReportGenerator};
use resume_checker::processing::document::StructuredResume;
use resume_checker::workflow::{ExternalProfile, ResumeChecker};
use std::path::{Path, PathBuf};
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Check {
            resume,
            output,
            detailed,
            save,
        } => {
            let format = resolve_format(output.as_deref(), &config)?;
            let file = load_resume(&resume).await?;

            let mut checker = ResumeChecker::new(&config);
            let score = checker.analyze(file).await?;

            // A directory target gets a name derived from the resume.
            let save = save.map(|path| {
                if path.is_dir() {
                    path.join(suggest_filename(format, &file_name(&resume), true))
                } else {
                    path
                }
            });

            let mut report = AnalysisReport::new(&file_name(&resume), score);
            if let Some(path) = &save {
                report = report.with_output_file(&path.display().to_string());
            }

            let generator = ReportGenerator::new(config.output.color_output, detailed || config.output.detailed);
            let rendered = generator.generate_report(&report, format)?;
            println!("{}", rendered);

            if let Some(path) = save {
                // Saved reports never carry colour codes.
                let plain = ReportGenerator::new(false, detailed || config.output.detailed)
                    .generate_report(&report, format)?;
                save_report_to_file(&plain, &path)?;
                info!("Report saved to {}", path.display());
            }
        }

        Commands::Parse { resume, save } => {
            let file = load_resume(&resume).await?;

            let mut checker = ResumeChecker::new(&config);
            checker.analyze(file).await?;
            let parsed = checker.begin_editing(None)?;
            let json = serde_json::to_string_pretty(&*parsed)?;

            match save {
                Some(path) => {
                    save_report_to_file(&json, &path)?;
                    println!("✅ Parsed fields written to {}", path.display());
                }
                None => println!("{}", json),
            }
        }

        Commands::Generate {
            resume,
            data,
            out,
            name,
            email,
            phone,
            skills,
            output,
        } => {
            let format = resolve_format(output.as_deref(), &config)?;
            let file = load_resume(&resume).await?;

            let mut checker = ResumeChecker::new(&config);
            checker.analyze(file).await?;

            let profile = build_profile(&config, name, email, phone, skills.as_deref());
            let profile = (!profile.is_empty()).then_some(profile);
            checker.begin_editing(profile.as_ref())?;

            if let Some(path) = data {
                let edited = StructuredResume::from_json_file(&path)?;
                checker.replace_resume(edited)?;
                if let (Some(profile), Some(resume)) = (profile.as_ref(), checker.resume_mut()) {
                    profile.merge_into(resume);
                }
            }

            let generated = checker.generate()?;
            let target = out.unwrap_or_else(|| PathBuf::from(&generated.file_name));
            info!(
                "Rendered {} page(s) for {}",
                generated.page_count, generated.file_name
            );

            let download = checker.download()?;
            save_bytes_to_file(&download.document, &target)?;

            let comparison = checker
                .comparison()
                .ok_or_else(|| ResumeCheckerError::InvalidState("No regenerated score".to_string()))?;
            if !comparison.regressions().is_empty() {
                warn!(
                    "{} dimension(s) scored lower after regeneration",
                    comparison.regressions().len()
                );
            }

            let report = AnalysisReport::new(&file_name(&resume), comparison.before.clone())
                .with_comparison(comparison)
                .with_output_file(&target.display().to_string());

            let generator = ReportGenerator::new(config.output.color_output, config.output.detailed);
            println!("{}", generator.generate_report(&report, format)?);
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("⚙️  Current Configuration\n");
                println!("Max upload size: {} bytes", config.limits.max_upload_bytes);
                println!("Extraction timeout: {}s", config.limits.extraction_timeout_secs);
                println!(
                    "Page: {:.0} x {:.0} mm, margin {:.0} mm",
                    config.layout.page_width_mm, config.layout.page_height_mm, config.layout.margin_mm
                );
                println!("Output format: {:?}", config.output.format);
                println!("Detailed: {}", config.output.detailed);
                println!("Colour output: {}", config.output.color_output);

                let profile = ExternalProfile::from(&config.profile);
                if !profile.is_empty() {
                    println!("\nProfile:");
                    println!("  Name: {}", profile.name);
                    println!("  Email: {}", profile.email);
                    println!("  Phone: {}", profile.phone);
                    println!("  Skills: {}", profile.skills.join(", "));
                }
            }

            Some(ConfigAction::Reset) => {
                println!("🔄 Resetting configuration to defaults...");
                Config::default().save()?;
                println!("✅ Configuration reset successfully!");
            }

            Some(ConfigAction::Path) => {
                println!("{}", Config::config_path().display());
            }
        },
    }

    Ok(())
}

fn resolve_format(requested: Option<&str>, config: &Config) -> Result<OutputFormat> {
    match requested {
        Some(format) => cli::parse_output_format(format).map_err(ResumeCheckerError::InvalidInput),
        None => Ok(config.output.format),
    }
}

async fn load_resume(path: &Path) -> Result<ResumeFile> {
    cli::validate_file_extension(path, ACCEPTED_EXTENSIONS)
        .map_err(|e| ResumeCheckerError::UnsupportedFormat(format!("Resume file: {}", e)))?;

    info!("Reading resume from {}", path.display());
    ResumeFile::from_path(path).await
}

fn build_profile(
    config: &Config,
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    skills: Option<&str>,
) -> ExternalProfile {
    let mut profile = ExternalProfile::from(&config.profile);
    if let Some(name) = name {
        profile.name = name;
    }
    if let Some(email) = email {
        profile.email = email;
    }
    if let Some(phone) = phone {
        profile.phone = phone;
    }
    match skills {
        Some(skills) => profile.with_skill_list(skills),
        None => profile,
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
