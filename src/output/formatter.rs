//! Output formatters for score reports

use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::report::{AnalysisReport, ScoreComparison};
use crate::processing::ats_scorer::{DimensionScore, ScoreReport, Status};
use colored::{Color, Colorize};
use std::path::Path;

/// Trait for formatting analysis reports
pub trait OutputFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with colours and a per-dimension breakdown
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// JSON formatter for programmatic consumption
pub struct JsonFormatter {
    pretty: bool,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn status_color(status: Status) -> Color {
        match status {
            Status::Excellent => Color::Green,
            Status::Good => Color::BrightGreen,
            Status::NeedsImprovement => Color::Yellow,
            Status::Poor => Color::Red,
        }
    }

    fn format_status_badge(&self, status: Status) -> String {
        let badge = status.label().to_uppercase();
        if self.use_colors {
            format!("[{}]", badge.color(Self::status_color(status)).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn format_dimension(&self, name: &str, dim: &DimensionScore) -> String {
        let mut line = format!(
            "  {:<26} {:>2}/{:<2} {}\n",
            name,
            dim.score,
            dim.max,
            self.colorize(dim.status.label(), Self::status_color(dim.status))
        );

        if self.detailed {
            if let Some(sections) = &dim.found_sections {
                line.push_str(&format!("      sections: {}\n", sections.join(", ")));
            }
            if let Some(words) = dim.word_count {
                line.push_str(&format!("      words: {}\n", words));
            }
            if let Some(verbs) = dim.found_verbs {
                line.push_str(&format!("      action verbs: {}\n", verbs));
            }
        }
        line
    }

    fn format_score(&self, score: &ScoreReport, output: &mut String) {
        output.push_str(&format!(
            "ATS Score: {}/100 {}\n",
            score.overall_score,
            self.format_status_badge(score.overall_status)
        ));

        if !score.breakdown.is_empty() {
            output.push_str(&self.format_header("Score Breakdown", 3));
            for (name, dim) in score.ordered_breakdown() {
                output.push_str(&self.format_dimension(name, dim));
            }
        }

        if !score.issues.is_empty() {
            output.push_str(&self.format_header("Issues", 3));
            for issue in &score.issues {
                output.push_str(&format!("  ✗ {}\n", self.colorize(issue, Color::Red)));
            }
        }

        if !score.suggestions.is_empty() {
            output.push_str(&self.format_header("Suggestions", 3));
            for suggestion in &score.suggestions {
                output.push_str(&format!("  • {}\n", self.colorize(suggestion, Color::Cyan)));
            }
        }

        if self.detailed {
            let stats = &score.stats;
            output.push_str(&self.format_header("Statistics", 3));
            output.push_str(&format!(
                "  Words: {} | Characters: {} | Sections: {} | Action verbs: {}\n",
                stats.word_count, stats.character_count, stats.sections_found, stats.action_verbs_found
            ));
        }
    }

    fn format_comparison(&self, comparison: &ScoreComparison, output: &mut String) {
        output.push_str(&self.format_header("Before / After", 2));

        let change = if comparison.improvement >= 0 {
            self.colorize(&format!("+{}", comparison.improvement), Color::Green)
        } else {
            self.colorize(&comparison.improvement.to_string(), Color::Red)
        };
        output.push_str(&format!(
            "Original: {}/100 → Regenerated: {}/100 ({})\n",
            comparison.before.overall_score, comparison.after.overall_score, change
        ));

        for delta in &comparison.deltas {
            let marker = match delta.change {
                c if c > 0 => self.colorize(&format!("+{}", c), Color::Green),
                c if c < 0 => self.colorize(&c.to_string(), Color::Red),
                _ => self.colorize("=", Color::BrightBlack),
            };
            output.push_str(&format!(
                "  {:<26} {:>2} → {:>2} /{:<2} {}\n",
                delta.dimension, delta.before, delta.after, delta.max, marker
            ));
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("📄 RESUME ATS CHECK", 1));
        output.push_str(&format!(
            "File: {} | Generated: {}\n",
            report.metadata.file_name,
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        match &report.comparison {
            Some(comparison) => {
                output.push_str(&self.format_header("Regenerated Resume", 2));
                self.format_score(&comparison.after, &mut output);
                self.format_comparison(comparison, &mut output);
            }
            None => {
                output.push_str(&self.format_header("Analysis", 2));
                self.format_score(&report.score, &mut output);
            }
        }

        if let Some(path) = &report.metadata.output_file {
            output.push_str(&format!(
                "\n{} {}\n",
                self.colorize("Saved:", Color::Green),
                path
            ));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

/// Picks a formatter for the requested output format
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
}

impl ReportGenerator {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(true),
        }
    }

    pub fn generate_report(&self, report: &AnalysisReport, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new(true, false)
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    save_bytes_to_file(content.as_bytes(), file_path)
}

pub fn save_bytes_to_file(content: &[u8], file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: OutputFormat, resume_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    match format {
        OutputFormat::Console => format!("{}_ats_check{}.txt", base_name, timestamp_suffix),
        OutputFormat::Json => format!("{}_ats_check{}.json", base_name, timestamp_suffix),
    }
}

/// `<name>_ATS_Resume.pdf`, with anything but ASCII letters and digits in
/// the stem replaced by `_`.
pub fn suggest_generated_filename(name: &str) -> String {
    let name = match name.trim() {
        "" => "resume",
        name => name,
    };

    let stem: String = format!("{}_ATS_Resume", name)
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();

    format!("{}.pdf", stem)
}
