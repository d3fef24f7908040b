//! Report structures and formatters

pub mod report;
pub mod formatter;

pub use formatter::{OutputFormatter, ReportGenerator};
pub use report::{AnalysisReport, ScoreComparison};
