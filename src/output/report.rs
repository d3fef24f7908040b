//! Report structures for scored and regenerated resumes

use crate::processing::ats_scorer::ScoreReport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything printed for one CLI run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub metadata: ReportMetadata,
    pub score: ScoreReport,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison: Option<ScoreComparison>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub file_name: String,
    pub generated_at: DateTime<Utc>,
    pub tool_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_file: Option<String>,
}

impl ReportMetadata {
    pub fn new(file_name: &str) -> Self {
        Self {
            file_name: file_name.to_string(),
            generated_at: Utc::now(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            output_file: None,
        }
    }
}

impl AnalysisReport {
    pub fn new(file_name: &str, score: ScoreReport) -> Self {
        Self {
            metadata: ReportMetadata::new(file_name),
            score,
            comparison: None,
        }
    }

    pub fn with_comparison(mut self, comparison: ScoreComparison) -> Self {
        self.comparison = Some(comparison);
        self
    }

    pub fn with_output_file(mut self, path: &str) -> Self {
        self.metadata.output_file = Some(path.to_string());
        self
    }
}

/// Score movement of one rubric dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionDelta {
    pub dimension: String,
    pub before: u32,
    pub after: u32,
    pub max: u32,
    pub change: i64,
}

/// Original upload versus regenerated resume.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreComparison {
    pub before: ScoreReport,
    pub after: ScoreReport,
    pub improvement: i64,
    pub deltas: Vec<DimensionDelta>,
}

impl ScoreComparison {
    pub fn new(before: &ScoreReport, after: &ScoreReport) -> Self {
        // An empty original has no breakdown, so dimensions come from the new report.
        let deltas = after
            .ordered_breakdown()
            .into_iter()
            .map(|(name, new)| {
                let old = before.dimension(name).map(|d| d.score).unwrap_or(0);
                DimensionDelta {
                    dimension: name.to_string(),
                    before: old,
                    after: new.score,
                    max: new.max,
                    change: new.score as i64 - old as i64,
                }
            })
            .collect();

        Self {
            before: before.clone(),
            after: after.clone(),
            improvement: after.overall_score as i64 - before.overall_score as i64,
            deltas,
        }
    }

    pub fn improved(&self) -> bool {
        self.improvement > 0
    }

    /// Dimensions that lost points.
    pub fn regressions(&self) -> Vec<&DimensionDelta> {
        self.deltas.iter().filter(|d| d.change < 0).collect()
    }
}
