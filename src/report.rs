use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::providers::bitbucket::{CancelOutcome, PipelineSummary};

#[derive(Debug, Clone, Serialize)]
pub struct DedupReport {
    pub workspace: String,
    pub repository: String,
    pub branch: String,
    pub current_build_number: i64,
    pub checked_at: DateTime<Utc>,
    pub pipelines_listed: usize,
    pub dry_run: bool,
    pub cancellations: Vec<Cancellation>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Cancellation {
    pub build_number: i64,
    pub pipeline_id: String,
    pub state_name: String,
    pub link: String,
    pub outcome: Option<CancelOutcome>,
    pub succeeded: bool,
    pub message: String,
}

impl Cancellation {
    pub fn new(pipeline: &PipelineSummary, link: String, outcome: CancelOutcome) -> Self {
        Self {
            build_number: pipeline.build_number,
            pipeline_id: pipeline.id.clone(),
            state_name: pipeline.state_name.clone(),
            link,
            succeeded: outcome.succeeded(),
            message: outcome.message(),
            outcome: Some(outcome),
        }
    }

    /// A duplicate that was selected but not stopped (`--dry-run`).
    pub fn skipped(pipeline: &PipelineSummary, link: String) -> Self {
        Self {
            build_number: pipeline.build_number,
            pipeline_id: pipeline.id.clone(),
            state_name: pipeline.state_name.clone(),
            link,
            outcome: None,
            succeeded: false,
            message: "SKIPPED - dry run".to_string(),
        }
    }
}

impl DedupReport {
    pub fn found_duplicates(&self) -> bool {
        !self.cancellations.is_empty()
    }

    pub fn stopped_count(&self) -> usize {
        self.cancellations.iter().filter(|c| c.succeeded).count()
    }

    pub fn failed_count(&self) -> usize {
        self.cancellations
            .iter()
            .filter(|c| c.outcome.is_some() && !c.succeeded)
            .count()
    }
}
