use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// A Bitbucket pipeline run as reported by the listing endpoint.
///
/// Snapshot only; nothing here is mutated after decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ApiPipeline")]
pub struct PipelineSummary {
    /// Pipeline UUID including braces (e.g. `{4d0c...}`)
    pub id: String,
    /// Per-repository build number, monotonically increasing
    pub build_number: i64,
    /// State name (e.g. "PENDING", "IN_PROGRESS", "COMPLETED")
    pub state_name: String,
    /// Branch the pipeline runs for, empty for non-branch targets
    pub target_branch: String,
}

/// First page of the pipeline listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListResult {
    #[serde(default)]
    pub page: u32,
    #[serde(default, rename = "pagelen")]
    pub page_size: u32,
    #[serde(default, rename = "values")]
    pub items: Vec<PipelineSummary>,
}

#[derive(Deserialize)]
struct ApiPipeline {
    uuid: String,
    build_number: i64,
    state: ApiState,
    #[serde(default)]
    target: ApiTarget,
}

#[derive(Deserialize)]
struct ApiState {
    name: String,
}

#[derive(Default, Deserialize)]
struct ApiTarget {
    ref_name: Option<String>,
}

impl From<ApiPipeline> for PipelineSummary {
    fn from(api: ApiPipeline) -> Self {
        Self {
            id: api.uuid,
            build_number: api.build_number,
            state_name: api.state.name,
            target_branch: api.target.ref_name.unwrap_or_default(),
        }
    }
}

/// Result of a single stop request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum CancelOutcome {
    Stopped,
    AlreadyStopped,
    NotFound,
    UnexpectedStatus(u16),
    Transport(String),
}

impl CancelOutcome {
    /// Classifies the status returned by `stopPipeline`.
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::NO_CONTENT => Self::Stopped,
            StatusCode::BAD_REQUEST => Self::AlreadyStopped,
            StatusCode::NOT_FOUND => Self::NotFound,
            other => Self::UnexpectedStatus(other.as_u16()),
        }
    }

    pub fn succeeded(&self) -> bool {
        matches!(self, Self::Stopped)
    }

    pub fn message(&self) -> String {
        match self {
            Self::Stopped => "OK".to_string(),
            Self::AlreadyStopped => "FAILED - Pipeline already stopped".to_string(),
            Self::NotFound => "FAILED - Pipeline not found".to_string(),
            Self::UnexpectedStatus(code) => format!("FAILED - Undefined status {code}"),
            Self::Transport(error) => format!("FAILED - {error}"),
        }
    }
}
