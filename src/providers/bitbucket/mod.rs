mod client;
mod duplicates;
mod links;
mod provider;
mod types;

pub use client::DEFAULT_API_URL;
pub use provider::BitbucketProvider;
pub use types::{CancelOutcome, PipelineSummary};
