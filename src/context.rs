use crate::auth::Credential;
use crate::error::{DedupError, Result};

pub const ENV_WORKSPACE: &str = "BITBUCKET_WORKSPACE";
pub const ENV_REPO_SLUG: &str = "BITBUCKET_REPO_SLUG";
pub const ENV_BRANCH: &str = "BITBUCKET_BRANCH";
pub const ENV_PIPELINE_UUID: &str = "BITBUCKET_PIPELINE_UUID";
pub const ENV_BUILD_NUMBER: &str = "BITBUCKET_BUILD_NUMBER";
pub const ENV_BASIC_AUTH: &str = "TDP_BITBUCKET_BASIC_AUTH";

/// Raw run parameters as handed over by the command line / environment.
#[derive(Debug, Default, Clone)]
pub struct RunParams {
    pub workspace: Option<String>,
    pub repo_slug: Option<String>,
    pub branch: Option<String>,
    pub pipeline_uuid: Option<String>,
    pub build_number: Option<String>,
    pub basic_auth: Option<String>,
}

/// Identity of the running pipeline and the repository it belongs to.
///
/// Built once at startup and passed by reference to every operation.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub workspace: String,
    pub repository_slug: String,
    pub credential: Credential,
    pub current_branch: String,
    pub current_pipeline_id: String,
    pub current_build_number: i64,
}

impl RunContext {
    /// Validates the raw parameters.
    ///
    /// # Errors
    ///
    /// Returns [`DedupError::MissingVariable`] for the first absent or empty
    /// value, and [`DedupError::InvalidBuildNumber`] if the build number is not
    /// an integer.
    pub fn from_params(params: RunParams) -> Result<Self> {
        let workspace = required(params.workspace, ENV_WORKSPACE)?;
        let repository_slug = required(params.repo_slug, ENV_REPO_SLUG)?;
        let current_branch = required(params.branch, ENV_BRANCH)?;
        let current_pipeline_id = required(params.pipeline_uuid, ENV_PIPELINE_UUID)?;
        let build_number = required(params.build_number, ENV_BUILD_NUMBER)?;
        let credential = required(params.basic_auth, ENV_BASIC_AUTH)?;

        let current_build_number = build_number
            .trim()
            .parse::<i64>()
            .map_err(|_| DedupError::InvalidBuildNumber(build_number.clone()))?;

        Ok(Self {
            workspace,
            repository_slug,
            credential: Credential::from(credential),
            current_branch,
            current_pipeline_id,
            current_build_number,
        })
    }

    /// `workspace/repo` label used in logs and reports.
    pub fn repository_path(&self) -> String {
        format!("{}/{}", self.workspace, self.repository_slug)
    }
}

fn required(value: Option<String>, name: &'static str) -> Result<String> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(DedupError::MissingVariable(name))
}
