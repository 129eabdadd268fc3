use url::Url;

use crate::error::{DedupError, Result};

use super::transport::HttpTransport;

pub const DEFAULT_API_URL: &str = "https://api.bitbucket.org/2.0";
pub(super) const PAGE_SIZE: u32 = 10;

/// Bitbucket Cloud REST client.
///
/// Holds no repository state; the repository and credential come from the
/// [`crate::context::RunContext`] passed to each call.
pub struct BitbucketClient<T: HttpTransport> {
    pub(super) transport: T,
    pub api_url: Url,
}

impl<T: HttpTransport> BitbucketClient<T> {
    pub fn new(base_url: &str, transport: T) -> Result<Self> {
        let api_url = Url::parse(base_url)
            .map_err(|e| DedupError::Config(format!("Invalid base URL: {e}")))?;

        if api_url.cannot_be_a_base() {
            return Err(DedupError::Config(format!(
                "Base URL cannot carry a path: {base_url}"
            )));
        }

        Ok(Self { transport, api_url })
    }

    #[cfg(test)]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Construct `{api}/repositories/{workspace}/{repo}/pipelines/{tail..}`.
    ///
    /// Every segment is percent-encoded, so pipeline UUIDs keep their braces
    /// as `%7B`/`%7D`.
    pub(super) fn pipelines_url(&self, workspace: &str, repo: &str, tail: &[&str]) -> Result<Url> {
        let mut url = self.api_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| DedupError::Config(format!("Invalid API URL: {}", self.api_url)))?;
            segments
                .pop_if_empty()
                .extend(["repositories", workspace, repo, "pipelines"])
                .extend(tail.iter().copied());
        }
        Ok(url)
    }
}
