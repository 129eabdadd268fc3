use log::{debug, warn};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Method, StatusCode};

use super::core::{BitbucketClient, PAGE_SIZE};
use super::transport::{HttpRequest, HttpTransport};
use crate::context::RunContext;
use crate::error::{DedupError, Result};
use crate::providers::bitbucket::types::{CancelOutcome, ListResult};

impl<T: HttpTransport> BitbucketClient<T> {
    /// Fetch the first page of pipelines, newest first.
    ///
    /// Only one page of [`PAGE_SIZE`] entries is requested; older pipelines
    /// are never seen.
    ///
    /// # Errors
    ///
    /// Every failure is fatal for the run: transport errors, any status other
    /// than `200 OK`, and bodies that do not decode as a pipeline page.
    pub async fn list_pipelines(&self, context: &RunContext) -> Result<ListResult> {
        let mut url =
            self.pipelines_url(&context.workspace, &context.repository_slug, &[""])?;
        url.query_pairs_mut()
            .append_pair("page", "1")
            .append_pair("pagelen", &PAGE_SIZE.to_string())
            .append_pair("sort", "-created_on");

        debug!("GET {url}");

        let response = self
            .transport
            .execute(HttpRequest {
                method: Method::GET,
                url,
                headers: vec![
                    (ACCEPT, "application/json".to_string()),
                    (AUTHORIZATION, context.credential.header_value()),
                ],
            })
            .await?;

        if response.status != StatusCode::OK {
            return Err(DedupError::UnexpectedStatus {
                status: response.status.as_u16(),
                expected: StatusCode::OK.as_u16(),
            });
        }

        let listing: ListResult = serde_json::from_str(&response.body)?;
        debug!(
            "Listed {} pipelines (page {}, pagelen {})",
            listing.items.len(),
            listing.page,
            listing.page_size
        );

        Ok(listing)
    }

    /// Ask Bitbucket to stop one pipeline.
    ///
    /// Never fails; problems are folded into the returned [`CancelOutcome`].
    pub async fn stop_pipeline(&self, context: &RunContext, pipeline_id: &str) -> CancelOutcome {
        let url = match self.pipelines_url(
            &context.workspace,
            &context.repository_slug,
            &[pipeline_id, "stopPipeline"],
        ) {
            Ok(url) => url,
            Err(e) => return CancelOutcome::Transport(e.to_string()),
        };

        debug!("POST {url}");

        let request = HttpRequest {
            method: Method::POST,
            url,
            headers: vec![(AUTHORIZATION, context.credential.header_value())],
        };

        match self.transport.execute(request).await {
            Ok(response) => CancelOutcome::from_status(response.status),
            Err(e) => {
                warn!("Stop request for pipeline {pipeline_id} failed: {e}");
                CancelOutcome::Transport(e.to_string())
            }
        }
    }
}
