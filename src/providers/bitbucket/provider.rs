use chrono::Utc;
use log::{info, warn};

use super::client::{BitbucketClient, HttpTransport, ReqwestTransport};
use super::duplicates::select_duplicates;
use super::links::pipeline_results_url;
use crate::context::RunContext;
use crate::error::Result;
use crate::output::ListingProgress;
use crate::report::{Cancellation, DedupReport};

/// Finds and stops superseded pipelines of the current branch.
pub struct BitbucketProvider<T: HttpTransport> {
    client: BitbucketClient<T>,
}

impl BitbucketProvider<ReqwestTransport> {
    /// Creates a provider talking to the Bitbucket REST API over HTTPS.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the base URL is
    /// not a valid API root.
    pub fn new(base_url: &str, user_agent: &str) -> Result<Self> {
        let transport = ReqwestTransport::new(user_agent)?;
        let client = BitbucketClient::new(base_url, transport)?;

        Ok(Self::with_client(client))
    }
}

impl<T: HttpTransport> BitbucketProvider<T> {
    pub fn with_client(client: BitbucketClient<T>) -> Self {
        Self { client }
    }

    /// Lists the newest pipelines and stops every stale duplicate, one at a
    /// time in listing order.
    ///
    /// `on_cancel` is called right after each duplicate has been handled so
    /// progress can be reported while the loop runs. With `dry_run` no stop
    /// request is sent.
    ///
    /// # Errors
    ///
    /// Only listing failures are returned. A failed stop request is recorded
    /// in the report and the loop moves on.
    pub async fn cancel_duplicates<F>(
        &self,
        context: &RunContext,
        dry_run: bool,
        mut on_cancel: F,
    ) -> Result<DedupReport>
    where
        F: FnMut(&Cancellation),
    {
        info!(
            "Looking for duplicates of pipeline #{} on {} in {}",
            context.current_build_number,
            context.current_branch,
            context.repository_path()
        );

        let progress = ListingProgress::start(&context.current_branch);

        let listing = match self.client.list_pipelines(context).await {
            Ok(listing) => listing,
            Err(e) => {
                progress.fail();
                return Err(e);
            }
        };

        let duplicates = select_duplicates(&listing.items, context);
        progress.finish(listing.items.len(), duplicates.len());

        info!(
            "{} of {} listed pipelines are stale duplicates",
            duplicates.len(),
            listing.items.len()
        );

        let mut cancellations = Vec::with_capacity(duplicates.len());

        for pipeline in duplicates {
            let link = pipeline_results_url(
                &context.workspace,
                &context.repository_slug,
                pipeline.build_number,
            );

            let cancellation = if dry_run {
                info!("Dry run, leaving pipeline #{} running", pipeline.build_number);
                Cancellation::skipped(pipeline, link)
            } else {
                info!("Stopping pipeline #{} {}", pipeline.build_number, pipeline.id);
                let outcome = self.client.stop_pipeline(context, &pipeline.id).await;
                if !outcome.succeeded() {
                    warn!(
                        "Pipeline #{} was not stopped: {}",
                        pipeline.build_number,
                        outcome.message()
                    );
                }
                Cancellation::new(pipeline, link, outcome)
            };

            on_cancel(&cancellation);
            cancellations.push(cancellation);
        }

        Ok(DedupReport {
            workspace: context.workspace.clone(),
            repository: context.repository_slug.clone(),
            branch: context.current_branch.clone(),
            current_build_number: context.current_build_number,
            checked_at: Utc::now(),
            pipelines_listed: listing.items.len(),
            dry_run,
            cancellations,
        })
    }
}

#[cfg(test)]
mod tests {
    use reqwest::Method;

    use super::super::client::fake::ScriptedTransport;
    use super::super::client::DEFAULT_API_URL;
    use super::super::types::CancelOutcome;
    use super::*;
    use crate::auth::Credential;
    use crate::error::DedupError;

    fn context() -> RunContext {
        RunContext {
            workspace: "acme".to_string(),
            repository_slug: "web".to_string(),
            credential: Credential::from("token"),
            current_branch: "main".to_string(),
            current_pipeline_id: "y".to_string(),
            current_build_number: 5,
        }
    }

    fn provider(transport: ScriptedTransport) -> BitbucketProvider<ScriptedTransport> {
        BitbucketProvider::with_client(BitbucketClient::new(DEFAULT_API_URL, transport).unwrap())
    }

    fn page(entries: &[(&str, i64, &str, &str)]) -> String {
        let values: Vec<_> = entries
            .iter()
            .map(|(uuid, build_number, state, branch)| {
                serde_json::json!({
                    "uuid": uuid,
                    "build_number": build_number,
                    "state": {"name": state},
                    "target": {"ref_name": branch},
                })
            })
            .collect();
        serde_json::json!({"page": 1, "pagelen": 10, "values": values}).to_string()
    }

    #[tokio::test]
    async fn stops_running_older_pipeline_on_same_branch() {
        let body = page(&[("x", 3, "RUNNING", "main")]);
        let provider = provider(ScriptedTransport::new().respond(200, &body).respond(204, ""));

        let report = provider
            .cancel_duplicates(&context(), false, |_| {})
            .await
            .unwrap();

        assert_eq!(report.pipelines_listed, 1);
        assert_eq!(report.cancellations.len(), 1);
        let cancellation = &report.cancellations[0];
        assert_eq!(cancellation.pipeline_id, "x");
        assert_eq!(cancellation.build_number, 3);
        assert_eq!(cancellation.outcome, Some(CancelOutcome::Stopped));
        assert!(cancellation.succeeded);
        assert_eq!(cancellation.message, "OK");
        assert_eq!(
            cancellation.link,
            "https://bitbucket.org/acme/web/pipelines/results/3"
        );
        assert_eq!(report.stopped_count(), 1);
    }

    #[tokio::test]
    async fn completed_newer_and_self_pipelines_are_left_alone() {
        let body = page(&[
            ("y", 5, "IN_PROGRESS", "main"),
            ("n", 7, "RUNNING", "main"),
            ("c", 3, "COMPLETED", "main"),
        ]);
        let transport = ScriptedTransport::new().respond(200, &body);
        let provider = provider(transport);

        let report = provider
            .cancel_duplicates(&context(), false, |_| {})
            .await
            .unwrap();

        assert!(!report.found_duplicates());
        assert_eq!(report.pipelines_listed, 3);
        assert_eq!(provider.client.transport().requests().len(), 1);
    }

    #[tokio::test]
    async fn failed_stop_does_not_abort_the_loop() {
        let body = page(&[
            ("b", 4, "RUNNING", "main"),
            ("a", 3, "PENDING", "main"),
        ]);
        let provider = provider(
            ScriptedTransport::new()
                .respond(200, &body)
                .respond(400, "")
                .respond(204, ""),
        );

        let mut seen = Vec::new();
        let report = provider
            .cancel_duplicates(&context(), false, |c| seen.push(c.pipeline_id.clone()))
            .await
            .unwrap();

        assert_eq!(seen, vec!["b", "a"]);
        assert_eq!(
            report.cancellations[0].outcome,
            Some(CancelOutcome::AlreadyStopped)
        );
        assert_eq!(
            report.cancellations[0].message,
            "FAILED - Pipeline already stopped"
        );
        assert_eq!(report.cancellations[1].outcome, Some(CancelOutcome::Stopped));
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.stopped_count(), 1);
    }

    #[tokio::test]
    async fn transport_failure_on_stop_is_recorded() {
        let body = page(&[("b", 4, "RUNNING", "main"), ("a", 3, "RUNNING", "main")]);
        let provider = provider(
            ScriptedTransport::new()
                .respond(200, &body)
                .fail("connection reset")
                .respond(204, ""),
        );

        let report = provider
            .cancel_duplicates(&context(), false, |_| {})
            .await
            .unwrap();

        assert!(matches!(
            report.cancellations[0].outcome,
            Some(CancelOutcome::Transport(_))
        ));
        assert!(report.cancellations[1].succeeded);
    }

    #[tokio::test]
    async fn listing_failure_is_returned() {
        let provider = provider(ScriptedTransport::new().respond(503, ""));

        let err = provider
            .cancel_duplicates(&context(), false, |_| {})
            .await
            .unwrap_err();

        assert!(matches!(err, DedupError::UnexpectedStatus { status: 503, .. }));
    }

    #[tokio::test]
    async fn stops_duplicates_over_http() {
        let mut server = mockito::Server::new_async().await;
        let body = page(&[
            ("y", 5, "IN_PROGRESS", "main"),
            ("x", 3, "RUNNING", "main"),
            ("z", 2, "RUNNING", "develop"),
        ]);
        let list = server
            .mock("GET", "/repositories/acme/web/pipelines/")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("page".into(), "1".into()),
                mockito::Matcher::UrlEncoded("pagelen".into(), "10".into()),
                mockito::Matcher::UrlEncoded("sort".into(), "-created_on".into()),
            ]))
            .match_header("authorization", "Basic token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;
        let stop = server
            .mock("POST", "/repositories/acme/web/pipelines/x/stopPipeline")
            .match_header("authorization", "Basic token")
            .with_status(204)
            .expect(1)
            .create_async()
            .await;

        let provider = BitbucketProvider::new(&server.url(), "pipeline-dedup-test").unwrap();
        let report = provider
            .cancel_duplicates(&context(), false, |_| {})
            .await
            .unwrap();

        list.assert_async().await;
        stop.assert_async().await;
        assert_eq!(report.cancellations.len(), 1);
        assert!(report.cancellations[0].succeeded);
    }

    #[tokio::test]
    async fn dry_run_sends_no_stop_requests() {
        let body = page(&[("x", 3, "RUNNING", "main")]);
        let provider = provider(ScriptedTransport::new().respond(200, &body));

        let report = provider
            .cancel_duplicates(&context(), true, |_| {})
            .await
            .unwrap();

        let requests = provider.client.transport().requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::GET);
        assert!(report.dry_run);
        assert_eq!(report.cancellations.len(), 1);
        assert_eq!(report.cancellations[0].outcome, None);
        assert_eq!(report.failed_count(), 0);
    }
}
