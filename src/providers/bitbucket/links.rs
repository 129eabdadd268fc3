/// Web URL of a pipeline run's result page.
///
/// Bitbucket addresses results by build number, not UUID
/// (e.g. <https://bitbucket.org/acme/web/pipelines/results/42>).
pub fn pipeline_results_url(workspace: &str, repo: &str, build_number: i64) -> String {
    format!("https://bitbucket.org/{workspace}/{repo}/pipelines/results/{build_number}")
}
