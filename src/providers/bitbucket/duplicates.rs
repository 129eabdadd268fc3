use log::debug;

use super::types::PipelineSummary;
use crate::context::RunContext;

/// State name Bitbucket reports for finished pipelines, whatever the result.
pub const COMPLETED_STATE: &str = "COMPLETED";

/// Whether `pipeline` is an older, still-active run of the current branch.
///
/// All four must hold:
/// - same target branch as the running pipeline
/// - state is not `COMPLETED` (case-sensitive)
/// - not the running pipeline itself
/// - strictly lower build number
pub fn is_stale_duplicate(pipeline: &PipelineSummary, context: &RunContext) -> bool {
    pipeline.target_branch == context.current_branch
        && pipeline.state_name != COMPLETED_STATE
        && pipeline.id != context.current_pipeline_id
        && pipeline.build_number < context.current_build_number
}

/// Select every stale duplicate, keeping listing order.
pub fn select_duplicates<'a>(
    pipelines: &'a [PipelineSummary],
    context: &RunContext,
) -> Vec<&'a PipelineSummary> {
    pipelines
        .iter()
        .filter(|pipeline| {
            let selected = is_stale_duplicate(pipeline, context);
            debug!(
                "Pipeline #{} {} on {:?} [{}]: {}",
                pipeline.build_number,
                pipeline.id,
                pipeline.target_branch,
                pipeline.state_name,
                if selected { "duplicate" } else { "kept" }
            );
            selected
        })
        .collect()
}
