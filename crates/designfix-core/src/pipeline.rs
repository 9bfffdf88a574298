//! Pass contract and pipeline orchestration.
//!
//! Every pass implements [`Transform`]; the orchestrator holds them as
//! uniform trait objects, sorts them once per job, and runs them strictly
//! sequentially. Pass ordering is load-bearing: each pass mutates the one
//! shared tree in place, and later passes depend on the exact post-state of
//! earlier ones. That is also why there are no retries — after a partial
//! failure, re-running a pass risks double-applying corrections.

use crate::context::{ExecutionContext, MetricsRecord};
use crate::error::{PassError, PipelineError};
use crate::node::Element;

/// The uniform shape every conversion pass satisfies.
pub trait Transform {
    /// Unique pass name, used as the metrics key and in error reports.
    fn name(&self) -> &'static str;

    /// Execution priority; lower runs first. Registration order breaks ties.
    fn priority(&self) -> i32;

    /// Traverse the tree, apply zero or more in-place mutations, and return
    /// counters for the mutations actually performed.
    ///
    /// A pass must not mutate the context's primary font and must not
    /// reorder elements it is not correcting.
    fn execute(
        &self,
        tree: &mut Element,
        ctx: &mut ExecutionContext,
    ) -> Result<MetricsRecord, PassError>;
}

/// Run a set of passes over a tree.
///
/// Sorts `passes` by priority (stable, so ties keep registration order),
/// executes each to full completion before starting the next, and merges
/// each pass's metrics into `ctx.metrics` under the pass name.
///
/// The input tree is mutated in place. On a pass error the pipeline aborts
/// immediately — no further passes run — and the error is re-signaled
/// annotated with the failing pass's name.
pub fn run(
    tree: &mut Element,
    ctx: &mut ExecutionContext,
    mut passes: Vec<Box<dyn Transform>>,
) -> Result<(), PipelineError> {
    passes.sort_by_key(|p| p.priority());

    for pass in &passes {
        let metrics = pass
            .execute(tree, ctx)
            .map_err(|source| PipelineError::Pass {
                pass: pass.name().to_string(),
                source,
            })?;
        tracing::info!(
            pass = pass.name(),
            priority = pass.priority(),
            mutations = metrics.total(),
            "pass complete"
        );
        ctx.metrics.insert(pass.name().to_string(), metrics);
    }

    Ok(())
}
