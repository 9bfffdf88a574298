//! Error types for the conversion pipeline.

use thiserror::Error;

/// An unrecovered failure inside a single pass's traversal.
///
/// Pattern mismatches and unexpected attribute shapes are NOT errors — passes
/// skip those elements silently. This type is reserved for failures that make
/// continuing the traversal unsound.
#[derive(Debug, Error)]
pub enum PassError {
    #[error("traversal failed at <{tag}>: {message}")]
    Traversal { tag: String, message: String },
}

/// Top-level pipeline failure.
///
/// The tree may already carry mutations from the failing pass and from every
/// earlier pass; none of them are rolled back and the job must not be
/// re-run against the same tree.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("pass '{pass}' failed: {source}")]
    Pass {
        /// Name of the pass that raised the error.
        pass: String,
        #[source]
        source: PassError,
    },
}

impl PipelineError {
    /// Name of the failing pass, for operator-facing fault localization.
    pub fn pass_name(&self) -> &str {
        match self {
            PipelineError::Pass { pass, .. } => pass,
        }
    }
}
