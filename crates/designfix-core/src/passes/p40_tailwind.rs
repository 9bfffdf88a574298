//! Pass 40: Tailwind Optimizer
//!
//! Replaces arbitrary bracketed utility values with canonical scale steps,
//! running after the host's CSS-variable extraction (30) so variable-backed
//! values are already out of the class list. The actual rewriting lives in
//! [`crate::tailwind::canonicalize_classes`]; this pass only walks the tree
//! and applies the result.

use std::borrow::Cow;

use crate::context::{ExecutionContext, MetricsRecord};
use crate::error::PassError;
use crate::node::Element;
use crate::pipeline::Transform;
use crate::tailwind::canonicalize_classes;

/// Counter: elements whose class list was rewritten (once per element, not
/// per token).
pub const CLASSES_OPTIMIZED: &str = "classesOptimized";

/// Canonicalizes arbitrary-value utility classes.
pub struct TailwindOptimizer;

impl Transform for TailwindOptimizer {
    fn name(&self) -> &'static str {
        "tailwind-optimizer"
    }

    fn priority(&self) -> i32 {
        40
    }

    fn execute(
        &self,
        tree: &mut Element,
        _ctx: &mut ExecutionContext,
    ) -> Result<MetricsRecord, PassError> {
        let mut optimized = 0u64;
        tree.visit_mut(&mut |el| {
            // Expression-valued class lists report None and are never touched.
            let rewritten = match el.class_literal() {
                Some(class) => match canonicalize_classes(class) {
                    Cow::Owned(new) => Some(new),
                    Cow::Borrowed(_) => None,
                },
                None => None,
            };
            if let Some(new) = rewritten {
                el.set_class_literal(new);
                optimized += 1;
            }
        });

        let mut metrics = MetricsRecord::new();
        metrics.add(CLASSES_OPTIMIZED, optimized);
        Ok(metrics)
    }
}
