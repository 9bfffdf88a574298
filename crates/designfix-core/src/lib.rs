//! Convert generated visual-design markup into idiomatic source code by
//! running a parsed markup tree through an ordered set of rewrite passes.
//!
//! The external parser produces an [`Element`] tree (exchanged as JSON via
//! serde); the pipeline mutates it in place and the external printer
//! serializes the result back to source text. Three passes ship here:
//!
//! | Priority | Pass | Corrects |
//! |---------:|------|----------|
//! | 0  | [`FontDetection`] | embedded font specs → inline style declarations |
//! | 20 | [`PostFixes`] | gradient, shape and blend-mode fidelity regressions |
//! | 40 | [`TailwindOptimizer`] | arbitrary utility values → canonical scale steps |
//!
//! Priorities 10 and 30 are reserved for the host's structural-cleaning and
//! CSS-variable-extraction passes. Pass ordering is load-bearing: every pass
//! mutates the one shared tree, and each depends on the exact post-state of
//! the passes before it.
//!
//! ```
//! use designfix_core::{default_passes, Element, ExecutionContext};
//!
//! let mut tree = Element::with_class("div", "gap-[8px] w-[96px] rounded-[4px]");
//! let mut ctx = ExecutionContext::new();
//! designfix_core::run(&mut tree, &mut ctx, default_passes()).unwrap();
//!
//! assert_eq!(tree.class_literal(), Some("gap-2 w-24 rounded"));
//! assert_eq!(ctx.report()["tailwind-optimizer"].get("classesOptimized"), 1);
//! ```

pub mod context;
pub mod error;
pub mod gradient;
pub mod node;
pub mod passes;
pub mod pipeline;
pub mod tailwind;

pub use context::{ExecutionContext, MetricsRecord, PrimaryFont};
pub use error::{PassError, PipelineError};
pub use node::{Attr, AttrValue, Element, StyleDecl};
pub use passes::p0_font_detection::FontDetection;
pub use passes::p20_post_fixes::PostFixes;
pub use passes::p40_tailwind::TailwindOptimizer;
pub use pipeline::{run, Transform};
pub use tailwind::canonicalize_classes;

/// The standard pass set, in registration order.
pub fn default_passes() -> Vec<Box<dyn Transform>> {
    vec![
        Box::new(FontDetection),
        Box::new(PostFixes),
        Box::new(TailwindOptimizer),
    ]
}

/// Run the standard pass set over a tree.
pub fn process(tree: &mut Element, ctx: &mut ExecutionContext) -> Result<(), PipelineError> {
    run(tree, ctx, default_passes())
}
