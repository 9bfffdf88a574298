//! Pass 20: Post-Fixes
//!
//! Visual-fidelity corrections for generated markup, applied after the
//! host's structural cleaning (10) and before its CSS-variable extraction
//! (30). Four sub-fixes run per element in a fixed order, each inspecting
//! the attribute list as it stands when it runs:
//!
//! 1. multi-stop gradient — restores gradients flattened to two stops
//! 2. radial gradient — rewrites circular/elliptical fills mis-emitted as linear
//! 3. shape container — normalizes wrappers around vector primitives
//! 4. blend-mode verification — resets unsupported blend modes to `normal`
//!
//! None is fatal when inapplicable; each contributes zero to its counter.

use crate::context::{ExecutionContext, MetricsRecord};
use crate::error::PassError;
use crate::gradient;
use crate::node::{AttrValue, Element};
use crate::pipeline::Transform;

pub const MULTI_STOP_GRADIENTS: &str = "multiStopGradients";
pub const RADIAL_GRADIENTS: &str = "radialGradients";
pub const SHAPE_CONTAINERS: &str = "shapeContainers";
pub const BLEND_MODES_RESET: &str = "blendModesReset";

/// Vector primitives the design tool wraps in a marked container.
const SHAPES: &[&str] = &["rectangle", "ellipse", "star", "polygon"];

/// CSS blend modes the output stack supports. Anything else (the design
/// tool also emits `pass-through`, `linear-burn`, `linear-dodge`) is reset.
const SUPPORTED_BLEND_MODES: &[&str] = &[
    "normal",
    "multiply",
    "screen",
    "overlay",
    "darken",
    "lighten",
    "color-dodge",
    "color-burn",
    "hard-light",
    "soft-light",
    "difference",
    "exclusion",
    "hue",
    "saturation",
    "color",
    "luminosity",
];

/// Applies the four visual-fidelity sub-fixes to every element.
pub struct PostFixes;

impl Transform for PostFixes {
    fn name(&self) -> &'static str {
        "post-fixes"
    }

    fn priority(&self) -> i32 {
        20
    }

    fn execute(
        &self,
        tree: &mut Element,
        _ctx: &mut ExecutionContext,
    ) -> Result<MetricsRecord, PassError> {
        let (mut multi, mut radial, mut shapes, mut blends) = (0u64, 0u64, 0u64, 0u64);
        tree.visit_mut(&mut |el| {
            // Order fixed: later sub-fixes see earlier ones' mutations.
            if fix_multi_stop_gradient(el) {
                multi += 1;
            }
            if fix_radial_gradient(el) {
                radial += 1;
            }
            if fix_shape_container(el) {
                shapes += 1;
            }
            if verify_blend_mode(el) {
                blends += 1;
            }
        });

        let mut metrics = MetricsRecord::new();
        metrics.add(MULTI_STOP_GRADIENTS, multi);
        metrics.add(RADIAL_GRADIENTS, radial);
        metrics.add(SHAPE_CONTAINERS, shapes);
        metrics.add(BLEND_MODES_RESET, blends);
        Ok(metrics)
    }
}

// ---------------------------------------------------------------------------
// Class-token plumbing
// ---------------------------------------------------------------------------

/// Rewrite individual class tokens via `f`; returns whether anything changed.
fn rewrite_tokens<F: FnMut(&str) -> Option<String>>(el: &mut Element, mut f: F) -> bool {
    let Some(class) = el.class_literal() else {
        return false;
    };
    let mut changed = false;
    let tokens: Vec<String> = class
        .split_whitespace()
        .map(|token| match f(token) {
            Some(replacement) => {
                changed = true;
                replacement
            }
            None => token.to_string(),
        })
        .collect();
    if changed {
        el.set_class_literal(tokens.join(" "));
    }
    changed
}

/// CSS payload of an arbitrary `bg-[...]` token. Tailwind encodes spaces in
/// arbitrary values as underscores; decode them here.
fn bg_token_payload(token: &str) -> Option<String> {
    let inner = token.strip_prefix("bg-[")?.strip_suffix(']')?;
    Some(inner.replace('_', " "))
}

/// Re-encode a CSS value as an arbitrary `bg-[...]` token.
fn bg_payload_to_token(css: &str) -> String {
    format!("bg-[{}]", css.replace(' ', "_"))
}

// ---------------------------------------------------------------------------
// Sub-fix 1: multi-stop gradient
// ---------------------------------------------------------------------------

/// The generator flattens gradients to their first and last stop when it
/// emits the `bg-[linear-gradient(...)]` token; the full gradient survives
/// in a `data-gradient` attribute. When that original has more than two
/// stops, restore it into the token and drop the marker attribute.
fn fix_multi_stop_gradient(el: &mut Element) -> bool {
    let full = match el.attr_literal("data-gradient") {
        Some(s) => s.to_string(),
        None => return false,
    };
    let full_stops = match gradient::linear_stop_count(&full) {
        Some(n) => n,
        None => return false,
    };
    if full_stops <= 2 {
        return false;
    }

    let replaced = rewrite_tokens(el, |token| {
        let css = bg_token_payload(token)?;
        let emitted = gradient::linear_stop_count(&css)?;
        (emitted < full_stops).then(|| bg_payload_to_token(&full))
    });
    if replaced {
        el.remove_attr("data-gradient");
    }
    replaced
}

// ---------------------------------------------------------------------------
// Sub-fix 2: radial gradient
// ---------------------------------------------------------------------------

/// A `data-fill-type` of `radial`/`elliptical` marks a fill the generator
/// mis-emitted as a linear gradient. Rewrite the token to the radial form
/// and drop the marker attribute.
fn fix_radial_gradient(el: &mut Element) -> bool {
    let elliptical = match el.attr_literal("data-fill-type") {
        Some("radial") => false,
        Some("elliptical") => true,
        _ => return false,
    };

    let replaced = rewrite_tokens(el, |token| {
        let css = bg_token_payload(token)?;
        let radial = gradient::to_radial(&css, elliptical)?;
        Some(bg_payload_to_token(&radial))
    });
    if replaced {
        el.remove_attr("data-fill-type");
    }
    replaced
}

// ---------------------------------------------------------------------------
// Sub-fix 3: shape container
// ---------------------------------------------------------------------------

/// Normalize a wrapper marked with `data-shape`: `overflow-hidden` clips
/// vector strokes and becomes `overflow-visible`; ellipse wrappers need
/// `rounded-full` to render as drawn.
fn fix_shape_container(el: &mut Element) -> bool {
    let shape = match el.attr_literal("data-shape") {
        Some(s) if SHAPES.contains(&s) => s.to_string(),
        _ => return false,
    };

    let mut mutated = rewrite_tokens(el, |token| {
        (token == "overflow-hidden").then(|| "overflow-visible".to_string())
    });

    if shape == "ellipse" && !has_class_token(el, "rounded-full") && !has_dynamic_class(el) {
        let class = el.class_literal().unwrap_or("").to_string();
        let appended = if class.is_empty() {
            "rounded-full".to_string()
        } else {
            format!("{class} rounded-full")
        };
        el.set_class_literal(appended);
        mutated = true;
    }
    mutated
}

fn has_class_token(el: &Element, wanted: &str) -> bool {
    el.class_literal()
        .is_some_and(|c| c.split_whitespace().any(|t| t == wanted))
}

fn has_dynamic_class(el: &Element) -> bool {
    matches!(
        el.attr("className").or_else(|| el.attr("class")),
        Some(v) if !matches!(v, AttrValue::Literal(_))
    )
}

// ---------------------------------------------------------------------------
// Sub-fix 4: blend-mode verification
// ---------------------------------------------------------------------------

/// Validate `mix-blend-*` class tokens and `mixBlendMode` style entries
/// against the supported set; reset anything else to the non-blending mode.
fn verify_blend_mode(el: &mut Element) -> bool {
    let mut mutated = rewrite_tokens(el, |token| {
        let mode = token.strip_prefix("mix-blend-")?;
        (!SUPPORTED_BLEND_MODES.contains(&mode)).then(|| "mix-blend-normal".to_string())
    });

    if let Some(style) = el.style_mut() {
        let unsupported = style
            .get("mixBlendMode")
            .is_some_and(|m| !SUPPORTED_BLEND_MODES.contains(&m));
        if unsupported {
            style.set("mixBlendMode", "normal");
            mutated = true;
        }
    }
    mutated
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::StyleDecl;
    use pretty_assertions::assert_eq;

    fn run(el: &mut Element) -> MetricsRecord {
        PostFixes
            .execute(el, &mut ExecutionContext::new())
            .unwrap()
    }

    #[test]
    fn test_multi_stop_gradient_restored() {
        let mut el = Element::with_class("div", "bg-[linear-gradient(90deg,#f00_0%,#00f_100%)]");
        el.push_attr(
            "data-gradient",
            AttrValue::Literal("linear-gradient(90deg, #f00 0%, #0f0 50%, #00f 100%)".into()),
        );

        let metrics = run(&mut el);

        assert_eq!(metrics.get(MULTI_STOP_GRADIENTS), 1);
        assert_eq!(
            el.class_literal(),
            Some("bg-[linear-gradient(90deg,_#f00_0%,_#0f0_50%,_#00f_100%)]")
        );
        assert!(el.attr("data-gradient").is_none());
    }

    #[test]
    fn test_two_stop_gradient_left_alone() {
        let mut el = Element::with_class("div", "bg-[linear-gradient(90deg,#f00_0%,#00f_100%)]");
        el.push_attr(
            "data-gradient",
            AttrValue::Literal("linear-gradient(90deg, #f00 0%, #00f 100%)".into()),
        );

        let metrics = run(&mut el);

        assert!(metrics.is_empty());
        assert!(el.attr("data-gradient").is_some());
    }

    #[test]
    fn test_radial_only_increments_radial_counter() {
        let mut el = Element::with_class("div", "bg-[linear-gradient(90deg,#a_0%,#b_100%)]");
        el.push_attr("data-fill-type", AttrValue::Literal("radial".into()));

        let metrics = run(&mut el);

        assert_eq!(metrics.get(RADIAL_GRADIENTS), 1);
        assert_eq!(metrics.get(MULTI_STOP_GRADIENTS), 0);
        assert_eq!(metrics.get(SHAPE_CONTAINERS), 0);
        assert_eq!(
            el.class_literal(),
            Some("bg-[radial-gradient(circle_at_center,_#a_0%,_#b_100%)]")
        );
        assert!(el.attr("data-fill-type").is_none());
    }

    #[test]
    fn test_elliptical_fill() {
        let mut el = Element::with_class("div", "bg-[linear-gradient(#a,#b)]");
        el.push_attr("data-fill-type", AttrValue::Literal("elliptical".into()));

        run(&mut el);

        assert_eq!(
            el.class_literal(),
            Some("bg-[radial-gradient(ellipse_at_center,_#a,_#b)]")
        );
    }

    #[test]
    fn test_flattened_radial_gets_both_fixes() {
        // Multi-stop restore runs first, so the radial rewrite sees the
        // full stop list.
        let mut el = Element::with_class("div", "bg-[linear-gradient(90deg,#a_0%,#c_100%)]");
        el.push_attr(
            "data-gradient",
            AttrValue::Literal("linear-gradient(90deg, #a 0%, #b 50%, #c 100%)".into()),
        );
        el.push_attr("data-fill-type", AttrValue::Literal("radial".into()));

        let metrics = run(&mut el);

        assert_eq!(metrics.get(MULTI_STOP_GRADIENTS), 1);
        assert_eq!(metrics.get(RADIAL_GRADIENTS), 1);
        assert_eq!(
            el.class_literal(),
            Some("bg-[radial-gradient(circle_at_center,_#a_0%,_#b_50%,_#c_100%)]")
        );
    }

    #[test]
    fn test_shape_container_overflow_and_ellipse() {
        let mut el = Element::with_class("div", "relative overflow-hidden");
        el.push_attr("data-shape", AttrValue::Literal("ellipse".into()));

        let metrics = run(&mut el);

        assert_eq!(metrics.get(SHAPE_CONTAINERS), 1);
        assert_eq!(
            el.class_literal(),
            Some("relative overflow-visible rounded-full")
        );
    }

    #[test]
    fn test_shape_container_star_keeps_rounding_alone() {
        let mut el = Element::with_class("div", "overflow-hidden");
        el.push_attr("data-shape", AttrValue::Literal("star".into()));

        run(&mut el);
        assert_eq!(el.class_literal(), Some("overflow-visible"));
    }

    #[test]
    fn test_unknown_shape_skipped() {
        let mut el = Element::with_class("div", "overflow-hidden");
        el.push_attr("data-shape", AttrValue::Literal("blob".into()));

        let metrics = run(&mut el);
        assert!(metrics.is_empty());
        assert_eq!(el.class_literal(), Some("overflow-hidden"));
    }

    #[test]
    fn test_unsupported_blend_mode_reset() {
        let mut el = Element::with_class("div", "mix-blend-linear-burn");
        let metrics = run(&mut el);

        assert_eq!(metrics.get(BLEND_MODES_RESET), 1);
        assert_eq!(el.class_literal(), Some("mix-blend-normal"));
    }

    #[test]
    fn test_supported_blend_mode_untouched() {
        let mut el = Element::with_class("div", "mix-blend-multiply");
        let metrics = run(&mut el);

        assert!(metrics.is_empty());
        assert_eq!(el.class_literal(), Some("mix-blend-multiply"));
    }

    #[test]
    fn test_blend_mode_style_entry_reset() {
        let mut el = Element::new("div");
        let mut decl = StyleDecl::new();
        decl.push("mixBlendMode", "pass-through");
        el.push_attr("style", AttrValue::Style(decl));

        let metrics = run(&mut el);

        assert_eq!(metrics.get(BLEND_MODES_RESET), 1);
        assert_eq!(el.style().unwrap().get("mixBlendMode"), Some("normal"));
    }

    #[test]
    fn test_idempotent_on_own_output() {
        let mut el = Element::with_class(
            "div",
            "overflow-hidden mix-blend-linear-burn bg-[linear-gradient(90deg,#a_0%,#c_100%)]",
        );
        el.push_attr("data-shape", AttrValue::Literal("ellipse".into()));
        el.push_attr(
            "data-gradient",
            AttrValue::Literal("linear-gradient(90deg, #a 0%, #b 50%, #c 100%)".into()),
        );

        let first = run(&mut el);
        assert_eq!(first.total(), 3);

        let snapshot = el.clone();
        let second = run(&mut el);
        assert!(second.is_empty());
        assert_eq!(el, snapshot);
    }

    #[test]
    fn test_plain_element_contributes_nothing() {
        let mut el = Element::with_class("div", "flex items-center gap-2");
        let metrics = run(&mut el);
        assert!(metrics.is_empty());
    }
}
