//! Pass 0: Font Detection
//!
//! The generator embeds font specifications in the class list as
//! `font-['<family>:<style>',sans-serif]`. Structural cleaning (priority 10,
//! registered by the host) strips that token, so this pass runs first and
//! converts the specification into an explicit inline style declaration
//! while the token is still present.
//!
//! If upstream detected no primary font, the pass performs no work for the
//! whole tree.

use std::sync::OnceLock;

use regex::Regex;

use crate::context::{ExecutionContext, MetricsRecord};
use crate::error::PassError;
use crate::node::{AttrValue, Element, StyleDecl};
use crate::pipeline::Transform;

/// Counter: elements where a font specification was found.
pub const FONTS_CONVERTED: &str = "fontsConverted";

fn font_spec_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"font-\['([^':\]]+):([^'\]]+)',\s*sans-serif\]").expect("valid regex")
    })
}

/// Map a design-tool style name to a numeric CSS font weight.
/// Unrecognized style names fall back to 400.
fn weight_for_style(style: &str) -> u32 {
    match style {
        "Thin" => 100,
        "ExtraLight" => 200,
        "Light" => 300,
        "Regular" => 400,
        "Medium" => 500,
        "SemiBold" => 600,
        "Bold" => 700,
        "ExtraBold" => 800,
        "Black" => 900,
        _ => 400,
    }
}

/// Converts embedded font specifications into inline style declarations.
pub struct FontDetection;

impl Transform for FontDetection {
    fn name(&self) -> &'static str {
        "font-detection"
    }

    fn priority(&self) -> i32 {
        0
    }

    fn execute(
        &self,
        tree: &mut Element,
        ctx: &mut ExecutionContext,
    ) -> Result<MetricsRecord, PassError> {
        let mut metrics = MetricsRecord::new();
        if ctx.primary_font().is_none() {
            tracing::debug!("no primary font detected upstream; skipping tree");
            return Ok(metrics);
        }

        let mut converted = 0u64;
        tree.visit_mut(&mut |el| {
            if convert_element(el) {
                converted += 1;
            }
        });
        metrics.add(FONTS_CONVERTED, converted);
        Ok(metrics)
    }
}

/// Convert one element. Returns whether the font pattern matched.
///
/// Counts on match: when the existing declaration already defines
/// `fontFamily` the merge is skipped, but the element still registers as
/// converted.
fn convert_element(el: &mut Element) -> bool {
    let (family, weight) = {
        let class = match el.class_literal() {
            Some(c) => c,
            None => return false,
        };
        let caps = match font_spec_re().captures(class) {
            Some(c) => c,
            None => return false,
        };
        (caps[1].to_string(), weight_for_style(&caps[2]))
    };
    let family_css = format!("{family}, sans-serif");

    match el.attr_mut("style") {
        Some(AttrValue::Style(decl)) => {
            if !decl.contains("fontFamily") {
                decl.prepend("fontFamily", family_css);
                decl.prepend("fontWeight", weight.to_string());
            }
            true
        }
        // A style attribute with an unexpected shape: skip the element.
        Some(_) => false,
        None => {
            let mut decl = StyleDecl::new();
            decl.push("fontFamily", family_css);
            decl.push("fontWeight", weight.to_string());
            el.push_attr("style", AttrValue::Style(decl));
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::PrimaryFont;
    use pretty_assertions::assert_eq;

    fn seeded_ctx() -> ExecutionContext {
        ExecutionContext::with_primary_font(PrimaryFont {
            family: "Poppins".into(),
            style: "Regular".into(),
        })
    }

    fn run(tree: &mut Element, ctx: &mut ExecutionContext) -> MetricsRecord {
        FontDetection.execute(tree, ctx).unwrap()
    }

    #[test]
    fn test_weight_table() {
        let expected = [
            ("Thin", 100),
            ("ExtraLight", 200),
            ("Light", 300),
            ("Regular", 400),
            ("Medium", 500),
            ("SemiBold", 600),
            ("Bold", 700),
            ("ExtraBold", 800),
            ("Black", 900),
        ];
        for (style, weight) in expected {
            assert_eq!(weight_for_style(style), weight, "style {style}");
        }
        assert_eq!(weight_for_style("Oblique"), 400);
        assert_eq!(weight_for_style(""), 400);
    }

    #[test]
    fn test_creates_style_as_last_attribute() {
        let mut el = Element::with_class("div", "font-['Poppins:Bold',sans-serif]");
        el.push_attr("id", AttrValue::Literal("title".into()));
        let metrics = run(&mut el, &mut seeded_ctx());

        assert_eq!(metrics.get(FONTS_CONVERTED), 1);
        let style = el.style().expect("style declaration created");
        let entries: Vec<_> = style.entries().collect();
        assert_eq!(
            entries,
            vec![("fontFamily", "Poppins, sans-serif"), ("fontWeight", "700")]
        );
        assert_eq!(el.attrs.last().unwrap().name, "style");
    }

    #[test]
    fn test_prepends_into_existing_style() {
        let mut el = Element::with_class("div", "font-['Inter:Medium',sans-serif]");
        let mut decl = StyleDecl::new();
        decl.push("color", "#333");
        el.push_attr("style", AttrValue::Style(decl));

        let metrics = run(&mut el, &mut seeded_ctx());

        assert_eq!(metrics.get(FONTS_CONVERTED), 1);
        let entries: Vec<_> = el.style().unwrap().entries().collect();
        assert_eq!(
            entries,
            vec![
                ("fontWeight", "500"),
                ("fontFamily", "Inter, sans-serif"),
                ("color", "#333"),
            ]
        );
    }

    #[test]
    fn test_existing_font_family_untouched_but_counted() {
        let mut el = Element::with_class("div", "font-['Arial:Regular',sans-serif]");
        let mut decl = StyleDecl::new();
        decl.push("fontFamily", "Georgia, serif");
        el.push_attr("style", AttrValue::Style(decl.clone()));

        let metrics = run(&mut el, &mut seeded_ctx());

        assert_eq!(el.style().unwrap(), &decl, "declaration must not change");
        assert_eq!(metrics.get(FONTS_CONVERTED), 1);
    }

    #[test]
    fn test_no_primary_font_skips_whole_tree() {
        let mut el = Element::with_class("div", "font-['Poppins:Bold',sans-serif]");
        let metrics = run(&mut el, &mut ExecutionContext::new());

        assert!(metrics.is_empty());
        assert!(el.style().is_none());
    }

    #[test]
    fn test_no_pattern_no_mutation() {
        let mut el = Element::with_class("div", "flex items-center");
        let metrics = run(&mut el, &mut seeded_ctx());
        assert!(metrics.is_empty());
        assert_eq!(el.attrs.len(), 1);
    }

    #[test]
    fn test_expression_class_skipped() {
        let mut el = Element::new("div");
        el.push_attr(
            "className",
            AttrValue::Expression("fontClasses".into()),
        );
        let metrics = run(&mut el, &mut seeded_ctx());
        assert!(metrics.is_empty());
    }

    #[test]
    fn test_family_with_underscores() {
        let mut el = Element::with_class("span", "font-['Open_Sans:SemiBold',sans-serif]");
        run(&mut el, &mut seeded_ctx());
        assert_eq!(
            el.style().unwrap().get("fontFamily"),
            Some("Open_Sans, sans-serif")
        );
        assert_eq!(el.style().unwrap().get("fontWeight"), Some("600"));
    }

    #[test]
    fn test_counts_descendants() {
        let mut root = Element::with_class("div", "font-['Poppins:Bold',sans-serif]");
        root.children
            .push(Element::with_class("span", "font-['Poppins:Light',sans-serif]"));
        root.children.push(Element::with_class("p", "gap-2"));

        let metrics = run(&mut root, &mut seeded_ctx());
        assert_eq!(metrics.get(FONTS_CONVERTED), 2);
    }
}
