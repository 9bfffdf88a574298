//! Utility-class canonicalization.
//!
//! The generator emits arbitrary bracketed pixel values (`gap-[8px]`,
//! `w-[96px]`) even when the value sits exactly on the default scale. This
//! module maps such tokens onto their canonical scale-step equivalents
//! (`gap-2`, `w-24`) — and only then: a value without an exact canonical
//! match is left byte-identical. Canonical output never matches the bracket
//! pattern again, so the rewrite is idempotent.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;

/// Utilities whose bracketed pixel value maps onto the spacing scale
/// (4px per step).
const SPACING_PREFIXES: &[&str] = &[
    "gap", "gap-x", "gap-y", "p", "px", "py", "pt", "pr", "pb", "pl", "m", "mx", "my", "mt", "mr",
    "mb", "ml", "w", "h", "size", "space-x", "space-y", "inset", "inset-x", "inset-y", "top",
    "right", "bottom", "left", "basis", "translate-x", "translate-y",
];

/// Valid steps on the default spacing scale, in quarter-rem units.
const SPACING_STEPS: &[f64] = &[
    0.0, 0.5, 1.0, 1.5, 2.0, 2.5, 3.0, 3.5, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0, 14.0,
    16.0, 20.0, 24.0, 28.0, 32.0, 36.0, 40.0, 44.0, 48.0, 52.0, 56.0, 60.0, 64.0, 72.0, 80.0, 96.0,
];

/// Border-radius pixel values with a canonical suffix. `4px` maps to the
/// unparameterized `rounded` class (empty suffix).
const RADIUS_SUFFIXES: &[(f64, &str)] = &[
    (2.0, "-sm"),
    (4.0, ""),
    (6.0, "-md"),
    (8.0, "-lg"),
    (12.0, "-xl"),
    (16.0, "-2xl"),
    (24.0, "-3xl"),
];

fn arbitrary_px_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(-?)([a-z][a-z-]*)-\[([0-9]+(?:\.[0-9]+)?)px\]$").expect("valid regex")
    })
}

/// Canonicalize every token of a class list.
///
/// Returns `Cow::Borrowed` (byte-identical input) when no token had an exact
/// canonical equivalent. On any rewrite, tokens are re-joined with single
/// spaces.
pub fn canonicalize_classes(classes: &str) -> Cow<'_, str> {
    let mut changed = false;
    let tokens: Vec<Cow<'_, str>> = classes
        .split_whitespace()
        .map(|token| match canonicalize_token(token) {
            Some(canonical) => {
                changed = true;
                Cow::Owned(canonical)
            }
            None => Cow::Borrowed(token),
        })
        .collect();

    if changed {
        Cow::Owned(tokens.join(" "))
    } else {
        Cow::Borrowed(classes)
    }
}

/// Canonical equivalent of a single token, or `None` to keep it as-is.
fn canonicalize_token(token: &str) -> Option<String> {
    let caps = arbitrary_px_re().captures(token)?;
    let negative = !caps[1].is_empty();
    let prefix = &caps[2];
    let px: f64 = caps[3].parse().ok()?;

    if prefix == "rounded" {
        if negative {
            return None;
        }
        let suffix = RADIUS_SUFFIXES
            .iter()
            .find(|(v, _)| *v == px)
            .map(|(_, s)| *s)?;
        return Some(format!("rounded{suffix}"));
    }

    if !SPACING_PREFIXES.contains(&prefix) {
        return None;
    }
    let step = px / 4.0;
    if !SPACING_STEPS.contains(&step) {
        return None;
    }
    let sign = if negative { "-" } else { "" };
    Some(format!("{sign}{prefix}-{}", format_step(step)))
}

fn format_step(step: f64) -> String {
    if step.fract() == 0.0 {
        format!("{}", step as u64)
    } else {
        format!("{step}")
    }
}
