//! Pure helpers for dissecting CSS gradient values.
//!
//! Consumed by the post-fix pass; no tree access here. All functions treat
//! malformed input as "not a gradient" and return `None` rather than erroring
//! — the caller skips the element in that case.

/// The inner argument list of `<func>(...)`, if `value` is exactly that call.
pub fn gradient_args<'a>(value: &'a str, func: &str) -> Option<&'a str> {
    value
        .strip_prefix(func)?
        .strip_prefix('(')?
        .strip_suffix(')')
}

/// Split a gradient argument list on top-level commas. Commas nested inside
/// parentheses (`rgb(...)`, `var(...)`) are not separators.
pub fn split_args(payload: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, ch) in payload.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(payload[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(payload[start..].trim());
    parts
}

/// Whether a leading gradient argument is a direction rather than a stop.
fn is_direction(arg: &str) -> bool {
    arg.starts_with("to ")
        || arg.ends_with("deg")
        || arg.ends_with("turn")
        || arg.ends_with("rad")
}

/// Number of color stops in a `linear-gradient(...)` value, excluding a
/// leading direction argument. `None` if the value is not a linear gradient.
pub fn linear_stop_count(value: &str) -> Option<usize> {
    let args = gradient_args(value, "linear-gradient")?;
    let parts = split_args(args);
    let has_direction = parts.first().is_some_and(|a| is_direction(a));
    Some(parts.len() - has_direction as usize)
}

/// Rewrite a `linear-gradient(...)` into the radial form the design
/// intended, discarding the linear direction.
pub fn to_radial(value: &str, elliptical: bool) -> Option<String> {
    let args = gradient_args(value, "linear-gradient")?;
    let mut parts = split_args(args);
    if parts.first().is_some_and(|a| is_direction(a)) {
        parts.remove(0);
    }
    if parts.is_empty() {
        return None;
    }
    let shape = if elliptical {
        "ellipse at center"
    } else {
        "circle at center"
    };
    Some(format!("radial-gradient({shape}, {})", parts.join(", ")))
}
