//! Tolerant JSON extraction from model output.
//!
//! The completion service returns unstructured text even when asked for
//! JSON — models wrap payloads in markdown fences or surrounding prose.
//! This module strips a leading/trailing fence and takes the first
//! balanced `{...}` span, tracking string literals so braces inside values
//! don't skew the depth count.

/// Extract the first balanced JSON object from raw model output.
///
/// Returns `None` when no complete object is present.
pub fn extract_json_object(raw: &str) -> Option<String> {
    let body = strip_fences(raw.trim());

    let start = body.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in body[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(body[start..start + i + ch.len_utf8()].to_string());
                }
            }
            _ => {}
        }
    }

    None
}

/// Strip a markdown code fence (with or without a language tag) around the
/// text. Text without a fence passes through unchanged.
fn strip_fences(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };

    // Drop the info string ("json", "JSON", or nothing) up to the newline.
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };

    match rest.rfind("```") {
        Some(end) => rest[..end].trim(),
        None => rest.trim(),
    }
}
