/// Recover the JSON object the generator was asked for from its raw reply.
///
/// Never fails: when no delimiters are found the input comes back unchanged
/// and the contract decoder reports the problem.
pub fn extract_payload(raw: &str) -> &str {
    let trimmed = raw.trim();
    if is_bare_object(trimmed) {
        return trimmed;
    }

    if let Some(inner) = fenced_object(trimmed) {
        return inner;
    }

    slice_object(trimmed).unwrap_or(raw)
}

fn is_bare_object(text: &str) -> bool {
    text.starts_with('{') && text.ends_with('}')
}

/// First `{` through last `}`.
fn slice_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Object inside a ``` fence that wraps it. Backticks inside the object
/// (a joke quoting code, say) are not a fence.
fn fenced_object(text: &str) -> Option<&str> {
    let first_brace = text.find('{')?;
    let last_brace = text.rfind('}')?;

    let open = text[..first_brace].find("```")?;
    let close = last_brace + 1 + text[last_brace + 1..].find("```")?;

    // Everything between the fences, info string (```json) included.
    slice_object(&text[open + 3..close])
}
