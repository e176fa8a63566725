/// Turn a display name into an engine-safe image-name token.
///
/// Lowercases, drops every character that is not alphanumeric, `_` or whitespace (parentheses,
/// quotes, `:` and `=` included), then joins the remaining words with `_`.
/// `"Happy (Soft)"` becomes `happy_soft`. The result is a fixed point: sanitizing it again is a
/// no-op. It may be empty when the name has no usable characters.
pub fn sanitize_token(raw: &str) -> String {
    let kept: String = raw
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join("_")
}
