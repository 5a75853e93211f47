//! Escaping for HTML text/attributes and for JSON embedded in `<script>`.

use super::RenderError;

/// Escapes `& < > " '` for use in element text and quoted attributes.
pub fn escape_html(input: &str) -> String {
    html_escape::encode_quoted_attribute(input).into_owned()
}

/// JSON string literal that is safe inside an inline `<script>` block.
///
/// `<`, `>` and `&` only occur inside JSON strings, so replacing them with
/// `\uXXXX` escapes keeps the value identical while making `</script>` and
/// `<!--` impossible. U+2028/U+2029 are escaped for older JS parsers.
pub fn script_json_string(input: &str) -> Result<String, RenderError> {
    let json = serde_json::to_string(input)?;
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(c),
        }
    }
    Ok(out)
}
