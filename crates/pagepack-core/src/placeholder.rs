//! Substitutes shown when a deliverable cannot be resolved from disk or upstream.
//!
//! Pure functions, no I/O: identical input always yields identical output.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::page::escape_html;

const WIDTH: u32 = 800;
const HEIGHT: u32 = 400;

/// Inline SVG ("file not found" plus `label`) as a base64 data URI.
pub fn placeholder_image(label: &str) -> String {
    let svg = format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">
  <rect width="{w}" height="{h}" fill="#e9ecef"/>
  <text x="50%" y="50%" fill="#495057" font-family="Arial, sans-serif" font-size="20" text-anchor="middle" dominant-baseline="middle">Error: file not found</text>
  <text x="50%" y="60%" fill="#6c757d" font-family="Arial, sans-serif" font-size="16" text-anchor="middle" dominant-baseline="middle">{label}</text>
</svg>"##,
        w = WIDTH,
        h = HEIGHT,
        label = escape_html(label),
    );
    format!("data:image/svg+xml;base64,{}", BASE64.encode(svg))
}

/// Markdown shown in place of a text deliverable that could not be loaded.
pub fn placeholder_text(filename: &str) -> String {
    format!("## Error\nCould not load {}.", filename)
}

/// Fallback block for documents and slideshows: explanation plus a link upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderLink {
    pub html: String,
    /// Direct hyperlink target (the upstream web page for the file).
    pub href: String,
}

pub fn placeholder_link(filename: &str, source_url: &str) -> PlaceholderLink {
    let html = format!(
        r#"<div class="alert alert-warning">
    <strong>File not found:</strong> {filename}
    <p>It could not be found locally or downloaded. You can try opening it in the repository.</p>
    <a href="{href}" class="btn btn-secondary btn-sm" target="_blank" rel="noopener">View in repository</a>
</div>"#,
        filename = escape_html(filename),
        href = escape_html(source_url),
    );
    PlaceholderLink {
        html,
        href: source_url.to_string(),
    }
}
