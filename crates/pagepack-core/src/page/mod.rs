//! Page assembly: turns resolved deliverables into one self-contained HTML document.
//!
//! Pure, no I/O. Sections follow the deliverable list order. Markdown is not
//! rendered here; it is JSON-encoded into an inline script and rendered by
//! `marked` in the browser.

mod escape;

pub use escape::{escape_html, script_json_string};

use crate::config::PageConfig;
use crate::deliverable::DeliverableKind;
use crate::resolver::{Outcome, Placeholder, Resolution};

const BOOTSTRAP_CSS: &str = "https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css";
const BOOTSTRAP_JS: &str = "https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/js/bootstrap.bundle.min.js";
const MARKED_JS: &str = "https://cdn.jsdelivr.net/npm/marked@12.0.2/lib/marked.umd.min.js";

/// Pre-encoded JSON literal used when a markdown source cannot be encoded.
const MARKDOWN_ERROR_JSON: &str = "\"## Error rendering Markdown.\"";

const STYLE: &str = r#"    <style>
        body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, "Helvetica Neue", Arial, sans-serif; scroll-behavior: smooth; }
        .navbar { box-shadow: 0 2px 4px rgba(0,0,0,.1); }
        section { padding: 60px 0; border-bottom: 1px solid #eee; }
        h2 { border-bottom: 2px solid #0d6efd; padding-bottom: 10px; margin-bottom: 30px; }
        .pdf-viewer { width: 100%; height: 600px; border: 1px solid #ddd; border-radius: 8px; }
        .download-btn { margin-top: 15px; }
        .img-dashboard { width: 100%; border: 1px solid #ddd; border-radius: 8px; box-shadow: 0 4px 12px rgba(0,0,0,.1); }
        .markdown-content { background: #fdfdfd; border: 1px solid #eee; border-radius: 8px; padding: 25px; min-height: 100px; }
        .markdown-content h3 { font-size: 1.5rem; margin-top: 1.5rem; }
        .markdown-content table { width: 100%; margin: 20px 0; border-collapse: collapse; }
        .markdown-content th, .markdown-content td { border: 1px solid #ddd; padding: 12px; }
        .markdown-content th { background-color: #f8f9fa; }
        .markdown-content code { background-color: #e9ecef; padding: 2px 6px; border-radius: 4px; }
        .markdown-content pre { background-color: #212529; color: #f8f9fa; padding: 15px; border-radius: 8px; }
    </style>
"#;

/// A dynamic fragment that could not be produced. Replaced inline, never fatal.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("encode markdown: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{kind:?} deliverable cannot be shown from a {outcome} outcome")]
    Unsupported {
        kind: DeliverableKind,
        outcome: &'static str,
    },
}

/// Renders the full document for `resolutions`, in the given order.
pub fn render(page: &PageConfig, resolutions: &[Resolution]) -> String {
    let mut html = String::with_capacity(
        64 * 1024 + resolutions.iter().map(|r| r.size.unwrap_or(0) as usize * 4 / 3).sum::<usize>(),
    );

    html.push_str("<!DOCTYPE html>\n");
    html.push_str(&format!("<html lang=\"{}\">\n<head>\n", escape_html(&page.lang)));
    html.push_str("    <meta charset=\"UTF-8\">\n");
    html.push_str("    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    html.push_str(&format!("    <title>{}</title>\n", escape_html(&page.title)));
    html.push_str(&format!(
        "    <link href=\"{}\" rel=\"stylesheet\" crossorigin=\"anonymous\">\n",
        BOOTSTRAP_CSS
    ));
    html.push_str(STYLE);
    html.push_str("</head>\n<body data-bs-spy=\"scroll\" data-bs-target=\"#mainNavbar\">\n\n");

    html.push_str(&navbar(page, resolutions));

    html.push_str("    <main class=\"container\">\n");
    for res in resolutions {
        html.push_str(&section(res));
    }
    html.push_str("    </main>\n\n");

    html.push_str(&format!(
        "    <footer class=\"text-center p-4 bg-light mt-5\">\n        <p class=\"mb-0\">{}</p>\n    </footer>\n\n",
        escape_html(&page.footer)
    ));

    html.push_str(&format!(
        "    <script src=\"{}\" crossorigin=\"anonymous\"></script>\n",
        BOOTSTRAP_JS
    ));
    html.push_str(&format!(
        "    <script src=\"{}\" crossorigin=\"anonymous\"></script>\n",
        MARKED_JS
    ));
    html.push_str(&markdown_script(resolutions));
    html.push_str("</body>\n</html>\n");
    html
}

fn navbar(page: &PageConfig, resolutions: &[Resolution]) -> String {
    let mut items = String::new();
    for res in resolutions {
        let d = &res.deliverable;
        items.push_str(&format!(
            "                    <li class=\"nav-item\"><a class=\"nav-link\" href=\"#{}\">{}</a></li>\n",
            escape_html(&d.id),
            escape_html(d.nav_label())
        ));
    }
    format!(
        r##"    <nav id="mainNavbar" class="navbar navbar-expand-lg navbar-light bg-light sticky-top">
        <div class="container">
            <a class="navbar-brand" href="#">{brand}</a>
            <button class="navbar-toggler" type="button" data-bs-toggle="collapse" data-bs-target="#navbarNav" aria-controls="navbarNav" aria-expanded="false" aria-label="Toggle navigation">
                <span class="navbar-toggler-icon"></span>
            </button>
            <div class="collapse navbar-collapse" id="navbarNav">
                <ul class="navbar-nav ms-auto">
{items}                </ul>
            </div>
        </div>
    </nav>

"##,
        brand = escape_html(&page.brand),
        items = items,
    )
}

fn section(res: &Resolution) -> String {
    let d = &res.deliverable;
    let body = body_fragment(res).unwrap_or_else(|e| {
        tracing::warn!(id = %d.id, "could not render section: {}", e);
        format!(
            "<div class=\"alert alert-danger\">Could not render {}: {}</div>",
            escape_html(&d.filename),
            escape_html(&e.to_string())
        )
    });
    let download = download_button(res);
    format!(
        "        <section id=\"{id}\">\n            <h2>{title}</h2>\n            {body}\n{download}        </section>\n\n",
        id = escape_html(&d.id),
        title = escape_html(&d.title),
        body = body,
        download = download,
    )
}

/// Presentation fragment chosen by deliverable kind and outcome variant.
fn body_fragment(res: &Resolution) -> Result<String, RenderError> {
    let d = &res.deliverable;
    let title = escape_html(&d.title);
    let unsupported = || RenderError::Unsupported {
        kind: d.kind,
        outcome: res.outcome.label(),
    };

    if d.kind == DeliverableKind::Text {
        if res.outcome.text_content().is_none() {
            return Err(unsupported());
        }
        return Ok(format!(
            "<div id=\"markdown-{}\" class=\"markdown-content\"></div>",
            escape_html(&d.id)
        ));
    }

    match (&res.outcome, d.kind) {
        (Outcome::Unavailable { placeholder, .. }, _) => match placeholder {
            Placeholder::Image { data_uri } => Ok(format!(
                "<img src=\"{}\" class=\"img-dashboard\" alt=\"{}\">",
                escape_html(data_uri),
                title
            )),
            Placeholder::Link(link) => Ok(link.html.clone()),
            Placeholder::Text { .. } => Err(unsupported()),
        },
        (Outcome::EmbeddedText { .. }, _) => Err(unsupported()),
        (_, DeliverableKind::Image) => {
            let src = escape_html(&res.outcome.download_href().ok_or_else(unsupported)?);
            Ok(format!(
                "<a href=\"{src}\" target=\"_blank\" title=\"Open the full image\">\n                <img src=\"{src}\" class=\"img-dashboard\" alt=\"{title}\">\n            </a>",
                src = src,
                title = title
            ))
        }
        (_, DeliverableKind::Document) => {
            let src = escape_html(&res.outcome.download_href().ok_or_else(unsupported)?);
            Ok(format!(
                "<iframe src=\"{}\" class=\"pdf-viewer\" title=\"{}\"></iframe>",
                src, title
            ))
        }
        (Outcome::Linked { .. }, DeliverableKind::Slideshow) => Ok(
            "<p>The presentation is a large file. Download it using the button below.</p>".to_string(),
        ),
        (Outcome::Embedded { .. }, DeliverableKind::Slideshow) => Ok(
            "<div class=\"alert alert-info\">The presentation is embedded in this page. Download it using the button below.</div>"
                .to_string(),
        ),
        (_, DeliverableKind::Text) => Err(unsupported()),
    }
}

/// Uniform download affordance for binary deliverables.
fn download_button(res: &Resolution) -> String {
    let d = &res.deliverable;
    if !d.kind.is_binary() {
        return String::new();
    }
    let Some(href) = res.outcome.download_href() else {
        return String::new();
    };
    let format_label = d
        .extension()
        .map(|e| format!(" ({})", e.to_ascii_uppercase()))
        .unwrap_or_default();
    format!(
        "            <a href=\"{href}\" class=\"btn btn-primary download-btn\" download=\"{name}\" aria-label=\"Download {title}\">Download{label}</a>\n",
        href = escape_html(&href),
        name = escape_html(&d.filename),
        title = escape_html(&d.title),
        label = escape_html(&format_label),
    )
}

/// One `[id, markdown]` entry per text deliverable, rendered client-side.
fn markdown_script(resolutions: &[Resolution]) -> String {
    script_with_entries(&markdown_entries(resolutions, script_json_string))
}

/// Script entries for every text deliverable. A source that fails to encode
/// is replaced by an error message so its section never stays blank.
fn markdown_entries<F>(resolutions: &[Resolution], encode: F) -> String
where
    F: Fn(&str) -> Result<String, RenderError>,
{
    let mut entries = String::new();
    for res in resolutions.iter().filter(|r| r.deliverable.kind == DeliverableKind::Text) {
        let d = &res.deliverable;
        let id = match encode(&d.id) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(id = %d.id, "could not encode section id: {}", e);
                continue;
            }
        };
        let source = match res.outcome.text_content().map(&encode) {
            Some(Ok(json)) => json,
            Some(Err(e)) => {
                tracing::warn!(id = %d.id, "could not encode markdown: {}", e);
                MARKDOWN_ERROR_JSON.to_string()
            }
            None => MARKDOWN_ERROR_JSON.to_string(),
        };
        entries.push_str(&format!("                [{}, {}],\n", id, source));
    }
    entries
}

fn script_with_entries(entries: &str) -> String {
    if entries.is_empty() {
        return String::new();
    }
    format!(
        r#"
    <script>
        document.addEventListener("DOMContentLoaded", function () {{
            const markdownSources = [
{entries}            ];
            for (const [id, source] of markdownSources) {{
                try {{
                    const el = document.getElementById("markdown-" + id);
                    if (el && window.marked) {{
                        el.innerHTML = window.marked.parse(source);
                    }}
                }} catch (e) {{ console.error("Markdown render failed for " + id, e); }}
            }}
        }});
    </script>
"#,
        entries = entries
    )
}
