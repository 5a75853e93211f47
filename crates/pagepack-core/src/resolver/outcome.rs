//! Resolution outcomes: how one deliverable ends up on the page.

use crate::deliverable::Deliverable;
use crate::placeholder::PlaceholderLink;

/// Exactly one per deliverable per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Binary content below the inline threshold.
    Embedded {
        mime_type: String,
        payload_base64: String,
    },
    /// Text content, embedded whatever its size.
    EmbeddedText { content: String },
    /// Binary content at or above the threshold, copied next to the page.
    Linked {
        relative_path: String,
        sha256: String,
    },
    /// Neither on disk nor downloadable.
    Unavailable {
        source_hint_url: String,
        placeholder: Placeholder,
    },
}

/// Substitute carried by [`Outcome::Unavailable`], chosen by deliverable kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placeholder {
    Image { data_uri: String },
    Text { content: String },
    Link(PlaceholderLink),
}

impl Outcome {
    /// `data:` URI for embedded binaries.
    pub fn data_uri(&self) -> Option<String> {
        match self {
            Outcome::Embedded {
                mime_type,
                payload_base64,
            } => Some(format!("data:{};base64,{}", mime_type, payload_base64)),
            _ => None,
        }
    }

    /// Markdown for text deliverables: the file itself or the placeholder error text.
    pub fn text_content(&self) -> Option<&str> {
        match self {
            Outcome::EmbeddedText { content } => Some(content),
            Outcome::Unavailable {
                placeholder: Placeholder::Text { content },
                ..
            } => Some(content),
            _ => None,
        }
    }

    /// Target of the download button: data URI, then relative path, then upstream link.
    pub fn download_href(&self) -> Option<String> {
        match self {
            Outcome::Embedded { .. } => self.data_uri(),
            Outcome::Linked { relative_path, .. } => Some(relative_path.clone()),
            Outcome::Unavailable {
                source_hint_url, ..
            } => Some(source_hint_url.clone()),
            Outcome::EmbeddedText { .. } => None,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Outcome::Unavailable { .. })
    }

    /// Short word for logs and the build summary.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Embedded { .. } => "embedded",
            Outcome::EmbeddedText { .. } => "text",
            Outcome::Linked { .. } => "linked",
            Outcome::Unavailable { .. } => "placeholder",
        }
    }
}

/// Where the bytes came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Local,
    Downloaded,
    Missing,
}

/// Resolver output for one deliverable.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub deliverable: Deliverable,
    pub outcome: Outcome,
    pub source: Source,
    /// Byte size when content was resolved.
    pub size: Option<u64>,
}

impl Resolution {
    /// One summary line, e.g. `informe.pdf: linked (./assets/informe.pdf)`.
    pub fn summary_line(&self) -> String {
        let mut line = format!("{}: {}", self.deliverable.filename, self.outcome.label());
        match &self.outcome {
            Outcome::Linked {
                relative_path,
                sha256,
            } => line.push_str(&format!(" ({}, sha256 {})", relative_path, sha256)),
            Outcome::Unavailable {
                source_hint_url, ..
            } => line.push_str(&format!(" (see {})", source_hint_url)),
            Outcome::Embedded { .. } | Outcome::EmbeddedText { .. } => {}
        }
        if self.source == Source::Downloaded {
            line.push_str(" [downloaded]");
        }
        line
    }
}
