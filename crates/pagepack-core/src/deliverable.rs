//! Report deliverables: the fixed set of artifacts the page presents.

use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// What a deliverable is, which decides how it is embedded and presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliverableKind {
    Image,
    Document,
    Slideshow,
    Text,
}

impl DeliverableKind {
    /// Binary kinds are size-checked against the inline threshold; text never is.
    pub fn is_binary(self) -> bool {
        !matches!(self, DeliverableKind::Text)
    }

    /// Name as written in `pagepack.toml`.
    pub fn as_str(self) -> &'static str {
        match self {
            DeliverableKind::Image => "image",
            DeliverableKind::Document => "document",
            DeliverableKind::Slideshow => "slideshow",
            DeliverableKind::Text => "text",
        }
    }
}

/// One report artifact. Defined once in config and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deliverable {
    /// Section anchor and identity (unique per config).
    pub id: String,
    pub kind: DeliverableKind,
    /// Section heading.
    pub title: String,
    /// Short label for the navigation bar; falls back to `title`.
    #[serde(default)]
    pub nav_label: Option<String>,
    /// Location relative to the project root; also the path inside the upstream repo.
    pub local_path: PathBuf,
    /// Output filename (used for linked copies and download names).
    pub filename: String,
}

impl Deliverable {
    pub fn new(
        id: &str,
        kind: DeliverableKind,
        title: &str,
        local_path: &str,
        filename: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            kind,
            title: title.to_string(),
            nav_label: None,
            local_path: PathBuf::from(local_path),
            filename: filename.to_string(),
        }
    }

    pub fn with_nav_label(mut self, label: &str) -> Self {
        self.nav_label = Some(label.to_string());
        self
    }

    pub fn nav_label(&self) -> &str {
        self.nav_label.as_deref().unwrap_or(&self.title)
    }

    /// Absolute (or root-joined) location on disk.
    pub fn source_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.local_path)
    }

    /// Path segments of `local_path`, as used in upstream URLs.
    ///
    /// Returns `None` if the path is absolute or escapes the root (`..`).
    pub fn repo_segments(&self) -> Option<Vec<String>> {
        let mut segments = Vec::new();
        for component in self.local_path.components() {
            match component {
                Component::Normal(s) => segments.push(s.to_string_lossy().replace('\\', "/")),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
            }
        }
        let segments: Vec<String> = segments
            .iter()
            .flat_map(|s| s.split('/'))
            .filter(|s| !s.is_empty() && *s != ".")
            .map(str::to_string)
            .collect();
        if segments.is_empty() || segments.iter().any(|s| s == "..") {
            None
        } else {
            Some(segments)
        }
    }

    /// `local_path` with `/` separators, e.g. `resultados/informe.pdf`.
    pub fn repo_path(&self) -> Option<String> {
        self.repo_segments().map(|s| s.join("/"))
    }

    /// Lowercased extension of `filename`, without the dot.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.filename)
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .filter(|e| !e.is_empty())
    }
}

/// The built-in report: one entry per page section, in display order.
pub fn default_deliverables() -> Vec<Deliverable> {
    vec![
        Deliverable::new(
            "visual",
            DeliverableKind::Image,
            "1. Visual Summary",
            "resultados/resumen_visual_dashboard.png",
            "resumen_visual_dashboard.png",
        )
        .with_nav_label("Visual Summary"),
        Deliverable::new(
            "report",
            DeliverableKind::Document,
            "2. Results Report",
            "resultados/informe_resultados.pdf",
            "informe_resultados.pdf",
        )
        .with_nav_label("Report"),
        Deliverable::new(
            "summary",
            DeliverableKind::Document,
            "3. Executive Summary",
            "presentacion/resumen_ejecutivo_arcor.pdf",
            "resumen_ejecutivo_arcor.pdf",
        )
        .with_nav_label("Executive Summary"),
        Deliverable::new(
            "presentation",
            DeliverableKind::Slideshow,
            "4. Presentation (PowerPoint)",
            "presentacion/presentacion_powerpoint.pptx",
            "presentacion_powerpoint.pptx",
        )
        .with_nav_label("Presentation"),
        Deliverable::new(
            "insights",
            DeliverableKind::Text,
            "5. Insights and Recommendations",
            "resultados/insights_recomendaciones.md",
            "insights_recomendaciones.md",
        )
        .with_nav_label("Insights"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_match_config_spelling() {
        for kind in [
            DeliverableKind::Image,
            DeliverableKind::Document,
            DeliverableKind::Slideshow,
            DeliverableKind::Text,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn repo_path_uses_forward_slashes() {
        let d = Deliverable::new(
            "r",
            DeliverableKind::Document,
            "R",
            "resultados/informe.pdf",
            "informe.pdf",
        );
        assert_eq!(d.repo_path().as_deref(), Some("resultados/informe.pdf"));
    }

    #[test]
    fn repo_path_normalizes_backslashes_and_curdir() {
        let d = Deliverable::new("r", DeliverableKind::Document, "R", "./a\\b.pdf", "b.pdf");
        assert_eq!(d.repo_path().as_deref(), Some("a/b.pdf"));
    }

    #[test]
    fn repo_path_rejects_parent_and_absolute() {
        let up = Deliverable::new("r", DeliverableKind::Text, "R", "../x.md", "x.md");
        assert!(up.repo_path().is_none());
        let abs = Deliverable::new("r", DeliverableKind::Text, "R", "/etc/x.md", "x.md");
        assert!(abs.repo_path().is_none());
    }

    #[test]
    fn extension_is_lowercased() {
        let d = Deliverable::new("v", DeliverableKind::Image, "V", "a/B.PNG", "B.PNG");
        assert_eq!(d.extension().as_deref(), Some("png"));
        let none = Deliverable::new("v", DeliverableKind::Image, "V", "a/B", "B");
        assert!(none.extension().is_none());
    }

    #[test]
    fn nav_label_falls_back_to_title() {
        let d = Deliverable::new("v", DeliverableKind::Image, "Title", "a.png", "a.png");
        assert_eq!(d.nav_label(), "Title");
        assert_eq!(d.with_nav_label("Short").nav_label(), "Short");
    }

    #[test]
    fn default_deliverables_cover_every_kind_once_text_last() {
        let list = default_deliverables();
        assert_eq!(list.len(), 5);
        assert_eq!(list[0].kind, DeliverableKind::Image);
        assert_eq!(list[3].kind, DeliverableKind::Slideshow);
        assert_eq!(list[4].kind, DeliverableKind::Text);
        assert!(!DeliverableKind::Text.is_binary());
        assert!(DeliverableKind::Document.is_binary());
    }
}
