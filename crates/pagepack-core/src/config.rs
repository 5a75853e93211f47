use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::deliverable::{default_deliverables, Deliverable};
use crate::upstream::Upstream;

/// Project-local config file looked up in the project root.
pub const CONFIG_FILE_NAME: &str = "pagepack.toml";

/// Binary deliverables below this size are inlined as data URIs.
pub const DEFAULT_INLINE_THRESHOLD: u64 = 5 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("config already exists at {0}")]
    AlreadyExists(PathBuf),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Page chrome: everything on the page that is not a deliverable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// `<title>` of the document.
    pub title: String,
    /// `lang` attribute of `<html>`.
    pub lang: String,
    /// Navbar brand text.
    pub brand: String,
    pub footer: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title: "Marketing Performance Dashboard - Arcor".to_string(),
            lang: "en".to_string(),
            brand: "Arcor Dashboard".to_string(),
            footer: "Marketing Performance Dashboard. Generated by pagepack.".to_string(),
        }
    }
}

/// Remote fallback transfer limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub connect_timeout_secs: u64,
    /// Whole-transfer limit; a hung download stalls only until this fires.
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 15,
            timeout_secs: 120,
        }
    }
}

/// Build configuration, loaded from `pagepack.toml` or built in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagepackConfig {
    /// Binary deliverables strictly smaller than this are embedded; others are linked.
    pub inline_threshold_bytes: u64,
    /// Output directory, relative to the project root.
    pub output_dir: PathBuf,
    /// Assets directory, relative to `output_dir`.
    pub assets_dir: PathBuf,
    /// Generated document name inside `output_dir`.
    pub output_file: String,
    pub upstream: Upstream,
    pub page: PageConfig,
    pub http: HttpConfig,
    pub deliverables: Vec<Deliverable>,
}

impl Default for PagepackConfig {
    fn default() -> Self {
        Self {
            inline_threshold_bytes: DEFAULT_INLINE_THRESHOLD,
            output_dir: PathBuf::from("docs"),
            assets_dir: PathBuf::from("assets"),
            output_file: "single_page.html".to_string(),
            upstream: Upstream::default(),
            page: PageConfig::default(),
            http: HttpConfig::default(),
            deliverables: default_deliverables(),
        }
    }
}

impl PagepackConfig {
    pub fn output_dir_in(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.output_dir)
    }

    pub fn assets_dir_in(&self, project_root: &Path) -> PathBuf {
        self.output_dir_in(project_root).join(&self.assets_dir)
    }

    pub fn output_file_in(&self, project_root: &Path) -> PathBuf {
        self.output_dir_in(project_root).join(&self.output_file)
    }

    /// Relative href prefix for linked assets, e.g. `./assets`.
    pub fn assets_href(&self) -> String {
        let dir = self.assets_dir.to_string_lossy().replace('\\', "/");
        let dir = dir.trim_matches('/');
        if dir.is_empty() || dir == "." {
            ".".to_string()
        } else {
            format!("./{}", dir.trim_start_matches("./"))
        }
    }

    /// Rejects configs that would break the resolver's assumptions: every
    /// deliverable must own a distinct id, local path and output filename.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.inline_threshold_bytes == 0 {
            return Err(ConfigError::Invalid(
                "inline_threshold_bytes must be greater than 0".to_string(),
            ));
        }
        if !is_plain_file_name(&self.output_file) {
            return Err(ConfigError::Invalid(format!(
                "output_file {:?} must be a plain file name",
                self.output_file
            )));
        }

        if !stays_inside(&self.assets_dir) {
            return Err(ConfigError::Invalid(format!(
                "assets_dir {} must be relative to output_dir and stay inside it",
                self.assets_dir.display()
            )));
        }

        let mut ids = HashSet::new();
        let mut filenames = HashSet::new();
        let mut paths = HashSet::new();
        for d in &self.deliverables {
            if d.id.trim().is_empty() {
                return Err(ConfigError::Invalid("deliverable id is empty".to_string()));
            }
            if !ids.insert(d.id.as_str()) {
                return Err(ConfigError::Invalid(format!("duplicate deliverable id {:?}", d.id)));
            }
            if !is_plain_file_name(&d.filename) {
                return Err(ConfigError::Invalid(format!(
                    "deliverable {:?}: filename {:?} must be a plain file name",
                    d.id, d.filename
                )));
            }
            if !filenames.insert(d.filename.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate deliverable filename {:?}",
                    d.filename
                )));
            }
            let Some(repo_path) = d.repo_path() else {
                return Err(ConfigError::Invalid(format!(
                    "deliverable {:?}: local_path {} must be relative and stay inside the project",
                    d.id,
                    d.local_path.display()
                )));
            };
            if !paths.insert(repo_path) {
                return Err(ConfigError::Invalid(format!(
                    "deliverable {:?}: local_path {} is shared with another deliverable",
                    d.id,
                    d.local_path.display()
                )));
            }
        }
        Ok(())
    }
}

/// True if `name` survives filename sanitization unchanged.
fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.chars().any(|c| c == '/' || c == '\\' || c == '\0' || c.is_control())
        && name.trim() == name
}

/// True if `path` is relative and has no `..` segment under either separator.
fn stays_inside(path: &Path) -> bool {
    let relative = path
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    relative
        && !path
            .to_string_lossy()
            .split(['/', '\\'])
            .any(|segment| segment == "..")
        && !path.to_string_lossy().starts_with('\\')
}

/// `<project_root>/pagepack.toml`
pub fn default_config_path(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_FILE_NAME)
}

/// Load configuration.
///
/// An explicit path must exist. Otherwise `pagepack.toml` in the project root
/// is used when present, falling back to the built-in report.
pub fn load(project_root: &Path, explicit: Option<&Path>) -> Result<PagepackConfig, ConfigError> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => {
            let p = default_config_path(project_root);
            if !p.exists() {
                tracing::debug!("no {} in {}, using built-in config", CONFIG_FILE_NAME, project_root.display());
                return Ok(PagepackConfig::default());
            }
            p
        }
    };
    load_from_path(&path)
}

pub fn load_from_path(path: &Path) -> Result<PagepackConfig, ConfigError> {
    let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let cfg: PagepackConfig = toml::from_str(&data).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!("loaded config from {}", path.display());
    Ok(cfg)
}

/// Write the built-in config as pretty TOML. Never overwrites an existing file.
pub fn write_default(path: &Path) -> Result<(), ConfigError> {
    if path.exists() {
        return Err(ConfigError::AlreadyExists(path.to_path_buf()));
    }
    let toml = toml::to_string_pretty(&PagepackConfig::default())?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, toml).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!("created default config at {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deliverable::DeliverableKind;

    #[test]
    fn default_config_values() {
        let cfg = PagepackConfig::default();
        assert_eq!(cfg.inline_threshold_bytes, 5 * 1024 * 1024);
        assert_eq!(cfg.output_dir, PathBuf::from("docs"));
        assert_eq!(cfg.output_file, "single_page.html");
        assert_eq!(cfg.deliverables.len(), 5);
        assert_eq!(cfg.assets_href(), "./assets");
        cfg.validate().unwrap();
    }

    #[test]
    fn output_paths_join_root() {
        let cfg = PagepackConfig::default();
        let root = Path::new("/proj");
        assert_eq!(cfg.assets_dir_in(root), PathBuf::from("/proj/docs/assets"));
        assert_eq!(
            cfg.output_file_in(root),
            PathBuf::from("/proj/docs/single_page.html")
        );
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = PagepackConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: PagepackConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn config_toml_partial_sections_fall_back_to_defaults() {
        let toml = r#"
            inline_threshold_bytes = 1024

            [upstream]
            owner = "someone"

            [[deliverables]]
            id = "notes"
            kind = "text"
            title = "Notes"
            local_path = "notes/readme.md"
            filename = "readme.md"
        "#;
        let cfg: PagepackConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.inline_threshold_bytes, 1024);
        assert_eq!(cfg.upstream.owner, "someone");
        assert_eq!(cfg.upstream.repo, "Marketing-Performance-Dashboard");
        assert_eq!(cfg.http, HttpConfig::default());
        assert_eq!(cfg.deliverables.len(), 1);
        assert_eq!(cfg.deliverables[0].kind, DeliverableKind::Text);
        assert!(cfg.deliverables[0].nav_label.is_none());
        cfg.validate().unwrap();
    }

    #[test]
    fn validate_rejects_duplicate_ids_and_filenames() {
        let mut cfg = PagepackConfig::default();
        cfg.deliverables[1].id = cfg.deliverables[0].id.clone();
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));

        let mut cfg = PagepackConfig::default();
        cfg.deliverables[2].filename = cfg.deliverables[1].filename.clone();
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn validate_rejects_shared_or_escaping_paths() {
        let mut cfg = PagepackConfig::default();
        cfg.deliverables[2].local_path = cfg.deliverables[1].local_path.clone();
        assert!(cfg.validate().is_err());

        let mut cfg = PagepackConfig::default();
        cfg.deliverables[0].local_path = PathBuf::from("../outside.png");
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_path_like_filenames_and_zero_threshold() {
        let mut cfg = PagepackConfig::default();
        cfg.deliverables[0].filename = "sub/dir.png".to_string();
        assert!(cfg.validate().is_err());

        let mut cfg = PagepackConfig::default();
        cfg.inline_threshold_bytes = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_assets_dir_outside_output_dir() {
        for bad in ["/tmp/elsewhere", "../assets", "assets/../../x", "..\\assets", "\\assets"] {
            let mut cfg = PagepackConfig::default();
            cfg.assets_dir = PathBuf::from(bad);
            assert!(
                matches!(cfg.validate(), Err(ConfigError::Invalid(_))),
                "{:?} should be rejected",
                bad
            );
        }

        for good in ["assets", "./assets", "media/files", "."] {
            let mut cfg = PagepackConfig::default();
            cfg.assets_dir = PathBuf::from(good);
            cfg.validate().unwrap();
        }
    }

    #[test]
    fn assets_href_is_relative_to_output_file() {
        let mut cfg = PagepackConfig::default();
        assert_eq!(cfg.assets_href(), "./assets");
        cfg.assets_dir = PathBuf::from("./media/files/");
        assert_eq!(cfg.assets_href(), "./media/files");
    }

    #[test]
    fn load_without_file_uses_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load(dir.path(), None).unwrap();
        assert_eq!(cfg, PagepackConfig::default());
    }

    #[test]
    fn load_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            load(dir.path(), Some(&missing)),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn write_default_then_load_and_refuse_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = default_config_path(dir.path());
        write_default(&path).unwrap();
        let cfg = load(dir.path(), None).unwrap();
        assert_eq!(cfg, PagepackConfig::default());
        assert!(matches!(
            write_default(&path),
            Err(ConfigError::AlreadyExists(_))
        ));
    }

    #[test]
    fn load_reports_parse_errors_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = default_config_path(dir.path());
        fs::write(&path, "inline_threshold_bytes = \"big\"").unwrap();
        let err = load(dir.path(), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("pagepack.toml"));
    }
}
