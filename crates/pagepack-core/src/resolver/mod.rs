//! Asset resolution: local file, then upstream download, then placeholder.
//!
//! Each deliverable runs through a small step machine
//! (`LocalRead -> RemoteFetch -> Classify | Placeholder`). Every path ends in
//! an [`Outcome`]; per-deliverable I/O and network errors are logged and
//! absorbed, never returned.

mod mime;
mod outcome;

pub use mime::mime_for;
pub use outcome::{Outcome, Placeholder, Resolution, Source};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::checksum;
use crate::config::PagepackConfig;
use crate::deliverable::{Deliverable, DeliverableKind};
use crate::dirs::{self, FilesystemError};
use crate::fetch::{Fetch, FetchError};
use crate::placeholder;
use crate::upstream::Upstream;

/// Everything the resolver needs from config, fixed for a run.
#[derive(Debug, Clone)]
pub struct ResolveSettings {
    pub project_root: PathBuf,
    /// Where linked copies are written.
    pub assets_dir: PathBuf,
    /// Href prefix of `assets_dir` as seen from the page, e.g. `./assets`.
    pub assets_href: String,
    pub inline_threshold: u64,
    pub upstream: Upstream,
}

impl ResolveSettings {
    pub fn from_config(cfg: &PagepackConfig, project_root: &Path) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            assets_dir: cfg.assets_dir_in(project_root),
            assets_href: cfg.assets_href(),
            inline_threshold: cfg.inline_threshold_bytes,
            upstream: cfg.upstream.clone(),
        }
    }
}

enum Step {
    LocalRead,
    RemoteFetch,
    Classify { bytes: Vec<u8>, source: Source },
    Placeholder,
}

pub struct AssetResolver {
    settings: ResolveSettings,
    fetcher: Arc<dyn Fetch>,
}

impl AssetResolver {
    pub fn new(settings: ResolveSettings, fetcher: Arc<dyn Fetch>) -> Self {
        Self { settings, fetcher }
    }

    pub fn settings(&self) -> &ResolveSettings {
        &self.settings
    }

    /// Resolves one deliverable. Blocking: does file and network I/O.
    pub fn resolve(&self, deliverable: &Deliverable) -> Resolution {
        let mut step = Step::LocalRead;
        loop {
            step = match step {
                Step::LocalRead => match self.read_local(deliverable) {
                    Some(bytes) => Step::Classify {
                        bytes,
                        source: Source::Local,
                    },
                    None => Step::RemoteFetch,
                },
                Step::RemoteFetch => match self.fetch_remote(deliverable) {
                    Some(bytes) => Step::Classify {
                        bytes,
                        source: Source::Downloaded,
                    },
                    None => Step::Placeholder,
                },
                Step::Classify { bytes, source } => {
                    return self.classify(deliverable, bytes, source)
                }
                Step::Placeholder => return self.unavailable(deliverable),
            };
        }
    }

    fn read_local(&self, d: &Deliverable) -> Option<Vec<u8>> {
        let path = d.source_path(&self.settings.project_root);
        match fs::read(&path) {
            Ok(bytes) => {
                tracing::info!(
                    id = %d.id,
                    "local hit {} ({:.1} KiB)",
                    path.display(),
                    bytes.len() as f64 / 1024.0
                );
                Some(bytes)
            }
            Err(e) => {
                let err = FilesystemError::new("read", &path, e);
                if err.is_not_found() {
                    tracing::info!(id = %d.id, "not found locally: {}", path.display());
                } else {
                    tracing::warn!(id = %d.id, "treating unreadable file as missing: {}", err);
                }
                None
            }
        }
    }

    /// Downloads from upstream and persists the body to the local path so the
    /// next run hits the disk. The in-memory bytes are used even if persisting fails.
    fn fetch_remote(&self, d: &Deliverable) -> Option<Vec<u8>> {
        let url = match self.raw_url(d) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(id = %d.id, "no remote fallback: {}", e);
                return None;
            }
        };
        tracing::info!(id = %d.id, "downloading {}", url);
        let bytes = match self.fetcher.fetch(&url) {
            Ok(bytes) => bytes,
            Err(e) => {
                if e.is_timeout() {
                    tracing::warn!(id = %d.id, "download timed out: {}", url);
                } else {
                    tracing::warn!(id = %d.id, "download failed for {}: {}", url, e);
                }
                return None;
            }
        };

        let path = d.source_path(&self.settings.project_root);
        let persisted = path
            .parent()
            .map_or(Ok(()), dirs::ensure_dir)
            .and_then(|()| dirs::write_atomic(&path, &bytes));
        match persisted {
            Ok(()) => tracing::info!(id = %d.id, "downloaded to {}", path.display()),
            Err(e) => tracing::warn!(id = %d.id, "downloaded but could not save: {}", e),
        }
        Some(bytes)
    }

    fn classify(&self, d: &Deliverable, bytes: Vec<u8>, source: Source) -> Resolution {
        let size = bytes.len() as u64;
        if !d.kind.is_binary() {
            tracing::info!(id = %d.id, "embedding text {}", d.filename);
            return Resolution {
                deliverable: d.clone(),
                outcome: Outcome::EmbeddedText {
                    content: String::from_utf8_lossy(&bytes).into_owned(),
                },
                source,
                size: Some(size),
            };
        }

        if size < self.settings.inline_threshold {
            tracing::info!(id = %d.id, "embedding {} ({} bytes)", d.filename, size);
            let mime_type = mime_for(d.kind, d.extension().as_deref());
            return Resolution {
                deliverable: d.clone(),
                outcome: Outcome::Embedded {
                    mime_type,
                    payload_base64: BASE64.encode(&bytes),
                },
                source,
                size: Some(size),
            };
        }

        tracing::info!(id = %d.id, "linking {} ({} bytes)", d.filename, size);
        match self.write_linked_copy(d, &bytes) {
            Ok(sha256) => Resolution {
                deliverable: d.clone(),
                outcome: Outcome::Linked {
                    relative_path: format!("{}/{}", self.settings.assets_href, d.filename),
                    sha256,
                },
                source,
                size: Some(size),
            },
            Err(e) => {
                tracing::error!(id = %d.id, "could not copy into assets: {:#}", e);
                self.unavailable(d)
            }
        }
    }

    /// Writes the asset copy and checks it against the source bytes. Returns the digest.
    fn write_linked_copy(&self, d: &Deliverable, bytes: &[u8]) -> anyhow::Result<String> {
        let dest = self.settings.assets_dir.join(&d.filename);
        dirs::ensure_dir(&self.settings.assets_dir)?;
        dirs::write_atomic(&dest, bytes)?;
        let expected = checksum::sha256_bytes(bytes);
        let written = checksum::sha256_path(&dest)?;
        if written != expected {
            anyhow::bail!(
                "checksum mismatch for {}: expected {}, got {}",
                dest.display(),
                expected,
                written
            );
        }
        Ok(written)
    }

    fn unavailable(&self, d: &Deliverable) -> Resolution {
        tracing::warn!(id = %d.id, "using placeholder for {}", d.filename);
        let source_hint_url = self.source_hint_url(d);
        let placeholder = match d.kind {
            DeliverableKind::Image => Placeholder::Image {
                data_uri: placeholder::placeholder_image(&d.filename),
            },
            DeliverableKind::Text => Placeholder::Text {
                content: placeholder::placeholder_text(&d.filename),
            },
            DeliverableKind::Document | DeliverableKind::Slideshow => {
                Placeholder::Link(placeholder::placeholder_link(&d.filename, &source_hint_url))
            }
        };
        Resolution {
            deliverable: d.clone(),
            outcome: Outcome::Unavailable {
                source_hint_url,
                placeholder,
            },
            source: Source::Missing,
            size: None,
        }
    }

    fn raw_url(&self, d: &Deliverable) -> Result<String, FetchError> {
        let segments = d
            .repo_segments()
            .ok_or_else(|| FetchError::Url(format!("{} is not a repository path", d.local_path.display())))?;
        self.settings
            .upstream
            .raw_url(&segments)
            .map(String::from)
            .map_err(|e| FetchError::Url(e.to_string()))
    }

    /// Upstream web page for the file; the repository page if that cannot be built.
    fn source_hint_url(&self, d: &Deliverable) -> String {
        let upstream = &self.settings.upstream;
        d.repo_segments()
            .and_then(|s| upstream.blob_url(&s).ok())
            .or_else(|| upstream.repo_url().ok())
            .map(String::from)
            .unwrap_or_else(|| "#".to_string())
    }
}

/// Resolves every deliverable concurrently and waits for all of them.
///
/// Results come back in `deliverables` order regardless of completion order.
/// A task that panics still yields a placeholder for its deliverable.
pub async fn resolve_all(resolver: Arc<AssetResolver>, deliverables: &[Deliverable]) -> Vec<Resolution> {
    let handles: Vec<_> = deliverables
        .iter()
        .cloned()
        .map(|d| {
            let resolver = Arc::clone(&resolver);
            tokio::task::spawn_blocking(move || resolver.resolve(&d))
        })
        .collect();

    let mut resolutions = Vec::with_capacity(handles.len());
    for (d, handle) in deliverables.iter().zip(handles) {
        match handle.await {
            Ok(res) => resolutions.push(res),
            Err(e) => {
                tracing::error!(id = %d.id, "resolver task failed: {}", e);
                resolutions.push(resolver.unavailable(d));
            }
        }
    }
    resolutions
}
