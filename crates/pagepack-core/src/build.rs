//! End-to-end build: setup, concurrent resolution, render, write.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::PagepackConfig;
use crate::dirs::{self, temp_path};
use crate::fetch::Fetch;
use crate::page;
use crate::resolver::{self, AssetResolver, ResolveSettings, Resolution};

/// What a build produced.
#[derive(Debug)]
pub struct BuildReport {
    pub output_file: PathBuf,
    pub assets_dir: PathBuf,
    /// One per deliverable, in list order.
    pub resolutions: Vec<Resolution>,
}

impl BuildReport {
    pub fn placeholder_count(&self) -> usize {
        self.resolutions
            .iter()
            .filter(|r| r.outcome.is_unavailable())
            .count()
    }
}

/// Builds the page for the project at `project_root`.
///
/// Setup and the final write are fatal on failure; everything per-deliverable
/// is absorbed into the resolutions.
pub async fn build_site(
    cfg: &PagepackConfig,
    project_root: &Path,
    fetcher: Arc<dyn Fetch>,
) -> Result<BuildReport> {
    cfg.validate()?;

    let output_dir = cfg.output_dir_in(project_root);
    let assets_dir = cfg.assets_dir_in(project_root);
    dirs::ensure_dir(&output_dir).context("prepare output directory")?;
    dirs::ensure_dir(&assets_dir).context("prepare assets directory")?;
    tracing::info!("output directory ready: {}", output_dir.display());
    tracing::info!("assets directory ready: {}", assets_dir.display());

    let resolver = Arc::new(AssetResolver::new(
        ResolveSettings::from_config(cfg, project_root),
        fetcher,
    ));
    let resolutions = resolver::resolve_all(resolver, &cfg.deliverables).await;

    tracing::info!("rendering {} section(s)", resolutions.len());
    let html = page::render(&cfg.page, &resolutions);

    let output_file = cfg.output_file_in(project_root);
    write_output(&output_file, html.as_bytes()).await?;
    tracing::info!("wrote {} ({} bytes)", output_file.display(), html.len());

    Ok(BuildReport {
        output_file,
        assets_dir,
        resolutions,
    })
}

/// Writes the document via `<file>.part` and an atomic rename.
async fn write_output(path: &Path, data: &[u8]) -> Result<()> {
    let tmp = temp_path(path);
    tokio::fs::write(&tmp, data)
        .await
        .with_context(|| format!("write {}", tmp.display()))?;
    tokio::fs::rename(&tmp, path)
        .await
        .with_context(|| format!("rename {} to {}", tmp.display(), path.display()))?;
    Ok(())
}
