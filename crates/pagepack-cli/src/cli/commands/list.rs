//! `pagepack list` – show configured deliverables and where they come from.

use anyhow::Result;
use pagepack_core::config;

use crate::cli::ProjectArgs;

pub fn run_list(project: &ProjectArgs) -> Result<()> {
    let root = project.project_root()?;
    let cfg = config::load(&root, project.config.as_deref())?;
    cfg.validate()?;

    for d in &cfg.deliverables {
        let remote = d
            .repo_segments()
            .and_then(|s| cfg.upstream.raw_url(&s).ok())
            .map(String::from)
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<14} {:<10} {}\n{:<25} {}",
            d.id,
            d.kind.as_str(),
            d.source_path(&root).display(),
            "",
            remote
        );
    }
    Ok(())
}
