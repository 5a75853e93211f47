//! `pagepack build` – resolve deliverables and write the page.

use anyhow::Result;
use pagepack_core::build::build_site;
use pagepack_core::config;
use pagepack_core::fetch::CurlFetcher;
use std::sync::Arc;

use crate::cli::ProjectArgs;

pub async fn run_build(project: &ProjectArgs) -> Result<()> {
    let root = project.project_root()?;
    let cfg = config::load(&root, project.config.as_deref())?;
    tracing::debug!("loaded config: {:?}", cfg);

    println!("Building single page for {}", root.display());
    let fetcher = Arc::new(CurlFetcher::new(&cfg.http));
    let report = build_site(&cfg, &root, fetcher).await?;

    println!("Wrote {}", report.output_file.display());
    println!();
    println!("--- Summary ---");
    for res in &report.resolutions {
        println!("- {}", res.summary_line());
    }
    let missing = report.placeholder_count();
    if missing > 0 {
        println!();
        println!("{} deliverable(s) shown as placeholders.", missing);
    }
    Ok(())
}
