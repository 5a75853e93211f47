//! `pagepack init-config` – write the built-in config for editing.

use anyhow::Result;
use pagepack_core::config;
use std::path::Path;

pub fn run_init_config(root: &Path) -> Result<()> {
    let path = config::default_config_path(root);
    config::write_default(&path)?;
    println!("Created {}", path.display());
    Ok(())
}
