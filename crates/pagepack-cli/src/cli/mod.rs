//! CLI for pagepack.

mod commands;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use commands::{run_build, run_init_config, run_list};

/// Top-level CLI. With no subcommand, builds the page for the current directory.
#[derive(Debug, Parser)]
#[command(name = "pagepack")]
#[command(about = "pagepack: bundle report deliverables into one self-contained HTML page", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

/// Where the project lives and which config to use.
#[derive(Debug, Clone, Default, Args)]
pub struct ProjectArgs {
    /// Project root (defaults to the current directory).
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,
    /// Config file (defaults to <root>/pagepack.toml, else built-in).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl ProjectArgs {
    pub fn project_root(&self) -> Result<PathBuf> {
        match &self.root {
            Some(root) => Ok(root.clone()),
            None => std::env::current_dir().context("determine current directory"),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Resolve every deliverable and write the single-page document (default).
    Build {
        #[command(flatten)]
        project: ProjectArgs,
    },

    /// List configured deliverables with their local paths and upstream URLs.
    List {
        #[command(flatten)]
        project: ProjectArgs,
    },

    /// Write a default pagepack.toml into the project root.
    InitConfig {
        /// Project root (defaults to the current directory).
        #[arg(long, value_name = "DIR")]
        root: Option<PathBuf>,
    },
}

impl Cli {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let command = cli.command.unwrap_or(CliCommand::Build {
            project: ProjectArgs::default(),
        });

        match command {
            CliCommand::Build { project } => run_build(&project).await?,
            CliCommand::List { project } => run_list(&project)?,
            CliCommand::InitConfig { root } => {
                let project = ProjectArgs { root, config: None };
                run_init_config(&project.project_root()?)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
