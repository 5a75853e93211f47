//! CLI command handlers, one file per command.

mod build;
mod init_config;
mod list;

pub use build::run_build;
pub use init_config::run_init_config;
pub use list::run_list;
