pub mod config;
pub mod logging;

pub mod build;
pub mod checksum;
pub mod deliverable;
pub mod dirs;
pub mod fetch;
pub mod page;
pub mod placeholder;
pub mod resolver;
pub mod upstream;
