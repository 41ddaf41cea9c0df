//! CLI command implementations

pub mod compile;
pub mod generate;
pub mod info;
pub mod init;
pub mod interactive;
pub mod list_templates;
pub mod workflow;
