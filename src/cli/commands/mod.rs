//! CLI command implementations

pub mod completions;
pub mod init;
pub mod list;
pub mod new;
pub mod render;
pub mod show;
pub mod validate;
