//! CLI commands for inspecting a site's catalog

pub mod list;
pub mod show;
pub mod watch;
