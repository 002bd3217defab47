//! Helper functions shared by the normalizer and the CLI
//!
//! Date parsing/formatting and slug generation live here so every code path
//! applies the same rules.

mod date;
mod slug;

pub use date::*;
pub use slug::*;
