//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::helpers::is_valid_date_format;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,

    // Content
    /// Directory scanned for article sources, relative to the base directory
    pub content_dir: String,
    /// Extensions (without the dot) treated as Markdown sources
    pub markdown_extensions: Vec<String>,
    pub follow_links: bool,
    /// Order sources by identifier before normalizing so duplicate slug
    /// resolution does not depend on directory iteration order
    pub sort_sources: bool,
    pub render_drafts: bool,
    /// Category descriptions, keyed by category name or slug
    pub category_descriptions: IndexMap<String, String>,

    // Excerpt
    /// Characters of body text kept when no excerpt is given
    pub excerpt_length: usize,
    pub excerpt_ellipsis: String,

    // Date format (Moment.js tokens)
    pub date_format: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Sandpress".to_string(),

            content_dir: "articles".to_string(),
            markdown_extensions: vec!["md".to_string(), "markdown".to_string()],
            follow_links: true,
            sort_sources: true,
            render_drafts: false,
            category_descriptions: IndexMap::new(),

            excerpt_length: 200,
            excerpt_ellipsis: "...".to_string(),

            date_format: "YYYY-MM-DD".to_string(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        if !is_valid_date_format(&config.date_format) {
            anyhow::bail!(
                "invalid date_format `{}` in config {}",
                config.date_format,
                path.display()
            );
        }
        Ok(config)
    }
}
