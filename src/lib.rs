//! sandpress: content core for a Markdown blog
//!
//! Loads article sources (Markdown with YAML or JSON front-matter), normalizes
//! them into an immutable [`Catalog`] of articles, categories and tags, and
//! answers the queries the presentation layer needs.
//!
//! Loading is two-phase: [`load_catalog`] (or [`Sandpress::load_catalog`])
//! must finish before queries are made. Long-running consumers keep a
//! [`CatalogHandle`] and republish on reload.

pub mod catalog;
pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod helpers;

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use catalog::{Catalog, CatalogHandle};
pub use config::SiteConfig;
pub use content::{Article, ArticleSource, Category, ContentSource, Tag};
pub use error::{IssueKind, LoadIssue};

/// Run one load cycle: read every source, then normalize into a catalog
///
/// Never fails: unreadable or invalid records are skipped and listed in
/// [`Catalog::issues`]; an unreadable source set gives an empty catalog.
pub async fn load_catalog(source: &ContentSource, config: &SiteConfig) -> Catalog {
    let start = std::time::Instant::now();

    let loaded = source.load().await;
    let found = loaded.sources.len();
    let catalog = content::Normalizer::new(config).normalize(loaded.sources, loaded.issues);

    tracing::info!(
        "Loaded {} articles from {} sources ({} skipped, {} categories, {} tags) in {:.2}ms",
        catalog.len(),
        found,
        catalog.skipped(),
        catalog.list_categories().len(),
        catalog.list_tags().len(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    catalog
}

/// A site rooted at a base directory
#[derive(Debug, Clone)]
pub struct Sandpress {
    /// Site configuration
    pub config: SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Directory scanned for articles
    pub content_dir: PathBuf,
}

impl Sandpress {
    /// Create a site from a directory, reading `_config.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let mut site = Self::with_config(base_dir, SiteConfig::default());
        let config_path = site.config_path();

        if config_path.exists() {
            site = Self::with_config(&site.base_dir, SiteConfig::load(&config_path)?);
        } else {
            tracing::debug!("No config at {:?}, using defaults", config_path);
        }

        Ok(site)
    }

    /// Create a site with an explicit configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let content_dir = base_dir.join(&config.content_dir);
        Self {
            config,
            base_dir,
            content_dir,
        }
    }

    /// Path of the config file for this site
    pub fn config_path(&self) -> PathBuf {
        self.base_dir.join("_config.yml")
    }

    /// Directory scan of the content directory
    pub fn content_source(&self) -> ContentSource {
        ContentSource::directory(&self.content_dir, &self.config)
    }

    /// Run a load cycle over the content directory
    pub async fn load_catalog(&self) -> Catalog {
        load_catalog(&self.content_source(), &self.config).await
    }

    /// Run a load cycle and publish the result through `handle`
    pub async fn reload(&self, handle: &CatalogHandle) -> Arc<Catalog> {
        let catalog = self.load_catalog().await;
        handle.publish(catalog);
        handle.snapshot()
    }
}
