//! Source loader - collects raw article sources for one load cycle

use std::path::{Path, PathBuf};
use tokio::task::JoinSet;
use walkdir::WalkDir;

use crate::config::SiteConfig;
use crate::error::{IssueKind, LoadIssue};

/// A raw source record: identifier plus front-matter and body text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleSource {
    /// Path-like identifier, `/`-separated and relative to the content root
    pub identifier: String,
    pub raw_text: String,
}

impl ArticleSource {
    pub fn new(identifier: impl Into<String>, raw_text: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            raw_text: raw_text.into(),
        }
    }
}

/// Sources gathered by one load, plus anything that could not be read
#[derive(Debug, Default)]
pub struct LoadedSources {
    pub sources: Vec<ArticleSource>,
    pub issues: Vec<LoadIssue>,
}

/// Where article sources come from
#[derive(Debug, Clone)]
pub enum ContentSource {
    /// In-process list of sources
    Static(Vec<ArticleSource>),
    /// Recursive scan of a content directory
    Directory {
        root: PathBuf,
        extensions: Vec<String>,
        follow_links: bool,
    },
}

impl ContentSource {
    /// Directory source using the configured extensions and link policy
    pub fn directory(root: impl Into<PathBuf>, config: &SiteConfig) -> Self {
        ContentSource::Directory {
            root: root.into(),
            extensions: config.markdown_extensions.clone(),
            follow_links: config.follow_links,
        }
    }

    /// Produce the raw sources for one load cycle
    ///
    /// Never fails as a whole: unreadable files are skipped and reported in
    /// [`LoadedSources::issues`].
    pub async fn load(&self) -> LoadedSources {
        match self {
            ContentSource::Static(sources) => LoadedSources {
                sources: sources.clone(),
                issues: Vec::new(),
            },
            ContentSource::Directory {
                root,
                extensions,
                follow_links,
            } => scan_directory(root, extensions, *follow_links).await,
        }
    }
}

/// Walk `root` for Markdown files and read them concurrently
async fn scan_directory(root: &Path, extensions: &[String], follow_links: bool) -> LoadedSources {
    let mut loaded = LoadedSources::default();

    if !root.is_dir() {
        let issue = LoadIssue::new(root.display().to_string(), IssueKind::MissingRoot);
        issue.log();
        loaded.issues.push(issue);
        return loaded;
    }

    let mut paths = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(follow_links)
        .sort_by_file_name()
    {
        match entry {
            Ok(entry) => {
                let path = entry.path();
                if entry.file_type().is_file() && is_markdown_file(path, extensions) {
                    paths.push(path.to_path_buf());
                }
            }
            Err(e) => {
                let location = e
                    .path()
                    .map(|p| identifier_for(root, p))
                    .unwrap_or_else(|| root.display().to_string());
                let issue = LoadIssue::new(location, IssueKind::Unreadable(e.to_string()));
                issue.log();
                loaded.issues.push(issue);
            }
        }
    }

    tracing::debug!("Found {} source files under {:?}", paths.len(), root);

    let mut reads = JoinSet::new();
    for (order, path) in paths.into_iter().enumerate() {
        let identifier = identifier_for(root, &path);
        reads.spawn(async move {
            let result = tokio::fs::read_to_string(&path).await;
            (order, identifier, result)
        });
    }

    let mut results = Vec::with_capacity(reads.len());
    while let Some(joined) = reads.join_next().await {
        match joined {
            Ok(read) => results.push(read),
            Err(e) => tracing::error!("Source read task failed: {}", e),
        }
    }

    // Reads finish in any order; restore discovery order
    results.sort_by_key(|(order, _, _)| *order);

    for (_, identifier, result) in results {
        match result {
            Ok(raw_text) => loaded.sources.push(ArticleSource {
                identifier,
                raw_text,
            }),
            Err(e) => {
                let issue = LoadIssue::new(identifier, IssueKind::Unreadable(e.to_string()));
                issue.log();
                loaded.issues.push(issue);
            }
        }
    }

    loaded
}

/// Check if a file has one of the Markdown extensions
fn is_markdown_file(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            extensions
                .iter()
                .any(|ext| ext.trim_start_matches('.').eq_ignore_ascii_case(e))
        })
        .unwrap_or(false)
}

/// `/`-separated path of `path` relative to `root`
fn identifier_for(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
