//! Error types for content loading
//!
//! Nothing in the load cycle is fatal. Per-record problems are collected as
//! [`LoadIssue`]s on the catalog and logged, and the rest of the load goes on.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Front-matter block could not be parsed
#[derive(Error, Debug)]
pub enum FrontMatterError {
    /// YAML block between `---` markers failed to deserialize
    #[error("invalid YAML front-matter: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON block failed to deserialize
    #[error("invalid JSON front-matter: {0}")]
    Json(#[from] serde_json::Error),

    /// JSON block opened but never closed
    #[error("unterminated JSON front-matter")]
    UnterminatedJson,
}

/// What went wrong with a single source record
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum IssueKind {
    /// Content directory is missing; the scan produced nothing
    #[error("content directory does not exist")]
    MissingRoot,

    /// File could not be read
    #[error("failed to read source: {0}")]
    Unreadable(String),

    /// Front-matter present but unparsable
    #[error("malformed front-matter: {0}")]
    MalformedFrontMatter(String),

    /// `title` or `date` absent or blank
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// Neither the explicit slug nor the identifier produced a usable slug
    #[error("slug is empty after normalization")]
    EmptySlug,

    /// `published: false` and drafts are not rendered
    #[error("unpublished draft")]
    Draft,

    /// Date present but unparsable; the article is kept with the epoch sentinel
    #[error("unparsable date `{0}`, using epoch sentinel")]
    InvalidDate(String),

    /// `updated` present but unparsable; the field is dropped
    #[error("unparsable updated date `{0}`, ignoring it")]
    InvalidUpdated(String),

    /// Configured `date_format` is unusable; ISO dates are used instead
    #[error("invalid date_format `{0}`, using YYYY-MM-DD")]
    InvalidDateFormat(String),

    /// A category or tag name normalizes to an empty slug
    #[error("{0} name `{1}` has an empty slug, ignoring it")]
    EmptyTermSlug(&'static str, String),

    /// A later record reused an existing slug and replaced the earlier article
    #[error("duplicate slug `{slug}`, replaces article from `{replaced}`")]
    DuplicateSlug { slug: String, replaced: String },
}

impl IssueKind {
    /// Whether the record was left out of the catalog because of this issue
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            IssueKind::Unreadable(_)
                | IssueKind::MalformedFrontMatter(_)
                | IssueKind::MissingField(_)
                | IssueKind::EmptySlug
                | IssueKind::Draft
        )
    }
}

/// An issue recorded against one source during a load cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadIssue {
    /// Identifier of the source record (or content root for scan issues)
    pub identifier: String,
    pub kind: IssueKind,
}

impl LoadIssue {
    pub fn new(identifier: impl Into<String>, kind: IssueKind) -> Self {
        Self {
            identifier: identifier.into(),
            kind,
        }
    }

    /// Emit the issue through `tracing` at warn level
    pub(crate) fn log(&self) {
        tracing::warn!("{}", self);
    }
}

impl fmt::Display for LoadIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.identifier, self.kind)
    }
}
