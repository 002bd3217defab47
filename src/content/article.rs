//! Article, Category and Tag models

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::helpers::{iso_date, slugify};

/// A normalized article
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Article {
    /// Unique URL-safe identifier
    pub slug: String,

    /// Article title
    pub title: String,

    /// Short summary shown in listings
    pub excerpt: String,

    /// Publication date (epoch sentinel when the source date was unparsable)
    pub date: NaiveDateTime,

    /// Set when `date` is the sentinel standing in for an unparsable value
    pub date_invalid: bool,

    /// `date` rendered with the configured display format; empty when invalid
    pub formatted_date: String,

    /// Last updated date
    pub updated: Option<NaiveDateTime>,

    /// Tags in source order
    pub tags: Vec<String>,

    /// Category slugs in source order
    pub categories: Vec<String>,

    /// Raw Markdown body
    pub content: String,

    /// Identifier of the source record
    pub source: String,
}

impl Article {
    /// Canonical `YYYY-MM-DD` form of `date`
    pub fn iso_date(&self) -> String {
        iso_date(&self.date)
    }

    pub fn in_category(&self, category_slug: &str) -> bool {
        self.categories.iter().any(|c| c == category_slug)
    }

    pub fn has_tag(&self, tag_slug: &str) -> bool {
        self.tags.iter().any(|t| slugify(t) == tag_slug)
    }
}

/// A category with its article count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub slug: String,
    /// Display name, first-seen casing
    pub name: String,
    /// Number of catalog articles in this category
    pub article_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Category {
    pub fn new(slug: String, name: String) -> Self {
        Self {
            slug,
            name,
            article_count: 0,
            description: None,
        }
    }

    /// Categories are identified by their slug
    pub fn id(&self) -> &str {
        &self.slug
    }
}

/// A tag with its article count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub slug: String,
    pub name: String,
    pub article_count: usize,
}

impl Tag {
    pub fn new(slug: String, name: String) -> Self {
        Self {
            slug,
            name,
            article_count: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::epoch_sentinel;

    #[test]
    fn test_membership() {
        let article = Article {
            slug: "a".to_string(),
            title: "A".to_string(),
            excerpt: String::new(),
            date: epoch_sentinel(),
            date_invalid: true,
            formatted_date: String::new(),
            updated: None,
            tags: vec!["Next.js".to_string(), "UI/UX".to_string()],
            categories: vec!["tech".to_string()],
            content: String::new(),
            source: "a.md".to_string(),
        };

        assert!(article.in_category("tech"));
        assert!(!article.in_category("Tech"));
        assert!(article.has_tag("nextjs"));
        assert!(article.has_tag("uiux"));
        assert_eq!(article.iso_date(), "1970-01-01");
    }
}
