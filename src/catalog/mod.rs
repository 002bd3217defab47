//! Catalog - the immutable result of one load cycle, and its queries

mod handle;

pub use handle::CatalogHandle;

use indexmap::IndexMap;
use std::collections::HashMap;

use crate::content::{Article, Category, Tag};
use crate::error::LoadIssue;
use crate::helpers::slugify;

/// Articles, categories and tags from one load cycle
///
/// Built once by the normalizer and never mutated afterwards; a reload
/// produces a new catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Sorted by date, newest first; unparsable dates last
    articles: Vec<Article>,
    /// Keyed by slug, in first-seen order
    categories: IndexMap<String, Category>,
    tags: IndexMap<String, Tag>,
    index: HashMap<String, usize>,
    issues: Vec<LoadIssue>,
}

impl Catalog {
    /// Finalize a catalog from deduplicated articles in discovery order
    ///
    /// Each article comes with the display names of its categories. Names,
    /// first-seen order and counts are all taken from these articles only.
    /// `descriptions` is keyed by category slug.
    pub(crate) fn assemble(
        entries: Vec<(Article, Vec<String>)>,
        descriptions: &HashMap<String, String>,
        issues: Vec<LoadIssue>,
    ) -> Self {
        let mut categories: IndexMap<String, Category> = IndexMap::new();
        let mut tags: IndexMap<String, Tag> = IndexMap::new();
        let mut articles = Vec::with_capacity(entries.len());

        for (article, category_names) in entries {
            for (slug, name) in article.categories.iter().zip(category_names) {
                categories
                    .entry(slug.clone())
                    .or_insert_with(|| Category::new(slug.clone(), name))
                    .article_count += 1;
            }
            for name in &article.tags {
                let slug = slugify(name);
                tags.entry(slug.clone())
                    .or_insert_with(|| Tag::new(slug, name.clone()))
                    .article_count += 1;
            }
            articles.push(article);
        }

        for category in categories.values_mut() {
            category.description = descriptions.get(&category.slug).cloned();
        }

        // Stable: equal dates keep discovery order. The epoch sentinel would
        // sort above pre-1970 dates, so invalid dates are ordered explicitly.
        articles.sort_by(|a, b| {
            a.date_invalid
                .cmp(&b.date_invalid)
                .then_with(|| b.date.cmp(&a.date))
        });

        let index = articles
            .iter()
            .enumerate()
            .map(|(i, a)| (a.slug.clone(), i))
            .collect();

        Self {
            articles,
            categories,
            tags,
            index,
            issues,
        }
    }

    /// All articles, newest first
    pub fn list_articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn get_article_by_slug(&self, slug: &str) -> Option<&Article> {
        self.index.get(slug).map(|&i| &self.articles[i])
    }

    /// All categories with their article counts, in first-seen order
    pub fn list_categories(&self) -> impl ExactSizeIterator<Item = &Category> {
        self.categories.values()
    }

    pub fn get_category(&self, slug: &str) -> Option<&Category> {
        self.categories.get(slug)
    }

    /// Articles in a category, newest first; empty for unknown categories
    pub fn list_articles_by_category(&self, category_slug: &str) -> Vec<&Article> {
        self.articles
            .iter()
            .filter(|a| a.in_category(category_slug))
            .collect()
    }

    /// All tags with their article counts, in first-seen order
    pub fn list_tags(&self) -> impl ExactSizeIterator<Item = &Tag> {
        self.tags.values()
    }

    pub fn get_tag(&self, slug: &str) -> Option<&Tag> {
        self.tags.get(slug)
    }

    /// Articles carrying a tag, newest first
    pub fn list_articles_by_tag(&self, tag_slug: &str) -> Vec<&Article> {
        if !self.tags.contains_key(tag_slug) {
            return Vec::new();
        }
        self.articles.iter().filter(|a| a.has_tag(tag_slug)).collect()
    }

    /// Neighbours of an article in listing order: `(newer, older)`
    pub fn adjacent(&self, slug: &str) -> (Option<&Article>, Option<&Article>) {
        match self.index.get(slug) {
            Some(&i) => (
                i.checked_sub(1).map(|j| &self.articles[j]),
                self.articles.get(i + 1),
            ),
            None => (None, None),
        }
    }

    /// Problems recorded while loading and normalizing
    pub fn issues(&self) -> &[LoadIssue] {
        &self.issues
    }

    /// Number of sources left out of the catalog
    pub fn skipped(&self) -> usize {
        self.issues.iter().filter(|i| i.kind.is_skip()).count()
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}
