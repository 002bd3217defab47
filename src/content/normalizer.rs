//! Normalizer - turns raw sources into a catalog
//!
//! Each source is parsed independently; a bad record is recorded as a
//! [`LoadIssue`] and skipped, never aborting the build. Sources are folded in
//! order, so when two records share a slug the later one wins.

use std::collections::HashMap;

use super::frontmatter::FrontMatter;
use super::loader::ArticleSource;
use super::markdown;
use super::Article;
use crate::catalog::Catalog;
use crate::config::SiteConfig;
use crate::error::{IssueKind, LoadIssue};
use crate::helpers::{
    epoch_sentinel, format_date, identifier_stem, is_valid_date_format, iso_date, slugify,
};

/// Display format used when the configured one is unusable
const FALLBACK_DATE_FORMAT: &str = "YYYY-MM-DD";

/// Builds a [`Catalog`] from raw sources according to the site configuration
pub struct Normalizer<'a> {
    config: &'a SiteConfig,
}

impl<'a> Normalizer<'a> {
    pub fn new(config: &'a SiteConfig) -> Self {
        Self { config }
    }

    /// Normalize every source into one catalog
    ///
    /// `issues` carries problems already found while loading the sources.
    pub fn normalize(&self, mut sources: Vec<ArticleSource>, issues: Vec<LoadIssue>) -> Catalog {
        if self.config.sort_sources {
            sources.sort_by(|a, b| a.identifier.cmp(&b.identifier));
        }

        let mut fold = Fold {
            issues,
            ..Default::default()
        };

        let date_format = if is_valid_date_format(&self.config.date_format) {
            self.config.date_format.as_str()
        } else {
            fold.report(
                "config",
                IssueKind::InvalidDateFormat(self.config.date_format.clone()),
            );
            FALLBACK_DATE_FORMAT
        };

        for source in &sources {
            match self.normalize_one(source, date_format, &mut fold) {
                Ok((article, category_names)) => fold.insert(article, category_names),
                Err(kind) => fold.report(&source.identifier, kind),
            }
        }

        tracing::debug!(
            "Normalized {} of {} sources",
            fold.slots.iter().flatten().count(),
            sources.len()
        );

        let descriptions: HashMap<String, String> = self
            .config
            .category_descriptions
            .iter()
            .map(|(name, description)| (slugify(name), description.clone()))
            .collect();

        Catalog::assemble(
            fold.slots.into_iter().flatten().collect(),
            &descriptions,
            fold.issues,
        )
    }

    /// Turn one source into an article plus its category display names, or
    /// explain why it was skipped
    fn normalize_one(
        &self,
        source: &ArticleSource,
        date_format: &str,
        fold: &mut Fold,
    ) -> Result<(Article, Vec<String>), IssueKind> {
        let (fm, body) = FrontMatter::parse(&source.raw_text)
            .map_err(|e| IssueKind::MalformedFrontMatter(e.to_string()))?;

        let title = fm
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(IssueKind::MissingField("title"))?
            .to_string();

        let raw_date = fm
            .date
            .as_ref()
            .filter(|d| !d.is_blank())
            .ok_or(IssueKind::MissingField("date"))?;

        if !fm.published && !self.config.render_drafts {
            return Err(IssueKind::Draft);
        }

        let slug = match fm.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(explicit) => slugify(explicit),
            None => slugify(identifier_stem(&source.identifier)),
        };
        if slug.is_empty() {
            return Err(IssueKind::EmptySlug);
        }

        // Everything below only degrades the article, it never drops it
        let (date, date_invalid) = match raw_date.to_naive() {
            Some(date) => (date, false),
            None => {
                fold.report(
                    &source.identifier,
                    IssueKind::InvalidDate(raw_date.describe()),
                );
                (epoch_sentinel(), true)
            }
        };

        let updated = fm.updated.as_ref().filter(|d| !d.is_blank()).and_then(|raw| {
            let parsed = raw.to_naive();
            if parsed.is_none() {
                fold.report(&source.identifier, IssueKind::InvalidUpdated(raw.describe()));
            }
            parsed
        });

        let (categories, category_names): (Vec<_>, Vec<_>) = fold
            .dedup_terms(&source.identifier, "category", fm.category_names())
            .into_iter()
            .unzip();
        let tags = fold
            .dedup_terms(&source.identifier, "tag", fm.tags.iter().map(String::as_str))
            .into_iter()
            .map(|(_, name)| name)
            .collect();

        let excerpt = match fm.summary() {
            Some(summary) => summary.to_string(),
            None => markdown::excerpt(
                body,
                self.config.excerpt_length,
                &self.config.excerpt_ellipsis,
            ),
        };

        let formatted_date = if date_invalid {
            String::new()
        } else {
            format_date(&date, date_format).unwrap_or_else(|| iso_date(&date))
        };

        tracing::debug!("Normalized {} as `{}`", source.identifier, slug);

        let article = Article {
            slug,
            title,
            excerpt,
            date,
            date_invalid,
            formatted_date,
            updated,
            tags,
            categories,
            content: body.to_string(),
            source: source.identifier.clone(),
        };
        Ok((article, category_names))
    }
}

/// State threaded through the fold over sources
#[derive(Default)]
struct Fold {
    /// Articles with their category display names, in fold order; a replaced
    /// duplicate leaves a `None` behind
    slots: Vec<Option<(Article, Vec<String>)>>,
    by_slug: HashMap<String, usize>,
    issues: Vec<LoadIssue>,
}

impl Fold {
    fn report(&mut self, identifier: &str, kind: IssueKind) {
        let issue = LoadIssue::new(identifier, kind);
        issue.log();
        self.issues.push(issue);
    }

    /// Add an article; an existing article with the same slug is replaced
    fn insert(&mut self, article: Article, category_names: Vec<String>) {
        let replaced = self
            .by_slug
            .get(&article.slug)
            .copied()
            .and_then(|idx| self.slots[idx].take());
        if let Some((previous, _)) = replaced {
            self.report(
                &article.source,
                IssueKind::DuplicateSlug {
                    slug: article.slug.clone(),
                    replaced: previous.source,
                },
            );
        }
        self.by_slug.insert(article.slug.clone(), self.slots.len());
        self.slots.push(Some((article, category_names)));
    }

    /// Slug each name. Returns the article's `(slug, name)` pairs in source
    /// order, deduplicated by slug.
    fn dedup_terms<'n>(
        &mut self,
        identifier: &str,
        label: &'static str,
        names: impl Iterator<Item = &'n str>,
    ) -> Vec<(String, String)> {
        let mut terms: Vec<(String, String)> = Vec::new();
        for name in names.map(str::trim).filter(|n| !n.is_empty()) {
            let slug = slugify(name);
            if slug.is_empty() {
                self.report(identifier, IssueKind::EmptyTermSlug(label, name.to_string()));
                continue;
            }
            if terms.iter().any(|(seen, _)| *seen == slug) {
                continue;
            }
            terms.push((slug, name.to_string()));
        }
        terms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(identifier: &str, raw: &str) -> ArticleSource {
        ArticleSource::new(identifier, raw)
    }

    fn post(identifier: &str, title: &str, date: &str) -> ArticleSource {
        source(
            identifier,
            &format!("---\ntitle: {}\ndate: {}\n---\nBody of {}.", title, date, title),
        )
    }

    fn normalize(sources: Vec<ArticleSource>) -> Catalog {
        let config = SiteConfig::default();
        Normalizer::new(&config).normalize(sources, Vec::new())
    }

    #[test]
    fn test_sorted_by_date_descending() {
        let catalog = normalize(vec![
            post("jan.md", "Jan", "2025-01-01"),
            post("mar.md", "Mar", "2025-03-01"),
            post("feb.md", "Feb", "2025-02-01"),
        ]);

        let dates: Vec<_> = catalog.list_articles().iter().map(|a| a.iso_date()).collect();
        assert_eq!(dates, vec!["2025-03-01", "2025-02-01", "2025-01-01"]);
    }

    #[test]
    fn test_equal_dates_keep_discovery_order() {
        let catalog = normalize(vec![
            post("b.md", "B", "2025-01-01"),
            post("a.md", "A", "2025-01-01"),
            post("c.md", "C", "2025-01-01"),
        ]);

        // Sources are sorted by identifier before the fold
        let slugs: Vec<_> = catalog.list_articles().iter().map(|a| a.slug.as_str()).collect();
        assert_eq!(slugs, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_missing_title_is_isolated() {
        let catalog = normalize(vec![
            source("untitled.md", "---\ndate: 2025-01-01\n---\nNo title."),
            post("ok.md", "Fine", "2025-01-02"),
        ]);

        assert_eq!(catalog.list_articles().len(), 1);
        assert!(catalog.get_article_by_slug("untitled").is_none());
        assert!(catalog.get_article_by_slug("ok").is_some());
        assert_eq!(
            catalog.issues()[0],
            LoadIssue::new("untitled.md", IssueKind::MissingField("title"))
        );
    }

    #[test]
    fn test_missing_or_blank_date_is_skipped() {
        let catalog = normalize(vec![
            source("a.md", "---\ntitle: A\n---\nbody"),
            source("b.md", "---\ntitle: B\ndate: \"  \"\n---\nbody"),
        ]);
        assert!(catalog.is_empty());
        assert!(catalog
            .issues()
            .iter()
            .all(|i| i.kind == IssueKind::MissingField("date")));
    }

    #[test]
    fn test_no_frontmatter_is_skipped_without_panic() {
        let raw = "# Loose note\n\nJust text, no metadata.";
        let catalog = normalize(vec![source("loose.md", raw)]);

        assert!(catalog.is_empty());
        assert_eq!(catalog.issues().len(), 1);
        assert_eq!(catalog.issues()[0].kind, IssueKind::MissingField("title"));
    }

    #[test]
    fn test_malformed_frontmatter_is_skipped() {
        let catalog = normalize(vec![
            source("bad.md", "---\ntitle: [broken\ndate: 2025-01-01\n---\nbody"),
            post("good.md", "Good", "2025-01-01"),
        ]);

        assert_eq!(catalog.len(), 1);
        assert!(matches!(
            catalog.issues()[0].kind,
            IssueKind::MalformedFrontMatter(_)
        ));
    }

    #[test]
    fn test_duplicate_slug_later_wins() {
        let catalog = normalize(vec![
            source(
                "2024/hello-world.md",
                "---\ntitle: First\ndate: 2024-01-01\ncategories: [Old]\n---\nfirst",
            ),
            source(
                "2025/hello-world.md",
                "---\ntitle: Second\ndate: 2025-01-01\ncategories: [New]\n---\nsecond",
            ),
        ]);

        assert_eq!(catalog.len(), 1);
        let article = catalog.get_article_by_slug("hello-world").unwrap();
        assert_eq!(article.title, "Second");
        assert_eq!(article.source, "2025/hello-world.md");

        // Counts only reflect surviving articles
        assert!(catalog.get_category("old").is_none());
        assert_eq!(catalog.get_category("new").unwrap().article_count, 1);
        assert!(catalog.issues().iter().any(|i| matches!(
            &i.kind,
            IssueKind::DuplicateSlug { replaced, .. } if replaced == "2024/hello-world.md"
        )));
    }

    #[test]
    fn test_replaced_duplicate_does_not_name_categories() {
        let catalog = normalize(vec![
            source(
                "a/dup.md",
                "---\ntitle: Old\ndate: 2024-01-01\ncategories: [WEB DEV, Legacy]\ntags: [RUST]\n---\nx",
            ),
            source(
                "b/dup.md",
                "---\ntitle: New\ndate: 2025-01-01\ncategories: [Web Dev]\ntags: [Rust]\n---\nx",
            ),
        ]);

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get_category("web-dev").unwrap().name, "Web Dev");
        assert_eq!(catalog.get_tag("rust").unwrap().name, "Rust");
        assert!(catalog.get_category("legacy").is_none());
        assert_eq!(catalog.list_categories().len(), 1);
    }

    #[test]
    fn test_explicit_slug_overrides_identifier() {
        let catalog = normalize(vec![source(
            "posts/draft-name.md",
            "---\ntitle: T\ndate: 2025-01-01\nslug: Final Name\n---\nx",
        )]);
        assert!(catalog.get_article_by_slug("final-name").is_some());
        assert!(catalog.get_article_by_slug("draft-name").is_none());
    }

    #[test]
    fn test_invalid_date_kept_with_sentinel() {
        let catalog = normalize(vec![
            source("odd.md", "---\ntitle: Odd\ndate: someday\n---\nx"),
            post("new.md", "New", "2025-01-01"),
        ]);

        let articles = catalog.list_articles();
        assert_eq!(articles.len(), 2);
        let odd = &articles[1];
        assert_eq!(odd.slug, "odd");
        assert!(odd.date_invalid);
        assert_eq!(odd.date, epoch_sentinel());
        assert_eq!(odd.formatted_date, "");
        assert_eq!(
            catalog.issues()[0].kind,
            IssueKind::InvalidDate("someday".to_string())
        );
    }

    #[test]
    fn test_tags_preserve_order() {
        let catalog = normalize(vec![source(
            "t.md",
            "---\ntitle: T\ndate: 2025-01-01\ntags: [\"a\", \"b\"]\n---\nx",
        )]);
        assert_eq!(catalog.get_article_by_slug("t").unwrap().tags, vec!["a", "b"]);
    }

    #[test]
    fn test_tags_deduplicated_and_non_strings_dropped() {
        let catalog = normalize(vec![source(
            "t.md",
            "---\ntitle: T\ndate: 2025-01-01\ntags: [Rust, 7, rust, \" \", Web]\n---\nx",
        )]);
        assert_eq!(
            catalog.get_article_by_slug("t").unwrap().tags,
            vec!["Rust", "Web"]
        );
    }

    #[test]
    fn test_category_first_seen_casing_and_counts() {
        let catalog = normalize(vec![
            source("a.md", "---\ntitle: A\ndate: 2025-01-01\ncategory: Web Dev\n---\nx"),
            source(
                "b.md",
                "---\ntitle: B\ndate: 2025-01-02\ncategories: [web dev, Web  Dev, Tools]\n---\nx",
            ),
        ]);

        let web = catalog.get_category("web-dev").unwrap();
        assert_eq!(web.name, "Web Dev");
        assert_eq!(web.article_count, 2);
        assert_eq!(
            catalog.get_article_by_slug("b").unwrap().categories,
            vec!["web-dev", "tools"]
        );
        for category in catalog.list_categories() {
            let referencing = catalog
                .list_articles()
                .iter()
                .filter(|a| a.in_category(&category.slug))
                .count();
            assert_eq!(category.article_count, referencing);
        }
    }

    #[test]
    fn test_excerpt_sources() {
        let catalog = normalize(vec![
            source(
                "explicit.md",
                "---\ntitle: E\ndate: 2025-01-01\nexcerpt: Given\ndescription: Ignored\n---\nbody",
            ),
            source(
                "described.md",
                "---\ntitle: D\ndate: 2025-01-01\ndescription: From description\n---\nbody",
            ),
            source("derived.md", "---\ntitle: X\ndate: 2025-01-01\n---\n# Heading\n\nBody text."),
        ]);

        assert_eq!(catalog.get_article_by_slug("explicit").unwrap().excerpt, "Given");
        assert_eq!(
            catalog.get_article_by_slug("described").unwrap().excerpt,
            "From description"
        );
        assert_eq!(
            catalog.get_article_by_slug("derived").unwrap().excerpt,
            "Heading Body text."
        );
    }

    #[test]
    fn test_drafts_respect_config() {
        let draft = source(
            "draft.md",
            "---\ntitle: Draft\ndate: 2025-01-01\npublished: false\n---\nx",
        );

        let catalog = normalize(vec![draft.clone()]);
        assert!(catalog.is_empty());
        assert_eq!(catalog.issues()[0].kind, IssueKind::Draft);

        let config = SiteConfig {
            render_drafts: true,
            ..Default::default()
        };
        let catalog = Normalizer::new(&config).normalize(vec![draft], Vec::new());
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_formatted_date_uses_config() {
        let config = SiteConfig {
            date_format: "YYYY/MM/DD".to_string(),
            ..Default::default()
        };
        let catalog = Normalizer::new(&config)
            .normalize(vec![post("a.md", "A", "2025-03-21 08:00")], Vec::new());
        let article = catalog.get_article_by_slug("a").unwrap();
        assert_eq!(article.formatted_date, "2025/03/21");
        assert_eq!(article.iso_date(), "2025-03-21");
    }

    #[test]
    fn test_unusable_date_format_falls_back_to_iso() {
        let config = SiteConfig {
            date_format: "YYYY 100%".to_string(),
            ..Default::default()
        };
        let catalog = Normalizer::new(&config)
            .normalize(vec![post("a.md", "A", "2025-03-21")], Vec::new());

        assert_eq!(catalog.get_article_by_slug("a").unwrap().formatted_date, "2025-03-21");
        assert_eq!(
            catalog.issues()[0],
            LoadIssue::new("config", IssueKind::InvalidDateFormat("YYYY 100%".to_string()))
        );
        assert_eq!(catalog.skipped(), 0);
    }

    #[test]
    fn test_category_descriptions_from_config() {
        let mut config = SiteConfig::default();
        config
            .category_descriptions
            .insert("Web Dev".to_string(), "Building for the browser".to_string());
        let catalog = Normalizer::new(&config).normalize(
            vec![
                source("a.md", "---\ntitle: A\ndate: 2025-01-01\ncategories: [web dev, Tools]\n---\nx"),
            ],
            Vec::new(),
        );

        assert_eq!(
            catalog.get_category("web-dev").unwrap().description.as_deref(),
            Some("Building for the browser")
        );
        assert_eq!(catalog.get_category("tools").unwrap().description, None);
    }

    #[test]
    fn test_invalid_updated_is_dropped() {
        let catalog = normalize(vec![source(
            "u.md",
            "---\ntitle: U\ndate: 2025-01-01\nupdated: later\n---\nx",
        )]);
        assert_eq!(catalog.get_article_by_slug("u").unwrap().updated, None);
        assert_eq!(
            catalog.issues()[0].kind,
            IssueKind::InvalidUpdated("later".to_string())
        );
    }

    #[test]
    fn test_loader_issues_are_kept() {
        let config = SiteConfig::default();
        let earlier = vec![LoadIssue::new("x.md", IssueKind::Unreadable("denied".into()))];
        let catalog = Normalizer::new(&config).normalize(Vec::new(), earlier.clone());
        assert!(catalog.is_empty());
        assert_eq!(catalog.issues(), earlier.as_slice());
    }
}
