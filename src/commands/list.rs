//! List catalog content

use anyhow::Result;
use std::fmt::Write;

use crate::catalog::Catalog;
use crate::content::Article;

/// Print catalog content by type
pub fn run(catalog: &Catalog, content_type: &str, filter: Option<&str>, json: bool) -> Result<()> {
    print!("{}", render(catalog, content_type, filter, json)?);
    Ok(())
}

/// Render catalog content by type
///
/// `filter` narrows articles to a category (`category:<slug>`) or tag
/// (`tag:<slug>`).
pub fn render(
    catalog: &Catalog,
    content_type: &str,
    filter: Option<&str>,
    json: bool,
) -> Result<String> {
    let mut out = String::new();

    match content_type {
        "article" | "articles" | "post" | "posts" => {
            let articles: Vec<&Article> = match filter.map(|f| f.split_once(':')) {
                None => catalog.list_articles().iter().collect(),
                Some(Some(("category", slug))) => catalog.list_articles_by_category(slug),
                Some(Some(("tag", slug))) => catalog.list_articles_by_tag(slug),
                Some(_) => anyhow::bail!(
                    "Unknown filter: {}. Use category:<slug> or tag:<slug>",
                    filter.unwrap_or_default()
                ),
            };

            if json {
                return Ok(serde_json::to_string_pretty(&articles)? + "\n");
            }

            writeln!(out, "Articles ({}):", articles.len())?;
            for article in articles {
                let date = if article.date_invalid {
                    "????-??-??".to_string()
                } else {
                    article.iso_date()
                };
                writeln!(out, "  {} - {} [{}]", date, article.title, article.slug)?;
            }
        }
        "category" | "categories" => {
            if json {
                let categories: Vec<_> = catalog.list_categories().collect();
                return Ok(serde_json::to_string_pretty(&categories)? + "\n");
            }

            writeln!(out, "Categories ({}):", catalog.list_categories().len())?;
            for category in catalog.list_categories() {
                writeln!(
                    out,
                    "  {} ({}) [{}]",
                    category.name, category.article_count, category.slug
                )?;
            }
        }
        "tag" | "tags" => {
            let mut tags: Vec<_> = catalog.list_tags().collect();

            if json {
                return Ok(serde_json::to_string_pretty(&tags)? + "\n");
            }

            // Most used first, first-seen order among equals
            tags.sort_by(|a, b| b.article_count.cmp(&a.article_count));
            writeln!(out, "Tags ({}):", tags.len())?;
            for tag in tags {
                writeln!(out, "  {} ({})", tag.name, tag.article_count)?;
            }
        }
        "issue" | "issues" => {
            if json {
                return Ok(serde_json::to_string_pretty(catalog.issues())? + "\n");
            }

            writeln!(out, "Issues ({}):", catalog.issues().len())?;
            for issue in catalog.issues() {
                writeln!(out, "  {}", issue)?;
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: article, category, tag, issue",
                content_type
            );
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::content::{ArticleSource, Normalizer};

    fn catalog() -> Catalog {
        let config = SiteConfig::default();
        Normalizer::new(&config).normalize(
            vec![
                ArticleSource::new(
                    "hello-world.md",
                    "---\ntitle: Hello\ndate: 2025-03-20\ntags: [intro]\ncategories: [Blog]\n---\nHi",
                ),
                ArticleSource::new(
                    "wetools.md",
                    "---\ntitle: WETools\ndate: 2025-04-25\ntags: [tools, intro]\ncategories: [Project]\n---\nTools",
                ),
                ArticleSource::new("broken.md", "no metadata"),
            ],
            Vec::new(),
        )
    }

    #[test]
    fn test_render_articles() {
        let out = render(&catalog(), "article", None, false).unwrap();
        assert_eq!(
            out,
            "Articles (2):\n  2025-04-25 - WETools [wetools]\n  2025-03-20 - Hello [hello-world]\n"
        );
    }

    #[test]
    fn test_render_filtered_articles() {
        let out = render(&catalog(), "articles", Some("category:blog"), false).unwrap();
        assert!(out.starts_with("Articles (1):"));
        assert!(out.contains("[hello-world]"));

        let out = render(&catalog(), "articles", Some("tag:intro"), false).unwrap();
        assert!(out.starts_with("Articles (2):"));

        assert!(render(&catalog(), "articles", Some("author:me"), false).is_err());
    }

    #[test]
    fn test_render_categories_and_tags() {
        let out = render(&catalog(), "category", None, false).unwrap();
        assert_eq!(
            out,
            "Categories (2):\n  Blog (1) [blog]\n  Project (1) [project]\n"
        );

        let out = render(&catalog(), "tags", None, false).unwrap();
        assert_eq!(out, "Tags (2):\n  intro (2)\n  tools (1)\n");
    }

    #[test]
    fn test_render_json() {
        let out = render(&catalog(), "categories", None, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["slug"], "blog");
        assert_eq!(value[0]["article_count"], 1);
    }

    #[test]
    fn test_render_issues() {
        let out = render(&catalog(), "issues", None, false).unwrap();
        assert!(out.contains("broken.md: missing required field `title`"));
    }

    #[test]
    fn test_unknown_type() {
        assert!(render(&catalog(), "route", None, false).is_err());
    }
}
