//! Show a single article

use anyhow::Result;
use std::fmt::Write;

use crate::catalog::Catalog;
use crate::helpers::full_date;

/// Print one article with its metadata and raw Markdown body
pub fn run(catalog: &Catalog, slug: &str, json: bool) -> Result<()> {
    print!("{}", render(catalog, slug, json)?);
    Ok(())
}

pub fn render(catalog: &Catalog, slug: &str, json: bool) -> Result<String> {
    let Some(article) = catalog.get_article_by_slug(slug) else {
        anyhow::bail!("Article not found: {}", slug);
    };

    if json {
        return Ok(serde_json::to_string_pretty(article)? + "\n");
    }

    let category_names: Vec<&str> = article
        .categories
        .iter()
        .map(|c| {
            catalog
                .get_category(c)
                .map(|cat| cat.name.as_str())
                .unwrap_or(c.as_str())
        })
        .collect();

    let mut out = String::new();
    writeln!(out, "{}", article.title)?;
    if article.date_invalid {
        writeln!(out, "Date:       unknown")?;
    } else {
        writeln!(out, "Date:       {}", full_date(&article.date))?;
    }
    if let Some(updated) = &article.updated {
        writeln!(out, "Updated:    {}", full_date(updated))?;
    }
    writeln!(out, "Categories: {}", category_names.join(", "))?;
    writeln!(out, "Tags:       {}", article.tags.join(", "))?;
    writeln!(out, "Source:     {}", article.source)?;
    writeln!(out, "Excerpt:    {}", article.excerpt)?;

    let (newer, older) = catalog.adjacent(slug);
    if let Some(newer) = newer {
        writeln!(out, "Newer:      {} [{}]", newer.title, newer.slug)?;
    }
    if let Some(older) = older {
        writeln!(out, "Older:      {} [{}]", older.title, older.slug)?;
    }

    writeln!(out)?;
    writeln!(out, "{}", article.content.trim_end())?;

    Ok(out)
}
