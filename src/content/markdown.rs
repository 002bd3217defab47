//! Markdown helpers for excerpt extraction
//!
//! Rendering to HTML is left to the presentation layer; the core only needs
//! the plain text of a body to build a fallback excerpt.

use pulldown_cmark::{Event, Options, Parser, TagEnd};

/// Marker separating a hand-written excerpt from the rest of the body
pub const MORE_MARKER: &str = "<!-- more -->";

/// Text before the `<!-- more -->` marker, if present and non-empty
pub fn split_excerpt(content: &str) -> Option<&str> {
    let pos = content.find(MORE_MARKER)?;
    let excerpt = content[..pos].trim();
    (!excerpt.is_empty()).then_some(excerpt)
}

/// Plain text of a Markdown document with whitespace collapsed
pub fn plain_text(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;

    let mut text = String::new();
    for event in Parser::new_ext(markdown, options) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            Event::End(
                TagEnd::Paragraph
                | TagEnd::Heading { .. }
                | TagEnd::Item
                | TagEnd::CodeBlock
                | TagEnd::BlockQuote { .. }
                | TagEnd::TableCell,
            ) => text.push(' '),
            _ => {}
        }
    }

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Build a fallback excerpt: the `<!-- more -->` section if present, otherwise
/// the first `length` characters of the body's plain text. `ellipsis` is
/// appended only when text was cut off.
pub fn excerpt(body: &str, length: usize, ellipsis: &str) -> String {
    if let Some(manual) = split_excerpt(body) {
        return plain_text(manual);
    }

    let text = plain_text(body);
    match text.char_indices().nth(length) {
        Some((cut, _)) => format!("{}{}", text[..cut].trim_end(), ellipsis),
        None => text,
    }
}
