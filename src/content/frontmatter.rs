//! Front-matter parsing

use chrono::NaiveDateTime;
use serde::de::{self, IgnoredAny, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;

use crate::error::FrontMatterError;
use crate::helpers::{parse_date_string, parse_timestamp};

/// Accepts a single string or a list; non-string list entries are dropped
fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Entry {
        Text(String),
        #[allow(dead_code)]
        Other(IgnoredAny),
    }

    struct LenientStrings;

    impl<'de> Visitor<'de> for LenientStrings {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(entry) = seq.next_element::<Entry>()? {
                if let Entry::Text(text) = entry {
                    vec.push(text);
                }
            }
            Ok(vec)
        }

        fn visit_bool<E>(self, _: bool) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_i64<E>(self, _: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_u64<E>(self, _: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_f64<E>(self, _: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(LenientStrings)
}

/// Accepts any scalar and keeps its textual form (`title: 2024` is a valid title)
fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct ScalarString;

    impl<'de> Visitor<'de> for ScalarString {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or scalar value")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
            Ok(Some(value))
        }

        fn visit_bool<E: de::Error>(self, value: bool) -> Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }
    }

    deserializer.deserialize_any(ScalarString)
}

/// A date as written in front-matter
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DateValue {
    /// Native integer value, read as Unix seconds
    Timestamp(i64),
    /// Date string in one of the accepted layouts
    Text(String),
    /// Anything else (lists, maps, floats); never parses
    Other(#[allow(dead_code)] IgnoredAny),
}

impl DateValue {
    /// Blank strings count as a missing date
    pub fn is_blank(&self) -> bool {
        matches!(self, DateValue::Text(s) if s.trim().is_empty())
    }

    /// Convert to a canonical timestamp, `None` when unparsable
    pub fn to_naive(&self) -> Option<NaiveDateTime> {
        match self {
            DateValue::Timestamp(secs) => parse_timestamp(*secs),
            DateValue::Text(s) => parse_date_string(s),
            DateValue::Other(_) => None,
        }
    }

    /// Raw form for diagnostics
    pub fn describe(&self) -> String {
        match self {
            DateValue::Timestamp(secs) => secs.to_string(),
            DateValue::Text(s) => s.clone(),
            DateValue::Other(_) => "<non-scalar>".to_string(),
        }
    }
}

/// Front-matter data from an article source
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    #[serde(deserialize_with = "scalar_string")]
    pub title: Option<String>,
    pub date: Option<DateValue>,
    pub updated: Option<DateValue>,
    #[serde(deserialize_with = "scalar_string")]
    pub excerpt: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub category: Vec<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub categories: Vec<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub slug: Option<String>,
    /// Articles are published unless they say otherwise
    pub published: bool,
}

impl Default for FrontMatter {
    fn default() -> Self {
        Self {
            title: None,
            date: None,
            updated: None,
            excerpt: None,
            description: None,
            tags: Vec::new(),
            category: Vec::new(),
            categories: Vec::new(),
            slug: None,
            published: true,
        }
    }
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, body). Without a recognized block the whole
    /// input is the body.
    pub fn parse(content: &str) -> Result<(Self, &str), FrontMatterError> {
        let trimmed = content.trim_start();

        if trimmed.starts_with("---") {
            return Ok(Self::parse_yaml(trimmed)?.unwrap_or((FrontMatter::default(), content)));
        }

        if trimmed.starts_with(";;;") || trimmed.starts_with('{') {
            return Self::parse_json(trimmed);
        }

        Ok((FrontMatter::default(), content))
    }

    /// `Ok(None)` means the `---` block is not front-matter at all
    fn parse_yaml(content: &str) -> Result<Option<(Self, &str)>, FrontMatterError> {
        let rest = content[3..].trim_start_matches(['\n', '\r']);

        let Some(end_pos) = rest.find("\n---") else {
            return Ok(None);
        };

        let yaml_content = &rest[..end_pos];
        let body = rest[end_pos + 4..].trim_start_matches(['\n', '\r']);

        if yaml_content.trim().is_empty() {
            return Ok(Some((FrontMatter::default(), body)));
        }

        // A `---` pair around prose is a Markdown thematic break, not metadata
        if !has_yaml_structure(yaml_content) {
            return Ok(None);
        }

        let fm = serde_yaml::from_str::<FrontMatter>(yaml_content)?;
        Ok(Some((fm, body)))
    }

    fn parse_json(content: &str) -> Result<(Self, &str), FrontMatterError> {
        // JSON front-matter wrapped in ;;;
        if let Some(rest) = content.strip_prefix(";;;") {
            let end_pos = rest.find(";;;").ok_or(FrontMatterError::UnterminatedJson)?;
            let body = rest[end_pos + 3..].trim_start_matches(['\n', '\r']);
            let fm: FrontMatter = serde_json::from_str(&rest[..end_pos])?;
            return Ok((fm, body));
        }

        // Bare JSON object at the start; find the matching closing brace
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;
        for (i, c) in content.char_indices() {
            if in_string {
                match c {
                    _ if escaped => escaped = false,
                    '\\' => escaped = true,
                    '"' => in_string = false,
                    _ => {}
                }
                continue;
            }
            match c {
                '"' => in_string = true,
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        let fm: FrontMatter = serde_json::from_str(&content[..=i])?;
                        let body = content[i + 1..].trim_start_matches(['\n', '\r']);
                        return Ok((fm, body));
                    }
                }
                _ => {}
            }
        }

        Err(FrontMatterError::UnterminatedJson)
    }

    /// Explicit excerpt, falling back to `description`
    pub fn summary(&self) -> Option<&str> {
        [self.excerpt.as_deref(), self.description.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
    }

    /// Category names from both `category` and `categories`, in that order
    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.category
            .iter()
            .chain(self.categories.iter())
            .map(String::as_str)
    }
}

/// At least one line must look like `key: value` with a plain ASCII key
fn has_yaml_structure(yaml: &str) -> bool {
    yaml.lines().any(|line| {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return false;
        }
        let Some(colon_pos) = trimmed.find(':') else {
            return false;
        };
        let key = &trimmed[..colon_pos];
        let is_valid_key = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            && !matches!(key, "http" | "https" | "ftp");
        let after_colon = &trimmed[colon_pos + 1..];
        is_valid_key && (after_colon.is_empty() || after_colon.starts_with(' '))
    })
}
