//! Content module - loads article sources and normalizes them

mod article;
mod frontmatter;
pub mod loader;
pub mod markdown;
mod normalizer;

pub use article::{Article, Category, Tag};
pub use frontmatter::{DateValue, FrontMatter};
pub use loader::{ArticleSource, ContentSource, LoadedSources};
pub use normalizer::Normalizer;
