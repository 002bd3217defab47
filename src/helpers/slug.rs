//! Slug generation

use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").expect("whitespace pattern is valid");
    static ref NON_WORD: Regex = Regex::new(r"[^\w-]+").expect("non-word pattern is valid");
}

/// Lower-case, whitespace runs to `-`, strip everything that is not a word
/// character or `-`. Word characters are Unicode-aware, so CJK names keep
/// their letters.
pub fn slugify(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let dashed = WHITESPACE.replace_all(&lowered, "-");
    NON_WORD.replace_all(&dashed, "").into_owned()
}

/// File stem of a path-like identifier (`posts/hello.md` -> `hello`)
pub fn identifier_stem(identifier: &str) -> &str {
    Path::new(identifier)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(identifier)
}
