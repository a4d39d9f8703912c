//! String predicates over raw line text. Nothing here knows about documents
//! or positions; byte indices returned refer to the `&str` passed in.

use std::sync::OnceLock;

use regex::Regex;

fn trailing_whitespace_regex() -> &'static Regex {
    static TRAILING: OnceLock<Regex> = OnceLock::new();
    TRAILING.get_or_init(|| Regex::new(r"\s+$").expect("Invalid trailing whitespace regex"))
}

fn whitespace_run_regex() -> &'static Regex {
    static RUN: OnceLock<Regex> = OnceLock::new();
    RUN.get_or_init(|| Regex::new(r"\s{2,}").expect("Invalid whitespace run regex"))
}

/// Byte index where trailing whitespace begins, if there is any.
pub fn trailing_whitespace_start(text: &str) -> Option<usize> {
    trailing_whitespace_regex().find(text).map(|m| m.start())
}

/// Collapses every run of two or more whitespace characters to a single
/// space. Returns `None` when there is nothing to collapse.
pub fn collapse_whitespace_runs(segment: &str) -> Option<String> {
    let runs = whitespace_run_regex();
    runs.is_match(segment)
        .then(|| runs.replace_all(segment, " ").into_owned())
}

/// Whole-line comment: the first non-whitespace text is a comment prefix, or
/// the line is a one-line `/* ... */` block.
pub fn is_line_commented(text: &str, prefixes: &[String]) -> bool {
    let trimmed = text.trim();
    if trimmed.starts_with("/*") && trimmed.ends_with("*/") {
        return true;
    }
    prefixes
        .iter()
        .any(|prefix| !prefix.is_empty() && trimmed.starts_with(prefix.as_str()))
}

/// Byte index of a comment that follows code on the same line.
///
/// A prefix only counts when whitespace precedes it, so `http://` is not
/// mistaken for a comment.
pub fn inline_comment_start(text: &str, prefixes: &[String]) -> Option<usize> {
    let code_start = text.len() - text.trim_start().len();
    prefixes
        .iter()
        .map(String::as_str)
        .chain(std::iter::once("/*"))
        .filter(|prefix| !prefix.is_empty())
        .filter_map(|prefix| {
            text.match_indices(prefix)
                .map(|(idx, _)| idx)
                .find(|&idx| {
                    idx > code_start
                        && text[..idx]
                            .chars()
                            .next_back()
                            .is_some_and(char::is_whitespace)
                })
        })
        .min()
}

/// `/*` or `/**` opening a comment that continues on later lines.
pub fn is_block_comment_start(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.starts_with("/*") && !trimmed[2..].contains("*/")
}

/// A continuation line of a block comment, `*` optionally followed by text.
pub fn is_block_comment(text: &str) -> bool {
    let trimmed = text.trim_start();
    trimmed.starts_with('*') && !trimmed.starts_with("*/")
}

/// A continuation line with nothing after the `*`.
pub fn is_empty_block_comment(text: &str) -> bool {
    text.trim() == "*"
}

/// The line closing a block comment, including a one-line `/** ... */`.
/// Code followed by a trailing `/* */` does not count.
pub fn is_block_comment_end(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.ends_with("*/") && (trimmed.starts_with('*') || trimmed.starts_with("/*"))
}

/// Indentation plus the `*` of a continuation line, e.g. `"   *"` for
/// `"   * some words"`.
pub fn block_comment_prefix(text: &str) -> &str {
    match text.find('*') {
        Some(idx) => &text[..=idx],
        None => " *",
    }
}
