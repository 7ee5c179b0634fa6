//! HTML parsing and multi-strategy artist-name extraction

use scraper::{Html, Selector};
use std::collections::HashSet;

use crate::error::{CoreError, CoreResult};

const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "of", "in", "at", "on", "for", "is", "are", "was", "were", "be", "band", "bands", "music",
    "song", "songs", "album", "albums", "track", "tracks", "local", "new", "best", "top", "artist", "artists",
];

/// A parsed HTML document
pub struct Doc {
    html: Html,
}

/// Parse raw HTML into a document.
pub fn parse(html: &str) -> Doc {
    Doc { html: Html::parse_document(html) }
}

/// Validate that `selector` is syntactically well-formed CSS. An empty
/// selector is always valid (it means "the document body").
pub fn validate_selector(selector: &str) -> CoreResult<()> {
    if selector.is_empty() {
        return Ok(());
    }
    Selector::parse(selector).map_err(|e| CoreError::InvalidSelector(format!("{e:?}")))?;
    Ok(())
}

/// Extract text from `doc` matching `selector`.
///
/// An empty selector means "the document body". A selector matching
/// zero nodes is a failure ([`CoreError::NoElements`]), distinct from a
/// selector matching nodes whose text happens to be empty. Multiple
/// matched nodes have their trimmed text concatenated with a newline.
pub fn extract_text(doc: &Doc, selector: &str) -> CoreResult<String> {
    let effective_selector = if selector.is_empty() { "body" } else { selector };
    let parsed = Selector::parse(effective_selector).map_err(|e| CoreError::InvalidSelector(format!("{e:?}")))?;

    let matches: Vec<String> = doc
        .html
        .select(&parsed)
        .map(|el| el.text().collect::<Vec<_>>().join(" ").trim().to_string())
        .collect();

    if matches.is_empty() {
        return Err(CoreError::NoElements);
    }

    Ok(matches.join("\n"))
}

/// Run all four extraction strategies over `text` and return the
/// deduplicated, cleaned union of candidate artist names.
pub fn extract_artist_names(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut result = Vec::new();

    let mut candidates = Vec::new();
    candidates.extend(extract_comma_list(text));
    candidates.extend(extract_quoted_names(text));
    candidates.extend(extract_bullet_list(text));
    candidates.extend(extract_lines(text));

    for raw in candidates {
        if let Some(cleaned) = clean_candidate(&raw) {
            if seen.insert(cleaned.clone()) {
                result.push(cleaned);
            }
        }
    }

    result
}

fn extract_comma_list(text: &str) -> Vec<String> {
    text.split(',').map(|s| s.trim().to_string()).collect()
}

fn extract_quoted_names(text: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut chars = text.chars().peekable();
    let mut in_quotes = false;
    let mut current = String::new();

    while let Some(c) = chars.next() {
        if c == '"' {
            if in_quotes {
                names.push(current.clone());
                current.clear();
            }
            in_quotes = !in_quotes;
        } else if in_quotes {
            current.push(c);
        }
    }

    names
}

fn extract_bullet_list(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| {
            let trimmed = line.trim_start();
            for marker in ['-', '*', '•', '·'] {
                let prefix = format!("{marker} ");
                if let Some(rest) = trimmed.strip_prefix(&prefix) {
                    return Some(rest.trim().to_string());
                }
            }
            None
        })
        .collect()
}

/// A line containing a comma is already covered by the comma-list
/// strategy; treating it whole here would add a redundant
/// multi-name candidate alongside its already-split pieces.
fn extract_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty() && !l.contains(','))
        .collect()
}

/// Trim whitespace and leading bullet punctuation, drop names of
/// length < 2, drop stop-list words. Returns `None` if the candidate
/// should be dropped.
fn clean_candidate(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_start_matches(['-', '*', '•', '·', ' ']).trim();

    if trimmed.chars().count() < 2 {
        return None;
    }

    if STOP_WORDS.contains(&trimmed.to_lowercase().as_str()) {
        return None;
    }

    Some(trimmed.to_string())
}
