//! Fuzzy artist resolver: free-form string → catalog artist + confidence

use std::sync::Arc;

use playlist_scout_catalog_client::{Artist, CatalogClient};
use tracing::{debug, instrument};

use crate::error::{CoreError, CoreResult};

/// One successful resolution produced by [`Resolver::search_multiple`]
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMatch {
    pub query: String,
    pub artist: Artist,
    pub confidence: f64,
}

/// Resolves free-form artist names against the catalog, scoring the
/// quality of the match.
pub struct Resolver {
    catalog: Arc<dyn CatalogClient>,
}

impl Resolver {
    pub fn new(catalog: Arc<dyn CatalogClient>) -> Self {
        Resolver { catalog }
    }

    /// Resolve a single query to its best catalog match.
    ///
    /// Rejects empty/whitespace input. Propagates catalog errors
    /// untransformed; a catalog hit of zero results fails with
    /// [`CoreError::NoMatch`].
    #[instrument(skip(self))]
    pub async fn find_best_match(&self, query: &str) -> CoreResult<(Artist, f64)> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(CoreError::EmptyQuery);
        }

        let candidate = self
            .catalog
            .search_artist(trimmed)
            .await?
            .ok_or_else(|| CoreError::NoMatch(trimmed.to_string()))?;

        let confidence = confidence_score(trimmed, &candidate.name);
        debug!(query = trimmed, candidate = %candidate.name, confidence, "resolved artist");
        Ok((candidate, confidence))
    }

    /// Resolve a batch of queries independently. Queries whose catalog
    /// search errors are dropped from the output; everything else is
    /// emitted in input order. Never fails as a whole.
    #[instrument(skip(self, queries))]
    pub async fn search_multiple(&self, queries: &[String]) -> Vec<ResolvedMatch> {
        let mut results = Vec::with_capacity(queries.len());
        for query in queries {
            match self.find_best_match(query).await {
                Ok((artist, confidence)) => results.push(ResolvedMatch {
                    query: query.clone(),
                    artist,
                    confidence,
                }),
                Err(e) => {
                    debug!(query = %query, error = %e, "skipping query during batch resolve");
                }
            }
        }
        results
    }
}

/// Score the match quality of `query` against `candidate_name`.
///
/// Scale (see the monotonicity contract this preserves):
/// - exact case-insensitive match: 1.0
/// - query is a substring of the candidate: [0.8, 1.0]
/// - candidate is a substring of the query: [0.7, 0.9]
/// - otherwise, a normalized edit-distance similarity: [0.1, 0.7]
///
/// Note the second and third bands overlap at 0.8-0.9: a short artist
/// name fully contained in a long query can score higher than a long
/// query barely contained in the artist name. This mirrors the existing
/// behavior downstream callers depend on and is intentionally preserved.
pub fn confidence_score(query: &str, candidate_name: &str) -> f64 {
    let q = query.trim().to_lowercase();
    let c = candidate_name.trim().to_lowercase();

    if q.is_empty() || c.is_empty() {
        return 0.1;
    }

    if q == c {
        return 1.0;
    }

    if c.contains(&q) {
        let ratio = q.len() as f64 / c.len() as f64;
        return (0.8 + 0.2 * ratio).min(1.0);
    }

    if q.contains(&c) {
        let ratio = c.len() as f64 / q.len() as f64;
        return (0.7 + 0.2 * ratio).min(0.9);
    }

    let sim = normalized_similarity(&q, &c);
    (0.1 + 0.6 * sim).clamp(0.1, 0.7)
}

/// `1 - (levenshtein distance / max length)`, clamped to `[0, 1]`.
fn normalized_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    let distance = levenshtein_distance(a, b);
    (1.0 - distance as f64 / max_len as f64).clamp(0.0, 1.0)
}

fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (n, m) = (a.len(), b.len());

    if n == 0 {
        return m;
    }
    if m == 0 {
        return n;
    }

    let mut prev: Vec<usize> = (0..=m).collect();
    let mut curr = vec![0usize; m + 1];

    for i in 1..=n {
        curr[0] = i;
        for j in 1..=m {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[m]
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("Radiohead", "radiohead", 1.0, 1.0)]
    #[case("RADIOHEAD", "Radiohead", 1.0, 1.0)]
    #[case("head", "Radiohead", 0.8, 1.0)]
    #[case("the radiohead band", "radiohead", 0.7, 0.9)]
    #[case("zzz", "Radiohead", 0.0, 0.5)]
    #[case("Radiohed", "Radiohead", 0.1, 0.7)]
    #[case("", "Radiohead", 0.1, 0.1)]
    fn test_confidence_score_bands(#[case] query: &str, #[case] candidate: &str, #[case] min: f64, #[case] max: f64) {
        let score = confidence_score(query, candidate);
        assert!(
            (min..=max).contains(&score),
            "confidence_score({query:?}, {candidate:?}) = {score}, expected within [{min}, {max}]"
        );
    }

    #[rstest]
    #[case("abc", "abc", 0)]
    #[case("kitten", "sitting", 3)]
    fn test_levenshtein_distance_cases(#[case] a: &str, #[case] b: &str, #[case] expected: usize) {
        assert_eq!(levenshtein_distance(a, b), expected);
    }
}
