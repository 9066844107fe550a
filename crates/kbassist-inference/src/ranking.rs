//! Deterministic, backend-free ranking.
//!
//! Used when generation fails or its output is unusable. Everything here is
//! pure in-memory computation; ties always keep corpus order.

use std::cmp::Reverse;
use std::collections::HashSet;

use kbassist_core::{ArticleRef, RankedIdList};

/// Rank candidates by how many tags they share with `subject`.
///
/// The subject itself (matched by id) is excluded. Candidates with no
/// overlap still qualify, so the result only comes back empty when there are
/// no candidates at all.
pub fn rank_by_tag_overlap(
    subject: &ArticleRef,
    corpus: &[ArticleRef],
    limit: usize,
) -> RankedIdList {
    let subject_tags = subject.tag_set();

    let scored: Vec<(usize, &ArticleRef)> = corpus
        .iter()
        .filter(|a| a.id != subject.id)
        .map(|a| {
            let shared = a
                .tag_set()
                .iter()
                .filter(|t| subject_tags.contains(*t))
                .count();
            (shared, a)
        })
        .collect();

    take_ranked(scored, limit)
}

/// Rank articles by lexical match against a search query.
///
/// Terms are the whitespace-separated, lowercased query words; a query with
/// no whitespace (typical for CJK input) is a single term. Each term found in
/// the title, summary, or any tag scores one point, and the full query inside
/// the title scores one more. Articles scoring zero are left out.
pub fn rank_by_query_match(query: &str, corpus: &[ArticleRef], limit: usize) -> RankedIdList {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    let terms: Vec<&str> = needle.split_whitespace().collect();

    let scored: Vec<(usize, &ArticleRef)> = corpus
        .iter()
        .filter_map(|a| {
            let title = a.title.to_lowercase();
            let summary = a.summary.to_lowercase();
            let tags: Vec<String> = a.tags.iter().map(|t| t.to_lowercase()).collect();

            let mut score = terms
                .iter()
                .filter(|term| {
                    title.contains(*term)
                        || summary.contains(*term)
                        || tags.iter().any(|t| t.contains(*term))
                })
                .count();
            if terms.len() > 1 && title.contains(&needle) {
                score += 1;
            }
            (score > 0).then_some((score, a))
        })
        .collect();

    take_ranked(scored, limit)
}

/// Stable sort by descending score, then take the first `limit` distinct ids.
fn take_ranked(mut scored: Vec<(usize, &ArticleRef)>, limit: usize) -> RankedIdList {
    scored.sort_by_key(|(score, _)| Reverse(*score));

    let mut seen = HashSet::new();
    scored
        .into_iter()
        .filter(|(_, a)| seen.insert(a.id.as_str()))
        .map(|(_, a)| a.id.clone())
        .take(limit)
        .collect()
}

/// Outcome of checking backend-proposed ids against the supplied corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    /// Known ids in backend order, de-duplicated and truncated.
    pub ids: RankedIdList,
    /// Number of proposed ids that were not in the corpus.
    pub unknown: usize,
}

/// Keep only ids present in `allowed`, preserving order, dropping repeats,
/// and truncating to `limit`. Unknown ids are dropped silently.
pub fn reconcile_ids<'a>(
    proposed: RankedIdList,
    allowed: impl IntoIterator<Item = &'a ArticleRef>,
    limit: usize,
) -> Reconciled {
    let allowed: HashSet<&str> = allowed.into_iter().map(|a| a.id.as_str()).collect();
    let mut seen = HashSet::new();
    let mut unknown = 0;
    let mut ids = Vec::new();

    for id in proposed {
        if !allowed.contains(id.as_str()) {
            unknown += 1;
            continue;
        }
        if seen.insert(id.clone()) && ids.len() < limit {
            ids.push(id);
        }
    }

    Reconciled { ids, unknown }
}
