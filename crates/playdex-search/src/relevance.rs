//! Name relevance heuristic.
//!
//! `score = char_count(name) - levenshtein(lower(query), lower(name))`
//!
//! Longer names that still sit close to the query score higher. Scores can be
//! negative. Full search computes the same expression in PostgreSQL with
//! `fuzzystrmatch`, so both paths order names alike.

use tracing::trace;

use playdex_core::EntityRecord;

/// Edit distance over Unicode scalar values.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Relevance of `name` for `query`, case-insensitive.
pub fn relevance_score(query: &str, name: &str) -> i64 {
    let distance = levenshtein(&query.to_lowercase(), &name.to_lowercase());
    name.chars().count() as i64 - distance as i64
}

/// Sort records by relevance, best first. Equal scores fall back to ascending ID.
pub fn rank_by_relevance(query: &str, records: Vec<EntityRecord>) -> Vec<EntityRecord> {
    let mut scored: Vec<(i64, EntityRecord)> = records
        .into_iter()
        .map(|r| {
            let score = relevance_score(query, &r.name);
            trace!(id = r.id, name = %r.name, score, "Relevance score");
            (score, r)
        })
        .collect();

    scored.sort_by(|(sa, a), (sb, b)| sb.cmp(sa).then_with(|| a.id.cmp(&b.id)));
    scored.into_iter().map(|(_, r)| r).collect()
}
