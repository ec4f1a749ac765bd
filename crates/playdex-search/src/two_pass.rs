//! Two-pass fuzzy name search.
//!
//! Pass 1 collects names starting with the query. When that yields fewer
//! rows than requested, pass 2 widens to names containing the query. Both
//! passes are unbounded scans; the union is deduplicated by ID, ranked with
//! [`rank_by_relevance`] and cut to `max`.
//!
//! The reported total is the row count of the last pass that returned rows,
//! not the size of the union.

use std::collections::HashMap;
use std::time::Instant;

use tracing::debug;

use playdex_core::{
    logging, CatalogStore, EntityRecord, NameMatch, NameMatchMode, Result, SearchFilter,
    SearchResult,
};

use crate::relevance::rank_by_relevance;

/// Run the two-pass search against one store.
pub async fn two_pass_search(
    store: &dyn CatalogStore,
    filter: &SearchFilter,
) -> Result<SearchResult> {
    filter.validate()?;

    let start = Instant::now();
    let query = filter.trimmed_query();
    let name_match = |mode| NameMatch {
        query: query.to_string(),
        mode,
        scope: filter.scope,
    };

    let prefix = store.match_name(&name_match(NameMatchMode::Prefix)).await?;
    let prefix_hits = prefix.items.len();
    let mut total = if prefix.items.is_empty() { 0 } else { prefix.total };

    let mut by_id: HashMap<i64, EntityRecord> = HashMap::with_capacity(prefix_hits);
    for record in prefix.items {
        by_id.insert(record.id, record);
    }

    let mut substring_hits = 0;
    if prefix_hits < filter.max {
        let substring = store
            .match_name(&name_match(NameMatchMode::Contains))
            .await?;
        substring_hits = substring.items.len();
        if !substring.items.is_empty() {
            total = substring.total;
        }
        for record in substring.items {
            by_id.insert(record.id, record);
        }
    } else {
        debug!(
            { logging::ENTITY_KIND } = %store.kind(),
            { logging::PREFIX_HITS } = prefix_hits,
            max = filter.max,
            "Prefix pass filled the request, skipping substring pass"
        );
    }

    let distinct_hits = by_id.len();
    let mut items = rank_by_relevance(query, by_id.into_values().collect());
    items.truncate(filter.max);

    debug!(
        { logging::SUBSYSTEM } = "search",
        { logging::COMPONENT } = "two_pass",
        { logging::ENTITY_KIND } = %store.kind(),
        { logging::QUERY } = query,
        { logging::PREFIX_HITS } = prefix_hits,
        { logging::SUBSTRING_HITS } = substring_hits,
        { logging::DISTINCT_HITS } = distinct_hits,
        { logging::RESULT_COUNT } = items.len(),
        { logging::TOTAL } = total,
        { logging::DURATION_MS } = start.elapsed().as_millis() as u64,
        "Two-pass search complete"
    );

    Ok(SearchResult { items, total })
}
