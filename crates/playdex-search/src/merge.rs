//! Cross-entity merge.
//!
//! Games and tags are searched concurrently and joined before merging. The
//! first failure aborts the whole call; the other sub-search is dropped.

use playdex_core::{
    CatalogStore, CombinedFullSearchRequest, CombinedSearchRequest, CombinedSearchResult,
    EntityKind, ListResult, Result, SearchResultItem,
};

use crate::two_pass::two_pass_search;

/// Tag and concatenate games then tags, summing their totals.
pub fn merge_results(games: ListResult, tags: ListResult) -> CombinedSearchResult {
    let total = games.total + tags.total;
    let items = games
        .items
        .into_iter()
        .map(|r| SearchResultItem::new(r, EntityKind::Game))
        .chain(
            tags.items
                .into_iter()
                .map(|r| SearchResultItem::new(r, EntityKind::Tag)),
        )
        .collect();

    CombinedSearchResult { items, total }
}

/// Two-pass search over both stores. Both filters are validated before
/// either store is queried.
pub async fn combined_search(
    games: &dyn CatalogStore,
    tags: &dyn CatalogStore,
    request: &CombinedSearchRequest,
) -> Result<CombinedSearchResult> {
    let games_filter = request.games_filter();
    let tags_filter = request.tags_filter();
    games_filter.validate()?;
    tags_filter.validate()?;

    let (games, tags) = tokio::try_join!(
        two_pass_search(games, &games_filter),
        two_pass_search(tags, &tags_filter),
    )?;

    Ok(merge_results(games, tags))
}

/// Paginated full search over both stores.
pub async fn combined_full_search(
    games: &dyn CatalogStore,
    tags: &dyn CatalogStore,
    request: &CombinedFullSearchRequest,
) -> Result<CombinedSearchResult> {
    let games_filter = request.games_filter();
    let tags_filter = request.tags_filter();
    games_filter.validate()?;
    tags_filter.validate()?;

    let (games, tags) = tokio::try_join!(
        games.full_search(&games_filter),
        tags.full_search(&tags_filter),
    )?;

    Ok(merge_results(games, tags))
}
