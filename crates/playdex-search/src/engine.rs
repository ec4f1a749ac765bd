//! Catalog engine facade.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, instrument};

use playdex_core::{
    logging, CatalogStore, CombinedFullSearchRequest, CombinedSearchRequest,
    CombinedSearchResult, EntityKind, EntityRecord, Error, FullSearchFilter, GetByField, Language,
    ListFilter, ListResult, Result, SearchFilter, SearchResult,
};
use playdex_db::Database;

use crate::merge;
use crate::two_pass::two_pass_search;

/// Entry point for every catalog read, routing each request to the store
/// for its entity kind.
#[derive(Clone)]
pub struct CatalogEngine {
    games: Arc<dyn CatalogStore>,
    tags: Arc<dyn CatalogStore>,
}

impl CatalogEngine {
    /// Build an engine from one store per kind.
    ///
    /// Fails with [`Error::Config`] if a store serves the wrong kind.
    pub fn new(games: Arc<dyn CatalogStore>, tags: Arc<dyn CatalogStore>) -> Result<Self> {
        for (expected, store) in [(EntityKind::Game, &games), (EntityKind::Tag, &tags)] {
            if store.kind() != expected {
                return Err(Error::Config(format!(
                    "{} store configured where a {} store is required",
                    store.kind(),
                    expected
                )));
            }
        }
        Ok(Self { games, tags })
    }

    /// Engine backed by the PostgreSQL repositories.
    pub fn from_database(db: &Database) -> Self {
        Self {
            games: Arc::new(db.games.clone()),
            tags: Arc::new(db.tags.clone()),
        }
    }

    /// Store serving the given kind.
    pub fn store(&self, kind: EntityKind) -> &dyn CatalogStore {
        match kind {
            EntityKind::Game => self.games.as_ref(),
            EntityKind::Tag => self.tags.as_ref(),
        }
    }

    /// Filtered, sorted, paginated listing.
    #[instrument(skip(self, filter), fields(
        subsystem = "search",
        component = "catalog_engine",
        op = "list",
        entity_kind = %kind,
    ))]
    pub async fn list(&self, kind: EntityKind, filter: &ListFilter) -> Result<ListResult> {
        self.store(kind).list(filter).await
    }

    /// Two-pass fuzzy name search, at most `filter.max` items.
    #[instrument(skip(self, filter), fields(
        subsystem = "search",
        component = "catalog_engine",
        op = "search",
        entity_kind = %kind,
        query = %filter.query,
    ))]
    pub async fn search(&self, kind: EntityKind, filter: &SearchFilter) -> Result<SearchResult> {
        two_pass_search(self.store(kind), filter).await
    }

    /// Paginated full-text search.
    #[instrument(skip(self, filter), fields(
        subsystem = "search",
        component = "catalog_engine",
        op = "full_search",
        entity_kind = %kind,
        query = %filter.query,
    ))]
    pub async fn full_search(
        &self,
        kind: EntityKind,
        filter: &FullSearchFilter,
    ) -> Result<SearchResult> {
        filter.validate()?;
        self.store(kind).full_search(filter).await
    }

    /// Single entity by id or slug.
    #[instrument(skip(self), fields(
        subsystem = "search",
        component = "catalog_engine",
        op = "get",
        entity_kind = %kind,
    ))]
    pub async fn get(
        &self,
        kind: EntityKind,
        field: GetByField,
        value: &str,
        language: Language,
    ) -> Result<EntityRecord> {
        self.store(kind).get_by(field, value, language).await
    }

    /// Two-pass search over games and tags together.
    #[instrument(skip(self, request), fields(
        subsystem = "search",
        component = "catalog_engine",
        op = "combined_search",
        query = %request.query,
    ))]
    pub async fn combined_search(
        &self,
        request: &CombinedSearchRequest,
    ) -> Result<CombinedSearchResult> {
        let start = Instant::now();
        let result =
            merge::combined_search(self.games.as_ref(), self.tags.as_ref(), request).await?;
        info!(
            { logging::RESULT_COUNT } = result.items.len(),
            { logging::TOTAL } = result.total,
            { logging::DURATION_MS } = start.elapsed().as_millis() as u64,
            "Combined search completed"
        );
        Ok(result)
    }

    /// Paginated full search over games and tags together.
    #[instrument(skip(self, request), fields(
        subsystem = "search",
        component = "catalog_engine",
        op = "combined_full_search",
        query = %request.query,
    ))]
    pub async fn combined_full_search(
        &self,
        request: &CombinedFullSearchRequest,
    ) -> Result<CombinedSearchResult> {
        let start = Instant::now();
        let result =
            merge::combined_full_search(self.games.as_ref(), self.tags.as_ref(), request).await?;
        info!(
            { logging::RESULT_COUNT } = result.items.len(),
            { logging::TOTAL } = result.total,
            { logging::DURATION_MS } = start.elapsed().as_millis() as u64,
            "Combined full search completed"
        );
        Ok(result)
    }
}
