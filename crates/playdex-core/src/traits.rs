//! Core traits for playdex abstractions.
//!
//! The search engine is written against [`CatalogStore`] so it stays
//! agnostic of which entity table backs a request, and so it can be driven
//! by in-memory stores in tests.

use async_trait::async_trait;

use crate::error::Result;
use crate::filters::{FullSearchFilter, ListFilter, NameMatch};
use crate::models::{EntityKind, EntityRecord, GetByField, Language, ListResult};

/// Queryable store for one catalog entity kind.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Entity kind served by this store.
    fn kind(&self) -> EntityKind;

    /// Filtered, sorted, paged listing with a window total.
    async fn list(&self, filter: &ListFilter) -> Result<ListResult>;

    /// Unbounded case-insensitive name scan (prefix or substring) with a window total.
    async fn match_name(&self, request: &NameMatch) -> Result<ListResult>;

    /// Paged full-text + name-substring search.
    async fn full_search(&self, filter: &FullSearchFilter) -> Result<ListResult>;

    /// Fetch exactly one entity, or `Error::NotFound`.
    async fn get_by(&self, field: GetByField, value: &str, language: Language)
        -> Result<EntityRecord>;
}
