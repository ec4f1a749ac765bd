//! # playdex-db
//!
//! PostgreSQL database layer for the playdex catalog engine.
//!
//! This crate provides:
//! - Connection pool management
//! - A typed filter clause composer producing parameterized predicates
//! - The sort strategy resolver (static allow-list of ORDER BY targets)
//! - A paged query builder that returns rows and a window total in one trip
//! - [`PgCatalogRepository`], the [`CatalogStore`] implementation for any
//!   catalog relation described by an [`EntityTable`]
//!
//! ## Example
//!
//! ```rust,ignore
//! use playdex_db::{Database, CatalogStore, ListFilter, Language, SortMethod};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/playdex").await?;
//!
//!     let page = db
//!         .games
//!         .list(&ListFilter::new(Language::En).with_sort(SortMethod::MostPopular))
//!         .await?;
//!
//!     println!("{} of {} games", page.items.len(), page.total);
//!     Ok(())
//! }
//! ```
pub mod catalog;
pub mod entity;
pub mod pool;
pub mod predicate;
pub mod query;
pub mod sort;

// Test fixtures for integration tests
// Note: Always compiled so integration tests (in tests/) can use DEFAULT_TEST_DATABASE_URL
pub mod test_fixtures;

// Re-export core types
pub use playdex_core::*;

/// Escape LIKE/ILIKE wildcard characters (`%`, `_`, `\`) in user input.
pub fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

pub use catalog::PgCatalogRepository;
pub use entity::{get_by_column, EntityTable, GAMES, TAGS};
pub use pool::{create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};
pub use predicate::{compose_list, compose_scope, ParamList, Predicate, QueryParam};
pub use query::{BuiltQuery, CatalogQuery};
pub use sort::{resolve_sort, Direction, OrderBy, SortKey};

/// Combined database context with both catalog repositories.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Games catalog.
    pub games: PgCatalogRepository,
    /// Tags catalog.
    pub tags: PgCatalogRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            games: PgCatalogRepository::new(pool.clone(), &GAMES),
            tags: PgCatalogRepository::new(pool.clone(), &TAGS),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Repository serving the given entity kind.
    pub fn catalog(&self, kind: EntityKind) -> &PgCatalogRepository {
        match kind {
            EntityKind::Game => &self.games,
            EntityKind::Tag => &self.tags,
        }
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}
