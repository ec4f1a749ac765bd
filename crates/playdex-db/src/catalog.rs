//! PostgreSQL catalog repository.
//!
//! One repository type serves every entity kind; the [`EntityTable`]
//! descriptor decides which relation and columns are queried.

use std::time::Instant;

use async_trait::async_trait;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{Pool, Postgres, Row};
use tracing::{debug, instrument};

use playdex_core::{
    logging, CatalogStore, EntityKind, EntityRecord, EntityStatus, Error, FullSearchFilter,
    GetByField, Language, ListFilter, ListResult, NameMatch, NameMatchMode, QueryPhase, Result,
    SearchScope, SortMethod,
};

use crate::entity::{get_by_column, EntityTable};
use crate::predicate::{compose_list, compose_scope, Predicate, QueryParam};
use crate::query::{BuiltQuery, CatalogQuery};
use crate::sort::{resolve_sort, OrderBy};

/// Bind parameters in placeholder order.
fn bind_params<'q>(
    mut q: Query<'q, Postgres, PgArguments>,
    params: &'q [QueryParam],
) -> Query<'q, Postgres, PgArguments> {
    for param in params {
        q = match param {
            QueryParam::Int(v) => q.bind(v),
            QueryParam::IntArray(v) => q.bind(v),
            QueryParam::Timestamp(ts) => q.bind(ts),
            QueryParam::String(s) => q.bind(s),
        };
    }
    q
}

/// Map a database row to an EntityRecord.
fn map_row_to_record(row: &PgRow) -> std::result::Result<EntityRecord, sqlx::Error> {
    let status: String = row.try_get("status")?;
    let status = status
        .parse::<EntityStatus>()
        .map_err(|e| sqlx::Error::Decode(e.to_string().into()))?;

    Ok(EntityRecord {
        id: row.try_get("id")?,
        slug: row.try_get("slug")?,
        name: row.try_get("name")?,
        short_description: row.try_get("short_description")?,
        description: row.try_get("description")?,
        status,
        popularity: row.try_get("popularity")?,
        likes: row.try_get("likes")?,
        dislikes: row.try_get("dislikes")?,
        mobile: row.try_get("mobile")?,
        created_at: row.try_get("created_at")?,
    })
}

/// PostgreSQL implementation of CatalogStore.
#[derive(Clone)]
pub struct PgCatalogRepository {
    pool: Pool<Postgres>,
    table: &'static EntityTable,
}

impl PgCatalogRepository {
    /// Create a repository for the given entity table.
    pub fn new(pool: Pool<Postgres>, table: &'static EntityTable) -> Self {
        Self { pool, table }
    }

    /// Entity table this repository queries.
    pub fn table(&self) -> &'static EntityTable {
        self.table
    }

    fn build(&self, query: &CatalogQuery<'_>, op: &'static str) -> Result<BuiltQuery> {
        let built = query.build()?;
        debug!(
            { logging::SUBSYSTEM } = "db",
            { logging::COMPONENT } = "catalog_query",
            { logging::OPERATION } = op,
            { logging::ENTITY_KIND } = %self.table.kind,
            { logging::DB_TABLE } = self.table.relation,
            { logging::PARAM_COUNT } = built.params.len(),
            sql = %built.sql,
            "Catalog query built"
        );
        Ok(built)
    }

    /// Run a query and collect rows plus window total.
    ///
    /// The window count rides on the returned rows, so a page past the end
    /// falls back to a plain count over the same predicates.
    async fn execute(&self, query: CatalogQuery<'_>, op: &'static str) -> Result<ListResult> {
        let built = self.build(&query, op)?;
        let start = Instant::now();
        let entity = self.table.kind.as_str();

        let rows = bind_params(sqlx::query(&built.sql), &built.params)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Error::query(QueryPhase::Execute, entity, e))?;

        let total = match rows.first() {
            Some(row) => row
                .try_get::<i64, _>("total")
                .map_err(|e| Error::query(QueryPhase::Decode, entity, e))?,
            None if query.skips_rows() => self.count(&query).await?,
            None => 0,
        };
        let items = rows
            .iter()
            .map(map_row_to_record)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::query(QueryPhase::Decode, entity, e))?;

        debug!(
            { logging::SUBSYSTEM } = "db",
            { logging::COMPONENT } = "catalog_query",
            { logging::OPERATION } = op,
            { logging::ENTITY_KIND } = %self.table.kind,
            { logging::RESULT_COUNT } = items.len(),
            { logging::TOTAL } = total,
            { logging::DURATION_MS } = start.elapsed().as_millis() as u64,
            "Catalog query complete"
        );

        Ok(ListResult { items, total })
    }

    async fn count(&self, query: &CatalogQuery<'_>) -> Result<i64> {
        let built = query.build_count()?;
        let entity = self.table.kind.as_str();
        debug!(
            { logging::SUBSYSTEM } = "db",
            { logging::COMPONENT } = "catalog_query",
            { logging::ENTITY_KIND } = %self.table.kind,
            sql = %built.sql,
            "Empty page past the start, counting matches"
        );

        let row = bind_params(sqlx::query(&built.sql), &built.params)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Error::query(QueryPhase::Execute, entity, e))?;
        row.try_get::<i64, _>("total")
            .map_err(|e| Error::query(QueryPhase::Decode, entity, e))
    }

    fn full_search_order(&self, filter: &FullSearchFilter) -> Option<OrderBy> {
        match filter.sort {
            Some(SortMethod::MostRelevant) => {
                Some(OrderBy::Relevance(filter.trimmed_query().to_string()))
            }
            Some(sort) => resolve_sort(sort, self.table),
            None => None,
        }
    }
}

#[async_trait]
impl CatalogStore for PgCatalogRepository {
    fn kind(&self) -> EntityKind {
        self.table.kind
    }

    #[instrument(skip(self, filter), fields(
        subsystem = "db",
        component = "catalog_query",
        op = "list",
        entity_kind = %self.table.kind,
        sort = %filter.sort,
    ))]
    async fn list(&self, filter: &ListFilter) -> Result<ListResult> {
        filter.validate()?;

        let query = CatalogQuery::new(self.table)
            .filters(compose_list(filter))
            .order_by(resolve_sort(filter.sort, self.table))
            .limit(filter.limit)
            .offset(filter.offset());
        self.execute(query, "list").await
    }

    #[instrument(skip(self, request), fields(
        subsystem = "db",
        component = "catalog_query",
        op = "match_name",
        entity_kind = %self.table.kind,
        query = %request.query,
    ))]
    async fn match_name(&self, request: &NameMatch) -> Result<ListResult> {
        let name_predicate = match request.mode {
            NameMatchMode::Prefix => Predicate::NamePrefix(request.query.clone()),
            NameMatchMode::Contains => Predicate::NameContains(request.query.clone()),
        };
        let query = CatalogQuery::new(self.table)
            .filters(compose_scope(&request.scope))
            .filter(name_predicate);
        self.execute(query, "match_name").await
    }

    #[instrument(skip(self, filter), fields(
        subsystem = "db",
        component = "catalog_query",
        op = "full_search",
        entity_kind = %self.table.kind,
        query = %filter.query,
    ))]
    async fn full_search(&self, filter: &FullSearchFilter) -> Result<ListResult> {
        filter.validate()?;

        let query = CatalogQuery::new(self.table)
            .filters(compose_scope(&filter.scope))
            .filter(Predicate::TextMatch {
                config: filter.scope.language.ts_config(),
                query: filter.trimmed_query().to_string(),
            })
            .order_by(self.full_search_order(filter))
            .limit(filter.limit)
            .offset(filter.offset());
        self.execute(query, "full_search").await
    }

    #[instrument(skip(self), fields(
        subsystem = "db",
        component = "catalog_query",
        op = "get_by",
        entity_kind = %self.table.kind,
    ))]
    async fn get_by(
        &self,
        field: GetByField,
        value: &str,
        language: Language,
    ) -> Result<EntityRecord> {
        let column = get_by_column(field)?;
        let predicate = match field {
            GetByField::Id => {
                let id = value
                    .trim()
                    .parse::<i64>()
                    .ok()
                    .filter(|id| *id > 0)
                    .ok_or_else(|| {
                        Error::InvalidInput(format!("id must be a positive integer, got '{}'", value))
                    })?;
                Predicate::IdEquals(id)
            }
            GetByField::Slug => Predicate::SlugEquals(value.to_string()),
        };

        let scope = SearchScope {
            language,
            allow_deleted: true,
            allow_invisible: true,
        };
        let query = CatalogQuery::new(self.table)
            .filters(compose_scope(&scope))
            .filter(predicate)
            .limit(1);
        self.execute(query, "get_by")
            .await?
            .items
            .into_iter()
            .next()
            .ok_or_else(|| {
                Error::NotFound(format!("{} with {} '{}'", self.table.kind, column, value))
            })
    }
}
