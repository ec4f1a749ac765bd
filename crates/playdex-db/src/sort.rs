//! Sort strategy resolver.
//!
//! Maps a [`SortMethod`] to a concrete ORDER BY expression through a static
//! allow-list. Only identifiers from this table and from [`EntityTable`]
//! descriptors are ever interpolated into SQL.
//!
//! A method that cannot be resolved (absent from the table, or targeting a
//! column the entity kind lacks) degrades to "no explicit order" with a
//! warning. Rows then come back in storage order, which is undefined.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use tracing::{debug, warn};

use playdex_core::{logging, SortMethod};

use crate::entity::EntityTable;
use crate::predicate::{ParamList, QueryParam};

/// Row attribute a sort method orders by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Random,
    Id,
    Name,
    CreatedAt,
    Popularity,
    Likes,
    Dislikes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    fn as_sql(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// Sort methods resolvable from the row alone.
///
/// `most-relevant` is intentionally absent: it depends on the query string
/// and is handled by full search.
static SORT_TABLE: Lazy<HashMap<SortMethod, (SortKey, Direction)>> = Lazy::new(|| {
    HashMap::from([
        (SortMethod::Random, (SortKey::Random, Direction::Asc)),
        (SortMethod::Id, (SortKey::Id, Direction::Asc)),
        (SortMethod::Name, (SortKey::Name, Direction::Asc)),
        (SortMethod::Newest, (SortKey::CreatedAt, Direction::Desc)),
        (SortMethod::Oldest, (SortKey::CreatedAt, Direction::Asc)),
        (SortMethod::MostPopular, (SortKey::Popularity, Direction::Desc)),
        (SortMethod::LeastPopular, (SortKey::Popularity, Direction::Asc)),
        (SortMethod::MostLiked, (SortKey::Likes, Direction::Desc)),
        (SortMethod::LeastLiked, (SortKey::Likes, Direction::Asc)),
        (SortMethod::MostDisliked, (SortKey::Dislikes, Direction::Desc)),
        (SortMethod::LeastDisliked, (SortKey::Dislikes, Direction::Asc)),
    ])
});

/// A resolved ordering.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderBy {
    /// Fixed expression from the allow-list, e.g. `e.plays DESC`.
    Expr(String),
    /// `char_length(name) - levenshtein(query, name)`, descending.
    Relevance(String),
}

impl OrderBy {
    /// Render the ORDER BY body, binding the relevance query if needed.
    pub fn render(&self, params: &mut ParamList) -> String {
        match self {
            OrderBy::Expr(expr) => expr.clone(),
            OrderBy::Relevance(query) => {
                let p = params.push(QueryParam::String(query.to_lowercase()));
                // fuzzystrmatch's levenshtein rejects inputs over 255 characters
                format!(
                    "(char_length(e.name) - levenshtein(left({p}, 255), left(lower(e.name), 255))) DESC"
                )
            }
        }
    }
}

/// Look up the table entry for a method, if any.
pub fn sort_target(method: SortMethod) -> Option<(SortKey, Direction)> {
    SORT_TABLE.get(&method).copied()
}

/// Resolve a sort method against an entity table.
///
/// Returns `None` (and logs a warning) when the method is not resolvable.
pub fn resolve_sort(method: SortMethod, table: &EntityTable) -> Option<OrderBy> {
    let column = sort_target(method).and_then(|(key, direction)| {
        let column = match key {
            SortKey::Random => return Some("RANDOM()".to_string()),
            SortKey::Id => Some("id"),
            SortKey::Name => Some("name"),
            SortKey::CreatedAt => Some("created_at"),
            SortKey::Popularity => Some(table.popularity_column),
            SortKey::Likes => table.likes_column,
            SortKey::Dislikes => table.dislikes_column,
        }?;
        Some(format!("e.{} {}", column, direction.as_sql()))
    });

    match column {
        Some(expr) => {
            debug!(
                { logging::SUBSYSTEM } = "db",
                { logging::COMPONENT } = "sort_resolver",
                { logging::SORT } = %method,
                { logging::ENTITY_KIND } = %table.kind,
                order_by = %expr,
                "Sort resolved"
            );
            Some(OrderBy::Expr(expr))
        }
        None => {
            warn!(
                { logging::SUBSYSTEM } = "db",
                { logging::COMPONENT } = "sort_resolver",
                { logging::SORT } = %method,
                { logging::ENTITY_KIND } = %table.kind,
                "Sort method not resolvable, falling back to storage order"
            );
            None
        }
    }
}
