//! Entity table descriptors.
//!
//! The query layer is entity-agnostic: everything it needs to know about a
//! catalog relation (which columns exist, which counter means "popular")
//! comes from an [`EntityTable`]. Column names here are fixed identifiers,
//! never caller input, so they are safe to interpolate into SQL.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use playdex_core::{EntityKind, Error, GetByField, Result};

/// Static description of one catalog relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityTable {
    /// Entity kind served by the relation.
    pub kind: EntityKind,
    /// Table or view name.
    pub relation: &'static str,
    /// Counter used for the popularity sorts (plays, clicks).
    pub popularity_column: &'static str,
    pub likes_column: Option<&'static str>,
    pub dislikes_column: Option<&'static str>,
    /// `bigint[]` of category references.
    pub category_ids_column: Option<&'static str>,
    /// `bigint[]` of tag references.
    pub tag_ids_column: Option<&'static str>,
    pub mobile_column: Option<&'static str>,
}

/// Games: localized rows of `game_catalog`.
pub const GAMES: EntityTable = EntityTable {
    kind: EntityKind::Game,
    relation: "game_catalog",
    popularity_column: "plays",
    likes_column: Some("likes"),
    dislikes_column: Some("dislikes"),
    category_ids_column: Some("category_ids"),
    tag_ids_column: Some("tag_ids"),
    mobile_column: Some("mobile"),
};

/// Tags: localized rows of `tag_catalog`.
pub const TAGS: EntityTable = EntityTable {
    kind: EntityKind::Tag,
    relation: "tag_catalog",
    popularity_column: "clicks",
    likes_column: None,
    dislikes_column: None,
    category_ids_column: None,
    tag_ids_column: None,
    mobile_column: None,
};

/// Column used for each single-entity lookup key.
static GET_BY_COLUMNS: Lazy<HashMap<GetByField, &'static str>> = Lazy::new(|| {
    HashMap::from([(GetByField::Id, "id"), (GetByField::Slug, "slug")])
});

/// Resolve a lookup key to its column.
pub fn get_by_column(field: GetByField) -> Result<&'static str> {
    GET_BY_COLUMNS
        .get(&field)
        .copied()
        .ok_or_else(|| Error::InvalidInput(format!("unsupported get-by field: {:?}", field)))
}

impl EntityTable {
    /// Descriptor for a kind.
    pub fn for_kind(kind: EntityKind) -> &'static EntityTable {
        match kind {
            EntityKind::Game => &GAMES,
            EntityKind::Tag => &TAGS,
        }
    }

    /// Projection shared by every catalog query, ending in the window count.
    ///
    /// Optional columns are projected as typed NULL/FALSE so rows from every
    /// relation decode into the same record shape.
    pub fn select_list(&self) -> String {
        let likes = self
            .likes_column
            .map(|c| format!("e.{}", c))
            .unwrap_or_else(|| "NULL::bigint".to_string());
        let dislikes = self
            .dislikes_column
            .map(|c| format!("e.{}", c))
            .unwrap_or_else(|| "NULL::bigint".to_string());
        let mobile = self
            .mobile_column
            .map(|c| format!("e.{}", c))
            .unwrap_or_else(|| "FALSE".to_string());

        format!(
            "e.id, e.slug, e.name, e.short_description, e.description, e.status, \
             e.{} AS popularity, {} AS likes, {} AS dislikes, {} AS mobile, e.created_at, \
             COUNT(*) OVER() AS total",
            self.popularity_column, likes, dislikes, mobile
        )
    }

    /// Column name for an optional capability, or a validation error naming it.
    pub(crate) fn require(&self, column: Option<&'static str>, what: &str) -> Result<&'static str> {
        column.ok_or_else(|| {
            Error::InvalidInput(format!("{} cannot be filtered by {}", self.kind, what))
        })
    }
}
