//! In-memory catalog store for engine tests.
//!
//! Mirrors the PostgreSQL repository's matching and relevance ordering
//! closely enough for the engine's logic to be exercised without a database,
//! and records every name-match pass it serves.

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use playdex_core::{
    CatalogStore, EntityKind, EntityRecord, EntityStatus, Error, FullSearchFilter, GetByField,
    Language, ListFilter, ListResult, NameMatch, NameMatchMode, Result, SearchScope, SortMethod,
};
use playdex_search::rank_by_relevance;

pub fn record(id: i64, name: &str) -> EntityRecord {
    EntityRecord {
        id,
        slug: name.to_lowercase().replace(' ', "-"),
        name: name.to_string(),
        short_description: String::new(),
        description: None,
        status: EntityStatus::Published,
        popularity: 0,
        likes: None,
        dislikes: None,
        mobile: false,
        created_at: Utc::now(),
    }
}

pub fn with_status(mut record: EntityRecord, status: EntityStatus) -> EntityRecord {
    record.status = status;
    record
}

pub fn with_description(mut record: EntityRecord, description: &str) -> EntityRecord {
    record.description = Some(description.to_string());
    record
}

/// How the store answers requests.
#[derive(Debug, Clone, Default)]
enum Behavior {
    #[default]
    Serve,
    Fail(String),
    Hang,
}

pub struct MemoryStore {
    kind: EntityKind,
    language: Language,
    rows: Vec<EntityRecord>,
    behavior: Behavior,
    passes: Mutex<Vec<NameMatchMode>>,
}

impl MemoryStore {
    pub fn new(kind: EntityKind, rows: Vec<EntityRecord>) -> Self {
        Self {
            kind,
            language: Language::En,
            rows,
            behavior: Behavior::Serve,
            passes: Mutex::new(Vec::new()),
        }
    }

    pub fn games(rows: Vec<EntityRecord>) -> Self {
        Self::new(EntityKind::Game, rows)
    }

    pub fn tags(rows: Vec<EntityRecord>) -> Self {
        Self::new(EntityKind::Tag, rows)
    }

    /// Every request fails with `Error::Search(message)`.
    pub fn failing(kind: EntityKind, message: &str) -> Self {
        let mut store = Self::new(kind, Vec::new());
        store.behavior = Behavior::Fail(message.to_string());
        store
    }

    /// Every request stays pending forever.
    pub fn hanging(kind: EntityKind) -> Self {
        let mut store = Self::new(kind, Vec::new());
        store.behavior = Behavior::Hang;
        store
    }

    /// Name-match passes served so far, in order.
    pub fn passes(&self) -> Vec<NameMatchMode> {
        self.passes.lock().unwrap().clone()
    }

    async fn gate(&self) -> Result<()> {
        match &self.behavior {
            Behavior::Serve => Ok(()),
            Behavior::Fail(message) => Err(Error::Search(message.clone())),
            Behavior::Hang => std::future::pending().await,
        }
    }

    fn visible<'a>(&'a self, scope: &'a SearchScope) -> impl Iterator<Item = &'a EntityRecord> {
        let language_matches = scope.language == self.language;
        self.rows.iter().filter(move |r| {
            language_matches
                && match r.status {
                    EntityStatus::Published => true,
                    EntityStatus::Invisible => scope.allow_invisible,
                    EntityStatus::Deleted => scope.allow_deleted,
                }
        })
    }

    /// Cut one page out of already ordered rows.
    fn page(rows: Vec<EntityRecord>, offset: i64, limit: i64) -> ListResult {
        let total = rows.len() as i64;
        let items = rows
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();
        ListResult { items, total }
    }

    fn by_id(mut rows: Vec<EntityRecord>) -> Vec<EntityRecord> {
        rows.sort_by_key(|r| r.id);
        rows
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    fn kind(&self) -> EntityKind {
        self.kind
    }

    async fn list(&self, filter: &ListFilter) -> Result<ListResult> {
        self.gate().await?;
        filter.validate()?;
        let scope = filter.scope();
        let rows = self.visible(&scope).cloned().collect();
        Ok(Self::page(Self::by_id(rows), filter.offset(), filter.limit))
    }

    async fn match_name(&self, request: &NameMatch) -> Result<ListResult> {
        self.gate().await?;
        self.passes.lock().unwrap().push(request.mode);

        let needle = request.query.to_lowercase();
        let items: Vec<EntityRecord> = self
            .visible(&request.scope)
            .filter(|r| {
                let name = r.name.to_lowercase();
                match request.mode {
                    NameMatchMode::Prefix => name.starts_with(&needle),
                    NameMatchMode::Contains => name.contains(&needle),
                }
            })
            .cloned()
            .collect();
        let total = items.len() as i64;
        Ok(ListResult { items, total })
    }

    async fn full_search(&self, filter: &FullSearchFilter) -> Result<ListResult> {
        self.gate().await?;
        filter.validate()?;
        let query = filter.trimmed_query();
        let needle = query.to_lowercase();
        let rows = self
            .visible(&filter.scope)
            .filter(|r| {
                [Some(&r.name), Some(&r.short_description), r.description.as_ref()]
                    .into_iter()
                    .flatten()
                    .any(|text| text.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect();
        let rows = match filter.sort {
            Some(SortMethod::MostRelevant) => rank_by_relevance(query, rows),
            _ => Self::by_id(rows),
        };
        Ok(Self::page(rows, filter.offset(), filter.limit))
    }

    async fn get_by(
        &self,
        field: GetByField,
        value: &str,
        language: Language,
    ) -> Result<EntityRecord> {
        self.gate().await?;
        if language != self.language {
            return Err(Error::NotFound(format!("{} '{}'", self.kind, value)));
        }
        self.rows
            .iter()
            .find(|r| match field {
                GetByField::Id => r.id.to_string() == value,
                GetByField::Slug => r.slug == value,
            })
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("{} '{}'", self.kind, value)))
    }
}
