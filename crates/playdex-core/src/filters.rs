//! Request types for listing and searching the catalog.
//!
//! Every request is validated before it reaches a store: pagination bounds,
//! ID sets and query lengths are request errors, never silently corrected.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::defaults::{MAX_ID_SET_LEN, MIN_QUERY_LEN, PAGE, PAGE_LIMIT, SEARCH_MAX};
use crate::error::{Error, Result};
use crate::models::{Language, SortMethod};

/// Row offset for a 1-based page.
pub fn offset(page: i64, limit: i64) -> i64 {
    (page - 1) * limit
}

fn validate_page(page: i64, limit: i64) -> Result<()> {
    if page < 1 {
        return Err(Error::InvalidInput(format!(
            "page must be at least 1, got {}",
            page
        )));
    }
    if limit < 1 {
        return Err(Error::InvalidInput(format!(
            "limit must be at least 1, got {}",
            limit
        )));
    }
    if (page - 1).checked_mul(limit).is_none() {
        return Err(Error::InvalidInput(format!(
            "page {} with limit {} is out of range",
            page, limit
        )));
    }
    Ok(())
}

fn validate_id_set(name: &str, ids: &[i64]) -> Result<()> {
    if ids.len() > MAX_ID_SET_LEN {
        return Err(Error::InvalidInput(format!(
            "{} accepts at most {} ids, got {}",
            name,
            MAX_ID_SET_LEN,
            ids.len()
        )));
    }
    if let Some(bad) = ids.iter().find(|id| **id < 0) {
        return Err(Error::InvalidInput(format!(
            "{} contains negative id {}",
            name, bad
        )));
    }
    Ok(())
}

// =============================================================================
// VISIBILITY SCOPE
// =============================================================================

/// Language plus soft-delete / invisible gating shared by every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchScope {
    pub language: Language,
    #[serde(default)]
    pub allow_deleted: bool,
    #[serde(default)]
    pub allow_invisible: bool,
}

impl SearchScope {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            allow_deleted: false,
            allow_invisible: false,
        }
    }
}

// =============================================================================
// LIST FILTER
// =============================================================================

/// Sparse filter set for paged catalog listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListFilter {
    pub language: Language,
    pub page: i64,
    pub limit: i64,
    #[serde(default)]
    pub allow_deleted: bool,
    #[serde(default)]
    pub allow_invisible: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub category_ids: Vec<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tag_ids: Vec<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include_ids: Vec<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_ids: Vec<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_after: Option<DateTime<Utc>>,
    #[serde(default)]
    pub mobile_only: bool,
    #[serde(default)]
    pub sort: SortMethod,
}

impl Default for ListFilter {
    fn default() -> Self {
        Self {
            language: Language::default(),
            page: PAGE,
            limit: PAGE_LIMIT,
            allow_deleted: false,
            allow_invisible: false,
            category_ids: Vec::new(),
            tag_ids: Vec::new(),
            include_ids: Vec::new(),
            exclude_ids: Vec::new(),
            created_after: None,
            mobile_only: false,
            sort: SortMethod::default(),
        }
    }
}

impl ListFilter {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            ..Default::default()
        }
    }

    pub fn with_page(mut self, page: i64, limit: i64) -> Self {
        self.page = page;
        self.limit = limit;
        self
    }

    pub fn with_sort(mut self, sort: SortMethod) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_categories(mut self, ids: Vec<i64>) -> Self {
        self.category_ids = ids;
        self
    }

    pub fn with_tags(mut self, ids: Vec<i64>) -> Self {
        self.tag_ids = ids;
        self
    }

    pub fn include(mut self, ids: Vec<i64>) -> Self {
        self.include_ids = ids;
        self
    }

    pub fn exclude(mut self, ids: Vec<i64>) -> Self {
        self.exclude_ids = ids;
        self
    }

    pub fn created_after(mut self, after: DateTime<Utc>) -> Self {
        self.created_after = Some(after);
        self
    }

    pub fn mobile_only(mut self, mobile: bool) -> Self {
        self.mobile_only = mobile;
        self
    }

    pub fn allow_deleted(mut self, allow: bool) -> Self {
        self.allow_deleted = allow;
        self
    }

    pub fn allow_invisible(mut self, allow: bool) -> Self {
        self.allow_invisible = allow;
        self
    }

    pub fn scope(&self) -> SearchScope {
        SearchScope {
            language: self.language,
            allow_deleted: self.allow_deleted,
            allow_invisible: self.allow_invisible,
        }
    }

    pub fn offset(&self) -> i64 {
        offset(self.page, self.limit)
    }

    pub fn validate(&self) -> Result<()> {
        validate_page(self.page, self.limit)?;
        validate_id_set("category_ids", &self.category_ids)?;
        validate_id_set("tag_ids", &self.tag_ids)?;
        validate_id_set("include_ids", &self.include_ids)?;
        validate_id_set("exclude_ids", &self.exclude_ids)?;
        Ok(())
    }
}

// =============================================================================
// SEARCH FILTERS
// =============================================================================

/// Interactive search bounded by `max` rather than paged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchFilter {
    pub query: String,
    pub max: usize,
    #[serde(flatten)]
    pub scope: SearchScope,
}

impl SearchFilter {
    pub fn new(query: impl Into<String>, language: Language) -> Self {
        Self {
            query: query.into(),
            max: SEARCH_MAX,
            scope: SearchScope::new(language),
        }
    }

    pub fn with_max(mut self, max: usize) -> Self {
        self.max = max;
        self
    }

    pub fn with_scope(mut self, scope: SearchScope) -> Self {
        self.scope = scope;
        self
    }

    /// The query as matched against names.
    pub fn trimmed_query(&self) -> &str {
        self.query.trim()
    }

    pub fn validate(&self) -> Result<()> {
        let len = self.trimmed_query().chars().count();
        if len < MIN_QUERY_LEN {
            return Err(Error::InvalidInput(format!(
                "search query must be at least {} characters, got {}",
                MIN_QUERY_LEN, len
            )));
        }
        if self.max < 1 {
            return Err(Error::InvalidInput("max must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Paginated relevance search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullSearchFilter {
    pub query: String,
    pub page: i64,
    pub limit: i64,
    #[serde(flatten)]
    pub scope: SearchScope,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortMethod>,
}

impl FullSearchFilter {
    pub fn new(query: impl Into<String>, language: Language) -> Self {
        Self {
            query: query.into(),
            page: PAGE,
            limit: PAGE_LIMIT,
            scope: SearchScope::new(language),
            sort: None,
        }
    }

    pub fn with_page(mut self, page: i64, limit: i64) -> Self {
        self.page = page;
        self.limit = limit;
        self
    }

    pub fn with_sort(mut self, sort: SortMethod) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn with_scope(mut self, scope: SearchScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn trimmed_query(&self) -> &str {
        self.query.trim()
    }

    pub fn offset(&self) -> i64 {
        offset(self.page, self.limit)
    }

    pub fn validate(&self) -> Result<()> {
        validate_page(self.page, self.limit)?;
        if self.trimmed_query().is_empty() {
            return Err(Error::InvalidInput(
                "search query cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// How a name is matched against a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameMatchMode {
    /// Case-insensitive `name LIKE query%`.
    Prefix,
    /// Case-insensitive `name LIKE %query%`.
    Contains,
}

/// Unbounded name scan used by the two search passes.
#[derive(Debug, Clone, PartialEq)]
pub struct NameMatch {
    pub query: String,
    pub mode: NameMatchMode,
    pub scope: SearchScope,
}

// =============================================================================
// COMBINED REQUESTS
// =============================================================================

/// Two-pass search fanned out to games and tags with per-kind volumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedSearchRequest {
    pub query: String,
    #[serde(flatten)]
    pub scope: SearchScope,
    pub games_max: usize,
    pub tags_max: usize,
}

impl CombinedSearchRequest {
    pub fn games_filter(&self) -> SearchFilter {
        SearchFilter {
            query: self.query.clone(),
            max: self.games_max,
            scope: self.scope,
        }
    }

    pub fn tags_filter(&self) -> SearchFilter {
        SearchFilter {
            query: self.query.clone(),
            max: self.tags_max,
            scope: self.scope,
        }
    }
}

/// Paginated search fanned out to games and tags with per-kind pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedFullSearchRequest {
    pub query: String,
    #[serde(flatten)]
    pub scope: SearchScope,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortMethod>,
    pub games_page: i64,
    pub games_limit: i64,
    pub tags_page: i64,
    pub tags_limit: i64,
}

impl CombinedFullSearchRequest {
    pub fn games_filter(&self) -> FullSearchFilter {
        FullSearchFilter {
            query: self.query.clone(),
            page: self.games_page,
            limit: self.games_limit,
            scope: self.scope,
            sort: self.sort,
        }
    }

    pub fn tags_filter(&self) -> FullSearchFilter {
        FullSearchFilter {
            query: self.query.clone(),
            page: self.tags_page,
            limit: self.tags_limit,
            scope: self.scope,
            sort: self.sort,
        }
    }
}
