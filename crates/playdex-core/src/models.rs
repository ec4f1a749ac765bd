//! Catalog domain types shared by every playdex crate.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::defaults::FALLBACK_TS_CONFIG;
use crate::error::{Error, Result};

// =============================================================================
// LANGUAGE
// =============================================================================

/// Catalog content language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    De,
    Es,
    Fr,
    It,
    Pt,
    Ru,
    Pl,
    Tr,
    Nl,
}

impl Language {
    /// All supported languages.
    pub const ALL: [Language; 10] = [
        Language::En,
        Language::De,
        Language::Es,
        Language::Fr,
        Language::It,
        Language::Pt,
        Language::Ru,
        Language::Pl,
        Language::Tr,
        Language::Nl,
    ];

    /// ISO 639-1 code stored in the `language` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::De => "de",
            Self::Es => "es",
            Self::Fr => "fr",
            Self::It => "it",
            Self::Pt => "pt",
            Self::Ru => "ru",
            Self::Pl => "pl",
            Self::Tr => "tr",
            Self::Nl => "nl",
        }
    }

    /// PostgreSQL text search configuration used for full-text matching.
    pub fn ts_config(&self) -> &'static str {
        match self {
            Self::En => "english",
            Self::De => "german",
            Self::Es => "spanish",
            Self::Fr => "french",
            Self::It => "italian",
            Self::Pt => "portuguese",
            Self::Ru => "russian",
            Self::Tr => "turkish",
            Self::Nl => "dutch",
            // No stemmer ships with PostgreSQL for Polish
            Self::Pl => FALLBACK_TS_CONFIG,
        }
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let code = s.trim().to_lowercase();
        Language::ALL
            .into_iter()
            .find(|lang| lang.as_str() == code)
            .ok_or_else(|| Error::InvalidInput(format!("unrecognized language: '{}'", s)))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// ENTITY KIND / STATUS
// =============================================================================

/// Which catalog domain a record comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Game,
    Tag,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Game => "game",
            Self::Tag => "tag",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "game" | "games" => Ok(Self::Game),
            "tag" | "tags" => Ok(Self::Tag),
            _ => Err(Error::InvalidInput(format!(
                "unrecognized entity kind: '{}'",
                s
            ))),
        }
    }
}

/// Visibility classification of a catalog row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityStatus {
    Published,
    Invisible,
    Deleted,
}

impl EntityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Published => "published",
            Self::Invisible => "invisible",
            Self::Deleted => "deleted",
        }
    }
}

impl FromStr for EntityStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "published" => Ok(Self::Published),
            "invisible" => Ok(Self::Invisible),
            "deleted" => Ok(Self::Deleted),
            other => Err(Error::InvalidInput(format!(
                "unrecognized entity status: '{}'",
                other
            ))),
        }
    }
}

// =============================================================================
// SORT METHOD
// =============================================================================

/// Requested ordering of a listing or search page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortMethod {
    Random,
    #[default]
    Id,
    Name,
    Newest,
    Oldest,
    MostPopular,
    LeastPopular,
    MostLiked,
    LeastLiked,
    MostDisliked,
    LeastDisliked,
    /// Only meaningful for full search, where it depends on the query string.
    MostRelevant,
}

impl SortMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::Id => "id",
            Self::Name => "name",
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::MostPopular => "most-popular",
            Self::LeastPopular => "least-popular",
            Self::MostLiked => "most-liked",
            Self::LeastLiked => "least-liked",
            Self::MostDisliked => "most-disliked",
            Self::LeastDisliked => "least-disliked",
            Self::MostRelevant => "most-relevant",
        }
    }
}

impl FromStr for SortMethod {
    type Err = Error;

    /// Accepts kebab-case, snake_case and SCREAMING_CASE spellings.
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        let method = match normalized.as_str() {
            "random" => Self::Random,
            "id" => Self::Id,
            "name" => Self::Name,
            "newest" => Self::Newest,
            "oldest" => Self::Oldest,
            "most-popular" => Self::MostPopular,
            "least-popular" => Self::LeastPopular,
            "most-liked" => Self::MostLiked,
            "least-liked" => Self::LeastLiked,
            "most-disliked" => Self::MostDisliked,
            "least-disliked" => Self::LeastDisliked,
            "most-relevant" => Self::MostRelevant,
            _ => {
                return Err(Error::InvalidInput(format!(
                    "unrecognized sort method: '{}'",
                    s
                )))
            }
        };
        Ok(method)
    }
}

impl fmt::Display for SortMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// GET-BY FIELD
// =============================================================================

/// Key used for single-entity lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GetByField {
    Id,
    Slug,
}

impl FromStr for GetByField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "id" => Ok(Self::Id),
            "slug" => Ok(Self::Slug),
            _ => Err(Error::InvalidInput(format!(
                "unrecognized get-by field: '{}'",
                s
            ))),
        }
    }
}

// =============================================================================
// RECORDS AND RESULTS
// =============================================================================

/// A catalog row (game or tag) as read at query time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub id: i64,
    pub slug: String,
    pub name: String,
    pub short_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: EntityStatus,
    /// Plays for games, clicks for tags.
    pub popularity: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub likes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dislikes: Option<i64>,
    pub mobile: bool,
    pub created_at: DateTime<Utc>,
}

/// Page of entity records plus the window count of all matching rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListResult {
    pub items: Vec<EntityRecord>,
    /// Full matching-row count, independent of the page actually returned.
    pub total: i64,
}

/// Search results share the listing shape.
pub type SearchResult = ListResult;

/// An entity record tagged with the domain it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultItem {
    #[serde(flatten)]
    pub record: EntityRecord,
    pub kind: EntityKind,
}

impl SearchResultItem {
    pub fn new(record: EntityRecord, kind: EntityKind) -> Self {
        Self { record, kind }
    }
}

/// Merged games + tags results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombinedSearchResult {
    pub items: Vec<SearchResultItem>,
    /// Sum of the per-kind totals.
    pub total: i64,
}
