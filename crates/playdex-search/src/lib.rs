//! # playdex-search
//!
//! Search layer of the playdex catalog engine.
//!
//! This crate provides:
//! - Two-pass fuzzy name search (prefix, then substring) with relevance ranking
//! - The name relevance heuristic shared with full search
//! - Concurrent games + tags search with a merged result
//! - [`CatalogEngine`], the facade used by callers
//!
//! ## Example
//!
//! ```ignore
//! use playdex_search::{CatalogEngine, EntityKind, Language, SearchFilter};
//! use playdex_db::Database;
//!
//! let db = Database::connect("postgres://...").await?;
//! let engine = CatalogEngine::from_database(&db);
//!
//! let hits = engine
//!     .search(EntityKind::Game, &SearchFilter::new("wiz", Language::En))
//!     .await?;
//! ```

pub mod engine;
pub mod merge;
pub mod relevance;
pub mod two_pass;

// Re-export core types
pub use playdex_core::*;

pub use engine::CatalogEngine;
pub use merge::{combined_full_search, combined_search, merge_results};
pub use relevance::{levenshtein, rank_by_relevance, relevance_score};
pub use two_pass::two_pass_search;
