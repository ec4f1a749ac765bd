//! # playdex-core
//!
//! Core types, traits, and abstractions for the playdex catalog engine.
//!
//! This crate provides the request/response structs, validation rules and
//! the [`CatalogStore`] seam that the database and search crates build on.

pub mod defaults;
pub mod error;
pub mod filters;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, QueryPhase, Result};
pub use filters::*;
pub use models::*;
pub use traits::*;
