//! Centralized default constants for the playdex catalog engine.
//!
//! All crates reference these constants instead of defining their own magic
//! numbers.

// =============================================================================
// PAGINATION
// =============================================================================

/// Default page number (pages are 1-based).
pub const PAGE: i64 = 1;

/// Default page size for list and full search requests.
pub const PAGE_LIMIT: i64 = 20;

/// Default number of results for interactive (two-pass) search.
pub const SEARCH_MAX: usize = 10;

// =============================================================================
// SEARCH
// =============================================================================

/// Minimum trimmed query length accepted by two-pass search.
pub const MIN_QUERY_LEN: usize = 2;

/// Text search configuration used when a language has no dedicated stemmer.
pub const FALLBACK_TS_CONFIG: &str = "simple";

// =============================================================================
// FILTERS
// =============================================================================

/// Maximum number of IDs accepted in a single ID-set filter.
pub const MAX_ID_SET_LEN: usize = 1000;

// =============================================================================
// DATABASE
// =============================================================================

/// Default maximum number of pooled connections.
pub const DB_MAX_CONNECTIONS: u32 = 10;

/// Default pool acquire timeout in seconds.
pub const DB_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default idle connection timeout in seconds.
pub const DB_IDLE_TIMEOUT_SECS: u64 = 600;

/// Default maximum connection lifetime in seconds.
pub const DB_MAX_LIFETIME_SECS: u64 = 1800;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults_are_valid() {
        assert!(PAGE >= 1);
        assert!(PAGE_LIMIT >= 1);
        assert!(SEARCH_MAX >= 1);
    }

    #[test]
    fn test_min_query_len() {
        assert_eq!(MIN_QUERY_LEN, 2);
    }
}
