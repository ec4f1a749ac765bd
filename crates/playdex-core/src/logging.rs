//! Structured logging field name constants for playdex.
//!
//! All crates use these constants for consistent structured logging fields so
//! log aggregation can query by the same names across subsystems. Event
//! macros take them as `{ logging::TOTAL } = total`; `#[instrument]` fields
//! only accept literal names and spell the same strings.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events (startup, pool creation) |
//! | DEBUG | Decision points (pass 2 triggered, sort resolved), built SQL |
//! | TRACE | Per-row detail (relevance scores) |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "db", "search", "cli"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "catalog_query", "sort_resolver", "two_pass", "merger", "pool"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "list", "search", "full_search", "combined_search"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Catalog entity kind ("game", "tag").
pub const ENTITY_KIND: &str = "entity_kind";

/// Search query text.
pub const QUERY: &str = "query";

/// Requested sort method.
pub const SORT: &str = "sort";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of rows returned by a query or search.
pub const RESULT_COUNT: &str = "result_count";

/// Window count of all matching rows.
pub const TOTAL: &str = "total";

/// Number of bound parameters in a built query.
pub const PARAM_COUNT: &str = "param_count";

// ─── Search-specific fields ────────────────────────────────────────────────

/// Rows matched by the prefix pass.
pub const PREFIX_HITS: &str = "prefix_hits";

/// Rows matched by the substring pass.
pub const SUBSTRING_HITS: &str = "substring_hits";

/// Distinct rows left after deduplication.
pub const DISTINCT_HITS: &str = "distinct_hits";

// ─── Database fields ───────────────────────────────────────────────────────

/// Number of active connections in the pool.
pub const POOL_SIZE: &str = "pool_size";

/// Number of idle connections in the pool.
pub const POOL_IDLE: &str = "pool_idle";

/// Relation (table or view) queried.
pub const DB_TABLE: &str = "db_table";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
