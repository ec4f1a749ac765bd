//! playdex: command-line front end for the catalog query engine.
//!
//! Every command prints its result as pretty JSON on stdout. Logs go to
//! stderr.
//!
//! Environment:
//!   DATABASE_URL                     - PostgreSQL connection string (required)
//!   PLAYDEX_DB_MAX_CONNECTIONS       - pool size override
//!   PLAYDEX_DB_CONNECT_TIMEOUT_SECS  - pool acquire timeout override
//!   LOG_FORMAT                       - "json" or "text" (default: "text")
//!   RUST_LOG                         - standard env filter

use std::process::ExitCode;

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use playdex_db::{log_pool_metrics, Database, PoolConfig};
use playdex_search::{
    defaults, logging, CatalogEngine, CombinedFullSearchRequest, CombinedSearchRequest,
    EntityKind, FullSearchFilter, GetByField, Language, ListFilter, SearchFilter, SearchScope,
    SortMethod,
};

#[derive(Parser)]
#[command(name = "playdex")]
#[command(author, version, about = "Query the playdex game and tag catalog")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Language and visibility flags shared by every query.
#[derive(Args, Clone, Copy)]
struct ScopeArgs {
    /// Catalog language (en, de, es, fr, it, pt, ru, pl, tr, nl)
    #[arg(short, long, default_value = "en")]
    language: Language,

    /// Include soft-deleted rows
    #[arg(long)]
    allow_deleted: bool,

    /// Include invisible rows
    #[arg(long)]
    allow_invisible: bool,
}

impl From<ScopeArgs> for SearchScope {
    fn from(args: ScopeArgs) -> Self {
        SearchScope {
            language: args.language,
            allow_deleted: args.allow_deleted,
            allow_invisible: args.allow_invisible,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List entities with filters, sorting and pagination
    List {
        /// Entity kind (game or tag)
        kind: EntityKind,

        #[command(flatten)]
        scope: ScopeArgs,

        #[arg(long, default_value_t = defaults::PAGE)]
        page: i64,

        #[arg(long, default_value_t = defaults::PAGE_LIMIT)]
        limit: i64,

        /// Sort method, e.g. most-popular, newest, name
        #[arg(short, long, default_value = "id")]
        sort: SortMethod,

        /// Keep rows in any of these categories (comma separated)
        #[arg(long = "category", value_delimiter = ',')]
        categories: Vec<i64>,

        /// Keep rows carrying any of these tags (comma separated)
        #[arg(long = "tag", value_delimiter = ',')]
        tags: Vec<i64>,

        /// Only these ids (comma separated)
        #[arg(long, value_delimiter = ',')]
        include: Vec<i64>,

        /// Never these ids (comma separated)
        #[arg(long, value_delimiter = ',')]
        exclude: Vec<i64>,

        /// Only rows created after this RFC 3339 timestamp
        #[arg(long)]
        created_after: Option<DateTime<Utc>>,

        /// Only mobile-compatible games
        #[arg(long)]
        mobile_only: bool,
    },

    /// Fuzzy name search (prefix pass, then substring pass)
    Search {
        /// Entity kind (game or tag)
        kind: EntityKind,

        /// Search text (at least 2 characters)
        query: String,

        #[command(flatten)]
        scope: ScopeArgs,

        /// Maximum number of results
        #[arg(short, long, default_value_t = defaults::SEARCH_MAX)]
        max: usize,
    },

    /// Paginated full-text search
    FullSearch {
        /// Entity kind (game or tag)
        kind: EntityKind,

        /// Search text
        query: String,

        #[command(flatten)]
        scope: ScopeArgs,

        #[arg(long, default_value_t = defaults::PAGE)]
        page: i64,

        #[arg(long, default_value_t = defaults::PAGE_LIMIT)]
        limit: i64,

        /// Sort method; most-relevant ranks by name closeness
        #[arg(short, long)]
        sort: Option<SortMethod>,
    },

    /// Fuzzy name search over games and tags together
    Combined {
        /// Search text (at least 2 characters)
        query: String,

        #[command(flatten)]
        scope: ScopeArgs,

        #[arg(long, default_value_t = defaults::SEARCH_MAX)]
        games_max: usize,

        #[arg(long, default_value_t = defaults::SEARCH_MAX)]
        tags_max: usize,
    },

    /// Paginated full-text search over games and tags together
    CombinedFull {
        /// Search text
        query: String,

        #[command(flatten)]
        scope: ScopeArgs,

        #[arg(short, long)]
        sort: Option<SortMethod>,

        #[arg(long, default_value_t = defaults::PAGE)]
        games_page: i64,

        #[arg(long, default_value_t = defaults::PAGE_LIMIT)]
        games_limit: i64,

        #[arg(long, default_value_t = defaults::PAGE)]
        tags_page: i64,

        #[arg(long, default_value_t = defaults::PAGE_LIMIT)]
        tags_limit: i64,
    },

    /// Fetch one entity by id or slug
    Get {
        /// Entity kind (game or tag)
        kind: EntityKind,

        /// Lookup key (id or slug)
        by: GetByField,

        /// Key value
        value: String,

        #[arg(short, long, default_value = "en")]
        language: Language,
    },

    /// Apply pending schema migrations
    Migrate,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_logging();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!({ logging::ERROR_MSG } = %e, "Command failed");
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "playdex_cli=info,playdex_search=info,playdex_db=warn".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    if log_format == "json" {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn connect() -> anyhow::Result<Database> {
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let config = PoolConfig::from_env()?;
    let db = Database::connect_with_config(&database_url, config)
        .await
        .context("failed to connect to the catalog database")?;
    Ok(db)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let db = connect().await?;

    if let Commands::Migrate = cli.command {
        db.migrate().await.context("migration failed")?;
        tracing::info!("Migrations applied");
        return Ok(());
    }

    let engine = CatalogEngine::from_database(&db);

    match cli.command {
        Commands::List {
            kind,
            scope,
            page,
            limit,
            sort,
            categories,
            tags,
            include,
            exclude,
            created_after,
            mobile_only,
        } => {
            let mut filter = ListFilter::new(scope.language)
                .with_page(page, limit)
                .with_sort(sort)
                .with_categories(categories)
                .with_tags(tags)
                .include(include)
                .exclude(exclude)
                .mobile_only(mobile_only)
                .allow_deleted(scope.allow_deleted)
                .allow_invisible(scope.allow_invisible);
            if let Some(after) = created_after {
                filter = filter.created_after(after);
            }
            print_json(&engine.list(kind, &filter).await?)?;
        }
        Commands::Search {
            kind,
            query,
            scope,
            max,
        } => {
            let filter = SearchFilter::new(query, scope.language)
                .with_scope(scope.into())
                .with_max(max);
            print_json(&engine.search(kind, &filter).await?)?;
        }
        Commands::FullSearch {
            kind,
            query,
            scope,
            page,
            limit,
            sort,
        } => {
            let mut filter = FullSearchFilter::new(query, scope.language)
                .with_scope(scope.into())
                .with_page(page, limit);
            filter.sort = sort;
            print_json(&engine.full_search(kind, &filter).await?)?;
        }
        Commands::Combined {
            query,
            scope,
            games_max,
            tags_max,
        } => {
            let request = CombinedSearchRequest {
                query,
                scope: scope.into(),
                games_max,
                tags_max,
            };
            print_json(&engine.combined_search(&request).await?)?;
        }
        Commands::CombinedFull {
            query,
            scope,
            sort,
            games_page,
            games_limit,
            tags_page,
            tags_limit,
        } => {
            let request = CombinedFullSearchRequest {
                query,
                scope: scope.into(),
                sort,
                games_page,
                games_limit,
                tags_page,
                tags_limit,
            };
            print_json(&engine.combined_full_search(&request).await?)?;
        }
        Commands::Get {
            kind,
            by,
            value,
            language,
        } => {
            print_json(&engine.get(kind, by, &value, language).await?)?;
        }
        Commands::Migrate => {}
    }

    log_pool_metrics(db.pool());
    Ok(())
}
