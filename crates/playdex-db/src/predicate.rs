//! Filter clause composer.
//!
//! Turns a sparse [`ListFilter`] (or a search scope) into an ordered list of
//! typed [`Predicate`]s. Each predicate renders to a parameterized SQL
//! fragment; caller-supplied values are always bound, never interpolated.
//!
//! Empty filter dimensions generate no predicate at all, so an empty ID set
//! can never turn into a match-nothing `IN ()` clause.

use chrono::{DateTime, Utc};

use playdex_core::{EntityStatus, Language, ListFilter, Result, SearchScope};

use crate::entity::EntityTable;
use crate::escape_like;

/// Type-safe parameter binding for SQL queries.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryParam {
    /// 64-bit integer parameter.
    Int(i64),
    /// Array of integers (for ANY / overlap operations).
    IntArray(Vec<i64>),
    /// Timestamp parameter.
    Timestamp(DateTime<Utc>),
    /// String parameter.
    String(String),
}

/// Bound parameters collected while rendering, numbered from `$1`.
#[derive(Debug, Clone, Default)]
pub struct ParamList {
    params: Vec<QueryParam>,
}

impl ParamList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter and return its placeholder (`$n`).
    pub fn push(&mut self, param: QueryParam) -> String {
        self.params.push(param);
        format!("${}", self.params.len())
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn into_vec(self) -> Vec<QueryParam> {
        self.params
    }
}

/// A single conjunctive WHERE condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Row language equals the request language (always applied).
    Language(Language),
    /// Exclude rows with the given status.
    ExcludeStatus(EntityStatus),
    /// Row category set intersects the given IDs.
    AnyCategory(Vec<i64>),
    /// Row tag set intersects the given IDs.
    AnyTag(Vec<i64>),
    /// Row ID is one of.
    IdIn(Vec<i64>),
    /// Row ID is not one of.
    IdNotIn(Vec<i64>),
    /// Creation time strictly after the bound.
    CreatedAfter(DateTime<Utc>),
    /// Mobile-compatible rows only.
    MobileOnly,
    /// Case-insensitive name prefix.
    NamePrefix(String),
    /// Case-insensitive name substring.
    NameContains(String),
    /// Full-text match over the free-text projection, or name substring.
    TextMatch { config: &'static str, query: String },
    /// Exact ID lookup.
    IdEquals(i64),
    /// Exact slug lookup.
    SlugEquals(String),
}

impl Predicate {
    /// Render the SQL fragment, pushing bound values onto `params`.
    ///
    /// Fails only when the predicate needs a column the entity lacks.
    pub fn render(&self, table: &EntityTable, params: &mut ParamList) -> Result<String> {
        let sql = match self {
            Predicate::Language(lang) => {
                let p = params.push(QueryParam::String(lang.as_str().to_string()));
                format!("e.language = {}", p)
            }
            Predicate::ExcludeStatus(status) => {
                format!("e.status <> '{}'", status.as_str())
            }
            Predicate::AnyCategory(ids) => {
                let column = table.require(table.category_ids_column, "category")?;
                let p = params.push(QueryParam::IntArray(ids.clone()));
                format!("e.{} && {}::bigint[]", column, p)
            }
            Predicate::AnyTag(ids) => {
                let column = table.require(table.tag_ids_column, "tag")?;
                let p = params.push(QueryParam::IntArray(ids.clone()));
                format!("e.{} && {}::bigint[]", column, p)
            }
            Predicate::IdIn(ids) => {
                let p = params.push(QueryParam::IntArray(ids.clone()));
                format!("e.id = ANY({}::bigint[])", p)
            }
            Predicate::IdNotIn(ids) => {
                let p = params.push(QueryParam::IntArray(ids.clone()));
                format!("NOT (e.id = ANY({}::bigint[]))", p)
            }
            Predicate::CreatedAfter(after) => {
                let p = params.push(QueryParam::Timestamp(*after));
                format!("e.created_at > {}", p)
            }
            Predicate::MobileOnly => {
                let column = table.require(table.mobile_column, "mobile compatibility")?;
                format!("e.{} = TRUE", column)
            }
            Predicate::NamePrefix(query) => {
                let p = params.push(QueryParam::String(escape_like(query)));
                format!("e.name ILIKE {} || '%' ESCAPE '\\'", p)
            }
            Predicate::NameContains(query) => {
                let p = params.push(QueryParam::String(escape_like(query)));
                format!("e.name ILIKE '%' || {} || '%' ESCAPE '\\'", p)
            }
            Predicate::TextMatch { config, query } => {
                let cfg = params.push(QueryParam::String(config.to_string()));
                let q = params.push(QueryParam::String(query.clone()));
                let like = params.push(QueryParam::String(escape_like(query)));
                format!(
                    "(to_tsvector({cfg}::regconfig, concat_ws(' ', e.name, e.short_description, e.description, e.content)) \
                     @@ websearch_to_tsquery({cfg}::regconfig, {q}) \
                     OR e.name ILIKE '%' || {like} || '%' ESCAPE '\\')"
                )
            }
            Predicate::IdEquals(id) => {
                let p = params.push(QueryParam::Int(*id));
                format!("e.id = {}", p)
            }
            Predicate::SlugEquals(slug) => {
                let p = params.push(QueryParam::String(slug.clone()));
                format!("e.slug = {}", p)
            }
        };
        Ok(sql)
    }
}

/// Language plus visibility predicates shared by every query.
///
/// With both flags false only published rows remain.
pub fn compose_scope(scope: &SearchScope) -> Vec<Predicate> {
    let mut predicates = vec![Predicate::Language(scope.language)];
    if !scope.allow_deleted {
        predicates.push(Predicate::ExcludeStatus(EntityStatus::Deleted));
    }
    if !scope.allow_invisible {
        predicates.push(Predicate::ExcludeStatus(EntityStatus::Invisible));
    }
    predicates
}

/// Predicates for a listing request, in a stable order.
pub fn compose_list(filter: &ListFilter) -> Vec<Predicate> {
    let mut predicates = compose_scope(&filter.scope());

    if !filter.category_ids.is_empty() {
        predicates.push(Predicate::AnyCategory(filter.category_ids.clone()));
    }
    if !filter.tag_ids.is_empty() {
        predicates.push(Predicate::AnyTag(filter.tag_ids.clone()));
    }
    if !filter.include_ids.is_empty() {
        predicates.push(Predicate::IdIn(filter.include_ids.clone()));
    }
    if !filter.exclude_ids.is_empty() {
        predicates.push(Predicate::IdNotIn(filter.exclude_ids.clone()));
    }
    if let Some(after) = filter.created_after {
        // A zero timestamp is treated the same as no bound
        if after.timestamp() != 0 {
            predicates.push(Predicate::CreatedAfter(after));
        }
    }
    if filter.mobile_only {
        predicates.push(Predicate::MobileOnly);
    }

    predicates
}

/// Render predicates into a single `AND`-joined clause.
pub fn render_all(
    predicates: &[Predicate],
    table: &EntityTable,
    params: &mut ParamList,
) -> Result<String> {
    let clauses = predicates
        .iter()
        .map(|p| p.render(table, params))
        .collect::<Result<Vec<_>>>()?;

    Ok(if clauses.is_empty() {
        "TRUE".to_string()
    } else {
        clauses.join(" AND ")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{GAMES, TAGS};
    use chrono::TimeZone;

    fn render(predicates: &[Predicate]) -> (String, Vec<QueryParam>) {
        let mut params = ParamList::new();
        let sql = render_all(predicates, &GAMES, &mut params).unwrap();
        (sql, params.into_vec())
    }

    #[test]
    fn test_default_filter_only_language_and_visibility() {
        let predicates = compose_list(&ListFilter::default());
        assert_eq!(
            predicates,
            vec![
                Predicate::Language(Language::En),
                Predicate::ExcludeStatus(EntityStatus::Deleted),
                Predicate::ExcludeStatus(EntityStatus::Invisible),
            ]
        );

        let (sql, params) = render(&predicates);
        assert_eq!(
            sql,
            "e.language = $1 AND e.status <> 'deleted' AND e.status <> 'invisible'"
        );
        assert_eq!(params, vec![QueryParam::String("en".to_string())]);
    }

    #[test]
    fn test_allow_flags_drop_visibility_predicates() {
        let filter = ListFilter::default()
            .allow_deleted(true)
            .allow_invisible(true);
        assert_eq!(
            compose_list(&filter),
            vec![Predicate::Language(Language::En)]
        );

        let only_deleted = ListFilter::default().allow_deleted(true);
        assert_eq!(
            compose_list(&only_deleted),
            vec![
                Predicate::Language(Language::En),
                Predicate::ExcludeStatus(EntityStatus::Invisible),
            ]
        );
    }

    #[test]
    fn test_empty_id_sets_emit_nothing() {
        let filter = ListFilter::default()
            .with_categories(vec![])
            .with_tags(vec![])
            .include(vec![])
            .exclude(vec![]);
        let (sql, _) = render(&compose_list(&filter));

        assert!(!sql.contains("ANY"));
        assert!(!sql.contains("&&"));
        assert!(!sql.contains("IN ()"));
    }

    #[test]
    fn test_full_filter_order_and_placeholders() {
        let after = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let filter = ListFilter::new(Language::De)
            .with_categories(vec![1, 2])
            .with_tags(vec![9])
            .include(vec![10, 11])
            .exclude(vec![12])
            .created_after(after)
            .mobile_only(true);

        let (sql, params) = render(&compose_list(&filter));

        assert_eq!(
            sql,
            "e.language = $1 AND e.status <> 'deleted' AND e.status <> 'invisible' \
             AND e.category_ids && $2::bigint[] AND e.tag_ids && $3::bigint[] \
             AND e.id = ANY($4::bigint[]) AND NOT (e.id = ANY($5::bigint[])) \
             AND e.created_at > $6 AND e.mobile = TRUE"
        );
        assert_eq!(params.len(), 6);
        assert_eq!(params[1], QueryParam::IntArray(vec![1, 2]));
        assert_eq!(params[4], QueryParam::IntArray(vec![12]));
        assert_eq!(params[5], QueryParam::Timestamp(after));
    }

    #[test]
    fn test_zero_created_after_is_ignored() {
        let epoch = Utc.timestamp_opt(0, 0).unwrap();
        let filter = ListFilter::default().created_after(epoch);
        assert!(!compose_list(&filter)
            .iter()
            .any(|p| matches!(p, Predicate::CreatedAfter(_))));
    }

    #[test]
    fn test_mobile_false_emits_nothing() {
        let filter = ListFilter::default().mobile_only(false);
        assert!(!compose_list(&filter).contains(&Predicate::MobileOnly));
    }

    #[test]
    fn test_tag_table_rejects_category_filter() {
        let filter = ListFilter::default().with_categories(vec![1]);
        let mut params = ParamList::new();
        let err = render_all(&compose_list(&filter), &TAGS, &mut params).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_name_patterns_are_escaped_and_bound() {
        let (sql, params) = render(&[
            Predicate::NamePrefix("50%_off".to_string()),
            Predicate::NameContains("a\\b".to_string()),
        ]);
        assert_eq!(
            sql,
            "e.name ILIKE $1 || '%' ESCAPE '\\' AND e.name ILIKE '%' || $2 || '%' ESCAPE '\\'"
        );
        assert_eq!(params[0], QueryParam::String("50\\%\\_off".to_string()));
        assert_eq!(params[1], QueryParam::String("a\\\\b".to_string()));
    }

    #[test]
    fn test_text_match_binds_config_query_and_pattern() {
        let (sql, params) = render(&[Predicate::TextMatch {
            config: "english",
            query: "wizard".to_string(),
        }]);
        assert!(sql.contains("to_tsvector($1::regconfig"));
        assert!(sql.contains("websearch_to_tsquery($1::regconfig, $2)"));
        assert!(sql.contains("OR e.name ILIKE '%' || $3 || '%'"));
        assert_eq!(
            params,
            vec![
                QueryParam::String("english".to_string()),
                QueryParam::String("wizard".to_string()),
                QueryParam::String("wizard".to_string()),
            ]
        );
    }

    #[test]
    fn test_quote_in_query_never_reaches_sql_text() {
        let (sql, _) = render(&[Predicate::NameContains("'; DROP TABLE x; --".to_string())]);
        assert!(!sql.contains("DROP"));
    }

    #[test]
    fn test_empty_predicate_list_renders_true() {
        let (sql, params) = render(&[]);
        assert_eq!(sql, "TRUE");
        assert!(params.is_empty());
    }
}
