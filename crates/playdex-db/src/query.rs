//! Paged catalog query builder.
//!
//! Combines predicates, an optional ordering, LIMIT/OFFSET and a window
//! row-count into one statement, so a page and its total come back in a
//! single round trip.

use playdex_core::Result;

use crate::entity::EntityTable;
use crate::predicate::{render_all, ParamList, Predicate, QueryParam};
use crate::sort::OrderBy;

/// Built SQL plus parameters in placeholder order.
#[derive(Debug, Clone)]
pub struct BuiltQuery {
    pub sql: String,
    pub params: Vec<QueryParam>,
}

/// Builder for a single catalog SELECT.
#[derive(Debug, Clone)]
pub struct CatalogQuery<'a> {
    table: &'a EntityTable,
    predicates: Vec<Predicate>,
    order: Option<OrderBy>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl<'a> CatalogQuery<'a> {
    pub fn new(table: &'a EntityTable) -> Self {
        Self {
            table,
            predicates: Vec::new(),
            order: None,
            limit: None,
            offset: None,
        }
    }

    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn filters(mut self, predicates: impl IntoIterator<Item = Predicate>) -> Self {
        self.predicates.extend(predicates);
        self
    }

    /// `None` leaves the statement without ORDER BY.
    pub fn order_by(mut self, order: Option<OrderBy>) -> Self {
        self.order = order;
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Whether the statement starts past the first matching row.
    pub fn skips_rows(&self) -> bool {
        matches!(self.offset, Some(offset) if offset > 0)
    }

    /// Plain row count over the same predicates, ignoring order and paging.
    pub fn build_count(&self) -> Result<BuiltQuery> {
        let mut params = ParamList::new();
        let where_clause = render_all(&self.predicates, self.table, &mut params)?;

        Ok(BuiltQuery {
            sql: format!(
                "SELECT COUNT(*) AS total FROM {} e WHERE {}",
                self.table.relation, where_clause
            ),
            params: params.into_vec(),
        })
    }

    pub fn build(&self) -> Result<BuiltQuery> {
        let mut params = ParamList::new();
        let where_clause = render_all(&self.predicates, self.table, &mut params)?;

        let mut sql = format!(
            "SELECT {} FROM {} e WHERE {}",
            self.table.select_list(),
            self.table.relation,
            where_clause
        );

        if let Some(order) = &self.order {
            sql.push_str(" ORDER BY ");
            sql.push_str(&order.render(&mut params));
        }
        if let Some(limit) = self.limit {
            let p = params.push(QueryParam::Int(limit));
            sql.push_str(&format!(" LIMIT {}", p));
        }
        if let Some(offset) = self.offset {
            let p = params.push(QueryParam::Int(offset));
            sql.push_str(&format!(" OFFSET {}", p));
        }

        Ok(BuiltQuery {
            sql,
            params: params.into_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{GAMES, TAGS};
    use crate::predicate::compose_list;
    use crate::sort::resolve_sort;
    use playdex_core::{Language, ListFilter, SortMethod};

    #[test]
    fn test_list_query_shape() {
        let filter = ListFilter::new(Language::En)
            .with_page(3, 10)
            .with_sort(SortMethod::MostPopular);
        let built = CatalogQuery::new(&GAMES)
            .filters(compose_list(&filter))
            .order_by(resolve_sort(filter.sort, &GAMES))
            .limit(filter.limit)
            .offset(filter.offset())
            .build()
            .unwrap();

        assert!(built.sql.starts_with("SELECT e.id, e.slug"));
        assert!(built.sql.contains("COUNT(*) OVER() AS total FROM game_catalog e WHERE"));
        assert!(built
            .sql
            .ends_with("ORDER BY e.plays DESC LIMIT $2 OFFSET $3"));
        assert_eq!(built.params.len(), 3);
        assert_eq!(built.params[1], QueryParam::Int(10));
        assert_eq!(built.params[2], QueryParam::Int(20));
    }

    #[test]
    fn test_no_order_when_unresolved() {
        let built = CatalogQuery::new(&TAGS)
            .filter(Predicate::Language(Language::En))
            .order_by(resolve_sort(SortMethod::MostLiked, &TAGS))
            .build()
            .unwrap();
        assert!(!built.sql.contains("ORDER BY"));
        assert!(!built.sql.contains("LIMIT"));
    }

    #[test]
    fn test_relevance_placeholder_precedes_limit() {
        let built = CatalogQuery::new(&GAMES)
            .filter(Predicate::Language(Language::En))
            .order_by(Some(OrderBy::Relevance("wiz".to_string())))
            .limit(5)
            .offset(0)
            .build()
            .unwrap();
        assert!(built.sql.contains("levenshtein(left($2, 255)"));
        assert!(built.sql.ends_with("LIMIT $3 OFFSET $4"));
        assert_eq!(built.params[1], QueryParam::String("wiz".to_string()));
    }

    #[test]
    fn test_count_query_drops_order_and_paging() {
        let filter = ListFilter::new(Language::En)
            .with_page(4, 10)
            .with_categories(vec![2, 3])
            .with_sort(SortMethod::Newest);
        let query = CatalogQuery::new(&GAMES)
            .filters(compose_list(&filter))
            .order_by(resolve_sort(filter.sort, &GAMES))
            .limit(filter.limit)
            .offset(filter.offset());

        let page = query.build().unwrap();
        let count = query.build_count().unwrap();

        assert!(count
            .sql
            .starts_with("SELECT COUNT(*) AS total FROM game_catalog e WHERE"));
        assert!(!count.sql.contains("ORDER BY"));
        assert!(!count.sql.contains("LIMIT"));
        assert!(!count.sql.contains("OVER()"));
        // Same predicates, same leading parameters
        assert_eq!(count.params[..], page.params[..count.params.len()]);
        assert_eq!(page.params.len(), count.params.len() + 2);
    }

    #[test]
    fn test_skips_rows_only_past_first_page() {
        let base = CatalogQuery::new(&TAGS).filter(Predicate::Language(Language::En));
        assert!(!base.skips_rows());
        assert!(!base.clone().offset(0).skips_rows());
        assert!(base.offset(20).skips_rows());
    }

    #[test]
    fn test_build_propagates_missing_column() {
        let result = CatalogQuery::new(&TAGS)
            .filter(Predicate::MobileOnly)
            .build();
        assert!(result.is_err());
    }
}
