//! Behaviour of the two-pass fuzzy search against an in-memory store.

mod fixtures;

use std::collections::HashSet;

use fixtures::{record, with_status, MemoryStore};
use playdex_search::{
    relevance_score, two_pass_search, EntityStatus, Language, NameMatchMode, SearchFilter,
    SearchScope,
};

fn catalog() -> MemoryStore {
    MemoryStore::games(vec![
        record(1, "Wizard School"),
        record(2, "Wizard Quest"),
        record(3, "Mx Offroad Master"),
        record(4, "Rally Champ"),
        record(5, "Top Guns"),
    ])
}

#[tokio::test]
async fn test_wizard_scenario_runs_both_passes() {
    let store = catalog();
    let result = two_pass_search(&store, &SearchFilter::new("wiz", Language::En))
        .await
        .unwrap();

    assert_eq!(
        store.passes(),
        vec![NameMatchMode::Prefix, NameMatchMode::Contains]
    );
    // Both names score 3, so the lower id leads
    let names: Vec<&str> = result.items.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Wizard School", "Wizard Quest"]);
    assert_eq!(result.total, 2);
}

#[tokio::test]
async fn test_substring_pass_skipped_when_prefix_fills_max() {
    let store = catalog();
    let filter = SearchFilter::new("wiz", Language::En).with_max(2);
    let result = two_pass_search(&store, &filter).await.unwrap();

    assert_eq!(store.passes(), vec![NameMatchMode::Prefix]);
    assert_eq!(result.items.len(), 2);
}

#[tokio::test]
async fn test_rows_matching_both_passes_appear_once() {
    let store = MemoryStore::games(vec![
        record(1, "Racer"),
        record(2, "Racing Stars"),
        record(3, "Street Racer"),
        record(4, "Car Race"),
    ]);
    let result = two_pass_search(&store, &SearchFilter::new("rac", Language::En))
        .await
        .unwrap();

    let ids: Vec<i64> = result.items.iter().map(|r| r.id).collect();
    let distinct: HashSet<i64> = ids.iter().copied().collect();
    assert_eq!(ids.len(), 4);
    assert_eq!(distinct.len(), 4);
    // Substring pass contributed, so its count is the total
    assert_eq!(result.total, 4);
}

#[tokio::test]
async fn test_result_never_exceeds_max() {
    let rows = (1..=30).map(|id| record(id, &format!("Block {}", id))).collect();
    let store = MemoryStore::games(rows);

    for max in [1, 3, 10, 25] {
        let filter = SearchFilter::new("lock", Language::En).with_max(max);
        let result = two_pass_search(&store, &filter).await.unwrap();
        assert!(result.items.len() <= max, "max {} gave {}", max, result.items.len());
        assert_eq!(result.total, 30);
    }
}

#[tokio::test]
async fn test_ranking_is_non_increasing() {
    let store = MemoryStore::games(vec![
        record(1, "Dragon"),
        record(2, "Dragon Tales Deluxe"),
        record(3, "Dragonfly"),
        record(4, "The Last Dragon"),
        record(5, "Dragons"),
    ]);
    let result = two_pass_search(&store, &SearchFilter::new("dragon", Language::En))
        .await
        .unwrap();

    let scores: Vec<i64> = result
        .items
        .iter()
        .map(|r| relevance_score("dragon", &r.name))
        .collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]), "{:?}", scores);
}

#[tokio::test]
async fn test_prefix_total_kept_when_substring_pass_is_empty() {
    let store = MemoryStore::games(vec![record(1, "Snake"), record(2, "Snakes and Ladders")]);
    let result = two_pass_search(&store, &SearchFilter::new("sna", Language::En))
        .await
        .unwrap();

    assert_eq!(store.passes().len(), 2);
    assert_eq!(result.total, 2);
}

#[tokio::test]
async fn test_no_matches_reports_zero_total() {
    let store = catalog();
    let result = two_pass_search(&store, &SearchFilter::new("zzz", Language::En))
        .await
        .unwrap();

    assert!(result.items.is_empty());
    assert_eq!(result.total, 0);
}

#[tokio::test]
async fn test_visibility_defaults_hide_non_published() {
    let store = MemoryStore::games(vec![
        with_status(record(1, "Wizard Deleted"), EntityStatus::Deleted),
        with_status(record(2, "Wizard Hidden"), EntityStatus::Invisible),
        record(3, "Wizard Live"),
    ]);

    let result = two_pass_search(&store, &SearchFilter::new("wizard", Language::En))
        .await
        .unwrap();
    let ids: Vec<i64> = result.items.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![3]);

    let scope = SearchScope {
        language: Language::En,
        allow_deleted: true,
        allow_invisible: true,
    };
    let filter = SearchFilter::new("wizard", Language::En).with_scope(scope);
    let result = two_pass_search(&store, &filter).await.unwrap();
    assert_eq!(result.items.len(), 3);
}

#[tokio::test]
async fn test_short_query_rejected_before_any_pass() {
    let store = catalog();
    let err = two_pass_search(&store, &SearchFilter::new(" w ", Language::En))
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert!(store.passes().is_empty());
}

#[tokio::test]
async fn test_zero_max_rejected() {
    let store = catalog();
    let filter = SearchFilter::new("wiz", Language::En).with_max(0);
    let err = two_pass_search(&store, &filter).await.unwrap_err();
    assert!(err.is_validation());
}
