use bindery_core::{CheckState, Item, SelectableCollection, SelectionSummary};
use pretty_assertions::assert_eq;

fn books() -> SelectableCollection {
    SelectableCollection::from_items(vec![
        Item::new("x").with_metric(10),
        Item::new("y").with_metric(5).selected(true),
    ])
}

#[test]
fn summary_tracks_toggles() {
    let mut collection = books();
    let summary = SelectionSummary::of(&collection);
    assert_eq!((summary.selected_count, summary.total_metric), (1, 5));
    assert_eq!(summary.check_state, CheckState::Some);

    assert!(collection.toggle_one("x", true));
    let summary = SelectionSummary::of(&collection);
    assert_eq!((summary.selected_count, summary.total_metric), (2, 15));
    assert_eq!(summary.check_state, CheckState::All);
    assert_eq!(summary.to_string(), "(2 selected, 15 chars)");
}

#[test]
fn missing_metric_counts_as_zero() {
    let collection = SelectableCollection::from_items(vec![
        Item::new("a").selected(true),
        Item::new("b").with_metric(7).selected(true),
    ]);
    let summary = SelectionSummary::of(&collection);
    assert_eq!(summary.selected_count, 2);
    assert_eq!(summary.total_metric, 7);
}

#[test]
fn summary_follows_replaced_collection() {
    let mut collection = books();
    collection.toggle_all(true);
    assert_eq!(SelectionSummary::of(&collection).total_metric, 15);

    collection = SelectableCollection::from_items(vec![Item::new("z").with_metric(3)]);
    let summary = SelectionSummary::of(&collection);
    assert_eq!(summary.selected_count, 0);
    assert_eq!(summary.total_metric, 0);
    assert_eq!(summary.check_state, CheckState::None);
}

#[test]
fn toggle_all_drives_aggregate_checkbox() {
    let mut collection = books();
    collection.toggle_all(true);
    assert!(collection.is_all_selected());
    collection.toggle_all(false);
    assert!(!collection.is_all_selected());
    assert_eq!(SelectionSummary::of(&collection).check_state, CheckState::None);

    let empty = SelectableCollection::new();
    assert!(!empty.is_all_selected());
    assert_eq!(SelectionSummary::of(&empty).check_state, CheckState::None);
}
