use std::collections::HashSet;

/// One selectable row. `identity` is the key used for reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub identity: String,
    pub selected: bool,
    pub metric: Option<u64>,
}

impl Item {
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            selected: false,
            metric: None,
        }
    }

    pub fn with_metric(mut self, metric: u64) -> Self {
        self.metric = Some(metric);
        self
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }
}

/// Ordered items in render order: index `i` is row `i` of the rendered list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectableCollection {
    items: Vec<Item>,
}

impl SelectableCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a collection, keeping the first item of any repeated identity.
    pub fn from_items(items: impl IntoIterator<Item = Item>) -> Self {
        let mut seen = HashSet::new();
        let items = items
            .into_iter()
            .filter(|item| seen.insert(item.identity.clone()))
            .collect();
        Self { items }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, identity: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.identity == identity)
    }

    pub fn selected(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(|item| item.selected)
    }

    pub fn selected_identities(&self) -> Vec<String> {
        self.selected().map(|item| item.identity.clone()).collect()
    }

    /// Sets one item's flag. Unknown identities are a no-op; returns whether
    /// an item was found.
    pub fn toggle_one(&mut self, identity: &str, value: bool) -> bool {
        match self.items.iter_mut().find(|item| item.identity == identity) {
            Some(item) => {
                item.selected = value;
                true
            }
            None => false,
        }
    }

    pub fn toggle_all(&mut self, value: bool) {
        for item in &mut self.items {
            item.selected = value;
        }
    }

    /// Overwrites every flag with `predicate(index)`.
    pub fn select_by_predicate(&mut self, mut predicate: impl FnMut(usize) -> bool) {
        for (index, item) in self.items.iter_mut().enumerate() {
            item.selected = predicate(index);
        }
    }

    /// False for an empty collection.
    pub fn is_all_selected(&self) -> bool {
        !self.items.is_empty() && self.items.iter().all(|item| item.selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SelectableCollection {
        SelectableCollection::from_items(vec![Item::new("a"), Item::new("b"), Item::new("c")])
    }

    #[test]
    fn duplicate_identities_keep_first() {
        let collection = SelectableCollection::from_items(vec![
            Item::new("a").with_metric(1),
            Item::new("a").with_metric(2),
        ]);
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.items()[0].metric, Some(1));
    }

    #[test]
    fn toggle_one_unknown_identity_is_noop() {
        let mut collection = sample();
        let before = collection.clone();
        assert!(!collection.toggle_one("zzz", true));
        assert_eq!(collection, before);
    }

    #[test]
    fn predicate_selection_is_idempotent() {
        let mut once = sample();
        once.select_by_predicate(|index| index % 2 == 0);
        let mut twice = once.clone();
        twice.select_by_predicate(|index| index % 2 == 0);
        assert_eq!(once, twice);
        assert_eq!(once.selected_identities(), vec!["a", "c"]);
    }

    #[test]
    fn all_selected_requires_non_empty() {
        let mut empty = SelectableCollection::new();
        empty.toggle_all(true);
        assert!(!empty.is_all_selected());

        let mut collection = sample();
        collection.toggle_all(true);
        assert!(collection.is_all_selected());
        collection.toggle_all(false);
        assert!(!collection.is_all_selected());
    }
}
