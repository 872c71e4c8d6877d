use std::fmt;

use crate::selection::SelectableCollection;

/// Aggregate checkbox state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckState {
    #[default]
    None,
    Some,
    All,
}

/// Derived on demand from a collection; never updated incrementally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionSummary {
    pub selected_count: usize,
    pub total_metric: u64,
    pub check_state: CheckState,
}

impl SelectionSummary {
    pub fn of(collection: &SelectableCollection) -> Self {
        let (selected_count, total_metric) = collection
            .selected()
            .fold((0usize, 0u64), |(count, total), item| {
                (count + 1, total.saturating_add(item.metric.unwrap_or(0)))
            });
        let check_state = if collection.is_all_selected() {
            CheckState::All
        } else if selected_count > 0 {
            CheckState::Some
        } else {
            CheckState::None
        };
        Self {
            selected_count,
            total_metric,
            check_state,
        }
    }
}

impl fmt::Display for SelectionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({} selected, {} chars)",
            self.selected_count, self.total_metric
        )
    }
}
