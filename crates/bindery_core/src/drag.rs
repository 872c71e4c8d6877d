//! Rubber-band selection over a rendered list.
//!
//! The selector only does geometry and state tracking. Row positions come
//! from the rendering layer through [`RowBounds`].

use crate::selection::SelectableCollection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle with inclusive edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Normalized region spanned by two corners, whatever the drag direction.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            left: a.x.min(b.x),
            top: a.y.min(b.y),
            right: a.x.max(b.x),
            bottom: a.y.max(b.y),
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Touching edges count as overlap.
    pub fn intersects(&self, other: &Rect) -> bool {
        !(self.right < other.left
            || self.left > other.right
            || self.bottom < other.top
            || self.top > other.bottom)
    }
}

/// Supplied by the rendering layer: the on-screen box of each item row.
pub trait RowBounds {
    fn row_count(&self) -> usize;
    fn row_bounds_at(&self, index: usize) -> Option<Rect>;
}

impl RowBounds for [Rect] {
    fn row_count(&self) -> usize {
        self.len()
    }

    fn row_bounds_at(&self, index: usize) -> Option<Rect> {
        self.get(index).copied()
    }
}

impl RowBounds for Vec<Rect> {
    fn row_count(&self) -> usize {
        self.len()
    }

    fn row_bounds_at(&self, index: usize) -> Option<Rect> {
        self.get(index).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// What the pointer landed on when pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressTarget {
    Row,
    Checkbox,
    SelectAllRow,
    /// Inside the list but not on a row.
    Background,
    Outside,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging { anchor: Point, current: Point },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragOutcome {
    pub region: Rect,
    pub matched: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DragRegionSelector {
    state: DragState,
}

impl DragRegionSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Starts a drag on a primary press inside the list that misses the
    /// checkboxes and the select-all row. Returns whether a drag started.
    pub fn press(&mut self, button: PointerButton, target: PressTarget, point: Point) -> bool {
        if button != PointerButton::Primary {
            return false;
        }
        if matches!(
            target,
            PressTarget::Checkbox | PressTarget::SelectAllRow | PressTarget::Outside
        ) {
            return false;
        }
        self.state = DragState::Dragging {
            anchor: point,
            current: point,
        };
        true
    }

    /// Updates the live region. Presentation only: selection is untouched.
    pub fn pointer_moved(&mut self, point: Point) -> Option<Rect> {
        match &mut self.state {
            DragState::Dragging { anchor, current } => {
                *current = point;
                Some(Rect::from_corners(*anchor, point))
            }
            DragState::Idle => None,
        }
    }

    pub fn live_region(&self) -> Option<Rect> {
        match self.state {
            DragState::Dragging { anchor, current } => Some(Rect::from_corners(anchor, current)),
            DragState::Idle => None,
        }
    }

    /// Ends the drag and replaces the selection with the rows hit by the
    /// final region. Returns `None` when no drag was in progress, leaving
    /// the collection untouched.
    pub fn release(
        &mut self,
        point: Point,
        rows: &dyn RowBounds,
        collection: &mut SelectableCollection,
    ) -> Option<DragOutcome> {
        let DragState::Dragging { anchor, .. } = self.state else {
            return None;
        };
        self.state = DragState::Idle;

        let region = Rect::from_corners(anchor, point);
        let row_count = rows.row_count();
        let mut matched = 0;
        collection.select_by_predicate(|index| {
            let hit = index < row_count
                && rows
                    .row_bounds_at(index)
                    .is_some_and(|bounds| bounds.intersects(&region));
            if hit {
                matched += 1;
            }
            hit
        });
        Some(DragOutcome { region, matched })
    }

    /// Drops an in-progress drag without touching any selection.
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_is_normalized_for_any_direction() {
        let region = Rect::from_corners(Point::new(10, 20), Point::new(2, 5));
        assert_eq!(region, Rect::new(2, 5, 10, 20));
        assert_eq!(region.width(), 8);
        assert_eq!(region.height(), 15);
    }

    #[test]
    fn touching_edges_intersect() {
        let a = Rect::new(0, 0, 10, 10);
        assert!(a.intersects(&Rect::new(10, 10, 20, 20)));
        assert!(!a.intersects(&Rect::new(11, 0, 20, 10)));
        assert!(!a.intersects(&Rect::new(0, 11, 10, 20)));
    }

    #[test]
    fn secondary_button_does_not_start_drag() {
        let mut selector = DragRegionSelector::new();
        assert!(!selector.press(PointerButton::Secondary, PressTarget::Row, Point::new(1, 1)));
        assert!(!selector.is_dragging());
    }

    #[test]
    fn move_without_drag_has_no_region() {
        let mut selector = DragRegionSelector::new();
        assert_eq!(selector.pointer_moved(Point::new(3, 3)), None);
        assert_eq!(selector.live_region(), None);
    }
}
