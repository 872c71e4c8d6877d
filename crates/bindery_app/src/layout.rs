//! Screen geometry of the derived-file list as printed by `render`.
//!
//! Line 0 is the select-all row; derived row `i` is printed on line `i + 1`.

use bindery_core::{Point, PressTarget, Rect};

pub const ROW_WIDTH: i32 = 80;
pub const CHECKBOX_COLUMNS: i32 = 4;
pub const SELECT_ALL_LINE: i32 = 0;
/// Blank lines under the last row that still belong to the list.
pub const LIST_PADDING_LINES: i32 = 2;

/// Bounding boxes of the derived rows, in render order.
pub fn derived_row_bounds(row_count: usize) -> Vec<Rect> {
    (0..row_count)
        .map(|index| {
            let line = SELECT_ALL_LINE + 1 + index as i32;
            Rect::new(0, line, ROW_WIDTH - 1, line)
        })
        .collect()
}

pub fn hit_test(point: Point, row_count: usize) -> PressTarget {
    let last_line = SELECT_ALL_LINE + row_count as i32;
    if point.y == SELECT_ALL_LINE && (0..ROW_WIDTH).contains(&point.x) {
        return PressTarget::SelectAllRow;
    }
    let on_row = point.y > SELECT_ALL_LINE
        && point.y <= last_line
        && (0..ROW_WIDTH).contains(&point.x);
    let in_padding = point.y > last_line
        && point.y <= last_line + LIST_PADDING_LINES
        && (0..ROW_WIDTH).contains(&point.x);
    match (on_row, point.x < CHECKBOX_COLUMNS) {
        (true, true) => PressTarget::Checkbox,
        (true, false) => PressTarget::Row,
        (false, _) if in_padding => PressTarget::Background,
        (false, _) => PressTarget::Outside,
    }
}
