//! Pure selection math for the app menu.

use core::ops::Range;

/// Move the selection by `delta`, wrapping in both directions.
pub fn rotate(selected: usize, delta: i32, item_count: usize) -> usize {
    if item_count == 0 {
        return 0;
    }
    (selected as i64 + i64::from(delta)).rem_euclid(item_count as i64) as usize
}

/// Items visible in a `rows`-high window, centered on `selected` where
/// possible and never running past either end of the list.
pub fn visible_window(selected: usize, rows: usize, item_count: usize) -> Range<usize> {
    if item_count <= rows {
        return 0..item_count;
    }
    let start = selected
        .saturating_sub(rows / 2)
        .min(item_count - rows);
    start..start + rows
}
