//! Chart-shaping transforms.
//!
//! Everything here is pure and order preserving: rows go in, chart-ready
//! arrays come out, and the caller's ordering is never re-sorted.

use chrono::NaiveDate;

use crate::models::{DailyTotal, GroupSummary};


/// Split daily totals into paired `(dates, values)` arrays, in row order.
///
/// The daily query returns newest-first, so the trend series produced here is
/// newest-first too. That matches the upstream report exactly, even though it
/// renders the trend right-to-left chronologically.
pub fn daily_series(totals: &[DailyTotal]) -> (Vec<NaiveDate>, Vec<f64>) {
    let dates = totals.iter().map(|t| t.usage_date).collect();
    let values = totals.iter().map(|t| t.total_daily_credits).collect();
    (dates, values)
}


/// Reverse the ranked top-N list for a horizontal bar chart, so the largest
/// bar lands adjacent to the axis origin.
pub fn bar_chart_order(ranked: &[GroupSummary]) -> Vec<GroupSummary> {
    ranked.iter().rev().cloned().collect()
}


/// A 1-indexed subplot position in the small-multiples grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridSlot {
    pub row: usize,
    pub col: usize,
}


/// Number of grid rows needed for `n` subplots at `cols` per row.
pub fn grid_rows(n: usize, cols: usize) -> usize {
    (n + cols - 1) / cols
}


/// Assign `n` subplots to `(row, col)` slots, filling each row left to right.
pub fn grid_slots(n: usize, cols: usize) -> Vec<GridSlot> {
    (0..n)
        .map(|i| GridSlot {
            row: i / cols + 1,
            col: i % cols + 1,
        })
        .collect()
}
