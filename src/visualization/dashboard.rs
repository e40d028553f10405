//! Terminal rendering for the revenue overview.

use chrono::NaiveDate;

use crate::aggregation::{grid_rows, LoadError, OverviewReport};
use crate::config::{GRID_COLS, SOURCE_TABLE, SUMMARY_WINDOW_DAYS};
use crate::models::GroupTimeSeries;
use crate::storage::load_failure_hints;


// Constants
const STEEL: &str = "\x1b[38;5;67m";
const CYAN: &str = "\x1b[36m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

const BAR_WIDTH: usize = 30;
const TREND_WIDTH: usize = 64;
const CELL_SPARK_WIDTH: usize = 30;

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];


/// Format a dollar amount with thousands separators, no decimals.
pub fn format_dollars(n: f64) -> String {
    let negative = n < 0.0;
    let rounded = n.abs().round() as i64;
    let s = rounded.to_string();
    let chars: Vec<char> = s.chars().collect();

    let mut result = String::new();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }

    if negative {
        format!("-${result}")
    } else {
        format!("${result}")
    }
}


/// Format a plain count with thousands separators.
pub fn format_count(n: i64) -> String {
    let s = n.to_string();
    let chars: Vec<char> = s.chars().collect();

    let mut result = String::new();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }

    result
}


/// Compress a value series into a fixed-width block-glyph sparkline.
///
/// Series longer than `width` are bucketed by mean; order is preserved.
pub fn sparkline(values: &[f64], width: usize) -> String {
    if values.is_empty() || width == 0 {
        return String::new();
    }

    let bucketed = bucket_means(values, width);
    let max = bucketed.iter().cloned().fold(f64::MIN, f64::max);
    let min = bucketed.iter().cloned().fold(f64::MAX, f64::min);
    let span = (max - min).max(f64::EPSILON);

    bucketed
        .iter()
        .map(|v| {
            let level = ((v - min) / span * 7.0).round() as usize;
            SPARK_LEVELS[level.min(7)]
        })
        .collect()
}


/// Average consecutive values down to at most `width` buckets.
fn bucket_means(values: &[f64], width: usize) -> Vec<f64> {
    if values.len() <= width {
        return values.to_vec();
    }

    let mut out = Vec::with_capacity(width);
    for i in 0..width {
        let start = i * values.len() / width;
        let end = ((i + 1) * values.len() / width).max(start + 1);
        let slice = &values[start..end];
        out.push(slice.iter().sum::<f64>() / slice.len() as f64);
    }
    out
}


/// Create a horizontal text bar scaled against the largest value.
fn create_bar(value: f64, max_value: f64, width: usize, color: &str) -> String {
    if max_value <= 0.0 {
        return "░".repeat(width);
    }

    let filled = ((value / max_value) * width as f64) as usize;
    let filled = filled.min(width);

    format!(
        "{}{}{}{}{}",
        color,
        "█".repeat(filled),
        RESET,
        DIM,
        "░".repeat(width - filled),
    ) + RESET
}


fn divider() {
    println!("{}{}{}", DIM, "─".repeat(78), RESET);
}


/// Render the complete overview report.
pub fn render_report(report: &OverviewReport, clear_screen: bool) {
    if clear_screen {
        print!("\x1b[2J\x1b[H"); // Clear screen and move cursor to top
    }

    println!("{}{}Corporate Revenue Overview{}", BOLD, STEEL, RESET);
    divider();

    render_daily_trend(&report.daily_dates, &report.daily_values);
    divider();

    render_metric_cards(report);

    println!(
        "{}Data filtered for period: {}{} to {}{}",
        DIM,
        RESET,
        report.window_start.format("%Y-%m-%d"),
        report.max_date.format("%Y-%m-%d"),
        RESET,
    );
    divider();

    render_top_groups(report);
    divider();

    render_series_grid(&report.series);
    divider();

    println!(
        "{}Data source: {} ({}-day rolling window){}",
        DIM, SOURCE_TABLE, SUMMARY_WINDOW_DAYS, RESET
    );
}


/// Render the error banner for a failed pass.
pub fn render_error(err: &LoadError, debug: bool) {
    println!("{}{}Error loading data: {}{}", BOLD, RED, err, RESET);
    println!("Please check:");
    for hint in load_failure_hints() {
        println!("- {hint}");
    }

    if debug {
        println!();
        println!("{}Error details: {:?}{}", DIM, err, RESET);
    }
}


/// Render the daily total-credits trend.
///
/// The series arrives newest-first and is drawn in that order, so the trend
/// reads right-to-left chronologically; the endpoint labels make that
/// explicit.
fn render_daily_trend(dates: &[NaiveDate], values: &[f64]) {
    println!("{}Total Daily Credits Over Time{}", BOLD, RESET);

    if values.is_empty() {
        println!("{}No daily credit data since the trend start date{}", DIM, RESET);
        return;
    }

    println!("{}{}{}", STEEL, sparkline(values, TREND_WIDTH), RESET);

    let first = dates.first().map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default();
    let last = dates.last().map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default();
    println!(
        "{}{}{}{}{}",
        DIM,
        first,
        " ".repeat(TREND_WIDTH.saturating_sub(first.len() + last.len())),
        last,
        RESET,
    );
}


/// Render the two KPI cards for the trailing window.
fn render_metric_cards(report: &OverviewReport) {
    let width = 28;
    let border = "─".repeat(width - 2);

    println!("┌{}┐  ┌{}┐", border, border);
    println!("│{:^26}│  │{:^26}│", "Total Groups", "Annualized RR");
    println!(
        "│{}{}{:^26}{}│  │{}{}{:^26}{}│",
        BOLD,
        STEEL,
        format_count(report.metrics.total_groups as i64),
        RESET,
        BOLD,
        STEEL,
        format_dollars(report.metrics.annualized_rr_dollars),
        RESET,
    );
    println!("└{}┘  └{}┘", border, border);
}


/// Render the top-10 horizontal bar chart, largest bar at the bottom so it
/// sits against the axis origin.
fn render_top_groups(report: &OverviewReport) {
    println!("{}Top 10 Annualized Consumption by Group{}", BOLD, RESET);
    println!("{}RR = 30 day consumption * 12{}", DIM, RESET);

    let bars = report.bar_rows();
    if bars.is_empty() {
        println!("{}No groups in the current window{}", DIM, RESET);
        return;
    }

    let max_dollars = bars
        .iter()
        .map(|g| g.annualized_rr_dollars)
        .fold(f64::MIN, f64::max);

    for group in &bars {
        let label: String = group.group_label.chars().take(24).collect();
        let bar = create_bar(group.annualized_rr_dollars, max_dollars, BAR_WIDTH, STEEL);

        // Value label outside the bar
        println!(
            "{:24} {} {}{:>14}{}",
            label,
            bar,
            STEEL,
            format_dollars(group.annualized_rr_dollars),
            RESET,
        );
    }
}


/// Render the small-multiples grid, two cells per row.
fn render_series_grid(series: &[GroupTimeSeries]) {
    println!("{}Time Series - Annual RR by Group (Full Year Data){}", BOLD, RESET);

    if series.is_empty() {
        println!(
            "{}Warning: No time series data available for the selected groups.{}",
            YELLOW, RESET
        );
        return;
    }

    let rows = grid_rows(series.len(), GRID_COLS);
    for row in 0..rows {
        let cells: Vec<Vec<String>> = series
            .iter()
            .skip(row * GRID_COLS)
            .take(GRID_COLS)
            .map(render_series_cell)
            .collect();

        // Cells are fixed height; print them side by side
        for line_idx in 0..4 {
            let line: Vec<&str> = cells.iter().map(|c| c[line_idx].as_str()).collect();
            println!("{}", line.join("  "));
        }
    }
}


/// Build one fixed-height grid cell: border, sparkline, latest value, border.
fn render_series_cell(series: &GroupTimeSeries) -> Vec<String> {
    let inner = CELL_SPARK_WIDTH + 2;
    let title: String = series.group_label.chars().take(CELL_SPARK_WIDTH).collect();
    let latest = series.values.last().copied().unwrap_or(0.0);

    vec![
        format!("┌{:─<width$}┐", format!(" {title} "), width = inner),
        format!(
            "│ {}{}{} │",
            STEEL,
            format!("{:<width$}", sparkline(&series.values, CELL_SPARK_WIDTH), width = CELL_SPARK_WIDTH),
            RESET,
        ),
        format!(
            "│ {}{:<width$}{} │",
            DIM,
            format!("latest {}", format_dollars(latest)),
            RESET,
            width = CELL_SPARK_WIDTH,
        ),
        format!("└{}┘", "─".repeat(inner)),
    ]
}


/// Print the live-mode notice shown above auto-refreshing dashboards.
pub fn render_live_notice(interval_secs: u64) {
    println!(
        "{}Auto-refreshing every {} seconds. Press Ctrl+C to exit.{}",
        CYAN, interval_secs, RESET
    );
    println!();
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_dollars() {
        assert_eq!(format_dollars(0.0), "$0");
        assert_eq!(format_dollars(950.4), "$950");
        assert_eq!(format_dollars(1234567.0), "$1,234,567");
        assert_eq!(format_dollars(-4500.0), "-$4,500");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(7), "7");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(987654321), "987,654,321");
    }

    #[test]
    fn test_sparkline_width() {
        let values: Vec<f64> = (0..200).map(|i| i as f64).collect();
        let line = sparkline(&values, 64);
        assert_eq!(line.chars().count(), 64);
    }

    #[test]
    fn test_sparkline_short_series_keeps_length() {
        let line = sparkline(&[1.0, 5.0, 3.0], 64);
        assert_eq!(line.chars().count(), 3);
    }

    #[test]
    fn test_sparkline_extremes() {
        let line = sparkline(&[0.0, 10.0], 10);
        let chars: Vec<char> = line.chars().collect();
        assert_eq!(chars[0], SPARK_LEVELS[0]);
        assert_eq!(chars[1], SPARK_LEVELS[7]);
    }

    #[test]
    fn test_sparkline_empty() {
        assert_eq!(sparkline(&[], 10), "");
    }

    #[test]
    fn test_bucket_means_preserves_order() {
        let values = vec![1.0, 1.0, 10.0, 10.0];
        let buckets = bucket_means(&values, 2);
        assert_eq!(buckets, vec![1.0, 10.0]);
    }

    #[test]
    fn test_create_bar_zero_max() {
        let bar = create_bar(5.0, 0.0, 10, STEEL);
        assert_eq!(bar, "░".repeat(10));
    }

    #[test]
    fn test_create_bar_full() {
        let bar = create_bar(10.0, 10.0, 8, STEEL);
        assert!(bar.contains(&"█".repeat(8)));
    }

    #[test]
    fn test_series_cell_is_fixed_height() {
        let series = GroupTimeSeries {
            group_label: "Studios".to_string(),
            dates: vec![chrono::NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()],
            values: vec![1200.0],
        };
        let cell = render_series_cell(&series);
        assert_eq!(cell.len(), 4);
        assert!(cell[2].contains("$1,200"));
    }
}
