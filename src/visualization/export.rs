//! Export functionality for the overview report.
//!
//! Generates a single SVG page mirroring the terminal dashboard (daily trend,
//! metrics, top-10 bars, small-multiples grid) and can rasterize it to PNG.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::aggregation::{grid_rows, OverviewReport};
use crate::config::{GRID_COLS, SOURCE_TABLE, SUMMARY_WINDOW_DAYS};
use crate::models::GroupTimeSeries;
use crate::visualization::dashboard::format_dollars;


// Report color scheme
const PAGE_BG: &str = "#FFFFFF";
const TEXT: &str = "#26282A";
const TEXT_SECONDARY: &str = "#6B7075";
const STEELBLUE: &str = "#4682B4";
const GRID_LINE: &str = "#D9DCDF";

// Page geometry
const PAGE_WIDTH: i32 = 1000;
const MARGIN_LEFT: i32 = 70;
const MARGIN_RIGHT: i32 = 30;
const TREND_HEIGHT: i32 = 200;
const BAR_HEIGHT: i32 = 24;
const BAR_GAP: i32 = 8;
const BAR_LABEL_WIDTH: i32 = 230;
const SUBPLOT_WIDTH: i32 = 430;
const SUBPLOT_HEIGHT: i32 = 150;
const SUBPLOT_VGAP: i32 = 46;


/// Export the overview report as SVG.
pub fn export_overview_svg(report: &OverviewReport, output_path: &Path) -> Result<()> {
    let svg_content = generate_svg(report);

    std::fs::write(output_path, svg_content)
        .with_context(|| format!("Failed to write SVG to {}", output_path.display()))?;

    Ok(())
}


/// Export the overview report as PNG.
pub fn export_overview_png(report: &OverviewReport, output_path: &Path) -> Result<()> {
    let svg_content = generate_svg(report);

    let tree = resvg::usvg::Tree::from_str(
        &svg_content,
        &resvg::usvg::Options::default(),
    ).context("Failed to parse SVG")?;

    let size = tree.size();
    let width = size.width() as u32;
    let height = size.height() as u32;

    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .context("Failed to create pixmap")?;

    pixmap.fill(tiny_skia::Color::WHITE);

    resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());

    pixmap.save_png(output_path)
        .with_context(|| format!("Failed to save PNG to {}", output_path.display()))?;

    Ok(())
}


/// Generate the full SVG page.
fn generate_svg(report: &OverviewReport) -> String {
    let bar_rows = report.bar_rows();
    let n_series = report.series.len();
    let series_rows = grid_rows(n_series.max(1), GRID_COLS) as i32;

    let trend_top = 70;
    let metrics_top = trend_top + TREND_HEIGHT + 60;
    let bars_top = metrics_top + 90;
    let bars_height = bar_rows.len() as i32 * (BAR_HEIGHT + BAR_GAP);
    let grid_top = bars_top + bars_height + 70;
    let grid_height = if n_series > 0 {
        series_rows * (SUBPLOT_HEIGHT + SUBPLOT_VGAP)
    } else {
        40
    };
    let height = grid_top + grid_height + 50;

    let mut svg_parts = vec![
        format!(r#"<svg width="{}" height="{}" xmlns="http://www.w3.org/2000/svg">"#, PAGE_WIDTH, height),
        "<style>".to_string(),
        format!("  .title {{ fill: {}; font: bold 20px -apple-system, sans-serif; }}", TEXT),
        format!("  .section {{ fill: {}; font: bold 14px -apple-system, sans-serif; }}", TEXT),
        format!("  .label {{ fill: {}; font: 11px -apple-system, sans-serif; }}", TEXT_SECONDARY),
        format!("  .metric {{ fill: {}; font: bold 24px -apple-system, sans-serif; }}", STEELBLUE),
        format!("  .bar-value {{ fill: {}; font: 11px -apple-system, sans-serif; }}", TEXT),
        "</style>".to_string(),
        format!(r#"<rect width="{}" height="{}" fill="{}"/>"#, PAGE_WIDTH, height, PAGE_BG),
    ];

    svg_parts.push(format!(
        r#"<text x="{}" y="34" class="title">Corporate Revenue Overview</text>"#,
        MARGIN_LEFT
    ));

    render_trend_section(&mut svg_parts, report, trend_top);
    render_metrics_section(&mut svg_parts, report, metrics_top);
    render_bar_section(&mut svg_parts, &bar_rows, bars_top);
    render_grid_section(&mut svg_parts, &report.series, grid_top);

    svg_parts.push(format!(
        r#"<text x="{}" y="{}" class="label">Data source: {} ({}-day rolling window)</text>"#,
        MARGIN_LEFT,
        height - 18,
        SOURCE_TABLE,
        SUMMARY_WINDOW_DAYS,
    ));

    svg_parts.push("</svg>".to_string());

    svg_parts.join("\n")
}


/// Daily total-credits line chart.
///
/// Points are plotted in series order; the query delivers them newest-first,
/// so the chart reads right-to-left chronologically, as upstream.
fn render_trend_section(svg_parts: &mut Vec<String>, report: &OverviewReport, top: i32) {
    svg_parts.push(format!(
        r#"<text x="{}" y="{}" class="section">Total Daily Credits Over Time</text>"#,
        MARGIN_LEFT,
        top - 12
    ));

    let plot_width = PAGE_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    svg_parts.push(format!(
        r#"<rect x="{}" y="{}" width="{}" height="{}" fill="none" stroke="{}"/>"#,
        MARGIN_LEFT, top, plot_width, TREND_HEIGHT, GRID_LINE
    ));

    if report.daily_values.is_empty() {
        svg_parts.push(format!(
            r#"<text x="{}" y="{}" class="label">No daily credit data</text>"#,
            MARGIN_LEFT + 10,
            top + TREND_HEIGHT / 2
        ));
        return;
    }

    let max = report.daily_values.iter().cloned().fold(f64::MIN, f64::max).max(1.0);
    let points = polyline_points(
        &report.daily_values,
        MARGIN_LEFT,
        top,
        plot_width,
        TREND_HEIGHT,
        max,
    );

    svg_parts.push(format!(
        r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="2"/>"#,
        points, STEELBLUE
    ));

    // Axis extremes
    svg_parts.push(format!(
        r#"<text x="{}" y="{}" class="label" text-anchor="end">{}</text>"#,
        MARGIN_LEFT - 6,
        top + 12,
        format_si(max),
    ));
    svg_parts.push(format!(
        r#"<text x="{}" y="{}" class="label" text-anchor="end">0</text>"#,
        MARGIN_LEFT - 6,
        top + TREND_HEIGHT,
    ));

    let (first, last) = endpoint_labels(&report.daily_dates);
    svg_parts.push(format!(
        r#"<text x="{}" y="{}" class="label">{}</text>"#,
        MARGIN_LEFT,
        top + TREND_HEIGHT + 16,
        first
    ));
    svg_parts.push(format!(
        r#"<text x="{}" y="{}" class="label" text-anchor="end">{}</text>"#,
        MARGIN_LEFT + plot_width,
        top + TREND_HEIGHT + 16,
        last
    ));
}


/// Metric values and the window banner.
fn render_metrics_section(svg_parts: &mut Vec<String>, report: &OverviewReport, top: i32) {
    let col2 = PAGE_WIDTH / 2;

    svg_parts.push(format!(
        r#"<text x="{}" y="{}" class="label">Total Groups</text>"#,
        MARGIN_LEFT, top
    ));
    svg_parts.push(format!(
        r#"<text x="{}" y="{}" class="metric">{}</text>"#,
        MARGIN_LEFT,
        top + 28,
        report.metrics.total_groups
    ));

    svg_parts.push(format!(
        r#"<text x="{}" y="{}" class="label">Annualized RR</text>"#,
        col2, top
    ));
    svg_parts.push(format!(
        r#"<text x="{}" y="{}" class="metric">{}</text>"#,
        col2,
        top + 28,
        format_dollars(report.metrics.annualized_rr_dollars)
    ));

    svg_parts.push(format!(
        r#"<text x="{}" y="{}" class="label">Data filtered for period: {} to {}</text>"#,
        MARGIN_LEFT,
        top + 56,
        report.window_start.format("%Y-%m-%d"),
        report.max_date.format("%Y-%m-%d"),
    ));
}


/// Top-10 horizontal bar chart, already reversed so the largest bar is last
/// (adjacent to the x axis when read bottom-up).
fn render_bar_section(
    svg_parts: &mut Vec<String>,
    bar_rows: &[crate::models::GroupSummary],
    top: i32,
) {
    svg_parts.push(format!(
        r#"<text x="{}" y="{}" class="section">Top 10 Annualized Consumption by Group</text>"#,
        MARGIN_LEFT,
        top - 28
    ));
    svg_parts.push(format!(
        r#"<text x="{}" y="{}" class="label">RR = 30 day consumption * 12</text>"#,
        MARGIN_LEFT,
        top - 12
    ));

    if bar_rows.is_empty() {
        svg_parts.push(format!(
            r#"<text x="{}" y="{}" class="label">No groups in the current window</text>"#,
            MARGIN_LEFT,
            top + 16
        ));
        return;
    }

    let max_dollars = bar_rows
        .iter()
        .map(|g| g.annualized_rr_dollars)
        .fold(f64::MIN, f64::max)
        .max(1.0);
    let bar_area = PAGE_WIDTH - MARGIN_LEFT - BAR_LABEL_WIDTH - MARGIN_RIGHT - 110;

    for (i, group) in bar_rows.iter().enumerate() {
        let y = top + i as i32 * (BAR_HEIGHT + BAR_GAP);
        let bar_w = ((group.annualized_rr_dollars / max_dollars) * bar_area as f64) as i32;
        let bar_x = MARGIN_LEFT + BAR_LABEL_WIDTH;

        svg_parts.push(format!(
            r#"<text x="{}" y="{}" class="label" text-anchor="end">{}</text>"#,
            bar_x - 8,
            y + BAR_HEIGHT / 2 + 4,
            svg_escape(&group.group_label),
        ));
        svg_parts.push(format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
            bar_x, y, bar_w.max(1), BAR_HEIGHT, STEELBLUE
        ));
        // Value label outside the bar
        svg_parts.push(format!(
            r#"<text x="{}" y="{}" class="bar-value">{}</text>"#,
            bar_x + bar_w.max(1) + 6,
            y + BAR_HEIGHT / 2 + 4,
            format_dollars(group.annualized_rr_dollars),
        ));
    }
}


/// Small-multiples grid: one subplot per surviving group, two per row,
/// shared currency formatting, no legends.
fn render_grid_section(svg_parts: &mut Vec<String>, series: &[GroupTimeSeries], top: i32) {
    svg_parts.push(format!(
        r#"<text x="{}" y="{}" class="section">Time Series - Annual RR by Group (Full Year Data)</text>"#,
        MARGIN_LEFT,
        top - 16
    ));

    if series.is_empty() {
        svg_parts.push(format!(
            r#"<text x="{}" y="{}" class="label">No time series data available for the selected groups.</text>"#,
            MARGIN_LEFT,
            top + 12
        ));
        return;
    }

    let col_step = SUBPLOT_WIDTH + 40;
    for (i, s) in series.iter().enumerate() {
        let row = i / GRID_COLS;
        let col = i % GRID_COLS;
        let x = MARGIN_LEFT + col as i32 * col_step;
        let y = top + row as i32 * (SUBPLOT_HEIGHT + SUBPLOT_VGAP);

        render_subplot(svg_parts, s, x, y);
    }
}


/// One subplot of the grid.
fn render_subplot(svg_parts: &mut Vec<String>, series: &GroupTimeSeries, x: i32, y: i32) {
    svg_parts.push(format!(
        r#"<text x="{}" y="{}" class="label">{}</text>"#,
        x,
        y - 6,
        svg_escape(&series.group_label),
    ));
    svg_parts.push(format!(
        r#"<rect x="{}" y="{}" width="{}" height="{}" fill="none" stroke="{}"/>"#,
        x, y, SUBPLOT_WIDTH, SUBPLOT_HEIGHT, GRID_LINE
    ));

    let max = series.values.iter().cloned().fold(f64::MIN, f64::max).max(1.0);
    let points = polyline_points(&series.values, x, y, SUBPLOT_WIDTH, SUBPLOT_HEIGHT, max);

    svg_parts.push(format!(
        r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="1.5"/>"#,
        points, STEELBLUE
    ));

    // Currency tick at the top of the y axis
    svg_parts.push(format!(
        r#"<text x="{}" y="{}" class="label" text-anchor="end">${}</text>"#,
        x - 4,
        y + 10,
        format_si(max),
    ));

    let (first, last) = endpoint_labels(&series.dates);
    svg_parts.push(format!(
        r#"<text x="{}" y="{}" class="label">{}</text>"#,
        x,
        y + SUBPLOT_HEIGHT + 14,
        first
    ));
    svg_parts.push(format!(
        r#"<text x="{}" y="{}" class="label" text-anchor="end">{}</text>"#,
        x + SUBPLOT_WIDTH,
        y + SUBPLOT_HEIGHT + 14,
        last
    ));
}


/// Scale a value series into `points` for an SVG polyline, zero-anchored.
fn polyline_points(
    values: &[f64],
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    max: f64,
) -> String {
    let n = values.len();
    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let px = if n > 1 {
                x as f64 + (i as f64 / (n - 1) as f64) * width as f64
            } else {
                x as f64 + width as f64 / 2.0
            };
            let py = y as f64 + height as f64 * (1.0 - (v / max).clamp(0.0, 1.0));
            format!("{:.1},{:.1}", px, py)
        })
        .collect::<Vec<_>>()
        .join(" ")
}


/// First/last date labels for a series.
fn endpoint_labels(dates: &[NaiveDate]) -> (String, String) {
    let first = dates
        .first()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    let last = dates
        .last()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    (first, last)
}


/// SI-style short form for axis ticks.
fn format_si(n: f64) -> String {
    if n >= 1_000_000_000.0 {
        format!("{:.1}B", n / 1_000_000_000.0)
    } else if n >= 1_000_000.0 {
        format!("{:.1}M", n / 1_000_000.0)
    } else if n >= 1_000.0 {
        format!("{:.1}K", n / 1_000.0)
    } else {
        format!("{:.0}", n)
    }
}


/// Escape a label for use inside SVG text content.
fn svg_escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}


/// Open file with default application.
pub fn open_file(path: &Path) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(path)
            .spawn()
            .context("Failed to open file")?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", "", &path.to_string_lossy()])
            .spawn()
            .context("Failed to open file")?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(path)
            .spawn()
            .context("Failed to open file")?;
    }

    Ok(())
}
