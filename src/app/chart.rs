//! Stacked-bar chart building blocks for the metrics view
//!
//! Pure functions from a metrics series to text rows, so the geometry is
//! testable without a terminal. Colors are applied by the caller-provided
//! [`ThemeColors`].

use ratatui::text::{Line, Span};

use crate::metrics::{DailyMetric, format_total};
use crate::theme::ThemeColors;

/// Brightness ramp for the sparkline, dimmest first
const SPARK_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#'];

const BAR_CELL: &str = "█";

/// Split a width budget across the three categories of one day.
///
/// `max_total` is the largest daily total in the visible series and sets the
/// horizontal scale. Raw lengths are floored, any nonzero category is bumped
/// to at least one cell, then lengths are reconciled one step at a time on
/// the currently-largest segment until they sum to `width` exactly. Ties go
/// to follows, then likes, then boosts. The exact sum wins over visibility:
/// at very small widths a bumped segment can be reconciled back to zero.
pub fn allocate_segments(values: [u32; 3], max_total: u32, width: usize) -> [usize; 3] {
    if width == 0 || max_total == 0 {
        return [0; 3];
    }

    let mut lengths = [0usize; 3];
    for (length, value) in lengths.iter_mut().zip(values) {
        *length = value as usize * width / max_total as usize;
    }
    for (length, value) in lengths.iter_mut().zip(values) {
        if value > 0 && *length == 0 {
            *length = 1;
        }
    }

    loop {
        let sum: usize = lengths.iter().sum();
        let largest = largest_index(&lengths);
        if sum > width {
            if lengths[largest] == 0 {
                break;
            }
            lengths[largest] -= 1;
        } else if sum < width {
            lengths[largest] += 1;
        } else {
            break;
        }
    }

    lengths
}

fn largest_index(lengths: &[usize; 3]) -> usize {
    let mut best = 0;
    for i in 1..3 {
        if lengths[i] > lengths[best] {
            best = i;
        }
    }
    best
}

/// One chart row: day label, stacked bar, daily total.
pub fn bar_line(
    day: &DailyMetric,
    max_total: u32,
    bar_width: usize,
    selected: bool,
    colors: &ThemeColors,
) -> Line<'static> {
    let total = day.total();
    let budget = if max_total == 0 {
        0
    } else {
        total as usize * bar_width / max_total as usize
    };
    let segments = allocate_segments([day.follows, day.likes, day.boosts], max_total, budget);

    let label_style = if selected {
        colors.tab_active()
    } else {
        colors.text_dim()
    };

    let mut spans = vec![Span::styled(format!("{:<7}", day.label), label_style)];
    for (length, style) in segments.iter().zip([
        colors.chart_follows(),
        colors.chart_likes(),
        colors.chart_boosts(),
    ]) {
        if *length > 0 {
            spans.push(Span::styled(BAR_CELL.repeat(*length), style));
        }
    }
    let pad = bar_width.saturating_sub(segments.iter().sum());
    spans.push(Span::styled(
        format!("{} {total}", " ".repeat(pad)),
        colors.text_muted(),
    ));

    Line::from(spans)
}

/// Totals header above the chart.
pub fn totals_line(series: &[DailyMetric], colors: &ThemeColors) -> Line<'static> {
    Line::from(Span::styled(format_total(series), colors.text()))
}

/// Category legend row.
pub fn legend_line(colors: &ThemeColors) -> Line<'static> {
    Line::from(vec![
        Span::styled("■ Follows", colors.chart_follows()),
        Span::raw("   "),
        Span::styled("■ Likes", colors.chart_likes()),
        Span::raw("   "),
        Span::styled("■ Boosts", colors.chart_boosts()),
    ])
}

/// Daily totals as a density sparkline, downsampled to `width` columns.
pub fn sparkline(series: &[DailyMetric], width: usize) -> String {
    if series.is_empty() || width == 0 {
        return String::new();
    }
    let max = series.iter().map(DailyMetric::total).max().unwrap_or(0);
    let cols = width.min(series.len());
    let top = SPARK_RAMP.len() - 1;

    let mut out = String::with_capacity(cols);
    for col in 0..cols {
        let total = series[col * series.len() / cols].total();
        let level = if max == 0 || total == 0 {
            0
        } else {
            (total as usize * top / max as usize).max(1)
        };
        out.push(SPARK_RAMP[level]);
    }
    out
}

/// Detail rows for the highlighted day: per-category counts with their share
/// of the day, plus the change against the previous day when one exists.
pub fn selection_lines(
    series: &[DailyMetric],
    selected: usize,
    colors: &ThemeColors,
) -> Vec<Line<'static>> {
    let Some(day) = series.get(selected) else {
        return Vec::new();
    };
    let total = day.total();

    let mut lines = vec![Line::from(vec![
        Span::styled(format!("{}  ", day.label), colors.text_primary()),
        Span::styled(
            format!("Follows {} ({})  ", day.follows, share(day.follows, total)),
            colors.chart_follows(),
        ),
        Span::styled(
            format!("Likes {} ({})  ", day.likes, share(day.likes, total)),
            colors.chart_likes(),
        ),
        Span::styled(
            format!("Boosts {} ({})", day.boosts, share(day.boosts, total)),
            colors.chart_boosts(),
        ),
    ])];

    if selected > 0 {
        let prev = &series[selected - 1];
        lines.push(Line::from(Span::styled(
            format!(
                "vs {}: Follows {}  Likes {}  Boosts {}",
                prev.label,
                delta(day.follows, prev.follows),
                delta(day.likes, prev.likes),
                delta(day.boosts, prev.boosts)
            ),
            colors.text_dim(),
        )));
    }

    lines
}

fn share(value: u32, total: u32) -> String {
    if total == 0 {
        "0%".to_string()
    } else {
        format!("{}%", value * 100 / total)
    }
}

fn delta(current: u32, previous: u32) -> String {
    if current >= previous {
        format!("+{}", current - previous)
    } else {
        format!("-{}", previous - current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiny_budget_gives_up_the_visibility_floor() {
        // Raw floors (0,0,3), visibility floor lifts to (1,1,3), then the
        // largest segment is reconciled down twice to land on the budget.
        assert_eq!(allocate_segments([1, 1, 100], 100, 3), [1, 1, 1]);
    }

    #[test]
    fn allocation_always_sums_to_the_budget() {
        let cases = [
            ([0, 0, 0], 10, 0),
            ([5, 5, 5], 15, 12),
            ([1, 0, 0], 40, 8),
            ([3, 90, 7], 100, 20),
            ([1, 1, 1], 100, 1),
            ([40, 40, 40], 120, 30),
        ];
        for (values, max_total, width) in cases {
            let lengths = allocate_segments(values, max_total, width);
            assert_eq!(
                lengths.iter().sum::<usize>(),
                width,
                "values {values:?} max {max_total} width {width}"
            );
        }
    }

    #[test]
    fn nonzero_categories_stay_visible_when_space_allows() {
        let lengths = allocate_segments([1, 50, 49], 100, 20);
        assert!(lengths.iter().all(|l| *l > 0));
        assert_eq!(lengths.iter().sum::<usize>(), 20);
    }

    #[test]
    fn reconciliation_ties_break_toward_follows() {
        // All equal; the downward step must hit the first category.
        assert_eq!(allocate_segments([10, 10, 10], 30, 2), [0, 1, 1]);
    }

    #[test]
    fn zero_budget_or_scale_yields_nothing() {
        assert_eq!(allocate_segments([5, 5, 5], 15, 0), [0, 0, 0]);
        assert_eq!(allocate_segments([0, 0, 0], 0, 10), [0, 0, 0]);
    }

    fn day(label: &str, follows: u32, likes: u32, boosts: u32) -> DailyMetric {
        DailyMetric {
            date: chrono::NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            label: label.to_string(),
            follows,
            likes,
            boosts,
        }
    }

    #[test]
    fn sparkline_scales_to_the_busiest_day() {
        let series = vec![day("a", 0, 0, 0), day("b", 2, 0, 0), day("c", 8, 0, 0)];
        let spark = sparkline(&series, 3);
        assert_eq!(spark.len(), 3);
        assert_eq!(spark.chars().next(), Some(' '));
        assert_eq!(spark.chars().last(), Some('#'));
    }

    #[test]
    fn sparkline_marks_small_nonzero_days() {
        let series = vec![day("a", 1, 0, 0), day("b", 100, 0, 0)];
        assert!(!sparkline(&series, 2).starts_with(' '));
    }

    #[test]
    fn deltas_are_signed() {
        assert_eq!(delta(5, 3), "+2");
        assert_eq!(delta(3, 5), "-2");
        assert_eq!(delta(4, 4), "+0");
    }

    #[test]
    fn share_handles_empty_days() {
        assert_eq!(share(0, 0), "0%");
        assert_eq!(share(1, 4), "25%");
    }
}
