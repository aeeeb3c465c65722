//! Engagement metrics aggregation
//!
//! Folds the reverse-chronological grouped-notification history into a
//! fixed-size, day-bucketed series. The paginated scan stops as soon as it
//! pages past the start of the window, so its cost is bounded by the window
//! size rather than the full account history. If the server ever returns
//! pages out of strict chronological order, boundary-day records on a later
//! page are missed; that is a documented limitation, not corrected here.

use std::collections::BTreeMap;
use std::future::Future;

use anyhow::Result;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::models::GroupedNotification;

/// Grouped-notification page size used by the scan
const SCAN_PAGE_LIMIT: u32 = 40;

/// Engagement totals for one calendar day. Immutable once in the output
/// series; a new scan replaces the series wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyMetric {
    /// The calendar day, in the timezone the scan ran under
    pub date: NaiveDate,
    /// Short display label (e.g. "Jan 9")
    pub label: String,
    /// New followers
    pub follows: u32,
    /// Favourites received
    pub likes: u32,
    /// Boosts received
    pub boosts: u32,
}

impl DailyMetric {
    fn zeroed(date: NaiveDate) -> Self {
        Self {
            date,
            label: date.format("%b %-d").to_string(),
            follows: 0,
            likes: 0,
            boosts: 0,
        }
    }

    /// Sum of all three categories
    pub const fn total(&self) -> u32 {
        self.follows + self.likes + self.boosts
    }
}

/// Day-bucketed accumulator over a fixed window of calendar days.
///
/// Buckets are created lazily on first contribution; [`Aggregator::series`]
/// fills the gaps with zeroed days.
pub struct Aggregator {
    window_start: NaiveDate,
    window_end: NaiveDate,
    tz: FixedOffset,
    by_day: BTreeMap<NaiveDate, DailyMetric>,
}

impl Aggregator {
    /// Create an aggregator whose window ends on the calendar day of `now`
    /// and spans `range_days` days (clamped to at least 1).
    pub fn new(range_days: u32, now: DateTime<FixedOffset>) -> Self {
        let days = range_days.max(1);
        let end = now.date_naive();
        let start = end - Duration::days(i64::from(days) - 1);
        Self {
            window_start: start,
            window_end: end,
            tz: *now.offset(),
            by_day: BTreeMap::new(),
        }
    }

    /// First day of the window (inclusive)
    pub const fn window_start(&self) -> NaiveDate {
        self.window_start
    }

    /// Timezone offset the window was computed in
    pub const fn timezone(&self) -> FixedOffset {
        self.tz
    }

    /// Fold a batch of grouped notifications into the day buckets.
    ///
    /// Records with an unparseable timestamp, a day outside the window, or a
    /// type other than follow/favourite/reblog contribute nothing. Each match
    /// adds the group's `count`, never a flat 1.
    pub fn add_grouped(&mut self, groups: &[GroupedNotification]) {
        for group in groups {
            let Some(day) = parse_day(&group.latest_at, self.tz) else {
                continue;
            };
            if day < self.window_start || day > self.window_end {
                continue;
            }
            let metric = self
                .by_day
                .entry(day)
                .or_insert_with(|| DailyMetric::zeroed(day));
            match group.kind.as_str() {
                "follow" => metric.follows += group.count,
                "favourite" => metric.likes += group.count,
                "reblog" => metric.boosts += group.count,
                _ => {}
            }
        }
    }

    /// Produce the output series: exactly one entry per window day, oldest
    /// first, zeroed where no record contributed.
    pub fn series(&self) -> Vec<DailyMetric> {
        self.window_start
            .iter_days()
            .take_while(|day| *day <= self.window_end)
            .map(|day| {
                self.by_day
                    .get(&day)
                    .cloned()
                    .unwrap_or_else(|| DailyMetric::zeroed(day))
            })
            .collect()
    }
}

/// Parse a server timestamp down to a calendar day in `tz`.
///
/// Accepts RFC 3339 (with or without fractional seconds) and the naive
/// `%Y-%m-%dT%H:%M:%S` form, taken as UTC. Anything else yields `None` and
/// the record is dropped by the caller.
pub fn parse_day(value: &str, tz: FixedOffset) -> Option<NaiveDate> {
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&tz).date_naive());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive).with_timezone(&tz).date_naive())
}

/// Totals line for reports and the chart header.
pub fn format_total(series: &[DailyMetric]) -> String {
    let (mut follows, mut likes, mut boosts) = (0u32, 0u32, 0u32);
    for day in series {
        follows += day.follows;
        likes += day.likes;
        boosts += day.boosts;
    }
    format!("Follows {follows} · Likes {likes} · Boosts {boosts}")
}

/// Scan the grouped-notification history and compute the day-bucketed series.
///
/// `fetch_page(limit, max_id)` returns the next older page; `on_progress`
/// receives the cumulative scanned record count after every page, matched or
/// not. A failed page fetch aborts the whole computation and discards all
/// partial totals. The same engine backs the interactive metrics tab and the
/// one-shot `roost metrics` report.
pub async fn fetch_daily_metrics<F, Fut, P>(
    range_days: u32,
    now: DateTime<FixedOffset>,
    mut fetch_page: F,
    mut on_progress: P,
) -> Result<Vec<DailyMetric>>
where
    F: FnMut(u32, Option<String>) -> Fut,
    Fut: Future<Output = Result<Vec<GroupedNotification>>>,
    P: FnMut(usize),
{
    let mut aggregator = Aggregator::new(range_days, now);
    let tz = aggregator.timezone();

    let mut max_id: Option<String> = None;
    let mut scanned = 0usize;

    loop {
        let page = fetch_page(SCAN_PAGE_LIMIT, max_id.clone()).await?;
        if page.is_empty() {
            break;
        }

        aggregator.add_grouped(&page);
        scanned += page.len();
        on_progress(scanned);

        let Some(oldest) = page.last() else { break };
        if let Some(day) = parse_day(&oldest.latest_at, tz) {
            if day < aggregator.window_start() {
                break;
            }
        }
        max_id = Some(oldest.most_recent_id.clone());
    }

    Ok(aggregator.series())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn utc_offset() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn at(y: i32, m: u32, d: u32) -> DateTime<FixedOffset> {
        utc_offset().with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn group(kind: &str, latest_at: &str, count: u32, id: &str) -> GroupedNotification {
        GroupedNotification {
            kind: kind.to_string(),
            count,
            latest_at: latest_at.to_string(),
            most_recent_id: id.to_string(),
            accounts: Vec::new(),
            status: None,
        }
    }

    #[test]
    fn series_has_one_entry_per_day_for_each_range() {
        for range in [7u32, 30] {
            let aggregator = Aggregator::new(range, at(2025, 1, 10));
            let series = aggregator.series();

            assert_eq!(series.len(), range as usize);
            assert_eq!(
                series.last().unwrap().date,
                NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()
            );
            for pair in series.windows(2) {
                assert_eq!(pair[1].date, pair[0].date.succ_opt().unwrap());
            }
        }
    }

    #[test]
    fn concrete_three_day_scenario() {
        let mut aggregator = Aggregator::new(3, at(2025, 1, 10));
        aggregator.add_grouped(&[
            group("follow", "2025-01-10T08:00:00Z", 1, "1"),
            group("favourite", "2025-01-10T09:00:00Z", 2, "2"),
            group("reblog", "2025-01-09T12:00:00Z", 3, "3"),
            group("mention", "2025-01-08T08:00:00Z", 5, "4"),
            group("follow", "2024-12-31T12:00:00Z", 7, "5"),
        ]);

        let series = aggregator.series();
        assert_eq!(series.len(), 3);
        assert_eq!(
            (series[0].follows, series[0].likes, series[0].boosts),
            (0, 0, 0)
        );
        assert_eq!(
            (series[1].follows, series[1].likes, series[1].boosts),
            (0, 0, 3)
        );
        assert_eq!(
            (series[2].follows, series[2].likes, series[2].boosts),
            (1, 2, 0)
        );
    }

    #[test]
    fn window_start_included_day_before_excluded() {
        let mut aggregator = Aggregator::new(7, at(2025, 1, 10));
        aggregator.add_grouped(&[
            group("follow", "2025-01-04T00:00:00Z", 2, "1"),
            group("follow", "2025-01-03T23:59:59Z", 9, "2"),
        ]);

        let series = aggregator.series();
        assert_eq!(series[0].date, NaiveDate::from_ymd_opt(2025, 1, 4).unwrap());
        assert_eq!(series[0].follows, 2);
        assert_eq!(series.iter().map(|d| d.follows).sum::<u32>(), 2);
    }

    #[test]
    fn aggregation_is_order_independent() {
        let records = [
            group("favourite", "2025-01-09T08:00:00Z", 4, "1"),
            group("reblog", "2025-01-10T10:00:00Z", 1, "2"),
            group("follow", "2025-01-08T13:00:00Z", 2, "3"),
            group("favourite", "2025-01-10T01:00:00Z", 3, "4"),
        ];

        let mut forward = Aggregator::new(3, at(2025, 1, 10));
        forward.add_grouped(&records);

        let mut scattered = Aggregator::new(3, at(2025, 1, 10));
        scattered.add_grouped(&records[2..]);
        scattered.add_grouped(&records[..2]);

        assert_eq!(forward.series(), scattered.series());
    }

    #[test]
    fn unparseable_timestamps_are_dropped() {
        let mut aggregator = Aggregator::new(3, at(2025, 1, 10));
        aggregator.add_grouped(&[
            group("follow", "", 5, "1"),
            group("follow", "not a timestamp", 5, "2"),
            group("follow", "2025-01-10T08:00:00Z", 1, "3"),
        ]);

        assert_eq!(aggregator.series()[2].follows, 1);
    }

    #[test]
    fn parse_day_accepts_both_formats_and_applies_offset() {
        let tz = utc_offset();
        assert_eq!(
            parse_day("2025-01-10T08:00:00.123Z", tz),
            NaiveDate::from_ymd_opt(2025, 1, 10)
        );
        assert_eq!(
            parse_day("2025-01-10T08:00:00", tz),
            NaiveDate::from_ymd_opt(2025, 1, 10)
        );
        // 23:30 -05:00 is already Jan 11 in UTC
        assert_eq!(
            parse_day("2025-01-10T23:30:00-05:00", tz),
            NaiveDate::from_ymd_opt(2025, 1, 11)
        );
        assert_eq!(parse_day("yesterday", tz), None);
    }

    #[test]
    fn format_total_sums_all_days() {
        let mut aggregator = Aggregator::new(3, at(2025, 1, 10));
        aggregator.add_grouped(&[
            group("follow", "2025-01-10T08:00:00Z", 1, "1"),
            group("favourite", "2025-01-09T08:00:00Z", 2, "2"),
            group("reblog", "2025-01-08T08:00:00Z", 3, "3"),
        ]);
        assert_eq!(
            format_total(&aggregator.series()),
            "Follows 1 · Likes 2 · Boosts 3"
        );
    }

    type BoxedPage = std::pin::Pin<Box<dyn Future<Output = Result<Vec<GroupedNotification>>>>>;

    fn paged_fetcher(
        pages: Vec<Vec<GroupedNotification>>,
    ) -> (impl FnMut(u32, Option<String>) -> BoxedPage, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let fetcher = move |_limit: u32, _max_id: Option<String>| -> BoxedPage {
            let i = calls.fetch_add(1, Ordering::SeqCst);
            let page = pages.get(i).cloned().unwrap_or_default();
            Box::pin(async move { Ok(page) })
        };
        (fetcher, counter)
    }

    #[tokio::test]
    async fn scan_stops_after_paging_past_the_window() {
        // Second page already ends before the window start; a third page must
        // never be requested.
        let pages = vec![
            vec![group("follow", "2025-01-10T08:00:00Z", 1, "10")],
            vec![group("favourite", "2024-12-01T08:00:00Z", 9, "9")],
            vec![group("reblog", "2024-11-01T08:00:00Z", 9, "8")],
        ];
        let (fetcher, calls) = paged_fetcher(pages);

        let series = fetch_daily_metrics(3, at(2025, 1, 10), fetcher, |_| {})
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(series.len(), 3);
        assert_eq!(series[2].follows, 1);
        assert_eq!(series.iter().map(DailyMetric::total).sum::<u32>(), 1);
    }

    #[tokio::test]
    async fn scan_stops_on_empty_page() {
        let pages = vec![
            vec![group("follow", "2025-01-10T08:00:00Z", 2, "10")],
            Vec::new(),
        ];
        let (fetcher, calls) = paged_fetcher(pages);

        let series = fetch_daily_metrics(7, at(2025, 1, 10), fetcher, |_| {})
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(series.last().unwrap().follows, 2);
    }

    #[tokio::test]
    async fn progress_reports_cumulative_counts_per_page() {
        let pages = vec![
            vec![
                group("follow", "2025-01-10T08:00:00Z", 1, "10"),
                group("mention", "2025-01-10T07:00:00Z", 1, "9"),
            ],
            vec![group("favourite", "2024-01-01T08:00:00Z", 1, "1")],
        ];
        let (fetcher, _) = paged_fetcher(pages);

        let mut ticks = Vec::new();
        fetch_daily_metrics(3, at(2025, 1, 10), fetcher, |scanned| ticks.push(scanned))
            .await
            .unwrap();

        // One tick per page even though the second page matched nothing
        assert_eq!(ticks, vec![2, 3]);
    }

    #[tokio::test]
    async fn page_failure_aborts_the_computation() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let fetcher = move |_limit: u32, _max_id: Option<String>| {
            let i = counter.fetch_add(1, Ordering::SeqCst);
            async move {
                if i == 0 {
                    Ok(vec![group("follow", "2025-01-10T08:00:00Z", 1, "10")])
                } else {
                    Err(anyhow::anyhow!("connection reset"))
                }
            }
        };

        let result = fetch_daily_metrics(30, at(2025, 1, 10), fetcher, |_| {}).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn scan_passes_the_continuation_cursor() {
        let seen: Arc<std::sync::Mutex<Vec<Option<String>>>> =
            Arc::new(std::sync::Mutex::new(Vec::new()));
        let record = seen.clone();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let fetcher = move |_limit: u32, max_id: Option<String>| {
            record.lock().unwrap().push(max_id);
            let i = counter.fetch_add(1, Ordering::SeqCst);
            async move {
                if i == 0 {
                    Ok(vec![group("follow", "2025-01-10T08:00:00Z", 1, "77")])
                } else {
                    Ok(Vec::new())
                }
            }
        };

        fetch_daily_metrics(7, at(2025, 1, 10), fetcher, |_| {})
            .await
            .unwrap();

        let cursors = seen.lock().unwrap().clone();
        assert_eq!(cursors, vec![None, Some("77".to_string())]);
    }
}
