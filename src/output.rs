//! One-shot textual report output and shared text helpers
//!
//! Backs the non-interactive subcommands (`timeline`, `posts`,
//! `notifications`, `metrics`); the TUI has its own renderers.

use crate::metrics::{DailyMetric, format_total};
use crate::models::{GroupedNotification, Post};

const REPORT_WIDTH: usize = 80;

/// Strip HTML tags and entities from server-rendered content.
pub fn strip_html(input: &str) -> String {
    let text = input
        .replace("<br>", "\n")
        .replace("<br/>", "\n")
        .replace("<br />", "\n")
        .replace("</p><p>", "\n\n");

    let text = regex_lite::Regex::new(r"<[^>]+>")
        .map(|re| re.replace_all(&text, "").to_string())
        .unwrap_or(text);

    html_escape::decode_html_entities(&text).trim().to_string()
}

/// Wrap text to `width` columns.
pub fn wrap_text(text: &str, width: usize) -> String {
    textwrap::fill(text, width.max(1))
}

/// Print posts as a plain-text report.
pub fn print_posts(posts: &[Post]) {
    if posts.is_empty() {
        println!("No posts returned.");
        return;
    }

    for post in posts {
        println!("----");
        println!("Author: {}", post.account.label());
        println!("Time:   {}", post.created_at.format("%Y-%m-%d %H:%M"));
        if let Some(booster) = &post.boosted_by {
            println!("Boost:  @{booster}");
        }
        println!("Text:");
        let body = wrap_text(&post.content, REPORT_WIDTH);
        if body.is_empty() {
            println!("(no text)");
        } else {
            println!("{body}");
        }
        println!();
    }
}

/// Print grouped notifications as a plain-text report.
pub fn print_notifications(groups: &[GroupedNotification]) {
    if groups.is_empty() {
        println!("No notifications returned.");
        return;
    }

    for group in groups {
        println!("----");
        println!("Type:  {} ({})", group.kind_label(), group.count);
        println!("From:  {}", group.actors_label());
        println!(
            "Time:  {}",
            if group.latest_at.is_empty() {
                "Unknown"
            } else {
                &group.latest_at
            }
        );
        if let Some(status) = &group.status {
            println!("Text:");
            let body = wrap_text(&status.content, REPORT_WIDTH);
            if body.is_empty() {
                println!("(no text)");
            } else {
                println!("{body}");
            }
        }
        println!();
    }
}

/// Print the day-bucketed metrics series with a totals line.
pub fn print_daily_metrics(series: &[DailyMetric]) {
    if series.is_empty() {
        println!("No metrics returned.");
        return;
    }

    for day in series {
        println!(
            "{:<6}  F:{}  L:{}  B:{}",
            day.label, day.follows, day.likes, day.boosts
        );
    }
    println!("{}", format_total(series));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_html_removes_tags_and_entities() {
        assert_eq!(
            strip_html("<p>hello <b>world</b> &amp; more</p>"),
            "hello world & more"
        );
    }

    #[test]
    fn strip_html_keeps_paragraph_breaks() {
        assert_eq!(strip_html("<p>one</p><p>two</p>"), "one\n\ntwo");
    }

    #[test]
    fn strip_html_converts_line_breaks() {
        assert_eq!(strip_html("a<br>b<br />c"), "a\nb\nc");
    }

    #[test]
    fn wrap_text_respects_width() {
        let wrapped = wrap_text("one two three four five", 9);
        for line in wrapped.lines() {
            assert!(line.len() <= 9);
        }
    }
}
