//! UI rendering for the TUI

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph, Tabs, Wrap},
};

use super::chart;
use super::state::{AppState, FeedState, LoadStatus, Tab};
use crate::models::Post;
use crate::output::wrap_text;
use crate::theme::ThemeColors;

/// Roost icon
const ICON: &str = "🪺";

/// Main render function
pub fn render(frame: &mut Frame, state: &AppState) {
    let colors = state.theme.colors();

    let area = frame.area();
    let bg_block = Block::default().style(Style::default().bg(colors.bg));
    frame.render_widget(bg_block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_tabs(frame, state, &colors, chunks[0]);
    match state.tab {
        Tab::Timeline => render_timeline_view(frame, state, &colors, chunks[1]),
        Tab::Search => render_search_view(frame, state, &colors, chunks[1]),
        Tab::Profile => render_profile_view(frame, state, &colors, chunks[1]),
        Tab::Metrics => render_metrics_view(frame, state, &colors, chunks[1]),
        Tab::Notifications => render_notifications_view(frame, state, &colors, chunks[1]),
    }
    render_status_bar(frame, state, &colors, chunks[2]);
}

fn render_tabs(frame: &mut Frame, state: &AppState, colors: &ThemeColors, area: Rect) {
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .map(|tab| {
            let marker = if *tab == state.tab { "●" } else { "○" };
            Line::from(format!("{marker} {}", tab.title()))
        })
        .collect();

    let selected = Tab::ALL.iter().position(|t| *t == state.tab).unwrap_or(0);

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(colors.block())
                .title(format!(" {ICON} Roost "))
                .title_style(colors.text_primary()),
        )
        .select(selected)
        .style(colors.tab())
        .highlight_style(colors.tab_active())
        .divider(Span::styled(" │ ", colors.text_muted()));

    frame.render_widget(tabs, area);
}

fn render_timeline_view(frame: &mut Frame, state: &AppState, colors: &ThemeColors, area: Rect) {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let feed = state.active_timeline();
    let title = format!(" 📰 Timeline · {} ", state.timeline_mode.name());
    render_post_list(frame, horizontal[0], &title, feed, colors);
    render_post_detail(frame, horizontal[1], feed.selected_item(), colors);
}

fn render_search_view(frame: &mut Frame, state: &AppState, colors: &ThemeColors, area: Rect) {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let input = Paragraph::new(Line::from(vec![
        Span::styled("/", colors.key_hint()),
        Span::styled(state.search.query.clone(), colors.text()),
        Span::styled(if state.search_input { "█" } else { "" }, colors.text()),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if state.search_input {
                colors.block_focus()
            } else {
                colors.block()
            })
            .title(" 🔍 Search home timeline ")
            .title_style(colors.text_primary()),
    );
    frame.render_widget(input, vertical[0]);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(vertical[1]);

    let results = state.search_results();
    let items: Vec<ListItem> = if results.is_empty() {
        vec![ListItem::new(Line::from(Span::styled(
            if state.search.query.is_empty() {
                "  Type to filter the home timeline"
            } else {
                "  No matching posts"
            },
            colors.text_muted(),
        )))]
    } else {
        results
            .iter()
            .map(|post| post_list_item(post, horizontal[0].width, colors))
            .collect()
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(colors.block())
                .title(format!(" Results ({}) ", results.len()))
                .title_style(colors.text_primary()),
        )
        .highlight_style(colors.selected());

    let mut list_state = ListState::default();
    if !results.is_empty() {
        list_state.select(Some(state.search.selected.min(results.len() - 1)));
    }
    frame.render_stateful_widget(list, horizontal[0], &mut list_state);

    let selected = results.get(state.search.selected).copied();
    render_post_detail(frame, horizontal[1], selected, colors);
}

fn render_profile_view(frame: &mut Frame, state: &AppState, colors: &ThemeColors, area: Rect) {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let title = match &state.profile_account {
        Some(account) => format!(" 👤 {} ", account.label()),
        None => " 👤 Profile ".to_string(),
    };
    render_post_list(frame, horizontal[0], &title, &state.profile, colors);
    render_post_detail(frame, horizontal[1], state.profile.selected_item(), colors);
}

fn render_notifications_view(
    frame: &mut Frame,
    state: &AppState,
    colors: &ThemeColors,
    area: Rect,
) {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let feed = &state.notifications;
    let items: Vec<ListItem> = if feed.status == LoadStatus::Loading && feed.items.is_empty() {
        vec![ListItem::new(Line::from(Span::styled(
            "  ⏳ Loading...",
            colors.text_muted(),
        )))]
    } else if feed.items.is_empty() {
        vec![ListItem::new(Line::from(Span::styled(
            "  No notifications yet",
            colors.text_muted(),
        )))]
    } else {
        feed.items
            .iter()
            .map(|group| {
                let mut lines = vec![Line::from(vec![
                    Span::styled(
                        format!(" {} ({})", group.kind_label(), group.count),
                        colors.text_primary(),
                    ),
                    Span::styled(format!("  {}", group.actors_label()), colors.text_muted()),
                ])];
                if let Some(status) = &group.status {
                    let preview: String = status.content.chars().take(60).collect();
                    lines.push(Line::from(Span::styled(
                        format!("   {preview}"),
                        colors.text_dim(),
                    )));
                }
                lines.push(Line::from(""));
                ListItem::new(lines)
            })
            .collect()
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(colors.block())
                .title(" 🔔 Notifications ")
                .title_style(colors.text_primary()),
        )
        .highlight_style(colors.selected());

    let mut list_state = ListState::default();
    if !feed.items.is_empty() {
        list_state.select(Some(feed.selected));
    }
    frame.render_stateful_widget(list, horizontal[0], &mut list_state);

    let status_post = feed.selected_item().and_then(|group| group.status.as_ref());
    render_post_detail(frame, horizontal[1], status_post, colors);
}

fn render_metrics_view(frame: &mut Frame, state: &AppState, colors: &ThemeColors, area: Rect) {
    let metrics = &state.metrics;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(colors.block())
        .title(format!(" 📈 Metrics · last {} days ", metrics.range_days))
        .title_style(colors.text_primary());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if metrics.status == LoadStatus::Loading {
        let message = if metrics.scanned > 0 {
            format!("  ⏳ Scanning... {} notifications", metrics.scanned)
        } else {
            "  ⏳ Scanning...".to_string()
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(message, colors.text_muted()))),
            inner,
        );
        return;
    }

    if metrics.status == LoadStatus::Error {
        let message = metrics.error.clone().unwrap_or_default();
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                format!("  ✗ {message}"),
                colors.text_error(),
            ))),
            inner,
        );
        return;
    }

    if metrics.series.is_empty() {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                "  Press [r] to scan",
                colors.text_muted(),
            ))),
            inner,
        );
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Totals, legend, sparkline
            Constraint::Min(0),    // Stacked bars
            Constraint::Length(2), // Selected-day detail
        ])
        .split(inner);

    let spark_width = chunks[0].width.saturating_sub(2) as usize;
    let header = vec![
        chart::totals_line(&metrics.series, colors),
        chart::legend_line(colors),
        Line::from(Span::styled(
            chart::sparkline(&metrics.series, spark_width),
            colors.text_secondary(),
        )),
    ];
    frame.render_widget(Paragraph::new(header), chunks[0]);

    let max_total = metrics
        .series
        .iter()
        .map(crate::metrics::DailyMetric::total)
        .max()
        .unwrap_or(0);
    // Label column plus room for the trailing total
    let bar_width = chunks[1].width.saturating_sub(14) as usize;

    // Keep the selected day on screen when the series is taller than the pane
    let visible = chunks[1].height as usize;
    let offset = metrics
        .selected
        .saturating_sub(visible.saturating_sub(1))
        .min(metrics.series.len().saturating_sub(visible.max(1)));

    let bars: Vec<Line> = metrics
        .series
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible.max(1))
        .map(|(i, day)| chart::bar_line(day, max_total, bar_width, i == metrics.selected, colors))
        .collect();
    frame.render_widget(Paragraph::new(bars), chunks[1]);

    frame.render_widget(
        Paragraph::new(chart::selection_lines(
            &metrics.series,
            metrics.selected,
            colors,
        )),
        chunks[2],
    );
}

fn render_post_list(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    feed: &FeedState<Post>,
    colors: &ThemeColors,
) {
    let items: Vec<ListItem> = if feed.status == LoadStatus::Loading && feed.items.is_empty() {
        vec![ListItem::new(Line::from(Span::styled(
            "  ⏳ Loading...",
            colors.text_muted(),
        )))]
    } else if feed.items.is_empty() {
        vec![
            ListItem::new(Line::from("")),
            ListItem::new(Line::from(vec![
                Span::styled("  Press ", colors.text_dim()),
                Span::styled("[r]", colors.key_hint()),
                Span::styled(" to refresh", colors.text_dim()),
            ])),
        ]
    } else {
        feed.items
            .iter()
            .map(|post| post_list_item(post, area.width, colors))
            .collect()
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(colors.block())
                .title(title.to_string())
                .title_style(colors.text_primary()),
        )
        .highlight_style(colors.selected());

    let mut list_state = ListState::default();
    if !feed.items.is_empty() {
        list_state.select(Some(feed.selected));
    }
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn post_list_item(post: &Post, pane_width: u16, colors: &ThemeColors) -> ListItem<'static> {
    let width = pane_width.saturating_sub(4) as usize;

    let mut lines = vec![Line::from(vec![
        Span::styled(format!(" {}", post.author_line()), colors.text_primary()),
        Span::styled(format!(" · {}", post.relative_time()), colors.text_muted()),
    ])];
    for line in wrap_text(&post.content, width.max(1)).lines().take(3) {
        lines.push(Line::from(Span::styled(
            format!("   {line}"),
            colors.text(),
        )));
    }
    lines.push(Line::from(""));
    ListItem::new(lines)
}

fn render_post_detail(
    frame: &mut Frame,
    area: Rect,
    post: Option<&Post>,
    colors: &ThemeColors,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(colors.block())
        .title(" 📝 Detail ")
        .title_style(colors.text_primary());

    let Some(post) = post else {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                "  Nothing selected",
                colors.text_muted(),
            )))
            .block(block),
            area,
        );
        return;
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", post.account.label()),
            colors.text_primary(),
        )),
        Line::from(Span::styled(
            format!("  {}", post.created_at.format("%Y-%m-%d %H:%M")),
            colors.text_muted(),
        )),
        Line::from(""),
    ];
    if let Some(booster) = &post.boosted_by {
        lines.push(Line::from(Span::styled(
            format!("  🔁 boosted by @{booster}"),
            colors.text_dim(),
        )));
        lines.push(Line::from(""));
    }
    for line in post.content.lines() {
        lines.push(Line::from(Span::styled(
            format!("  {line}"),
            colors.text(),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!(
            "  ♥ {}   🔁 {}   💬 {}",
            post.like_count, post.boost_count, post.reply_count
        ),
        colors.text_muted(),
    )));
    if let Some(url) = &post.url {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("  [o]", colors.key_hint()),
            Span::styled(format!(" {url}"), colors.text_dim()),
        ]));
    }

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn render_status_bar(frame: &mut Frame, state: &AppState, colors: &ThemeColors, area: Rect) {
    // Per-view error or notice wins over the global status message
    let (error, notice) = match state.tab {
        Tab::Timeline => {
            let feed = state.active_timeline();
            (feed.error.clone(), feed.notice.clone())
        }
        // Search filters locally; it has no fetch of its own
        Tab::Search => (None, None),
        Tab::Profile => (state.profile.error.clone(), state.profile.notice.clone()),
        Tab::Notifications => (
            state.notifications.error.clone(),
            state.notifications.notice.clone(),
        ),
        Tab::Metrics => (state.metrics.error.clone(), None),
    };

    let line = if let Some(error) = error {
        Line::from(Span::styled(format!(" ✗ {error}"), colors.text_error()))
    } else if let Some(notice) = notice {
        Line::from(Span::styled(format!(" {notice}"), colors.text_info()))
    } else if !state.status_message.is_empty() {
        Line::from(Span::styled(
            format!(" {}", state.status_message),
            colors.text_dim(),
        ))
    } else {
        Line::from(vec![
            Span::styled(" [tab]", colors.key_hint()),
            Span::styled(" views ", colors.text_dim()),
            Span::styled("[h/l/f/T]", colors.key_hint()),
            Span::styled(" timeline mode ", colors.text_dim()),
            Span::styled("[7/3]", colors.key_hint()),
            Span::styled(" metrics range ", colors.text_dim()),
            Span::styled("[r]", colors.key_hint()),
            Span::styled(" refresh ", colors.text_dim()),
            Span::styled("[q]", colors.key_hint()),
            Span::styled(" quit", colors.text_dim()),
        ])
    };

    frame.render_widget(Paragraph::new(line), area);
}
