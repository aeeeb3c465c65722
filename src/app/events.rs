//! Event handling

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::async_ops::AsyncCommand;
use super::state::{AppState, Tab, TimelineMode};

/// Handle key events, returning an optional async command
pub fn handle_key(state: &mut AppState, key: KeyEvent) -> Option<AsyncCommand> {
    // Text entry into the search box takes precedence over shortcuts
    if state.tab == Tab::Search && state.search_input {
        return handle_search_input(state, key);
    }

    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) | (_, KeyCode::Char('q')) => {
            state.should_quit = true;
            None
        }

        (_, KeyCode::Tab) => state.next_tab(),
        (_, KeyCode::BackTab) => state.prev_tab(),

        // Direct tab selection
        (_, KeyCode::Char('t')) => state.select_tab(Tab::Timeline),
        (_, KeyCode::Char('s')) => state.select_tab(Tab::Search),
        (_, KeyCode::Char('p')) => state.select_tab(Tab::Profile),
        (_, KeyCode::Char('m')) => state.select_tab(Tab::Metrics),
        (_, KeyCode::Char('n')) => state.select_tab(Tab::Notifications),

        // Timeline modes
        (_, KeyCode::Char('h')) if state.tab == Tab::Timeline => {
            state.select_timeline_mode(TimelineMode::Home)
        }
        (_, KeyCode::Char('l')) if state.tab == Tab::Timeline => {
            state.select_timeline_mode(TimelineMode::Local)
        }
        (_, KeyCode::Char('f')) if state.tab == Tab::Timeline => {
            state.select_timeline_mode(TimelineMode::Federated)
        }
        (KeyModifiers::SHIFT, KeyCode::Char('T')) if state.tab == Tab::Timeline => {
            state.select_timeline_mode(TimelineMode::Trending)
        }

        // Metrics ranges
        (_, KeyCode::Char('7')) if state.tab == Tab::Metrics => state.select_metrics_range(7),
        (_, KeyCode::Char('3')) if state.tab == Tab::Metrics => state.select_metrics_range(30),

        (_, KeyCode::Char('r')) => state.refresh(),

        (_, KeyCode::Char('/')) if state.tab == Tab::Search => {
            state.search_input = true;
            None
        }

        (_, KeyCode::Char('j') | KeyCode::Down) => {
            state.select_next();
            None
        }
        (_, KeyCode::Char('k') | KeyCode::Up) => {
            state.select_prev();
            None
        }

        // Open the selected post in a browser
        (_, KeyCode::Char('o')) => {
            if let Some(url) = selected_url(state) {
                let _ = open::that(url);
                state.set_status("Opened in browser");
            }
            None
        }

        // Cycle theme
        (_, KeyCode::Char('c')) => {
            state.next_theme();
            state.set_status(format!("Theme: {}", state.theme.name()));
            None
        }

        (_, KeyCode::Esc) => {
            state.set_status("");
            None
        }

        _ => None,
    }
}

fn handle_search_input(state: &mut AppState, key: KeyEvent) -> Option<AsyncCommand> {
    match key.code {
        KeyCode::Esc => {
            state.search_input = false;
        }
        KeyCode::Enter => {
            state.search_input = false;
            let count = state.search_results().len();
            state.set_status(format!("{count} matching posts"));
        }
        KeyCode::Char(c) => {
            state.search.query.push(c);
            state.search.selected = 0;
        }
        KeyCode::Backspace => {
            state.search.query.pop();
            state.search.selected = 0;
        }
        _ => {}
    }
    None
}

fn selected_url(state: &AppState) -> Option<String> {
    let post = match state.tab {
        Tab::Timeline => state.active_timeline().selected_item(),
        Tab::Search => {
            let results = state.search_results();
            results.get(state.search.selected).copied()
        }
        Tab::Profile => state.profile.selected_item(),
        Tab::Notifications => state
            .notifications
            .selected_item()
            .and_then(|group| group.status.as_ref()),
        Tab::Metrics => None,
    };
    post.and_then(|p| p.url.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn quit_keys_set_the_flag() {
        let mut state = AppState::new(Config::default());
        handle_key(&mut state, key(KeyCode::Char('q')));
        assert!(state.should_quit);

        let mut state = AppState::new(Config::default());
        handle_key(
            &mut state,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(state.should_quit);
    }

    #[test]
    fn range_keys_only_apply_on_the_metrics_tab() {
        let mut state = AppState::new(Config::default());
        assert!(handle_key(&mut state, key(KeyCode::Char('3'))).is_none());

        state.select_tab(Tab::Metrics);
        state.apply_result(crate::app::async_ops::AsyncResult::Metrics { series: Vec::new() });
        let cmd = handle_key(&mut state, key(KeyCode::Char('3')));
        assert!(matches!(
            cmd,
            Some(AsyncCommand::FetchMetrics { range_days: 30, .. })
        ));
    }

    #[test]
    fn search_input_captures_characters() {
        let mut state = AppState::new(Config::default());
        state.select_tab(Tab::Search);
        assert!(state.search_input);

        handle_key(&mut state, key(KeyCode::Char('r')));
        handle_key(&mut state, key(KeyCode::Char('s')));
        assert_eq!(state.search.query, "rs");

        handle_key(&mut state, key(KeyCode::Enter));
        assert!(!state.search_input);

        // Shortcuts work again after leaving input mode
        handle_key(&mut state, key(KeyCode::Char('q')));
        assert!(state.should_quit);
    }
}
