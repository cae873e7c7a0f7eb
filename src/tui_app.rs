use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use std::fs;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tui_input::{backend::crossterm::EventHandler, Input};

use crate::api_client::DictionaryClient;
use crate::auth_client::{AuthClient, Credentials, User};
use crate::config::Config;
use crate::dictionary::{DictionaryEntry, Sense};
use crate::history::SearchHistory;
use crate::search_cache::SearchCache;
use crate::search_session::SearchSession;
use crate::text_formatter::TextFormatter;

const HISTORY_EXPORT_FILE: &str = "search-history.json";

#[derive(Clone, Copy, PartialEq)]
enum AppMode {
    Search,
    Results,
    History,
    Login,
}

pub struct TuiApp {
    session: SearchSession,
    auth: AuthClient,
    user: Option<User>,
    formatter: TextFormatter,
    input: Input,
    login_input: Input,
    /// Set once the email step of the sign-in prompt is done.
    login_email: Option<String>,
    mode: AppMode,
    results_scroll: u16,
    history_state: ListState,
    show_help: bool,
    status_message: String,
    config: Config,
}

impl TuiApp {
    pub fn new(config: &Config, initial_term: Option<&str>) -> Self {
        let client = Arc::new(DictionaryClient::new(&config.api.base_url));
        let cache = SearchCache::new(config.cache.max_entries, config.cache_expiration());
        let history = SearchHistory::with_file(config.history_file(), config.history.max_entries);
        let mut session =
            SearchSession::new(client, cache, history, &config.api.share_base_url);
        session.mount(initial_term);

        let input = Input::from(session.state().query.clone());
        Self {
            session,
            auth: AuthClient::new(&config.api.base_url),
            user: None,
            formatter: TextFormatter::new(),
            input,
            login_input: Input::default(),
            login_email: None,
            mode: AppMode::Search,
            results_scroll: 0,
            history_state: ListState::default(),
            show_help: false,
            status_message: "Type a word and press Enter to look it up".to_string(),
            config: config.clone(),
        }
    }

    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            self.session.poll();
            terminal.draw(|f| self.ui(f))?;

            if !event::poll(Duration::from_millis(50))? {
                continue;
            }
            if let Event::Key(key) = event::read()? {
                if self.handle_global_key(&key) {
                    break;
                }
            }
        }
        Ok(())
    }

    /// Returns true when the app should exit.
    fn handle_global_key(&mut self, key: &KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => return true,
                KeyCode::Char('h') => {
                    self.mode = AppMode::History;
                    self.select_first_history_item();
                    return false;
                }
                KeyCode::Char('o') => {
                    self.start_sign_in();
                    return false;
                }
                KeyCode::Char('u') => {
                    self.fetch_current_user();
                    return false;
                }
                KeyCode::Char('l') => {
                    self.logout();
                    return false;
                }
                _ => {}
            }
        }
        if key.code == KeyCode::F(1) {
            self.show_help = !self.show_help;
            return false;
        }
        if self.show_help {
            if key.code == KeyCode::Esc {
                self.show_help = false;
            }
            return false;
        }
        match self.mode {
            AppMode::Search => self.handle_search_key(key),
            AppMode::Results => {
                self.handle_results_key(key);
                false
            }
            AppMode::History => {
                self.handle_history_key(key);
                false
            }
            AppMode::Login => {
                self.handle_login_key(key);
                false
            }
        }
    }

    fn handle_search_key(&mut self, key: &KeyEvent) -> bool {
        let has_suggestions = !self.session.state().suggestions.is_empty();
        match key.code {
            KeyCode::Esc => {
                if has_suggestions {
                    self.session.handle_key(KeyCode::Esc);
                } else if !self.session.state().displayed_query.is_empty() {
                    self.session.reset_search();
                    self.input.reset();
                    self.results_scroll = 0;
                    self.status_message =
                        "Type a word and press Enter to look it up".to_string();
                } else {
                    return true;
                }
            }
            KeyCode::Enter => {
                self.session.handle_key(KeyCode::Enter);
                self.after_submit();
            }
            KeyCode::Up | KeyCode::Down if has_suggestions => {
                self.session.handle_key(key.code);
            }
            KeyCode::Down => {
                if !self.session.state().results.is_empty() {
                    self.mode = AppMode::Results;
                }
            }
            KeyCode::Tab if has_suggestions => {
                let state = self.session.state();
                let index = state.selected_suggestion.unwrap_or(0);
                let term = state.suggestions[index].clone();
                self.input = Input::from(term.clone());
                self.session.set_query(&term);
            }
            _ => {
                self.input.handle_event(&Event::Key(*key));
                let value = self.input.value().to_string();
                self.session.set_query(&value);
            }
        }
        false
    }

    fn after_submit(&mut self) {
        let state = self.session.state();
        if !state.displayed_query.is_empty() && state.displayed_query != self.input.value() {
            self.input = Input::from(state.displayed_query.clone());
        }
        self.results_scroll = 0;
        if state.is_searching {
            self.status_message = format!("Searching for '{}'...", state.displayed_query);
        }
    }

    fn handle_results_key(&mut self, key: &KeyEvent) {
        match key.code {
            KeyCode::Esc => self.mode = AppMode::Search,
            KeyCode::Up => self.results_scroll = self.results_scroll.saturating_sub(1),
            KeyCode::Down => self.results_scroll = self.results_scroll.saturating_add(1),
            KeyCode::PageUp => self.results_scroll = self.results_scroll.saturating_sub(10),
            KeyCode::PageDown => self.results_scroll = self.results_scroll.saturating_add(10),
            KeyCode::Home => self.results_scroll = 0,
            _ => {}
        }
    }

    fn handle_history_key(&mut self, key: &KeyEvent) {
        let len = self.session.state().history.len();
        match key.code {
            KeyCode::Esc => self.mode = AppMode::Search,
            KeyCode::Up if len > 0 => {
                let current = self.history_state.selected().unwrap_or(0);
                self.history_state
                    .select(Some(if current > 0 { current - 1 } else { len - 1 }));
            }
            KeyCode::Down if len > 0 => {
                let current = self.history_state.selected().unwrap_or(0);
                self.history_state
                    .select(Some(if current + 1 < len { current + 1 } else { 0 }));
            }
            KeyCode::Enter => {
                if let Some(term) = self.selected_history_term() {
                    self.mode = AppMode::Search;
                    self.input = Input::from(term.clone());
                    self.session.search(&term);
                    self.after_submit();
                }
            }
            KeyCode::Delete | KeyCode::Char('d') => {
                if let Some(term) = self.selected_history_term() {
                    self.session.remove_history_item(&term);
                    self.select_first_history_item();
                    self.status_message = format!("Removed '{}' from history", term);
                }
            }
            KeyCode::Char('c') => {
                self.session.clear_history();
                self.history_state.select(None);
                self.status_message = "Search history cleared".to_string();
            }
            KeyCode::Char('e') => {
                let payload = self.session.export_history();
                self.status_message = match fs::write(HISTORY_EXPORT_FILE, payload) {
                    Ok(()) => format!("History exported to {}", HISTORY_EXPORT_FILE),
                    Err(e) => format!("Export failed: {}", e),
                };
            }
            KeyCode::Char('i') => {
                self.status_message = match fs::read_to_string(HISTORY_EXPORT_FILE) {
                    Ok(payload) => {
                        self.session.import_history(&payload);
                        self.select_first_history_item();
                        format!("History imported from {}", HISTORY_EXPORT_FILE)
                    }
                    Err(e) => format!("Import failed: {}", e),
                };
            }
            _ => {}
        }
    }

    fn selected_history_term(&self) -> Option<String> {
        let index = self.history_state.selected()?;
        self.session
            .state()
            .history
            .get(index)
            .map(|item| item.term.clone())
    }

    fn select_first_history_item(&mut self) {
        if self.session.state().history.is_empty() {
            self.history_state.select(None);
        } else {
            self.history_state.select(Some(0));
        }
    }

    fn start_sign_in(&mut self) {
        self.mode = AppMode::Login;
        self.login_input.reset();
        self.login_email = None;
        self.status_message = "Sign in: type your email and press Enter".to_string();
    }

    /// Two-step prompt: Enter commits the email, a second Enter submits the
    /// password. Esc cancels at either step.
    fn handle_login_key(&mut self, key: &KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.login_input.reset();
                self.login_email = None;
                self.mode = AppMode::Search;
                self.status_message = "Sign-in cancelled".to_string();
            }
            KeyCode::Enter => {
                let value = self.login_input.value().trim().to_string();
                if value.is_empty() {
                    return;
                }
                match self.login_email.take() {
                    None => {
                        self.login_email = Some(value);
                        self.login_input.reset();
                        self.status_message = "Sign in: type your password and press Enter".to_string();
                    }
                    Some(email) => {
                        self.login_input.reset();
                        self.mode = AppMode::Search;
                        self.sign_in(email, value);
                    }
                }
            }
            _ => {
                self.login_input.handle_event(&Event::Key(*key));
            }
        }
    }

    fn sign_in(&mut self, email: String, password: String) {
        match self.auth.login(&Credentials { email, password }) {
            Ok(user) => {
                self.status_message = format!("Signed in as {}", user.email);
                self.user = Some(user);
            }
            Err(e) => {
                self.user = None;
                self.status_message = format!("Sign-in failed: {}", e);
            }
        }
    }

    fn fetch_current_user(&mut self) {
        match self.auth.current_user() {
            Ok(user) => {
                self.status_message = format!("Signed in as {}", user.email);
                self.user = Some(user);
            }
            Err(e) => {
                self.user = None;
                self.status_message = format!("Not signed in: {}", e);
            }
        }
    }

    fn logout(&mut self) {
        match self.auth.logout() {
            Ok(()) => {
                self.user = None;
                self.status_message = "Signed out".to_string();
            }
            Err(e) => self.status_message = format!("Logout failed: {}", e),
        }
    }

    fn ui(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Search input
                Constraint::Min(5),    // Results / history area
                Constraint::Length(1), // Status bar
            ])
            .split(f.area());

        self.render_input(f, chunks[0]);

        match self.mode {
            AppMode::History => self.render_history(f, chunks[1]),
            _ => self.render_body(f, chunks[1]),
        }

        self.render_status_bar(f, chunks[2]);

        if self.mode == AppMode::Search && !self.session.state().suggestions.is_empty() {
            self.render_suggestions(f, chunks[0]);
        }
        if self.mode == AppMode::Login {
            self.render_login(f);
        }
        if self.show_help {
            self.render_help_popup(f);
        }
    }

    fn render_input(&self, f: &mut Frame, area: Rect) {
        let input_style = if self.mode == AppMode::Search {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::Gray)
        };
        let input_paragraph = Paragraph::new(self.input.value())
            .block(Block::default().borders(Borders::ALL).title("Search"))
            .style(input_style);
        f.render_widget(input_paragraph, area);

        if self.mode == AppMode::Search {
            f.set_cursor_position((input_cursor_x(area, self.input.visual_cursor()), area.y + 1));
        }
    }

    fn render_suggestions(&self, f: &mut Frame, input_area: Rect) {
        let state = self.session.state();
        let height = state.suggestions.len() as u16 + 2;
        let area = Rect {
            x: input_area.x + 1,
            y: input_area.y + input_area.height,
            width: input_area.width.saturating_sub(2).min(40),
            height,
        }
        .intersection(f.area());
        if area.height == 0 {
            return;
        }
        f.render_widget(Clear, area);

        let lines: Vec<Line> = state
            .suggestions
            .iter()
            .enumerate()
            .map(|(index, term)| {
                let style = if state.selected_suggestion == Some(index) {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                Line::from(Span::styled(term.clone(), style))
            })
            .collect();
        let popup = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Suggestions"));
        f.render_widget(popup, area);
    }

    fn render_login(&self, f: &mut Frame) {
        let area = centered_rect(50, 20, f.area());
        f.render_widget(Clear, area);

        let (title, shown) = match &self.login_email {
            None => ("Sign in: email", self.login_input.value().to_string()),
            // The password is never echoed.
            Some(_) => (
                "Sign in: password",
                "*".repeat(self.login_input.value().chars().count()),
            ),
        };
        let prompt = Paragraph::new(shown)
            .block(Block::default().borders(Borders::ALL).title(title))
            .style(Style::default().fg(Color::Yellow));
        f.render_widget(prompt, area);
        f.set_cursor_position((
            input_cursor_x(area, self.login_input.visual_cursor()),
            area.y + 1,
        ));
    }

    fn render_body(&self, f: &mut Frame, area: Rect) {
        let state = self.session.state();

        if let Some(error) = &state.error {
            let message = Paragraph::new(error.as_str())
                .style(Style::default().fg(Color::Red))
                .block(Block::default().borders(Borders::ALL).title("Error"))
                .wrap(Wrap { trim: true });
            f.render_widget(message, area);
            return;
        }

        if state.displayed_query.is_empty() {
            self.render_home(f, area);
            return;
        }

        if state.is_searching && state.results.is_empty() {
            let searching = Paragraph::new(format!("Searching for '{}'...", state.displayed_query))
                .block(Block::default().borders(Borders::ALL).title("Results"));
            f.render_widget(searching, area);
            return;
        }

        if state.results.is_empty() {
            let empty = Paragraph::new(format!("No entries found for '{}'", state.displayed_query))
                .block(Block::default().borders(Borders::ALL).title("Results"));
            f.render_widget(empty, area);
            return;
        }

        let mut lines: Vec<Line> = Vec::new();
        for entry in &state.results {
            self.push_entry_lines(&mut lines, entry);
            lines.push(Line::from(""));
        }

        let title = format!(
            "Results for '{}' ({} entries)",
            state.displayed_query,
            state.results.len()
        );
        let results = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: false })
            .scroll((self.results_scroll, 0));
        f.render_widget(results, area);
    }

    fn render_home(&self, f: &mut Frame, area: Rect) {
        let mut lines = vec![
            Line::from("Look up a word to see its definitions, examples, and etymology."),
            Line::from(""),
        ];
        if !self.config.display.recommended_words.is_empty() {
            lines.push(Line::from("Try one of these:"));
            lines.push(Line::from(Span::styled(
                format!("  {}", self.config.display.recommended_words.join("  ")),
                Style::default().fg(Color::Cyan),
            )));
            lines.push(Line::from(""));
        }
        lines.push(Line::from("Ctrl+H history | F1 help | Esc quit"));
        let home = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("dict-cli"))
            .wrap(Wrap { trim: true });
        f.render_widget(home, area);
    }

    fn push_entry_lines(&self, lines: &mut Vec<Line<'static>>, entry: &DictionaryEntry) {
        let mut heading = vec![Span::styled(
            entry.headword_info.headword.clone(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )];
        if let Some(number) = entry.homograph_number {
            heading.push(Span::styled(
                format!(" ({})", number),
                Style::default().fg(Color::Gray),
            ));
        }
        heading.push(Span::styled(
            format!("  {}", entry.part_of_speech),
            Style::default().add_modifier(Modifier::ITALIC),
        ));
        lines.push(Line::from(heading));

        if self.config.display.show_pronunciations {
            let pronunciations: Vec<String> = entry
                .headword_info
                .pronunciations
                .iter()
                .filter(|p| !p.mw.is_empty())
                .map(|p| format!("\\{}\\", p.mw))
                .collect();
            if !pronunciations.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("  {}", pronunciations.join(", ")),
                    Style::default().fg(Color::Gray),
                )));
            }
        }

        for section in &entry.definition_sections {
            for sequence in &section.sense_sequences {
                for sense in sequence {
                    self.push_sense_lines(lines, sense);
                }
            }
        }

        for idiom in &entry.idioms {
            lines.push(Line::from(Span::styled(
                format!("  {}", self.formatter.plain(&idiom.phrase)),
                Style::default().add_modifier(Modifier::BOLD | Modifier::ITALIC),
            )));
            for definition in &idiom.definitions {
                let mut line = self.formatter.styled(&definition.text);
                line.spans.insert(0, Span::raw("    "));
                lines.push(line);
            }
        }

        if !entry.etymology.is_empty() {
            lines.push(Line::from(Span::styled(
                "  Etymology",
                Style::default().fg(Color::Magenta),
            )));
            for note in &entry.etymology {
                let mut line = self.formatter.styled(note);
                line.spans.insert(0, Span::raw("    "));
                lines.push(line);
            }
        }

        if let Some(date) = &entry.first_use_date {
            lines.push(Line::from(Span::styled(
                format!("  First known use: {}", date),
                Style::default().fg(Color::Gray),
            )));
        }
    }

    fn push_sense_lines(&self, lines: &mut Vec<Line<'static>>, sense: &Sense) {
        let number = if sense.sense_number.is_empty() {
            "-".to_string()
        } else {
            sense.sense_number.clone()
        };
        if let Some(defining_text) = &sense.defining_text {
            for text in &defining_text.text {
                let mut line = self.formatter.styled(text);
                line.spans.insert(0, Span::raw(format!("  {} ", number)));
                lines.push(line);
            }
            if self.config.display.show_examples {
                for illustration in &defining_text.verbal_illustrations {
                    lines.push(Line::from(Span::styled(
                        format!("      \u{201c}{}\u{201d}", self.formatter.plain(&illustration.text)),
                        Style::default()
                            .fg(Color::Green)
                            .add_modifier(Modifier::ITALIC),
                    )));
                }
            }
            for note in &defining_text.usage_notes {
                let mut line = self.formatter.styled(&note.text);
                line.spans
                    .insert(0, Span::styled("      note: ", Style::default().fg(Color::Gray)));
                lines.push(line);
            }
        }
        if let Some(divided) = &sense.divided_sense {
            if let Some(defining_text) = &divided.defining_text {
                let divider = divided.sense_divider.clone().unwrap_or_default();
                for text in &defining_text.text {
                    let mut line = self.formatter.styled(text);
                    line.spans
                        .insert(0, Span::raw(format!("      {} ", divider)));
                    lines.push(line);
                }
            }
        }
    }

    fn render_history(&mut self, f: &mut Frame, area: Rect) {
        let state = self.session.state();
        if state.history.is_empty() {
            let empty = Paragraph::new("No search history yet")
                .block(Block::default().borders(Borders::ALL).title("History"));
            f.render_widget(empty, area);
            return;
        }

        let items: Vec<ListItem> = state
            .history
            .iter()
            .map(|item| {
                let when = chrono::DateTime::from_timestamp_millis(item.timestamp)
                    .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default();
                ListItem::new(Line::from(vec![
                    Span::raw(item.term.clone()),
                    Span::styled(
                        format!("  x{}  {}", item.count, when),
                        Style::default().fg(Color::Gray),
                    ),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(
                "History - Enter search, d remove, c clear, e export, i import",
            ))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol(">> ");
        f.render_stateful_widget(list, area, &mut self.history_state);
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let state = self.session.state();
        let mut spans = vec![
            Span::styled(
                match self.mode {
                    AppMode::Search => "SEARCH",
                    AppMode::Results => "VIEW",
                    AppMode::History => "HISTORY",
                    AppMode::Login => "SIGN IN",
                },
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" | "),
        ];
        if state.is_searching {
            spans.push(Span::styled(
                "searching... ",
                Style::default().fg(Color::Yellow),
            ));
        }
        spans.push(Span::raw(self.status_message.clone()));
        if let Some(user) = &self.user {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(
                user.email.clone(),
                Style::default().fg(Color::Green),
            ));
        }
        if let Some(url) = self.session.share_url() {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(url, Style::default().fg(Color::Gray)));
        }
        let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
        f.render_widget(status, area);
    }

    fn render_help_popup(&self, f: &mut Frame) {
        let area = centered_rect(70, 60, f.area());
        f.render_widget(Clear, area);

        let help_text = vec![
            Line::from(Span::styled(
                "dict-cli Help",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("Search:"),
            Line::from("  Enter       - Look up the typed word (or selected suggestion)"),
            Line::from("  Up/Down     - Cycle through suggestions"),
            Line::from("  Tab         - Accept a suggestion into the input"),
            Line::from("  Esc         - Dismiss suggestions / clear search / quit"),
            Line::from(""),
            Line::from("Results:"),
            Line::from("  Up/Down     - Scroll"),
            Line::from("  PgUp/PgDn   - Scroll faster"),
            Line::from("  Esc         - Back to search"),
            Line::from(""),
            Line::from("History (Ctrl+H):"),
            Line::from("  Enter       - Search the selected term"),
            Line::from("  d / Delete  - Remove the selected term"),
            Line::from("  c           - Clear history"),
            Line::from("  e / i       - Export / import history JSON"),
            Line::from(""),
            Line::from("Account:"),
            Line::from("  Ctrl+O      - Sign in"),
            Line::from("  Ctrl+U      - Show signed-in user"),
            Line::from("  Ctrl+L      - Sign out"),
        ];
        let help = Paragraph::new(help_text)
            .block(Block::default().borders(Borders::ALL).title("Help"))
            .wrap(Wrap { trim: true });
        f.render_widget(help, area);
    }
}

/// Cursor column for the search box, clamped inside the right border so a
/// query longer than the box cannot place the cursor outside the widget.
fn input_cursor_x(area: Rect, visual_cursor: usize) -> u16 {
    let offset = u16::try_from(visual_cursor.saturating_add(1)).unwrap_or(u16::MAX);
    area.x.saturating_add(offset.min(area.width.saturating_sub(2)))
}

/// Helper to create a centered rect for popups.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_cursor_stays_inside_the_box() {
        let area = Rect {
            x: 0,
            y: 0,
            width: 20,
            height: 3,
        };
        assert_eq!(input_cursor_x(area, 0), 1);
        assert_eq!(input_cursor_x(area, 5), 6);
        // Long queries pin the cursor at the right border.
        assert_eq!(input_cursor_x(area, 40), 18);
        assert_eq!(input_cursor_x(area, usize::MAX), 18);

        // Degenerate widths must not underflow.
        let tiny = Rect {
            x: 3,
            y: 0,
            width: 1,
            height: 3,
        };
        assert_eq!(input_cursor_x(tiny, 10), 3);
    }
}

pub fn run_tui_app(config: &Config, initial_term: Option<&str>) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = TuiApp::new(config, initial_term);
    let res = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}
