// SPDX-FileCopyrightText: 2026 Iconboard contributors
// SPDX-License-Identifier: MIT

//! Terminal UI.
//!
//! Interactive dashboard shell (ratatui + crossterm). The shell owns no
//! pipeline logic: keys become [`Action`]s, the controller drives a
//! [`TuiSurface`] and the draw pass renders whatever that surface holds.

use std::error::Error;
use std::io;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::app::{Action, Dashboard};
use crate::export::appfilter_entries;
use crate::model::{ComponentId, Tag, ViewMode};
use crate::render::{RowView, Surface};
use crate::select::HeaderCheckState;
use crate::urlstate::StateStore;

const FOOTER_KEY_COLOR: Color = Color::Cyan;
const FOOTER_LABEL_COLOR: Color = Color::Gray;
const SELECTED_COLOR: Color = Color::LightGreen;
const TAG_COLOR: Color = Color::Yellow;
const TOAST_TTL: Duration = Duration::from_secs(3);
const APPFILTER_EXPORT_FILE: &str = "appfilter-export.xml";
/// Remaining rows below the cursor before a scroll triggers the next batch.
const GROW_MARGIN: usize = 10;

/// Runs the interactive dashboard until the user quits.
///
/// When a [`StateStore`] is given, the view state is written back to it
/// after every key that changes it.
pub fn run(
    dashboard: Dashboard,
    warnings: Vec<String>,
    store: Option<Box<dyn StateStore>>,
) -> Result<(), Box<dyn Error>> {
    let mut terminal = TerminalSession::new()?;
    let mut app = App::new(dashboard, store);
    if let Some(warning) = warnings.first() {
        app.set_toast(format!("{warning} ({} warning(s) at load)", warnings.len()));
    }

    while !app.should_quit {
        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }
    }

    Ok(())
}

/// One materialized row, owned so the draw pass never touches the catalog.
#[derive(Debug, Clone)]
struct SurfaceRow {
    id: ComponentId,
    label: String,
    request_count: u64,
    tags: String,
    selected: bool,
}

/// [`Surface`] backed by an owned row buffer.
#[derive(Debug, Default)]
pub struct TuiSurface {
    rows: Vec<SurfaceRow>,
    empty: bool,
    sentinel_active: bool,
}

impl TuiSurface {
    fn len(&self) -> usize {
        self.rows.len()
    }

    fn id_at(&self, index: usize) -> Option<&ComponentId> {
        self.rows.get(index).map(|row| &row.id)
    }
}

impl Surface for TuiSurface {
    fn clear(&mut self) {
        self.rows.clear();
        self.empty = false;
    }

    fn append_batch(&mut self, rows: &[RowView<'_>]) {
        self.rows.extend(rows.iter().map(|row| SurfaceRow {
            id: row.record.component_id().clone(),
            label: row.record.label().to_owned(),
            request_count: row.record.request_count(),
            tags: row.tags.iter().map(Tag::as_str).collect::<Vec<_>>().join(","),
            selected: row.selected,
        }));
    }

    fn patch_selection(&mut self, id: &ComponentId, selected: bool) {
        for row in self.rows.iter_mut().filter(|row| &row.id == id) {
            row.selected = selected;
        }
    }

    fn show_empty_state(&mut self) {
        self.empty = true;
    }

    fn set_sentinel_active(&mut self, active: bool) {
        self.sentinel_active = active;
    }
}

#[derive(Debug, Clone)]
struct Toast {
    message: String,
    expires_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchMode {
    Inactive,
    Editing,
}

struct App {
    dashboard: Dashboard,
    surface: TuiSurface,
    list_state: ListState,
    cursor: usize,
    search_mode: SearchMode,
    toast: Option<Toast>,
    store: Option<Box<dyn StateStore>>,
    persisted: Vec<(String, String)>,
    should_quit: bool,
}

impl App {
    fn new(dashboard: Dashboard, store: Option<Box<dyn StateStore>>) -> Self {
        let mut app = Self {
            dashboard,
            surface: TuiSurface::default(),
            list_state: ListState::default(),
            cursor: 0,
            search_mode: SearchMode::Inactive,
            toast: None,
            store,
            persisted: Vec::new(),
            should_quit: false,
        };
        app.dashboard.refresh(&mut app.surface);
        app.persisted = app.dashboard.encode_url_state();
        app
    }

    fn set_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast { message: message.into(), expires_at: Instant::now() + TOAST_TTL });
    }

    fn dispatch(&mut self, action: Action) {
        self.dashboard.dispatch(action, &mut self.surface);
        self.cursor = self.cursor.min(self.surface.len().saturating_sub(1));
        self.persist_view_state();
    }

    /// Writes the encoded view state to the store when it changed since the
    /// last write. Selection and scroll events leave the encoding as-is, so
    /// they never hit the store.
    fn persist_view_state(&mut self) {
        let Some(store) = self.store.as_mut() else { return };
        let pairs = self.dashboard.encode_url_state();
        if pairs != self.persisted {
            store.replace(&pairs);
            self.persisted = pairs;
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.search_mode == SearchMode::Editing {
            self.handle_search_key(key.code);
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('/') => self.search_mode = SearchMode::Editing,
            KeyCode::Char('r') => self.dispatch(Action::ToggleRegex),
            KeyCode::Char('s') => {
                let next = self.dashboard.view().sort.next();
                self.dispatch(Action::SetSort(next));
                let label = self.dashboard.view().sort.label();
                self.set_toast(format!("Sort: {label}"));
            }
            KeyCode::Char('g') => {
                let toggled = self.dashboard.view().view.toggled();
                self.dispatch(Action::SetView(toggled));
            }
            KeyCode::Char(c @ '1'..='5') => {
                let index = c as usize - '1' as usize;
                self.dispatch(Action::ToggleFilter(Tag::ALL[index]));
            }
            KeyCode::Char(' ') => self.toggle_at_cursor(false),
            KeyCode::Char('v') => self.toggle_at_cursor(true),
            KeyCode::Char('a') => self.dispatch(Action::SelectAllVisible),
            KeyCode::Char('c') => self.dispatch(Action::ClearVisibleSelection),
            KeyCode::Char('y') => self.export_selection(),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1),
            KeyCode::PageDown => self.move_cursor(20),
            KeyCode::PageUp => self.move_cursor(-20),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => {
                // Force the remaining batches in before jumping to the end.
                while self.surface.sentinel_active {
                    self.dispatch(Action::Scroll);
                }
                self.cursor = self.surface.len().saturating_sub(1);
            }
            _ => {}
        }
    }

    fn handle_search_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc | KeyCode::Enter => self.search_mode = SearchMode::Inactive,
            KeyCode::Backspace => {
                let mut search = self.dashboard.view().search.clone();
                search.pop();
                self.dispatch(Action::SetSearch(search));
            }
            KeyCode::Char(c) => {
                let mut search = self.dashboard.view().search.clone();
                search.push(c);
                self.dispatch(Action::SetSearch(search));
            }
            _ => {}
        }
    }

    fn move_cursor(&mut self, delta: i32) {
        let len = self.surface.len();
        if len == 0 {
            self.cursor = 0;
            return;
        }
        self.cursor = if delta < 0 {
            self.cursor.saturating_sub((-delta) as usize)
        } else {
            (self.cursor + delta as usize).min(len - 1)
        };

        if self.surface.sentinel_active && self.cursor + GROW_MARGIN >= len {
            self.dispatch(Action::Scroll);
        }
    }

    fn toggle_at_cursor(&mut self, range: bool) {
        if let Some(id) = self.surface.id_at(self.cursor).cloned() {
            self.dispatch(Action::ToggleSelection { id, range });
        }
    }

    fn export_selection(&mut self) {
        if self.dashboard.selection().is_empty() {
            self.set_toast("Nothing selected");
            return;
        }
        let records: Vec<_> = self
            .dashboard
            .selection()
            .ids()
            .filter_map(|id| self.dashboard.catalog().get(id))
            .collect();
        let count = records.len();
        let body = appfilter_entries(records);
        match std::fs::write(APPFILTER_EXPORT_FILE, body) {
            Ok(()) => {
                self.set_toast(format!("Wrote {count} entries to {APPFILTER_EXPORT_FILE}"));
            }
            Err(err) => self.set_toast(format!("Export failed: {err}")),
        }
    }
}

fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let area = frame.area();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    frame.render_widget(header_paragraph(app), layout[0]);
    draw_rows(frame, app, layout[1]);
    frame.render_widget(Paragraph::new(footer_line(app)), layout[2]);

    if app.search_mode == SearchMode::Editing {
        let query_len = app.dashboard.view().search.chars().count() as u16;
        let x = layout[0].x.saturating_add(8).saturating_add(query_len);
        frame.set_cursor_position((x.min(layout[0].right().saturating_sub(1)), layout[0].y + 1));
    }
}

fn header_paragraph(app: &App) -> Paragraph<'static> {
    let view = app.dashboard.view();
    let checkbox = match app.dashboard.header_state() {
        HeaderCheckState::Unchecked => "[ ]",
        HeaderCheckState::Checked => "[x]",
        HeaderCheckState::Indeterminate => "[-]",
    };
    let filters = if view.active_filters.is_empty() {
        "none".to_owned()
    } else {
        view.active_filters.iter().map(Tag::as_str).collect::<Vec<_>>().join(",")
    };
    let status = format!(
        "{checkbox} {} shown ({} loaded) | {} selected | sort: {} | filters: {} | {}{}",
        app.dashboard.result().len(),
        app.surface.len(),
        app.dashboard.selection().count(),
        view.sort.label(),
        filters,
        view.view.as_str(),
        if view.regex_mode { " | regex" } else { "" },
    );
    let search_prefix = if app.search_mode == SearchMode::Editing { "search> " } else { "search: " };
    let lines = vec![
        Line::raw(status),
        Line::raw(format!("{search_prefix}{}", view.search)),
    ];
    Paragraph::new(lines)
}

fn draw_rows(frame: &mut Frame<'_>, app: &mut App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Requests");
    if app.surface.empty {
        let placeholder = Paragraph::new("No requests match the current filters").block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let compact = app.dashboard.view().view == ViewMode::Grid;
    let items: Vec<ListItem<'_>> = app
        .surface
        .rows
        .iter()
        .map(|row| {
            let marker = if row.selected { "◼" } else { "◻" };
            let marker_style = if row.selected {
                Style::default().fg(SELECTED_COLOR)
            } else {
                Style::default().fg(Color::White)
            };
            let mut spans = vec![
                Span::styled(marker.to_owned(), marker_style),
                Span::raw(format!(" {:>6}  {}", row.request_count, row.label)),
            ];
            if !compact {
                spans.push(Span::styled(
                    format!("  [{}]", row.tags),
                    Style::default().fg(TAG_COLOR),
                ));
                spans.push(Span::styled(
                    format!("  {}", row.id),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    app.list_state.select(if app.surface.rows.is_empty() { None } else { Some(app.cursor) });
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn footer_line(app: &mut App) -> Line<'static> {
    let toast_suffix = match app.toast.as_ref() {
        Some(toast) if toast.expires_at > Instant::now() => format!(" | {}", toast.message),
        Some(_) => {
            app.toast = None;
            String::new()
        }
        None => String::new(),
    };

    let mut spans = Vec::new();
    for (key, label) in [
        ("/", "search"),
        ("1-5", "filters"),
        ("s", "sort"),
        ("r", "regex"),
        ("g", "view"),
        ("space", "select"),
        ("v", "range"),
        ("a", "all"),
        ("c", "clear"),
        ("y", "export"),
        ("q", "quit"),
    ] {
        spans.push(Span::styled(key.to_owned(), Style::default().fg(FOOTER_KEY_COLOR)));
        spans.push(Span::styled(format!(" {label}  "), Style::default().fg(FOOTER_LABEL_COLOR)));
    }
    spans.push(Span::raw(toast_suffix));
    Line::from(spans)
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(|err| {
            teardown_terminal();
            err
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, LeaveAlternateScreen);
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::app::Dashboard;
    use crate::catalog::{CatalogStore, TagIndex};
    use crate::model::{ComponentId, RequestRecord, TagSet};
    use crate::render::{RowView, Surface};
    use crate::urlstate::StateStore;

    use super::{App, TuiSurface};

    fn record(id: &str, label: &str) -> RequestRecord {
        RequestRecord::new(
            ComponentId::new(id).expect("component id"),
            label,
            1,
            label.to_lowercase(),
        )
    }

    fn dashboard() -> Dashboard {
        let catalog = CatalogStore::from_records(vec![
            record("com.maps/.Maps", "Maps"),
            record("com.mail/.Mail", "Mail"),
        ]);
        let tags = TagIndex::build(&catalog, Vec::new());
        Dashboard::with_rng(catalog, tags, StdRng::seed_from_u64(11))
    }

    struct SharedStore {
        writes: Rc<RefCell<Vec<Vec<(String, String)>>>>,
    }

    impl StateStore for SharedStore {
        fn read(&self) -> Vec<(String, String)> {
            Vec::new()
        }

        fn replace(&mut self, pairs: &[(String, String)]) {
            self.writes.borrow_mut().push(pairs.to_vec());
        }
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn view_state_changes_are_written_to_the_store() {
        let writes = Rc::new(RefCell::new(Vec::new()));
        let store = SharedStore { writes: Rc::clone(&writes) };
        let mut app = App::new(dashboard(), Some(Box::new(store)));

        press(&mut app, KeyCode::Char('r'));
        assert_eq!(
            writes.borrow().as_slice(),
            &[vec![("regex".to_owned(), "1".to_owned())]]
        );

        press(&mut app, KeyCode::Char('s'));
        assert_eq!(writes.borrow().len(), 2);
    }

    #[test]
    fn selection_and_cursor_keys_skip_the_store() {
        let writes = Rc::new(RefCell::new(Vec::new()));
        let store = SharedStore { writes: Rc::clone(&writes) };
        let mut app = App::new(dashboard(), Some(Box::new(store)));

        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('a'));
        assert!(writes.borrow().is_empty());
    }

    #[test]
    fn surface_accumulates_batches_and_patches_in_place() {
        let maps = record("com.maps/.Maps", "Maps");
        let mail = record("com.mail/.Mail", "Mail");
        let mut surface = TuiSurface::default();

        surface.append_batch(&[RowView { record: &maps, tags: TagSet::new(), selected: false }]);
        surface.append_batch(&[RowView { record: &mail, tags: TagSet::new(), selected: true }]);
        assert_eq!(surface.len(), 2);
        assert!(surface.rows[1].selected);

        surface.patch_selection(maps.component_id(), true);
        assert!(surface.rows[0].selected);

        surface.clear();
        assert_eq!(surface.len(), 0);
    }

    #[test]
    fn empty_flag_survives_until_the_next_clear() {
        let mut surface = TuiSurface::default();
        surface.show_empty_state();
        assert!(surface.empty);
        surface.clear();
        assert!(!surface.empty);
    }
}
