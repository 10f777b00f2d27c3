use std::{io, thread, time::Duration};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use nexus_core::{BrowseSession, CategoryFilter, Game, KeyValueStore};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::{error, info};

const TICK_RATE: Duration = Duration::from_millis(250);
const SIDEBAR_WIDTH: u16 = 24;
const HERO_HEIGHT: u16 = 8;
const EMBED_HEIGHT: u16 = 6;

const HOW_TO_PLAY: [(&str, &str); 5] = [
    ("W / ↑", "Move forward or upward in most games."),
    ("A / ←", "Move left or rotate counter-clockwise."),
    ("S / ↓", "Move backward or crouch."),
    ("D / →", "Move right or rotate clockwise."),
    ("Click", "Click to interact or shoot."),
];

#[derive(Debug, Clone)]
struct Theme {
    primary_fg: Color,
    accent: Color,
    muted: Color,
    selection_bg: Color,
    favorite: Color,
    badge: Color,
    warning: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_fg: Color::White,
            accent: Color::Indexed(99),
            muted: Color::DarkGray,
            selection_bg: Color::Indexed(236),
            favorite: Color::LightMagenta,
            badge: Color::LightRed,
            warning: Color::Yellow,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Browse,
    Search,
}

enum AppEvent {
    Input(Event),
    Tick,
}

/// Terminal front end driving a [`BrowseSession`].
pub struct NexusApp<S> {
    session: BrowseSession<S>,
    state: UiState,
    theme: Theme,
}

impl<S: KeyValueStore> NexusApp<S> {
    pub fn new(session: BrowseSession<S>) -> Self {
        Self {
            session,
            state: UiState::default(),
            theme: Theme::default(),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut status = format!("Loaded {} games", self.session.catalog().len());
        if let Some(warning) = self.session.hydration_warning() {
            status.push_str(" • favorites reset: ");
            status.push_str(warning);
        }
        self.state.set_status(status);

        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx);

        let result = loop {
            if let Err(err) = terminal.draw(|frame| self.draw(frame)) {
                break Err(err).context("failed to draw frame");
            }
            if self.state.should_quit {
                break Ok(());
            }
            match event_rx.recv().await {
                Some(AppEvent::Input(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    self.handle_key(key)
                }
                Some(AppEvent::Input(_)) | Some(AppEvent::Tick) => {}
                None => break Ok(()),
            }
        };

        restore_terminal(&mut terminal)?;
        info!("Session closed");
        result
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.state.should_quit = true;
            return;
        }
        match self.state.mode {
            Mode::Search => self.handle_search_key(key),
            Mode::Browse => {
                if self.handle_global_key(key) {
                    return;
                }
                if self.session.selected_game().is_some() {
                    self.handle_detail_key(key);
                } else {
                    self.handle_grid_key(key);
                }
            }
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => {
                self.state.mode = Mode::Browse;
                self.state.set_status(self.session.section_heading());
            }
            KeyCode::Backspace => {
                self.session.pop_search_char();
                self.state.reset_cursor();
            }
            KeyCode::Char(c) => {
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                    self.session.push_search_char(c);
                    self.state.reset_cursor();
                }
            }
            _ => {}
        }
    }

    fn handle_global_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') => self.state.should_quit = true,
            KeyCode::Char('s') => {
                let open = self.session.toggle_sidebar();
                self.state
                    .set_status(if open { "Sidebar shown" } else { "Sidebar hidden" }.to_string());
            }
            KeyCode::Char('h') => {
                self.session.go_home();
                self.state.fullscreen = false;
                self.state.reset_cursor();
                self.state.set_status("Home".to_string());
            }
            KeyCode::Char('r') => {
                self.session.reset_filters();
                self.state.reset_cursor();
                self.state.set_status("Filters reset".to_string());
            }
            KeyCode::Tab | KeyCode::Char(']') => {
                self.change_category(self.session.selected_category().next())
            }
            KeyCode::BackTab | KeyCode::Char('[') => {
                self.change_category(self.session.selected_category().previous())
            }
            KeyCode::Char('f') => self.toggle_favorite_under_cursor(),
            _ => return false,
        }
        true
    }

    fn handle_grid_key(&mut self, key: KeyEvent) {
        let len = self.session.filtered_games().len();
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.state.move_cursor(1, len),
            KeyCode::Char('k') | KeyCode::Up => self.state.move_cursor(-1, len),
            KeyCode::Char('g') | KeyCode::Home => self.state.move_to(0, len),
            KeyCode::Char('G') | KeyCode::End => self.state.move_to_end(len),
            KeyCode::PageDown => self.state.page_down(len),
            KeyCode::PageUp => self.state.page_up(len),
            KeyCode::Char('/') => {
                self.state.mode = Mode::Search;
                self.state.set_status("Type to search, Enter to finish".to_string());
            }
            KeyCode::Char('p') if self.session.show_hero() => {
                if let Some(id) = self.session.hero_game().map(|game| game.id.clone()) {
                    self.open_game(&id);
                }
            }
            KeyCode::Enter => {
                let id = self
                    .session
                    .filtered_games()
                    .get(self.state.cursor)
                    .map(|game| game.id.clone());
                if let Some(id) = id {
                    self.open_game(&id);
                }
            }
            _ => {}
        }
    }

    fn handle_detail_key(&mut self, key: KeyEvent) {
        let related = self.session.related_games().len();
        match key.code {
            KeyCode::Esc | KeyCode::Backspace => {
                if self.state.fullscreen {
                    self.state.fullscreen = false;
                } else {
                    self.session.clear_selection();
                    self.state.set_status(self.session.section_heading());
                }
            }
            KeyCode::Char('F') => {
                self.state.fullscreen = !self.state.fullscreen;
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.state.related_cursor = step(self.state.related_cursor, 1, related)
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.state.related_cursor = step(self.state.related_cursor, -1, related)
            }
            KeyCode::Enter => {
                let id = self
                    .session
                    .related_games()
                    .get(self.state.related_cursor)
                    .map(|game| game.id.clone());
                if let Some(id) = id {
                    self.open_game(&id);
                }
            }
            _ => {}
        }
    }

    fn change_category(&mut self, category: CategoryFilter) {
        self.session.select_category(category);
        self.state.fullscreen = false;
        self.state.reset_cursor();
        self.state.set_status(self.session.section_heading());
    }

    fn open_game(&mut self, id: &str) {
        match self.session.select_game(id) {
            Ok(game) => {
                let message = format!("Playing {}", game.title);
                self.state.related_cursor = 0;
                self.state.set_status(message);
            }
            Err(err) => self.state.set_status(format!("Error: {err}")),
        }
    }

    fn toggle_favorite_under_cursor(&mut self) {
        let target = match self.session.selected_game() {
            Some(game) => Some((game.id.clone(), game.title.clone())),
            None => self
                .session
                .filtered_games()
                .get(self.state.cursor)
                .map(|game| (game.id.clone(), game.title.clone())),
        };
        let Some((id, title)) = target else {
            self.state.set_status("No game highlighted".to_string());
            return;
        };
        match self.session.toggle_favorite(&id) {
            Ok(true) => self.state.set_status(format!("Added {title} to favorites")),
            Ok(false) => self
                .state
                .set_status(format!("Removed {title} from favorites")),
            Err(err) => {
                error!(?err, game_id = %id, "Failed to persist favorites");
                self.state
                    .set_status(format!("Failed to save favorites: {err}"));
            }
        }
    }

    fn draw(&mut self, frame: &mut Frame) {
        let size = frame.size();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(3),
            ])
            .split(size);

        self.render_search_bar(frame, chunks[0]);

        let fullscreen = self.state.fullscreen && self.session.selected_game().is_some();
        let main_area = if self.session.sidebar_open() && !fullscreen {
            let body = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
                .split(chunks[1]);
            self.render_sidebar(frame, body[0]);
            body[1]
        } else {
            chunks[1]
        };

        if self.session.selected_game().is_some() {
            self.render_detail(frame, main_area, fullscreen);
        } else {
            self.render_grid(frame, main_area);
        }
        self.render_status(frame, chunks[2]);
    }

    fn render_search_bar(&self, frame: &mut Frame, area: Rect) {
        let query = self.session.search_query();
        let mut spans = vec![
            Span::styled(
                "NEXUS",
                Style::default()
                    .fg(self.theme.primary_fg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "GAMES  ",
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            ),
        ];
        if query.is_empty() && self.state.mode != Mode::Search {
            spans.push(Span::styled(
                "Press / to search games...",
                Style::default().fg(self.theme.muted),
            ));
        } else {
            spans.push(Span::raw(query.to_string()));
        }
        if self.state.mode == Mode::Search {
            spans.push(Span::styled("▏", Style::default().fg(self.theme.accent)));
        }
        let border = if self.state.mode == Mode::Search {
            Style::default().fg(self.theme.accent)
        } else {
            Style::default()
        };
        let paragraph = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title("Search"),
        );
        frame.render_widget(paragraph, area);
    }

    fn render_sidebar(&self, frame: &mut Frame, area: Rect) {
        let selected = self.session.selected_category();
        let mut items: Vec<ListItem> = CategoryFilter::choices()
            .into_iter()
            .map(|choice| {
                if choice == selected {
                    ListItem::new(Line::from(Span::styled(
                        format!("▶ {choice}"),
                        Style::default()
                            .fg(self.theme.accent)
                            .add_modifier(Modifier::BOLD),
                    )))
                } else {
                    ListItem::new(Line::from(Span::styled(
                        format!("  {choice}"),
                        Style::default().fg(self.theme.primary_fg),
                    )))
                }
            })
            .collect();

        let count = self.session.favorite_count();
        let favorites_style = if count > 0 {
            Style::default().fg(self.theme.favorite)
        } else {
            Style::default().fg(self.theme.muted)
        };
        items.push(ListItem::new(Line::from("")));
        items.push(ListItem::new(Line::from(Span::styled(
            format!("♥ Favorites ({count})"),
            favorites_style,
        ))));
        items.extend(self.session.favorite_games().into_iter().map(|game| {
            ListItem::new(Line::from(Span::styled(
                format!("  {}", game.title),
                Style::default().fg(self.theme.primary_fg),
            )))
        }));

        let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Categories"));
        frame.render_widget(list, area);
    }

    fn render_grid(&mut self, frame: &mut Frame, area: Rect) {
        let list_area = if self.session.show_hero() {
            let parts = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(HERO_HEIGHT), Constraint::Min(3)])
                .split(area);
            self.render_hero(frame, parts[0]);
            parts[1]
        } else {
            area
        };

        let len = self.session.filtered_games().len();
        self.state.list_height = list_area.height.saturating_sub(2) as usize;
        self.state.clamp_cursor(len);
        self.state.ensure_cursor_visible(len);

        let heading = self.session.section_heading();
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("{heading} ({len})"));

        if len == 0 {
            let lines = vec![
                Line::from(Span::styled(
                    "No games found",
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    "Try adjusting your search or category filters.",
                    Style::default().fg(self.theme.muted),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "Press r to reset filters",
                    Style::default().fg(self.theme.accent),
                )),
            ];
            let paragraph = Paragraph::new(lines)
                .block(block)
                .alignment(Alignment::Center);
            frame.render_widget(paragraph, list_area);
            return;
        }

        let games = self.session.filtered_games();
        let visible = self.state.visible_range(len);
        let offset = visible.start;
        let items: Vec<ListItem> = games[visible]
            .iter()
            .enumerate()
            .map(|(idx, game)| self.game_line(game, offset + idx == self.state.cursor))
            .map(ListItem::new)
            .collect();

        let mut list_state = ListState::default();
        list_state.select(Some(self.state.cursor - offset));
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(self.theme.selection_bg));
        frame.render_stateful_widget(list, list_area, &mut list_state);
    }

    fn game_line(&self, game: &Game, highlighted: bool) -> Line<'static> {
        let marker = if highlighted {
            Span::styled(
                "▶ ",
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::raw("  ")
        };
        let mut spans = vec![
            marker,
            Span::styled(
                game.title.clone(),
                Style::default()
                    .fg(self.theme.primary_fg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" · {} · ★ {}", game.category, game.rating_label()),
                Style::default().fg(self.theme.muted),
            ),
        ];
        if self.session.options().show_featured_badge && game.featured {
            spans.push(Span::styled(
                "  HOT",
                Style::default()
                    .fg(self.theme.badge)
                    .add_modifier(Modifier::BOLD),
            ));
        }
        if self.session.is_favorite(&game.id) {
            spans.push(Span::styled("  ♥", Style::default().fg(self.theme.favorite)));
        }
        Line::from(spans)
    }

    fn render_hero(&self, frame: &mut Frame, area: Rect) {
        let mut lines = vec![
            Line::from(Span::styled(
                "NEW EXPERIENCE",
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "PLAY WITHOUT LIMITS",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Premium unblocked games, instantly. No downloads, no lag.",
                Style::default().fg(self.theme.muted),
            )),
        ];
        let featured: Vec<&str> = self
            .session
            .featured_games()
            .into_iter()
            .map(|game| game.title.as_str())
            .collect();
        if !featured.is_empty() {
            lines.push(Line::from(vec![
                Span::styled(
                    "HOT ",
                    Style::default()
                        .fg(self.theme.badge)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(featured.join(" · ")),
            ]));
        }
        if let Some(game) = self.session.hero_game() {
            lines.push(Line::from(Span::styled(
                format!("Press p to play {} now", game.title.to_uppercase()),
                Style::default().fg(self.theme.warning),
            )));
        }
        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_detail(&self, frame: &mut Frame, area: Rect, fullscreen: bool) {
        let Some(game) = self.session.selected_game() else {
            return;
        };

        if fullscreen {
            self.render_embed(frame, area, game);
            return;
        }

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(EMBED_HEIGHT), Constraint::Min(6)])
            .split(area);
        self.render_embed(frame, rows[0], game);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[1]);
        self.render_game_info(frame, columns[0], game);

        if self.session.options().show_how_to_play {
            let side = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(HOW_TO_PLAY.len() as u16 + 2),
                    Constraint::Min(3),
                ])
                .split(columns[1]);
            self.render_how_to_play(frame, side[0]);
            self.render_related(frame, side[1]);
        } else {
            self.render_related(frame, columns[1]);
        }
    }

    fn render_embed(&self, frame: &mut Frame, area: Rect, game: &Game) {
        let lines = vec![
            Line::from(Span::styled(
                game.iframe_url.clone(),
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::UNDERLINED),
            )),
            Line::from(Span::styled(
                "Open this address in a browser to play.",
                Style::default().fg(self.theme.muted),
            )),
            Line::from(Span::styled(
                "F toggles full screen • Esc goes back",
                Style::default().fg(self.theme.muted),
            )),
        ];
        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("Now Playing: {}", game.title)),
            )
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_game_info(&self, frame: &mut Frame, area: Rect, game: &Game) {
        let favorite = if self.session.is_favorite(&game.id) {
            Span::styled("♥ Favorited", Style::default().fg(self.theme.favorite))
        } else {
            Span::styled("♡ Press f to favorite", Style::default().fg(self.theme.muted))
        };
        let lines = vec![
            Line::from(Span::styled(
                game.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(vec![
                Span::styled(
                    format!("★ {}", game.rating_label()),
                    Style::default().fg(self.theme.warning),
                ),
                Span::raw("  "),
                Span::styled(
                    game.category.as_str().to_uppercase(),
                    Style::default().fg(self.theme.accent),
                ),
            ]),
            Line::from(""),
            Line::from(game.description.clone()),
            Line::from(""),
            Line::from(favorite),
        ];
        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Game Details"))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_how_to_play(&self, frame: &mut Frame, area: Rect) {
        let lines: Vec<Line> = HOW_TO_PLAY
            .iter()
            .map(|(keys, action)| {
                Line::from(vec![
                    Span::styled(
                        format!("{keys:<6}"),
                        Style::default()
                            .fg(self.theme.accent)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(" "),
                    Span::raw(*action),
                ])
            })
            .collect();
        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("How to play"))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_related(&self, frame: &mut Frame, area: Rect) {
        let related = self.session.related_games();
        let block = Block::default().borders(Borders::ALL).title("You might also like");
        if related.is_empty() {
            let paragraph = Paragraph::new(Span::styled(
                "No related games",
                Style::default().fg(self.theme.muted),
            ))
            .block(block);
            frame.render_widget(paragraph, area);
            return;
        }
        let cursor = self.state.related_cursor.min(related.len() - 1);
        let items: Vec<ListItem> = related
            .iter()
            .enumerate()
            .map(|(idx, game)| ListItem::new(self.game_line(game, idx == cursor)))
            .collect();
        let mut list_state = ListState::default();
        list_state.select(Some(cursor));
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(self.theme.selection_bg));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let hints = match (self.state.mode, self.session.selected_game().is_some()) {
            (Mode::Search, _) => "Enter/Esc finish • Backspace delete",
            (Mode::Browse, true) => "Esc back • f favorite • F full screen • Enter open related • q quit",
            (Mode::Browse, false) => {
                "/ search • Tab category • Enter play • f favorite • s sidebar • h home • q quit"
            }
        };
        let paragraph = Paragraph::new(Line::from(vec![
            Span::raw(self.state.status.clone()),
            Span::styled(format!("  │  {hints}"), Style::default().fg(self.theme.muted)),
        ]))
        .block(Block::default().borders(Borders::ALL).title("Status"));
        frame.render_widget(paragraph, area);
    }
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(evt) => {
                    if sender.blocking_send(AppEvent::Input(evt)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {
                if sender.blocking_send(AppEvent::Tick).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
}

/// Clamp `current + delta` into `0..len`.
fn step(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let idx = (current as isize + delta).clamp(0, len as isize - 1);
    idx as usize
}

struct UiState {
    cursor: usize,
    offset: usize,
    list_height: usize,
    related_cursor: usize,
    status: String,
    mode: Mode,
    fullscreen: bool,
    should_quit: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            cursor: 0,
            offset: 0,
            list_height: 1,
            related_cursor: 0,
            status: "Ready".to_string(),
            mode: Mode::Browse,
            fullscreen: false,
            should_quit: false,
        }
    }
}

impl UiState {
    fn set_status(&mut self, message: String) {
        self.status = message;
    }

    fn reset_cursor(&mut self) {
        self.cursor = 0;
        self.offset = 0;
    }

    fn move_cursor(&mut self, delta: isize, len: usize) {
        if len == 0 {
            return;
        }
        self.cursor = step(self.cursor, delta, len);
        self.ensure_cursor_visible(len);
    }

    fn move_to(&mut self, index: usize, len: usize) {
        if len == 0 {
            return;
        }
        self.cursor = index.min(len - 1);
        self.ensure_cursor_visible(len);
    }

    fn move_to_end(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.cursor = len - 1;
        self.ensure_cursor_visible(len);
    }

    fn page_down(&mut self, len: usize) {
        if len == 0 || self.list_height == 0 {
            return;
        }
        let delta = self.list_height.min(len);
        self.move_cursor(delta as isize, len);
    }

    fn page_up(&mut self, len: usize) {
        if len == 0 || self.list_height == 0 {
            return;
        }
        let delta = self.list_height.min(len);
        self.move_cursor(-(delta as isize), len);
    }

    fn clamp_cursor(&mut self, len: usize) {
        if len == 0 {
            self.cursor = 0;
            self.offset = 0;
        } else if self.cursor >= len {
            self.cursor = len - 1;
        }
    }

    fn ensure_cursor_visible(&mut self, len: usize) {
        if len == 0 || self.list_height == 0 {
            self.offset = 0;
            return;
        }
        let height = self.list_height;
        let max_offset = len.saturating_sub(height);

        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + height {
            self.offset = self.cursor + 1 - height;
        }

        if self.offset > max_offset {
            self.offset = max_offset;
        }
    }

    fn visible_range(&self, len: usize) -> std::ops::Range<usize> {
        let start = self.offset.min(len);
        let end = (self.offset + self.list_height.max(1)).min(len);
        start..end
    }
}
