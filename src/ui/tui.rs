use crate::application::state::AppState;
use crate::core::events::UiEvent;
use crate::core::models::{Theme, ThemeStatus};
use crate::core::traits::UiRenderer;
use crate::modules::catalog::Catalog;
use crate::utils::APP_NAME;
use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
        MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction as LayoutDirection, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph},
};
use std::io::{Stdout, stdout};
use std::time::Duration;

/// Horizontal gesture points per terminal cell. A ~6-cell drag crosses the
/// 60-point commit threshold.
const POINTS_PER_CELL: f32 = 10.0;

pub struct TuiRenderer {
    terminal: Option<Terminal<CrosstermBackend<Stdout>>>,
    catalog: Catalog,

    // Display state (synced from AppState on render)
    volume: u8,
    dragging: bool,
}

impl TuiRenderer {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            terminal: None,
            catalog,
            volume: 70,
            dragging: false,
        }
    }

    fn draw_ui(&self, f: &mut Frame, state: &AppState) {
        let chunks = Layout::default()
            .direction(LayoutDirection::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Length(3), // Story progress
                Constraint::Min(0),    // Theme content
                Constraint::Length(4), // Player bar
                Constraint::Length(3), // Status / controls
            ])
            .split(f.area());

        self.draw_header(f, chunks[0], state);
        self.draw_story_progress(f, chunks[1], state);
        self.draw_theme(f, chunks[2], state);
        self.draw_player_bar(f, chunks[3], state);
        self.draw_status(f, chunks[4], state);
    }

    fn draw_header(&self, f: &mut Frame, area: Rect, state: &AppState) {
        let theme = self.catalog.theme_by_id(&state.current_theme);
        let auto = if state.carousel.auto_play { " ▶▶" } else { "" };
        let header = Paragraph::new(Line::from(vec![
            Span::styled(
                format!(" {} ", APP_NAME),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("{} {}{}", theme.icon, theme.name, auto)),
        ]))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
        f.render_widget(header, area);
    }

    /// One bar per theme: full before the current one, live percent at the
    /// current one, empty after.
    fn draw_story_progress(&self, f: &mut Frame, area: Rect, state: &AppState) {
        let current = self.catalog.index_of(&state.current_theme);
        let count = self.catalog.len() as u32;

        let constraints: Vec<Constraint> =
            (0..count).map(|_| Constraint::Ratio(1, count)).collect();
        let bars = Layout::default()
            .direction(LayoutDirection::Horizontal)
            .constraints(constraints)
            .split(area);

        for (index, bar_area) in bars.iter().enumerate() {
            let percent = if index < current {
                100.0
            } else if index == current {
                state.carousel.progress
            } else {
                0.0
            };
            let gauge = Gauge::default()
                .block(Block::default().borders(Borders::ALL))
                .gauge_style(Style::default().fg(Color::Magenta))
                .label("")
                .ratio(f64::from(percent) / 100.0);
            f.render_widget(gauge, *bar_area);
        }
    }

    fn draw_theme(&self, f: &mut Frame, area: Rect, state: &AppState) {
        let theme = self.catalog.theme_by_id(&state.current_theme);

        // The strip follows the drag offset; a committed transition slides
        // it off-screen before the data swap recenters it.
        let area = shift_horizontal(area, state.carousel.strip_offset / POINTS_PER_CELL);

        let status_color = match theme.status {
            ThemeStatus::Upcoming => Color::Yellow,
            ThemeStatus::Available => Color::Green,
        };

        let mut lines: Vec<Line> = vec![
            Line::from(Span::styled(
                theme.name.clone(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                theme.status_label().to_string(),
                Style::default().fg(status_color),
            )),
            Line::raw(""),
        ];
        for line in &theme.description {
            lines.push(Line::raw(line.clone()));
        }
        if !theme.description.is_empty() {
            lines.push(Line::raw(""));
        }
        for link in link_lines(theme) {
            lines.push(link);
        }

        let halves = Layout::default()
            .direction(LayoutDirection::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let info = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(" release "))
            .alignment(Alignment::Center);
        f.render_widget(info, halves[0]);

        let items: Vec<ListItem> = theme
            .tracks
            .iter()
            .enumerate()
            .map(|(index, track)| {
                let marker = if index == state.playback.track_index {
                    if state.playback.is_playing { "▶ " } else { "• " }
                } else {
                    "  "
                };
                let style = if index == state.playback.track_index {
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(format!("{}{:02} — {}", marker, track.id, track.name)).style(style)
            })
            .collect();
        let tracks =
            List::new(items).block(Block::default().borders(Borders::ALL).title(" tracks "));
        f.render_widget(tracks, halves[1]);
    }

    fn draw_player_bar(&self, f: &mut Frame, area: Rect, state: &AppState) {
        let toggle = if state.playback.is_playing {
            "⏸"
        } else {
            "▶"
        };
        let title = format!(
            " ⏮ {} ⏭   {:02} — {}   ◈ {:3}% ",
            toggle,
            state.playback.track_index + 1,
            state.playback.track_name,
            state.playback.volume,
        );
        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title(title))
            .gauge_style(Style::default().fg(Color::Cyan))
            .label("")
            .ratio(f64::from(state.playback.progress.clamp(0.0, 100.0)) / 100.0);
        f.render_widget(gauge, area);
    }

    fn draw_status(&self, f: &mut Frame, area: Rect, state: &AppState) {
        let (text, color) = match &state.ui.error_message {
            Some(error) => (error.clone(), Color::Red),
            None => (state.ui.status_message.clone(), Color::Gray),
        };
        let status = Paragraph::new(Line::from(vec![
            Span::styled(text, Style::default().fg(color)),
            Span::styled(
                "  ←/→ themes · swipe with mouse · space play · n/p track · 1-9 select · a auto · +/- vol · q quit",
                Style::default().fg(Color::DarkGray),
            ),
        ]))
        .block(Block::default().borders(Borders::ALL));
        f.render_widget(status, area);
    }

    fn handle_key(&mut self, code: KeyCode) -> Option<UiEvent> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => Some(UiEvent::QuitRequested),
            KeyCode::Left => Some(UiEvent::PrevThemeRequested),
            KeyCode::Right => Some(UiEvent::NextThemeRequested),
            KeyCode::Char(' ') => Some(UiEvent::TogglePlayRequested),
            KeyCode::Char('n') => Some(UiEvent::NextTrackRequested),
            KeyCode::Char('p') => Some(UiEvent::PreviousTrackRequested),
            KeyCode::Char('a') => Some(UiEvent::ToggleAutoPlayRequested),
            KeyCode::Char('+') | KeyCode::Char('=') => Some(UiEvent::VolumeChangeRequested {
                percent: self.volume.saturating_add(5).min(100),
            }),
            KeyCode::Char('-') => Some(UiEvent::VolumeChangeRequested {
                percent: self.volume.saturating_sub(5),
            }),
            KeyCode::Char('0') => Some(UiEvent::SeekRequested { percent: 0.0 }),
            KeyCode::Char(c @ '1'..='9') => {
                let index = c.to_digit(10).unwrap_or(1) as usize - 1;
                Some(UiEvent::TrackSelected { index })
            }
            _ => None,
        }
    }
}

impl UiRenderer for TuiRenderer {
    fn init(&mut self) -> Result<()> {
        enable_raw_mode()?;
        execute!(stdout(), EnterAlternateScreen, EnableMouseCapture)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
        self.terminal = Some(terminal);
        Ok(())
    }

    fn cleanup(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen)?;
        self.terminal = None;
        Ok(())
    }

    fn render(&mut self, state: &AppState) -> Result<()> {
        self.volume = state.playback.volume;

        if let Some(mut terminal) = self.terminal.take() {
            terminal.draw(|f| self.draw_ui(f, state))?;
            self.terminal = Some(terminal);
        }
        Ok(())
    }

    fn poll_input(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if let Some(ui_event) = self.handle_key(key.code) {
                        events.push(ui_event);
                    }
                }
                Event::Mouse(mouse) => {
                    let x = f32::from(mouse.column) * POINTS_PER_CELL;
                    match mouse.kind {
                        MouseEventKind::Down(MouseButton::Left) => {
                            self.dragging = true;
                            events.push(UiEvent::DragStarted { x });
                        }
                        MouseEventKind::Drag(MouseButton::Left) if self.dragging => {
                            events.push(UiEvent::DragMoved { x });
                        }
                        MouseEventKind::Up(MouseButton::Left) if self.dragging => {
                            self.dragging = false;
                            events.push(UiEvent::DragEnded { x });
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
        }

        Ok(events)
    }
}

/// Shift a rect horizontally by a (possibly negative) number of cells,
/// clipping at the frame edges.
fn shift_horizontal(area: Rect, cells: f32) -> Rect {
    let shift = cells.round() as i32;
    let new_x = i32::from(area.x) + shift;
    if new_x <= 0 {
        let clipped = (-new_x).min(i32::from(area.width)) as u16;
        Rect {
            x: 0,
            width: area.width.saturating_sub(clipped),
            ..area
        }
    } else {
        Rect {
            x: new_x as u16,
            ..area
        }
    }
}

fn link_lines(theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if theme.status == ThemeStatus::Upcoming {
        return lines;
    }
    if let Some(links) = &theme.links {
        if let Some(spotify) = &links.spotify {
            lines.push(link_line("►", "Spotify", spotify));
        }
        if let Some(apple) = &links.apple_music {
            lines.push(link_line("♪", "Apple Music", apple));
        }
        if let Some(bandcamp) = &links.bandcamp {
            lines.push(link_line("◆", "Bandcamp", bandcamp));
        }
    }
    lines
}

fn link_line(icon: &str, label: &str, url: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{} {}: ", icon, label),
            Style::default().fg(Color::Green),
        ),
        Span::styled(url.to_string(), Style::default().fg(Color::DarkGray)),
    ])
}
