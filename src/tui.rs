//! TUI (Terminal User Interface) for watching the bot play
//!
//! This module renders a live view of one play session using Ratatui.
//!
//! # Architecture
//! - `TuiInterface`: terminal setup, rendering and key polling
//! - `TuiView`: [`SessionView`] adapter that feeds bot progress into the interface
//!
//! # State Machine
//! `Waiting` → `Playing` → `Finished`. While `Playing`, each guess is shown
//! for a short delay; pressing `f` drops the delay. `Finished` waits for a
//! key before the terminal is restored.

use crate::bot::PlayStatus;
use crate::range::Range;
use crate::session::{SessionInfo, SessionReport, SessionView};
use crate::strategy::{GuessRecord, GuessResult};
use crate::{debug_log, info_log};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
};
use std::io;
use std::time::{Duration, Instant};

const EVENT_POLL_TIMEOUT_MS: u64 = 50;
const MAX_HISTORY_DISPLAY: usize = 200;

// Style constants for consistent UI
const HEADER_STYLE: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
const ERROR_STYLE: Style = Style::new().fg(Color::Red).add_modifier(Modifier::BOLD);
const SUCCESS_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);
const LOW_STYLE: Style = Style::new().fg(Color::Yellow);
const HIGH_STYLE: Style = Style::new().fg(Color::Magenta);

#[derive(Debug, Clone, Copy, PartialEq)]
enum TuiState {
    Waiting,
    Playing,
    Finished,
}

fn result_style(result: GuessResult) -> Style {
    match result {
        GuessResult::Low => LOW_STYLE,
        GuessResult::High => HIGH_STYLE,
        GuessResult::Correct => SUCCESS_STYLE,
    }
}

/// Share of the initial range already ruled out, in `[0, 1]`.
fn eliminated_ratio(initial: &Range, current: &Range) -> f64 {
    let total = initial.len();
    if total <= 1 {
        return 1.0;
    }
    let left = current.len();
    (total - left.min(total)) as f64 / (total - 1) as f64
}

/// Context for rendering the UI - groups related parameters to avoid too many function arguments.
struct RenderContext<'a> {
    info: Option<&'a SessionInfo>,
    range: Range,
    history: &'a [GuessRecord],
    state: TuiState,
    outcome: &'a str,
    status: &'a str,
}

pub struct TuiInterface {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    info: Option<SessionInfo>,
    range: Range,
    history: Vec<GuessRecord>,
    state: TuiState,
    outcome: String,
    status: String,
    step_delay: Duration,
}

impl TuiInterface {
    pub fn new(step_delay: Duration) -> Result<Self, io::Error> {
        info_log!("TuiInterface::new() - Initializing TUI");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        info_log!("Terminal backend created");

        Ok(Self {
            terminal,
            info: None,
            range: Range::default(),
            history: Vec::new(),
            state: TuiState::Waiting,
            outcome: String::new(),
            status: "Waiting for the game to start".to_string(),
            step_delay,
        })
    }

    pub fn cleanup(&mut self) -> Result<(), io::Error> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            cursor::Show
        )?;
        Ok(())
    }

    fn draw(&mut self) -> Result<(), io::Error> {
        let ctx = RenderContext {
            info: self.info.as_ref(),
            range: self.range,
            history: &self.history,
            state: self.state,
            outcome: &self.outcome,
            status: &self.status,
        };

        self.terminal.draw(|f| {
            Self::render_static(f, &ctx);
        })?;
        Ok(())
    }

    fn draw_or_log(&mut self) {
        if let Err(e) = self.draw() {
            debug_log!("Draw error: {}", e);
        }
    }

    fn render_static(f: &mut Frame, ctx: &RenderContext) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Length(3), // Range gauge
                Constraint::Min(6),    // Guess history
                Constraint::Length(3), // Status line
                Constraint::Length(3), // Instructions
            ])
            .split(f.area());

        Self::render_title(f, chunks[0], ctx.info);
        Self::render_range(f, chunks[1], ctx.info, ctx.range);
        Self::render_history(f, chunks[2], ctx.history, ctx.outcome, ctx.state);
        Self::render_status(f, chunks[3], ctx.status);
        Self::render_instructions(f, chunks[4], ctx.state);
    }

    fn render_title(f: &mut Frame, area: Rect, info: Option<&SessionInfo>) {
        let text = match info {
            Some(info) => format!("GUESS THE NUMBER - {} search", info.strategy),
            None => "GUESS THE NUMBER".to_string(),
        };
        let title = Paragraph::new(text)
            .style(HEADER_STYLE)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(title, area);
    }

    fn render_range(f: &mut Frame, area: Rect, info: Option<&SessionInfo>, range: Range) {
        let initial = info.map_or(range, |i| i.range);
        let label = if range.is_inverted() {
            "no numbers left".to_string()
        } else {
            format!("{range} - {} left", range.len())
        };
        let gauge = Gauge::default()
            .block(Block::default().title("Range").borders(Borders::ALL))
            .gauge_style(Style::default().fg(Color::Cyan).bg(Color::DarkGray))
            .ratio(eliminated_ratio(&initial, &range).clamp(0.0, 1.0))
            .label(label);
        f.render_widget(gauge, area);
    }

    fn render_history(
        f: &mut Frame,
        area: Rect,
        history: &[GuessRecord],
        outcome: &str,
        state: TuiState,
    ) {
        let block = Block::default()
            .title(format!("Guesses ({})", history.len()))
            .borders(Borders::ALL);
        let inner_height = block.inner(area).height as usize;

        let mut lines = Vec::new();
        let reserved = if state == TuiState::Finished { 2 } else { 0 };
        let visible = inner_height.saturating_sub(reserved).min(MAX_HISTORY_DISPLAY);
        // Most recent guesses win when the list does not fit
        let skip = history.len().saturating_sub(visible);
        for (i, record) in history.iter().enumerate().skip(skip) {
            lines.push(Line::from(vec![
                Span::raw(format!("{:>4}. ", i + 1)),
                Span::raw(format!("{:>8}  ", record.guess)),
                Span::styled(record.result.to_string(), result_style(record.result)),
            ]));
        }

        if state == TuiState::Finished && !outcome.is_empty() {
            lines.push(Line::from(""));
            let style = if history.last().is_some_and(|r| r.result == GuessResult::Correct) {
                SUCCESS_STYLE
            } else {
                ERROR_STYLE
            };
            lines.push(Line::from(vec![Span::styled(outcome, style)]));
        }

        f.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_status(f: &mut Frame, area: Rect, status: &str) {
        let status_text = if status.is_empty() { "Ready" } else { status };
        let paragraph = Paragraph::new(status_text)
            .style(HEADER_STYLE)
            .block(Block::default().borders(Borders::ALL).title("Status"));
        f.render_widget(paragraph, area);
    }

    fn render_instructions(f: &mut Frame, area: Rect, state: TuiState) {
        let text = match state {
            TuiState::Waiting => "Starting...",
            TuiState::Playing => "F: Fast-forward",
            TuiState::Finished => "Press any key to exit",
        };
        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    /// Shows the latest step for `step_delay`, watching for fast-forward.
    fn pause_between_steps(&mut self) -> Result<(), io::Error> {
        let deadline = Instant::now() + self.step_delay;
        while Instant::now() < deadline {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let timeout = remaining.min(Duration::from_millis(EVENT_POLL_TIMEOUT_MS));
            if event::poll(timeout)?
                && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
                && matches!(key.code, KeyCode::Char('f' | 'F'))
            {
                debug_log!("pause_between_steps() - fast-forward requested");
                self.step_delay = Duration::ZERO;
                break;
            }
        }
        Ok(())
    }

    /// Blocks until a key is pressed.
    fn wait_for_key(&mut self) -> Result<(), io::Error> {
        loop {
            if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))?
                && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                return Ok(());
            }
        }
    }
}

impl Drop for TuiInterface {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

/// Live session view backed by [`TuiInterface`].
pub struct TuiView {
    interface: TuiInterface,
}

impl TuiView {
    pub fn new(step_delay: Duration) -> Result<Self, io::Error> {
        Ok(Self {
            interface: TuiInterface::new(step_delay)?,
        })
    }
}

impl SessionView for TuiView {
    fn session_started(&mut self, info: &SessionInfo) {
        info_log!("TuiView::session_started() - game {}", info.game_id);
        let ui = &mut self.interface;
        ui.range = info.range;
        ui.history.clear();
        ui.outcome.clear();
        ui.info = Some(info.clone());
        ui.state = TuiState::Playing;
        ui.status = format!("Game {} - up to {} guesses", info.game_id, info.max_attempts);
        ui.draw_or_log();
    }

    fn step(&mut self, record: &GuessRecord, range: &Range) {
        let ui = &mut self.interface;
        ui.history.push(*record);
        ui.range = *range;
        ui.status = format!("Guess #{}: {} was {}", ui.history.len(), record.guess, record.result);
        ui.draw_or_log();
        if let Err(e) = ui.pause_between_steps() {
            debug_log!("step() - input error: {}", e);
        }
    }

    fn finished(&mut self, report: &SessionReport) {
        let ui = &mut self.interface;
        ui.state = TuiState::Finished;
        ui.outcome = match report.result.status {
            PlayStatus::Completed => format!(
                "Found {} in {} guesses",
                report.result.history.last().map_or(0, |r| r.guess),
                report.result.attempts
            ),
            PlayStatus::Aborted => format!(
                "Gave up after {} guesses ({})",
                report.result.attempts,
                report
                    .result
                    .abort_reason
                    .map_or_else(|| "aborted".to_string(), |r| r.to_string())
            ),
        };
        ui.status = format!("Game over - {}", report.result.status);
        ui.draw_or_log();
        if let Err(e) = ui.wait_for_key() {
            debug_log!("finished() - input error: {}", e);
        }
    }
}
