//! Rendering for the playground TUI.

use std::sync::{Arc, Mutex};

use metaprompt::playground::{OutputView, Side};
use metaprompt::ui::{Alert, LogLevel, LogLine, UiState};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::{App, Focus, InputMode};
use crate::highlight::highlight_prompt;

const CURSOR: &str = "\u{2588}";

// ── Public Utilities ──────────────────────────────────────────────────

/// Truncate a string to at most `max` characters, appending "..." if truncated.
pub fn truncate_str(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let head: String = s.chars().take(max).collect();
        format!("{head}...")
    } else {
        s.to_string()
    }
}

/// Map a log level to a ratatui [`Style`].
pub fn log_level_style(level: LogLevel) -> Style {
    match level {
        LogLevel::Trace => Style::default().fg(Color::DarkGray),
        LogLevel::Debug => Style::default().fg(Color::Cyan),
        LogLevel::Info => Style::default().fg(Color::Green),
        LogLevel::Warn => Style::default().fg(Color::Yellow),
        LogLevel::Error => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    }
}

/// Rows `lines` occupy once wrapped to `width` columns.
fn wrapped_height(lines: &[Line<'_>], width: usize) -> usize {
    let width = width.max(1);
    lines
        .iter()
        .map(|line| line.width().div_ceil(width).max(1))
        .sum()
}

/// Clamp a requested top row so the pane never scrolls past its last page.
fn clamp_scroll(requested: usize, content_rows: usize, visible_rows: usize) -> u16 {
    let max_top = content_rows.saturating_sub(visible_rows);
    requested.min(max_top).min(u16::MAX as usize) as u16
}

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

// ── Root Render ───────────────────────────────────────────────────────

/// Snapshot of UiState fields needed for rendering.
///
/// Cloned in one shot so the `UiState` lock is held only for the copy,
/// never while widgets are built or drawn.
struct RenderSnapshot {
    model: String,
    status: String,
    session_path: Option<String>,
    prompts: [String; 2],
    results: [String; 2],
    views: [OutputView; 2],
    busy: [bool; 2],
    test_input: String,
    alert: Option<Alert>,
    logs: Vec<LogLine>,
}

impl RenderSnapshot {
    fn take(state: &Arc<Mutex<UiState>>, app: &App) -> Option<Self> {
        let s = state.lock().ok()?;
        let pg = &s.playground;
        Some(Self {
            model: s.model.clone(),
            status: s.status.clone(),
            session_path: s.session_path.as_ref().map(|p| p.display().to_string()),
            prompts: Side::ALL.map(|side| pg.prompt(side).to_string()),
            results: Side::ALL.map(|side| pg.visible_result(side).to_string()),
            views: Side::ALL.map(|side| pg.side(side).view),
            busy: Side::ALL.map(|side| pg.is_busy(side)),
            test_input: pg.test_input().to_string(),
            alert: s.alert.clone(),
            logs: if app.show_logs {
                s.logs.clone()
            } else {
                Vec::new()
            },
        })
        // lock released here
    }
}

fn slot(side: Side) -> usize {
    match side {
        Side::A => 0,
        Side::B => 1,
    }
}

pub(crate) fn render(frame: &mut Frame, state: &Arc<Mutex<UiState>>, app: &App) {
    let Some(snap) = RenderSnapshot::take(state, app) else {
        return;
    };
    let area = frame.area();

    // Outer layout: [3] title | [flex] middle | [6] test input | [3] hint bar.
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(6),
            Constraint::Length(3),
        ])
        .split(area);

    render_title(frame, chunks[0], &snap);

    let main = if app.show_logs {
        let mid = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(chunks[1]);
        render_logs(frame, mid[1], &snap.logs, app);
        mid[0]
    } else {
        chunks[1]
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(main);
    let halves = |area: Rect| {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area)
    };
    let prompt_row = halves(rows[0]);
    let output_row = halves(rows[1]);

    for side in Side::ALL {
        render_prompt(frame, prompt_row[slot(side)], side, &snap, app);
        render_output(frame, output_row[slot(side)], side, &snap, app);
    }

    render_test_input(frame, chunks[2], &snap, app);
    render_hint_bar(frame, chunks[3], app);

    if let Some(ref alert) = snap.alert {
        render_alert(frame, area, alert);
    } else if app.input_mode == InputMode::About {
        render_about(frame, area);
    }
}

// ── Title Bar ─────────────────────────────────────────────────────────

fn render_title(frame: &mut Frame, area: Rect, snap: &RenderSnapshot) {
    let status_style = if snap.status.contains("failed") {
        Style::default().fg(Color::Red)
    } else if snap.busy.iter().any(|b| *b) {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::White)
    };

    let mut spans = vec![
        Span::styled("Model: ", Style::default().fg(Color::DarkGray)),
        Span::raw(snap.model.clone()),
        Span::raw("   "),
        Span::styled("Status: ", Style::default().fg(Color::DarkGray)),
        Span::styled(snap.status.clone(), status_style),
    ];
    if let Some(ref path) = snap.session_path {
        let width = area.width.saturating_sub(4) as usize;
        let room = width.saturating_sub(snap.model.len() + snap.status.len() + 30);
        spans.push(Span::raw("   "));
        spans.push(Span::styled("File: ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(
            truncate_str(path, room.max(12)),
            Style::default().fg(Color::Cyan),
        ));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue))
        .title(" Meta Prompt Playground ");

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

// ── Text Panes ────────────────────────────────────────────────────────

/// Draw highlighted text with the shared scroll/clamp/cursor handling.
fn render_text_pane(
    frame: &mut Frame,
    area: Rect,
    block: Block<'_>,
    text: &str,
    focus: Focus,
    app: &App,
) {
    let mut lines = highlight_prompt(text);
    let editing = app.input_mode == InputMode::Editing && app.focus == focus;
    if editing && let Some(last) = lines.last_mut() {
        last.spans
            .push(Span::styled(CURSOR, Style::default().fg(Color::Cyan)));
    }

    let inner_width = area.width.saturating_sub(2) as usize;
    let inner_height = area.height.saturating_sub(2) as usize;
    let rows = wrapped_height(&lines, inner_width);
    let scroll = clamp_scroll(app.scroll_of(focus), rows, inner_height);

    let paragraph = Paragraph::new(lines)
        .block(block.border_style(border_style(app.focus == focus)))
        .scroll((scroll, 0))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_prompt(frame: &mut Frame, area: Rect, side: Side, snap: &RenderSnapshot, app: &App) {
    let focus = Focus::Prompt(side);
    let mut title = format!(" Meta Prompt {side} ");
    if app.input_mode == InputMode::Editing && app.focus == focus {
        title.push_str("[editing] ");
    }
    let block = Block::default().borders(Borders::ALL).title(title);
    render_text_pane(frame, area, block, &snap.prompts[slot(side)], focus, app);
}

/// Title line for a result pane: side, view tabs, busy marker.
fn output_title(side: Side, view: OutputView, busy: bool) -> Line<'static> {
    let active = Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    let inactive = Style::default().fg(Color::DarkGray);
    let (output_style, reasoning_style) = match view {
        OutputView::Output => (active, inactive),
        OutputView::Reasoning => (inactive, active),
    };

    let mut spans = vec![
        Span::raw(format!(" {side}: ")),
        Span::styled("Output", output_style),
        Span::raw(" | "),
        Span::styled("Reasoning", reasoning_style),
        Span::raw(" "),
    ];
    if busy {
        spans.push(Span::styled(
            "generating\u{2026} ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));
    }
    Line::from(spans)
}

fn render_output(frame: &mut Frame, area: Rect, side: Side, snap: &RenderSnapshot, app: &App) {
    let i = slot(side);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(output_title(side, snap.views[i], snap.busy[i]));
    render_text_pane(frame, area, block, &snap.results[i], Focus::Output(side), app);
}

fn render_test_input(frame: &mut Frame, area: Rect, snap: &RenderSnapshot, app: &App) {
    let mut title = " Test Input ".to_string();
    if app.input_mode == InputMode::Editing && app.focus == Focus::TestInput {
        title.push_str("[editing] ");
    }
    let block = Block::default().borders(Borders::ALL).title(title);
    render_text_pane(frame, area, block, &snap.test_input, Focus::TestInput, app);
}

// ── Log Pane ──────────────────────────────────────────────────────────

fn render_logs(frame: &mut Frame, area: Rect, logs: &[LogLine], app: &App) {
    let inner_height = area.height.saturating_sub(2) as usize;

    let lines: Vec<Line> = logs
        .iter()
        .map(|log| {
            Line::from(vec![
                Span::styled(
                    format!("{} ", log.time),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    format!("{} ", log.level.label()),
                    log_level_style(log.level),
                ),
                Span::raw(log.message.as_str()),
            ])
        })
        .collect();

    let total = lines.len();
    let scroll = total
        .saturating_sub(inner_height)
        .saturating_sub(app.log_scroll);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(app.focus == Focus::Log))
        .title(" Log ");

    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((scroll.min(u16::MAX as usize) as u16, 0))
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}

// ── Hint Bar ──────────────────────────────────────────────────────────

fn render_hint_bar(frame: &mut Frame, area: Rect, app: &App) {
    let (title, text, style) = match app.input_mode {
        InputMode::Normal | InputMode::About => (
            " [a/b/g] generate A/B/both  [Enter] edit  [Tab] focus  [?] help  [q] quit "
                .to_string(),
            String::new(),
            Style::default().fg(Color::DarkGray),
        ),
        InputMode::Editing => (
            " Editing \u{2014} [Enter] newline  [Backspace] delete  [Esc] done ".to_string(),
            String::new(),
            Style::default().fg(Color::Cyan),
        ),
        InputMode::PathEntry(action) => (
            format!(" {} \u{2014} [Enter] confirm  [Esc] cancel ", action.label()),
            format!("> {}{CURSOR}", app.path_buffer),
            Style::default().fg(Color::Green),
        ),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title);

    frame.render_widget(Paragraph::new(text).block(block), area);
}

// ── Popups ────────────────────────────────────────────────────────────

/// A rect `percent_x` by `height` rows, centered in `area`.
fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let width = (u32::from(area.width) * u32::from(percent_x.min(100)) / 100) as u16;
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_alert(frame: &mut Frame, area: Rect, alert: &Alert) {
    let mut lines: Vec<Line> = alert.message.lines().map(Line::from).collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press any key to dismiss",
        Style::default().fg(Color::DarkGray),
    )));

    // Size from wrapped rows, with one spare row per wrapped line since word
    // wrapping can break earlier than a plain width split.
    let inner_width = (usize::from(area.width) * 60 / 100).saturating_sub(2).max(1);
    let spare = lines.iter().filter(|l| l.width() > inner_width).count();
    let rows = wrapped_height(&lines, inner_width) + spare + 2;
    let popup = centered_rect(60, rows.min(usize::from(u16::MAX)) as u16, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
        .title(format!(" {} ", alert.title));

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        popup,
    );
}

const ABOUT_KEYS: [(&str, &str); 15] = [
    ("Tab / Shift+Tab", "move focus"),
    ("Enter / i", "edit focused prompt or test input"),
    ("Esc", "stop editing"),
    ("a / b / g", "generate A, B, or both"),
    ("t", "toggle Output / Reasoning"),
    ("y", "copy focused result"),
    ("x", "clear focused result or test input"),
    ("d", "reset focused prompt to default"),
    ("e", "load example test input"),
    ("s / l", "save / load session file"),
    (",", "toggle log pane"),
    ("Up/Down PgUp/PgDn", "scroll"),
    ("Home / End", "jump to top / bottom"),
    ("?", "this help"),
    ("q / Ctrl+C", "quit"),
];

fn render_about(frame: &mut Frame, area: Rect) {
    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);

    let mut lines = vec![
        Line::from("Compare two meta prompts against the same test input."),
        Line::from("Each side's reply is split into Output and Reasoning."),
        Line::from(""),
    ];
    lines.extend(ABOUT_KEYS.iter().map(|(keys, action)| {
        Line::from(vec![
            Span::styled(format!("{keys:<20}"), key_style),
            Span::raw(*action),
        ])
    }));

    let popup = centered_rect(60, lines.len() as u16 + 2, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue))
        .title(concat!(" Meta Prompt Playground v", env!("CARGO_PKG_VERSION"), " "));

    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

// ── Tests ─────────────────────────────────────────────────────────────
