use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use unicode_width::UnicodeWidthChar;

use crate::model::Pane;

use super::app::App;

/// Main render function: title row, the two panes, status row
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(app.theme.background)),
        area,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    render_title(frame, app, chunks[0]);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);
    render_pane(frame, app, Pane::Available, panes[0]);
    render_pane(frame, app, Pane::Selected, panes[1]);

    render_status(frame, app, chunks[2]);

    if app.show_help {
        render_help(frame, app, area);
    }
}

fn render_title(frame: &mut Frame, app: &App, area: Rect) {
    let undo = app.editor.undo_state();
    let hint = format!(
        " arranger — {} selected · undo {} · redo {} ",
        app.editor.arrangement().pane_len(Pane::Selected),
        if undo.can_undo { "✓" } else { "·" },
        if undo.can_redo { "✓" } else { "·" },
    );
    let line = Line::from(Span::styled(
        hint,
        Style::default()
            .fg(app.theme.text_bright)
            .add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(Paragraph::new(line), area);
}

fn render_pane(frame: &mut Frame, app: &App, pane: Pane, area: Rect) {
    let keys = app.editor.arrangement().pane_keys(pane);
    let focused = app.focus_pane == pane;
    let border_style = if focused {
        Style::default().fg(app.theme.highlight)
    } else {
        Style::default().fg(app.theme.dim)
    };
    let title = format!(
        " {} ({}) ",
        match pane {
            Pane::Available => "Available",
            Pane::Selected => "Selected",
        },
        keys.len()
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Insertion marker while the keyboard engine targets this pane
    let insertion = app
        .editor
        .keyboard()
        .insertion_point()
        .filter(|(target, _)| *target == pane)
        .map(|(_, index)| index);
    let moving_key = app.editor.keyboard().active_column().map(str::to_string);

    let mut lines: Vec<Line> = Vec::new();
    for (i, key) in keys.iter().enumerate() {
        if insertion == Some(i) {
            lines.push(insertion_line(app, inner.width));
        }
        lines.push(item_line(app, pane, key, i, focused, moving_key.as_deref()));
    }
    if insertion == Some(keys.len()) {
        lines.push(insertion_line(app, inner.width));
    }

    // Keep the cursor row visible
    let cursor_row = app.cursor(pane) + insertion.map_or(0, |ins| usize::from(ins <= app.cursor(pane)));
    let height = inner.height as usize;
    let offset = cursor_row.saturating_sub(height.saturating_sub(1));
    let visible: Vec<Line> = lines.into_iter().skip(offset).take(height).collect();
    frame.render_widget(Paragraph::new(visible), inner);
}

fn insertion_line(app: &App, width: u16) -> Line<'static> {
    let bar = "─".repeat((width as usize).saturating_sub(2).max(1));
    Line::from(Span::styled(
        format!("▸{bar}"),
        Style::default().fg(app.theme.insertion),
    ))
}

fn item_line<'a>(
    app: &App,
    pane: Pane,
    key: &str,
    index: usize,
    pane_focused: bool,
    moving_key: Option<&str>,
) -> Line<'a> {
    let catalog = app.editor.catalog();
    let column = catalog.get(key);
    let marked = app.editor.selection().is_selected(pane, key);
    let under_cursor = pane_focused && index == app.cursor(pane);
    let moving = moving_key == Some(key);

    let cursor = if under_cursor { "▸ " } else { "  " };
    let mark = if marked { "✓ " } else { "  " };

    let mut style = Style::default().fg(app.theme.text);
    if under_cursor {
        style = style.fg(app.theme.text_bright).add_modifier(Modifier::BOLD);
    }
    if moving {
        style = style.add_modifier(Modifier::REVERSED);
    }

    let mut spans = vec![
        Span::styled(cursor.to_string(), Style::default().fg(app.theme.highlight)),
        Span::styled(mark.to_string(), Style::default().fg(app.theme.marked)),
        Span::styled(truncate_width(catalog.title(key), 28), style),
    ];
    if let Some(col) = column {
        if col.required {
            spans.push(Span::styled(
                " *".to_string(),
                Style::default().fg(app.theme.error),
            ));
        } else if col.locked {
            spans.push(Span::styled(
                " ⊠".to_string(),
                Style::default().fg(app.theme.locked),
            ));
        }
        if let Some(cat) = &col.category {
            spans.push(Span::styled(
                format!("  #{cat}"),
                Style::default().fg(app.theme.dim),
            ));
        }
    }
    Line::from(spans)
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let (text, style) = match &app.status_message {
        Some(msg) if app.status_is_error => (
            msg.clone(),
            Style::default().fg(app.theme.error).add_modifier(Modifier::BOLD),
        ),
        Some(msg) => (msg.clone(), Style::default().fg(app.theme.text)),
        None => (
            "x mark · a/d move marked · A/D all · c category · u/U undo/redo · Enter pick up · ? help"
                .to_string(),
            Style::default().fg(app.theme.dim),
        ),
    };
    frame.render_widget(Paragraph::new(Line::from(Span::styled(text, style))), area);
}

fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let width = 52.min(area.width);
    let height = 16.min(area.height);
    let popup = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };
    let lines: Vec<Line> = [
        "j/k        move cursor",
        "Tab/h/l    switch pane",
        "x          mark column",
        "a / d      add / remove marked columns",
        "A / D      select all / clear all",
        "c          select focused column's category",
        "Enter      pick up column (then arrows, Tab,",
        "           Home/End, Enter commits, Esc cancels)",
        "u / U      undo / redo",
        "q          quit",
        "?          close help",
    ]
    .iter()
    .map(|s| Line::from(Span::styled(s.to_string(), Style::default().fg(app.theme.text))))
    .collect();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.highlight))
        .title(" keys ");
    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

/// Truncate to a display width, appending an ellipsis when cut
fn truncate_width(text: &str, max: usize) -> String {
    let mut width = 0;
    let mut out = String::new();
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if width + w > max.saturating_sub(1) {
            out.push('…');
            return out;
        }
        width += w;
        out.push(ch);
    }
    out
}
