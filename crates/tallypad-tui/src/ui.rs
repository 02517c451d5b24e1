//! TUI rendering: formula strip, display, keypad, and session tape.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::App;
use crate::keypad::GridWidget;

/// Application title.
pub const TITLE: &str = " Tallypad ";

/// Key binding hints shown under the tape.
pub const HINTS: &str = " q quit · esc clear · ctrl-l clear tape · click or type keys ";

/// Renders one frame.
///
/// Takes the app mutably to record where the keypad lands, so mouse clicks
/// resolve against the layout actually drawn.
pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    let outer = Block::default()
        .title(TITLE)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(30), Constraint::Length(26)])
        .split(inner);

    render_main(app, frame, columns[0]);

    let keypad_area = keypad_rect(columns[1]);
    app.set_keypad_area(keypad_area);
    frame.render_widget(GridWidget::new(app.grid(), app.last_key()), keypad_area);
}

/// Fixes the keypad at a usable aspect ratio inside its column.
fn keypad_rect(column: Rect) -> Rect {
    Rect {
        x: column.x,
        y: column.y,
        width: column.width.min(26),
        height: column.height.min(12),
    }
}

fn render_main(app: &App, frame: &mut Frame, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Formula strip
            Constraint::Length(3), // Display
            Constraint::Min(3),    // Tape
            Constraint::Length(1), // Hints
        ])
        .split(area);

    render_formula(app, frame, rows[0]);
    render_display(app, frame, rows[1]);
    render_tape(app, frame, rows[2]);
    render_hints(frame, rows[3]);
}

fn render_formula(app: &App, frame: &mut Frame, area: Rect) {
    let paragraph = Paragraph::new(Span::styled(
        app.calculator().formula_window(),
        Style::default().fg(Color::DarkGray),
    ))
    .alignment(Alignment::Right)
    .block(
        Block::default()
            .title(" Formula ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(paragraph, area);
}

fn render_display(app: &App, frame: &mut Frame, area: Rect) {
    let style = if app.calculator().is_error() {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    };

    let paragraph = Paragraph::new(Span::styled(app.calculator().display_window(), style))
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .title(" Display ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        );
    frame.render_widget(paragraph, area);
}

fn render_tape(app: &App, frame: &mut Frame, area: Rect) {
    let visible = area.height.saturating_sub(2) as usize;
    let items: Vec<ListItem> = app
        .calculator()
        .tape()
        .iter_rev()
        .take(visible)
        .map(|entry| {
            ListItem::new(Line::from(vec![
                Span::styled(entry.formula.clone(), Style::default().fg(Color::Gray)),
                Span::raw("="),
                Span::styled(entry.result.clone(), Style::default().fg(Color::Cyan)),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(" Tape (newest first) ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue)),
    );
    frame.render_widget(list, area);
}

fn render_hints(frame: &mut Frame, area: Rect) {
    let paragraph = Paragraph::new(Span::styled(
        HINTS,
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(paragraph, area);
}
