// UI module for the terminal preview.
// Tab bar, overlay canvas, cache listing, and status bar.

mod cache;
mod overlay;

use ratatui::{prelude::*, widgets::*};

use crate::app::{App, Tab};

/// Main draw function that renders the entire preview.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Tab bar
            Constraint::Min(1),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_tabs(frame, app, chunks[0]);

    match app.active_tab {
        Tab::Overlay => overlay::draw_overlay(frame, app, chunks[1]),
        Tab::Cache => cache::draw_cache(frame, app, chunks[1]),
    }

    draw_status_bar(frame, app, chunks[2]);
}

/// Draw the tab bar at the top of the screen.
fn draw_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let tabs = [Tab::Overlay, Tab::Cache];

    let titles: Vec<Line> = tabs
        .iter()
        .map(|tab| {
            let style = if *tab == app.active_tab {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            Line::from(Span::styled(tab.title(), style))
        })
        .collect();

    let selected = tabs.iter().position(|t| *t == app.active_tab).unwrap_or(0);

    let widget = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" aura ")
                .title_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
        )
        .select(selected)
        .highlight_style(Style::default().fg(Color::Yellow))
        .divider(Span::raw(" | "));

    frame.render_widget(widget, area);
}

/// Draw the status bar with key hints and pointer state.
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled(" q ", Style::default().fg(Color::Yellow)),
        Span::raw("quit  "),
        Span::styled("tab ", Style::default().fg(Color::Yellow)),
        Span::raw("switch  "),
    ];

    if let Some(overlay) = app.overlay.as_ref() {
        if overlay.hover_active() {
            spans.push(Span::styled(
                " hover ",
                Style::default().fg(Color::Black).bg(Color::Yellow),
            ));
        }
        if overlay.pressed() {
            spans.push(Span::styled(
                " pressed ",
                Style::default().fg(Color::Black).bg(Color::Cyan),
            ));
        }
    }

    let bar = Paragraph::new(Line::from(spans)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(bar, area);
}
