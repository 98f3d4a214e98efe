// Cache tab rendering.
// Lists every store version under the cache root and the request identities
// it holds.

use ratatui::{prelude::*, widgets::*};

use crate::app::App;

/// Draw the cache listing.
pub fn draw_cache(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" cached responses ");

    let mut lines: Vec<Line> = Vec::new();

    if let Some(error) = &app.cache.error {
        lines.push(Line::from(Span::styled(
            error.as_str(),
            Style::default().fg(Color::Red),
        )));
    } else if app.cache.stores.is_empty() {
        lines.push(Line::from(Span::styled(
            "nothing cached yet",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            app.cache.root.as_str(),
            Style::default().fg(Color::DarkGray),
        )));
        lines.push(Line::default());

        for (name, keys) in &app.cache.stores {
            lines.push(Line::from(vec![
                Span::styled(
                    name.as_str(),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  ({} entries)", keys.len()),
                    Style::default().fg(Color::DarkGray),
                ),
            ]));
            for key in keys {
                lines.push(Line::from(format!("  {key}")));
            }
            lines.push(Line::default());
        }
    }

    let listing = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(listing, area);
}
