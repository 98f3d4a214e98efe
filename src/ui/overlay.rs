// Overlay tab rendering.
// Interactive zones plus the three follower layers drawn directly into the
// buffer, glow first so the dot stays on top.

use ratatui::{prelude::*, widgets::*};

use crate::app::App;
use crate::cursor::{Layer, LayerKind};

/// Draw the overlay canvas: zones first, then the follower layers.
pub fn draw_overlay(frame: &mut Frame, app: &mut App, area: Rect) {
    // The canvas border doubles as the hover marker the host page would put
    // on its body element.
    let hover = app
        .overlay
        .as_ref()
        .is_some_and(|overlay| overlay.hover_active());
    let border_style = if hover {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let canvas = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(" move the mouse ");
    let inner = canvas.inner(area);
    frame.render_widget(canvas, area);

    draw_zones(frame, app, inner);

    let layers = match app.overlay.as_ref() {
        Some(overlay) => overlay.layers(),
        None => return,
    };
    for layer in layers {
        draw_layer(frame.buffer_mut(), inner, layer);
    }
}

/// Lay out the interactive zones in a row and record where they landed so
/// the event loop can hit-test against them.
fn draw_zones(frame: &mut Frame, app: &mut App, area: Rect) {
    if area.height < 4 {
        return;
    }
    let row = Rect {
        x: area.x + 1,
        y: area.y + 1,
        width: area.width.saturating_sub(2),
        height: 3,
    };

    let constraints: Vec<Constraint> = app
        .zones
        .iter()
        .map(|zone| Constraint::Length(zone.label.len() as u16 + 4))
        .collect();
    let slots = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(row);

    for (zone, slot) in app.zones.iter_mut().zip(slots.iter()) {
        zone.area = *slot;

        let style = if zone.target.is_interactive() {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default().borders(Borders::ALL).border_style(style);
        let label = Paragraph::new(zone.label)
            .alignment(Alignment::Center)
            .style(style)
            .block(block);
        frame.render_widget(label, *slot);
    }
}

/// Paint one follower layer as a glyph, clamped to the canvas.
fn draw_layer(buf: &mut Buffer, area: Rect, layer: Layer) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let x = (layer.pos.x.round() as i32)
        .clamp(area.x as i32, (area.x + area.width - 1) as i32) as u16;
    let y = (layer.pos.y.round() as i32)
        .clamp(area.y as i32, (area.y + area.height - 1) as i32) as u16;

    let pressed = layer.scale < 1.0;
    let (symbol, style) = match layer.kind {
        LayerKind::Glow => ("\u{25CC}", Style::default().fg(Color::Magenta)), // ◌
        LayerKind::Ring => {
            let symbol = if pressed { "\u{2218}" } else { "\u{25EF}" }; // ∘ / ◯
            (symbol, Style::default().fg(Color::Cyan))
        }
        LayerKind::Dot => {
            let symbol = if pressed { "\u{2022}" } else { "\u{25CF}" }; // • / ●
            (symbol, Style::default().fg(Color::White))
        }
    };

    if let Some(cell) = buf.cell_mut((x, y)) {
        cell.set_symbol(symbol);
        cell.set_style(style);
    }
}
