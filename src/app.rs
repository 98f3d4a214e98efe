// App state and main event loop for the terminal preview.
// Maps crossterm mouse input to pointer events, ticks the overlay once per
// frame, and shows what is cached on disk in a second tab.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;
use ratatui::prelude::*;

use crate::cursor::{CursorOverlay, Element, InputProfile, PointerEvent, Target};
use crate::store::CacheStorage;
use crate::ui;

/// Frame interval for the preview loop (~60fps).
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Active tab in the preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Overlay,
    Cache,
}

impl Tab {
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Overlay => "Overlay",
            Tab::Cache => "Cache",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Tab::Overlay => Tab::Cache,
            Tab::Cache => Tab::Overlay,
        }
    }
}

/// An on-screen region standing in for a page element.
pub struct Zone {
    /// Label drawn in the zone.
    pub label: &'static str,
    /// The element the zone stands for, with its ancestor chain.
    pub target: Target,
    /// Screen area, written back by the draw pass.
    pub area: Rect,
}

impl Zone {
    fn new(label: &'static str, target: Target) -> Self {
        Self {
            label,
            target,
            area: Rect::default(),
        }
    }
}

/// What the cache root currently holds, read once at startup.
pub struct CacheSummary {
    pub root: String,
    pub stores: Vec<(String, Vec<String>)>,
    pub error: Option<String>,
}

impl CacheSummary {
    pub fn load() -> Self {
        let storage = match CacheStorage::open() {
            Ok(storage) => storage,
            Err(err) => {
                return Self {
                    root: String::new(),
                    stores: Vec::new(),
                    error: Some(err.to_string()),
                };
            }
        };

        let root = storage.root().display().to_string();
        match storage.store_names() {
            Ok(names) => {
                let mut stores = Vec::with_capacity(names.len());
                for name in names {
                    let keys = storage.store(&name).request_keys().unwrap_or_default();
                    stores.push((name, keys));
                }
                Self {
                    root,
                    stores,
                    error: None,
                }
            }
            Err(err) => Self {
                root,
                stores: Vec::new(),
                error: Some(err.to_string()),
            },
        }
    }
}

/// Main preview state.
pub struct App {
    pub active_tab: Tab,
    pub overlay: Option<CursorOverlay>,
    pub zones: Vec<Zone>,
    pub cache: CacheSummary,
    pub should_quit: bool,
    hovered: Option<usize>,
}

impl App {
    pub fn new(viewport: (f32, f32)) -> Self {
        let zones = vec![
            Zone::new(
                "Browse files",
                Target::of(Element::tag("div").with_class("upload-zone")),
            ),
            Zone::new(
                "Analyse",
                // A span nested inside a button, to exercise ancestor matching.
                Target::nested(vec![Element::tag("span"), Element::tag("button")]),
            ),
            Zone::new("Docs", Target::of(Element::tag("a"))),
            Zone::new("Just text", Target::of(Element::tag("p"))),
        ];

        Self {
            active_tab: Tab::default(),
            overlay: CursorOverlay::mount(viewport, InputProfile::Pointer),
            zones,
            cache: CacheSummary::load(),
            should_quit: false,
            hovered: None,
        }
    }

    /// Main event loop: draw, drain input, advance one frame.
    pub fn run(&mut self, terminal: &mut Terminal<impl Backend>) -> io::Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| ui::draw(frame, self))?;
            self.handle_events()?;
            if let Some(overlay) = self.overlay.as_mut() {
                overlay.tick();
            }
        }
        Ok(())
    }

    /// Handle keyboard and mouse events for one frame.
    fn handle_events(&mut self) -> io::Result<()> {
        if !event::poll(FRAME_INTERVAL)? {
            return Ok(());
        }
        loop {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') => self.should_quit = true,
                    KeyCode::Tab => self.active_tab = self.active_tab.next(),
                    _ => {}
                },
                Event::Mouse(mouse) => self.handle_mouse(mouse),
                _ => {}
            }
            if !event::poll(Duration::ZERO)? {
                return Ok(());
            }
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        for pointer_event in self.pointer_events(mouse) {
            if let Some(overlay) = self.overlay.as_mut() {
                overlay.apply(&pointer_event);
            }
        }
    }

    /// Translate one mouse event into pointer events, synthesizing over/out
    /// pairs when the hovered zone changes.
    fn pointer_events(&mut self, mouse: MouseEvent) -> Vec<PointerEvent> {
        let mut events = Vec::new();
        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                events.push(PointerEvent::Moved {
                    x: mouse.column as f32,
                    y: mouse.row as f32,
                });

                let now = self.zone_at(mouse.column, mouse.row);
                if now != self.hovered {
                    if let Some(prev) = self.hovered {
                        events.push(PointerEvent::Out {
                            target: self.zones[prev].target.clone(),
                        });
                    }
                    if let Some(idx) = now {
                        events.push(PointerEvent::Over {
                            target: self.zones[idx].target.clone(),
                        });
                    }
                    self.hovered = now;
                }
            }
            MouseEventKind::Down(MouseButton::Left) => events.push(PointerEvent::Down),
            MouseEventKind::Up(MouseButton::Left) => events.push(PointerEvent::Up),
            _ => {}
        }
        events
    }

    fn zone_at(&self, column: u16, row: u16) -> Option<usize> {
        self.zones
            .iter()
            .position(|zone| zone.area.contains(Position::new(column, row)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn app_with_zone() -> App {
        let mut app = App::new((80.0, 24.0));
        // Pretend a draw pass placed the first zone.
        app.zones[0].area = Rect::new(10, 5, 20, 3);
        app
    }

    #[test]
    fn test_move_synthesizes_over_and_out() {
        let mut app = app_with_zone();

        let entering = app.pointer_events(mouse(MouseEventKind::Moved, 15, 6));
        assert!(matches!(entering[0], PointerEvent::Moved { .. }));
        assert!(matches!(entering[1], PointerEvent::Over { .. }));

        // Moving within the same zone emits no further over events.
        let inside = app.pointer_events(mouse(MouseEventKind::Moved, 16, 6));
        assert_eq!(inside.len(), 1);

        let leaving = app.pointer_events(mouse(MouseEventKind::Moved, 0, 0));
        assert!(matches!(leaving[1], PointerEvent::Out { .. }));
    }

    #[test]
    fn test_press_and_release_map_to_down_up() {
        let mut app = app_with_zone();

        let down = app.pointer_events(mouse(MouseEventKind::Down(MouseButton::Left), 1, 1));
        assert_eq!(down, vec![PointerEvent::Down]);

        let up = app.pointer_events(mouse(MouseEventKind::Up(MouseButton::Left), 1, 1));
        assert_eq!(up, vec![PointerEvent::Up]);

        // Other buttons are not the primary pointer.
        let right = app.pointer_events(mouse(MouseEventKind::Down(MouseButton::Right), 1, 1));
        assert!(right.is_empty());
    }
}
