// Terminal preview entry point.
// Sets up the terminal with mouse capture, runs the app loop, restores.

use std::io;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use tracing_subscriber::EnvFilter;

use aura::app::App;

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let mut terminal = ratatui::init();
    execute!(io::stdout(), EnableMouseCapture)?;

    let size = terminal.size()?;
    let mut app = App::new((size.width as f32, size.height as f32));
    let result = app.run(&mut terminal);

    execute!(io::stdout(), DisableMouseCapture)?;
    ratatui::restore();
    result
}
