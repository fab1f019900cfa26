mod app;
mod config;
mod engine;
mod input;
mod render;
mod terminal;

use app::App;
use clap::Parser;
use config::Args;
use crossterm::event;
use engine::{SnakeEngine, StepResult};
use log::{debug, error, info};
use ratatui::prelude::*;
use simplelog::{Config, WriteLogger};
use std::fs::File;
use std::io;
use std::time::Instant;
use terminal::TerminalSession;

fn main() -> io::Result<()> {
    let args = Args::parse();

    // The terminal belongs to the UI, so logs go to a file
    WriteLogger::init(args.log_level, Config::default(), File::create(&args.log_file)?)
        .map_err(io::Error::other)?;

    let config = args
        .game_config()
        .map_err(|msg| io::Error::new(io::ErrorKind::InvalidInput, msg))?;
    info!("Starting folio-snake with {:?}", config);

    let engine = match args.seed {
        Some(seed) => SnakeEngine::seeded(config, seed),
        None => SnakeEngine::new(config),
    };
    let mut app = App::new(engine);

    let mut session = TerminalSession::enter()?;
    let result = run(session.terminal_mut(), &mut app);
    drop(session);

    if let Err(e) = &result {
        error!("Game loop failed: {}", e);
    }
    info!("Exiting with score {}", app.engine().score());
    result
}

/// Draws, waits for input until the next tick is due, then ticks. Ticks never
/// overlap since everything runs on this one thread.
fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = app.engine().config().tick_interval;
    let mut last_tick = Instant::now();

    while !app.should_quit() {
        terminal.draw(|f| app.render(f))?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            app.handle_event(event::read()?);
        }

        if last_tick.elapsed() >= tick_rate {
            if let StepResult::Nommed(points) = app.tick() {
                debug!("Ate food for {} points", points);
            }
            last_tick = Instant::now();
        }
    }

    Ok(())
}
