//! Terminal runner (default binary).
//!
//! Uses crossterm for input and the framebuffer renderer for output. Logs go
//! to a file since the terminal belongs to the renderer.

use std::fs::OpenOptions;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use log::{info, trace, warn};

use tui_blockfall::core::{Game, GameSnapshot};
use tui_blockfall::input::{handle_key_event, resolve_action, should_quit};
use tui_blockfall::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use tui_blockfall::HostConfig;

fn main() -> Result<()> {
    let config = HostConfig::from_env();
    init_logging(&config)?;
    info!(
        "starting: tick {}ms, {} randomizer, seed {:?}",
        config.tick_ms,
        config.randomizer.as_str(),
        config.seed
    );

    let mut term = TerminalRenderer::new();
    let result = term.enter().and_then(|()| run(&mut term, &config));

    // Always try to restore terminal state.
    if let Err(err) = term.exit() {
        warn!("failed to restore terminal: {err:#}");
    }
    result
}

fn init_logging(config: &HostConfig) -> Result<()> {
    let Some(path) = config.log_path.as_deref() else {
        return Ok(());
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {path}"))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_module_path(false)
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn run(term: &mut TerminalRenderer, config: &HostConfig) -> Result<()> {
    let mut game = Game::with_generator(config.piece_generator());
    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut snap = GameSnapshot::default();

    let clock = Instant::now();
    let now_ms = || clock.elapsed().as_millis() as u64;
    let tick_duration = Duration::from_millis(u64::from(config.tick_ms));
    let mut last_tick = Instant::now();

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        game.snapshot_into(&mut snap);
        view.render_into(&snap, Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if should_quit(key) {
                        info!(
                            "quit: score {} level {} lines {}",
                            game.score(),
                            game.level(),
                            game.lines()
                        );
                        return Ok(());
                    }
                    if let Some(action) = handle_key_event(key) {
                        let action = resolve_action(action, game.state());
                        if !game.apply_action(action, now_ms()) {
                            trace!(
                                "{} ignored while {}",
                                action.as_str(),
                                game.state().as_str()
                            );
                        }
                    }
                }
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            game.update(now_ms());
            if let Some(event) = game.take_last_event() {
                trace!(
                    "{} locked, {} line(s)",
                    event.kind.as_str(),
                    event.lines_cleared
                );
            }
        }
    }
}
