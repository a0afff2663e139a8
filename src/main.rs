//! tapspeed - terminal tap-speed tester
//!
//! Measures how fast one key can be tapped over a chosen number of hits and
//! keeps a small persisted table of the best rates.

use anyhow::Result;
use crossterm::terminal;
use log::warn;

use tapspeed::{
    clock::MonotonicClock,
    config::Config,
    input::DeviceKeySource,
    leaderboard::{self, Leaderboard},
    session::{SessionController, SessionError},
    timer::{CancelToken, HitTimer},
    ui::{console, ConsolePresenter, RawModeGuard},
};

fn main() -> Result<()> {
    env_logger::init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            warn!("failed to load config, using defaults: {err}");
            Config::default()
        }
    };

    // Ctrl-C aborts the running test and restores the terminal
    let cancel = CancelToken::new();
    {
        let cancel = cancel.clone();
        ctrlc::set_handler(move || {
            cancel.cancel();
            let _ = terminal::disable_raw_mode();
        })?;
    }

    let store = leaderboard::store_path(&config.leaderboard.file_name);
    let board = Leaderboard::load_from(&store, config.leaderboard.capacity);

    let timer = HitTimer::new(
        DeviceKeySource::new(),
        MonotonicClock::new(),
        config.poll_interval(),
    )
    .with_cancel(cancel.clone());
    let mut controller = SessionController::new(timer, board, store);
    let mut presenter = ConsolePresenter;

    loop {
        console::clear_screen()?;
        console::show_banner();
        console::show_high_scores(controller.leaderboard());

        let Some(target) = console::prompt_target_hits()? else {
            break;
        };

        let result = {
            let _raw = RawModeGuard::enable()?;
            controller.run(target, &mut presenter)
        };
        console::drain_pending_input()?;

        match result {
            Ok(outcome) => console::render_outcome(&outcome)?,
            Err(SessionError::Cancelled) => break,
            Err(err) => console::render_session_error(&err)?,
        }

        if cancel.is_cancelled() || !console::prompt_retry()? {
            break;
        }
    }

    Ok(())
}
