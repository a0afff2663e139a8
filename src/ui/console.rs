//! Console prompts and result rendering

use crate::input::Keycode;
use crate::leaderboard::Leaderboard;
use crate::session::{SessionError, SessionEvents, SessionOutcome, MAX_HITS, MIN_HITS};
use crate::ui::theme;
use crossterm::{
    cursor, event, execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use std::io::{self, BufRead, Write};
use std::time::Duration;

/// Raw terminal mode for the duration of a hit test; restored on drop.
pub struct RawModeGuard;

impl RawModeGuard {
    pub fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Clear the screen and home the cursor
pub fn clear_screen() -> io::Result<()> {
    execute!(io::stdout(), Clear(ClearType::All), cursor::MoveTo(0, 0))
}

pub fn show_banner() {
    println!("Tap Speed Test");
    println!();
}

/// Print the current high-score table
pub fn show_high_scores(leaderboard: &Leaderboard) {
    println!("High scores:");
    if leaderboard.is_empty() {
        println!("  (none yet)");
    }
    for (place, score) in leaderboard.entries().iter().enumerate() {
        println!("{}. {score:.2} hits per second", place + 1);
    }
    println!();
}

/// Prompt until a valid hit target is entered.
///
/// Returns `None` when the user asked to quit or stdin closed.
pub fn prompt_target_hits() -> io::Result<Option<u32>> {
    let stdin = io::stdin();
    loop {
        print!("Enter the number of hits (between {MIN_HITS} and {MAX_HITS}): ");
        io::stdout().flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            return Ok(None);
        }
        let input = input.trim();
        if input.eq_ignore_ascii_case("exit") {
            return Ok(None);
        }

        match input.parse::<u32>() {
            Ok(target) if (MIN_HITS..=MAX_HITS).contains(&target) => return Ok(Some(target)),
            _ => print_line(
                &format!("Please enter a valid number between {MIN_HITS} and {MAX_HITS}."),
                theme::ERROR,
            )?,
        }
    }
}

/// Print the result bundle for a finished test
pub fn render_outcome(outcome: &SessionOutcome) -> io::Result<()> {
    println!();
    print_line(
        &format!(
            "Your {} hits have been completed in {:.2} seconds.",
            outcome.target_hits,
            outcome.elapsed.as_secs_f64()
        ),
        theme::SUMMARY,
    )?;
    print_line(
        &format!("Average hit speed: {:.2} hits per second.", outcome.rate),
        theme::SUMMARY,
    )?;
    print_line(
        &format!("Feedback: {}", outcome.tier.message()),
        theme::tier_color(outcome.tier),
    )?;
    if outcome.is_new_high_score {
        print_line("New high score!", theme::HIGH_SCORE)?;
    }
    Ok(())
}

/// Print a recoverable session failure
pub fn render_session_error(err: &SessionError) -> io::Result<()> {
    println!();
    print_line(&format!("Test failed: {err}"), theme::ERROR)
}

/// Discard key presses buffered in the terminal during the run, so stray
/// taps don't leak into the next prompt.
pub fn drain_pending_input() -> io::Result<()> {
    while event::poll(Duration::ZERO)? {
        let _ = event::read()?;
    }
    Ok(())
}

/// Ask whether to run another test. Returns false when the user typed
/// "exit" or stdin closed.
pub fn prompt_retry() -> io::Result<bool> {
    println!();
    println!("Press Enter to try again or type 'exit' to quit.");

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input)? == 0 {
        return Ok(false);
    }
    Ok(!input.trim().eq_ignore_ascii_case("exit"))
}

fn print_line(text: &str, color: Color) -> io::Result<()> {
    execute!(
        io::stdout(),
        SetForegroundColor(color),
        Print(text),
        ResetColor,
        Print("\n")
    )
}

/// Presents in-session progress on the terminal.
///
/// Active while the terminal is in raw mode, so lines end with explicit
/// carriage returns and the hit counter rewrites one line in place.
#[derive(Debug, Default)]
pub struct ConsolePresenter;

impl SessionEvents for ConsolePresenter {
    fn on_awaiting_key(&mut self) {
        print!("Press the key you want to use for counting hits.\r\n");
        let _ = io::stdout().flush();
    }

    fn on_key_registered(&mut self, key: Keycode) {
        print!("Registered key: {key}. Start hitting!\r\n");
        print!("Hits: 0");
        let _ = io::stdout().flush();
    }

    fn on_hit(&mut self, count: u32) {
        print!("\rHits: {count:<4}");
        let _ = io::stdout().flush();
    }
}
