use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::io::{self, IsTerminal, Write};

/// Whether the binary should wait for a key before exiting.
///
/// Never pauses when stdin is not a terminal, so piped and scripted runs exit
/// straight away.
pub fn should_pause(requested: bool) -> bool {
    requested && io::stdin().is_terminal()
}

/// Holds the terminal in raw mode and restores it on drop.
struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

/// `true` for the event that ends the pause: any key going down.
fn ends_pause(event: &Event) -> bool {
    matches!(event, Event::Key(key) if key.kind == KeyEventKind::Press)
}

/// Prompts and blocks until a single key is pressed.
///
/// The terminal is in raw mode while waiting, so the key is neither echoed
/// nor buffered until Enter.
pub fn wait_for_keypress() -> io::Result<()> {
    let mut stdout = io::stdout();
    write!(stdout, "Press any key to exit...")?;
    stdout.flush()?;

    {
        let _raw = RawModeGuard::enter()?;
        while !ends_pause(&event::read()?) {}
    }

    writeln!(stdout)?;
    Ok(())
}
