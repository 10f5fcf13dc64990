use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use crossterm::{
    cursor, execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{stdout, Stdout, Write};

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Enters raw mode and the alternate screen. Whatever was already switched on
/// is switched back off if a later step fails.
pub fn setup_terminal() -> Result<Tui> {
    let (width, height) = crossterm::terminal::size().unwrap_or((80, 24));
    tracing::debug!(width, height, "setting up terminal");

    enable_raw_mode().wrap_err("Failed to enable raw mode")?;

    if let Err(err) = execute!(stdout(), EnterAlternateScreen, cursor::Hide) {
        cleanup_terminal_state(true, false);
        return Err(err).wrap_err("Failed to enter alternate screen");
    }

    let mut terminal = match Terminal::new(CrosstermBackend::new(stdout())) {
        Ok(terminal) => terminal,
        Err(err) => {
            cleanup_terminal_state(true, true);
            return Err(err).wrap_err("Failed to create terminal");
        }
    };

    if let Err(err) = terminal.clear() {
        tracing::warn!(error = %err, "failed to clear terminal");
    }

    install_panic_hook();
    Ok(terminal)
}

/// Restores the terminal before the panic report is printed, so the report is readable.
fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        cleanup_terminal_state(true, true);
        previous(info);
    }));
}

/// Undoes [`setup_terminal`]. Each step is attempted even if an earlier one fails.
pub fn cleanup_terminal_state(raw_mode: bool, alternate_screen: bool) {
    let mut out = stdout();

    if let Err(err) = execute!(out, cursor::Show) {
        tracing::warn!(error = %err, "failed to show cursor");
    }

    if alternate_screen {
        if let Err(err) = execute!(out, LeaveAlternateScreen) {
            tracing::warn!(error = %err, "failed to leave alternate screen");
        }
    }

    if raw_mode {
        if let Err(err) = disable_raw_mode() {
            tracing::warn!(error = %err, "failed to disable raw mode");
        }
    }

    let _ = out.flush();
    tracing::debug!("terminal restored");
}
