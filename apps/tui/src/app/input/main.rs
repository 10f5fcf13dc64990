use crate::app::input::helpers::horizon_delta;
use crate::app::state::App;
use crate::domain::HorizonMonths;
use crossterm::event::KeyCode;

pub fn handle_main_input(app: &mut App, key: KeyCode) {
    if let Some(delta) = horizon_delta(key) {
        app.step_horizon(delta);
        return;
    }

    match key {
        KeyCode::Home => app.jump_horizon(HorizonMonths::MIN),
        KeyCode::End => app.jump_horizon(HorizonMonths::MAX),
        KeyCode::Char('r') => app.refresh(),
        KeyCode::Tab => app.toggle_side_panel(),
        KeyCode::Char('q') => app.running = false,
        _ => {}
    }
}
