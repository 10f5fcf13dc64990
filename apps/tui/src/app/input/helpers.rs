use crossterm::event::KeyCode;

/// Months moved per key on the horizon slider.
pub const fn horizon_delta(key: KeyCode) -> Option<i64> {
    match key {
        KeyCode::Left => Some(-1),
        KeyCode::Right => Some(1),
        KeyCode::Down => Some(-12),
        KeyCode::Up => Some(12),
        _ => None,
    }
}
