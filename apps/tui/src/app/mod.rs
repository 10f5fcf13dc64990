// App module for co2_forecast
// Holds view state and dispatches background fetches

pub mod actions;
pub mod input;
pub mod state;
pub mod view_state;

pub use actions::{AppActions, AppEvent};
pub use input::handle_input;
pub use state::{App, FetchState, SidePanel};
pub use view_state::{FetchTicket, ViewState};
