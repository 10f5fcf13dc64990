use crate::app::actions::{AppActions, AppEvent};
use crate::app::view_state::{FetchTicket, ViewState};
use crate::climate_actions::ClimateActionsClient;
use crate::config::AppConfig;
use crate::domain::{ClimateAction, HorizonMonths};
use crate::forecast::{ForecastFetcher, ForecastOutcome};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use ratatui::style::Color;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tachyonfx::{fx, Effect, Interpolation};
use throbber_widgets_tui::ThrobberState;
use tokio::sync::mpsc::UnboundedReceiver;

/// Progress of a one-shot background load.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchState<T> {
    #[default]
    NotStarted,
    Loading,
    Success(T),
    Error(String),
}

impl<T> FetchState<T> {
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub const fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            _ => None,
        }
    }

    pub const fn error(&self) -> Option<&String> {
        match self {
            Self::Error(err) => Some(err),
            _ => None,
        }
    }
}

/// Panel shown next to the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidePanel {
    Consequences,
    Actions,
}

impl SidePanel {
    pub const ALL: [Self; 2] = [Self::Consequences, Self::Actions];

    pub const fn index(self) -> usize {
        match self {
            Self::Consequences => 0,
            Self::Actions => 1,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Consequences => "Consequences",
            Self::Actions => "Climate Actions",
        }
    }

    pub const fn next(self) -> Self {
        match self {
            Self::Consequences => Self::Actions,
            Self::Actions => Self::Consequences,
        }
    }
}

pub struct App {
    pub running: bool,
    pub show_help: bool,
    pub status_message: String,
    pub view: ViewState,
    pub side_panel: SidePanel,
    pub climate_actions: FetchState<Vec<ClimateAction>>,
    pub actions: AppActions,
    pub last_frame: Instant,
    pub last_tick: Duration,
    pub throbber_state: ThrobberState,
    pub chart_fx: Mutex<Option<Effect>>,
    events: UnboundedReceiver<AppEvent>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("running", &self.running)
            .field("view", &self.view)
            .field("side_panel", &self.side_panel)
            .field("climate_actions", &self.climate_actions)
            .finish_non_exhaustive()
    }
}

impl App {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let fetcher = ForecastFetcher::new(
            config.forecast_base_url.clone(),
            config.request_timeout,
            config.failure_policy,
        )
        .wrap_err("Failed to build forecast HTTP client")?;
        let climate =
            ClimateActionsClient::new(config.actions_base_url.clone(), config.request_timeout)
                .wrap_err("Failed to build climate actions HTTP client")?;

        let (actions, events) = AppActions::new(fetcher, climate, config.actions_count);
        let mut view = ViewState::new();
        // Seed the slider position without starting a fetch yet.
        view.request(config.initial_horizon);

        Ok(Self::with_actions(view, actions, events))
    }

    pub fn with_actions(
        view: ViewState,
        actions: AppActions,
        events: UnboundedReceiver<AppEvent>,
    ) -> Self {
        Self {
            running: true,
            show_help: false,
            status_message: String::new(),
            view,
            side_panel: SidePanel::Consequences,
            climate_actions: FetchState::NotStarted,
            actions,
            last_frame: Instant::now(),
            last_tick: Duration::ZERO,
            throbber_state: ThrobberState::default(),
            chart_fx: Mutex::new(None),
            events,
        }
    }

    /// Initial loads: the forecast for the configured horizon and the
    /// climate actions list.
    pub fn start(&mut self) {
        self.set_horizon(self.view.requested_months());
        self.climate_actions = FetchState::Loading;
        self.actions.spawn_climate_actions();
    }

    pub fn set_horizon(&mut self, months: i64) {
        match self.view.request(months) {
            Some(ticket) => {
                tracing::info!(horizon = %ticket.horizon, seq = ticket.seq, "requesting forecast");
                self.status_message.clear();
                self.actions.spawn_forecast(ticket);
            }
            None => {
                tracing::debug!(months, "no forecast requested");
                self.status_message.clear();
                self.actions.cancel_in_flight();
            }
        }
    }

    /// Moves the slider by `delta` months within its bounds. A no-op move
    /// does not refetch.
    pub fn step_horizon(&mut self, delta: i64) {
        let next = match self.view.horizon() {
            Some(current) => i64::from(current.step(delta).get()),
            None => delta.clamp(i64::from(HorizonMonths::MIN), i64::from(HorizonMonths::MAX)),
        };
        if next != self.view.requested_months() {
            self.set_horizon(next);
        }
    }

    pub fn jump_horizon(&mut self, months: u8) {
        if self.view.requested_months() != i64::from(months) {
            self.set_horizon(i64::from(months));
        }
    }

    pub fn refresh(&mut self) {
        self.set_horizon(self.view.requested_months());
    }

    pub const fn toggle_side_panel(&mut self) {
        self.side_panel = self.side_panel.next();
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::ForecastFinished { ticket, outcome } => self.apply_forecast(ticket, outcome),
            AppEvent::ClimateActionsFinished(Ok(list)) => {
                self.climate_actions = FetchState::Success(list);
            }
            AppEvent::ClimateActionsFinished(Err(err)) => {
                tracing::warn!(error = ?err, "climate actions unavailable");
                self.climate_actions = FetchState::Error(format!("Error loading actions: {err}"));
            }
        }
    }

    fn apply_forecast(&mut self, ticket: FetchTicket, outcome: ForecastOutcome) {
        let has_points = !outcome.points.is_empty();
        if !self.view.apply(ticket, outcome) {
            return;
        }
        self.status_message = format!("Updated at {}", chrono::Local::now().format("%H:%M:%S"));

        if has_points {
            if let Ok(mut effect) = self.chart_fx.lock() {
                *effect = Some(fx::fade_from_fg(Color::Black, (600, Interpolation::QuadOut)));
            }
        }
    }

    /// Applies every completion that has already arrived.
    pub fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.handle_event(event);
        }
    }

    /// Waits for the next completion and applies it. Returns `false` if the
    /// channel has closed.
    pub async fn process_next_event(&mut self) -> bool {
        match self.events.recv().await {
            Some(event) => {
                self.handle_event(event);
                true
            }
            None => false,
        }
    }

    pub fn update(&mut self) {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame);
        self.last_frame = now;
        self.last_tick = delta;

        if self.view.is_loading() {
            self.throbber_state.calc_next();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn offline_app(initial_horizon: i64) -> App {
        let config = AppConfig {
            forecast_base_url: "http://127.0.0.1:9/api/1/forecast".to_string(),
            actions_base_url: "http://127.0.0.1:9/api/1/actions".to_string(),
            request_timeout: Duration::from_millis(200),
            initial_horizon,
            ..AppConfig::default()
        };
        App::new(&config).unwrap()
    }

    #[test]
    fn fetch_state_accessors() {
        let loading: FetchState<u8> = FetchState::Loading;
        assert!(loading.is_loading());
        assert_eq!(FetchState::Success(3).data(), Some(&3));
        assert_eq!(
            FetchState::<u8>::Error("boom".into()).error().map(String::as_str),
            Some("boom")
        );
    }

    #[test]
    fn side_panel_cycles() {
        assert_eq!(SidePanel::Consequences.next(), SidePanel::Actions);
        assert_eq!(SidePanel::Actions.next().index(), 0);
    }

    #[tokio::test]
    async fn stepping_is_clamped_and_skips_no_op_moves() {
        let mut app = offline_app(119);
        let seq = app.view.latest_seq();

        app.step_horizon(12);
        assert_eq!(app.view.requested_months(), 120);
        assert_eq!(app.view.latest_seq(), seq + 1);

        app.step_horizon(1);
        assert_eq!(app.view.latest_seq(), seq + 1);

        app.jump_horizon(HorizonMonths::MIN);
        assert_eq!(app.view.requested_months(), 1);
        assert!(app.view.is_loading());
    }

    #[tokio::test]
    async fn stepping_up_from_zero_starts_at_the_step() {
        let mut app = offline_app(0);
        assert!(!app.view.is_loading());

        app.step_horizon(1);
        assert_eq!(app.view.requested_months(), 1);
    }

    #[tokio::test]
    async fn climate_action_failure_is_reported_in_panel() {
        let mut app = offline_app(1);
        app.handle_event(AppEvent::ClimateActionsFinished(Err(
            crate::forecast::ForecastError::NetworkUnreachable("refused".into()),
        )));

        let message = app.climate_actions.error().cloned().unwrap_or_default();
        assert!(message.starts_with("Error loading actions: "));
    }
}
