use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;

use crate::app::view_state::FetchTicket;
use crate::climate_actions::ClimateActionsClient;
use crate::domain::ClimateAction;
use crate::forecast::{ForecastError, ForecastFetcher, ForecastOutcome};

/// Completions delivered back to the event loop.
#[derive(Debug)]
pub enum AppEvent {
    ForecastFinished {
        ticket: FetchTicket,
        outcome: ForecastOutcome,
    },
    ClimateActionsFinished(Result<Vec<ClimateAction>, ForecastError>),
}

/// Spawns network work and routes the results to the event loop. Never
/// touches view state itself.
#[derive(Debug)]
pub struct AppActions {
    fetcher: Arc<ForecastFetcher>,
    climate: Arc<ClimateActionsClient>,
    actions_count: u8,
    sender: UnboundedSender<AppEvent>,
    in_flight: Option<CancellationToken>,
}

impl AppActions {
    pub fn new(
        fetcher: ForecastFetcher,
        climate: ClimateActionsClient,
        actions_count: u8,
    ) -> (Self, UnboundedReceiver<AppEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let actions = Self {
            fetcher: Arc::new(fetcher),
            climate: Arc::new(climate),
            actions_count,
            sender,
            in_flight: None,
        };
        (actions, receiver)
    }

    /// Starts the fetch for `ticket`, cancelling whatever was still running.
    pub fn spawn_forecast(&mut self, ticket: FetchTicket) {
        let token = CancellationToken::new();
        if let Some(previous) = self.in_flight.replace(token.clone()) {
            previous.cancel();
        }

        let fetcher = Arc::clone(&self.fetcher);
        let sender = self.sender.clone();
        tokio::spawn(async move {
            let requested = i64::from(ticket.horizon.get());
            if let Some(outcome) = fetcher.fetch_forecast(requested, &token).await {
                // The receiver only goes away on shutdown.
                let _ = sender.send(AppEvent::ForecastFinished { ticket, outcome });
            }
        });
    }

    pub fn cancel_in_flight(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
    }

    pub fn spawn_climate_actions(&self) {
        let climate = Arc::clone(&self.climate);
        let sender = self.sender.clone();
        let count = self.actions_count;
        tokio::spawn(async move {
            let result = climate.fetch(count).await;
            let _ = sender.send(AppEvent::ClimateActionsFinished(result));
        });
    }
}

impl Drop for AppActions {
    fn drop(&mut self) {
        self.cancel_in_flight();
    }
}
