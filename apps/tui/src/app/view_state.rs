use crate::domain::{ConsequenceEntry, DataSource, HorizonMonths, PlotPoint};
use crate::forecast::{ForecastError, ForecastOutcome};

/// Identifies one initiated fetch. Only the most recent ticket may write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub horizon: HorizonMonths,
}

/// Everything the forecast panel draws from. Written only through
/// [`ViewState::request`] and [`ViewState::apply`].
#[derive(Debug, Clone)]
pub struct ViewState {
    requested_months: i64,
    points: Vec<PlotPoint>,
    consequences: Vec<ConsequenceEntry>,
    loading: bool,
    error: Option<ForecastError>,
    source: DataSource,
    latest_seq: u64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewState {
    pub const fn new() -> Self {
        Self {
            requested_months: HorizonMonths::DEFAULT.get() as i64,
            points: Vec::new(),
            consequences: Vec::new(),
            loading: false,
            error: None,
            source: DataSource::None,
            latest_seq: 0,
        }
    }

    /// Records a horizon change and invalidates every earlier fetch.
    ///
    /// Returns the ticket to fetch with, or `None` when no forecast is
    /// requested; in that case the empty state is applied immediately.
    pub fn request(&mut self, months: i64) -> Option<FetchTicket> {
        self.latest_seq += 1;

        let Some(horizon) = HorizonMonths::from_requested(months) else {
            self.requested_months = months;
            self.replace(ForecastOutcome::empty());
            return None;
        };

        self.requested_months = i64::from(horizon.get());
        self.loading = true;
        self.error = None;

        Some(FetchTicket {
            seq: self.latest_seq,
            horizon,
        })
    }

    /// Applies a finished fetch if it is still the latest one.
    /// Returns `false` when the outcome was stale and discarded.
    pub fn apply(&mut self, ticket: FetchTicket, outcome: ForecastOutcome) -> bool {
        if ticket.seq != self.latest_seq {
            tracing::debug!(
                stale = ticket.seq,
                latest = self.latest_seq,
                horizon = %ticket.horizon,
                "discarding superseded forecast"
            );
            return false;
        }
        self.replace(outcome);
        true
    }

    fn replace(&mut self, outcome: ForecastOutcome) {
        self.points = outcome.points;
        self.consequences = outcome.consequences;
        self.error = outcome.error;
        self.source = outcome.source;
        self.loading = false;
    }

    pub const fn requested_months(&self) -> i64 {
        self.requested_months
    }

    pub fn horizon(&self) -> Option<HorizonMonths> {
        HorizonMonths::from_requested(self.requested_months)
    }

    pub fn points(&self) -> &[PlotPoint] {
        &self.points
    }

    pub fn consequences(&self) -> &[ConsequenceEntry] {
        &self.consequences
    }

    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    pub const fn error(&self) -> Option<&ForecastError> {
        self.error.as_ref()
    }

    pub const fn source(&self) -> DataSource {
        self.source
    }

    pub const fn latest_seq(&self) -> u64 {
        self.latest_seq
    }
}
