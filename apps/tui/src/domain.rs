use serde::{Deserialize, Serialize};

/// Number of future months a forecast is requested for.
///
/// Always within `[MIN, MAX]`. Requests at or below zero mean "no forecast"
/// and never produce a value of this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HorizonMonths(u8);

impl HorizonMonths {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 120;
    pub const DEFAULT: Self = Self(1);

    /// Returns `None` for zero or negative requests, clamps anything above `MAX`.
    pub fn from_requested(months: i64) -> Option<Self> {
        if months <= 0 {
            return None;
        }
        let clamped = months.min(i64::from(Self::MAX));
        u8::try_from(clamped).ok().map(Self)
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    pub fn step(self, delta: i64) -> Self {
        let next = (i64::from(self.0) + delta).clamp(i64::from(Self::MIN), i64::from(Self::MAX));
        Self::from_requested(next).unwrap_or(self)
    }
}

impl Default for HorizonMonths {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl std::fmt::Display for HorizonMonths {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One labelled point of the plotted series. Exactly one slot is populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotPoint {
    pub date: String,
    pub historical: Option<f64>,
    pub forecast: Option<f64>,
}

impl PlotPoint {
    pub fn historical(date: impl Into<String>, value: f64) -> Self {
        Self {
            date: date.into(),
            historical: Some(value),
            forecast: None,
        }
    }

    pub fn forecast(date: impl Into<String>, value: f64) -> Self {
        Self {
            date: date.into(),
            historical: None,
            forecast: Some(value),
        }
    }

    pub fn value(&self) -> Option<f64> {
        self.historical.or(self.forecast)
    }
}

pub const DEFAULT_CONSEQUENCE_ICON: &str = "leaf";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsequenceEntry {
    pub description: String,
    pub impact_level: i64,
    pub icon: String,
}

/// Severity bucket of a consequence. Levels outside 1..=5 map to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Critical,
    High,
    Moderate,
    Low,
    Minimal,
    Unknown,
}

impl Severity {
    pub const fn from_level(level: i64) -> Self {
        match level {
            5 => Self::Critical,
            4 => Self::High,
            3 => Self::Moderate,
            2 => Self::Low,
            1 => Self::Minimal,
            _ => Self::Unknown,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::High => "High",
            Self::Moderate => "Moderate",
            Self::Low => "Low",
            Self::Minimal => "Minimal",
            Self::Unknown => "Unrated",
        }
    }
}

/// Where the currently displayed series came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Live,
    Fallback,
    None,
}

impl DataSource {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Live => "live forecast",
            Self::Fallback => "offline snapshot",
            Self::None => "no data",
        }
    }
}

/// A recommended climate action from the actions feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClimateAction {
    pub key: String,
    pub title: String,
    pub description: String,
    pub icon: String,
}

impl ClimateAction {
    pub fn new(key: impl Into<String>, description: impl Into<String>, icon: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            title: key.replace('_', " "),
            key,
            description: description.into(),
            icon: icon.into(),
        }
    }
}
