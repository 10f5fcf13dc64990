use crate::domain::PlotPoint;
use crate::forecast::normalize::ForecastPayload;

/// Concatenates the historical window and the forecast window into one plot
/// series. Each half keeps its input order; the halves are never interleaved
/// or sorted, even when their date ranges overlap.
///
/// Mismatched date/value lengths are not an error: each half is zipped and
/// silently stops at the shorter side.
pub fn merge<D: AsRef<str>>(
    historical_dates: &[D],
    historical_values: &[f64],
    forecast_dates: &[D],
    forecast_values: &[f64],
) -> Vec<PlotPoint> {
    let historical = historical_dates
        .iter()
        .zip(historical_values)
        .map(|(date, value)| PlotPoint::historical(date.as_ref(), *value));

    let forecast = forecast_dates
        .iter()
        .zip(forecast_values)
        .map(|(date, value)| PlotPoint::forecast(date.as_ref(), *value));

    historical.chain(forecast).collect()
}

pub fn merge_payload(payload: &ForecastPayload) -> Vec<PlotPoint> {
    merge(
        &payload.last_16_dates,
        &payload.last_16_values,
        &payload.dates,
        &payload.predictions,
    )
}
