use crate::app::App;
use crate::domain::PlotPoint;
use chrono::NaiveDate;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph};
use ratatui::Frame;
use tachyonfx::EffectRenderer;

pub const HISTORICAL_COLOR: Color = Color::Rgb(0x4b, 0x7b, 0xec);
pub const FORECAST_COLOR: Color = Color::Rgb(0xeb, 0x3b, 0x5a);

/// Upper bound on x-axis labels; longer series are sampled.
pub const MAX_AXIS_LABELS: usize = 12;

pub fn render_forecast_chart(app: &App, f: &mut Frame<'_>, area: Rect) {
    let points = app.view.points();
    let block = Block::default()
        .title(" CO2 emissions (historical vs forecast) ")
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if points.is_empty() {
        let message = if app.view.horizon().is_none() {
            "Select a horizon to see the forecast"
        } else {
            "No data to display"
        };
        let paragraph = Paragraph::new(message)
            .block(block)
            .alignment(Alignment::Center);
        f.render_widget(paragraph, area);
        return;
    }

    let (historical, forecast) = series_coordinates(points);
    let datasets = vec![
        Dataset::default()
            .name("Historical")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(HISTORICAL_COLOR))
            .data(&historical),
        Dataset::default()
            .name("Forecast")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(FORECAST_COLOR))
            .data(&forecast),
    ];

    let [y_min, y_max] = y_bounds(points);
    let x_labels = axis_labels(points, MAX_AXIS_LABELS)
        .into_iter()
        .map(Span::raw)
        .collect::<Vec<_>>();
    let y_labels = vec![
        Span::raw(format!("{y_min:.1}")),
        Span::raw(format!("{:.1}", (y_min + y_max) / 2.0)),
        Span::raw(format!("{y_max:.1}")),
    ];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title("Date")
                .style(Style::default().fg(Color::Gray))
                .bounds(x_bounds(points))
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title("CO2")
                .style(Style::default().fg(Color::Gray))
                .bounds([y_min, y_max])
                .labels(y_labels),
        );

    f.render_widget(chart, area);

    if let Ok(mut effect) = app.chart_fx.lock() {
        if let Some(effect) = effect.as_mut() {
            let buffer = f.buffer_mut();
            buffer.render_effect(effect, area, app.last_tick);
        }
    }
}

/// Splits the series into `(index, value)` pairs per slot.
#[allow(clippy::cast_precision_loss)]
pub fn series_coordinates(points: &[PlotPoint]) -> (Vec<(f64, f64)>, Vec<(f64, f64)>) {
    let mut historical = Vec::new();
    let mut forecast = Vec::new();

    for (index, point) in points.iter().enumerate() {
        let x = index as f64;
        if let Some(value) = point.historical {
            historical.push((x, value));
        }
        if let Some(value) = point.forecast {
            forecast.push((x, value));
        }
    }

    (historical, forecast)
}

#[allow(clippy::cast_precision_loss)]
pub fn x_bounds(points: &[PlotPoint]) -> [f64; 2] {
    [0.0, points.len().saturating_sub(1).max(1) as f64]
}

/// Min and max of every value, padded by 5% of the range.
pub fn y_bounds(points: &[PlotPoint]) -> [f64; 2] {
    let mut values = points.iter().filter_map(PlotPoint::value);
    let Some(first) = values.next() else {
        return [0.0, 1.0];
    };

    let (min, max) = values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let range = max - min;
    let pad = if range > f64::EPSILON { range * 0.05 } else { 1.0 };
    [min - pad, max + pad]
}

/// `YYYY-MM` for ISO dates, otherwise the first seven characters.
pub fn tick_label(date: &str) -> String {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_or_else(
        |_| date.chars().take(7).collect(),
        |parsed| parsed.format("%Y-%m").to_string(),
    )
}

/// Evenly spaced labels covering the first and last point.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn axis_labels(points: &[PlotPoint], max_labels: usize) -> Vec<String> {
    if points.is_empty() || max_labels == 0 {
        return Vec::new();
    }
    if points.len() <= max_labels {
        return points.iter().map(|p| tick_label(&p.date)).collect();
    }
    if max_labels == 1 {
        return vec![tick_label(&points[0].date)];
    }

    let step = (points.len() - 1) as f64 / (max_labels - 1) as f64;
    (0..max_labels)
        .map(|i| {
            let index = ((i as f64) * step).round() as usize;
            tick_label(&points[index.min(points.len() - 1)].date)
        })
        .collect()
}
