use crate::app::{App, SidePanel};
use crate::domain::HorizonMonths;
use crate::ui::widgets::actions::render_climate_actions;
use crate::ui::widgets::charts::render_forecast_chart;
use crate::ui::widgets::consequences::render_consequences;
use crate::ui::widgets::popup::centered_rect;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, LineGauge, Paragraph, Tabs, Wrap};
use ratatui::Frame;
use throbber_widgets_tui::{Throbber, WhichUse, BRAILLE_SIX};

pub fn render_main(app: &App, f: &mut Frame<'_>) {
    let main_layout = build_main_layout(f);

    render_title_section(app, f, main_layout[0]);
    render_content_section(app, f, main_layout[1]);
    render_status_section(app, f, main_layout[2]);
    render_shortcuts(f, main_layout[3]);

    if app.show_help {
        let area = f.area();
        render_help_popup(f, area);
    }
}

fn build_main_layout(f: &Frame<'_>) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Title and horizon slider
            Constraint::Min(10),   // Chart and side panel
            Constraint::Length(3), // Status area
            Constraint::Length(1), // Shortcuts hint
        ])
        .split(f.area().inner(Margin::new(1, 0)))
        .to_vec()
}

fn render_title_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let title_block = Block::default()
        .title("== CO2 Emissions Forecast ==")
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    f.render_widget(title_block, area);

    let inner = area.inner(Margin::new(1, 1));
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(24), Constraint::Min(10)])
        .split(inner);

    let months = app.view.requested_months();
    let label = Paragraph::new(TextLine::from(vec![
        Span::styled("Horizon: ", Style::default().fg(Color::Gray)),
        Span::styled(
            format!("{months} months"),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
    ]));
    f.render_widget(label, chunks[0]);

    let gauge = LineGauge::default()
        .filled_style(Style::default().fg(Color::Cyan))
        .unfilled_style(Style::default().fg(Color::DarkGray))
        .label(format!("{}-{}", HorizonMonths::MIN, HorizonMonths::MAX))
        .ratio(slider_ratio(months));
    f.render_widget(gauge, chunks[1]);
}

/// Position of the horizon on the 1..=120 slider, in `[0, 1]`.
pub fn slider_ratio(months: i64) -> f64 {
    let min = f64::from(HorizonMonths::MIN);
    let max = f64::from(HorizonMonths::MAX);
    #[allow(clippy::cast_precision_loss)]
    let value = months as f64;
    ((value - min) / (max - min)).clamp(0.0, 1.0)
}

fn render_content_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    if app.view.is_loading() {
        render_loading(app, f, chunks[0]);
    } else if let Some(error) = app.view.error() {
        render_error(&error.to_string(), f, chunks[0]);
    } else {
        render_forecast_chart(app, f, chunks[0]);
    }

    render_side_panel(app, f, chunks[1]);
}

fn render_loading(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(" CO2 emissions (historical vs forecast) ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let spinner_area = Rect {
        x: inner.x + inner.width.saturating_sub(24) / 2,
        y: inner.y + inner.height / 2,
        width: inner.width.min(24),
        height: 1.min(inner.height),
    };

    let throbber = Throbber::default()
        .label("Loading forecast...")
        .style(Style::default().fg(Color::Gray))
        .throbber_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .throbber_set(BRAILLE_SIX)
        .use_type(WhichUse::Spin);
    let mut state = app.throbber_state.clone();
    f.render_stateful_widget(throbber, spinner_area, &mut state);
}

fn render_error(message: &str, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(" Error ")
        .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let text = Text::from(vec![
        TextLine::from(""),
        TextLine::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::Red),
        )),
        TextLine::from(""),
        TextLine::from(Span::styled(
            "Press r to retry",
            Style::default().fg(Color::Gray),
        )),
    ]);

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_side_panel(app: &App, f: &mut Frame<'_>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3)])
        .split(area);

    let titles = SidePanel::ALL
        .iter()
        .map(|panel| TextLine::from(panel.label()))
        .collect::<Vec<_>>();
    let tabs = Tabs::new(titles)
        .select(app.side_panel.index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        .divider(Span::raw("|"));
    f.render_widget(tabs, chunks[0]);

    match app.side_panel {
        SidePanel::Consequences => render_consequences(app.view.consequences(), f, chunks[1]),
        SidePanel::Actions => render_climate_actions(&app.climate_actions, f, chunks[1]),
    }
}

fn render_status_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let status_block = Block::default()
        .title(" Status ")
        .title_style(Style::default().fg(Color::Yellow))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let line = status_line(app);
    let status_paragraph = Paragraph::new(line)
        .block(status_block)
        .wrap(Wrap { trim: true });
    f.render_widget(status_paragraph, area);
}

fn status_line(app: &App) -> TextLine<'_> {
    if app.view.is_loading() {
        return TextLine::from(Span::styled(
            format!("Fetching {} month forecast...", app.view.requested_months()),
            Style::default().fg(Color::Cyan),
        ));
    }

    if let Some(error) = app.view.error() {
        return TextLine::from(Span::styled(
            format!("Error: {error}"),
            Style::default().fg(Color::Red),
        ));
    }

    let mut spans = vec![
        Span::styled("Source: ", Style::default().fg(Color::Gray)),
        Span::styled(
            app.view.source().label(),
            Style::default().fg(Color::Green),
        ),
    ];
    if !app.status_message.is_empty() {
        spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
        spans.push(Span::raw(app.status_message.as_str()));
    }
    TextLine::from(spans)
}

fn render_shortcuts(f: &mut Frame<'_>, area: Rect) {
    let shortcuts_paragraph = Paragraph::new(shortcuts_line()).alignment(Alignment::Center);
    f.render_widget(shortcuts_paragraph, area);
}

fn key_span(key: &'static str) -> Span<'static> {
    Span::styled(
        key,
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    )
}

fn hint_span(text: &'static str) -> Span<'static> {
    Span::styled(text, Style::default().fg(Color::Gray))
}

fn shortcuts_line() -> TextLine<'static> {
    TextLine::from(vec![
        key_span("?"),
        hint_span(": Help | "),
        key_span("←/→"),
        hint_span(": ±1 month | "),
        key_span("↓/↑"),
        hint_span(": ±1 year | "),
        key_span("r"),
        hint_span(": Refresh | "),
        key_span("Tab"),
        hint_span(": Panel | "),
        key_span("q"),
        hint_span(": Quit"),
    ])
}

fn render_help_popup(f: &mut Frame<'_>, area: Rect) {
    let popup_area = centered_rect(70, 70, area);
    f.render_widget(Clear, popup_area);

    let help_block = Block::default()
        .title("== Help & Keyboard Shortcuts ==")
        .title_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let help_paragraph = Paragraph::new(Text::from(build_help_lines()))
        .block(help_block)
        .wrap(Wrap { trim: true });
    f.render_widget(help_paragraph, popup_area);

    let hint = Paragraph::new(hint_span("Press ? or Esc to close")).alignment(Alignment::Center);
    let hint_area = Rect {
        x: popup_area.x,
        y: popup_area.y + popup_area.height.saturating_sub(2),
        width: popup_area.width,
        height: 1,
    };
    f.render_widget(hint, hint_area);
}

fn help_entry(key: &'static str, description: &'static str) -> TextLine<'static> {
    TextLine::from(vec![
        key_span(key),
        Span::raw(format!(" - {description}")),
    ])
}

fn build_help_lines() -> Vec<TextLine<'static>> {
    let mut lines = vec![
        TextLine::from(Span::styled(
            "CO2 Emissions Forecast",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        TextLine::from(""),
        TextLine::from(
            "Historical emissions in blue, forecast in red. Choose how many months to forecast with the slider.",
        ),
        TextLine::from(""),
        TextLine::from(Span::styled(
            "Keyboard Shortcuts:",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        help_entry("  Left/Right", "One month shorter/longer"),
        help_entry("  Down/Up", "One year shorter/longer"),
        help_entry("  Home/End", "Jump to 1 or 120 months"),
        help_entry("  r", "Fetch the current horizon again"),
        help_entry("  Tab", "Switch between consequences and climate actions"),
        help_entry("  ? / F1", "Toggle this help popup"),
        help_entry("  q", "Quit"),
        TextLine::from(""),
        TextLine::from(Span::styled(
            "Command line:",
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];

    let help_text = crate::cli::CliArgs::help_text();
    for line in help_text.lines() {
        lines.push(TextLine::from(line.to_string()));
    }

    lines
}
