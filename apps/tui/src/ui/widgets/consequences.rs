use crate::domain::{ConsequenceEntry, Severity};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

pub const fn impact_color(level: i64) -> Color {
    match Severity::from_level(level) {
        Severity::Critical => Color::Rgb(0xeb, 0x3b, 0x5a),
        Severity::High => Color::Rgb(0xf0, 0xad, 0x4e),
        Severity::Moderate => Color::Rgb(0xff, 0xd7, 0x00),
        Severity::Low => Color::Rgb(0x5d, 0xde, 0x95),
        Severity::Minimal => Color::Rgb(0x2e, 0xd5, 0x73),
        Severity::Unknown => Color::Gray,
    }
}

/// Terminal glyph for an icon name; unknown names get a bullet.
pub fn icon_glyph(icon: &str) -> &'static str {
    match icon {
        "temperature-high" => "🌡",
        "droplet" | "tint" => "💧",
        "cloud-showers-heavy" => "🌧",
        "snowflake" => "❄",
        "leaf" | "seedling" | "tree" => "🌿",
        "bolt" | "plug" | "charging-station" => "⚡",
        "solar-panel" => "☀",
        "recycle" | "trash-alt" => "♻",
        "lightbulb" => "💡",
        "bus" | "plane" => "🚌",
        "home" => "🏠",
        _ => "•",
    }
}

pub fn consequence_lines(consequences: &[ConsequenceEntry]) -> Vec<TextLine<'_>> {
    if consequences.is_empty() {
        return vec![TextLine::from(Span::styled(
            "No consequences available.",
            Style::default().fg(Color::Gray),
        ))];
    }

    let mut lines = vec![
        TextLine::from(Span::styled(
            format!("Showing {} consequences", consequences.len()),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        TextLine::from(""),
    ];

    for entry in consequences {
        let color = impact_color(entry.impact_level);
        lines.push(TextLine::from(vec![
            Span::styled(format!("{} ", icon_glyph(&entry.icon)), Style::default().fg(color)),
            Span::raw(entry.description.as_str()),
        ]));
        lines.push(TextLine::from(Span::styled(
            format!(
                "   Impact: {}/5 ({})",
                entry.impact_level,
                Severity::from_level(entry.impact_level).label()
            ),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));
    }

    lines
}

pub fn render_consequences(consequences: &[ConsequenceEntry], f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let paragraph = Paragraph::new(Text::from(consequence_lines(consequences)))
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}
