use crate::app::FetchState;
use crate::domain::ClimateAction;
use crate::ui::widgets::consequences::icon_glyph;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

pub fn action_lines(state: &FetchState<Vec<ClimateAction>>) -> Vec<TextLine<'_>> {
    if let Some(message) = state.error() {
        return vec![TextLine::from(Span::styled(
            message.as_str(),
            Style::default().fg(Color::Red),
        ))];
    }

    let Some(actions) = state.data() else {
        return vec![TextLine::from(Span::styled(
            "Loading climate actions...",
            Style::default().fg(Color::Gray),
        ))];
    };

    if actions.is_empty() {
        return vec![TextLine::from(Span::styled(
            "No climate actions available.",
            Style::default().fg(Color::Gray),
        ))];
    }

    actions
        .iter()
        .flat_map(|action| {
            [
                TextLine::from(vec![
                    Span::raw(format!("{} ", icon_glyph(&action.icon))),
                    Span::styled(
                        action.title.as_str(),
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    ),
                ]),
                TextLine::from(format!("   {}", action.description)),
            ]
        })
        .collect()
}

pub fn render_climate_actions(
    state: &FetchState<Vec<ClimateAction>>,
    f: &mut Frame<'_>,
    area: Rect,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let paragraph = Paragraph::new(Text::from(action_lines(state)))
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}
