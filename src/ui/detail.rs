use crate::app::App;
use crate::showcase::{DetailView, LinkKind};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

/// Screen area of the detail overlay for a given terminal area. Clicks
/// outside it dismiss the overlay.
pub fn overlay_rect(area: Rect) -> Rect {
    super::centered_rect(80, 80, area)
}

pub fn render(app: &App, frame: &mut Frame) {
    let Some(detail) = app.showcase.detail() else {
        return;
    };
    let area = overlay_rect(frame.area());

    // Clear the cards behind the overlay
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            format!(" {} ", detail.title),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ))
        .title_bottom(
            Line::from(" Esc close  d/s/p open link  y copy  ↑↓ scroll ")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Right),
        );
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let header = header_lines(detail);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(header.len() as u16),
            Constraint::Min(1),
        ])
        .split(inner);

    frame.render_widget(Paragraph::new(header).wrap(Wrap { trim: true }), chunks[0]);

    // ── Case study narrative ──
    let narrative = format!(
        "## Problem\n\n{}\n\n## Solution\n\n{}\n\n## Outcome\n\n{}\n",
        detail.problem, detail.solution, detail.outcome
    );
    let mut text = vec![Line::from("")];
    text.extend(tui_markdown::from_str(&narrative).lines);

    let body = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .scroll((app.detail_scroll, 0));
    frame.render_widget(body, chunks[1]);
}

fn header_lines(detail: &DetailView) -> Vec<Line<'_>> {
    let label = Style::default().fg(Color::DarkGray);

    let image = if detail.image.is_empty() {
        vec![
            Span::styled(" Image: ", label),
            Span::styled(detail.image_alt.as_str(), Style::default().fg(Color::White)),
        ]
    } else {
        vec![
            Span::styled(" Image: ", label),
            Span::styled(detail.image.as_str(), Style::default().fg(Color::Blue)),
            Span::styled(
                format!("  \"{}\"", detail.image_alt),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::ITALIC),
            ),
        ]
    };

    let metrics = vec![
        Span::styled(" Improvement: ", label),
        Span::styled(detail.improvement.as_str(), Style::default().fg(Color::Green)),
        Span::styled("   Timeline: ", label),
        Span::styled(detail.timeline.as_str(), Style::default().fg(Color::White)),
        Span::styled("   Scale: ", label),
        Span::styled(detail.scale.as_str(), Style::default().fg(Color::White)),
    ];

    let mut badges = vec![Span::styled(" Stack: ", label)];
    for tech in &detail.technologies {
        badges.push(Span::styled(
            format!("[{}]", tech),
            Style::default().fg(Color::Cyan),
        ));
        badges.push(Span::raw(" "));
    }

    let mut lines = vec![Line::from(image), Line::from(metrics), Line::from(badges)];
    for link in &detail.links {
        let key = match link.kind {
            LinkKind::Demo => "d",
            LinkKind::Source => "s",
            LinkKind::CaseStudyPdf => "p",
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!(" {} ", key),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("{}: ", link.kind.label()), label),
            Span::styled(
                link.url.as_str(),
                Style::default()
                    .fg(Color::Blue)
                    .add_modifier(Modifier::UNDERLINED),
            ),
        ]));
    }
    lines
}
