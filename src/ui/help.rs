use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

fn section(title: &str) -> Line<'_> {
    Line::from(vec![Span::styled(
        format!("  {}", title),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )])
}

fn binding<'a>(keys: &'a str, action: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("    {:<10}", keys), Style::default().fg(Color::Yellow)),
        Span::raw(action),
    ])
}

pub fn render(frame: &mut Frame) {
    let area = super::centered_rect(70, 70, frame.area());

    // Clear the area behind the popup
    frame.render_widget(Clear, area);

    let help_text = vec![
        Line::from(""),
        section("Global"),
        binding("?", "Toggle this help"),
        binding("Ctrl+C", "Quit application"),
        Line::from(""),
        section("Project List"),
        binding("↑/k ↓/j", "Move between cards"),
        binding("g/G", "Jump to first/last card"),
        binding("Enter", "Open case study detail"),
        binding("/ or t", "Type a tag to filter by"),
        binding("Tab", "Cycle through known tags"),
        binding("f", "Toggle featured projects only"),
        binding("o", "Cycle sort order (date/title)"),
        binding("c", "Clear all filters"),
        binding("q", "Quit application"),
        Line::from(""),
        section("Detail"),
        binding("↑/↓", "Scroll the case study"),
        binding("d", "Open live demo"),
        binding("s", "Open source repository"),
        binding("p", "Open case study PDF"),
        binding("y", "Copy first link to clipboard"),
        binding("Esc/q/x", "Close (or click outside)"),
        Line::from(""),
    ];

    let help = Paragraph::new(help_text)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help: Keybindings ")
                .title_bottom(Line::from(" Press any key to close ").style(Style::default().fg(Color::DarkGray))),
        )
        .style(Style::default().fg(Color::White));

    frame.render_widget(help, area);
}
