use crate::app::{App, InputMode};
use crate::project::ProjectRecord;
use crate::showcase::FilterSummary;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();
    let view = app.showcase.view();

    // Layout: header(3) + controls(3) + summary(1) + cards(min) + status(1)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    // ── Header ──
    let header_text = format!(" Project Showcase   [{}]", view.count_label);
    let header = Paragraph::new(header_text)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Left)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    frame.render_widget(header, chunks[0]);

    render_controls(app, frame, chunks[1]);
    render_summary(&view.summary, frame, chunks[2]);

    // ── Cards ──
    let cards_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Projects ");

    if app.loading {
        let loading = Paragraph::new("Loading projects...")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(cards_block);
        frame.render_widget(loading, chunks[3]);
    } else if view.no_results {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "No projects match the current filters.",
                Style::default().fg(Color::White),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    " c ",
                    Style::default().bg(Color::Cyan).fg(Color::Black),
                ),
                Span::raw(" Clear filters"),
            ]),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false })
        .block(cards_block);
        frame.render_widget(empty, chunks[3]);
    } else {
        let width = area.width as usize;
        let items: Vec<ListItem> = view.ordered.iter().map(|p| card_item(p, width)).collect();

        let list_widget = List::new(items)
            .block(cards_block.title_bottom(
                Line::from(format!(
                    " {}/{} ({} hidden) ",
                    app.selected + 1,
                    view.ordered.len(),
                    view.cards.iter().filter(|c| !c.visible).count()
                ))
                    .alignment(Alignment::Right),
            ))
            .highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▸ ");

        let mut list_state = ListState::default();
        list_state.select(Some(app.selected));
        frame.render_stateful_widget(list_widget, chunks[3], &mut list_state);
    }

    // ── Status bar ──
    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let status_line = Line::from(vec![
        Span::styled(" ↑↓", key_style),
        Span::raw(" Navigate  "),
        Span::styled("/", key_style),
        Span::raw(" Tag  "),
        Span::styled("f", key_style),
        Span::raw(" Featured  "),
        Span::styled("o", key_style),
        Span::raw(" Sort  "),
        Span::styled("Enter", key_style),
        Span::raw(" Detail  "),
        Span::styled("?", key_style),
        Span::raw(" Help  "),
        Span::styled("q", key_style),
        Span::raw(" Quit  "),
        Span::styled(&app.status_msg, Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(status_line), chunks[4]);
}

fn card_item<'a>(project: &'a ProjectRecord, width: usize) -> ListItem<'a> {
    let star = if project.featured { "★ " } else { "  " };
    let tags = if project.tags.is_empty() {
        String::new()
    } else {
        format!("  [{}]", project.tags.join(", "))
    };
    let date = project.date_completed.format("%Y-%m").to_string();
    let title_width = width.saturating_sub(tags.width() + date.len() + 12);

    let mut lines = vec![Line::from(vec![
        Span::styled(star, Style::default().fg(Color::Yellow)),
        Span::styled(
            truncate_str(&project.title, title_width),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(tags, Style::default().fg(Color::Magenta)),
        Span::styled(format!("  {}", date), Style::default().fg(Color::DarkGray)),
    ])];
    if !project.summary.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("  {}", truncate_str(&project.summary, width.saturating_sub(8))),
            Style::default().fg(Color::DarkGray),
        )));
    }
    ListItem::new(lines)
}

fn render_controls(app: &App, frame: &mut Frame, area: Rect) {
    let editing = app.input_mode == InputMode::Editing;
    let border_style = if editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let filter = app.showcase.filter();

    let tag_label = if editing {
        " Tag (Enter to apply, Esc to cancel): "
    } else {
        " Tag (/): "
    };
    let tag_value = if editing {
        app.tag_input.clone()
    } else {
        filter.active_tag.to_string()
    };
    let featured = if filter.featured_only { "[x]" } else { "[ ]" };

    let line = Line::from(vec![
        Span::styled(tag_label, Style::default().fg(Color::DarkGray)),
        Span::styled(
            tag_value.clone(),
            Style::default().fg(if editing { Color::Yellow } else { Color::White }),
        ),
        Span::styled("   Featured only (f): ", Style::default().fg(Color::DarkGray)),
        Span::styled(featured, Style::default().fg(Color::White)),
        Span::styled("   Sort (o): ", Style::default().fg(Color::DarkGray)),
        Span::styled(filter.sort_order.label(), Style::default().fg(Color::White)),
    ]);

    let controls = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" Filters "),
    );
    frame.render_widget(controls, area);

    if editing {
        let cursor_x = area.x + 1 + tag_label.width() as u16 + tag_value.width() as u16;
        frame.set_cursor_position((cursor_x, area.y + 1));
    }
}

fn render_summary(summary: &FilterSummary, frame: &mut Frame, area: Rect) {
    let mut spans = vec![Span::raw(" ")];
    for chip in &summary.chips {
        spans.push(Span::styled(
            format!(" {} ", chip),
            Style::default().bg(Color::Blue).fg(Color::White),
        ));
        spans.push(Span::raw(" "));
    }
    if summary.show_clear {
        spans.push(Span::styled(
            " c ",
            Style::default().bg(Color::Red).fg(Color::Black),
        ));
        spans.push(Span::raw(" Clear filters"));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Truncate a string to `max_width` display columns, adding "…" if truncated.
pub fn truncate_str(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        result.push(c);
        used += w;
    }
    result.push('…');
    result
}
