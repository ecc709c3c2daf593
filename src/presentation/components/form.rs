use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};

use super::super::view::{FieldRender, FormRender};
use super::text::truncate;

pub fn render_form(frame: &mut Frame<'_>, area: Rect, form: &FormRender) {
    let border_style = if form.active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };
    let block = Block::default()
        .title(format!("{} [{}]", form.title, form.mode))
        .borders(Borders::ALL)
        .border_style(border_style);

    let content_width = area.width.saturating_sub(6) as usize;
    let mut selected = None;
    let items: Vec<ListItem<'static>> = form
        .fields
        .iter()
        .enumerate()
        .map(|(index, field)| {
            if field.focused {
                selected = Some(index);
            }
            ListItem::new(field_lines(field, form.active, content_width))
        })
        .collect();

    let mut state = ListState::default();
    state.select(selected.filter(|_| form.active));
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("» ");
    frame.render_stateful_widget(list, area, &mut state);

    if form.active
        && let Some(index) = selected
        && let Some(field) = form.fields.get(index)
        && !field.read_only
    {
        let lines_before: usize = form.fields[..index]
            .iter()
            .map(|field| 2 + usize::from(field.error.is_some()))
            .sum();
        let row = lines_before.saturating_add(1);
        if row < area.height.saturating_sub(2) as usize {
            let value_width = truncate(&field.value, content_width).chars().count();
            let x = area.x + 1 + 2 + 2 + value_width as u16;
            let y = area.y + 1 + row as u16;
            frame.set_cursor_position((x.min(area.right().saturating_sub(2)), y));
        }
    }
}

fn field_lines(field: &FieldRender, active: bool, width: usize) -> Vec<Line<'static>> {
    let label_style = if field.focused && active {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    };
    let mut label = field.label.clone();
    if field.read_only {
        label.push_str(" (read only)");
    }
    let value_style = if field.read_only {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::White)
    };
    let mut lines = vec![
        Line::from(Span::styled(label, label_style)),
        Line::from(vec![
            Span::raw("  "),
            Span::styled(truncate(&field.value, width), value_style),
        ]),
    ];
    if let Some(error) = &field.error {
        lines.push(Line::from(Span::styled(
            format!("  ⚠ {error}"),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
    }
    lines
}
