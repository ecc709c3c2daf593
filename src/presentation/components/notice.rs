use ratatui::{
    Frame,
    layout::{Alignment, Size},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::notify::ToastLevel;

use super::super::view::{DialogRender, ToastRender};
use super::layout::{centered, top_right};

const TOAST_MAX_WIDTH: u16 = 48;

/// Toast in the top-right corner, under the tab strip.
pub fn render_toast(frame: &mut Frame<'_>, toast: &ToastRender<'_>) {
    let base = frame.area();
    let (title, color) = match toast.level {
        ToastLevel::Info => ("Info", Color::Cyan),
        ToastLevel::Success => ("Done", Color::Green),
        ToastLevel::Error => ("Error", Color::Red),
    };
    let width = (UnicodeWidthStr::width(toast.message) as u16)
        .saturating_add(4)
        .clamp(16, TOAST_MAX_WIDTH)
        .min(base.width);
    let inner_width = width.saturating_sub(2).max(1) as usize;
    let lines = textwrap::wrap(toast.message, inner_width).len().max(1) as u16;
    let area = top_right(base, Size::new(width, lines.saturating_add(2)), 3);
    frame.render_widget(Clear, area);
    let widget = Paragraph::new(toast.message.to_string())
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );
    frame.render_widget(widget, area);
}

pub fn render_dialog(frame: &mut Frame<'_>, dialog: &DialogRender<'_>) {
    let base = frame.area();
    let width = (UnicodeWidthStr::width(dialog.message) as u16)
        .saturating_add(6)
        .clamp(30, 60)
        .min(base.width);
    let text_lines = textwrap::wrap(dialog.message, width.saturating_sub(4).max(1) as usize).len();
    let area = centered(base, Size::new(width, (text_lines as u16).saturating_add(5)));
    frame.render_widget(Clear, area);

    let chosen = Style::default()
        .fg(Color::Black)
        .bg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let idle = Style::default().fg(Color::Gray);
    let (confirm_style, cancel_style) = if dialog.confirm_selected {
        (chosen, idle)
    } else {
        (idle, chosen)
    };

    let mut lines: Vec<Line<'static>> = textwrap::wrap(
        dialog.message,
        width.saturating_sub(4).max(1) as usize,
    )
    .into_iter()
    .map(|line| Line::from(line.into_owned()))
    .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(format!(" {} ", dialog.confirm_label), confirm_style),
        Span::raw("   "),
        Span::styled(" Cancel ", cancel_style),
    ]));

    let widget = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .title(dialog.title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)),
    );
    frame.render_widget(widget, area);
}
