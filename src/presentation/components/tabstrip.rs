use std::ops::Range;

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Tabs},
};
use unicode_width::UnicodeWidthStr;

const TAB_PADDING: usize = 2;
const DIVIDER_WIDTH: usize = 1;
const LEFT_MORE: &str = "≪";
const RIGHT_MORE: &str = "≫";

/// One tab per page; scrolls sideways when the titles do not fit.
pub(crate) fn render_tab_strip(
    frame: &mut Frame<'_>,
    area: Rect,
    titles: &[String],
    selected: usize,
    label: &str,
) {
    let block = Block::default().title(label.to_string()).borders(Borders::ALL);
    if titles.is_empty() {
        frame.render_widget(block, area);
        return;
    }

    let widths: Vec<usize> = titles
        .iter()
        .map(|title| UnicodeWidthStr::width(title.as_str()) + TAB_PADDING)
        .collect();
    let selected = selected.min(titles.len() - 1);
    let window = visible_tabs(&widths, selected, area.width.saturating_sub(2) as usize);

    let more = Style::default().fg(Color::DarkGray);
    let lines: Vec<Line<'static>> = window
        .clone()
        .map(|index| {
            let mut spans = Vec::with_capacity(3);
            if index == window.start && window.start > 0 {
                spans.push(Span::styled(LEFT_MORE, more));
            } else {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::raw(titles[index].clone()));
            if index + 1 == window.end && window.end < titles.len() {
                spans.push(Span::styled(RIGHT_MORE, more));
            } else {
                spans.push(Span::raw(" "));
            }
            Line::from(spans)
        })
        .collect();

    let tabs = Tabs::new(lines)
        .block(block)
        .select(selected - window.start)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, area);
}

/// Widest run of tabs around `selected` that fits in `available` columns.
/// Grows to the right first, then to the left; always holds `selected`.
fn visible_tabs(widths: &[usize], selected: usize, available: usize) -> Range<usize> {
    let mut start = selected;
    let mut end = selected + 1;
    let mut used = widths[selected];
    loop {
        let mut grew = false;
        if end < widths.len() && used + DIVIDER_WIDTH + widths[end] <= available {
            used += DIVIDER_WIDTH + widths[end];
            end += 1;
            grew = true;
        }
        if start > 0 && used + DIVIDER_WIDTH + widths[start - 1] <= available {
            start -= 1;
            used += DIVIDER_WIDTH + widths[start];
            grew = true;
        }
        if !grew {
            return start..end;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widths(titles: &[&str]) -> Vec<usize> {
        titles
            .iter()
            .map(|title| title.len() + TAB_PADDING)
            .collect()
    }

    #[test]
    fn all_tabs_show_when_they_fit() {
        let widths = widths(&["Clients", "Ingredients", "Products", "Recipes", "Orders"]);
        let total: usize = widths.iter().sum::<usize>() + DIVIDER_WIDTH * 4;
        assert_eq!(visible_tabs(&widths, 2, total), 0..5);
    }

    #[test]
    fn narrow_strip_keeps_selection_visible() {
        let widths = widths(&["Clients", "Ingredients", "Products", "Recipes", "Orders"]);
        let window = visible_tabs(&widths, 4, 20);
        assert!(window.contains(&4));
        assert!(window.start > 0);
        assert_eq!(window.end, 5);
    }

    #[test]
    fn selection_wider_than_strip_still_shows() {
        let widths = widths(&["Ingredients", "Orders"]);
        assert_eq!(visible_tabs(&widths, 0, 4), 0..1);
    }
}
