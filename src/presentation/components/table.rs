use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
};

use super::super::view::{GridRender, TableRender};
use super::text::truncate;

/// Record list: one row per stored record.
pub fn render_list(frame: &mut Frame<'_>, area: Rect, table: &TableRender, focused: bool) {
    let rows = table
        .rows
        .iter()
        .map(|cells| plain_row(table, cells))
        .collect::<Vec<_>>();
    let widget = base_table(table, rows, "Records", focused);
    let mut state = TableState::default();
    state.select(table.selected);
    frame.render_stateful_widget(widget, area, &mut state);
}

/// Items grid: the cursor cell is highlighted, and replaced by the editor
/// buffer while a cell edit is open.
pub fn render_grid(frame: &mut Frame<'_>, area: Rect, grid: &GridRender) {
    let table = &grid.table;
    let rows = table
        .rows
        .iter()
        .enumerate()
        .map(|(index, cells)| {
            if grid.focused && table.selected == Some(index) {
                cursor_row(table, cells, grid.cursor_column, grid.editor.as_deref())
            } else {
                plain_row(table, cells)
            }
        })
        .collect::<Vec<_>>();
    let widget = base_table(table, rows, "Items", grid.focused);
    let mut state = TableState::default();
    state.select(table.selected);
    frame.render_stateful_widget(widget, area, &mut state);
}

fn base_table<'a>(table: &TableRender, rows: Vec<Row<'a>>, title: &str, focused: bool) -> Table<'a> {
    let header = Row::new(
        table
            .headers
            .iter()
            .map(|(title, _)| Cell::from(title.clone()))
            .collect::<Vec<_>>(),
    )
    .style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );
    let widths = table
        .headers
        .iter()
        .map(|(_, width)| Constraint::Length(*width))
        .collect::<Vec<_>>();
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };
    let mut block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(border_style);
    if !table.caption.is_empty() {
        block = block.title_bottom(Line::from(Span::styled(
            format!(" {} ", table.caption),
            Style::default().fg(Color::Gray),
        )));
    }
    let highlight = if focused {
        Style::default().bg(Color::DarkGray)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(highlight)
        .highlight_symbol("» ")
}

fn plain_row<'a>(table: &TableRender, cells: &[String]) -> Row<'a> {
    Row::new(
        cells
            .iter()
            .zip(&table.headers)
            .map(|(value, (_, width))| Cell::from(truncate(value, *width as usize)))
            .collect::<Vec<_>>(),
    )
}

fn cursor_row<'a>(
    table: &TableRender,
    cells: &[String],
    column: usize,
    editor: Option<&str>,
) -> Row<'a> {
    Row::new(
        cells
            .iter()
            .zip(&table.headers)
            .enumerate()
            .map(|(index, (value, (_, width)))| {
                let width = *width as usize;
                if index != column {
                    return Cell::from(truncate(value, width));
                }
                match editor {
                    Some(buffer) => Cell::from(truncate(&format!("{buffer}▏"), width)).style(
                        Style::default()
                            .fg(Color::Black)
                            .bg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    ),
                    None => Cell::from(truncate(value, width)).style(
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                    ),
                }
            })
            .collect::<Vec<_>>(),
    )
}
