use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use crate::notify::ToastLevel;

use super::components::{
    render_dialog, render_footer, render_form, render_grid, render_list, render_popup,
    render_tab_strip, render_toast,
};

/// Everything one frame shows, borrowed from the app for the draw call.
pub struct UiContext<'a> {
    pub tabs: &'a [String],
    pub active_tab: usize,
    pub page: &'a PageRender,
    pub status_message: &'a str,
    pub help: Option<&'a str>,
    pub popup: Option<PopupRender<'a>>,
    pub toast: Option<ToastRender<'a>>,
    pub dialog: Option<DialogRender<'a>>,
}

pub struct PopupRender<'a> {
    pub title: &'a str,
    pub options: &'a [String],
    pub selected: usize,
}

pub struct ToastRender<'a> {
    pub level: ToastLevel,
    pub message: &'a str,
}

pub struct DialogRender<'a> {
    pub title: &'a str,
    pub message: &'a str,
    pub confirm_label: &'a str,
    pub confirm_selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldRender {
    pub label: String,
    pub value: String,
    pub error: Option<String>,
    pub focused: bool,
    pub read_only: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormRender {
    pub title: String,
    pub mode: String,
    pub fields: Vec<FieldRender>,
    /// Fields take keyboard input.
    pub active: bool,
}

/// A table window: header cells with widths, the visible rows, and the
/// highlighted row relative to the window.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableRender {
    pub headers: Vec<(String, u16)>,
    pub rows: Vec<Vec<String>>,
    pub selected: Option<usize>,
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridRender {
    pub table: TableRender,
    pub cursor_column: usize,
    pub focused: bool,
    /// Buffer of the open cell editor, drawn in place of the cursor cell.
    pub editor: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageRender {
    pub form: FormRender,
    pub list: TableRender,
    pub grid: Option<GridRender>,
    pub busy: bool,
}

pub fn draw(frame: &mut Frame<'_>, ctx: UiContext<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(4),
        ])
        .split(frame.area());

    render_tab_strip(frame, chunks[0], ctx.tabs, ctx.active_tab, "Bakehouse");

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(42), Constraint::Percentage(58)])
        .split(chunks[1]);
    render_form(frame, body[0], &ctx.page.form);

    match &ctx.page.grid {
        Some(grid) => {
            let right = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
                .split(body[1]);
            render_list(frame, right[0], &ctx.page.list, !ctx.page.form.active);
            render_grid(frame, right[1], grid);
        }
        None => render_list(frame, body[1], &ctx.page.list, !ctx.page.form.active),
    }

    render_footer(frame, chunks[2], &ctx);

    if let Some(toast) = &ctx.toast {
        render_toast(frame, toast);
    }
    if let Some(popup) = ctx.popup {
        render_popup(frame, popup);
    }
    if let Some(dialog) = &ctx.dialog {
        render_dialog(frame, dialog);
    }
}
