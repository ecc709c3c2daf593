use std::time::Duration;

use crate::{grid::DEFAULT_PAGE_SIZE, notify::DEFAULT_TOAST_LIFETIME};

#[derive(Debug, Clone)]
pub struct UiOptions {
    pub tick_rate: Duration,
    pub confirm_exit: bool,
    pub show_help: bool,
    /// Rows per page in the record list and the items grid.
    pub page_size: usize,
    pub toast_lifetime: Duration,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            tick_rate: Duration::from_millis(250),
            confirm_exit: true,
            show_help: true,
            page_size: DEFAULT_PAGE_SIZE,
            toast_lifetime: DEFAULT_TOAST_LIFETIME,
        }
    }
}

impl UiOptions {
    pub fn with_help(mut self, show: bool) -> Self {
        self.show_help = show;
        self
    }

    pub fn with_confirm_exit(mut self, confirm: bool) -> Self {
        self.confirm_exit = confirm;
        self
    }

    pub fn with_tick_rate(mut self, tick_rate: Duration) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_toast_lifetime(mut self, lifetime: Duration) -> Self {
        self.toast_lifetime = lifetime;
        self
    }
}
