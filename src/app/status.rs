#[derive(Debug, Clone)]
pub struct StatusLine {
    message: String,
}

pub const READY_STATUS: &str = "Ready. Press a to add, e to edit, d to delete.";

impl Default for StatusLine {
    fn default() -> Self {
        Self {
            message: READY_STATUS.to_string(),
        }
    }
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_raw(&mut self, msg: impl Into<String>) {
        self.message = msg.into();
    }

    pub fn ready(&mut self) {
        self.message = READY_STATUS.to_string();
    }

    pub fn loading(&mut self, title: &str) {
        self.message = format!("Loading {title}...");
    }

    pub fn adding(&mut self, title: &str) {
        self.message = format!("New {title} record. Ctrl+S saves, Esc cancels.");
    }

    pub fn editing(&mut self, label: &str) {
        self.message = format!("Editing {label}");
    }

    pub fn saving(&mut self) {
        self.message = "Saving...".to_string();
    }

    pub fn in_grid(&mut self) {
        self.message = "Items: Enter picks an item or edits a cell, Esc returns to fields".to_string();
    }

    pub fn pending_exit(&mut self) {
        self.message = "Unsaved changes. Press Ctrl+Q again to quit without saving.".to_string();
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
