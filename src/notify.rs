use std::time::{Duration, Instant};

use crate::error::AppError;

pub const DEFAULT_TOAST_LIFETIME: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
    shown_at: Instant,
}

impl Toast {
    pub fn shown_at(&self) -> Instant {
        self.shown_at
    }
}

/// Modal question holding the action to run once the user confirms.
#[derive(Debug, Clone)]
pub struct ConfirmDialog<A> {
    pub title: String,
    pub message: String,
    pub confirm_label: String,
    pub action: A,
    confirm_selected: bool,
}

impl<A> ConfirmDialog<A> {
    pub fn confirm_selected(&self) -> bool {
        self.confirm_selected
    }
}

/// Toasts and confirmation dialogs shared by every page.
#[derive(Debug)]
pub struct Notifier<A> {
    toast: Option<Toast>,
    dialog: Option<ConfirmDialog<A>>,
    lifetime: Duration,
}

impl<A> Default for Notifier<A> {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_LIFETIME)
    }
}

impl<A> Notifier<A> {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            toast: None,
            dialog: None,
            lifetime,
        }
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    pub fn notify(&mut self, message: impl Into<String>) {
        self.show(ToastLevel::Info, message.into(), Instant::now());
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.show(ToastLevel::Success, message.into(), Instant::now());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.show(ToastLevel::Error, message.into(), Instant::now());
    }

    pub fn report(&mut self, err: &AppError) {
        self.error(err.message.clone());
    }

    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    pub fn dismiss(&mut self) -> bool {
        self.toast.take().is_some()
    }

    /// Drops the toast once it has been visible for the configured lifetime.
    pub fn expire(&mut self, now: Instant) -> bool {
        let expired = self
            .toast
            .as_ref()
            .is_some_and(|toast| now.saturating_duration_since(toast.shown_at) >= self.lifetime);
        if expired {
            self.toast = None;
        }
        expired
    }

    /// Opens a dialog; any dialog still open is replaced.
    pub fn confirm(
        &mut self,
        title: impl Into<String>,
        message: impl Into<String>,
        confirm_label: impl Into<String>,
        action: A,
    ) {
        self.dialog = Some(ConfirmDialog {
            title: title.into(),
            message: message.into(),
            confirm_label: confirm_label.into(),
            action,
            confirm_selected: false,
        });
    }

    pub fn dialog(&self) -> Option<&ConfirmDialog<A>> {
        self.dialog.as_ref()
    }

    pub fn has_dialog(&self) -> bool {
        self.dialog.is_some()
    }

    pub fn toggle_choice(&mut self) {
        if let Some(dialog) = self.dialog.as_mut() {
            dialog.confirm_selected = !dialog.confirm_selected;
        }
    }

    /// Closes the dialog with the highlighted choice.
    pub fn answer(&mut self) -> Option<A> {
        let accepted = self
            .dialog
            .as_ref()
            .is_some_and(|dialog| dialog.confirm_selected);
        self.resolve(accepted)
    }

    /// Closes the dialog, handing back its action only when `accepted`.
    pub fn resolve(&mut self, accepted: bool) -> Option<A> {
        let dialog = self.dialog.take()?;
        accepted.then_some(dialog.action)
    }

    fn show(&mut self, level: ToastLevel, message: String, shown_at: Instant) {
        tracing::debug!(?level, %message, "toast");
        self.toast = Some(Toast {
            level,
            message,
            shown_at,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn toast_expires_after_lifetime() {
        let mut notifier = Notifier::<()>::new(Duration::from_secs(5));
        notifier.success("Record saved.");
        let shown = notifier.toast().expect("toast").shown_at();
        assert!(!notifier.expire(shown + Duration::from_secs(4)));
        assert!(notifier.toast().is_some());
        assert!(notifier.expire(shown + Duration::from_secs(5)));
        assert!(notifier.toast().is_none());
    }

    #[test]
    fn newer_toast_replaces_older() {
        let mut notifier = Notifier::<()>::default();
        notifier.notify("first");
        notifier.report(&AppError::new(ErrorKind::Network, "request failed"));
        let toast = notifier.toast().expect("toast");
        assert_eq!(toast.level, ToastLevel::Error);
        assert_eq!(toast.message, "request failed");
    }

    #[test]
    fn dialog_defaults_to_cancel() {
        let mut notifier = Notifier::default();
        notifier.confirm("Delete", "Delete record 3?", "Delete", 3_i64);
        assert_eq!(notifier.answer(), None);
        assert!(!notifier.has_dialog());
    }

    #[test]
    fn confirmed_dialog_returns_action() {
        let mut notifier = Notifier::default();
        notifier.confirm("Delete", "Delete record 3?", "Delete", 3_i64);
        notifier.toggle_choice();
        assert!(notifier.dialog().expect("dialog").confirm_selected());
        assert_eq!(notifier.answer(), Some(3));
        assert_eq!(notifier.resolve(true), None);
    }
}
