use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use serde_json::Value;
use tokio::runtime::Handle;

use crate::{
    api::{self, Gateway},
    domain::{CatalogOption, Client, Entity, EntityKind, FieldKind, HasItems},
    error::AppResult,
    form::{RecordForm, value_to_string},
    grid::{ListGrid, SelectOutcome},
    notify::Notifier,
    presentation::{FieldRender, FormRender, PageRender, PopupRender, TableRender},
};

use super::{
    input::KeyAction,
    items::{ItemSession, ItemsPanel},
    keymap::KeymapContext,
    options::UiOptions,
    popup::{PopupChoice, PopupState},
    status::StatusLine,
    tasks::Tasks,
};

/// Work that waits for the user's answer in the confirmation dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PendingAction {
    DeleteRecord { kind: EntityKind, id: i64 },
}

pub(crate) type AppNotifier = Notifier<PendingAction>;

enum Outcome<E> {
    Listed {
        rows: AppResult<Vec<E>>,
        prefer: Option<i64>,
    },
    Fetched(AppResult<E>),
    Saved(AppResult<Option<i64>>),
    Deleted {
        id: i64,
        result: AppResult<()>,
    },
    Catalog {
        ticket: u64,
        result: AppResult<Vec<CatalogOption>>,
    },
    Clients(AppResult<Vec<Client>>),
}

/// One entity tab as the app loop sees it.
pub(crate) trait PageView {
    fn kind(&self) -> EntityKind;

    /// Page became visible: loads its list and lookups.
    fn mount(&mut self, status: &mut StatusLine);

    /// Page was left: replies still in flight are discarded.
    fn unmount(&mut self);

    /// Applies finished requests; called once per tick.
    fn poll(&mut self, notifier: &mut AppNotifier, status: &mut StatusLine);

    fn context(&self) -> KeymapContext;

    fn is_editing(&self) -> bool;

    /// Keys for the open popup or cell editor; `false` when neither is open.
    fn handle_overlay_key(
        &mut self,
        key: &KeyEvent,
        notifier: &mut AppNotifier,
        status: &mut StatusLine,
    ) -> bool;

    fn handle_action(
        &mut self,
        action: KeyAction,
        notifier: &mut AppNotifier,
        status: &mut StatusLine,
    ) -> bool;

    /// Unbound keys: text typed into the focused field.
    fn handle_input(&mut self, key: &KeyEvent, status: &mut StatusLine) -> bool;

    fn confirmed(&mut self, action: PendingAction, status: &mut StatusLine);

    fn render(&self) -> PageRender;

    fn popup(&self) -> Option<PopupRender<'_>>;
}

pub(crate) struct Page<E: Entity> {
    gateway: Arc<dyn Gateway>,
    tasks: Tasks<Outcome<E>>,
    form: RecordForm<E>,
    list: ListGrid,
    items: Option<Box<dyn ItemsPanel<E>>>,
    grid_focused: bool,
    lookup: Option<Vec<String>>,
    popup: Option<PopupState>,
    busy: bool,
}

impl<E: Entity> Page<E> {
    pub(crate) fn new(gateway: Arc<dyn Gateway>, handle: Handle, options: &UiOptions) -> Self {
        Self {
            gateway,
            tasks: Tasks::new(handle),
            form: RecordForm::new(),
            list: ListGrid::new(options.page_size),
            items: None,
            grid_focused: false,
            lookup: None,
            popup: None,
            busy: false,
        }
    }

    /// Offers the client list as choices for lookup fields.
    pub(crate) fn with_client_lookup(mut self) -> Self {
        self.lookup = Some(Vec::new());
        self
    }

    #[cfg(test)]
    pub(crate) fn form(&self) -> &RecordForm<E> {
        &self.form
    }

    #[cfg(test)]
    pub(crate) fn is_busy(&self) -> bool {
        self.busy
    }

    #[cfg(test)]
    /// Drives requests to completion without the UI loop.
    pub(crate) async fn settle(&mut self, notifier: &mut AppNotifier, status: &mut StatusLine) {
        while self.tasks.in_flight() > 0 {
            for outcome in self.tasks.settle().await {
                self.apply(outcome, notifier, status);
            }
        }
    }

    fn reload(&mut self, prefer: Option<i64>) {
        let gateway = Arc::clone(&self.gateway);
        self.tasks.spawn(async move {
            let rows = api::fetch_all::<E>(gateway.as_ref()).await;
            Outcome::Listed { rows, prefer }
        });
    }

    fn mount_items(&mut self) {
        self.grid_focused = false;
        let Some(items) = self.items.as_mut() else {
            return;
        };
        let ticket = items.mount(self.form.record());
        let request = items.catalog_request(Arc::clone(&self.gateway));
        self.tasks.spawn(async move {
            Outcome::Catalog {
                ticket,
                result: request.await,
            }
        });
    }

    fn unmount_items(&mut self) {
        self.grid_focused = false;
        if let Some(items) = self.items.as_mut() {
            items.unmount();
        }
    }

    fn apply(&mut self, outcome: Outcome<E>, notifier: &mut AppNotifier, status: &mut StatusLine) {
        let title = E::KIND.title();
        match outcome {
            Outcome::Listed { rows, prefer } => match rows {
                Ok(rows) => {
                    tracing::debug!(page = title, rows = rows.len(), "list loaded");
                    self.form.load_rows(rows, prefer);
                    self.list.sync_to(self.form.selected_index());
                    if !self.form.is_editing() {
                        status.ready();
                    }
                }
                Err(err) => {
                    tracing::warn!(page = title, %err, "list request failed");
                    notifier.report(&err);
                    status.set_raw(format!("Could not load {title}"));
                }
            },
            Outcome::Fetched(result) => {
                self.busy = false;
                match result {
                    Ok(record) => {
                        self.form.begin_edit(record);
                        self.mount_items();
                        status.editing(title);
                    }
                    Err(err) => {
                        tracing::warn!(page = title, %err, "record request failed");
                        notifier.report(&err);
                        status.ready();
                    }
                }
            }
            Outcome::Saved(result) => {
                self.busy = false;
                match result {
                    Ok(id) => {
                        tracing::info!(page = title, ?id, "record saved");
                        self.form.finish_save();
                        self.unmount_items();
                        notifier.success("Record saved.");
                        status.ready();
                        self.reload(id);
                    }
                    Err(err) => {
                        tracing::warn!(page = title, %err, "save failed");
                        notifier.report(&err);
                        if self.form.is_editing() {
                            status.editing(title);
                        } else {
                            status.ready();
                        }
                    }
                }
            }
            Outcome::Deleted { id, result } => {
                self.busy = false;
                match result {
                    Ok(()) => {
                        tracing::info!(page = title, id, "record deleted");
                        self.form.remove_deleted(id);
                        self.list.sync_to(self.form.selected_index());
                        notifier.success("Record deleted.");
                    }
                    Err(err) => {
                        tracing::warn!(page = title, id, %err, "delete failed");
                        notifier.report(&err);
                    }
                }
                status.ready();
            }
            Outcome::Catalog { ticket, result } => {
                let Some(items) = self.items.as_mut() else {
                    return;
                };
                if !items.is_mounted() || items.ticket() != ticket {
                    tracing::debug!(page = title, ticket, "dropping catalog for a closed grid");
                    return;
                }
                match result {
                    Ok(options) => items.set_options(options),
                    Err(err) => {
                        tracing::warn!(page = title, %err, "catalog request failed");
                        notifier.report(&err);
                    }
                }
            }
            Outcome::Clients(result) => match result {
                Ok(clients) => {
                    self.lookup = Some(
                        clients
                            .iter()
                            .filter_map(|client| {
                                client.id.map(|id| format!("{id} - {}", client.name))
                            })
                            .collect(),
                    );
                }
                Err(err) => {
                    tracing::warn!(page = title, %err, "client lookup failed");
                    notifier.report(&err);
                }
            },
        }
    }

    fn start_edit(&mut self, notifier: &mut AppNotifier, status: &mut StatusLine) {
        let Some(id) = self.form.current_id() else {
            notifier.notify("Select a record first.");
            return;
        };
        self.busy = true;
        status.loading(E::KIND.title());
        let gateway = Arc::clone(&self.gateway);
        self.tasks.spawn(async move {
            Outcome::Fetched(api::fetch_one::<E>(gateway.as_ref(), id).await)
        });
    }

    fn save(&mut self, notifier: &mut AppNotifier, status: &mut StatusLine) {
        if let Some(items) = self.items.as_mut()
            && items.is_cell_editing()
            && let Err(err) = items.commit_cell_edit(self.form.record_mut())
        {
            notifier.report(&err);
            return;
        }
        let record = match self.form.submit() {
            Ok(record) => record,
            Err(err) => {
                tracing::debug!(page = E::KIND.title(), %err, "submit rejected");
                notifier.report(&err);
                return;
            }
        };
        self.busy = true;
        status.saving();
        let gateway = Arc::clone(&self.gateway);
        self.tasks.spawn(async move {
            Outcome::Saved(api::store(gateway.as_ref(), &record).await)
        });
    }

    fn open_field_popup(&mut self, notifier: &mut AppNotifier, status: &mut StatusLine) {
        let Some(field) = self.form.focused_field() else {
            return;
        };
        let (kind, label) = (field.schema.kind, field.schema.label);
        let current = field.buffer().to_string();
        match kind {
            FieldKind::Lookup => {
                let options = self.lookup.as_deref().unwrap_or(&[]);
                match PopupState::for_field(label, options, &current) {
                    Some(popup) => {
                        self.popup = Some(popup);
                        status.set_raw("Use ↑/↓ and Enter to choose");
                    }
                    None => notifier.notify("No choices loaded yet."),
                }
            }
            FieldKind::Flag => {
                self.form.handle_key(&KeyEvent::from(KeyCode::Char(' ')));
            }
            _ => {}
        }
    }

    fn activate_grid_cell(&mut self, notifier: &mut AppNotifier, status: &mut StatusLine) {
        let Some(items) = self.items.as_mut() else {
            return;
        };
        if items.on_selector() {
            let current = items.cursor_catalog_id(self.form.record());
            match PopupState::for_catalog(items.catalog_title(), items.options(), current) {
                Some(popup) => {
                    self.popup = Some(popup);
                    status.set_raw("Use ↑/↓ and Enter to choose");
                }
                None => notifier.notify("No catalog entries loaded."),
            }
            return;
        }
        if let Err(err) = items.begin_cell_edit(self.form.record()) {
            notifier.report(&err);
        }
    }

    fn apply_choice(&mut self, choice: PopupChoice, status: &mut StatusLine) {
        match choice {
            PopupChoice::Text(text) => {
                self.form.set_focused_text(text);
                status.editing(E::KIND.title());
            }
            PopupChoice::Catalog(id) => {
                if let Some(items) = self.items.as_mut() {
                    let outcome = items.select(self.form.record_mut(), id);
                    tracing::debug!(catalog_id = id, ?outcome, "catalog entry selected");
                    if let SelectOutcome::Incremented { row_id } = outcome {
                        status.set_raw(format!("Already listed; row {row_id} quantity raised"));
                    } else {
                        status.in_grid();
                    }
                }
            }
        }
    }

    fn form_render(&self) -> FormRender {
        let editing = self.form.is_editing();
        let fields = self
            .form
            .fields()
            .iter()
            .enumerate()
            .map(|(index, field)| FieldRender {
                label: field.schema.label.to_string(),
                value: field.display_value(),
                error: field.error().map(str::to_string),
                focused: editing && !self.grid_focused && index == self.form.focus_index(),
                read_only: !field.is_editable(),
            })
            .collect();
        let mode = match (editing, self.form.is_new()) {
            (false, _) => "Viewing",
            (true, true) => "New record",
            (true, false) => "Editing",
        };
        FormRender {
            title: E::KIND.title().to_string(),
            mode: mode.to_string(),
            fields,
            active: editing && !self.grid_focused,
        }
    }

    fn list_render(&self) -> TableRender {
        let rows = self.form.rows();
        let window = self.list.visible(rows.len());
        let columns = E::columns();
        let cells = rows[window.clone()]
            .iter()
            .map(|row| {
                let value = serde_json::to_value(row).unwrap_or(Value::Null);
                columns
                    .iter()
                    .map(|column| value.get(column.key).map(value_to_string).unwrap_or_default())
                    .collect()
            })
            .collect();
        let selected = self
            .form
            .selected_index()
            .filter(|index| window.contains(index))
            .map(|index| index - window.start);
        TableRender {
            headers: columns
                .iter()
                .map(|column| (column.header.to_string(), column.width))
                .collect(),
            rows: cells,
            selected,
            caption: format!(
                "{} records • page {}/{}",
                rows.len(),
                self.list.page() + 1,
                self.list.page_count(rows.len())
            ),
        }
    }
}

impl<E: HasItems> Page<E> {
    pub(crate) fn with_items(mut self, page_size: usize) -> Self {
        self.items = Some(Box::new(ItemSession::<E>::new(page_size)));
        self
    }
}

impl<E: Entity> PageView for Page<E> {
    fn kind(&self) -> EntityKind {
        E::KIND
    }

    fn mount(&mut self, status: &mut StatusLine) {
        tracing::debug!(page = E::KIND.title(), "page mounted");
        status.loading(E::KIND.title());
        self.reload(self.form.current_id());
        if self.lookup.is_some() {
            let gateway = Arc::clone(&self.gateway);
            self.tasks.spawn(async move {
                Outcome::Clients(api::fetch_all::<Client>(gateway.as_ref()).await)
            });
        }
    }

    fn unmount(&mut self) {
        let generation = self.tasks.bump();
        tracing::debug!(page = E::KIND.title(), generation, "page unmounted");
        self.busy = false;
        self.popup = None;
        if self.form.is_editing() {
            self.form.cancel();
        }
        self.unmount_items();
    }

    fn poll(&mut self, notifier: &mut AppNotifier, status: &mut StatusLine) {
        for outcome in self.tasks.drain() {
            self.apply(outcome, notifier, status);
        }
    }

    fn context(&self) -> KeymapContext {
        match (self.form.is_editing(), self.grid_focused) {
            (false, _) => KeymapContext::Viewing,
            (true, false) => KeymapContext::Editing,
            (true, true) => KeymapContext::Grid,
        }
    }

    fn is_editing(&self) -> bool {
        self.form.is_editing()
    }

    fn handle_overlay_key(
        &mut self,
        key: &KeyEvent,
        notifier: &mut AppNotifier,
        status: &mut StatusLine,
    ) -> bool {
        if let Some(popup) = self.popup.as_mut() {
            match key.code {
                KeyCode::Up => popup.select_previous(),
                KeyCode::Down => popup.select_next(),
                KeyCode::Esc => self.popup = None,
                KeyCode::Enter => {
                    if let Some(choice) = self.popup.take().and_then(PopupState::choose) {
                        self.apply_choice(choice, status);
                    }
                }
                _ => {}
            }
            return true;
        }
        let Some(items) = self.items.as_mut() else {
            return false;
        };
        if !self.grid_focused || !items.is_cell_editing() {
            return false;
        }
        match key.code {
            KeyCode::Enter => {
                if let Err(err) = items.commit_cell_edit(self.form.record_mut()) {
                    notifier.report(&err);
                }
            }
            KeyCode::Esc => {
                items.cancel_cell_edit();
            }
            _ => {
                items.edit_key(key);
            }
        }
        true
    }

    fn handle_action(
        &mut self,
        action: KeyAction,
        notifier: &mut AppNotifier,
        status: &mut StatusLine,
    ) -> bool {
        let mutating = matches!(
            action,
            KeyAction::Add | KeyAction::Edit | KeyAction::Delete | KeyAction::Save
        );
        if mutating && self.busy {
            status.set_raw("Waiting for the server...");
            return true;
        }
        let rows = self.form.rows().len();
        match action {
            KeyAction::Add => {
                self.form.begin_add();
                self.mount_items();
                status.adding(E::KIND.title());
            }
            KeyAction::Edit => self.start_edit(notifier, status),
            KeyAction::Delete => match self.form.current_id() {
                Some(id) => notifier.confirm(
                    "Delete record",
                    format!("Delete {} record {id}? This cannot be undone.", E::KIND.resource()),
                    "Delete",
                    PendingAction::DeleteRecord { kind: E::KIND, id },
                ),
                None => notifier.notify("Select a record first."),
            },
            KeyAction::RowStep(delta) => {
                if self.list.step(delta, rows).is_some() {
                    self.list.activate(&mut self.form);
                }
            }
            KeyAction::RowPage(delta) => {
                if self.list.page_step(delta, rows).is_some() {
                    self.list.activate(&mut self.form);
                }
            }
            KeyAction::Dismiss => {
                notifier.dismiss();
            }
            KeyAction::Save => self.save(notifier, status),
            KeyAction::Cancel => {
                self.form.cancel();
                self.unmount_items();
                self.list.sync_to(self.form.selected_index());
                status.ready();
            }
            KeyAction::FieldStep(delta) => {
                self.form.focus_step(delta);
                if let Some(field) = self.form.focused_field() {
                    status.editing(field.schema.label);
                }
            }
            KeyAction::OpenPopup => self.open_field_popup(notifier, status),
            KeyAction::ToggleGrid => {
                if self.items.as_ref().is_some_and(|items| items.is_mounted()) {
                    self.grid_focused = !self.grid_focused;
                    if self.grid_focused {
                        status.in_grid();
                    } else {
                        status.editing(E::KIND.title());
                    }
                }
            }
            KeyAction::GridRow(delta) => {
                if let Some(items) = self.items.as_mut() {
                    items.navigate(self.form.record(), delta);
                }
            }
            KeyAction::GridColumn(delta) => {
                if let Some(items) = self.items.as_mut() {
                    items.move_column(delta);
                }
            }
            KeyAction::GridActivate => self.activate_grid_cell(notifier, status),
            KeyAction::GridAddRow => {
                if let Some(items) = self.items.as_mut() {
                    items.add_row(self.form.record());
                }
            }
            KeyAction::GridDeleteRow => {
                if let Some(items) = self.items.as_mut()
                    && !items.delete_row(self.form.record_mut())
                {
                    notifier.notify("Nothing to delete.");
                }
            }
            KeyAction::Quit | KeyAction::PageStep(_) => return false,
        }
        true
    }

    fn handle_input(&mut self, key: &KeyEvent, status: &mut StatusLine) -> bool {
        if self.grid_focused || !self.form.handle_key(key) {
            return false;
        }
        if let Some(field) = self.form.focused_field() {
            status.editing(field.schema.label);
        }
        true
    }

    fn confirmed(&mut self, action: PendingAction, status: &mut StatusLine) {
        let PendingAction::DeleteRecord { kind, id } = action;
        if kind != E::KIND {
            return;
        }
        self.busy = true;
        status.set_raw("Deleting...");
        let gateway = Arc::clone(&self.gateway);
        self.tasks.spawn(async move {
            Outcome::Deleted {
                id,
                result: api::remove::<E>(gateway.as_ref(), id).await,
            }
        });
    }

    fn render(&self) -> PageRender {
        PageRender {
            form: self.form_render(),
            list: self.list_render(),
            grid: self
                .items
                .as_ref()
                .and_then(|items| items.render(self.form.record(), self.grid_focused)),
            busy: self.busy,
        }
    }

    fn popup(&self) -> Option<PopupRender<'_>> {
        self.popup.as_ref().map(PopupState::as_render)
    }
}
