use crossterm::event::KeyEvent;
use serde_json::Value;

use crate::{
    domain::Entity,
    error::{AppError, AppResult, ErrorKind},
};

use super::{field::FieldState, validation::check_field};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Viewing,
    Editing { is_new: bool },
}

/// Create/read/update/delete lifecycle of one entity page.
///
/// `rows` is the locally cached list the list grid shows; `record` is the
/// record currently loaded in the form and owns its nested items while the
/// scalar fields are edited through `fields`.
#[derive(Debug, Clone)]
pub struct RecordForm<E: Entity> {
    rows: Vec<E>,
    selected: Option<usize>,
    record: E,
    fields: Vec<FieldState>,
    focus: usize,
    mode: FormMode,
}

impl<E: Entity> Default for RecordForm<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> RecordForm<E> {
    pub fn new() -> Self {
        let mut form = Self {
            rows: Vec::new(),
            selected: None,
            record: E::default(),
            fields: E::fields().iter().map(FieldState::new).collect(),
            focus: 0,
            mode: FormMode::Viewing,
        };
        form.reset_to(E::default());
        form
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, FormMode::Editing { .. })
    }

    pub fn is_new(&self) -> bool {
        matches!(self.mode, FormMode::Editing { is_new: true })
    }

    pub fn rows(&self) -> &[E] {
        &self.rows
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn record(&self) -> &E {
        &self.record
    }

    pub fn record_mut(&mut self) -> &mut E {
        &mut self.record
    }

    pub fn current_id(&self) -> Option<i64> {
        self.record.id()
    }

    pub fn fields(&self) -> &[FieldState] {
        &self.fields
    }

    pub fn focus_index(&self) -> usize {
        self.focus
    }

    pub fn focused_field(&self) -> Option<&FieldState> {
        self.fields.get(self.focus)
    }

    /// Moves focus across editable fields, wrapping at both ends.
    pub fn focus_step(&mut self, delta: i32) {
        let len = self.fields.len() as i32;
        if len == 0 {
            return;
        }
        let mut index = self.focus as i32;
        for _ in 0..len {
            index = (index + delta).rem_euclid(len);
            if self.fields[index as usize].is_editable() {
                self.focus = index as usize;
                return;
            }
        }
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        if !self.is_editing() {
            return false;
        }
        self.fields
            .get_mut(self.focus)
            .is_some_and(|field| field.handle_key(key))
    }

    /// Replaces the focused field's text, as a lookup popup does.
    pub fn set_focused_text(&mut self, text: impl Into<String>) -> bool {
        if !self.is_editing() {
            return false;
        }
        match self.fields.get_mut(self.focus) {
            Some(field) if field.is_editable() => {
                field.set_text(text);
                true
            }
            _ => false,
        }
    }

    /// Replaces the cached list and shows the row with id `prefer`, falling
    /// back to the first row. While editing only the selection moves; the
    /// record being edited stays.
    pub fn load_rows(&mut self, rows: Vec<E>, prefer: Option<i64>) {
        self.rows = rows;
        let index = prefer
            .and_then(|id| self.position_of(id))
            .or(if self.rows.is_empty() { None } else { Some(0) });
        if self.is_editing() {
            self.selected = index;
            return;
        }
        self.show(index);
    }

    /// Row click: resolves `id` against the cached list only.
    pub fn select_by_id(&mut self, id: i64) -> bool {
        if self.is_editing() {
            return false;
        }
        match self.position_of(id) {
            Some(index) => {
                self.show(Some(index));
                true
            }
            None => false,
        }
    }

    pub fn begin_add(&mut self) {
        self.reset_to(E::default());
        self.mode = FormMode::Editing { is_new: true };
        self.focus_first_editable();
    }

    /// Enters editing with the freshly fetched full record.
    pub fn begin_edit(&mut self, record: E) {
        self.reset_to(record);
        self.mode = FormMode::Editing { is_new: false };
        self.focus_first_editable();
    }

    /// Drops unsaved edits and shows the row that was selected before.
    pub fn cancel(&mut self) {
        self.mode = FormMode::Viewing;
        self.show(self.selected);
    }

    /// Validates the form and returns the payload to post.
    ///
    /// Field rules run in focus order, then record-level rules; the first
    /// failure aborts. The form stays in editing mode either way.
    pub fn submit(&mut self) -> AppResult<E> {
        if !self.is_editing() {
            return Err(AppError::validation("nothing to save"));
        }
        let mut record = self.build()?;
        record.validate()?;
        record.prepare_submit();
        if self.is_new() {
            record.set_id(None);
        }
        Ok(record)
    }

    pub fn finish_save(&mut self) {
        self.mode = FormMode::Viewing;
    }

    /// Removes a deleted record from the cache and shows its predecessor,
    /// or an empty record when it had none.
    pub fn remove_deleted(&mut self, id: i64) -> bool {
        let Some(index) = self.position_of(id) else {
            return false;
        };
        self.rows.remove(index);
        let next = index.checked_sub(1);
        self.mode = FormMode::Viewing;
        self.show(next);
        true
    }

    fn build(&mut self) -> AppResult<E> {
        let mut value = serde_json::to_value(&self.record)?;
        let Value::Object(map) = &mut value else {
            return Err(AppError::new(
                ErrorKind::Decode,
                "record did not serialize to an object",
            ));
        };
        for (index, field) in self.fields.iter_mut().enumerate() {
            match check_field(field) {
                Ok(Value::Null) => {
                    map.remove(field.key());
                }
                Ok(current) => {
                    map.insert(field.key().to_string(), current);
                }
                Err(message) => {
                    field.set_error(message.clone());
                    self.focus = index;
                    return Err(AppError::validation(message));
                }
            }
        }
        Ok(serde_json::from_value(value)?)
    }

    fn show(&mut self, index: Option<usize>) {
        self.selected = index.filter(|index| *index < self.rows.len());
        let record = self
            .selected
            .and_then(|index| self.rows.get(index))
            .cloned()
            .unwrap_or_default();
        self.reset_to(record);
    }

    fn reset_to(&mut self, record: E) {
        let value = serde_json::to_value(&record).unwrap_or(Value::Null);
        for field in &mut self.fields {
            field.seed(value.get(field.key()));
        }
        self.record = record;
    }

    fn position_of(&self, id: i64) -> Option<usize> {
        self.rows.iter().position(|row| row.id() == Some(id))
    }

    fn focus_first_editable(&mut self) {
        if let Some(index) = self.fields.iter().position(FieldState::is_editable) {
            self.focus = index;
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;
    use crate::domain::{Client, Recipe, RecipeItem};

    fn client(id: i64, name: &str) -> Client {
        Client {
            id: Some(id),
            name: name.to_string(),
            phone: "555".into(),
            address: "Main St".into(),
            number: "1".into(),
            district: "Center".into(),
            city: "Town".into(),
        }
    }

    fn type_text(form: &mut RecordForm<Client>, text: &str) {
        for ch in text.chars() {
            form.handle_key(&KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE));
        }
    }

    #[test]
    fn load_rows_prefers_requested_id() {
        let mut form = RecordForm::<Client>::new();
        form.load_rows(vec![client(1, "Ana"), client(2, "Bia")], Some(2));
        assert_eq!(form.selected_index(), Some(1));
        assert_eq!(form.fields()[1].buffer(), "Bia");

        form.load_rows(vec![client(1, "Ana")], Some(9));
        assert_eq!(form.selected_index(), Some(0));
    }

    #[test]
    fn row_click_with_unknown_id_keeps_form() {
        let mut form = RecordForm::<Client>::new();
        form.load_rows(vec![client(1, "Ana"), client(2, "Bia")], None);
        assert!(!form.select_by_id(42));
        assert_eq!(form.current_id(), Some(1));
        assert!(form.select_by_id(2));
        assert_eq!(form.current_id(), Some(2));
    }

    #[test]
    fn viewing_mode_ignores_typing() {
        let mut form = RecordForm::<Client>::new();
        form.load_rows(vec![client(1, "Ana")], None);
        type_text(&mut form, "xyz");
        assert_eq!(form.fields()[1].buffer(), "Ana");
    }

    #[test]
    fn add_then_submit_reports_first_failing_rule() {
        let mut form = RecordForm::<Client>::new();
        form.begin_add();
        assert!(form.is_new());
        assert_eq!(form.focused_field().map(FieldState::key), Some("name"));
        let err = form.submit().unwrap_err();
        assert_eq!(err.message, "Name is required.");
        assert!(form.is_editing());
        assert_eq!(form.fields()[1].error(), Some("Name is required."));
    }

    #[test]
    fn new_record_payload_has_no_id() {
        let mut form = RecordForm::<Client>::new();
        form.load_rows(vec![client(1, "Ana")], None);
        form.begin_add();
        for (index, text) in ["Caio", "555", "Road", "12", "North", "City"]
            .iter()
            .enumerate()
        {
            if index > 0 {
                form.focus_step(1);
            }
            type_text(&mut form, text);
        }
        let payload = form.submit().expect("valid");
        assert_eq!(payload.id, None);
        assert_eq!(payload.name, "Caio");
        assert_eq!(payload.city, "City");
    }

    #[test]
    fn cancel_restores_previous_row() {
        let mut form = RecordForm::<Client>::new();
        form.load_rows(vec![client(1, "Ana"), client(2, "Bia")], Some(2));
        form.begin_edit(client(2, "Bia"));
        type_text(&mut form, " changed");
        form.cancel();
        assert_eq!(form.mode(), FormMode::Viewing);
        assert_eq!(form.fields()[1].buffer(), "Bia");
    }

    #[test]
    fn focus_skips_read_only_id() {
        let mut form = RecordForm::<Client>::new();
        form.begin_add();
        form.focus_step(-1);
        assert_eq!(form.focused_field().map(FieldState::key), Some("city"));
        form.focus_step(1);
        assert_eq!(form.focused_field().map(FieldState::key), Some("name"));
    }

    #[test]
    fn recipe_without_items_is_rejected() {
        let mut form = RecordForm::<Recipe>::new();
        form.begin_add();
        form.set_focused_text("Bread");
        let err = form.submit().unwrap_err();
        assert_eq!(err.message, "items are required");
    }

    #[test]
    fn recipe_submit_keeps_items_and_recomputes_cost() {
        let mut form = RecordForm::<Recipe>::new();
        form.begin_edit(Recipe {
            id: Some(4),
            description: "Bread".into(),
            cost: 0.0,
            items: vec![RecipeItem {
                ingredient_id: 1,
                description: "Flour".into(),
                quantity: 3.0,
                cost: 2.0,
            }],
        });
        let payload = form.submit().expect("valid");
        assert_eq!(payload.id, Some(4));
        assert_eq!(payload.items.len(), 1);
        assert_eq!(payload.cost, 6.0);
    }

    #[test]
    fn delete_moves_to_preceding_row() {
        let mut form = RecordForm::<Client>::new();
        form.load_rows(
            vec![client(1, "Ana"), client(2, "Bia"), client(3, "Caio")],
            Some(3),
        );
        assert!(form.remove_deleted(3));
        assert_eq!(form.current_id(), Some(2));
        assert_eq!(form.rows().len(), 2);
    }

    #[test]
    fn delete_of_first_row_resets_to_default() {
        let mut form = RecordForm::<Client>::new();
        form.load_rows(
            vec![client(1, "Ana"), client(2, "Bia"), client(3, "Caio")],
            Some(1),
        );
        assert!(form.remove_deleted(1));
        assert_eq!(form.rows().len(), 2);
        assert_eq!(form.selected_index(), None);
        assert_eq!(form.current_id(), None);
        assert_eq!(form.fields()[1].buffer(), "");
        assert_eq!(form.mode(), FormMode::Viewing);
    }

    #[test]
    fn delete_of_last_record_resets_to_default() {
        let mut form = RecordForm::<Client>::new();
        form.load_rows(vec![client(1, "Ana")], None);
        assert!(form.remove_deleted(1));
        assert!(form.rows().is_empty());
        assert_eq!(form.current_id(), None);
        assert_eq!(form.fields()[1].buffer(), "");
        assert!(!form.remove_deleted(1));
    }
}
