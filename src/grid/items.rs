use std::{marker::PhantomData, ops::Range};

use crossterm::event::KeyEvent;

use crate::{
    domain::{CatalogOption, FieldKind, ItemColumn, LineItem},
    error::{AppError, AppResult},
    form::{format_decimal, handle_text_edit, parse_decimal},
};

pub const DEFAULT_PAGE_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridCursor {
    pub row: usize,
    pub column: usize,
}

/// Projection of one line item, or of a trailing blank row when `item` is
/// `None`. Row ids are 1-based positions.
#[derive(Debug, Clone, PartialEq)]
pub struct GridRow<'a, T> {
    pub id: usize,
    pub item: Option<&'a T>,
}

impl<T: LineItem> GridRow<'_, T> {
    /// Catalog id driving the inline selector.
    pub fn selected_catalog_id(&self) -> Option<i64> {
        self.item.map(LineItem::catalog_id)
    }

    pub fn is_blank(&self) -> bool {
        self.item.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The catalog entry was already listed; its quantity went up by one.
    Incremented { row_id: usize },
    /// An assigned row was replaced in place.
    Assigned { row_id: usize },
    /// A blank row received its first catalog entry.
    Appended { row_id: usize },
    Ignored,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CellEditor {
    pub row_id: usize,
    pub column: ItemColumn,
    pub buffer: String,
}

/// Editable grid over a record's nested item list.
///
/// The item list itself stays with the record and is passed into every
/// operation; the grid keeps only what has no place in the list: trailing
/// blank rows, the cursor, the catalog and an open cell editor. Rows are
/// recomputed from the list on every read.
#[derive(Debug, Clone)]
pub struct ItemGrid<T: LineItem> {
    options: Vec<CatalogOption>,
    blank_rows: usize,
    cursor: GridCursor,
    editor: Option<CellEditor>,
    page_size: usize,
    _item: PhantomData<fn() -> T>,
}

impl<T: LineItem> ItemGrid<T> {
    /// Grid over the record's current items plus one blank entry row.
    pub fn mount(items: &[T]) -> Self {
        tracing::debug!(items = items.len(), "item grid mounted");
        Self {
            options: Vec::new(),
            blank_rows: 1,
            cursor: GridCursor::default(),
            editor: None,
            page_size: DEFAULT_PAGE_SIZE,
            _item: PhantomData,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn set_options(&mut self, options: Vec<CatalogOption>) {
        self.options = options;
    }

    pub fn options(&self) -> &[CatalogOption] {
        &self.options
    }

    pub fn option(&self, catalog_id: i64) -> Option<&CatalogOption> {
        self.options.iter().find(|option| option.id == catalog_id)
    }

    pub fn cursor(&self) -> GridCursor {
        self.cursor
    }

    pub fn cursor_row_id(&self) -> usize {
        self.cursor.row + 1
    }

    pub fn column(&self) -> ItemColumn {
        T::COLUMNS
            .get(self.cursor.column)
            .copied()
            .unwrap_or(ItemColumn::Item)
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn blank_rows(&self) -> usize {
        self.blank_rows
    }

    pub fn row_count(&self, items: &[T]) -> usize {
        items.len() + self.blank_rows
    }

    pub fn rows<'a>(&self, items: &'a [T]) -> Vec<GridRow<'a, T>> {
        items
            .iter()
            .map(Some)
            .chain(std::iter::repeat_n(None, self.blank_rows))
            .enumerate()
            .map(|(index, item)| GridRow {
                id: index + 1,
                item,
            })
            .collect()
    }

    /// Description of an item, falling back to its catalog label.
    pub fn label_of(&self, item: &T) -> String {
        if !item.description().is_empty() {
            return item.description().to_string();
        }
        self.option(item.catalog_id())
            .map(|option| option.label.clone())
            .unwrap_or_default()
    }

    pub fn total(&self, items: &[T]) -> f64 {
        items.iter().map(LineItem::total).sum()
    }

    /// Inline selector change on row `row_id`.
    ///
    /// Selecting a catalog id that is already listed bumps that row's quantity
    /// instead of adding a duplicate. Unknown ids keep the reference with an
    /// empty description and a zero price.
    pub fn select_catalog(
        &mut self,
        items: &mut Vec<T>,
        row_id: usize,
        catalog_id: i64,
    ) -> SelectOutcome {
        if let Some(index) = items
            .iter()
            .position(|item| item.catalog_id() == catalog_id)
        {
            let item = &mut items[index];
            item.set_quantity(item.quantity() + 1.0);
            self.cursor.row = index;
            return SelectOutcome::Incremented { row_id: index + 1 };
        }

        let Some(index) = row_id.checked_sub(1) else {
            return SelectOutcome::Ignored;
        };
        let option = self
            .option(catalog_id)
            .cloned()
            .unwrap_or_else(|| CatalogOption::unresolved(catalog_id));
        let item = T::from_catalog(&option);

        if index < items.len() {
            items[index] = item;
            self.cursor.row = index;
            SelectOutcome::Assigned { row_id }
        } else if index < self.row_count(items) {
            items.push(item);
            self.blank_rows -= 1;
            self.cursor.row = items.len() - 1;
            SelectOutcome::Appended {
                row_id: items.len(),
            }
        } else {
            SelectOutcome::Ignored
        }
    }

    pub fn select_at_cursor(&mut self, items: &mut Vec<T>, catalog_id: i64) -> SelectOutcome {
        let row_id = self.cursor_row_id();
        self.select_catalog(items, row_id, catalog_id)
    }

    /// Commits a cell edit. Totals follow from the list on the next read.
    pub fn edit_cell(
        &mut self,
        items: &mut [T],
        row_id: usize,
        column: ItemColumn,
        raw: &str,
    ) -> AppResult<()> {
        let index = row_id.saturating_sub(1);
        if row_id == 0 || index >= self.row_count(items) {
            return Err(AppError::validation(format!("row {row_id} not found")));
        }
        if !column.is_editable() || !T::COLUMNS.contains(&column) {
            return Err(AppError::validation(format!(
                "{} cannot be edited",
                column.header()
            )));
        }
        let Some(item) = items.get_mut(index) else {
            return Err(AppError::validation("select an item first"));
        };
        match column {
            ItemColumn::Quantity => {
                let quantity = parse_decimal(raw)
                    .ok_or_else(|| AppError::validation("Quantity: expected a number"))?;
                if quantity <= 0.0 {
                    return Err(AppError::validation("Quantity must be greater than zero."));
                }
                item.set_quantity(quantity);
            }
            ItemColumn::Price => {
                let price = parse_decimal(raw)
                    .ok_or_else(|| AppError::validation("Price: expected a number"))?;
                if price < 0.0 {
                    return Err(AppError::validation("Price cannot be negative."));
                }
                item.set_price(price);
            }
            ItemColumn::Observation => item.set_observation(raw.trim().to_string()),
            ItemColumn::Code | ItemColumn::Item | ItemColumn::Total => {}
        }
        Ok(())
    }

    /// Removes row `row_id` from the projection and, for an assigned row, the
    /// item at the same position. Unknown ids are a no-op.
    pub fn delete_row(&mut self, items: &mut Vec<T>, row_id: usize) -> bool {
        let Some(index) = row_id.checked_sub(1) else {
            return false;
        };
        if index < items.len() {
            items.remove(index);
        } else if index < self.row_count(items) {
            self.blank_rows -= 1;
        } else {
            return false;
        }
        self.editor = None;
        self.clamp_cursor(items);
        true
    }

    /// Moves the cursor by `delta` rows. Stepping down past an assigned last
    /// row appends a blank row; returns whether a row was appended.
    pub fn navigate(&mut self, items: &[T], delta: i32) -> bool {
        let count = self.row_count(items);
        if count == 0 {
            if delta > 0 {
                self.blank_rows = 1;
                self.cursor.row = 0;
                return true;
            }
            return false;
        }
        if delta < 0 {
            self.cursor.row = self.cursor.row.saturating_sub(delta.unsigned_abs() as usize);
            return false;
        }
        let target = self.cursor.row + delta as usize;
        if target < count {
            self.cursor.row = target;
            return false;
        }
        let last_assigned = self.blank_rows == 0 && !items.is_empty();
        if last_assigned {
            self.blank_rows = 1;
            self.cursor.row = count;
            return true;
        }
        self.cursor.row = count - 1;
        false
    }

    pub fn move_column(&mut self, delta: i32) {
        let last = T::COLUMNS.len().saturating_sub(1) as i32;
        self.cursor.column = (self.cursor.column as i32 + delta).clamp(0, last) as usize;
    }

    /// Appends a blank row unless one is already waiting.
    pub fn add_blank_row(&mut self, items: &[T]) -> bool {
        if self.blank_rows > 0 {
            self.cursor.row = items.len();
            return false;
        }
        self.blank_rows = 1;
        self.cursor.row = items.len();
        true
    }

    pub fn visible_rows(&self, items: &[T]) -> Range<usize> {
        let count = self.row_count(items);
        let start = (self.cursor.row / self.page_size) * self.page_size;
        start.min(count)..(start + self.page_size).min(count)
    }

    pub fn editor(&self) -> Option<&CellEditor> {
        self.editor.as_ref()
    }

    /// Opens an editor on the cursor cell, seeded with its current value.
    pub fn begin_cell_edit(&mut self, items: &[T]) -> AppResult<()> {
        let column = self.column();
        if !column.is_editable() {
            return Err(AppError::validation(format!(
                "{} cannot be edited",
                column.header()
            )));
        }
        let item = items
            .get(self.cursor.row)
            .ok_or_else(|| AppError::validation("select an item first"))?;
        let buffer = match column {
            ItemColumn::Quantity => format_decimal(item.quantity()),
            ItemColumn::Price => format_decimal(item.price()),
            _ => item.observation().to_string(),
        };
        self.editor = Some(CellEditor {
            row_id: self.cursor_row_id(),
            column,
            buffer,
        });
        Ok(())
    }

    pub fn edit_key(&mut self, key: &KeyEvent) -> bool {
        let Some(editor) = self.editor.as_mut() else {
            return false;
        };
        let kind = match editor.column {
            ItemColumn::Observation => FieldKind::Text,
            _ => FieldKind::Decimal,
        };
        handle_text_edit(&mut editor.buffer, kind, key)
    }

    /// Commits the open editor; on error the editor stays open.
    pub fn commit_cell_edit(&mut self, items: &mut [T]) -> AppResult<bool> {
        let Some(editor) = self.editor.take() else {
            return Ok(false);
        };
        match self.edit_cell(items, editor.row_id, editor.column, &editor.buffer) {
            Ok(()) => Ok(true),
            Err(err) => {
                self.editor = Some(editor);
                Err(err)
            }
        }
    }

    pub fn cancel_cell_edit(&mut self) -> bool {
        self.editor.take().is_some()
    }

    fn clamp_cursor(&mut self, items: &[T]) {
        let count = self.row_count(items);
        self.cursor.row = self.cursor.row.min(count.saturating_sub(1));
    }
}
