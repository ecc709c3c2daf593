use std::ops::Range;

use crate::{domain::Entity, form::RecordForm};

use super::items::DEFAULT_PAGE_SIZE;

/// Paged, read-only grid over the loaded records of one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListGrid {
    cursor: usize,
    page_size: usize,
}

impl Default for ListGrid {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl ListGrid {
    pub fn new(page_size: usize) -> Self {
        Self {
            cursor: 0,
            page_size: page_size.max(1),
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page(&self) -> usize {
        self.cursor / self.page_size
    }

    pub fn page_count(&self, len: usize) -> usize {
        len.div_ceil(self.page_size).max(1)
    }

    pub fn visible(&self, len: usize) -> Range<usize> {
        let start = (self.page() * self.page_size).min(len);
        start..(start + self.page_size).min(len)
    }

    /// Moves the cursor by `delta` rows; returns the new index when it moved.
    pub fn step(&mut self, delta: i32, len: usize) -> Option<usize> {
        self.move_to(self.cursor as i64 + delta as i64, len)
    }

    pub fn page_step(&mut self, delta: i32, len: usize) -> Option<usize> {
        let target = (self.page() as i64 + delta as i64) * self.page_size as i64;
        self.move_to(target, len)
    }

    pub fn sync_to(&mut self, index: Option<usize>) {
        self.cursor = index.unwrap_or(0);
    }

    /// Row click: shows the clicked record in the form. Ignored while the
    /// form is editing or when the id is not loaded.
    pub fn click<E: Entity>(&mut self, form: &mut RecordForm<E>, id: i64) -> bool {
        if !form.select_by_id(id) {
            return false;
        }
        self.sync_to(form.selected_index());
        true
    }

    /// Clicks the row under the cursor.
    pub fn activate<E: Entity>(&mut self, form: &mut RecordForm<E>) -> bool {
        let Some(id) = form.rows().get(self.cursor).and_then(Entity::id) else {
            return false;
        };
        self.click(form, id)
    }

    fn move_to(&mut self, target: i64, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let clamped = target.clamp(0, len as i64 - 1) as usize;
        if clamped == self.cursor {
            return None;
        }
        self.cursor = clamped;
        Some(clamped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Client;

    fn clients(count: i64) -> Vec<Client> {
        (1..=count)
            .map(|id| Client {
                id: Some(id),
                name: format!("Client {id}"),
                ..Client::default()
            })
            .collect()
    }

    #[test]
    fn pages_by_five_by_default() {
        let mut grid = ListGrid::default();
        assert_eq!(grid.page_count(12), 3);
        assert_eq!(grid.visible(12), 0..5);
        assert_eq!(grid.page_step(1, 12), Some(5));
        assert_eq!(grid.visible(12), 5..10);
        assert_eq!(grid.page_step(5, 12), Some(11));
        assert_eq!(grid.visible(12), 10..12);
    }

    #[test]
    fn step_clamps_at_edges() {
        let mut grid = ListGrid::new(3);
        assert_eq!(grid.step(-1, 4), None);
        assert_eq!(grid.step(10, 4), Some(3));
        assert_eq!(grid.step(1, 4), None);
        assert_eq!(grid.step(1, 0), None);
    }

    #[test]
    fn click_selects_record_in_form() {
        let mut form = RecordForm::<Client>::default();
        form.load_rows(clients(3), None);
        let mut grid = ListGrid::default();
        assert!(grid.click(&mut form, 3));
        assert_eq!(form.current_id(), Some(3));
        assert_eq!(grid.cursor(), 2);
        assert!(!grid.click(&mut form, 42));
    }

    #[test]
    fn click_is_ignored_while_editing() {
        let mut form = RecordForm::<Client>::default();
        form.load_rows(clients(2), None);
        form.begin_add();
        let mut grid = ListGrid::default();
        grid.step(1, 2);
        assert!(!grid.activate(&mut form));
        assert!(form.is_editing());
    }
}
