use std::{future::Future, marker::PhantomData, pin::Pin, sync::Arc};

use crossterm::event::KeyEvent;

use crate::{
    api::{self, Gateway},
    domain::{CatalogOption, Entity, HasItems, ItemColumn, LineItem},
    error::{AppError, AppResult},
    grid::{ItemGrid, SelectOutcome},
    presentation::{GridRender, TableRender},
};

pub(crate) type CatalogFuture =
    Pin<Box<dyn Future<Output = AppResult<Vec<CatalogOption>>> + Send + 'static>>;

/// Items grid of a page whose records carry nested line items.
///
/// Object safe so pages without items need no generic parameter for them;
/// every call receives the record that owns the list.
pub(crate) trait ItemsPanel<E> {
    /// Starts a grid over the record's items; returns the mount ticket that
    /// catalog replies must carry.
    fn mount(&mut self, record: &E) -> u64;

    fn unmount(&mut self);

    fn is_mounted(&self) -> bool;

    fn ticket(&self) -> u64;

    fn catalog_request(&self, gateway: Arc<dyn Gateway>) -> CatalogFuture;

    fn catalog_title(&self) -> &'static str;

    fn set_options(&mut self, options: Vec<CatalogOption>);

    fn options(&self) -> &[CatalogOption];

    /// Whether Enter on the cursor cell picks a catalog entry.
    fn on_selector(&self) -> bool;

    fn cursor_catalog_id(&self, record: &E) -> Option<i64>;

    fn navigate(&mut self, record: &E, delta: i32) -> bool;

    fn move_column(&mut self, delta: i32);

    fn add_row(&mut self, record: &E) -> bool;

    fn delete_row(&mut self, record: &mut E) -> bool;

    fn select(&mut self, record: &mut E, catalog_id: i64) -> SelectOutcome;

    fn begin_cell_edit(&mut self, record: &E) -> AppResult<()>;

    fn is_cell_editing(&self) -> bool;

    fn edit_key(&mut self, key: &KeyEvent) -> bool;

    fn commit_cell_edit(&mut self, record: &mut E) -> AppResult<bool>;

    fn cancel_cell_edit(&mut self) -> bool;

    fn render(&self, record: &E, focused: bool) -> Option<GridRender>;
}

pub(crate) struct ItemSession<E: HasItems> {
    grid: Option<ItemGrid<E::Item>>,
    mounts: u64,
    page_size: usize,
    _record: PhantomData<fn() -> E>,
}

impl<E: HasItems> ItemSession<E> {
    pub(crate) fn new(page_size: usize) -> Self {
        Self {
            grid: None,
            mounts: 0,
            page_size,
            _record: PhantomData,
        }
    }

    fn unmounted() -> AppError {
        AppError::validation("items are not open for editing")
    }
}

impl<E: HasItems> ItemsPanel<E> for ItemSession<E> {
    fn mount(&mut self, record: &E) -> u64 {
        self.mounts += 1;
        self.grid = Some(ItemGrid::mount(record.items()).with_page_size(self.page_size));
        self.mounts
    }

    fn unmount(&mut self) {
        self.grid = None;
    }

    fn is_mounted(&self) -> bool {
        self.grid.is_some()
    }

    fn ticket(&self) -> u64 {
        self.mounts
    }

    fn catalog_request(&self, gateway: Arc<dyn Gateway>) -> CatalogFuture {
        Box::pin(async move {
            api::fetch_catalog::<<E::Item as LineItem>::Source>(gateway.as_ref()).await
        })
    }

    fn catalog_title(&self) -> &'static str {
        <<E::Item as LineItem>::Source as Entity>::KIND.title()
    }

    fn set_options(&mut self, options: Vec<CatalogOption>) {
        if let Some(grid) = self.grid.as_mut() {
            grid.set_options(options);
        }
    }

    fn options(&self) -> &[CatalogOption] {
        self.grid.as_ref().map(ItemGrid::options).unwrap_or(&[])
    }

    fn on_selector(&self) -> bool {
        self.grid
            .as_ref()
            .is_some_and(|grid| matches!(grid.column(), ItemColumn::Code | ItemColumn::Item))
    }

    fn cursor_catalog_id(&self, record: &E) -> Option<i64> {
        let grid = self.grid.as_ref()?;
        record
            .items()
            .get(grid.cursor().row)
            .map(LineItem::catalog_id)
    }

    fn navigate(&mut self, record: &E, delta: i32) -> bool {
        self.grid
            .as_mut()
            .is_some_and(|grid| grid.navigate(record.items(), delta))
    }

    fn move_column(&mut self, delta: i32) {
        if let Some(grid) = self.grid.as_mut() {
            grid.move_column(delta);
        }
    }

    fn add_row(&mut self, record: &E) -> bool {
        self.grid
            .as_mut()
            .is_some_and(|grid| grid.add_blank_row(record.items()))
    }

    fn delete_row(&mut self, record: &mut E) -> bool {
        let Some(grid) = self.grid.as_mut() else {
            return false;
        };
        let row_id = grid.cursor_row_id();
        grid.delete_row(record.items_mut(), row_id)
    }

    fn select(&mut self, record: &mut E, catalog_id: i64) -> SelectOutcome {
        match self.grid.as_mut() {
            Some(grid) => grid.select_at_cursor(record.items_mut(), catalog_id),
            None => SelectOutcome::Ignored,
        }
    }

    fn begin_cell_edit(&mut self, record: &E) -> AppResult<()> {
        self.grid
            .as_mut()
            .ok_or_else(Self::unmounted)?
            .begin_cell_edit(record.items())
    }

    fn is_cell_editing(&self) -> bool {
        self.grid.as_ref().is_some_and(|grid| grid.editor().is_some())
    }

    fn edit_key(&mut self, key: &KeyEvent) -> bool {
        self.grid.as_mut().is_some_and(|grid| grid.edit_key(key))
    }

    fn commit_cell_edit(&mut self, record: &mut E) -> AppResult<bool> {
        match self.grid.as_mut() {
            Some(grid) => grid.commit_cell_edit(record.items_mut()),
            None => Ok(false),
        }
    }

    fn cancel_cell_edit(&mut self) -> bool {
        self.grid.as_mut().is_some_and(ItemGrid::cancel_cell_edit)
    }

    fn render(&self, record: &E, focused: bool) -> Option<GridRender> {
        let grid = self.grid.as_ref()?;
        let items = record.items();
        let columns = <E::Item as LineItem>::COLUMNS;
        let window = grid.visible_rows(items);
        let all_rows = grid.rows(items);
        let rows = all_rows[window.clone()]
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|column| match row.item {
                        Some(item) => item_cell(grid, item, *column),
                        None if *column == ItemColumn::Item => "<select item>".to_string(),
                        None => String::new(),
                    })
                    .collect()
            })
            .collect();
        let cursor = grid.cursor().row;
        let pages = grid.row_count(items).div_ceil(grid.page_size()).max(1);
        Some(GridRender {
            table: TableRender {
                headers: columns
                    .iter()
                    .map(|column| (column.header().to_string(), column.width()))
                    .collect(),
                rows,
                selected: (window.contains(&cursor)).then(|| cursor - window.start),
                caption: format!(
                    "{} items • total {:.2} • page {}/{}",
                    items.len(),
                    grid.total(items),
                    cursor / grid.page_size() + 1,
                    pages
                ),
            },
            cursor_column: grid.cursor().column,
            focused,
            editor: grid.editor().map(|editor| editor.buffer.clone()),
        })
    }
}

fn item_cell<T: LineItem>(grid: &ItemGrid<T>, item: &T, column: ItemColumn) -> String {
    match column {
        ItemColumn::Code => item.catalog_id().to_string(),
        ItemColumn::Item => grid.label_of(item),
        ItemColumn::Quantity => crate::form::format_decimal(item.quantity()),
        ItemColumn::Price => format!("{:.2}", item.price()),
        ItemColumn::Observation => item.observation().to_string(),
        ItemColumn::Total => format!("{:.2}", item.total()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Order, OrderItem};

    fn cake() -> CatalogOption {
        CatalogOption {
            id: 1,
            label: "Carrot cake".into(),
            price: 35.0,
        }
    }

    #[test]
    fn selection_writes_into_the_record() {
        let mut order = Order::default();
        let mut session = ItemSession::<Order>::new(5);
        session.mount(&order);
        session.set_options(vec![cake()]);
        assert_eq!(
            session.select(&mut order, 1),
            SelectOutcome::Appended { row_id: 1 }
        );
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].price, 35.0);
        assert_eq!(session.cursor_catalog_id(&order), Some(1));
    }

    #[test]
    fn render_projects_blank_row_and_total() {
        let mut order = Order {
            items: vec![OrderItem::from_catalog(&cake())],
            ..Order::default()
        };
        order.items[0].quantity = 2.0;
        let mut session = ItemSession::<Order>::new(5);
        session.mount(&order);
        let view = session.render(&order, true).expect("grid");
        assert_eq!(view.table.rows.len(), 2);
        assert_eq!(view.table.rows[0][5], "70.00");
        assert_eq!(view.table.rows[1][1], "<select item>");
        assert!(view.table.caption.contains("total 70.00"));
    }

    #[test]
    fn unmounted_session_ignores_input() {
        let mut order = Order::default();
        let mut session = ItemSession::<Order>::new(5);
        assert!(!session.delete_row(&mut order));
        assert_eq!(session.select(&mut order, 1), SelectOutcome::Ignored);
        assert!(session.render(&order, false).is_none());
        assert!(session.begin_cell_edit(&order).is_err());
    }

    #[test]
    fn every_mount_issues_a_new_ticket() {
        let order = Order::default();
        let mut session = ItemSession::<Order>::new(5);
        let first = session.mount(&order);
        let second = session.mount(&order);
        assert_ne!(first, second);
        assert_eq!(session.ticket(), second);
    }
}
