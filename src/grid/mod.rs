mod items;
mod list;

pub use items::{CellEditor, DEFAULT_PAGE_SIZE, GridCursor, GridRow, ItemGrid, SelectOutcome};
pub use list::ListGrid;
