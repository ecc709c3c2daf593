/// What a key press means in the active keymap context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeyAction {
    Quit,
    PageStep(i32),
    Add,
    Edit,
    Delete,
    RowStep(i32),
    RowPage(i32),
    Dismiss,
    Save,
    Cancel,
    FieldStep(i32),
    OpenPopup,
    ToggleGrid,
    GridRow(i32),
    GridColumn(i32),
    GridActivate,
    GridAddRow,
    GridDeleteRow,
}
