mod components;
mod view;

pub use view::{
    DialogRender, FieldRender, FormRender, GridRender, PageRender, PopupRender, TableRender,
    ToastRender, UiContext, draw,
};
