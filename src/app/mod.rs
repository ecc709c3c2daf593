mod bakehouse;
pub(crate) mod input;
mod items;
pub(crate) mod keymap;
mod options;
mod page;
mod popup;
mod runtime;
mod status;
mod tasks;
mod terminal;

pub use bakehouse::Bakehouse;
pub use options::UiOptions;
