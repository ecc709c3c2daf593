mod footer;
mod form;
mod layout;
mod notice;
mod popup;
mod table;
mod tabstrip;
mod text;

pub use footer::render_footer;
pub use form::render_form;
pub use notice::{render_dialog, render_toast};
pub use popup::render_popup;
pub use table::{render_grid, render_list};
pub(crate) use tabstrip::render_tab_strip;
