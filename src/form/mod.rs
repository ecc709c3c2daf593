mod error;
mod field;
mod record;
mod validation;

pub use error::FieldCoercionError;
pub use field::FieldState;
pub use record::{FormMode, RecordForm};
pub use validation::check_field;

pub(crate) use field::{format_decimal, handle_text_edit, parse_decimal, value_to_string};
