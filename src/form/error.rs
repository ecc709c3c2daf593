use crate::error::AppError;

#[derive(Debug, Clone, PartialEq)]
pub struct FieldCoercionError {
    pub key: String,
    pub message: String,
}

impl std::fmt::Display for FieldCoercionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.key, self.message)
    }
}

impl std::error::Error for FieldCoercionError {}

impl From<FieldCoercionError> for AppError {
    fn from(err: FieldCoercionError) -> Self {
        AppError::validation(err.message)
    }
}
