use thiserror::Error;

/// Machine-readable category of an [`AppError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected before any request was issued.
    Validation,
    /// The request never produced a response.
    Network,
    /// The server answered with a non-2xx status.
    Http(u16),
    /// The response body did not match the expected shape.
    Decode,
    NotFound,
}

/// Error surfaced to the user through the notification layer.
///
/// `message` is always displayable as-is; `kind` is what code should branch on.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn not_found(resource: &str, id: i64) -> Self {
        Self::new(ErrorKind::NotFound, format!("{resource} {id} not found"))
    }

    pub fn is_validation(&self) -> bool {
        self.kind == ErrorKind::Validation
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(ErrorKind::Decode, format!("unexpected payload: {err}"))
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            if status == reqwest::StatusCode::NOT_FOUND {
                return Self::new(ErrorKind::NotFound, format!("server responded with {status}"));
            }
            return Self::new(
                ErrorKind::Http(status.as_u16()),
                format!("server responded with {status}"),
            );
        }
        if err.is_decode() {
            return Self::new(ErrorKind::Decode, format!("unexpected response: {err}"));
        }
        Self::new(ErrorKind::Network, format!("request failed: {err}"))
    }
}
