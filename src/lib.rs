#![deny(rust_2018_idioms)]

pub mod api;
mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod form;
pub mod grid;
pub mod notify;
mod presentation;

pub use app::{Bakehouse, UiOptions};

pub mod prelude {
    #[cfg(feature = "http")]
    pub use super::api::HttpGateway;
    pub use super::api::{Gateway, MemoryGateway};
    pub use super::config::Settings;
    pub use super::error::{AppError, AppResult, ErrorKind};
    pub use super::{Bakehouse, UiOptions};
}
