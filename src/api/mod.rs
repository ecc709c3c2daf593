//! REST access to the backend.
//!
//! [`Gateway`] speaks raw JSON so it stays object safe; the free functions
//! below add the typed layer every page uses.

#[cfg(feature = "http")]
mod http;
mod memory;

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    domain::{CatalogOption, Catalogued, Entity},
    error::AppResult,
};

#[cfg(feature = "http")]
pub use http::HttpGateway;
pub use memory::MemoryGateway;

/// One backend resource per entity: `GET /<Entity>`, `GET /<Entity>/<id>`,
/// `POST /<Entity>` and `DELETE /<Entity>/<id>`.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn list(&self, resource: &str) -> AppResult<Value>;

    async fn get(&self, resource: &str, id: i64) -> AppResult<Value>;

    /// Creates the record, or updates it when the body carries an `id`.
    async fn post(&self, resource: &str, body: Value) -> AppResult<Value>;

    async fn delete(&self, resource: &str, id: i64) -> AppResult<()>;
}

pub async fn fetch_all<E: Entity>(gateway: &dyn Gateway) -> AppResult<Vec<E>> {
    let value = gateway.list(E::KIND.resource()).await?;
    if value.is_null() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_value(value)?)
}

pub async fn fetch_one<E: Entity>(gateway: &dyn Gateway, id: i64) -> AppResult<E> {
    let value = gateway.get(E::KIND.resource(), id).await?;
    Ok(serde_json::from_value(value)?)
}

/// Posts `record` and returns the id the backend reports, falling back to
/// the record's own id.
pub async fn store<E: Entity>(gateway: &dyn Gateway, record: &E) -> AppResult<Option<i64>> {
    let body = serde_json::to_value(record)?;
    let response = gateway.post(E::KIND.resource(), body).await?;
    Ok(response
        .get("id")
        .and_then(Value::as_i64)
        .or_else(|| record.id()))
}

pub async fn remove<E: Entity>(gateway: &dyn Gateway, id: i64) -> AppResult<()> {
    gateway.delete(E::KIND.resource(), id).await
}

/// Selectable entries for an item grid; records without an id are skipped.
pub async fn fetch_catalog<S: Catalogued>(gateway: &dyn Gateway) -> AppResult<Vec<CatalogOption>> {
    let records = fetch_all::<S>(gateway).await?;
    Ok(records
        .iter()
        .filter_map(Catalogued::catalog_option)
        .collect())
}
