use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::{Value, json};
use tokio::sync::Mutex;

use crate::{
    domain::EntityKind,
    error::{AppError, AppResult},
};

use super::Gateway;

#[derive(Debug, Default)]
struct Tables {
    rows: IndexMap<String, IndexMap<i64, Value>>,
    calls: usize,
    fail_next: Option<AppError>,
}

impl Tables {
    fn table(&mut self, resource: &str) -> &mut IndexMap<i64, Value> {
        self.rows.entry(resource.to_string()).or_default()
    }

    fn enter(&mut self) -> AppResult<()> {
        self.calls += 1;
        match self.fail_next.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn insert(&mut self, resource: &str, mut body: Value) -> AppResult<Value> {
        let table = self.table(resource);
        let Value::Object(fields) = &mut body else {
            return Err(AppError::validation(format!(
                "{resource} body must be an object"
            )));
        };
        let id = match fields.get("id").and_then(Value::as_i64) {
            Some(id) => id,
            None => {
                let next = table.keys().copied().max().unwrap_or(0) + 1;
                fields.insert("id".to_string(), Value::from(next));
                next
            }
        };
        table.insert(id, body.clone());
        Ok(body)
    }
}

/// [`Gateway`] backed by in-process tables, used by `--demo` and by tests.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    tables: Mutex<Tables>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gateway seeded with a small bakery catalog.
    pub fn demo() -> Self {
        let mut tables = Tables::default();
        let seed = [
            (
                EntityKind::Client,
                vec![
                    json!({"name": "Ana Souza", "phone": "555-0101", "address": "Rua das Flores", "number": "12", "district": "Centro", "city": "Campinas"}),
                    json!({"name": "Bruno Lima", "phone": "555-0102", "address": "Av. Brasil", "number": "450", "district": "Jardim", "city": "Campinas"}),
                    json!({"name": "Carla Dias", "phone": "555-0103", "address": "Rua Sete", "number": "7", "district": "Vila Nova", "city": "Valinhos"}),
                ],
            ),
            (
                EntityKind::Ingredient,
                vec![
                    json!({"description": "Flour", "unity": "kg", "cost": 2.0, "stock": 50.0}),
                    json!({"description": "Sugar", "unity": "kg", "cost": 3.5, "stock": 20.0}),
                    json!({"description": "Eggs", "unity": "un", "cost": 0.5, "stock": 120.0}),
                    json!({"description": "Butter", "unity": "kg", "cost": 9.0, "stock": 8.0}),
                ],
            ),
            (
                EntityKind::Product,
                vec![
                    json!({"description": "Carrot cake", "price": 35.0, "unity": "un", "stock": 4.0, "cost": 12.0}),
                    json!({"description": "Cheese bread", "price": 1.5, "unity": "un", "stock": 200.0, "cost": 0.4}),
                    json!({"description": "Brownie", "price": 6.0, "unity": "un", "stock": 30.0, "cost": 2.1}),
                ],
            ),
            (
                EntityKind::Recipe,
                vec![json!({
                    "description": "Sponge cake",
                    "cost": 7.5,
                    "itens": [
                        {"ingredient_id": 1, "description": "Flour", "quantity": 1.0, "cost": 2.0},
                        {"ingredient_id": 3, "description": "Eggs", "quantity": 4.0, "cost": 0.5},
                        {"ingredient_id": 2, "description": "Sugar", "quantity": 1.0, "cost": 3.5},
                    ],
                })],
            ),
            (
                EntityKind::Order,
                vec![json!({
                    "client": "1 - Ana Souza",
                    "delivery_date": "2026-10-24",
                    "observation": "Pick up after 5pm",
                    "paid": false,
                    "itens": [
                        {"order_item_order": 0, "product_id": 1, "description": "Carrot cake", "quantity": 1.0, "price": 35.0, "observation": ""},
                        {"order_item_order": 1, "product_id": 2, "description": "Cheese bread", "quantity": 20.0, "price": 1.5, "observation": "warm"},
                    ],
                })],
            ),
        ];
        for (kind, records) in seed {
            for record in records {
                // Seed rows are objects, so insertion cannot fail.
                let _ = tables.insert(kind.resource(), record);
            }
        }
        Self {
            tables: Mutex::new(tables),
        }
    }

    /// Number of gateway calls served so far, failed ones included.
    pub async fn calls(&self) -> usize {
        self.tables.lock().await.calls
    }

    /// Makes the next call fail with `err`.
    pub async fn fail_next(&self, err: AppError) {
        self.tables.lock().await.fail_next = Some(err);
    }

    pub async fn records(&self, resource: &str) -> Vec<Value> {
        let mut tables = self.tables.lock().await;
        tables.table(resource).values().cloned().collect()
    }
}

#[async_trait]
impl Gateway for MemoryGateway {
    async fn list(&self, resource: &str) -> AppResult<Value> {
        let mut tables = self.tables.lock().await;
        tables.enter()?;
        let rows = tables.table(resource).values().cloned().collect();
        Ok(Value::Array(rows))
    }

    async fn get(&self, resource: &str, id: i64) -> AppResult<Value> {
        let mut tables = self.tables.lock().await;
        tables.enter()?;
        tables
            .table(resource)
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::not_found(resource, id))
    }

    async fn post(&self, resource: &str, body: Value) -> AppResult<Value> {
        let mut tables = self.tables.lock().await;
        tables.enter()?;
        tables.insert(resource, body)
    }

    async fn delete(&self, resource: &str, id: i64) -> AppResult<()> {
        let mut tables = self.tables.lock().await;
        tables.enter()?;
        tables
            .table(resource)
            .shift_remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::not_found(resource, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[tokio::test]
    async fn post_with_id_updates_in_place() {
        let gateway = MemoryGateway::demo();
        gateway
            .post("Cliente", json!({"id": 2, "name": "Bruno L."}))
            .await
            .expect("update");
        let rows = gateway.records("Cliente").await;
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1]["name"], "Bruno L.");
    }

    #[tokio::test]
    async fn post_without_id_appends_next_id() {
        let gateway = MemoryGateway::demo();
        let saved = gateway
            .post("Ingrediente", json!({"description": "Milk"}))
            .await
            .expect("create");
        assert_eq!(saved["id"], 5);
    }

    #[tokio::test]
    async fn injected_failure_hits_one_call() {
        let gateway = MemoryGateway::new();
        gateway
            .fail_next(AppError::new(ErrorKind::Http(500), "server responded with 500"))
            .await;
        let err = gateway.list("Produto").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Http(500));
        assert_eq!(gateway.list("Produto").await, Ok(Value::Array(Vec::new())));
        assert_eq!(gateway.calls().await, 2);
    }

    #[tokio::test]
    async fn delete_preserves_order_of_remaining_rows() {
        let gateway = MemoryGateway::demo();
        gateway.delete("Cliente", 1).await.expect("delete");
        let rows = gateway.records("Cliente").await;
        assert_eq!(rows[0]["id"], 2);
        assert_eq!(rows[1]["id"], 3);
    }
}
