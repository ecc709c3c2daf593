use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

use super::{
    CatalogOption, Catalogued, ColumnSchema, Entity, EntityKind, FieldKind, FieldSchema,
    HasItems, LineItem, OrderItem, RecipeItem, Rule,
};

const ID_FIELD: FieldSchema = FieldSchema::new("id", "Code", FieldKind::Integer)
    .read_only()
    .width(8);

const ITEMS_REQUIRED: &str = "items are required";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Client {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub city: String,
}

const CLIENT_FIELDS: &[FieldSchema] = &[
    ID_FIELD,
    FieldSchema::new("name", "Name", FieldKind::Text)
        .width(40)
        .rules(&[Rule::Required("Name is required.")]),
    FieldSchema::new("phone", "Phone", FieldKind::Text)
        .width(16)
        .rules(&[Rule::Required("Phone is required.")]),
    FieldSchema::new("address", "Address", FieldKind::Text)
        .width(40)
        .rules(&[Rule::Required("Address is required.")]),
    FieldSchema::new("number", "Number", FieldKind::Text)
        .width(8)
        .rules(&[Rule::Required("Delivery number is required.")]),
    FieldSchema::new("district", "District", FieldKind::Text)
        .rules(&[Rule::Required("District is required.")]),
    FieldSchema::new("city", "City", FieldKind::Text)
        .rules(&[Rule::Required("City is required.")]),
];

const CLIENT_COLUMNS: &[ColumnSchema] = &[
    ColumnSchema::new("id", "Code", 6),
    ColumnSchema::new("name", "Name", 28),
    ColumnSchema::new("phone", "Phone", 14),
    ColumnSchema::new("address", "Address", 22),
    ColumnSchema::new("number", "Nr", 6),
    ColumnSchema::new("district", "District", 16),
    ColumnSchema::new("city", "City", 16),
];

impl Entity for Client {
    const KIND: EntityKind = EntityKind::Client;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }

    fn fields() -> &'static [FieldSchema] {
        CLIENT_FIELDS
    }

    fn columns() -> &'static [ColumnSchema] {
        CLIENT_COLUMNS
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub unity: String,
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub stock: f64,
}

const INGREDIENT_FIELDS: &[FieldSchema] = &[
    ID_FIELD,
    FieldSchema::new("description", "Description", FieldKind::Text)
        .width(40)
        .rules(&[Rule::Required("Description is required.")]),
    FieldSchema::new("unity", "Unit", FieldKind::Text)
        .width(8)
        .rules(&[Rule::Required("Unit is required.")]),
    FieldSchema::new("cost", "Cost", FieldKind::Decimal)
        .width(10)
        .rules(&[
            Rule::Required("Cost is required."),
            Rule::Min(0.0, "Cost cannot be negative."),
        ]),
    FieldSchema::new("stock", "Stock", FieldKind::Decimal)
        .width(10)
        .rules(&[Rule::Min(0.0, "Stock cannot be negative.")]),
];

const INGREDIENT_COLUMNS: &[ColumnSchema] = &[
    ColumnSchema::new("id", "Code", 6),
    ColumnSchema::new("description", "Description", 30),
    ColumnSchema::new("unity", "Unit", 8),
    ColumnSchema::new("cost", "Cost", 10),
    ColumnSchema::new("stock", "Stock", 10),
];

impl Entity for Ingredient {
    const KIND: EntityKind = EntityKind::Ingredient;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }

    fn fields() -> &'static [FieldSchema] {
        INGREDIENT_FIELDS
    }

    fn columns() -> &'static [ColumnSchema] {
        INGREDIENT_COLUMNS
    }
}

impl Catalogued for Ingredient {
    fn catalog_option(&self) -> Option<CatalogOption> {
        Some(CatalogOption {
            id: self.id?,
            label: self.description.clone(),
            price: self.cost,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub unity: String,
    #[serde(default)]
    pub stock: f64,
    #[serde(default)]
    pub cost: f64,
}

const PRODUCT_FIELDS: &[FieldSchema] = &[
    ID_FIELD,
    FieldSchema::new("description", "Description", FieldKind::Text)
        .width(40)
        .rules(&[Rule::Required("Description is required.")]),
    FieldSchema::new("price", "Price", FieldKind::Decimal)
        .width(10)
        .rules(&[
            Rule::Required("Price is required."),
            Rule::Min(0.0, "Price cannot be negative."),
        ]),
    FieldSchema::new("unity", "Unit", FieldKind::Text)
        .width(8)
        .rules(&[Rule::Required("Unit is required.")]),
    FieldSchema::new("cost", "Cost", FieldKind::Decimal)
        .width(10)
        .rules(&[Rule::Min(0.0, "Cost cannot be negative.")]),
    FieldSchema::new("stock", "Stock", FieldKind::Decimal)
        .width(10)
        .rules(&[Rule::Min(0.0, "Stock cannot be negative.")]),
];

const PRODUCT_COLUMNS: &[ColumnSchema] = &[
    ColumnSchema::new("id", "Code", 6),
    ColumnSchema::new("description", "Description", 30),
    ColumnSchema::new("price", "Price", 10),
    ColumnSchema::new("unity", "Unit", 8),
    ColumnSchema::new("cost", "Cost", 10),
    ColumnSchema::new("stock", "Stock", 10),
];

impl Entity for Product {
    const KIND: EntityKind = EntityKind::Product;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }

    fn fields() -> &'static [FieldSchema] {
        PRODUCT_FIELDS
    }

    fn columns() -> &'static [ColumnSchema] {
        PRODUCT_COLUMNS
    }
}

impl Catalogued for Product {
    fn catalog_option(&self) -> Option<CatalogOption> {
        Some(CatalogOption {
            id: self.id?,
            label: self.description.clone(),
            price: self.price,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub description: String,
    /// Sum of item cost times quantity, recomputed on submit.
    #[serde(default)]
    pub cost: f64,
    #[serde(rename = "itens", default)]
    pub items: Vec<RecipeItem>,
}

const RECIPE_FIELDS: &[FieldSchema] = &[
    ID_FIELD,
    FieldSchema::new("description", "Description", FieldKind::Text)
        .width(40)
        .rules(&[Rule::Required("Description is required.")]),
    FieldSchema::new("cost", "Cost", FieldKind::Decimal)
        .read_only()
        .width(10),
];

const RECIPE_COLUMNS: &[ColumnSchema] = &[
    ColumnSchema::new("id", "Code", 6),
    ColumnSchema::new("description", "Description", 30),
    ColumnSchema::new("cost", "Cost", 10),
];

impl Entity for Recipe {
    const KIND: EntityKind = EntityKind::Recipe;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }

    fn fields() -> &'static [FieldSchema] {
        RECIPE_FIELDS
    }

    fn columns() -> &'static [ColumnSchema] {
        RECIPE_COLUMNS
    }

    fn validate(&self) -> AppResult<()> {
        if self.items.is_empty() {
            return Err(AppError::validation(ITEMS_REQUIRED));
        }
        Ok(())
    }

    fn prepare_submit(&mut self) {
        self.cost = self.items.iter().map(LineItem::total).sum();
    }
}

impl HasItems for Recipe {
    type Item = RecipeItem;

    fn items(&self) -> &[RecipeItem] {
        &self.items
    }

    fn items_mut(&mut self) -> &mut Vec<RecipeItem> {
        &mut self.items
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Client reference as `"<id> - <name>"` or free text.
    #[serde(default)]
    pub client: String,
    #[serde(default)]
    pub delivery_date: String,
    #[serde(default)]
    pub observation: String,
    #[serde(default)]
    pub paid: bool,
    #[serde(rename = "itens", default)]
    pub items: Vec<OrderItem>,
}

const ORDER_FIELDS: &[FieldSchema] = &[
    ID_FIELD,
    FieldSchema::new("client", "Client", FieldKind::Lookup)
        .width(40)
        .rules(&[Rule::Required("Client is required.")]),
    FieldSchema::new("delivery_date", "Delivery date", FieldKind::Date)
        .width(12)
        .rules(&[Rule::Required("Delivery date is required.")]),
    FieldSchema::new("paid", "Paid", FieldKind::Flag).width(6),
    FieldSchema::new("observation", "Observation", FieldKind::Text).width(60),
];

const ORDER_COLUMNS: &[ColumnSchema] = &[
    ColumnSchema::new("id", "Number", 8),
    ColumnSchema::new("client", "Client", 28),
    ColumnSchema::new("delivery_date", "Delivery", 12),
    ColumnSchema::new("paid", "Paid", 6),
    ColumnSchema::new("observation", "Observation", 28),
];

impl Entity for Order {
    const KIND: EntityKind = EntityKind::Order;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }

    fn fields() -> &'static [FieldSchema] {
        ORDER_FIELDS
    }

    fn columns() -> &'static [ColumnSchema] {
        ORDER_COLUMNS
    }

    fn validate(&self) -> AppResult<()> {
        if self.items.is_empty() {
            return Err(AppError::validation(ITEMS_REQUIRED));
        }
        Ok(())
    }

    fn prepare_submit(&mut self) {
        for (index, item) in self.items.iter_mut().enumerate() {
            item.order_item_order = index as i64;
        }
    }
}

impl HasItems for Order {
    type Item = OrderItem;

    fn items(&self) -> &[OrderItem] {
        &self.items
    }

    fn items_mut(&mut self) -> &mut Vec<OrderItem> {
        &mut self.items
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn new_records_serialize_without_id() {
        let client = Client {
            name: "Ana".into(),
            ..Client::default()
        };
        let value = serde_json::to_value(&client).expect("serialize");
        assert!(value.get("id").is_none());
        assert_eq!(value["name"], "Ana");
    }

    #[test]
    fn recipe_items_use_backend_key() {
        let recipe: Recipe = serde_json::from_value(json!({
            "id": 3,
            "description": "Bread",
            "itens": [{"ingredient_id": 1, "description": "Flour", "quantity": 2, "cost": 1.5}]
        }))
        .expect("recipe");
        assert_eq!(recipe.items.len(), 1);
        assert_eq!(recipe.items[0].ingredient_id, 1);
        let back = serde_json::to_value(&recipe).expect("serialize");
        assert!(back.get("itens").is_some());
    }

    #[test]
    fn recipe_cost_is_recomputed_on_submit() {
        let mut recipe = Recipe {
            cost: 99.0,
            items: vec![
                RecipeItem {
                    ingredient_id: 1,
                    quantity: 2.0,
                    cost: 1.5,
                    ..RecipeItem::default()
                },
                RecipeItem {
                    ingredient_id: 2,
                    quantity: 1.0,
                    cost: 4.0,
                    ..RecipeItem::default()
                },
            ],
            ..Recipe::default()
        };
        recipe.prepare_submit();
        assert_eq!(recipe.cost, 7.0);
    }

    #[test]
    fn order_items_are_renumbered_on_submit() {
        let mut order = Order {
            items: vec![
                OrderItem {
                    order_item_order: 7,
                    ..OrderItem::default()
                },
                OrderItem {
                    order_item_order: 7,
                    ..OrderItem::default()
                },
            ],
            ..Order::default()
        };
        order.prepare_submit();
        let positions: Vec<i64> = order.items.iter().map(|i| i.order_item_order).collect();
        assert_eq!(positions, vec![0, 1]);
    }

    #[test]
    fn records_with_items_require_items() {
        let err = Recipe::default().validate().unwrap_err();
        assert_eq!(err.message, "items are required");
        assert!(Order::default().validate().is_err());
        assert!(Client::default().validate().is_ok());
    }

    #[test]
    fn catalog_options_need_an_id() {
        let mut flour = Ingredient {
            description: "Flour".into(),
            cost: 2.0,
            ..Ingredient::default()
        };
        assert!(flour.catalog_option().is_none());
        flour.id = Some(1);
        let option = flour.catalog_option().expect("option");
        assert_eq!(option.label, "Flour");
        assert_eq!(option.price, 2.0);
    }
}
