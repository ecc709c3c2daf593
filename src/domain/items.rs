use serde::{Deserialize, Serialize, de::DeserializeOwned};

use super::{Catalogued, Ingredient, Product};

/// Selectable reference entry offered by an item grid.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogOption {
    pub id: i64,
    pub label: String,
    pub price: f64,
}

impl CatalogOption {
    /// Stand-in for a catalog id that is not in the loaded option list.
    pub fn unresolved(id: i64) -> Self {
        Self {
            id,
            label: String::new(),
            price: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemColumn {
    Code,
    Item,
    Quantity,
    Price,
    Observation,
    Total,
}

impl ItemColumn {
    pub fn header(self) -> &'static str {
        match self {
            ItemColumn::Code => "Code",
            ItemColumn::Item => "Item",
            ItemColumn::Quantity => "Qty",
            ItemColumn::Price => "Price",
            ItemColumn::Observation => "Observation",
            ItemColumn::Total => "Total",
        }
    }

    pub fn width(self) -> u16 {
        match self {
            ItemColumn::Code => 6,
            ItemColumn::Item => 28,
            ItemColumn::Quantity | ItemColumn::Price | ItemColumn::Total => 10,
            ItemColumn::Observation => 24,
        }
    }

    pub fn is_editable(self) -> bool {
        matches!(
            self,
            ItemColumn::Quantity | ItemColumn::Price | ItemColumn::Observation
        )
    }
}

/// One entry of a record's nested list.
pub trait LineItem:
    Clone + Default + PartialEq + std::fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Entity the item references by catalog id.
    type Source: Catalogued;

    const COLUMNS: &'static [ItemColumn];

    /// Builds a fresh item for `option` with a quantity of one.
    fn from_catalog(option: &CatalogOption) -> Self;

    fn catalog_id(&self) -> i64;

    fn description(&self) -> &str;

    fn quantity(&self) -> f64;

    fn set_quantity(&mut self, quantity: f64);

    fn price(&self) -> f64;

    fn set_price(&mut self, price: f64);

    fn observation(&self) -> &str {
        ""
    }

    fn set_observation(&mut self, _observation: String) {}

    fn total(&self) -> f64 {
        self.price() * self.quantity()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeItem {
    #[serde(default)]
    pub ingredient_id: i64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub quantity: f64,
    /// Unit cost of the ingredient.
    #[serde(default)]
    pub cost: f64,
}

impl LineItem for RecipeItem {
    type Source = Ingredient;

    const COLUMNS: &'static [ItemColumn] = &[
        ItemColumn::Code,
        ItemColumn::Item,
        ItemColumn::Quantity,
        ItemColumn::Price,
        ItemColumn::Total,
    ];

    fn from_catalog(option: &CatalogOption) -> Self {
        Self {
            ingredient_id: option.id,
            description: option.label.clone(),
            quantity: 1.0,
            cost: option.price,
        }
    }

    fn catalog_id(&self) -> i64 {
        self.ingredient_id
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn quantity(&self) -> f64 {
        self.quantity
    }

    fn set_quantity(&mut self, quantity: f64) {
        self.quantity = quantity;
    }

    fn price(&self) -> f64 {
        self.cost
    }

    fn set_price(&mut self, price: f64) {
        self.cost = price;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Position of the item within its order, renumbered on submit.
    #[serde(default)]
    pub order_item_order: i64,
    #[serde(default)]
    pub product_id: i64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub observation: String,
}

impl LineItem for OrderItem {
    type Source = Product;

    const COLUMNS: &'static [ItemColumn] = &[
        ItemColumn::Code,
        ItemColumn::Item,
        ItemColumn::Quantity,
        ItemColumn::Price,
        ItemColumn::Observation,
        ItemColumn::Total,
    ];

    fn from_catalog(option: &CatalogOption) -> Self {
        Self {
            order_item_order: 0,
            product_id: option.id,
            description: option.label.clone(),
            quantity: 1.0,
            price: option.price,
            observation: String::new(),
        }
    }

    fn catalog_id(&self) -> i64 {
        self.product_id
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn quantity(&self) -> f64 {
        self.quantity
    }

    fn set_quantity(&mut self, quantity: f64) {
        self.quantity = quantity;
    }

    fn price(&self) -> f64 {
        self.price
    }

    fn set_price(&mut self, price: f64) {
        self.price = price;
    }

    fn observation(&self) -> &str {
        &self.observation
    }

    fn set_observation(&mut self, observation: String) {
        self.observation = observation;
    }
}
