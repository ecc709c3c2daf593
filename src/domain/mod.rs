mod items;
mod records;
mod schema;

use serde::{Serialize, de::DeserializeOwned};

use crate::error::AppResult;

pub use items::{CatalogOption, ItemColumn, LineItem, OrderItem, RecipeItem};
pub use records::{Client, Ingredient, Order, Product, Recipe};
pub use schema::{ColumnSchema, FieldKind, FieldSchema, Rule};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Client,
    Ingredient,
    Product,
    Recipe,
    Order,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Client,
        EntityKind::Ingredient,
        EntityKind::Product,
        EntityKind::Recipe,
        EntityKind::Order,
    ];

    /// REST resource segment served by the backend.
    pub fn resource(self) -> &'static str {
        match self {
            EntityKind::Client => "Cliente",
            EntityKind::Ingredient => "Ingrediente",
            EntityKind::Product => "Produto",
            EntityKind::Recipe => "Receita",
            EntityKind::Order => "Pedido",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            EntityKind::Client => "Clients",
            EntityKind::Ingredient => "Ingredients",
            EntityKind::Product => "Products",
            EntityKind::Recipe => "Recipes",
            EntityKind::Order => "Orders",
        }
    }
}

/// A record managed by one page: a form over its scalar fields plus a list grid.
pub trait Entity:
    Clone + Default + std::fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    const KIND: EntityKind;

    fn id(&self) -> Option<i64>;

    fn set_id(&mut self, id: Option<i64>);

    /// Form fields in focus order.
    fn fields() -> &'static [FieldSchema];

    /// Columns of the list grid.
    fn columns() -> &'static [ColumnSchema];

    /// Record-level rules, checked after every field rule passed.
    fn validate(&self) -> AppResult<()> {
        Ok(())
    }

    /// Derived values recomputed right before the record is posted.
    fn prepare_submit(&mut self) {}
}

/// Entity whose records carry a nested, ordered list of line items.
pub trait HasItems: Entity {
    type Item: LineItem;

    fn items(&self) -> &[Self::Item];

    fn items_mut(&mut self) -> &mut Vec<Self::Item>;
}

/// Entity that can be offered as a selectable catalog option.
pub trait Catalogued: Entity {
    fn catalog_option(&self) -> Option<CatalogOption>;
}
