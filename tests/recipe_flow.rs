use bakehouse::{
    api::{self, MemoryGateway},
    domain::{
        Entity, Ingredient, ItemColumn, LineItem, Order, OrderItem, Product, Recipe, RecipeItem,
    },
    error::ErrorKind,
    grid::{ItemGrid, SelectOutcome},
};

#[tokio::test]
async fn flour_selected_twice_becomes_quantity_two() {
    let gateway = MemoryGateway::demo();
    let catalog = api::fetch_catalog::<Ingredient>(&gateway)
        .await
        .expect("catalog");
    let flour = catalog
        .iter()
        .find(|option| option.label == "Flour")
        .expect("flour")
        .id;

    let mut recipe = Recipe {
        description: "Bread".into(),
        ..Recipe::default()
    };
    let mut grid = ItemGrid::<RecipeItem>::mount(&recipe.items);
    grid.set_options(catalog);

    assert_eq!(
        grid.select_catalog(&mut recipe.items, 1, flour),
        SelectOutcome::Appended { row_id: 1 }
    );
    assert_eq!(recipe.items[0].description, "Flour");
    assert_eq!(recipe.items[0].cost, 2.0);
    assert_eq!(recipe.items[0].quantity, 1.0);

    assert_eq!(
        grid.select_catalog(&mut recipe.items, 2, flour),
        SelectOutcome::Incremented { row_id: 1 }
    );
    assert_eq!(recipe.items.len(), 1);
    assert_eq!(recipe.items[0].quantity, 2.0);
    assert_eq!(grid.total(&recipe.items), 4.0);

    recipe.validate().expect("has items");
    recipe.prepare_submit();
    assert_eq!(recipe.cost, 4.0);
    let id = api::store(&gateway, &recipe).await.expect("store");
    let stored: Recipe = api::fetch_one(&gateway, id.expect("id")).await.expect("fetch");
    assert_eq!(stored.items, recipe.items);
    assert_eq!(stored.cost, 4.0);
}

#[test]
fn recipe_without_items_is_rejected() {
    let recipe = Recipe {
        description: "Empty".into(),
        ..Recipe::default()
    };
    let err = recipe.validate().unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn order_grid_edits_and_deletes_rows() {
    let gateway = MemoryGateway::demo();
    let mut order: Order = api::fetch_one(&gateway, 1).await.expect("order");
    let catalog = api::fetch_catalog::<Product>(&gateway).await.expect("catalog");
    let mut grid = ItemGrid::<OrderItem>::mount(&order.items);
    grid.set_options(catalog);
    assert_eq!(grid.row_count(&order.items), 3);

    grid.edit_cell(&mut order.items, 1, ItemColumn::Quantity, "2")
        .expect("quantity");
    assert_eq!(order.items[0].total(), 70.0);

    let err = grid
        .edit_cell(&mut order.items, 1, ItemColumn::Quantity, "0")
        .unwrap_err();
    assert_eq!(err.message, "Quantity must be greater than zero.");
    assert_eq!(order.items[0].quantity, 2.0);

    let err = grid
        .edit_cell(&mut order.items, 3, ItemColumn::Price, "1")
        .unwrap_err();
    assert_eq!(err.message, "select an item first");

    assert!(grid.delete_row(&mut order.items, 1));
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].description, "Cheese bread");
    assert!(!grid.delete_row(&mut order.items, 9));
}
