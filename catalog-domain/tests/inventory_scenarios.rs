use anyhow::Result as AnyResult;
use catalog_domain::collection::Collection;
use catalog_domain::entity::Entity;
use catalog_domain::error::DomainError;
use catalog_domain::model::{InventoryValuation, Product, ProductId, ProductPatch};
use catalog_domain::persist::JsonFileStore;
use tempfile::TempDir;

fn open(dir: &TempDir) -> Collection<Product, JsonFileStore<Product>> {
    Collection::open(JsonFileStore::new(dir.path().join("inventario.json")))
}

#[test]
fn mouse_lifecycle_is_mirrored_to_disk() -> AnyResult<()> {
    let dir = TempDir::new()?;
    let mut inventory = open(&dir);
    assert!(inventory.is_empty());

    inventory.add(Product::new(1, "Mouse", 10, 5.0)?)?;
    assert_eq!(inventory.len(), 1);

    let id = ProductId::new(1);
    inventory.update(&id, ProductPatch::builder().price(7.5).build())?;
    assert_eq!(
        inventory.list_all(),
        vec![Product::new(1, "Mouse", 10, 7.5)?]
    );

    // 重新打开后看到的是最近一次成功写出的状态
    let reopened = open(&dir);
    assert_eq!(reopened.list_all(), inventory.list_all());

    let removed = inventory.remove(&id)?;
    assert_eq!(removed.price().value(), 7.5);
    assert_eq!(inventory.len(), 0);
    assert!(open(&dir).is_empty());
    Ok(())
}

#[test]
fn search_is_case_insensitive_substring() -> AnyResult<()> {
    let dir = TempDir::new()?;
    let mut inventory = open(&dir);
    inventory.add(Product::new(1, "Mouse", 10, 5.0)?)?;
    inventory.add(Product::new(2, "Keyboard", 3, 25.0)?)?;

    let hits = inventory.search("mou");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].label(), "Mouse");

    assert_eq!(inventory.search("").len(), 2);
    assert!(inventory.search("monitor").is_empty());
    Ok(())
}

#[test]
fn removing_unknown_id_leaves_collection_untouched() -> AnyResult<()> {
    let dir = TempDir::new()?;
    let mut inventory = open(&dir);
    inventory.add(Product::new(1, "Mouse", 10, 5.0)?)?;
    let before = inventory.list_all();

    let err = inventory.remove(&ProductId::new(42)).unwrap_err();
    assert!(matches!(err, DomainError::NotFound { kind: "product", .. }));
    assert_eq!(inventory.list_all(), before);
    Ok(())
}

#[test]
fn negative_values_never_reach_the_collection() -> AnyResult<()> {
    let dir = TempDir::new()?;
    let mut inventory = open(&dir);
    inventory.add(Product::new(1, "Mouse", 10, 5.0)?)?;

    assert!(Product::new(2, "Cable", -1, 1.0).is_err());
    let err = inventory
        .update(
            &ProductId::new(1),
            ProductPatch::builder().quantity(-5).build(),
        )
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidValue { field: "quantity", .. }));
    assert_eq!(
        inventory.get(&ProductId::new(1)).map(|p| p.quantity().value()),
        Some(10)
    );
    Ok(())
}

#[test]
fn list_all_is_idempotent_and_owned() -> AnyResult<()> {
    let dir = TempDir::new()?;
    let mut inventory = open(&dir);
    inventory.add(Product::new(2, "Keyboard", 3, 25.0)?)?;
    inventory.add(Product::new(1, "Mouse", 10, 5.0)?)?;

    let first = inventory.list_all();
    let mut second = inventory.list_all();
    assert_eq!(first, second);

    second.clear();
    assert_eq!(inventory.len(), 2);
    assert_eq!(*first[0].id().value(), 1);
    Ok(())
}

#[test]
fn corrupt_file_opens_empty_and_next_save_repairs_it() -> AnyResult<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("inventario.json");
    std::fs::write(&path, "{ not json")?;

    let mut inventory = open(&dir);
    assert!(inventory.is_empty());

    inventory.add(Product::new(1, "Mouse", 10, 5.0)?)?;
    assert_eq!(open(&dir).len(), 1);
    Ok(())
}

#[test]
fn valuation_over_reloaded_inventory() -> AnyResult<()> {
    let dir = TempDir::new()?;
    let mut inventory = open(&dir);
    inventory.add(Product::new(1, "Mouse", 10, 5.0)?)?;
    inventory.add(Product::new(2, "Keyboard", 2, 20.0)?)?;

    let reloaded = open(&dir);
    let valuation = InventoryValuation::of(reloaded.iter());
    assert_eq!(valuation.products, 2);
    assert_eq!(valuation.units, 12);
    assert_eq!(valuation.total_value, 90.0);
    Ok(())
}
