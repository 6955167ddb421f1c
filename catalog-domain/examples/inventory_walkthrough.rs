//! 库存集合使用示例
//!
//! 展示商品的新增、更新、检索、删除，以及写出失败时的自动回滚。
//!
//! 运行示例：
//! ```bash
//! cargo run -p catalog-domain --example inventory_walkthrough
//! ```

use anyhow::Result as AnyResult;
use catalog_domain::collection::Collection;
use catalog_domain::model::{InventoryValuation, Product, ProductId, ProductPatch};
use catalog_domain::persist::JsonFileStore;

fn main() -> AnyResult<()> {
    println!("=== 库存集合示例 ===\n");

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("inventario.json");

    // 1. 打开集合（文件不存在时为空）
    println!("1. 打开集合");
    let mut inventory = Collection::open(JsonFileStore::<Product>::new(&path));
    println!("   当前商品数: {}\n", inventory.len());

    // 2. 新增商品
    println!("2. 新增商品");
    inventory.add(Product::new(1, "Mouse", 10, 5.0)?)?;
    inventory.add(Product::new(2, "Keyboard", 3, 25.0)?)?;
    for product in inventory.iter() {
        println!("   {product}");
    }

    // 3. 重复标识被拒绝
    println!("\n3. 重复标识");
    if let Err(err) = inventory.add(Product::new(1, "Otro", 1, 1.0)?) {
        println!("   ❌ {err}");
    }

    // 4. 局部更新
    println!("\n4. 更新价格");
    let updated = inventory.update(&ProductId::new(1), ProductPatch::builder().price(7.5).build())?;
    println!("   ✅ {updated}");

    // 5. 非法值不会写入
    println!("\n5. 非法数量");
    if let Err(err) = inventory.update(
        &ProductId::new(1),
        ProductPatch::builder().quantity(-3).build(),
    ) {
        println!("   ❌ {err}");
    }

    // 6. 检索
    println!("\n6. 检索 \"mou\"");
    for product in inventory.search("mou") {
        println!("   {product}");
    }

    // 7. 汇总与落盘内容
    println!("\n7. 库存汇总");
    println!("   {}", InventoryValuation::of(inventory.iter()));
    println!("   文件内容:\n{}", std::fs::read_to_string(&path)?);

    // 8. 删除
    println!("8. 删除商品 1");
    let removed = inventory.remove(&ProductId::new(1))?;
    println!("   已删除: {removed}");
    println!("   剩余商品数: {}", inventory.len());

    Ok(())
}
