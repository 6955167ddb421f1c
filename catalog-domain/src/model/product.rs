use std::fmt;

use bon::Builder;
use catalog_macros::entity_id;
use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::DomainResult;
use crate::value_object::{Name, Price, Quantity};

/// 商品标识（由调用方提供，集合内唯一）
#[entity_id(copy = true)]
pub struct ProductId(u32);

/// 库存商品
///
/// 持久化字段名沿用既有库存文件：`id`、`nombre`、`cantidad`、`precio`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    #[serde(rename = "nombre")]
    name: Name,
    #[serde(rename = "cantidad")]
    quantity: Quantity,
    #[serde(rename = "precio")]
    price: Price,
}

impl Product {
    /// 以原始输入构造商品，任一字段不合法即返回错误
    pub fn new(
        id: u32,
        name: impl Into<String>,
        quantity: i64,
        price: f64,
    ) -> DomainResult<Self> {
        Ok(Self {
            id: ProductId::new(id),
            name: Name::new(name)?,
            quantity: Quantity::new(quantity)?,
            price: Price::new(price)?,
        })
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn price(&self) -> Price {
        self.price
    }

    /// 该商品的库存价值（数量 × 单价）
    pub fn stock_value(&self) -> f64 {
        self.price.times(self.quantity)
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {} | {} | 数量: {} | 单价: {}",
            self.id, self.name, self.quantity, self.price
        )
    }
}

/// 商品局部更新，未提供的字段保持不变
#[derive(Builder, Debug, Default, Clone, PartialEq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub quantity: Option<i64>,
    pub price: Option<f64>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.quantity.is_none() && self.price.is_none()
    }
}

impl Entity for Product {
    type Id = ProductId;
    type Patch = ProductPatch;

    const KIND: &'static str = "product";

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn label(&self) -> &str {
        self.name.as_str()
    }

    fn apply(&mut self, patch: Self::Patch) -> DomainResult<()> {
        // 先全部校验，再统一赋值，保证失败时不留下部分修改
        let name = patch.name.map(Name::new).transpose()?;
        let quantity = patch.quantity.map(Quantity::new).transpose()?;
        let price = patch.price.map(Price::new).transpose()?;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(quantity) = quantity {
            self.quantity = quantity;
        }
        if let Some(price) = price {
            self.price = price;
        }
        Ok(())
    }
}

/// 库存汇总：商品数、总件数、总价值
///
/// 单个数量上限为 `i64::MAX`，总件数以 `i128` 累加，不会溢出。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InventoryValuation {
    pub products: usize,
    pub units: i128,
    pub total_value: f64,
}

impl InventoryValuation {
    pub fn of<'a>(products: impl IntoIterator<Item = &'a Product>) -> Self {
        products
            .into_iter()
            .fold(Self::default(), |mut acc, product| {
                acc.products += 1;
                acc.units += i128::from(product.quantity.value());
                acc.total_value += product.stock_value();
                acc
            })
    }
}

impl fmt::Display for InventoryValuation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "共 {} 种商品 | {} 件 | 总价值: ${:.2}",
            self.products, self.units, self.total_value
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DomainError;

    fn mouse() -> Product {
        Product::new(1, "Mouse", 10, 5.0).unwrap()
    }

    #[test]
    fn new_rejects_invalid_fields() {
        assert!(matches!(
            Product::new(1, "Mouse", -1, 5.0),
            Err(DomainError::InvalidValue {
                field: "quantity",
                ..
            })
        ));
        assert!(matches!(
            Product::new(1, "Mouse", 1, -5.0),
            Err(DomainError::InvalidValue { field: "price", .. })
        ));
        assert!(matches!(
            Product::new(1, "  ", 1, 5.0),
            Err(DomainError::InvalidValue { field: "name", .. })
        ));
    }

    #[test]
    fn apply_updates_only_given_fields() {
        let mut p = mouse();
        p.apply(ProductPatch::builder().price(7.5).build()).unwrap();

        assert_eq!(p.price().value(), 7.5);
        assert_eq!(p.quantity().value(), 10);
        assert_eq!(p.name().as_str(), "Mouse");
    }

    #[test]
    fn apply_is_all_or_nothing() {
        let mut p = mouse();
        let before = p.clone();

        let err = p
            .apply(
                ProductPatch::builder()
                    .name("Wireless Mouse".to_string())
                    .quantity(-3)
                    .build(),
            )
            .unwrap_err();

        assert!(matches!(err, DomainError::InvalidValue { .. }));
        assert_eq!(p, before);
    }

    #[test]
    fn serializes_with_inventory_field_names() {
        let json = serde_json::to_value(mouse()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 1, "nombre": "Mouse", "cantidad": 10, "precio": 5.0})
        );

        let bad = serde_json::json!({"id": 2, "nombre": "X", "cantidad": -1, "precio": 1.0});
        assert!(serde_json::from_value::<Product>(bad).is_err());
    }

    #[test]
    fn display_formats_price_with_two_decimals() {
        assert_eq!(
            mouse().to_string(),
            "ID: 1 | Mouse | 数量: 10 | 单价: $5.00"
        );
    }

    #[test]
    fn valuation_sums_stock() {
        let items = vec![mouse(), Product::new(2, "Keyboard", 2, 20.0).unwrap()];
        let v = InventoryValuation::of(&items);
        assert_eq!(v.products, 2);
        assert_eq!(v.units, 12);
        assert_eq!(v.total_value, 90.0);
    }

    #[test]
    fn valuation_units_exceed_i64_without_overflow() {
        let items = vec![
            Product::new(1, "Tornillo", i64::MAX, 0.0).unwrap(),
            Product::new(2, "Tuerca", 1, 0.0).unwrap(),
        ];
        let v = InventoryValuation::of(&items);
        assert_eq!(v.units, i128::from(i64::MAX) + 1);
        assert_eq!(v.total_value, 0.0);
        assert!(v.to_string().contains("9223372036854775808 件"));
    }
}
