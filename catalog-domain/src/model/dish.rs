use std::{fmt, str::FromStr};

use bon::Builder;
use catalog_macros::{entity_id, value_object};
use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};
use crate::specification::Specification;
use crate::value_object::{Name, Price};

#[entity_id(copy = true)]
pub struct DishId(u32);

/// 菜品分类（封闭集合）
#[value_object(copy = true, eq = true)]
pub enum DishCategory {
    #[serde(rename = "ENTRADA")]
    Starter,
    #[serde(rename = "PRINCIPAL")]
    Main,
    #[serde(rename = "POSTRE")]
    Dessert,
    #[serde(rename = "BEBIDA")]
    Drink,
}

impl DishCategory {
    pub const ALL: [DishCategory; 4] = [
        DishCategory::Starter,
        DishCategory::Main,
        DishCategory::Dessert,
        DishCategory::Drink,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DishCategory::Starter => "前菜",
            DishCategory::Main => "主菜",
            DishCategory::Dessert => "甜点",
            DishCategory::Drink => "饮品",
        }
    }
}

impl fmt::Display for DishCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 接受序号（1-4）或持久化名称（`ENTRADA` 等，大小写不敏感）
impl FromStr for DishCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(n) = s.parse::<usize>() {
            return n
                .checked_sub(1)
                .and_then(|i| Self::ALL.get(i).copied())
                .ok_or_else(|| DomainError::invalid("category", format!("no category #{n}")));
        }
        match s.to_uppercase().as_str() {
            "ENTRADA" => Ok(DishCategory::Starter),
            "PRINCIPAL" => Ok(DishCategory::Main),
            "POSTRE" => Ok(DishCategory::Dessert),
            "BEBIDA" => Ok(DishCategory::Drink),
            other => Err(DomainError::invalid(
                "category",
                format!("unknown category {other:?}"),
            )),
        }
    }
}

/// 菜单中的菜品
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dish {
    id: DishId,
    #[serde(rename = "nombre")]
    name: Name,
    #[serde(rename = "precio")]
    price: Price,
    #[serde(rename = "categoria")]
    category: DishCategory,
}

impl Dish {
    pub fn new(
        id: u32,
        name: impl Into<String>,
        price: f64,
        category: DishCategory,
    ) -> DomainResult<Self> {
        Ok(Self {
            id: DishId::new(id),
            name: Name::new(name)?,
            price: Price::new(price)?,
            category,
        })
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn category(&self) -> DishCategory {
        self.category
    }
}

impl fmt::Display for Dish {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} - {} [{}]",
            self.id, self.name, self.price, self.category
        )
    }
}

#[derive(Builder, Debug, Default, Clone, PartialEq)]
pub struct DishPatch {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub category: Option<DishCategory>,
}

impl DishPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none() && self.category.is_none()
    }
}

impl Entity for Dish {
    type Id = DishId;
    type Patch = DishPatch;

    const KIND: &'static str = "dish";

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn label(&self) -> &str {
        self.name.as_str()
    }

    fn apply(&mut self, patch: Self::Patch) -> DomainResult<()> {
        let name = patch.name.map(Name::new).transpose()?;
        let price = patch.price.map(Price::new).transpose()?;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(price) = price {
            self.price = price;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        Ok(())
    }
}

/// 属于指定分类的菜品
#[derive(Debug, Clone, Copy)]
pub struct InCategory(pub DishCategory);

impl Specification<Dish> for InCategory {
    fn is_satisfied_by(&self, candidate: &Dish) -> bool {
        candidate.category == self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parses_index_and_name() {
        assert_eq!("1".parse::<DishCategory>().unwrap(), DishCategory::Starter);
        assert_eq!("4".parse::<DishCategory>().unwrap(), DishCategory::Drink);
        assert_eq!(
            "postre".parse::<DishCategory>().unwrap(),
            DishCategory::Dessert
        );
        assert!("0".parse::<DishCategory>().is_err());
        assert!("5".parse::<DishCategory>().is_err());
        assert!("sopa".parse::<DishCategory>().is_err());
    }

    #[test]
    fn category_serializes_with_menu_names() {
        let d = Dish::new(3, "Tiramisú", 7.25, DishCategory::Dessert).unwrap();
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["categoria"], "POSTRE");
        assert_eq!(json["nombre"], "Tiramisú");

        let back: Dish = serde_json::from_value(json).unwrap();
        assert_eq!(back, d);
    }

    #[test]
    fn in_category_specification() {
        let soup = Dish::new(1, "Sopa del día", 6.0, DishCategory::Starter).unwrap();
        let wine = Dish::new(2, "Vino Tinto", 8.0, DishCategory::Drink).unwrap();

        let drinks = InCategory(DishCategory::Drink);
        assert!(!drinks.is_satisfied_by(&soup));
        assert!(drinks.is_satisfied_by(&wine));
    }

    #[test]
    fn patch_rejects_negative_price() {
        let mut d = Dish::new(1, "Flan", 5.5, DishCategory::Dessert).unwrap();
        let err = d
            .apply(
                DishPatch::builder()
                    .price(-1.0)
                    .category(DishCategory::Main)
                    .build(),
            )
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidValue { field: "price", .. }));
        assert_eq!(d.category(), DishCategory::Dessert);
        assert_eq!(d.price().value(), 5.5);
    }
}
