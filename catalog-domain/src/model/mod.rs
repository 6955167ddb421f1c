//! 具体实体：商品、图书、菜品、待办
//!
//! 每个实体都实现 [`Entity`](crate::entity::Entity)，因此都能交给同一个
//! [`Collection`](crate::collection::Collection) 管理。
//!
mod book;
mod dish;
mod product;
mod task;

pub use book::{Available, Book, BookPatch, Isbn};
pub use dish::{Dish, DishCategory, DishId, DishPatch, InCategory};
pub use product::{InventoryValuation, Product, ProductId, ProductPatch};
pub use task::{Completed, OverdueOn, Task, TaskId, TaskPatch};
