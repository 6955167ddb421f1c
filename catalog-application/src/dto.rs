use catalog_domain::{entity::Entity, model::InventoryValuation};
use serde::Serialize;

/// 数据传输对象（DTO）
///
/// - 作为应用层的输出载体，序列化友好；
/// - 应保持只读特性与简洁结构，适配不同用例的返回需求。
pub trait Dto: Serialize + Send + Sync + 'static {}

/// 记录列表（按标识排序）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Records<E> {
    pub items: Vec<E>,
}

impl<E> Records<E> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<E> IntoIterator for Records<E> {
    type Item = E;
    type IntoIter = std::vec::IntoIter<E>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<E: Entity> Dto for Records<E> {}

impl<E: Entity> Dto for Option<E> {}

impl Dto for InventoryValuation {}
