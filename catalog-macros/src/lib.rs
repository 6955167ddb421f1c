//! catalog 过程宏
//!
//! - `#[value_object]`：为值对象补齐派生，并可让 serde 经由 `TryFrom` 做校验；
//! - `#[entity_id]`：为单字段 tuple struct 形式的实体标识补齐派生与转换。
//!
use proc_macro::TokenStream;

mod derive_utils;
mod entity_id;
mod value_object;

/// 值对象宏
///
/// ```ignore
/// #[value_object(try_from = f64, copy = true)]
/// pub struct Price(f64);
///
/// impl TryFrom<f64> for Price { /* 校验 */ }
/// ```
#[proc_macro_attribute]
pub fn value_object(attr: TokenStream, item: TokenStream) -> TokenStream {
    value_object::expand(attr, item)
}

/// 实体 ID 宏
/// 用于为 `tuple struct` 形式的 ID 类型（例如 `struct ProductId(u32);`、`struct Isbn(String);`）
/// 自动实现以下 trait：
/// - `Display`（要求内部类型实现 `Display`）
/// - `FromStr`（要求内部类型实现 `FromStr`，输入会先去掉首尾空白）
/// - `Ord`，使集合可以按标识排序输出
///
/// 仅支持单字段的 `tuple struct`。标识需要校验时（如不能为空串）使用
/// `#[entity_id(validated = true)]`：反序列化经由 `TryFrom<Inner>`，
/// `new`、`FromStr` 由类型自行实现。
#[proc_macro_attribute]
pub fn entity_id(attr: TokenStream, item: TokenStream) -> TokenStream {
    entity_id::expand(attr, item)
}
