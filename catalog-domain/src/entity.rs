//! 实体（Entity）基础抽象
//!
//! 为集合管理器提供统一的标识（Id）、检索字段与局部更新（Patch）能力。
//!
use std::{fmt::Debug, fmt::Display, str::FromStr};

use serde::{Serialize, de::DeserializeOwned};

use crate::error::DomainResult;

/// 具备唯一标识、可被集合管理的实体抽象
///
/// 标识在创建后不可变；其余字段只能通过 [`Entity::apply`] 以补丁形式修改，
/// 补丁中的每个字段都会经过值对象校验。
pub trait Entity: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// 实体标识类型，要求可解析、可显示、可排序与可克隆
    type Id: FromStr + Ord + Clone + Display + Debug + Send + Sync + 'static;

    /// 局部更新：只携带需要修改的字段
    type Patch: Debug + Default + Send + Sync + 'static;

    /// 实体种类名称，用于日志与错误信息（如 `product`）
    const KIND: &'static str;

    /// 获取实体标识
    fn id(&self) -> &Self::Id;

    /// 参与名称检索的字段（商品名、书名、菜名、任务描述）
    fn label(&self) -> &str;

    /// 应用补丁
    ///
    /// 实现需保证原子性：任一字段校验失败时返回错误且不修改任何字段。
    fn apply(&mut self, patch: Self::Patch) -> DomainResult<()>;
}
