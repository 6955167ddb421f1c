//! 目录领域层（catalog-domain）
//!
//! 提供“实体 → 集合管理器”两层的通用构件：
//! - 实体抽象（`entity`）与具体实体（`model`：商品、图书、菜品、待办）
//! - 带校验的值对象（`value_object`），经 `TryFrom` 反序列化
//! - 规约（`specification`），用于检索与批量删除
//! - 集合管理器（`collection`）：按标识排序、修改后整体写出、写出失败回滚
//! - 整体镜像存储（`persist`）：JSON 文件与内存两种实现
//!
//! 典型用法：
//! 1. 选择存储（`JsonFileStore` 或 `MemoryStore`）并 `Collection::open`；
//! 2. 通过 `add/remove/update` 修改，`search/list_all/filter` 读取；
//! 3. 处理返回的 `DomainError`，持久化失败时集合已自动恢复原状。
//!
pub mod collection;
pub mod entity;
pub mod error;
pub mod model;
pub mod persist;
pub mod specification;
pub mod value_object;
