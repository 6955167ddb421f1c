//! 目录应用层（catalog-application）
//!
//! 以命令/查询总线的方式对外暴露集合用例：
//! - 命令（`Command`）与查询（`Query`）及其处理器协议；
//! - 进程内总线实现（`InMemoryCommandBus`、`InMemoryQueryBus`），按类型路由；
//! - 通用目录用例（`catalog`）：新增、删除、更新、批量删除、列表、检索、汇总。
//!
pub mod catalog;
pub mod command;
pub mod command_bus;
pub mod command_handler;
pub mod context;
pub mod dto;
pub mod error;
pub mod inmemory_command_bus;
pub mod inmemory_query_bus;
pub mod query;
pub mod query_bus;
pub mod query_handler;

pub use inmemory_command_bus::InMemoryCommandBus;
pub use inmemory_query_bus::InMemoryQueryBus;
