//! 持久化（persist）
//!
//! 集合的整体镜像存储：每次成功修改后整份写出，启动时整份读回。
//! - 存储协议（`Store`），集合只依赖该 trait；
//! - JSON 文件实现（`JsonFileStore`），临时文件写入后原子替换；
//! - 内存实现（`MemoryStore`），用于关闭持久化与测试。
//!
mod json_file;
mod memory;
mod store;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use store::Store;
