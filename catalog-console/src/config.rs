//! 命令行参数与运行配置
//!
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "catalog")]
#[command(about = "Console manager for inventory, library, menu and to-do collections")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub kind: CatalogKind,

    /// 数据文件所在目录
    #[arg(long, global = true, env = "CATALOG_DATA_DIR", default_value = ".")]
    pub data_dir: PathBuf,

    /// 覆盖默认的数据文件名（相对路径基于 --data-dir）
    #[arg(long, global = true)]
    pub file: Option<PathBuf>,

    /// 不读写任何文件，仅在内存中管理
    #[arg(long, global = true, conflicts_with = "file")]
    pub in_memory: bool,
}

/// 可管理的集合种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum CatalogKind {
    /// 库存商品
    Products,
    /// 图书馆藏
    Books,
    /// 餐厅菜单
    Dishes,
    /// 待办事项
    Tasks,
}

impl CatalogKind {
    pub fn default_file(&self) -> &'static str {
        match self {
            CatalogKind::Products => "inventario.json",
            CatalogKind::Books => "biblioteca.json",
            CatalogKind::Dishes => "menu.json",
            CatalogKind::Tasks => "tareas.json",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Storage {
    File(PathBuf),
    Memory,
}

/// 解析后的运行配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub kind: CatalogKind,
    pub storage: Storage,
}

impl From<Cli> for Settings {
    fn from(cli: Cli) -> Self {
        let storage = if cli.in_memory {
            Storage::Memory
        } else {
            let file = cli
                .file
                .unwrap_or_else(|| PathBuf::from(cli.kind.default_file()));
            Storage::File(cli.data_dir.join(file))
        };
        Settings {
            kind: cli.kind,
            storage,
        }
    }
}
