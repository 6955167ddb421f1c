use std::io;

use catalog_application::error::AppError;
use catalog_domain::error::DomainError;
use thiserror::Error;

/// 控制台交互中的错误
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// 输入已关闭（EOF），会话结束
    #[error("input closed")]
    Closed,

    #[error("io: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    App(#[from] AppError),
}

impl ConsoleError {
    /// 只影响单次操作、菜单可以继续的错误
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ConsoleError::Domain(_) | ConsoleError::App(_))
    }
}

pub type ConsoleResult<T> = Result<T, ConsoleError>;
