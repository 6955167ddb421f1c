//! 领域层统一错误定义
//!
//! 聚焦字段校验、标识冲突/缺失、持久化与序列化等最小必要集合，
//! 便于在应用层统一转换为 `AppError`。
//!
use thiserror::Error;

/// 统一错误类型（基础库最小必要集）
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DomainError {
    // --- 字段校验 ---
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
    #[error("invalid state: {reason}")]
    InvalidState { reason: String },
    #[error("parse error: {reason}")]
    Parse { reason: String },

    // --- 集合/标识 ---
    #[error("duplicate {kind}: id={id} already exists")]
    Duplicate { kind: &'static str, id: String },
    #[error("{kind} not found: id={id}")]
    NotFound { kind: &'static str, id: String },

    // --- 仓储/持久化 ---
    #[error("serialization error: {source}")]
    Serde {
        #[from]
        source: serde_json::Error,
    },
    #[error("persistence error: path={path}, reason={reason}")]
    Persistence { path: String, reason: String },
}

impl DomainError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        DomainError::InvalidValue {
            field,
            reason: reason.into(),
        }
    }

    /// 是否为持久化相关错误（这类错误会触发内存状态回滚）
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            DomainError::Persistence { .. } | DomainError::Serde { .. }
        )
    }
}

/// 统一 Result 类型别名
pub type DomainResult<T> = Result<T, DomainError>;

// 允许在输入解析处直接使用 `?` 将标准库/chrono 的解析错误转换为 DomainError

impl From<std::num::ParseIntError> for DomainError {
    fn from(err: std::num::ParseIntError) -> Self {
        DomainError::Parse {
            reason: err.to_string(),
        }
    }
}

impl From<std::num::ParseFloatError> for DomainError {
    fn from(err: std::num::ParseFloatError) -> Self {
        DomainError::Parse {
            reason: err.to_string(),
        }
    }
}

impl From<std::str::ParseBoolError> for DomainError {
    fn from(err: std::str::ParseBoolError) -> Self {
        DomainError::Parse {
            reason: err.to_string(),
        }
    }
}

impl From<chrono::ParseError> for DomainError {
    fn from(err: chrono::ParseError) -> Self {
        DomainError::Parse {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_field() {
        let err = DomainError::invalid("quantity", "must not be negative");
        assert_eq!(
            err.to_string(),
            "invalid value for quantity: must not be negative"
        );

        let err = DomainError::NotFound {
            kind: "product",
            id: "9".into(),
        };
        assert_eq!(err.to_string(), "product not found: id=9");
    }

    #[test]
    fn parse_errors_convert() {
        let err: DomainError = "x".parse::<i64>().unwrap_err().into();
        assert!(matches!(err, DomainError::Parse { .. }));
        assert!(!err.is_persistence());

        let err = DomainError::Persistence {
            path: "a.json".into(),
            reason: "denied".into(),
        };
        assert!(err.is_persistence());
    }
}
