//! 值对象（Value Object）
//!
//! 无标识、以值相等为准的对象，用于封装不可变的概念性值与校验逻辑。
//! 所有值对象都经由 `TryFrom` 构造，serde 反序列化同样走这条路径，
//! 因此从文件读入的数据与用户输入受到相同的校验。
//!

use std::fmt;

use catalog_macros::value_object;

use crate::error::{DomainError, DomainResult};

/// 值对象抽象
pub trait ValueObject {
    /// 业务校验失败时的错误类型
    type Error;

    /// 创建值对象时进行验证
    fn validate(&self) -> Result<(), Self::Error>;
}

/// 非空文本（名称、书名、作者、任务描述等）
///
/// 保存时去掉首尾空白；空串或纯空白串被拒绝。
///
/// # 示例
///
/// ```
/// use catalog_domain::value_object::Name;
///
/// let n = Name::new("  Mouse ").unwrap();
/// assert_eq!(n.as_str(), "Mouse");
/// assert!(Name::new("   ").is_err());
/// ```
#[value_object(try_from = String, eq = true)]
pub struct Name(String);

impl Name {
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        Self::labelled("name", value)
    }

    /// 以指定字段名校验，错误信息中会带上该字段名（如 `title`、`author`）
    pub fn labelled(field: &'static str, value: impl Into<String>) -> DomainResult<Self> {
        let candidate = Self(value.into().trim().to_string());
        candidate.validate_as(field)?;
        Ok(candidate)
    }

    fn validate_as(&self, field: &'static str) -> DomainResult<()> {
        if self.0.trim().is_empty() {
            return Err(DomainError::invalid(field, "must not be empty"));
        }
        Ok(())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 大小写不敏感的子串匹配
    pub fn contains_ignore_case(&self, needle: &str) -> bool {
        self.0.to_lowercase().contains(&needle.to_lowercase())
    }
}

impl ValueObject for Name {
    type Error = DomainError;

    fn validate(&self) -> Result<(), Self::Error> {
        self.validate_as("name")
    }
}

impl TryFrom<String> for Name {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 库存数量，不允许为负
#[value_object(try_from = i64, copy = true, eq = true)]
pub struct Quantity(i64);

impl Quantity {
    pub const ZERO: Quantity = Quantity(0);

    pub fn new(value: i64) -> DomainResult<Self> {
        let candidate = Self(value);
        candidate.validate()?;
        Ok(candidate)
    }

    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl ValueObject for Quantity {
    type Error = DomainError;

    fn validate(&self) -> Result<(), Self::Error> {
        if self.0 < 0 {
            return Err(DomainError::invalid(
                "quantity",
                format!("must not be negative, got {}", self.0),
            ));
        }
        Ok(())
    }
}

impl TryFrom<i64> for Quantity {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 单价，要求为有限且非负的数
///
/// 显示时保留两位小数，不做额外的货币舍入。
#[value_object(try_from = f64, copy = true)]
pub struct Price(f64);

impl Price {
    pub const FREE: Price = Price(0.0);

    pub fn new(value: f64) -> DomainResult<Self> {
        let candidate = Self(value);
        candidate.validate()?;
        Ok(candidate)
    }

    pub const fn value(&self) -> f64 {
        self.0
    }

    /// 数量 × 单价
    pub fn times(&self, quantity: Quantity) -> f64 {
        self.0 * quantity.value() as f64
    }
}

impl ValueObject for Price {
    type Error = DomainError;

    fn validate(&self) -> Result<(), Self::Error> {
        if !self.0.is_finite() {
            return Err(DomainError::invalid("price", "must be a finite number"));
        }
        if self.0 < 0.0 {
            return Err(DomainError::invalid(
                "price",
                format!("must not be negative, got {}", self.0),
            ));
        }
        Ok(())
    }
}

impl TryFrom<f64> for Price {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 测试名称去除首尾空白
    #[test]
    fn test_name_trims() {
        let n = Name::new("  Teclado  ").unwrap();
        assert_eq!(n.as_str(), "Teclado");
        assert_eq!(n.to_string(), "Teclado");
    }

    // 测试空名称被拒绝
    #[test]
    fn test_name_rejects_blank() {
        assert!(matches!(
            Name::new("").unwrap_err(),
            DomainError::InvalidValue { field: "name", .. }
        ));
        let err = Name::labelled("title", " \t ").unwrap_err();
        assert!(matches!(
            err,
            DomainError::InvalidValue { field: "title", .. }
        ));
        assert_eq!(err.to_string(), "invalid value for title: must not be empty");
    }

    // 测试大小写不敏感匹配
    #[test]
    fn test_name_contains_ignore_case() {
        let n = Name::new("Mouse").unwrap();
        assert!(n.contains_ignore_case("mou"));
        assert!(n.contains_ignore_case("OUSE"));
        assert!(!n.contains_ignore_case("key"));
    }

    // 测试负数量被拒绝
    #[test]
    fn test_quantity_rejects_negative() {
        assert!(Quantity::new(-1).is_err());
        assert_eq!(Quantity::new(0).unwrap(), Quantity::ZERO);
        assert_eq!(Quantity::new(10).unwrap().value(), 10);
    }

    // 测试负价格与非有限价格被拒绝
    #[test]
    fn test_price_rejects_negative_and_nan() {
        assert!(Price::new(-0.01).is_err());
        assert!(Price::new(f64::NAN).is_err());
        assert!(Price::new(f64::INFINITY).is_err());
        assert_eq!(Price::new(7.5).unwrap().value(), 7.5);
    }

    // 测试价格显示与乘积
    #[test]
    fn test_price_display_and_times() {
        let p = Price::new(5.0).unwrap();
        assert_eq!(p.to_string(), "$5.00");
        assert_eq!(p.times(Quantity::new(3).unwrap()), 15.0);
    }

    // 测试反序列化经过校验
    #[test]
    fn test_serde_goes_through_validation() {
        let q: Quantity = serde_json::from_str("4").unwrap();
        assert_eq!(q.value(), 4);
        assert!(serde_json::from_str::<Quantity>("-4").is_err());
        assert!(serde_json::from_str::<Price>("-1.5").is_err());
        assert!(serde_json::from_str::<Name>("\"  \"").is_err());

        let n: Name = serde_json::from_str("\" Mouse \"").unwrap();
        assert_eq!(serde_json::to_string(&n).unwrap(), "\"Mouse\"");
    }
}
