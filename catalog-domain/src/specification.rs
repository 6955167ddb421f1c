//! 规约（Specification）
//!
//! 用于封装检索与批量操作的筛选规则，使其可复用、可组合和可测试。
//!
use crate::entity::Entity;

/// 规约模式的核心 trait
pub trait Specification<T> {
    /// 检查候选对象是否满足规约
    fn is_satisfied_by(&self, candidate: &T) -> bool;

    /// 与另一个规约进行 AND 组合
    fn and<S>(self, other: S) -> AndSpecification<T>
    where
        Self: Sized + Send + Sync + 'static,
        S: Specification<T> + Send + Sync + 'static,
    {
        AndSpecification::new(Box::new(self), Box::new(other))
    }

    /// 与另一个规约进行 OR 组合
    fn or<S>(self, other: S) -> OrSpecification<T>
    where
        Self: Sized + Send + Sync + 'static,
        S: Specification<T> + Send + Sync + 'static,
    {
        OrSpecification::new(Box::new(self), Box::new(other))
    }

    /// 对规约进行 NOT 操作
    fn not(self) -> NotSpecification<T>
    where
        Self: Sized + Send + Sync + 'static,
    {
        NotSpecification::new(Box::new(self))
    }
}

/// 类型擦除后的规约，可跨线程传递（例如放入命令中）
pub type BoxedSpecification<T> = Box<dyn Specification<T> + Send + Sync>;

impl<T> Specification<T> for BoxedSpecification<T> {
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        (**self).is_satisfied_by(candidate)
    }
}

/// AND 组合规约
pub struct AndSpecification<T> {
    left: BoxedSpecification<T>,
    right: BoxedSpecification<T>,
}

impl<T> AndSpecification<T> {
    pub fn new(left: BoxedSpecification<T>, right: BoxedSpecification<T>) -> Self {
        Self { left, right }
    }
}

impl<T> Specification<T> for AndSpecification<T> {
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        self.left.is_satisfied_by(candidate) && self.right.is_satisfied_by(candidate)
    }
}

/// OR 组合规约
pub struct OrSpecification<T> {
    left: BoxedSpecification<T>,
    right: BoxedSpecification<T>,
}

impl<T> OrSpecification<T> {
    pub fn new(left: BoxedSpecification<T>, right: BoxedSpecification<T>) -> Self {
        Self { left, right }
    }
}

impl<T> Specification<T> for OrSpecification<T> {
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        self.left.is_satisfied_by(candidate) || self.right.is_satisfied_by(candidate)
    }
}

/// NOT 规约
pub struct NotSpecification<T> {
    inner: BoxedSpecification<T>,
}

impl<T> NotSpecification<T> {
    pub fn new(inner: BoxedSpecification<T>) -> Self {
        Self { inner }
    }
}

impl<T> Specification<T> for NotSpecification<T> {
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        !self.inner.is_satisfied_by(candidate)
    }
}

/// 名称包含给定子串（大小写不敏感）
///
/// 空串匹配所有实体。
#[derive(Debug, Clone)]
pub struct NameContains {
    needle: String,
}

impl NameContains {
    pub fn new(needle: impl AsRef<str>) -> Self {
        Self {
            needle: needle.as_ref().to_lowercase(),
        }
    }
}

impl<E: Entity> Specification<E> for NameContains {
    fn is_satisfied_by(&self, candidate: &E) -> bool {
        candidate.label().to_lowercase().contains(&self.needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysTrueSpec;
    impl Specification<i32> for AlwaysTrueSpec {
        fn is_satisfied_by(&self, _: &i32) -> bool {
            true
        }
    }

    struct AlwaysFalseSpec;
    impl Specification<i32> for AlwaysFalseSpec {
        fn is_satisfied_by(&self, _: &i32) -> bool {
            false
        }
    }

    #[test]
    fn test_and_specification() {
        assert!(AlwaysTrueSpec.and(AlwaysTrueSpec).is_satisfied_by(&42));
        assert!(!AlwaysTrueSpec.and(AlwaysFalseSpec).is_satisfied_by(&42));
    }

    #[test]
    fn test_or_specification() {
        assert!(AlwaysTrueSpec.or(AlwaysFalseSpec).is_satisfied_by(&42));
        assert!(!AlwaysFalseSpec.or(AlwaysFalseSpec).is_satisfied_by(&42));
    }

    #[test]
    fn test_not_specification() {
        assert!(!AlwaysTrueSpec.not().is_satisfied_by(&42));
        assert!(AlwaysFalseSpec.not().is_satisfied_by(&42));
    }

    #[test]
    fn test_complex_combination() {
        // (TRUE AND FALSE) OR (NOT FALSE) = FALSE OR TRUE = TRUE
        let spec = AlwaysTrueSpec
            .and(AlwaysFalseSpec)
            .or(AlwaysFalseSpec.not());
        assert!(spec.is_satisfied_by(&42));
    }
}
