//! 存储协议
//!
use crate::{entity::Entity, error::DomainResult as Result};

/// 集合的整体镜像存储
///
/// `save` 收到的是按标识排序的完整记录集，实现需整体替换旧内容；
/// 返回错误时调用方会回滚本次内存修改。
pub trait Store<E: Entity>: Send {
    /// 读取全部记录；存储尚不存在时返回空集合
    fn load(&mut self) -> Result<Vec<E>>;

    /// 整体写出全部记录
    fn save(&mut self, records: &[&E]) -> Result<()>;

    /// 存储位置的可读描述，用于日志
    fn describe(&self) -> String;
}

impl<E, T> Store<E> for Box<T>
where
    E: Entity,
    T: Store<E> + ?Sized,
{
    fn load(&mut self) -> Result<Vec<E>> {
        (**self).load()
    }

    fn save(&mut self, records: &[&E]) -> Result<()> {
        (**self).save(records)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
