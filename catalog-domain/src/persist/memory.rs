use crate::{entity::Entity, error::DomainResult as Result, persist::Store};

/// 不落盘的存储：只保留最近一次写出的快照
#[derive(Debug, Clone)]
pub struct MemoryStore<E> {
    records: Vec<E>,
    saves: usize,
}

impl<E> Default for MemoryStore<E> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            saves: 0,
        }
    }
}

impl<E: Entity> MemoryStore<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以预置记录初始化，`load` 时原样返回
    pub fn with_records(records: impl IntoIterator<Item = E>) -> Self {
        Self {
            records: records.into_iter().collect(),
            saves: 0,
        }
    }

    pub fn records(&self) -> &[E] {
        &self.records
    }

    /// 已成功执行的 `save` 次数
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl<E: Entity> Store<E> for MemoryStore<E> {
    fn load(&mut self) -> Result<Vec<E>> {
        Ok(self.records.clone())
    }

    fn save(&mut self, records: &[&E]) -> Result<()> {
        self.records = records.iter().map(|r| (*r).clone()).collect();
        self.saves += 1;
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
