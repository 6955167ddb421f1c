//! 集合管理器（Collection）
//!
//! 以标识为键持有全部实体，提供增删改查，并在每次成功修改后把完整状态
//! 交给 [`Store`] 整体写出。写出失败时撤销本次内存修改并返回错误，
//! 因此内存状态始终与最近一次成功写出的内容一致。
//!
use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::{
    entity::Entity,
    error::{DomainError, DomainResult as Result},
    persist::{MemoryStore, Store},
    specification::{NameContains, Specification},
};

/// 实体集合，按标识排序
#[derive(Debug)]
pub struct Collection<E: Entity, S = MemoryStore<E>> {
    records: BTreeMap<E::Id, E>,
    store: S,
}

impl<E: Entity> Collection<E, MemoryStore<E>> {
    /// 不落盘的空集合
    pub fn in_memory() -> Self {
        Self {
            records: BTreeMap::new(),
            store: MemoryStore::new(),
        }
    }
}

impl<E: Entity, S: Store<E>> Collection<E, S> {
    /// 从存储加载；读取失败时记录警告并以空集合启动
    pub fn open(store: S) -> Self {
        match Self::try_open(store) {
            Ok(collection) => collection,
            Err((store, err)) => {
                warn!(
                    kind = E::KIND,
                    store = %store.describe(),
                    error = %err,
                    "failed to load records, starting with an empty collection"
                );
                Self {
                    records: BTreeMap::new(),
                    store,
                }
            }
        }
    }

    /// 从存储加载；读取失败时连同存储一起返回错误
    pub fn try_open(mut store: S) -> std::result::Result<Self, (S, DomainError)> {
        let loaded = match store.load() {
            Ok(loaded) => loaded,
            Err(err) => return Err((store, err)),
        };

        let mut records = BTreeMap::new();
        for entity in loaded {
            let id = entity.id().clone();
            if records.insert(id.clone(), entity).is_some() {
                warn!(kind = E::KIND, %id, "duplicate id in stored records, keeping the later one");
            }
        }
        info!(
            kind = E::KIND,
            store = %store.describe(),
            count = records.len(),
            "collection opened"
        );
        Ok(Self { records, store })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, id: &E::Id) -> bool {
        self.records.contains_key(id)
    }

    pub fn get(&self, id: &E::Id) -> Option<&E> {
        self.records.get(id)
    }

    /// 新增实体；标识已存在时返回 `Duplicate`
    pub fn add(&mut self, entity: E) -> Result<()> {
        let id = entity.id().clone();
        if self.records.contains_key(&id) {
            return Err(DomainError::Duplicate {
                kind: E::KIND,
                id: id.to_string(),
            });
        }

        self.records.insert(id.clone(), entity);
        if let Err(err) = self.persist() {
            self.records.remove(&id);
            warn!(kind = E::KIND, %id, error = %err, "add rolled back");
            return Err(err);
        }
        debug!(kind = E::KIND, %id, "record added");
        Ok(())
    }

    /// 删除并返回实体；标识不存在时返回 `NotFound`
    pub fn remove(&mut self, id: &E::Id) -> Result<E> {
        let removed = self.records.remove(id).ok_or_else(|| not_found::<E>(id))?;

        if let Err(err) = self.persist() {
            self.records.insert(id.clone(), removed);
            warn!(kind = E::KIND, %id, error = %err, "remove rolled back");
            return Err(err);
        }
        debug!(kind = E::KIND, %id, "record removed");
        Ok(removed)
    }

    /// 局部更新并返回更新后的实体
    pub fn update(&mut self, id: &E::Id, patch: E::Patch) -> Result<E> {
        self.modify(id, |entity| entity.apply(patch))
    }

    /// 以闭包修改单个实体（如借出、标记完成），返回修改后的实体
    ///
    /// 闭包作用在副本上，闭包与写出都成功后才算生效。
    pub fn modify<F>(&mut self, id: &E::Id, change: F) -> Result<E>
    where
        F: FnOnce(&mut E) -> Result<()>,
    {
        let current = self.records.get(id).ok_or_else(|| not_found::<E>(id))?;

        let mut updated = current.clone();
        change(&mut updated)?;

        let previous = self.records.insert(id.clone(), updated.clone());
        if let Err(err) = self.persist() {
            if let Some(previous) = previous {
                self.records.insert(id.clone(), previous);
            }
            warn!(kind = E::KIND, %id, error = %err, "update rolled back");
            return Err(err);
        }
        debug!(kind = E::KIND, %id, "record updated");
        Ok(updated)
    }

    /// 批量删除满足规约的实体，返回被删除的实体；写出失败时全部恢复
    pub fn remove_where<P>(&mut self, spec: &P) -> Result<Vec<E>>
    where
        P: Specification<E> + ?Sized,
    {
        let ids: Vec<E::Id> = self
            .records
            .values()
            .filter(|e| spec.is_satisfied_by(e))
            .map(|e| e.id().clone())
            .collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let removed: Vec<E> = ids
            .iter()
            .filter_map(|id| self.records.remove(id))
            .collect();
        if let Err(err) = self.persist() {
            for entity in removed {
                self.records.insert(entity.id().clone(), entity);
            }
            warn!(kind = E::KIND, error = %err, "bulk remove rolled back");
            return Err(err);
        }
        debug!(kind = E::KIND, count = removed.len(), "records removed");
        Ok(removed)
    }

    /// 名称检索：大小写不敏感的子串匹配，按标识排序
    pub fn search(&self, needle: &str) -> Vec<E> {
        self.filter(&NameContains::new(needle))
    }

    /// 返回满足规约的实体副本，按标识排序
    pub fn filter<P>(&self, spec: &P) -> Vec<E>
    where
        P: Specification<E> + ?Sized,
    {
        self.records
            .values()
            .filter(|e| spec.is_satisfied_by(e))
            .cloned()
            .collect()
    }

    /// 全部实体的快照，按标识排序
    pub fn list_all(&self) -> Vec<E> {
        self.records.values().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.records.values()
    }

    fn persist(&mut self) -> Result<()> {
        let records: Vec<&E> = self.records.values().collect();
        self.store.save(&records)
    }
}

fn not_found<E: Entity>(id: &E::Id) -> DomainError {
    DomainError::NotFound {
        kind: E::KIND,
        id: id.to_string(),
    }
}
