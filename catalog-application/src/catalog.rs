//! 目录用例：针对任意实体集合的通用命令与查询
//!
//! 所有处理器共享同一个 `Arc<Mutex<Collection>>`；锁只在同步代码段内持有，
//! 不会跨越 `.await`。
//!
use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use catalog_domain::{
    collection::Collection,
    entity::Entity,
    model::{Book, InventoryValuation, Isbn, Product, Task, TaskId},
    persist::Store,
    specification::{BoxedSpecification, Specification},
};
use tracing::info;

use crate::{
    command::Command, command_handler::CommandHandler, context::AppContext, dto::Records,
    error::AppError, inmemory_command_bus::InMemoryCommandBus,
    inmemory_query_bus::InMemoryQueryBus, query::Query, query_handler::QueryHandler,
};

/// 处理器之间共享的集合
pub type SharedCollection<E, S> = Arc<Mutex<Collection<E, S>>>;

pub fn share<E: Entity, S: Store<E>>(collection: Collection<E, S>) -> SharedCollection<E, S> {
    Arc::new(Mutex::new(collection))
}

// --- 命令 ---

/// 新增一条记录
#[derive(Debug)]
pub struct AddRecord<E>(pub E);

impl<E: Entity> Command for AddRecord<E> {
    const NAME: &'static str = "AddRecord";
    type Output = ();
}

/// 按标识删除，返回被删除的记录
pub struct RemoveRecord<E: Entity>(pub E::Id);

impl<E: Entity> fmt::Debug for RemoveRecord<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RemoveRecord").field(&self.0).finish()
    }
}

impl<E: Entity> Command for RemoveRecord<E> {
    const NAME: &'static str = "RemoveRecord";
    type Output = E;
}

/// 按标识局部更新，返回更新后的记录
pub struct UpdateRecord<E: Entity> {
    pub id: E::Id,
    pub patch: E::Patch,
}

impl<E: Entity> fmt::Debug for UpdateRecord<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateRecord")
            .field("id", &self.id)
            .field("patch", &self.patch)
            .finish()
    }
}

impl<E: Entity> Command for UpdateRecord<E> {
    const NAME: &'static str = "UpdateRecord";
    type Output = E;
}

/// 批量删除满足规约的记录，返回被删除的记录
pub struct RemoveWhere<E> {
    spec: BoxedSpecification<E>,
}

impl<E: Entity> RemoveWhere<E> {
    pub fn new(spec: impl Specification<E> + Send + Sync + 'static) -> Self {
        Self {
            spec: Box::new(spec),
        }
    }
}

impl<E: Entity> Command for RemoveWhere<E> {
    const NAME: &'static str = "RemoveWhere";
    type Output = Vec<E>;
}

/// 借出图书；已借出时返回 `InvalidState`
#[derive(Debug, Clone)]
pub struct LendBook(pub Isbn);

impl Command for LendBook {
    const NAME: &'static str = "LendBook";
    type Output = Book;
}

/// 归还图书；未借出时返回 `InvalidState`
#[derive(Debug, Clone)]
pub struct ReturnBook(pub Isbn);

impl Command for ReturnBook {
    const NAME: &'static str = "ReturnBook";
    type Output = Book;
}

/// 标记待办为已完成；重复标记不报错
#[derive(Debug, Clone, Copy)]
pub struct CompleteTask(pub TaskId);

impl Command for CompleteTask {
    const NAME: &'static str = "CompleteTask";
    type Output = Task;
}

// --- 查询 ---

/// 全部记录，按标识排序
pub struct ListRecords<E>(PhantomData<fn() -> E>);

impl<E> Default for ListRecords<E> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<E: Entity> ListRecords<E> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E: Entity> Query for ListRecords<E> {
    const NAME: &'static str = "ListRecords";
    type Dto = Records<E>;
}

/// 名称检索（大小写不敏感的子串匹配）
pub struct SearchRecords<E> {
    pub needle: String,
    _marker: PhantomData<fn() -> E>,
}

impl<E: Entity> SearchRecords<E> {
    pub fn new(needle: impl Into<String>) -> Self {
        Self {
            needle: needle.into(),
            _marker: PhantomData,
        }
    }
}

impl<E: Entity> Query for SearchRecords<E> {
    const NAME: &'static str = "SearchRecords";
    type Dto = Records<E>;
}

/// 满足规约的记录，按标识排序
pub struct FilterRecords<E> {
    spec: BoxedSpecification<E>,
}

impl<E: Entity> FilterRecords<E> {
    pub fn new(spec: impl Specification<E> + Send + Sync + 'static) -> Self {
        Self {
            spec: Box::new(spec),
        }
    }
}

impl<E: Entity> Query for FilterRecords<E> {
    const NAME: &'static str = "FilterRecords";
    type Dto = Records<E>;
}

/// 按标识读取单条记录
pub struct GetRecord<E: Entity>(pub E::Id);

impl<E: Entity> Query for GetRecord<E> {
    const NAME: &'static str = "GetRecord";
    type Dto = Option<E>;
}

/// 库存汇总
#[derive(Debug, Default, Clone, Copy)]
pub struct ValuateInventory;

impl Query for ValuateInventory {
    const NAME: &'static str = "ValuateInventory";
    type Dto = InventoryValuation;
}

// --- 处理器 ---

/// 通用目录处理器：同一个实例处理某一实体集合上的全部命令与查询
pub struct CatalogHandler<E: Entity, S> {
    collection: SharedCollection<E, S>,
}

impl<E: Entity, S: Store<E>> CatalogHandler<E, S> {
    pub fn new(collection: SharedCollection<E, S>) -> Self {
        Self { collection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Collection<E, S>>, AppError> {
        self.collection
            .lock()
            .map_err(|_| AppError::Infra(format!("{} collection lock poisoned", E::KIND)))
    }
}

#[async_trait]
impl<E: Entity, S: Store<E> + 'static> CommandHandler<AddRecord<E>> for CatalogHandler<E, S> {
    async fn handle(&self, ctx: &AppContext, cmd: AddRecord<E>) -> Result<(), AppError> {
        let id = cmd.0.id().to_string();
        self.lock()?.add(cmd.0)?;
        info!(kind = E::KIND, %id, actor = ctx.actor(), "record added");
        Ok(())
    }
}

#[async_trait]
impl<E: Entity, S: Store<E> + 'static> CommandHandler<RemoveRecord<E>> for CatalogHandler<E, S> {
    async fn handle(&self, ctx: &AppContext, cmd: RemoveRecord<E>) -> Result<E, AppError> {
        let removed = self.lock()?.remove(&cmd.0)?;
        info!(kind = E::KIND, id = %cmd.0, actor = ctx.actor(), "record removed");
        Ok(removed)
    }
}

#[async_trait]
impl<E: Entity, S: Store<E> + 'static> CommandHandler<UpdateRecord<E>> for CatalogHandler<E, S> {
    async fn handle(&self, ctx: &AppContext, cmd: UpdateRecord<E>) -> Result<E, AppError> {
        let updated = self.lock()?.update(&cmd.id, cmd.patch)?;
        info!(kind = E::KIND, id = %cmd.id, actor = ctx.actor(), "record updated");
        Ok(updated)
    }
}

#[async_trait]
impl<E: Entity, S: Store<E> + 'static> CommandHandler<RemoveWhere<E>> for CatalogHandler<E, S> {
    async fn handle(&self, ctx: &AppContext, cmd: RemoveWhere<E>) -> Result<Vec<E>, AppError> {
        let removed = self.lock()?.remove_where(&*cmd.spec)?;
        info!(kind = E::KIND, count = removed.len(), actor = ctx.actor(), "records removed");
        Ok(removed)
    }
}

#[async_trait]
impl<E: Entity, S: Store<E> + 'static> QueryHandler<ListRecords<E>> for CatalogHandler<E, S> {
    async fn handle(&self, _ctx: &AppContext, _q: ListRecords<E>) -> Result<Records<E>, AppError> {
        Ok(Records {
            items: self.lock()?.list_all(),
        })
    }
}

#[async_trait]
impl<E: Entity, S: Store<E> + 'static> QueryHandler<SearchRecords<E>> for CatalogHandler<E, S> {
    async fn handle(&self, _ctx: &AppContext, q: SearchRecords<E>) -> Result<Records<E>, AppError> {
        Ok(Records {
            items: self.lock()?.search(&q.needle),
        })
    }
}

#[async_trait]
impl<E: Entity, S: Store<E> + 'static> QueryHandler<FilterRecords<E>> for CatalogHandler<E, S> {
    async fn handle(
        &self,
        _ctx: &AppContext,
        q: FilterRecords<E>,
    ) -> Result<Records<E>, AppError> {
        Ok(Records {
            items: self.lock()?.filter(&*q.spec),
        })
    }
}

#[async_trait]
impl<E: Entity, S: Store<E> + 'static> QueryHandler<GetRecord<E>> for CatalogHandler<E, S> {
    async fn handle(&self, _ctx: &AppContext, q: GetRecord<E>) -> Result<Option<E>, AppError> {
        Ok(self.lock()?.get(&q.0).cloned())
    }
}

#[async_trait]
impl<S: Store<Product> + 'static> QueryHandler<ValuateInventory> for CatalogHandler<Product, S> {
    async fn handle(
        &self,
        _ctx: &AppContext,
        _q: ValuateInventory,
    ) -> Result<InventoryValuation, AppError> {
        Ok(InventoryValuation::of(self.lock()?.iter()))
    }
}

#[async_trait]
impl<S: Store<Book> + 'static> CommandHandler<LendBook> for CatalogHandler<Book, S> {
    async fn handle(&self, ctx: &AppContext, cmd: LendBook) -> Result<Book, AppError> {
        let book = self.lock()?.modify(&cmd.0, Book::lend)?;
        info!(isbn = %cmd.0, actor = ctx.actor(), "book lent");
        Ok(book)
    }
}

#[async_trait]
impl<S: Store<Book> + 'static> CommandHandler<ReturnBook> for CatalogHandler<Book, S> {
    async fn handle(&self, ctx: &AppContext, cmd: ReturnBook) -> Result<Book, AppError> {
        let book = self.lock()?.modify(&cmd.0, Book::give_back)?;
        info!(isbn = %cmd.0, actor = ctx.actor(), "book returned");
        Ok(book)
    }
}

#[async_trait]
impl<S: Store<Task> + 'static> CommandHandler<CompleteTask> for CatalogHandler<Task, S> {
    async fn handle(&self, ctx: &AppContext, cmd: CompleteTask) -> Result<Task, AppError> {
        let task = self.lock()?.modify(&cmd.0, |task| {
            task.complete();
            Ok(())
        })?;
        info!(id = %cmd.0, actor = ctx.actor(), "task completed");
        Ok(task)
    }
}

/// 把某一实体集合的全部通用命令与查询注册到总线
pub fn register_catalog<E, S>(
    commands: &InMemoryCommandBus,
    queries: &InMemoryQueryBus,
    collection: SharedCollection<E, S>,
) -> Result<Arc<CatalogHandler<E, S>>, AppError>
where
    E: Entity,
    S: Store<E> + 'static,
{
    let handler = Arc::new(CatalogHandler::new(collection));

    commands.register::<AddRecord<E>, _>(handler.clone())?;
    commands.register::<RemoveRecord<E>, _>(handler.clone())?;
    commands.register::<UpdateRecord<E>, _>(handler.clone())?;
    commands.register::<RemoveWhere<E>, _>(handler.clone())?;

    queries.register::<ListRecords<E>, _>(handler.clone())?;
    queries.register::<SearchRecords<E>, _>(handler.clone())?;
    queries.register::<FilterRecords<E>, _>(handler.clone())?;
    queries.register::<GetRecord<E>, _>(handler.clone())?;

    Ok(handler)
}

/// 库存集合在通用用例之外还提供汇总查询
pub fn register_inventory<S>(
    commands: &InMemoryCommandBus,
    queries: &InMemoryQueryBus,
    collection: SharedCollection<Product, S>,
) -> Result<(), AppError>
where
    S: Store<Product> + 'static,
{
    let handler = register_catalog(commands, queries, collection)?;
    queries.register::<ValuateInventory, _>(handler)
}

/// 馆藏集合另外提供借出与归还
pub fn register_library<S>(
    commands: &InMemoryCommandBus,
    queries: &InMemoryQueryBus,
    collection: SharedCollection<Book, S>,
) -> Result<(), AppError>
where
    S: Store<Book> + 'static,
{
    let handler = register_catalog(commands, queries, collection)?;
    commands.register::<LendBook, _>(handler.clone())?;
    commands.register::<ReturnBook, _>(handler)
}

/// 待办集合另外提供标记完成
pub fn register_tasks<S>(
    commands: &InMemoryCommandBus,
    queries: &InMemoryQueryBus,
    collection: SharedCollection<Task, S>,
) -> Result<(), AppError>
where
    S: Store<Task> + 'static,
{
    let handler = register_catalog(commands, queries, collection)?;
    commands.register::<CompleteTask, _>(handler)
}
