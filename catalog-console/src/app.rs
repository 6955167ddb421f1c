//! 会话装配：按配置打开集合、注册用例、运行对应菜单
//!
use std::fmt::Display;
use std::io::{BufRead, Write};
use std::str::FromStr;

use catalog_application::catalog::{
    register_catalog, register_inventory, register_library, register_tasks, share,
};
use catalog_application::context::AppContext;
use catalog_application::{InMemoryCommandBus, InMemoryQueryBus};
use catalog_domain::collection::Collection;
use catalog_domain::entity::Entity;
use catalog_domain::model::Dish;
use catalog_domain::persist::{JsonFileStore, MemoryStore, Store};
use tracing::info;

use crate::config::{CatalogKind, Settings, Storage};
use crate::error::ConsoleResult;
use crate::forms::{BookForm, DishForm, ProductForm, RecordForm, TaskForm};
use crate::menu::{CatalogMenu, Session};
use crate::prompt::Prompt;

type BoxedStore<E> = Box<dyn Store<E>>;

fn open_collection<E: Entity>(storage: &Storage) -> Collection<E, BoxedStore<E>> {
    let store: BoxedStore<E> = match storage {
        Storage::File(path) => Box::new(JsonFileStore::<E>::new(path)),
        Storage::Memory => Box::new(MemoryStore::<E>::new()),
    };
    Collection::open(store)
}

/// 运行一次完整的菜单会话，返回输出端
pub async fn run<R, W>(settings: &Settings, input: R, output: W) -> ConsoleResult<W>
where
    R: BufRead,
    W: Write,
{
    let commands = InMemoryCommandBus::new();
    let queries = InMemoryQueryBus::new();
    let prompt = Prompt::new(input, output);

    info!(kind = ?settings.kind, storage = ?settings.storage, "starting catalog session");

    let prompt = match settings.kind {
        CatalogKind::Products => {
            let collection = share(open_collection(&settings.storage));
            register_inventory(&commands, &queries, collection)?;
            session(ProductForm, prompt, commands, queries).await?
        }
        CatalogKind::Books => {
            register_library(&commands, &queries, share(open_collection(&settings.storage)))?;
            session(BookForm, prompt, commands, queries).await?
        }
        CatalogKind::Dishes => {
            register_catalog(&commands, &queries, share(open_collection::<Dish>(&settings.storage)))?;
            session(DishForm, prompt, commands, queries).await?
        }
        CatalogKind::Tasks => {
            register_tasks(&commands, &queries, share(open_collection(&settings.storage)))?;
            session(TaskForm, prompt, commands, queries).await?
        }
    };
    Ok(prompt.into_output())
}

async fn session<F, R, W>(
    form: F,
    prompt: Prompt<R, W>,
    commands: InMemoryCommandBus,
    queries: InMemoryQueryBus,
) -> ConsoleResult<Prompt<R, W>>
where
    F: RecordForm,
    R: BufRead,
    W: Write,
    <<F::Entity as Entity>::Id as FromStr>::Err: Display,
{
    let ctx = AppContext::builder().actor("console".into()).build();
    CatalogMenu::new(form, Session::new(prompt, commands, queries, ctx))
        .run()
        .await
}
