//! 通过命令/查询总线操作图书馆藏
//!
//! 运行示例：
//! ```bash
//! cargo run -p catalog-application --example library_over_bus
//! ```

use catalog_application::catalog::{
    AddRecord, LendBook, ListRecords, RemoveWhere, SearchRecords, UpdateRecord, register_library,
    share,
};
use catalog_application::command_bus::CommandBus;
use catalog_application::context::AppContext;
use catalog_application::error::AppError;
use catalog_application::query_bus::QueryBus;
use catalog_application::{InMemoryCommandBus, InMemoryQueryBus};
use catalog_domain::collection::Collection;
use catalog_domain::model::{Available, Book, BookPatch, Isbn};
use catalog_domain::specification::Specification;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let commands = InMemoryCommandBus::new();
    let queries = InMemoryQueryBus::new();
    register_library(&commands, &queries, share(Collection::<Book>::in_memory()))?;

    let ctx = AppContext::builder()
        .correlation_id("cor-1".into())
        .actor("librarian".into())
        .build();

    for (isbn, title, author) in [
        ("978-1", "Huasipungo", "Jorge Icaza"),
        ("978-2", "Cumandá", "Juan León Mera"),
        ("978-3", "A la costa", "Luis A. Martínez"),
    ] {
        commands
            .dispatch(&ctx, AddRecord(Book::new(isbn, title, author)?))
            .await?;
    }

    let lent = commands.dispatch(&ctx, LendBook(Isbn::new("978-2")?)).await?;
    println!("已借出: {lent}");

    let renamed = commands
        .dispatch(
            &ctx,
            UpdateRecord::<Book> {
                id: Isbn::new("978-3")?,
                patch: BookPatch::builder().title("A la Costa".to_string()).build(),
            },
        )
        .await?;
    println!("已更新: {renamed}");

    let hits = queries.dispatch(&ctx, SearchRecords::<Book>::new("cu")).await?;
    println!("检索 \"cu\": {} 本", hits.len());

    // 重复 ISBN -> Domain(Duplicate)
    if let Err(AppError::Domain(err)) = commands
        .dispatch(&ctx, AddRecord(Book::new("978-1", "Otro", "Anónimo")?))
        .await
    {
        eprintln!("rejected as expected: {err}");
    }

    let withdrawn = commands
        .dispatch(&ctx, RemoveWhere::<Book>::new(Available.not()))
        .await?;
    println!("下架已借出图书 {} 本", withdrawn.len());

    for book in queries.dispatch(&ctx, ListRecords::<Book>::new()).await? {
        println!("  {book}");
    }
    Ok(())
}
