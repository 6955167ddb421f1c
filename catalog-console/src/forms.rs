//! 各实体的录入表单
//!
//! 菜单本身是通用的，只通过 [`RecordForm`] 知道如何询问新记录、
//! 如何询问局部更新、列表末尾显示什么汇总，以及该集合特有的附加操作。
//!
use std::fmt::Display;
use std::io::{BufRead, Write};

use catalog_application::catalog::{
    CompleteTask, FilterRecords, LendBook, RemoveWhere, ReturnBook, ValuateInventory,
};
use catalog_domain::entity::Entity;
use catalog_domain::model::{
    Available, Book, BookPatch, Completed, Dish, DishCategory, DishPatch, Isbn, OverdueOn,
    Product, ProductPatch, Task, TaskPatch,
};

use crate::error::ConsoleResult;
use crate::menu::Session;
use crate::prompt::Prompt;

const KEEP: &str = "（留空保持不变）";

pub trait RecordForm {
    type Entity: Entity + Display;

    /// 菜单标题
    const TITLE: &'static str;

    /// 询问一条新记录
    fn read_new<R: BufRead, W: Write>(
        &self,
        prompt: &mut Prompt<R, W>,
    ) -> ConsoleResult<Self::Entity>;

    /// 询问局部更新；没有任何修改时返回 `None`
    fn read_patch<R: BufRead, W: Write>(
        &self,
        prompt: &mut Prompt<R, W>,
        current: &Self::Entity,
    ) -> ConsoleResult<Option<<Self::Entity as Entity>::Patch>>;

    /// 通用菜单项之后追加的操作，依次编号为 7、8…
    const EXTRA_ACTIONS: &'static [&'static str] = &[];

    /// 执行第 `index` 个附加操作
    async fn run_extra<R: BufRead, W: Write>(
        &self,
        _index: usize,
        _session: &mut Session<R, W>,
    ) -> ConsoleResult<()> {
        Ok(())
    }

    /// 列表末尾的汇总行
    async fn summary<R: BufRead, W: Write>(
        &self,
        _session: &Session<R, W>,
        _records: &[Self::Entity],
    ) -> ConsoleResult<Option<String>> {
        Ok(None)
    }
}

pub struct ProductForm;

impl RecordForm for ProductForm {
    type Entity = Product;

    const TITLE: &'static str = "📦 库存管理";

    fn read_new<R: BufRead, W: Write>(&self, prompt: &mut Prompt<R, W>) -> ConsoleResult<Product> {
        let id = prompt.parse::<u32>("ID: ")?;
        let name = prompt.text("名称: ")?;
        let quantity = prompt.integer("数量: ")?;
        let price = prompt.decimal("单价: ")?;
        Ok(Product::new(id, name, quantity, price)?)
    }

    fn read_patch<R: BufRead, W: Write>(
        &self,
        prompt: &mut Prompt<R, W>,
        _current: &Product,
    ) -> ConsoleResult<Option<ProductPatch>> {
        let patch = ProductPatch::builder()
            .maybe_name(prompt.optional(&format!("新名称{KEEP}: "))?)
            .maybe_quantity(prompt.parse_optional(&format!("新数量{KEEP}: "))?)
            .maybe_price(prompt.parse_optional(&format!("新单价{KEEP}: "))?)
            .build();
        Ok((!patch.is_empty()).then_some(patch))
    }

    async fn summary<R: BufRead, W: Write>(
        &self,
        session: &Session<R, W>,
        _records: &[Product],
    ) -> ConsoleResult<Option<String>> {
        let valuation = session.query(ValuateInventory).await?;
        Ok(Some(valuation.to_string()))
    }
}

pub struct BookForm;

impl RecordForm for BookForm {
    type Entity = Book;

    const TITLE: &'static str = "📚 图书管理";

    fn read_new<R: BufRead, W: Write>(&self, prompt: &mut Prompt<R, W>) -> ConsoleResult<Book> {
        let isbn = prompt.text("ISBN: ")?;
        let title = prompt.text("书名: ")?;
        let author = prompt.text("作者: ")?;
        Ok(Book::new(isbn, title, author)?)
    }

    fn read_patch<R: BufRead, W: Write>(
        &self,
        prompt: &mut Prompt<R, W>,
        _current: &Book,
    ) -> ConsoleResult<Option<BookPatch>> {
        let patch = BookPatch::builder()
            .maybe_title(prompt.optional(&format!("新书名{KEEP}: "))?)
            .maybe_author(prompt.optional(&format!("新作者{KEEP}: "))?)
            .maybe_available(prompt.optional_confirm(&format!("是否可借 s/n{KEEP}: "))?)
            .build();
        Ok((!patch.is_empty()).then_some(patch))
    }

    const EXTRA_ACTIONS: &'static [&'static str] = &["借出", "归还", "可借图书"];

    async fn run_extra<R: BufRead, W: Write>(
        &self,
        index: usize,
        session: &mut Session<R, W>,
    ) -> ConsoleResult<()> {
        match index {
            0 => {
                let isbn = session.prompt.parse::<Isbn>("ISBN: ")?;
                let book = session.command(LendBook(isbn)).await?;
                session.prompt.say(format!("📕 已借出: {book}"))
            }
            1 => {
                let isbn = session.prompt.parse::<Isbn>("ISBN: ")?;
                let book = session.command(ReturnBook(isbn)).await?;
                session.prompt.say(format!("📗 已归还: {book}"))
            }
            _ => {
                let on_shelf = session.query(FilterRecords::<Book>::new(Available)).await?;
                session.show(&on_shelf.items, "📭 暂无可借图书")
            }
        }
    }

    async fn summary<R: BufRead, W: Write>(
        &self,
        _session: &Session<R, W>,
        records: &[Book],
    ) -> ConsoleResult<Option<String>> {
        let available = records.iter().filter(|b| b.is_available()).count();
        Ok(Some(format!("共 {} 本 | 可借 {available} 本", records.len())))
    }
}

pub struct DishForm;

impl RecordForm for DishForm {
    type Entity = Dish;

    const TITLE: &'static str = "🍽️ 菜单管理";

    fn read_new<R: BufRead, W: Write>(&self, prompt: &mut Prompt<R, W>) -> ConsoleResult<Dish> {
        let id = prompt.parse::<u32>("ID: ")?;
        let name = prompt.text("菜名: ")?;
        let price = prompt.decimal("价格: ")?;
        let category = prompt.parse::<DishCategory>(&category_label(""))?;
        Ok(Dish::new(id, name, price, category)?)
    }

    fn read_patch<R: BufRead, W: Write>(
        &self,
        prompt: &mut Prompt<R, W>,
        _current: &Dish,
    ) -> ConsoleResult<Option<DishPatch>> {
        let patch = DishPatch::builder()
            .maybe_name(prompt.optional(&format!("新菜名{KEEP}: "))?)
            .maybe_price(prompt.parse_optional(&format!("新价格{KEEP}: "))?)
            .maybe_category(prompt.parse_optional(&category_label(KEEP))?)
            .build();
        Ok((!patch.is_empty()).then_some(patch))
    }

    async fn summary<R: BufRead, W: Write>(
        &self,
        _session: &Session<R, W>,
        records: &[Dish],
    ) -> ConsoleResult<Option<String>> {
        let counts: Vec<String> = DishCategory::ALL
            .iter()
            .map(|c| {
                let n = records.iter().filter(|d| d.category() == *c).count();
                format!("{c} {n}")
            })
            .collect();
        Ok(Some(format!("共 {} 道 | {}", records.len(), counts.join(" / "))))
    }
}

fn category_label(suffix: &str) -> String {
    let options: Vec<String> = DishCategory::ALL
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{} {c}", i + 1))
        .collect();
    format!("分类（{}）{suffix}: ", options.join(" / "))
}

pub struct TaskForm;

impl RecordForm for TaskForm {
    type Entity = Task;

    const TITLE: &'static str = "📝 待办事项";

    fn read_new<R: BufRead, W: Write>(&self, prompt: &mut Prompt<R, W>) -> ConsoleResult<Task> {
        let id = prompt.parse::<u32>("ID: ")?;
        let description = prompt.text("描述: ")?;
        let due = prompt.date("截止日期 YYYY-MM-DD（可留空）: ")?;
        Ok(Task::new(id, description, due)?)
    }

    fn read_patch<R: BufRead, W: Write>(
        &self,
        prompt: &mut Prompt<R, W>,
        current: &Task,
    ) -> ConsoleResult<Option<TaskPatch>> {
        let description = prompt.optional(&format!("新描述{KEEP}: "))?;
        let completed = if current.is_completed() {
            None
        } else {
            prompt.optional_confirm(&format!("标记为已完成 s/n{KEEP}: "))?
        };
        let due = prompt.date(&format!("新截止日期 YYYY-MM-DD{KEEP}: "))?;

        let patch = TaskPatch::builder()
            .maybe_description(description)
            .maybe_completed(completed)
            .maybe_due(due)
            .build();
        Ok((!patch.is_empty()).then_some(patch))
    }

    const EXTRA_ACTIONS: &'static [&'static str] = &["标记完成", "清除已完成", "逾期事项"];

    async fn run_extra<R: BufRead, W: Write>(
        &self,
        index: usize,
        session: &mut Session<R, W>,
    ) -> ConsoleResult<()> {
        match index {
            0 => {
                let Some(task) = session.find::<Task>().await? else {
                    return Ok(());
                };
                if task.is_completed() {
                    return session.prompt.say(format!("该待办已完成: {task}"));
                }
                let done = session.command(CompleteTask(*task.id())).await?;
                session.prompt.say(format!("✅ 已完成: {done}"))
            }
            1 => {
                let cleared = session.command(RemoveWhere::<Task>::new(Completed)).await?;
                session
                    .prompt
                    .say(format!("🧹 已清除 {} 项已完成的待办", cleared.len()))
            }
            _ => {
                let today = chrono::Local::now().date_naive();
                let overdue = session
                    .query(FilterRecords::<Task>::new(OverdueOn(today)))
                    .await?;
                session.show(&overdue.items, "🎉 没有逾期的待办")
            }
        }
    }

    async fn summary<R: BufRead, W: Write>(
        &self,
        _session: &Session<R, W>,
        records: &[Task],
    ) -> ConsoleResult<Option<String>> {
        let pending = records.iter().filter(|t| !t.is_completed()).count();
        Ok(Some(format!("共 {} 项 | 待完成 {pending} 项", records.len())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConsoleError;
    use catalog_application::catalog::{register_inventory, share};
    use catalog_application::context::AppContext;
    use catalog_application::error::AppError;
    use catalog_application::{InMemoryCommandBus, InMemoryQueryBus};
    use catalog_domain::collection::Collection;
    use catalog_domain::error::DomainError;
    use std::io::Cursor;

    fn prompt(input: &str) -> Prompt<Cursor<Vec<u8>>, Vec<u8>> {
        Prompt::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn product_form_builds_validated_product() {
        let mut p = prompt("1\nMouse\ndiez\n10\n5\n");
        let product = ProductForm.read_new(&mut p).unwrap();
        assert_eq!(product, Product::new(1, "Mouse", 10, 5.0).unwrap());

        let mut p = prompt("2\nCable\n-1\n1\n");
        let err = ProductForm.read_new(&mut p).unwrap_err();
        assert!(matches!(
            err,
            ConsoleError::Domain(DomainError::InvalidValue { .. })
        ));
    }

    #[test]
    fn blank_answers_produce_no_patch() {
        let current = Product::new(1, "Mouse", 10, 5.0).unwrap();
        let mut p = prompt("\n\n\n");
        assert!(ProductForm.read_patch(&mut p, &current).unwrap().is_none());

        let mut p = prompt("\n\n7.5\n");
        let patch = ProductForm.read_patch(&mut p, &current).unwrap().unwrap();
        assert_eq!(patch, ProductPatch::builder().price(7.5).build());
    }

    #[test]
    fn dish_category_accepts_number_or_name() {
        let mut p = prompt("1\nLlapingachos\n8.5\n9\n2\n");
        let dish = DishForm.read_new(&mut p).unwrap();
        assert_eq!(dish.category(), DishCategory::Main);

        let mut p = prompt("2\nJugo\n1.5\nbebida\n");
        assert_eq!(
            DishForm.read_new(&mut p).unwrap().category(),
            DishCategory::Drink
        );
    }

    #[test]
    fn completed_task_is_not_asked_again() {
        let mut task = Task::new(1, "Barrer", None).unwrap();
        task.complete();

        // 只会询问描述与截止日期两项
        let mut p = prompt("\n2024-06-01\n");
        let patch = TaskForm.read_patch(&mut p, &task).unwrap().unwrap();
        assert_eq!(patch.completed, None);
        assert_eq!(patch.due, chrono::NaiveDate::from_ymd_opt(2024, 6, 1));
    }

    fn session() -> Session<Cursor<Vec<u8>>, Vec<u8>> {
        Session::new(
            prompt(""),
            InMemoryCommandBus::new(),
            InMemoryQueryBus::new(),
            AppContext::default(),
        )
    }

    #[tokio::test]
    async fn summaries() {
        let s = session();
        let books = vec![
            Book::new("1", "A", "X").unwrap(),
            Book::new("2", "B", "Y").unwrap(),
        ];
        assert_eq!(
            BookForm.summary(&s, &books).await.unwrap().unwrap(),
            "共 2 本 | 可借 2 本"
        );

        let tasks = vec![Task::new(1, "A", None).unwrap()];
        assert_eq!(
            TaskForm.summary(&s, &tasks).await.unwrap().unwrap(),
            "共 1 项 | 待完成 1 项"
        );
    }

    #[tokio::test]
    async fn product_summary_comes_from_the_query_bus() {
        let products = vec![Product::new(1, "Mouse", 10, 5.0).unwrap()];

        // 未注册汇总查询时报告 HandlerNotFound，而不是在本地重新计算
        let err = ProductForm.summary(&session(), &products).await.unwrap_err();
        assert!(matches!(
            err,
            ConsoleError::App(AppError::HandlerNotFound("ValuateInventory"))
        ));

        let mut collection: Collection<Product> = Collection::in_memory();
        collection.add(products[0].clone()).unwrap();
        let commands = InMemoryCommandBus::new();
        let queries = InMemoryQueryBus::new();
        register_inventory(&commands, &queries, share(collection)).unwrap();
        let s = Session::new(prompt(""), commands, queries, AppContext::default());
        assert_eq!(
            ProductForm.summary(&s, &products).await.unwrap().unwrap(),
            "共 1 种商品 | 10 件 | 总价值: $50.00"
        );
    }

    #[test]
    fn extra_actions_are_declared_per_form() {
        assert!(ProductForm::EXTRA_ACTIONS.is_empty());
        assert!(DishForm::EXTRA_ACTIONS.is_empty());
        assert_eq!(BookForm::EXTRA_ACTIONS, ["借出", "归还", "可借图书"]);
        assert_eq!(TaskForm::EXTRA_ACTIONS.len(), 3);
    }
}
