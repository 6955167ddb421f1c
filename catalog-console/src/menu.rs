//! 通用菜单循环
//!
//! 1 新增 / 2 删除 / 3 更新 / 4 检索 / 5 列表 / 6 退出，表单可在其后追加
//! 自己的操作（编号从 7 开始）。
//! 单次操作的错误只打印不退出；输入结束（EOF）时会话正常结束。
//!
use std::fmt::Display;
use std::io::{BufRead, Write};
use std::str::FromStr;

use catalog_application::catalog::{
    AddRecord, GetRecord, ListRecords, RemoveRecord, SearchRecords, UpdateRecord,
};
use catalog_application::command::Command;
use catalog_application::command_bus::CommandBus;
use catalog_application::context::AppContext;
use catalog_application::query::Query;
use catalog_application::query_bus::QueryBus;
use catalog_application::{InMemoryCommandBus, InMemoryQueryBus};
use catalog_domain::entity::Entity;
use tracing::{debug, warn};

use crate::error::{ConsoleError, ConsoleResult};
use crate::forms::RecordForm;
use crate::prompt::Prompt;

type IdOf<F> = <<F as RecordForm>::Entity as Entity>::Id;

/// 第一个附加操作的编号
const FIRST_EXTRA: usize = 7;

/// 一次会话的输入输出与总线
pub struct Session<R, W> {
    pub prompt: Prompt<R, W>,
    commands: InMemoryCommandBus,
    queries: InMemoryQueryBus,
    ctx: AppContext,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(
        prompt: Prompt<R, W>,
        commands: InMemoryCommandBus,
        queries: InMemoryQueryBus,
        ctx: AppContext,
    ) -> Self {
        Self {
            prompt,
            commands,
            queries,
            ctx,
        }
    }

    pub async fn command<C: Command>(&self, cmd: C) -> ConsoleResult<C::Output> {
        Ok(self.commands.dispatch(&self.ctx, cmd).await?)
    }

    pub async fn query<Q: Query>(&self, q: Q) -> ConsoleResult<Q::Dto> {
        Ok(self.queries.dispatch(&self.ctx, q).await?)
    }

    /// 读取标识并取回当前记录；不存在时打印提示并返回 `None`
    pub async fn find<E>(&mut self) -> ConsoleResult<Option<E>>
    where
        E: Entity,
        <E::Id as FromStr>::Err: Display,
    {
        let id = self.prompt.parse::<E::Id>("ID: ")?;
        let found = self.query(GetRecord::<E>(id.clone())).await?;
        if found.is_none() {
            self.prompt.say(format!("❌ 未找到 ID 为 {id} 的记录"))?;
        }
        Ok(found)
    }

    /// 逐行输出记录；没有记录时输出 `empty`
    pub fn show<E: Display>(&mut self, records: &[E], empty: &str) -> ConsoleResult<()> {
        if records.is_empty() {
            return self.prompt.say(empty);
        }
        for record in records {
            self.prompt.say(format!("  {record}"))?;
        }
        Ok(())
    }

    pub fn into_prompt(self) -> Prompt<R, W> {
        self.prompt
    }
}

pub struct CatalogMenu<F, R, W> {
    form: F,
    session: Session<R, W>,
}

impl<F, R, W> CatalogMenu<F, R, W>
where
    F: RecordForm,
    R: BufRead,
    W: Write,
    <IdOf<F> as FromStr>::Err: Display,
{
    pub fn new(form: F, session: Session<R, W>) -> Self {
        Self { form, session }
    }

    /// 运行菜单直到选择退出或输入结束，返回提示器以便取回输出
    pub async fn run(mut self) -> ConsoleResult<Prompt<R, W>> {
        loop {
            self.print_menu()?;
            let choice = match self.session.prompt.line("请选择一个选项: ") {
                Ok(choice) => choice,
                Err(ConsoleError::Closed) => break,
                Err(err) => return Err(err),
            };

            let outcome = match choice.as_str() {
                "1" => self.add().await,
                "2" => self.remove().await,
                "3" => self.update().await,
                "4" => self.search().await,
                "5" => self.list().await,
                "6" => {
                    self.session.prompt.say("👋 再见！")?;
                    break;
                }
                other => match extra_index::<F>(other) {
                    Some(index) => self.form.run_extra(index, &mut self.session).await,
                    None => self.session.prompt.say(format!("❌ 无效选项: {other}")),
                },
            };

            match outcome {
                Ok(()) => {}
                Err(ConsoleError::Closed) => break,
                Err(err) if err.is_recoverable() => {
                    warn!(kind = <F::Entity as Entity>::KIND, error = %err, "menu action failed");
                    self.session.prompt.say(format!("❌ {err}"))?;
                }
                Err(err) => return Err(err),
            }
        }
        debug!(kind = <F::Entity as Entity>::KIND, "menu session ended");
        Ok(self.session.into_prompt())
    }

    fn print_menu(&mut self) -> ConsoleResult<()> {
        let prompt = &mut self.session.prompt;
        prompt.say(format!("\n===== {} =====", F::TITLE))?;
        prompt.say("1. 新增")?;
        prompt.say("2. 删除")?;
        prompt.say("3. 更新")?;
        prompt.say("4. 按名称检索")?;
        prompt.say("5. 显示全部")?;
        prompt.say("6. 退出")?;
        for (i, label) in F::EXTRA_ACTIONS.iter().enumerate() {
            prompt.say(format!("{}. {label}", FIRST_EXTRA + i))?;
        }
        Ok(())
    }

    async fn add(&mut self) -> ConsoleResult<()> {
        let record = self.form.read_new(&mut self.session.prompt)?;
        let shown = record.to_string();
        self.session.command(AddRecord(record)).await?;
        self.session.prompt.say(format!("✅ 已新增: {shown}"))
    }

    async fn remove(&mut self) -> ConsoleResult<()> {
        let Some(record) = self.session.find::<F::Entity>().await? else {
            return Ok(());
        };
        self.session.prompt.say(format!("  {record}"))?;
        if !self.session.prompt.confirm("确认删除？(s/n): ")? {
            return self.session.prompt.say("已取消");
        }

        let removed = self
            .session
            .command(RemoveRecord::<F::Entity>(record.id().clone()))
            .await?;
        self.session.prompt.say(format!("🗑️ 已删除: {removed}"))
    }

    async fn update(&mut self) -> ConsoleResult<()> {
        let Some(current) = self.session.find::<F::Entity>().await? else {
            return Ok(());
        };
        self.session.prompt.say(format!("  当前: {current}"))?;

        let Some(patch) = self.form.read_patch(&mut self.session.prompt, &current)? else {
            return self.session.prompt.say("未做任何修改");
        };
        let updated = self
            .session
            .command(UpdateRecord::<F::Entity> {
                id: current.id().clone(),
                patch,
            })
            .await?;
        self.session.prompt.say(format!("✅ 已更新: {updated}"))
    }

    async fn search(&mut self) -> ConsoleResult<()> {
        let needle = self.session.prompt.text("检索关键字: ")?;
        let hits = self
            .session
            .query(SearchRecords::<F::Entity>::new(needle))
            .await?;
        self.session.show(&hits.items, "🔍 未找到匹配的记录")
    }

    async fn list(&mut self) -> ConsoleResult<()> {
        let records = self
            .session
            .query(ListRecords::<F::Entity>::new())
            .await?;
        if records.is_empty() {
            return self.session.prompt.say("📭 暂无记录");
        }
        self.session.show(&records.items, "")?;
        if let Some(summary) = self.form.summary(&self.session, &records.items).await? {
            self.session.prompt.say(format!("  合计: {summary}"))?;
        }
        Ok(())
    }
}

/// 把菜单输入映射为附加操作的下标
fn extra_index<F: RecordForm>(choice: &str) -> Option<usize> {
    let n: usize = choice.parse().ok()?;
    let index = n.checked_sub(FIRST_EXTRA)?;
    (index < F::EXTRA_ACTIONS.len()).then_some(index)
}
