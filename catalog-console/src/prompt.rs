//! 行输入提示
//!
//! 基于任意 `BufRead`/`Write`，便于以脚本化输入进行测试。
//! 转换失败时提示并重新询问；输入结束（EOF）时返回 [`ConsoleError::Closed`]。
//!
use std::fmt::Display;
use std::io::{BufRead, Write};
use std::str::FromStr;

use chrono::NaiveDate;

use crate::error::{ConsoleError, ConsoleResult};

pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// 输出一行
    pub fn say(&mut self, text: impl Display) -> ConsoleResult<()> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }

    /// 显示提示并读取一行（已去除首尾空白）
    pub fn line(&mut self, label: &str) -> ConsoleResult<String> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Err(ConsoleError::Closed);
        }
        Ok(buf.trim().to_string())
    }

    /// 非空文本；为空时重新询问
    pub fn text(&mut self, label: &str) -> ConsoleResult<String> {
        loop {
            let value = self.line(label)?;
            if !value.is_empty() {
                return Ok(value);
            }
            self.say("⚠️ 输入不能为空")?;
        }
    }

    /// 可留空的文本，留空返回 `None`
    pub fn optional(&mut self, label: &str) -> ConsoleResult<Option<String>> {
        let value = self.line(label)?;
        Ok((!value.is_empty()).then_some(value))
    }

    /// 解析为指定类型；无法解析时重新询问
    pub fn parse<T>(&mut self, label: &str) -> ConsoleResult<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        loop {
            match self.text(label)?.parse::<T>() {
                Ok(value) => return Ok(value),
                Err(err) => self.say(format!("⚠️ 输入无效: {err}"))?,
            }
        }
    }

    /// 可留空的解析；留空返回 `None`，无法解析时重新询问
    pub fn parse_optional<T>(&mut self, label: &str) -> ConsoleResult<Option<T>>
    where
        T: FromStr,
        T::Err: Display,
    {
        loop {
            let Some(raw) = self.optional(label)? else {
                return Ok(None);
            };
            match raw.parse::<T>() {
                Ok(value) => return Ok(Some(value)),
                Err(err) => self.say(format!("⚠️ 输入无效: {err}"))?,
            }
        }
    }

    pub fn integer(&mut self, label: &str) -> ConsoleResult<i64> {
        self.parse(label)
    }

    pub fn decimal(&mut self, label: &str) -> ConsoleResult<f64> {
        self.parse(label)
    }

    /// 日期（YYYY-MM-DD），可留空
    pub fn date(&mut self, label: &str) -> ConsoleResult<Option<NaiveDate>> {
        self.parse_optional(label)
    }

    /// 是/否确认，`s`/`y`（含 `si`、`sí`、`yes`）视为确认
    pub fn confirm(&mut self, label: &str) -> ConsoleResult<bool> {
        Ok(is_yes(&self.line(label)?))
    }

    /// 可留空的是/否，留空返回 `None`
    pub fn optional_confirm(&mut self, label: &str) -> ConsoleResult<Option<bool>> {
        Ok(self.optional(label)?.map(|answer| is_yes(&answer)))
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(
        answer.to_lowercase().as_str(),
        "s" | "si" | "sí" | "y" | "yes"
    )
}
