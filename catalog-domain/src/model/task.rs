use std::fmt;

use bon::Builder;
use catalog_macros::entity_id;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::DomainResult;
use crate::specification::Specification;
use crate::value_object::Name;

#[entity_id(copy = true)]
pub struct TaskId(u32);

/// 待办事项，按描述检索；可带截止日期
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    #[serde(rename = "descripcion")]
    description: Name,
    #[serde(rename = "completada", default)]
    completed: bool,
    #[serde(
        rename = "fecha_limite",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    due: Option<NaiveDate>,
}

impl Task {
    pub fn new(
        id: u32,
        description: impl Into<String>,
        due: Option<NaiveDate>,
    ) -> DomainResult<Self> {
        Ok(Self {
            id: TaskId::new(id),
            description: Name::labelled("description", description)?,
            completed: false,
            due,
        })
    }

    pub fn description(&self) -> &Name {
        &self.description
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn due(&self) -> Option<NaiveDate> {
        self.due
    }

    /// 标记完成，返回状态是否发生变化
    pub fn complete(&mut self) -> bool {
        !std::mem::replace(&mut self.completed, true)
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.completed { "✔" } else { " " };
        write!(f, "[{mark}] #{} {}", self.id, self.description)?;
        if let Some(due) = self.due {
            write!(f, " (截止 {due})")?;
        }
        Ok(())
    }
}

#[derive(Builder, Debug, Default, Clone, PartialEq)]
pub struct TaskPatch {
    pub description: Option<String>,
    pub completed: Option<bool>,
    pub due: Option<NaiveDate>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.completed.is_none() && self.due.is_none()
    }
}

impl Entity for Task {
    type Id = TaskId;
    type Patch = TaskPatch;

    const KIND: &'static str = "task";

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn label(&self) -> &str {
        self.description.as_str()
    }

    fn apply(&mut self, patch: Self::Patch) -> DomainResult<()> {
        let description = patch
            .description
            .map(|d| Name::labelled("description", d))
            .transpose()?;

        if let Some(description) = description {
            self.description = description;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        if patch.due.is_some() {
            self.due = patch.due;
        }
        Ok(())
    }
}

/// 已完成的任务
#[derive(Debug, Clone, Copy, Default)]
pub struct Completed;

impl Specification<Task> for Completed {
    fn is_satisfied_by(&self, candidate: &Task) -> bool {
        candidate.completed
    }
}

/// 截止日期早于给定日期且尚未完成的任务
#[derive(Debug, Clone, Copy)]
pub struct OverdueOn(pub NaiveDate);

impl Specification<Task> for OverdueOn {
    fn is_satisfied_by(&self, candidate: &Task) -> bool {
        !candidate.completed && candidate.due.is_some_and(|due| due < self.0)
    }
}
