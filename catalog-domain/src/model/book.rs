use std::fmt;
use std::str::FromStr;

use bon::Builder;
use catalog_macros::entity_id;
use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};
use crate::specification::Specification;
use crate::value_object::Name;

/// ISBN，作为图书在馆藏中的唯一标识
///
/// 去掉首尾空白后不能为空；从文件读入时同样校验。
#[entity_id(validated = true)]
pub struct Isbn(String);

impl Isbn {
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into().trim().to_string();
        if value.is_empty() {
            return Err(DomainError::invalid("isbn", "must not be empty"));
        }
        Ok(Self(value))
    }
}

impl TryFrom<String> for Isbn {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl FromStr for Isbn {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

fn available_by_default() -> bool {
    true
}

/// 馆藏图书，按书名检索
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    #[serde(rename = "isbn")]
    id: Isbn,
    #[serde(rename = "titulo")]
    title: Name,
    #[serde(rename = "autor")]
    author: Name,
    #[serde(rename = "disponible", default = "available_by_default")]
    available: bool,
}

impl Book {
    /// 新入馆的图书默认可借
    pub fn new(
        isbn: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
    ) -> DomainResult<Self> {
        Ok(Self {
            id: Isbn::new(isbn)?,
            title: Name::labelled("title", title)?,
            author: Name::labelled("author", author)?,
            available: true,
        })
    }

    pub fn title(&self) -> &Name {
        &self.title
    }

    pub fn author(&self) -> &Name {
        &self.author
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    /// 借出；已借出时失败
    pub fn lend(&mut self) -> DomainResult<()> {
        if !self.available {
            return Err(DomainError::InvalidState {
                reason: format!("book {} is already lent", self.id),
            });
        }
        self.available = false;
        Ok(())
    }

    /// 归还；未借出时失败
    pub fn give_back(&mut self) -> DomainResult<()> {
        if self.available {
            return Err(DomainError::InvalidState {
                reason: format!("book {} is not lent", self.id),
            });
        }
        self.available = true;
        Ok(())
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.available { "可借" } else { "已借出" };
        write!(
            f,
            "《{}》 {} | {} | ISBN: {}",
            self.title, self.author, state, self.id
        )
    }
}

#[derive(Builder, Debug, Default, Clone, PartialEq)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub available: Option<bool>,
}

impl BookPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none() && self.available.is_none()
    }
}

impl Entity for Book {
    type Id = Isbn;
    type Patch = BookPatch;

    const KIND: &'static str = "book";

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn label(&self) -> &str {
        self.title.as_str()
    }

    fn apply(&mut self, patch: Self::Patch) -> DomainResult<()> {
        let title = patch
            .title
            .map(|t| Name::labelled("title", t))
            .transpose()?;
        let author = patch
            .author
            .map(|a| Name::labelled("author", a))
            .transpose()?;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(author) = author {
            self.author = author;
        }
        if let Some(available) = patch.available {
            self.available = available;
        }
        Ok(())
    }
}

/// 可借的图书
#[derive(Debug, Clone, Copy, Default)]
pub struct Available;

impl Specification<Book> for Available {
    fn is_satisfied_by(&self, candidate: &Book) -> bool {
        candidate.available
    }
}
