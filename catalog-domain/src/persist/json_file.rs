//! JSON 文件存储
//!
//! 写出格式为按标识排序的 JSON 数组（缩进美化）；读取时同时兼容早期
//! 以标识为键的对象格式（`{"1": {...}}`，键本身被忽略，以记录内字段为准）。
//!
use std::{
    fs,
    io::{self, Write},
    marker::PhantomData,
    path::{Path, PathBuf},
};

use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::{
    entity::Entity,
    error::{DomainError, DomainResult as Result},
    persist::Store,
};

/// 把整份集合镜像到单个 JSON 文件
///
/// 写入先落到同目录下的临时文件，成功后再原子替换目标文件；
/// 任一步骤失败时临时文件随 drop 清理，原文件保持不变。
#[derive(Debug, Clone)]
pub struct JsonFileStore<E> {
    path: PathBuf,
    _marker: PhantomData<fn() -> E>,
}

impl<E: Entity> JsonFileStore<E> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persistence_error(&self, err: impl ToString) -> DomainError {
        DomainError::Persistence {
            path: self.path.display().to_string(),
            reason: err.to_string(),
        }
    }

    fn decode(&self, text: &str) -> Result<Vec<E>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let items = match serde_json::from_str::<Value>(text)? {
            Value::Array(items) => items,
            Value::Object(map) => {
                debug!(path = %self.path.display(), "reading keyed-object record file");
                map.into_iter().map(|(_, v)| v).collect()
            }
            other => {
                return Err(self.persistence_error(format!(
                    "expected a JSON array or object, found {}",
                    json_kind(&other)
                )));
            }
        };
        items
            .into_iter()
            .map(|item| serde_json::from_value::<E>(item).map_err(DomainError::from))
            .collect()
    }

    fn write_atomically(&self, bytes: &[u8]) -> io::Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(bytes)?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl<E: Entity> Store<E> for JsonFileStore<E> {
    fn load(&mut self) -> Result<Vec<E>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), kind = E::KIND, "data file not found, starting empty");
                return Ok(Vec::new());
            }
            Err(err) => return Err(self.persistence_error(err)),
        };
        let records = self.decode(&text)?;
        debug!(path = %self.path.display(), count = records.len(), "records loaded");
        Ok(records)
    }

    fn save(&mut self, records: &[&E]) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(records)?;
        self.write_atomically(&bytes)
            .map_err(|err| self.persistence_error(err))?;
        debug!(path = %self.path.display(), count = records.len(), "records saved");
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Book, Product};
    use tempfile::TempDir;

    fn mouse() -> Product {
        Product::new(1, "Mouse", 10, 5.0).unwrap()
    }

    #[test]
    fn missing_file_loads_empty_and_is_not_created() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("inventario.json");
        let mut store = JsonFileStore::<Product>::new(&path);

        assert!(store.load().unwrap().is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn save_writes_pretty_array_and_reloads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("inventario.json");
        let mut store = JsonFileStore::<Product>::new(&path);

        let keyboard = Product::new(2, "Keyboard", 2, 20.0).unwrap();
        store.save(&[&mouse(), &keyboard]).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("[\n"));
        assert!(text.contains("\"nombre\": \"Mouse\""));

        assert_eq!(store.load().unwrap(), vec![mouse(), keyboard]);
    }

    #[test]
    fn save_creates_missing_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("menu").join("inventario.json");
        let mut store = JsonFileStore::<Product>::new(&path);

        store.save(&[&mouse()]).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn reads_keyed_object_format() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("biblioteca.json");
        fs::write(
            &path,
            r#"{"111": {"isbn": "111", "titulo": "Cumandá", "autor": "Juan León Mera", "disponible": false}}"#,
        )
        .unwrap();

        let books = JsonFileStore::<Book>::new(&path).load().unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].title().as_str(), "Cumandá");
        assert!(!books[0].is_available());
    }

    #[test]
    fn invalid_record_makes_file_unreadable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("inventario.json");
        fs::write(
            &path,
            r#"[{"id": 1, "nombre": "Mouse", "cantidad": -4, "precio": 5.0}]"#,
        )
        .unwrap();

        let err = JsonFileStore::<Product>::new(&path).load().unwrap_err();
        assert!(matches!(err, DomainError::Serde { .. }));
    }

    #[test]
    fn blank_isbn_makes_library_file_unreadable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("biblioteca.json");
        fs::write(
            &path,
            r#"[{"isbn": "   ", "titulo": "Cumandá", "autor": "Juan León Mera"}]"#,
        )
        .unwrap();

        let err = JsonFileStore::<Book>::new(&path).load().unwrap_err();
        assert!(matches!(err, DomainError::Serde { .. }));
        assert!(err.to_string().contains("isbn"));
    }

    #[test]
    fn scalar_json_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("inventario.json");
        fs::write(&path, "42").unwrap();

        let err = JsonFileStore::<Product>::new(&path).load().unwrap_err();
        assert!(err.is_persistence());
        assert!(err.to_string().contains("number"));
    }

    #[test]
    fn save_into_unwritable_location_fails_and_keeps_old_file() {
        let dir = TempDir::new().unwrap();
        // 父路径是普通文件，无法在其下创建目录或临时文件
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "x").unwrap();
        let mut store = JsonFileStore::<Product>::new(blocker.join("inventario.json"));

        let err = store.save(&[&mouse()]).unwrap_err();
        assert!(matches!(err, DomainError::Persistence { .. }));
        assert_eq!(fs::read_to_string(&blocker).unwrap(), "x");
    }
}
