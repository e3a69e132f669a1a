use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Key-value port the task store persists through. One key holds one
/// serialized value; reading a never-written key yields `None`, and a
/// write replaces the full value.
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Directory-backed storage: each key lives in `<dir>/<key>.json`.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        // Write to a sibling temp file and rename so readers never see a
        // half-written value.
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        fs::write(&tmp, value)
            .with_context(|| format!("failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &path)
            .with_context(|| format!("failed to replace {}", path.display()))?;
        Ok(())
    }
}

/// In-memory storage double for tests. Clones share the same map, so a
/// fresh store loaded from a clone observes earlier writes.
#[cfg(test)]
#[derive(Clone, Default)]
pub struct MemStorage {
    map: std::rc::Rc<std::cell::RefCell<std::collections::HashMap<String, String>>>,
}

#[cfg(test)]
impl MemStorage {
    pub fn seeded(key: &str, value: &str) -> Self {
        let storage = Self::default();
        storage
            .map
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        storage
    }
}

#[cfg(test)]
impl Storage for MemStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.map.borrow().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.map
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
