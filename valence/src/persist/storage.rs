use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("storage is unavailable")]
    Unavailable,
    #[error("storage quota exceeded")]
    QuotaExceeded,
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl StorageError {
    pub fn code(&self) -> &'static str {
        match self {
            StorageError::Unavailable => "unavailable",
            StorageError::QuotaExceeded => "quota_exceeded",
            StorageError::Backend(_) => "backend",
        }
    }
}

/// Durable string key-value medium (browser `localStorage` or equivalent).
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Default)]
struct MemoryInner {
    items: HashMap<String, String>,
    disabled: bool,
    quota_bytes: Option<usize>,
    writes: HashMap<String, usize>,
}

impl MemoryInner {
    fn used_bytes_with(&self, key: &str, value: &str) -> usize {
        self.items
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum::<usize>()
            + key.len()
            + value.len()
    }
}

/// In-process store. Clones share contents, so a test can keep a handle
/// after passing one to the canvas. Can be switched off or given a byte
/// quota to exercise the failure paths.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Rc<RefCell<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self { MemoryStore::default() }

    pub fn with_quota(bytes: usize) -> Self {
        let s = MemoryStore::default();
        s.set_quota(Some(bytes));
        s
    }

    pub fn set_disabled(&self, disabled: bool) { self.inner.borrow_mut().disabled = disabled }

    pub fn set_quota(&self, bytes: Option<usize>) { self.inner.borrow_mut().quota_bytes = bytes }

    /// Raw value regardless of the disabled switch.
    pub fn raw(&self, key: &str) -> Option<String> { self.inner.borrow().items.get(key).cloned() }

    pub fn insert_raw(&self, key: &str, value: &str) {
        self.inner.borrow_mut().items.insert(key.to_string(), value.to_string());
    }

    /// Successful `set_item` calls for `key`.
    pub fn writes_to(&self, key: &str) -> usize { self.inner.borrow().writes.get(key).copied().unwrap_or(0) }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let inner = self.inner.borrow();
        if inner.disabled {
            return Err(StorageError::Unavailable);
        }
        Ok(inner.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut inner = self.inner.borrow_mut();
        if inner.disabled {
            return Err(StorageError::Unavailable);
        }
        if let Some(q) = inner.quota_bytes {
            if inner.used_bytes_with(key, value) > q {
                return Err(StorageError::QuotaExceeded);
            }
        }
        inner.items.insert(key.to_string(), value.to_string());
        *inner.writes.entry(key.to_string()).or_insert(0) += 1;
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        let mut inner = self.inner.borrow_mut();
        if inner.disabled {
            return Err(StorageError::Unavailable);
        }
        inner.items.remove(key);
        Ok(())
    }
}
