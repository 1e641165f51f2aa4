use crate::domain::ports::TokenProvider;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

pub const TOKEN_KEY: &str = "token";

/// 行程內共用的 key/value session 儲存區
#[derive(Debug, Clone, Default)]
pub struct SessionStorage {
    items: Arc<RwLock<HashMap<String, String>>>,
}

impl SessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_item(&self, key: &str) -> Option<String> {
        let items = self.items.read().unwrap_or_else(PoisonError::into_inner);
        items.get(key).cloned()
    }

    pub fn set_item(&self, key: impl Into<String>, value: impl Into<String>) {
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        items.insert(key.into(), value.into());
    }

    pub fn remove_item(&self, key: &str) {
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        items.remove(key);
    }

    pub fn clear(&self) {
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        items.clear();
    }
}

/// 從 `SessionStorage` 讀取 token 的唯讀視圖
#[derive(Debug, Clone)]
pub struct SessionToken {
    storage: SessionStorage,
    key: String,
}

impl SessionToken {
    pub fn new(storage: SessionStorage) -> Self {
        Self::with_key(storage, TOKEN_KEY)
    }

    pub fn with_key(storage: SessionStorage, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }
}

impl TokenProvider for SessionToken {
    fn token(&self) -> Option<String> {
        self.storage.get_item(&self.key)
    }
}
