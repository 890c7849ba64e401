use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::SessionStore;

/// In-process session store. Tracks write calls for assertions.
#[derive(Default)]
pub struct MemorySessionStore {
    data: Mutex<HashMap<String, String>>,
    set_calls: AtomicUsize,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_count(&self) -> usize {
        self.set_calls.load(Ordering::Relaxed)
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.data
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.set_calls.fetch_add(1, Ordering::Relaxed);
        self.data
            .lock()
            .map_err(|_| anyhow::anyhow!("session store poisoned"))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
