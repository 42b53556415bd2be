//! Persistence seams for resolved codes.

use std::collections::BTreeMap;
use std::sync::Mutex;

use dqa_model::CodeReceived;

use crate::error::{Result, ValidateError};

/// Receives every resolved code after its count is incremented.
pub trait CodeStore: Send + Sync {
    /// Insert or replace the entry with the same id.
    fn create_or_update(&self, code: &CodeReceived) -> Result<()>;
}

/// Notified of every code resolution, for data-quality statistics.
pub trait QualityCollector: Send + Sync {
    fn code_received(&self, code: &CodeReceived);
}

/// Process-local [`CodeStore`].
#[derive(Debug, Default)]
pub struct InMemoryCodeStore {
    codes: Mutex<BTreeMap<u64, CodeReceived>>,
}

impl InMemoryCodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: u64) -> Option<CodeReceived> {
        self.codes.lock().ok()?.get(&id).cloned()
    }

    /// Snapshot of all stored codes in id order.
    pub fn codes(&self) -> Vec<CodeReceived> {
        self.codes
            .lock()
            .map(|codes| codes.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.codes.lock().map(|codes| codes.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CodeStore for InMemoryCodeStore {
    fn create_or_update(&self, code: &CodeReceived) -> Result<()> {
        let mut codes = self.codes.lock().map_err(|_| ValidateError::Store {
            profile: code.profile_id,
            message: "store lock poisoned".to_string(),
        })?;
        codes.insert(code.id, code.clone());
        Ok(())
    }
}
