//! Per-profile resolution of received codes.
//!
//! Each submitter profile owns a cache of every value it has sent, keyed by
//! `(table, context, value)`. A value seen for the first time is classified
//! from the master tables, or recorded as unrecognized with the table's
//! default canonical value. Every resolution increments the entry's count
//! and is written through to the [`CodeStore`].

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::trace;

use dqa_model::{CodeContext, CodeReceived, CodeStatus, CodeTable};
use dqa_standards::CodeMaster;

use crate::error::{Result, ValidateError};
use crate::store::{CodeStore, InMemoryCodeStore, QualityCollector};

/// Received values longer than this are truncated before lookup.
pub const MAX_VALUE_LEN: usize = 50;
/// Received labels longer than this are truncated.
pub const MAX_LABEL_LEN: usize = 30;

type CacheKey = (CodeTable, Option<CodeContext>, String);

#[derive(Debug, Default)]
struct ProfileCache {
    codes: BTreeMap<CacheKey, CodeReceived>,
}

/// Resolves received values into [`CodeReceived`] entries.
///
/// Resolution for one profile is serialized; distinct profiles resolve
/// concurrently.
pub struct CodeResolver {
    profiles: Mutex<BTreeMap<u64, Arc<Mutex<ProfileCache>>>>,
    next_id: AtomicU64,
    store: Arc<dyn CodeStore>,
    collector: Option<Arc<dyn QualityCollector>>,
}

impl Default for CodeResolver {
    fn default() -> Self {
        Self::new(Arc::new(InMemoryCodeStore::new()))
    }
}

impl CodeResolver {
    pub fn new(store: Arc<dyn CodeStore>) -> Self {
        Self {
            profiles: Mutex::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
            store,
            collector: None,
        }
    }

    pub fn with_collector(mut self, collector: Arc<dyn QualityCollector>) -> Self {
        self.collector = Some(collector);
        self
    }

    /// Resolve `value` from `table` for `profile_id`.
    pub fn resolve(
        &self,
        profile_id: u64,
        master: &CodeMaster,
        value: &str,
        label: &str,
        table: CodeTable,
        context: Option<&CodeContext>,
    ) -> Result<CodeReceived> {
        let value = truncate(value, MAX_VALUE_LEN);
        let cache = self.profile_cache(profile_id)?;
        let mut cache = cache
            .lock()
            .map_err(|_| ValidateError::LockPoisoned { profile: profile_id })?;

        let key = (table, context.cloned(), value.clone());
        let entry = cache.codes.entry(key).or_insert_with(|| {
            let id = self.next_id.fetch_add(1, Ordering::Relaxed);
            match master.get(table, &value, context) {
                Some(known) => CodeReceived {
                    id,
                    profile_id,
                    table,
                    received_value: value.clone(),
                    code_label: known.label.clone(),
                    code_value: known.code_value.clone(),
                    status: known.status,
                    context: context.cloned(),
                    received_count: 0,
                },
                None => {
                    trace!(profile_id, %table, value = %value, "unrecognized code");
                    CodeReceived {
                        id,
                        profile_id,
                        table,
                        received_value: value.clone(),
                        code_label: truncate(label, MAX_LABEL_LEN),
                        code_value: master.default_code_value(table).to_string(),
                        status: CodeStatus::Unrecognized,
                        context: context.cloned(),
                        received_count: 0,
                    }
                }
            }
        });
        entry.received_count += 1;

        self.store.create_or_update(entry)?;
        if let Some(collector) = &self.collector {
            collector.code_received(entry);
        }
        Ok(entry.clone())
    }

    /// Number of distinct codes cached for a profile.
    pub fn cached_len(&self, profile_id: u64) -> Result<usize> {
        let cache = self.profile_cache(profile_id)?;
        let cache = cache
            .lock()
            .map_err(|_| ValidateError::LockPoisoned { profile: profile_id })?;
        Ok(cache.codes.len())
    }

    fn profile_cache(&self, profile_id: u64) -> Result<Arc<Mutex<ProfileCache>>> {
        let mut profiles = self
            .profiles
            .lock()
            .map_err(|_| ValidateError::LockPoisoned { profile: profile_id })?;
        Ok(Arc::clone(profiles.entry(profile_id).or_default()))
    }
}

impl std::fmt::Debug for CodeResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeResolver")
            .field("next_id", &self.next_id)
            .field("collector", &self.collector.is_some())
            .finish_non_exhaustive()
    }
}

fn truncate(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dqa_standards::MasterCode;

    fn master() -> CodeMaster {
        let mut master = CodeMaster::new();
        master.insert_valid(CodeTable::PatientSex, "F", "Female");
        master.insert(MasterCode {
            table: CodeTable::AddressCountry,
            value: "US".to_string(),
            label: "United States".to_string(),
            code_value: "USA".to_string(),
            status: CodeStatus::Deprecated,
            context: None,
        });
        master.set_default(CodeTable::PatientSex, "U");
        master
    }

    #[test]
    fn repeated_resolution_returns_same_entry() {
        let resolver = CodeResolver::default();
        let master = master();
        let first = resolver
            .resolve(7, &master, "F", "", CodeTable::PatientSex, None)
            .expect("resolve");
        let second = resolver
            .resolve(7, &master, "F", "", CodeTable::PatientSex, None)
            .expect("resolve");
        assert_eq!(first.id, second.id);
        assert_eq!(first.received_count, 1);
        assert_eq!(second.received_count, 2);
        assert_eq!(second.status, CodeStatus::Valid);
        assert_eq!(resolver.cached_len(7).expect("len"), 1);
    }

    #[test]
    fn unknown_value_is_unrecognized_with_default() {
        let resolver = CodeResolver::default();
        let code = resolver
            .resolve(1, &master(), "X", "Other", CodeTable::PatientSex, None)
            .expect("resolve");
        assert_eq!(code.status, CodeStatus::Unrecognized);
        assert_eq!(code.code_value, "U");
        assert_eq!(code.code_label, "Other");
    }

    #[test]
    fn master_status_and_canonical_value_are_copied() {
        let resolver = CodeResolver::default();
        let code = resolver
            .resolve(1, &master(), "US", "", CodeTable::AddressCountry, None)
            .expect("resolve");
        assert_eq!(code.status, CodeStatus::Deprecated);
        assert_eq!(code.code_value, "USA");
    }

    #[test]
    fn profiles_do_not_share_entries() {
        let resolver = CodeResolver::default();
        let master = master();
        let a = resolver
            .resolve(1, &master, "F", "", CodeTable::PatientSex, None)
            .expect("resolve");
        let b = resolver
            .resolve(2, &master, "F", "", CodeTable::PatientSex, None)
            .expect("resolve");
        assert_ne!(a.id, b.id);
        assert_eq!(b.received_count, 1);
        assert_eq!(b.profile_id, 2);
    }

    #[test]
    fn long_values_and_labels_are_truncated() {
        let resolver = CodeResolver::default();
        let value = "V".repeat(80);
        let label = "L".repeat(80);
        let code = resolver
            .resolve(1, &master(), &value, &label, CodeTable::PatientRace, None)
            .expect("resolve");
        assert_eq!(code.received_value.len(), MAX_VALUE_LEN);
        assert_eq!(code.code_label.len(), MAX_LABEL_LEN);
    }

    #[test]
    fn resolutions_are_written_to_the_store() {
        let store = Arc::new(InMemoryCodeStore::new());
        let resolver = CodeResolver::new(store.clone());
        let code = resolver
            .resolve(1, &master(), "F", "", CodeTable::PatientSex, None)
            .expect("resolve");
        resolver
            .resolve(1, &master(), "F", "", CodeTable::PatientSex, None)
            .expect("resolve");
        let stored = store.get(code.id).expect("stored");
        assert_eq!(stored.received_count, 2);
        assert_eq!(store.len(), 1);
    }
}
