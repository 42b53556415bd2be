//! Master code tables: the known values of every code table.

use std::collections::BTreeMap;

use dqa_model::{CodeContext, CodeStatus, CodeTable};

/// A known value of a code table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterCode {
    pub table: CodeTable,
    pub value: String,
    pub label: String,
    /// Canonical value substituted when the code is valid.
    pub code_value: String,
    pub status: CodeStatus,
    pub context: Option<CodeContext>,
}

type CodeKey = (CodeTable, Option<CodeContext>, String);

/// Known codes keyed by `(table, context, value)`.
#[derive(Debug, Clone, Default)]
pub struct CodeMaster {
    codes: BTreeMap<CodeKey, MasterCode>,
    defaults: BTreeMap<CodeTable, String>,
}

impl CodeMaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a code. An existing entry with the same key is replaced.
    pub fn insert(&mut self, code: MasterCode) {
        let key = (code.table, code.context.clone(), code.value.clone());
        self.codes.insert(key, code);
    }

    /// Add a code only if none is registered under its key.
    pub fn insert_if_absent(&mut self, code: MasterCode) {
        let key = (code.table, code.context.clone(), code.value.clone());
        self.codes.entry(key).or_insert(code);
    }

    /// Add a valid code whose canonical value equals the received value.
    pub fn insert_valid(&mut self, table: CodeTable, value: &str, label: &str) {
        self.insert(MasterCode {
            table,
            value: value.to_string(),
            label: label.to_string(),
            code_value: value.to_string(),
            status: CodeStatus::Valid,
            context: None,
        });
    }

    pub fn set_default(&mut self, table: CodeTable, code_value: impl Into<String>) {
        self.defaults.insert(table, code_value.into());
    }

    /// Canonical value assigned to unrecognized codes of a table.
    pub fn default_code_value(&self, table: CodeTable) -> &str {
        self.defaults.get(&table).map_or("", String::as_str)
    }

    pub fn get(
        &self,
        table: CodeTable,
        value: &str,
        context: Option<&CodeContext>,
    ) -> Option<&MasterCode> {
        self.codes
            .get(&(table, context.cloned(), value.to_string()))
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Codes of one table in key order.
    pub fn table(&self, table: CodeTable) -> impl Iterator<Item = &MasterCode> {
        self.codes
            .values()
            .filter(move |code| code.table == table)
    }
}
