//! The reference-data store consumed by the validator.

use dqa_model::{CodeStatus, CodeTable};

use crate::codes::{CodeMaster, MasterCode};
use crate::error::Result;
use crate::known_names::KnownNames;
use crate::loaders::load_reference_data;
use crate::paths::standards_root;
use crate::vaccines::VaccineTables;

/// Code tables, vaccine tables and known names, fully loaded.
///
/// Shared read-only across validation passes.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    codes: CodeMaster,
    vaccines: VaccineTables,
    known_names: KnownNames,
}

impl ReferenceData {
    /// Assemble reference data, registering every loaded vaccine, procedure,
    /// manufacturer and product code as valid unless the code tables already
    /// classify it.
    pub fn new(mut codes: CodeMaster, vaccines: VaccineTables, known_names: KnownNames) -> Self {
        for cvx in vaccines.cvx_records() {
            codes.insert_if_absent(valid(CodeTable::VaccineCvx, &cvx.cvx_code, &cvx.label));
        }
        for cpt in vaccines.cpt_records() {
            codes.insert_if_absent(valid(CodeTable::VaccineCpt, &cpt.cpt_code, &cpt.label));
        }
        for mvx in vaccines.mvx_records() {
            codes.insert_if_absent(valid(CodeTable::VaccineMvx, &mvx.mvx_code, &mvx.label));
        }
        for product in vaccines.product_records() {
            codes.insert_if_absent(valid(
                CodeTable::VaccineProduct,
                &product.product_code(),
                &product.label,
            ));
        }
        Self {
            codes,
            vaccines,
            known_names,
        }
    }

    /// Load the reference set shipped under the standards directory.
    pub fn load_default() -> Result<Self> {
        load_reference_data(&standards_root())
    }

    pub fn codes(&self) -> &CodeMaster {
        &self.codes
    }

    pub fn vaccines(&self) -> &VaccineTables {
        &self.vaccines
    }

    pub fn known_names(&self) -> &KnownNames {
        &self.known_names
    }
}

fn valid(table: CodeTable, value: &str, label: &str) -> MasterCode {
    MasterCode {
        table,
        value: value.to_string(),
        label: label.to_string(),
        code_value: value.to_string(),
        status: CodeStatus::Valid,
        context: None,
    }
}
