//! CSV loaders for the reference directory.
//!
//! Layout of a reference directory:
//!
//! | File | Columns |
//! |------|---------|
//! | `code_tables.csv` | `table,default_code_value` |
//! | `codes.csv` | `table,value,label,code_value,status,context` |
//! | `vaccine_cvx.csv` | `cvx_code,label,concept_type,valid_start,valid_end,use_start,use_end,use_month_start,use_month_end` |
//! | `vaccine_cpt.csv` | `cpt_code,label,cvx_code,valid_start,valid_end,use_start,use_end` |
//! | `vaccine_mvx.csv` | `mvx_code,label,valid_start,valid_end,use_start,use_end` |
//! | `vaccine_product.csv` | `label,cvx_code,mvx_code,valid_start,valid_end,use_start,use_end` |
//! | `vaccine_group.csv` | `group_code,cvx_code` |
//! | `known_names.csv` | `kind,first,middle,last,birth_date` |
//!
//! Every file is optional; a missing file loads as an empty table.

use std::path::Path;

use tracing::{debug, info};

use dqa_model::{
    CodeContext, CodeStatus, CodeTable, ConceptType, DateWindow, KnownName, KnownNameKind,
    VaccineCpt, VaccineCvx, VaccineCvxGroup, VaccineMvx, VaccineProduct,
};

use crate::codes::{CodeMaster, MasterCode};
use crate::csv_utils::{
    Row, get_date, get_field, get_i32, get_optional, get_optional_date, read_csv_rows,
};
use crate::error::{Result, StandardsError};
use crate::known_names::KnownNames;
use crate::reference::ReferenceData;
use crate::vaccines::VaccineTables;

/// Load every reference file under `dir`.
pub fn load_reference_data(dir: &Path) -> Result<ReferenceData> {
    if !dir.is_dir() {
        return Err(StandardsError::MissingDirectory {
            path: dir.to_path_buf(),
        });
    }
    let mut codes = CodeMaster::new();
    load_code_tables(&dir.join("code_tables.csv"), &mut codes)?;
    load_codes(&dir.join("codes.csv"), &mut codes)?;

    let mut vaccines = VaccineTables::new();
    load_cvx(&dir.join("vaccine_cvx.csv"), &mut vaccines)?;
    load_cpt(&dir.join("vaccine_cpt.csv"), &mut vaccines)?;
    load_mvx(&dir.join("vaccine_mvx.csv"), &mut vaccines)?;
    load_products(&dir.join("vaccine_product.csv"), &mut vaccines)?;
    load_groups(&dir.join("vaccine_group.csv"), &mut vaccines)?;

    let mut known_names = KnownNames::new();
    load_known_names(&dir.join("known_names.csv"), &mut known_names)?;

    let reference = ReferenceData::new(codes, vaccines, known_names);
    info!(
        dir = %dir.display(),
        codes = reference.codes().len(),
        known_names = reference.known_names().len(),
        "loaded reference data"
    );
    Ok(reference)
}

fn rows_if_present(path: &Path) -> Result<Vec<(usize, Row)>> {
    if !path.exists() {
        debug!(path = %path.display(), "reference file not present");
        return Ok(Vec::new());
    }
    read_csv_rows(path)
}

fn table(path: &Path, line: usize, row: &Row) -> Result<CodeTable> {
    CodeTable::parse(&get_field(row, "table"))
        .map_err(|e| StandardsError::record(path, line, e.to_string()))
}

fn windows(path: &Path, line: usize, row: &Row) -> Result<(DateWindow, DateWindow)> {
    let valid = DateWindow::new(
        get_date(path, line, row, "valid_start")?,
        get_date(path, line, row, "valid_end")?,
    );
    let usage = DateWindow::new(
        get_date(path, line, row, "use_start")?,
        get_date(path, line, row, "use_end")?,
    );
    Ok((valid, usage))
}

pub fn load_code_tables(path: &Path, codes: &mut CodeMaster) -> Result<()> {
    for (line, row) in rows_if_present(path)? {
        let table = table(path, line, &row)?;
        codes.set_default(table, get_field(&row, "default_code_value"));
    }
    Ok(())
}

pub fn load_codes(path: &Path, codes: &mut CodeMaster) -> Result<()> {
    for (line, row) in rows_if_present(path)? {
        let table = table(path, line, &row)?;
        let value = get_field(&row, "value");
        if value.is_empty() {
            return Err(StandardsError::record(path, line, "empty code value"));
        }
        let status = match get_optional(&row, "status") {
            Some(raw) => CodeStatus::parse(&raw)
                .map_err(|e| StandardsError::record(path, line, e.to_string()))?,
            None => CodeStatus::Valid,
        };
        let context = get_optional(&row, "context")
            .map(|raw| CodeContext::parse(&raw))
            .transpose()
            .map_err(|e| StandardsError::record(path, line, e.to_string()))?;
        let code_value = get_optional(&row, "code_value").unwrap_or_else(|| value.clone());
        codes.insert(MasterCode {
            table,
            label: get_field(&row, "label"),
            value,
            code_value,
            status,
            context,
        });
    }
    Ok(())
}

pub fn load_cvx(path: &Path, vaccines: &mut VaccineTables) -> Result<()> {
    for (line, row) in rows_if_present(path)? {
        let (valid, usage) = windows(path, line, &row)?;
        let concept_raw = get_field(&row, "concept_type");
        let concept_type = if concept_raw.is_empty() {
            ConceptType::Vaccine
        } else {
            ConceptType::parse(&concept_raw).ok_or_else(|| {
                StandardsError::record(path, line, format!("unknown concept type `{concept_raw}`"))
            })?
        };
        vaccines.add_cvx(VaccineCvx {
            cvx_code: get_field(&row, "cvx_code"),
            label: get_field(&row, "label"),
            concept_type,
            valid,
            usage,
            use_month_start: get_i32(path, line, &row, "use_month_start")?,
            use_month_end: get_i32(path, line, &row, "use_month_end")?,
        });
    }
    Ok(())
}

pub fn load_cpt(path: &Path, vaccines: &mut VaccineTables) -> Result<()> {
    for (line, row) in rows_if_present(path)? {
        let (valid, usage) = windows(path, line, &row)?;
        vaccines.add_cpt(VaccineCpt {
            cpt_code: get_field(&row, "cpt_code"),
            label: get_field(&row, "label"),
            cvx_code: get_optional(&row, "cvx_code"),
            valid,
            usage,
        });
    }
    Ok(())
}

pub fn load_mvx(path: &Path, vaccines: &mut VaccineTables) -> Result<()> {
    for (line, row) in rows_if_present(path)? {
        let (valid, usage) = windows(path, line, &row)?;
        vaccines.add_mvx(VaccineMvx {
            mvx_code: get_field(&row, "mvx_code"),
            label: get_field(&row, "label"),
            valid,
            usage,
        });
    }
    Ok(())
}

pub fn load_products(path: &Path, vaccines: &mut VaccineTables) -> Result<()> {
    for (line, row) in rows_if_present(path)? {
        let (valid, usage) = windows(path, line, &row)?;
        vaccines.add_product(VaccineProduct {
            label: get_field(&row, "label"),
            cvx_code: get_field(&row, "cvx_code"),
            mvx_code: get_field(&row, "mvx_code"),
            valid,
            usage,
        });
    }
    Ok(())
}

pub fn load_groups(path: &Path, vaccines: &mut VaccineTables) -> Result<()> {
    for (_, row) in rows_if_present(path)? {
        vaccines.add_group(VaccineCvxGroup {
            cvx_code: get_field(&row, "cvx_code"),
            group_code: get_field(&row, "group_code"),
        });
    }
    Ok(())
}

pub fn load_known_names(path: &Path, names: &mut KnownNames) -> Result<()> {
    for (line, row) in rows_if_present(path)? {
        let kind_raw = get_field(&row, "kind");
        let kind = KnownNameKind::parse(&kind_raw).ok_or_else(|| {
            StandardsError::record(path, line, format!("unknown name kind `{kind_raw}`"))
        })?;
        names.add(KnownName {
            kind,
            first: get_field(&row, "first"),
            middle: get_field(&row, "middle"),
            last: get_field(&row, "last"),
            birth_date: get_optional_date(path, line, &row, "birth_date")?,
        });
    }
    Ok(())
}
