//! Read-only vaccine reference tables.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use dqa_model::{VaccineCpt, VaccineCvx, VaccineCvxGroup, VaccineMvx, VaccineProduct};

/// CVX, CPT, MVX, product and group tables.
///
/// Loaded once before validation starts; lookups never mutate.
#[derive(Debug, Clone, Default)]
pub struct VaccineTables {
    cvx: BTreeMap<u32, VaccineCvx>,
    cpt: BTreeMap<String, Vec<VaccineCpt>>,
    mvx: BTreeMap<String, VaccineMvx>,
    products: BTreeMap<(String, String), Vec<VaccineProduct>>,
    groups: BTreeMap<String, BTreeSet<String>>,
}

/// CVX codes are compared numerically so `"8"` and `"08"` agree.
fn cvx_id(code: &str) -> Option<u32> {
    code.trim().parse::<u32>().ok()
}

impl VaccineTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_cvx(&mut self, cvx: VaccineCvx) {
        if let Some(id) = cvx_id(&cvx.cvx_code) {
            self.cvx.insert(id, cvx);
        }
    }

    pub fn add_cpt(&mut self, cpt: VaccineCpt) {
        self.cpt.entry(cpt.cpt_code.clone()).or_default().push(cpt);
    }

    pub fn add_mvx(&mut self, mvx: VaccineMvx) {
        self.mvx.insert(mvx.mvx_code.clone(), mvx);
    }

    pub fn add_product(&mut self, product: VaccineProduct) {
        let key = (normalize_cvx(&product.cvx_code), product.mvx_code.clone());
        self.products.entry(key).or_default().push(product);
    }

    pub fn add_group(&mut self, membership: VaccineCvxGroup) {
        self.groups
            .entry(normalize_cvx(&membership.cvx_code))
            .or_default()
            .insert(membership.group_code);
    }

    /// Vaccine by CVX code. Non-numeric codes resolve to nothing.
    pub fn cvx(&self, cvx_code: &str) -> Option<&VaccineCvx> {
        cvx_id(cvx_code).and_then(|id| self.cvx.get(&id))
    }

    /// CPT record whose validity window contains `as_of`.
    pub fn cpt(&self, cpt_code: &str, as_of: Option<NaiveDate>) -> Option<&VaccineCpt> {
        let as_of = as_of?;
        self.cpt
            .get(cpt_code)?
            .iter()
            .find(|cpt| cpt.valid.contains(as_of))
    }

    pub fn mvx(&self, mvx_code: &str) -> Option<&VaccineMvx> {
        self.mvx.get(mvx_code)
    }

    /// All candidate products for a vaccine/manufacturer pair.
    pub fn products(&self, cvx_code: &str, mvx_code: &str) -> &[VaccineProduct] {
        self.products
            .get(&(normalize_cvx(cvx_code), mvx_code.to_string()))
            .map_or(&[], Vec::as_slice)
    }

    /// Vaccine groups a CVX code belongs to.
    pub fn groups(&self, cvx_code: &str) -> Option<&BTreeSet<String>> {
        self.groups.get(&normalize_cvx(cvx_code))
    }

    /// Two CVX codes are group-consistent when they name the same vaccine or
    /// share a vaccine group.
    pub fn group_match(&self, cvx_code: &str, other_cvx_code: &str) -> bool {
        if let (Some(a), Some(b)) = (cvx_id(cvx_code), cvx_id(other_cvx_code))
            && a == b
        {
            return true;
        }
        match (self.groups(cvx_code), self.groups(other_cvx_code)) {
            (Some(a), Some(b)) => !a.is_disjoint(b),
            _ => false,
        }
    }

    pub fn cvx_records(&self) -> impl Iterator<Item = &VaccineCvx> {
        self.cvx.values()
    }

    pub fn cpt_records(&self) -> impl Iterator<Item = &VaccineCpt> {
        self.cpt.values().flatten()
    }

    pub fn mvx_records(&self) -> impl Iterator<Item = &VaccineMvx> {
        self.mvx.values()
    }

    pub fn product_records(&self) -> impl Iterator<Item = &VaccineProduct> {
        self.products.values().flatten()
    }
}

fn normalize_cvx(code: &str) -> String {
    cvx_id(code).map_or_else(|| code.trim().to_string(), |id| id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dqa_model::{ConceptType, DateWindow};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn window(start: i32, end: i32) -> DateWindow {
        DateWindow::new(date(start, 1, 1), date(end, 1, 1))
    }

    fn cvx(code: &str) -> VaccineCvx {
        VaccineCvx {
            cvx_code: code.to_string(),
            label: format!("vaccine {code}"),
            concept_type: ConceptType::Vaccine,
            valid: window(1990, 2100),
            usage: window(1990, 2100),
            use_month_start: 0,
            use_month_end: 1200,
        }
    }

    #[test]
    fn cvx_lookup_is_numeric() {
        let mut tables = VaccineTables::new();
        tables.add_cvx(cvx("08"));
        assert!(tables.cvx("8").is_some());
        assert!(tables.cvx("08").is_some());
        assert!(tables.cvx("HEPB").is_none());
    }

    #[test]
    fn cpt_lookup_selects_window() {
        let mut tables = VaccineTables::new();
        tables.add_cpt(VaccineCpt {
            cpt_code: "90744".to_string(),
            label: "HepB".to_string(),
            cvx_code: Some("08".to_string()),
            valid: window(2000, 2010),
            usage: window(2000, 2005),
        });
        assert!(tables.cpt("90744", Some(date(2004, 5, 1))).is_some());
        assert!(tables.cpt("90744", Some(date(2010, 1, 1))).is_none());
        assert!(tables.cpt("90744", None).is_none());
    }

    #[test]
    fn group_match_by_identity_or_group() {
        let mut tables = VaccineTables::new();
        for (cvx, group) in [("08", "HepB"), ("43", "HepB"), ("03", "MMR")] {
            tables.add_group(VaccineCvxGroup {
                cvx_code: cvx.to_string(),
                group_code: group.to_string(),
            });
        }
        assert!(tables.group_match("8", "08"));
        assert!(tables.group_match("08", "43"));
        assert!(!tables.group_match("08", "03"));
        assert!(!tables.group_match("21", "03"));
    }
}
