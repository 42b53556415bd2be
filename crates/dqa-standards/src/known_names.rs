//! Known suspicious names (placeholders, test patients, junk values).

use std::collections::BTreeMap;

use chrono::NaiveDate;

use dqa_model::{KnownName, KnownNameKind, Name};

#[derive(Debug, Clone, Default)]
pub struct KnownNames {
    names: BTreeMap<KnownNameKind, Vec<KnownName>>,
}

impl KnownNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: KnownName) {
        self.names.entry(name.kind).or_default().push(name);
    }

    pub fn list(&self, kind: KnownNameKind) -> &[KnownName] {
        self.names.get(&kind).map_or(&[], Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.names.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when any entry of `kind` matches the patient.
    ///
    /// Every non-empty part of the entry must equal the patient's part,
    /// ignoring case; a birth date on the entry must match exactly.
    pub fn matches(&self, kind: KnownNameKind, name: &Name, birth_date: Option<NaiveDate>) -> bool {
        self.list(kind).iter().any(|known| {
            let parts = [
                (&known.first, &name.first),
                (&known.middle, &name.middle),
                (&known.last, &name.last),
            ];
            if parts.iter().all(|(known, _)| known.is_empty()) {
                return false;
            }
            let names_match = parts
                .iter()
                .all(|(known, actual)| known.is_empty() || known.eq_ignore_ascii_case(actual));
            let birth_matches = known
                .birth_date
                .is_none_or(|known_birth| Some(known_birth) == birth_date);
            names_match && birth_matches
        })
    }

    /// Case-insensitive match of a single-part entry.
    pub fn matches_first(&self, kind: KnownNameKind, value: &str) -> bool {
        self.list(kind)
            .iter()
            .any(|known| known.only_first() && known.first.eq_ignore_ascii_case(value))
    }

    pub fn matches_middle(&self, kind: KnownNameKind, value: &str) -> bool {
        self.list(kind)
            .iter()
            .any(|known| known.only_middle() && known.middle.eq_ignore_ascii_case(value))
    }

    pub fn matches_last(&self, kind: KnownNameKind, value: &str) -> bool {
        self.list(kind)
            .iter()
            .any(|known| known.only_last() && known.last.eq_ignore_ascii_case(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known(kind: KnownNameKind, first: &str, last: &str) -> KnownName {
        KnownName {
            kind,
            first: first.to_string(),
            middle: String::new(),
            last: last.to_string(),
            birth_date: None,
        }
    }

    #[test]
    fn matches_on_non_empty_parts() {
        let mut names = KnownNames::new();
        names.add(known(KnownNameKind::UnnamedNewborn, "BABY", ""));
        names.add(known(KnownNameKind::TestPatient, "Test", "Patient"));
        let baby = Name {
            first: "Baby".to_string(),
            last: "Smith".to_string(),
            ..Name::default()
        };
        assert!(names.matches(KnownNameKind::UnnamedNewborn, &baby, None));
        assert!(!names.matches(KnownNameKind::TestPatient, &baby, None));
    }

    #[test]
    fn single_part_matches() {
        let mut names = KnownNames::new();
        names.add(known(KnownNameKind::InvalidName, "", "UNKNOWN"));
        assert!(names.matches_last(KnownNameKind::InvalidName, "unknown"));
        assert!(!names.matches_first(KnownNameKind::InvalidName, "unknown"));
    }
}
