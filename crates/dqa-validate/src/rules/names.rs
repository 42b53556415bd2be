//! Person-name cleanup and character rules.

use dqa_model::Name;

const VALID_SUFFIXES: &[&str] = &["SR", "JR", "II", "III", "IV"];

/// Clean up a received name in place.
///
/// Steps 1 to 5 run in a fixed order and repeat until nothing changes.
/// Step 6 runs once afterwards, so a middle name with more than one period
/// loses one tail per call:
///
/// 1. digit `0` becomes letter `o`
/// 2. commas become spaces
/// 3. with no middle name, the trailing token of the first name moves to the
///    middle name (a trailing `JR` is left for step 5)
/// 4. text from the first `(`, `{` or `[` onwards is dropped
/// 5. a trailing ` JR` on the first name moves to the suffix as `Jr`
/// 6. the middle name is cut at its last `.`
pub fn normalize_name(name: &mut Name) {
    loop {
        let before = name.clone();
        normalize_pass(name);
        if *name == before {
            break;
        }
    }

    if let Some(pos) = name.middle.rfind('.')
        && pos > 0
    {
        name.middle = name.middle[..pos].trim_end().to_string();
    }
}

fn normalize_pass(name: &mut Name) {
    for part in parts(name) {
        *part = part.replace('0', "o").replace(',', " ").trim().to_string();
    }

    if name.middle.is_empty()
        && let Some(pos) = name.first.rfind(' ')
        && pos > 0
    {
        let token = name.first[pos..].trim();
        if !token.is_empty() && !token.eq_ignore_ascii_case("JR") {
            name.middle = token.to_string();
            name.first = name.first[..pos].trim_end().to_string();
        }
    }

    for part in parts(name) {
        for bracket in ['(', '{', '['] {
            if let Some(pos) = part.find(bracket)
                && pos > 0
            {
                *part = part[..pos].trim().to_string();
            }
        }
    }

    while let Some(rest) = strip_jr(&name.first) {
        name.first = rest.trim_end().to_string();
        name.suffix = "Jr".to_string();
    }
}

fn strip_jr(first: &str) -> Option<&str> {
    let cut = first.len().checked_sub(3).filter(|cut| *cut > 0)?;
    let tail = first.get(cut..)?;
    tail.eq_ignore_ascii_case(" JR").then(|| &first[..cut])
}

fn parts(name: &mut Name) -> [&mut String; 4] {
    [
        &mut name.first,
        &mut name.middle,
        &mut name.last,
        &mut name.suffix,
    ]
}

/// Canonical generational suffix, or empty when the suffix is not one of
/// `SR`, `JR`, `II`, `III` or `IV`.
pub fn canonical_suffix(suffix: &str) -> String {
    let upper = suffix.trim().to_uppercase();
    let canonical = match upper.as_str() {
        "11" | "2ND" => "II",
        "111" | "3RD" => "III",
        "4TH" => "IV",
        other => other,
    };
    if VALID_SUFFIXES.contains(&canonical) {
        if canonical == upper {
            suffix.trim().to_string()
        } else {
            canonical.to_string()
        }
    } else {
        String::new()
    }
}

/// Letters, space, hyphen, apostrophe and period only.
pub fn valid_name_chars(value: &str) -> bool {
    value
        .chars()
        .all(|c| c.is_ascii_alphabetic() || matches!(c, '-' | '\'' | ' ' | '.'))
}

/// A first name like `Mary J` probably carries the middle initial.
pub fn may_include_middle_initial(name: &Name) -> bool {
    let first = &name.first;
    first.len() > 3
        && name.middle.is_empty()
        && first.rfind(' ') == Some(first.len() - 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(first: &str, middle: &str, last: &str) -> Name {
        Name {
            first: first.to_string(),
            middle: middle.to_string(),
            last: last.to_string(),
            ..Name::default()
        }
    }

    #[test]
    fn moves_trailing_token_to_middle() {
        let mut n = name("Mary Ann", "", "Smith");
        normalize_name(&mut n);
        assert_eq!(n.first, "Mary");
        assert_eq!(n.middle, "Ann");
    }

    #[test]
    fn moves_trailing_jr_to_suffix() {
        let mut n = name("Robert JR", "", "Smith");
        normalize_name(&mut n);
        assert_eq!(n.first, "Robert");
        assert_eq!(n.suffix, "Jr");
        assert_eq!(n.middle, "");
    }

    #[test]
    fn strips_brackets_commas_and_zeroes() {
        let mut n = name("J0hn (Johnny)", "Q.", "Smith,");
        normalize_name(&mut n);
        assert_eq!(n.first, "John");
        assert_eq!(n.middle, "Q");
        assert_eq!(n.last, "Smith");
    }

    #[test]
    fn middle_name_loses_only_the_last_period_tail() {
        let mut n = name("Mary", "J.R.K", "Smith");
        normalize_name(&mut n);
        assert_eq!(n.middle, "J.R");
    }

    #[test]
    fn suffixes_are_canonicalized() {
        assert_eq!(canonical_suffix("2ND"), "II");
        assert_eq!(canonical_suffix("11"), "II");
        assert_eq!(canonical_suffix("3rd"), "III");
        assert_eq!(canonical_suffix("4th"), "IV");
        assert_eq!(canonical_suffix("Jr"), "Jr");
        assert_eq!(canonical_suffix("Esq"), "");
    }

    #[test]
    fn name_characters() {
        assert!(valid_name_chars("O'Brien-Smith Jr."));
        assert!(!valid_name_chars("R2D2"));
        assert!(!valid_name_chars("José"));
    }

    #[test]
    fn detects_middle_initial_in_first_name() {
        assert!(may_include_middle_initial(&name("Mary J", "", "Smith")));
        assert!(!may_include_middle_initial(&name("Mary J", "Jane", "Smith")));
        assert!(!may_include_middle_initial(&name("Mary", "", "Smith")));
    }
}
