use crate::domain::PhoneValue;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DedupeOutcome {
    /// Indices of surviving rows, ascending.
    pub retained: Vec<usize>,
    pub duplicates_removed: usize,
}

/// Keeps the first row for each canonical number. Invalid rows have no key
/// and are always retained.
pub fn dedupe(values: &[PhoneValue]) -> DedupeOutcome {
    let mut seen: HashSet<&str> = HashSet::with_capacity(values.len());
    let mut retained = Vec::with_capacity(values.len());
    let mut duplicates_removed = 0;

    for (index, value) in values.iter().enumerate() {
        match value.canonical.as_deref() {
            Some(canonical) if !seen.insert(canonical) => duplicates_removed += 1,
            _ => retained.push(index),
        }
    }

    DedupeOutcome {
        retained,
        duplicates_removed,
    }
}

#[cfg(test)]
mod tests {
    use super::dedupe;
    use crate::domain::normalize_phone;

    #[test]
    fn keeps_first_occurrence_in_order() {
        let values: Vec<_> = ["0723456789", "0744111222", "+40723456789", "744111222"]
            .into_iter()
            .map(normalize_phone)
            .collect();
        let outcome = dedupe(&values);
        assert_eq!(outcome.retained, vec![0, 1]);
        assert_eq!(outcome.duplicates_removed, 2);
    }

    #[test]
    fn invalid_rows_are_never_merged() {
        let values: Vec<_> = ["abc", "abc", "", "0723456789"]
            .into_iter()
            .map(normalize_phone)
            .collect();
        let outcome = dedupe(&values);
        assert_eq!(outcome.retained, vec![0, 1, 2, 3]);
        assert_eq!(outcome.duplicates_removed, 0);
    }
}
