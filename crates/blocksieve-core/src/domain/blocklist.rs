use crate::domain::phone::PhoneNormalizer;
use std::collections::HashSet;

/// Canonical numbers to exclude. Built once per job and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlocklistSet {
    numbers: HashSet<String>,
    invalid_entries: usize,
}

impl BlocklistSet {
    /// Normalizes every raw entry; entries that do not normalize are counted
    /// and dropped.
    pub fn from_raw<I, S>(entries: I, normalizer: &PhoneNormalizer) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut numbers = HashSet::new();
        let mut invalid_entries = 0;
        for entry in entries {
            match normalizer.canonicalize(entry.as_ref()) {
                Some(canonical) => {
                    numbers.insert(canonical);
                }
                None => invalid_entries += 1,
            }
        }
        Self {
            numbers,
            invalid_entries,
        }
    }

    pub fn contains(&self, canonical: &str) -> bool {
        self.numbers.contains(canonical)
    }

    /// Count of distinct canonical entries.
    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    pub fn invalid_entries(&self) -> usize {
        self.invalid_entries
    }
}
