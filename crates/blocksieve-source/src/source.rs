use crate::Result;
use blocksieve_core::{BlocklistSet, PhoneNormalizer};
use tracing::{debug, warn};

pub trait BlocklistSource: Send + Sync {
    fn source_name(&self) -> &'static str;

    /// Raw entries as delivered by the source, before normalization.
    fn fetch_entries(&self) -> Result<Vec<String>>;

    fn fetch(&self, normalizer: &PhoneNormalizer) -> Result<BlocklistSet> {
        let entries = self.fetch_entries()?;
        let set = BlocklistSet::from_raw(&entries, normalizer);
        if set.invalid_entries() > 0 {
            warn!(
                source = self.source_name(),
                skipped = set.invalid_entries(),
                "blocklist entries could not be normalized"
            );
        }
        debug!(
            source = self.source_name(),
            entries = entries.len(),
            distinct = set.len(),
            "blocklist loaded"
        );
        Ok(set)
    }
}

/// Fixed in-memory entries.
#[derive(Debug, Clone, Default)]
pub struct StaticBlocklist {
    entries: Vec<String>,
}

impl StaticBlocklist {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(Into::into).collect(),
        }
    }
}

impl BlocklistSource for StaticBlocklist {
    fn source_name(&self) -> &'static str {
        "static"
    }

    fn fetch_entries(&self) -> Result<Vec<String>> {
        Ok(self.entries.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::{BlocklistSource, StaticBlocklist};
    use blocksieve_core::PhoneNormalizer;

    #[test]
    fn fetch_normalizes_entries() {
        let source = StaticBlocklist::new(["40723456789", "0723456789", "n/a"]);
        let set = source.fetch(&PhoneNormalizer::default()).expect("fetch");
        assert_eq!(set.len(), 1);
        assert_eq!(set.invalid_entries(), 1);
        assert!(set.contains("+40723456789"));
    }
}
