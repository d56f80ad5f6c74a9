use crate::domain::{BlocklistSet, PhoneValue};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Partition {
    pub kept: Vec<usize>,
    pub blocked: Vec<usize>,
}

/// Splits `candidates` (indices into `values`) into kept and blocked rows.
/// Only valid numbers can be blocked; order of `candidates` is preserved.
pub fn partition<I>(values: &[PhoneValue], candidates: I, blocklist: &BlocklistSet) -> Partition
where
    I: IntoIterator<Item = usize>,
{
    let mut out = Partition::default();
    for index in candidates {
        let blocked = values[index]
            .canonical
            .as_deref()
            .is_some_and(|canonical| blocklist.contains(canonical));
        if blocked {
            out.blocked.push(index);
        } else {
            out.kept.push(index);
        }
    }
    out
}

pub fn count_valid(values: &[PhoneValue]) -> usize {
    values.iter().filter(|value| value.is_valid()).count()
}
