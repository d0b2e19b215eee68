use std::cmp::Reverse;

use crate::record::Record;

/// Orders freshly fetched records newest-first by parsed `Timestamp`.
///
/// The sort is stable, so records with equal timestamps keep their fetch
/// order. Records whose timestamp is absent or unparseable sort last. Field
/// values are left untouched.
pub fn normalize(mut records: Vec<Record>) -> Vec<Record> {
    records.sort_by_cached_key(|r| Reverse(r.timestamp()));
    records
}
