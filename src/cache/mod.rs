use crate::record::Record;

/// The last successfully fetched record set.
///
/// The collection is the unit of caching: it is only ever swapped whole.
#[derive(Clone, Debug, Default)]
pub struct RecordCache {
    records: Vec<Record>,
}

impl RecordCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, records: Vec<Record>) {
        self.records = records;
    }

    pub fn current(&self) -> &[Record] {
        &self.records
    }
}
