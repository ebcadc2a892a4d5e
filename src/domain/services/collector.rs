use crate::domain::model::{ErrorEntry, Record, RowIssue};

/// Ordered, non-fatal record of rejected or partly expanded input rows.
#[derive(Debug, Clone, Default)]
pub struct ErrorCollector {
    entries: Vec<ErrorEntry>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, record: Record, issue: RowIssue) {
        tracing::debug!("Row issue: {} {}", issue, record);
        self.entries.push(ErrorEntry { record, issue });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ErrorEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<ErrorEntry> {
        self.entries
    }
}
