use crate::{CoreError, Table};
use parking_lot::RwLock;

/// Store that keeps the table in process memory. Each operation still goes
/// through a whole-table read and write, like the file-backed store.
#[derive(Default)]
pub struct MemoryStore {
    table: RwLock<Table>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl crate::repo::RecordStore for MemoryStore {
    fn read_table(&self) -> Result<Table, CoreError> {
        Ok(self.table.read().clone())
    }

    fn write_table(&self, table: &Table) -> Result<(), CoreError> {
        *self.table.write() = table.clone();
        Ok(())
    }
}
