use crate::{filters, CoreError, Record, RecordDraft, RecordId, Table};

pub mod memory;

pub use memory::MemoryStore;

/// Whole-table persistence. Implementors provide the raw read and write; every
/// logical operation is a fresh read, an in-memory change, and a full rewrite.
pub trait RecordStore: Send + Sync {
    fn read_table(&self) -> Result<Table, CoreError>;
    fn write_table(&self, table: &Table) -> Result<(), CoreError>;

    /// Diagnostic side channel for failures that are recovered locally.
    fn report(&self, err: &CoreError) {
        tracing::warn!(error = %err, "record store failure");
    }

    /// Never fails: an unreadable table is reported and replaced by an empty one.
    fn load_all(&self) -> Table {
        match self.read_table() {
            Ok(table) => table,
            Err(err) => {
                self.report(&err);
                Table::new()
            }
        }
    }

    fn save_all(&self, table: &Table) -> Result<(), CoreError> {
        self.write_table(table).inspect_err(|err| self.report(err))?;
        tracing::debug!(rows = table.len(), "table saved");
        Ok(())
    }

    /// Fails only when the largest stored ID has no successor.
    fn next_id(&self) -> Result<RecordId, CoreError> {
        self.load_all().next_id()
    }

    fn add_record(&self, draft: RecordDraft) -> Result<Record, CoreError> {
        let mut table = match self.read_table() {
            Ok(table) => table,
            // the save below recreates the file
            Err(err @ CoreError::TableMissing(_)) => {
                self.report(&err);
                Table::new()
            }
            Err(err) => {
                self.report(&err);
                return Err(err);
            }
        };
        let id = match draft.id {
            Some(0) => return Err(CoreError::InvalidArgument("ID must be positive")),
            Some(id) if table.contains_id(id) => {
                return Err(CoreError::InvalidArgument("ID already in use"))
            }
            Some(id) => id,
            None => table.next_id()?,
        };
        let record = draft.into_record(id);
        table.push(record.clone());
        self.save_all(&table)?;
        tracing::info!(id, serial = %record.serial_number, "record added");
        Ok(record)
    }

    fn find_first(&self, pred: &dyn Fn(&Record) -> bool) -> Option<Record> {
        self.load_all().find(|r| pred(r)).cloned()
    }

    fn find_by_serial(&self, serial: &str) -> Result<Option<Record>, CoreError> {
        let needle = filters::normalize_serial(Some(serial))?;
        Ok(self.find_first(&|r| filters::serial_matches(r, needle)))
    }
}
