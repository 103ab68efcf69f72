use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use parking_lot::Mutex;
use retic_core::{Column, CoreError, PathUnavailable, Record, RecordStore, Table};
use std::fs;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use tempfile::{Builder, NamedTempFile};

pub mod paths;

use paths::{parent_dir, PathResolver, Resolution};

/// Record table kept in a single CSV file: one header row with the fixed
/// columns, then one row per record. Nothing is cached between operations.
pub struct CsvStore {
    path: PathBuf,
    last_diagnostic: Mutex<Option<String>>,
}

impl CsvStore {
    /// Binds the store to `path`, creating a header-only table if no file exists.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let store = Self {
            path: path.into(),
            last_diagnostic: Mutex::new(None),
        };
        store.ensure_exists()?;
        Ok(store)
    }

    /// Opens the store wherever `resolver` points. If the table cannot be
    /// created on the preferred location, the fallback is used instead.
    pub fn open_resolved(resolver: &PathResolver) -> Result<(Self, Resolution), CoreError> {
        let resolution = resolver.resolve();
        if !resolution.is_preferred() {
            let store = Self::open(&resolution.path)?;
            return Ok((store, resolution));
        }
        match Self::open(&resolution.path) {
            Ok(store) => Ok((store, resolution)),
            Err(err) => {
                let reason = PathUnavailable::ProbeFailed {
                    dir: parent_dir(&resolution.path).to_path_buf(),
                    detail: err.to_string(),
                };
                let resolution = resolver.fall_back(reason);
                let store = Self::open(&resolution.path)?;
                Ok((store, resolution))
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Last failure recovered without surfacing it to the caller.
    pub fn last_diagnostic(&self) -> Option<String> {
        self.last_diagnostic.lock().clone()
    }

    pub fn ensure_exists(&self) -> Result<(), CoreError> {
        if self.path.is_file() {
            return Ok(());
        }
        if self.path.exists() {
            return Err(CoreError::PersistenceWrite(format!(
                "{}: not a regular file",
                self.path.display()
            )));
        }
        write_csv(&self.path, &Table::new()).map_err(|e| self.write_error(e))?;
        tracing::info!(path = %self.path.display(), "created empty table");
        Ok(())
    }

    fn write_error(&self, err: csv::Error) -> CoreError {
        CoreError::PersistenceWrite(format!("{}: {err}", self.path.display()))
    }
}

impl RecordStore for CsvStore {
    fn read_table(&self) -> Result<Table, CoreError> {
        let file = match fs::File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(CoreError::TableMissing(self.path.display().to_string()))
            }
            Err(e) => {
                return Err(CoreError::PersistenceRead(format!("{}: {e}", self.path.display())))
            }
        };
        read_csv(BufReader::new(file))
            .map_err(|e| CoreError::PersistenceRead(format!("{}: {e}", self.path.display())))
    }

    fn write_table(&self, table: &Table) -> Result<(), CoreError> {
        write_csv(&self.path, table).map_err(|e| self.write_error(e))
    }

    fn report(&self, err: &CoreError) {
        tracing::warn!(path = %self.path.display(), error = %err, "record store failure");
        *self.last_diagnostic.lock() = Some(err.to_string());
    }
}

fn read_csv<R: io::Read>(reader: R) -> Result<Table, csv::Error> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);
    check_headers(rdr.headers()?)?;
    let mut rows = Vec::new();
    for rec in rdr.deserialize::<Record>() {
        rows.push(rec?);
    }
    Ok(Table::from_rows(rows))
}

fn check_headers(headers: &StringRecord) -> Result<(), csv::Error> {
    let missing: Vec<&str> = Column::headers()
        .into_iter()
        .filter(|h| !headers.iter().any(|x| x == *h))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("missing columns: {}", missing.join(", ")),
        )
        .into())
    }
}

/// Rewrites the whole file. Rows go to a temporary file next to the target,
/// which then replaces it, so readers never see a partial table. The
/// replacement keeps the mode of the file it replaces; a new table gets the
/// mode any new file would get under the current umask.
fn write_csv(path: &Path, table: &Table) -> Result<(), csv::Error> {
    let dir = parent_dir(path);
    fs::create_dir_all(dir)?;

    let mut tmp = temp_sibling(dir)?;
    if let Ok(meta) = fs::metadata(path) {
        tmp.as_file().set_permissions(meta.permissions())?;
    }
    {
        let mut wtr = WriterBuilder::new().has_headers(false).from_writer(&mut tmp);
        wtr.write_record(Column::headers())?;
        for r in table {
            wtr.serialize(r)?;
        }
        wtr.flush()?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(unix)]
fn temp_sibling(dir: &Path) -> io::Result<NamedTempFile> {
    use std::os::unix::fs::PermissionsExt;

    Builder::new()
        .permissions(fs::Permissions::from_mode(0o666))
        .tempfile_in(dir)
}

#[cfg(not(unix))]
fn temp_sibling(dir: &Path) -> io::Result<NamedTempFile> {
    Builder::new().tempfile_in(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_only_input_is_empty_table() {
        let text = format!("{}\n", Column::headers().join(","));
        let table = read_csv(text.as_bytes()).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn optional_columns_may_be_blank() {
        let text = format!(
            "{}\n1,Laptop,Dell XPS 15,SN-1,2025-08-04,,Pantalla azul.,,Carlos V.,,Recibido\n",
            Column::headers().join(",")
        );
        let table = read_csv(text.as_bytes()).unwrap();
        let r = &table.rows()[0];
        assert_eq!(r.id, 1);
        assert_eq!(r.delivered_on, None);
        assert_eq!(r.components, None);
        assert_eq!(r.status, "Recibido");
    }

    #[test]
    fn column_order_in_file_does_not_matter_for_reading() {
        let mut headers = Column::headers().to_vec();
        headers.reverse();
        let text = format!(
            "{}\nRecibido,,Carlos V.,,Pantalla azul.,,2025-08-04,SN-1,Dell,Laptop,9\n",
            headers.join(",")
        );
        let table = read_csv(text.as_bytes()).unwrap();
        assert_eq!(table.rows()[0].id, 9);
        assert_eq!(table.rows()[0].serial_number, "SN-1");
    }

    #[test]
    fn missing_column_is_rejected() {
        let text = "ID,Tipo de Equipo\n1,Laptop\n";
        let err = read_csv(text.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Numero de Serie"));
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(read_csv("".as_bytes()).is_err());
    }
}
