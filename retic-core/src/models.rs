use crate::CoreError;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

pub type RecordId = u64;

/// Format of every date column in the table file.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DEFAULT_STATUS: &str = "Recibido";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    Id,
    EquipmentType,
    BrandModel,
    SerialNumber,
    ReceivedOn,
    DeliveredOn,
    Problem,
    Components,
    ReceivedBy,
    History,
    Status,
}

impl Column {
    /// Header row of the table file, in file order.
    pub const ALL: [Column; 11] = [
        Column::Id,
        Column::EquipmentType,
        Column::BrandModel,
        Column::SerialNumber,
        Column::ReceivedOn,
        Column::DeliveredOn,
        Column::Problem,
        Column::Components,
        Column::ReceivedBy,
        Column::History,
        Column::Status,
    ];

    /// Columns a well-formed record must fill before it is added.
    pub const REQUIRED: [Column; 7] = [
        Column::EquipmentType,
        Column::BrandModel,
        Column::SerialNumber,
        Column::ReceivedOn,
        Column::Problem,
        Column::ReceivedBy,
        Column::Status,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            Column::Id => "ID",
            Column::EquipmentType => "Tipo de Equipo",
            Column::BrandModel => "Marca y Modelo",
            Column::SerialNumber => "Numero de Serie",
            Column::ReceivedOn => "Fecha de Recepcion",
            Column::DeliveredOn => "Fecha de Entrega",
            Column::Problem => "Descripcion del Problema",
            Column::Components => "Componentes Entregados",
            Column::ReceivedBy => "Responsable Recepcion",
            Column::History => "Historial Intervenciones",
            Column::Status => "Estado",
        }
    }

    pub fn headers() -> [&'static str; 11] {
        Column::ALL.map(|c| c.header())
    }
}

/// One row of the table. Field order matches [`Column::ALL`].
///
/// Every column but `ID` is kept as text, dates included: rows edited outside
/// the program stay readable even when a date is not in [`DATE_FORMAT`]. A
/// blank optional field is written as an empty cell and reads back as `None`;
/// [`Table::push`] and [`Table::from_rows`] apply the same rule to records
/// built by hand.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Record {
    #[serde(rename = "ID")]
    pub id: RecordId,
    #[serde(rename = "Tipo de Equipo")]
    pub equipment_type: String,
    #[serde(rename = "Marca y Modelo")]
    pub brand_model: String,
    #[serde(rename = "Numero de Serie")]
    pub serial_number: String,
    #[serde(rename = "Fecha de Recepcion")]
    pub received_on: String,
    #[serde(rename = "Fecha de Entrega")]
    pub delivered_on: Option<String>,
    #[serde(rename = "Descripcion del Problema")]
    pub problem: String,
    #[serde(rename = "Componentes Entregados")]
    pub components: Option<String>,
    #[serde(rename = "Responsable Recepcion")]
    pub received_by: String,
    #[serde(rename = "Historial Intervenciones")]
    pub history: Option<String>,
    #[serde(rename = "Estado")]
    pub status: String,
}

impl Record {
    pub fn is_delivered(&self) -> bool {
        self.delivered_on.as_deref().is_some_and(|d| !d.trim().is_empty())
    }

    fn normalize_blanks(&mut self) {
        self.delivered_on = non_blank(self.delivered_on.take());
        self.components = non_blank(self.components.take());
        self.history = non_blank(self.history.take());
    }

    /// Text value of a column as it is written to the file.
    pub fn value(&self, column: Column) -> String {
        match column {
            Column::Id => self.id.to_string(),
            Column::EquipmentType => self.equipment_type.clone(),
            Column::BrandModel => self.brand_model.clone(),
            Column::SerialNumber => self.serial_number.clone(),
            Column::ReceivedOn => self.received_on.clone(),
            Column::DeliveredOn => self.delivered_on.clone().unwrap_or_default(),
            Column::Problem => self.problem.clone(),
            Column::Components => self.components.clone().unwrap_or_default(),
            Column::ReceivedBy => self.received_by.clone(),
            Column::History => self.history.clone().unwrap_or_default(),
            Column::Status => self.status.clone(),
        }
    }
}

/// Field values for a record that has not been stored yet; `id` is assigned
/// by the store when absent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordDraft {
    pub id: Option<RecordId>,
    pub equipment_type: String,
    pub brand_model: String,
    pub serial_number: String,
    pub received_on: NaiveDate,
    pub delivered_on: Option<NaiveDate>,
    pub problem: String,
    pub components: Option<String>,
    pub received_by: String,
    pub history: Option<String>,
    pub status: String,
}

impl RecordDraft {
    pub fn new(
        equipment_type: impl Into<String>,
        brand_model: impl Into<String>,
        serial_number: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            equipment_type: equipment_type.into(),
            brand_model: brand_model.into(),
            serial_number: serial_number.into(),
            received_on: Local::now().date_naive(),
            delivered_on: None,
            problem: String::new(),
            components: None,
            received_by: String::new(),
            history: None,
            status: DEFAULT_STATUS.to_string(),
        }
    }

    /// Required columns left blank, in column order.
    pub fn missing_required(&self) -> Vec<Column> {
        Column::REQUIRED
            .into_iter()
            .filter(|c| match c {
                Column::EquipmentType => self.equipment_type.trim().is_empty(),
                Column::BrandModel => self.brand_model.trim().is_empty(),
                Column::SerialNumber => self.serial_number.trim().is_empty(),
                Column::Problem => self.problem.trim().is_empty(),
                Column::ReceivedBy => self.received_by.trim().is_empty(),
                Column::Status => self.status.trim().is_empty(),
                // always set on a draft
                _ => false,
            })
            .collect()
    }

    pub fn into_record(self, id: RecordId) -> Record {
        Record {
            id,
            equipment_type: self.equipment_type,
            brand_model: self.brand_model,
            serial_number: self.serial_number,
            received_on: self.received_on.format(DATE_FORMAT).to_string(),
            delivered_on: self.delivered_on.map(|d| d.format(DATE_FORMAT).to_string()),
            problem: self.problem,
            components: non_blank(self.components),
            received_by: self.received_by,
            history: non_blank(self.history),
            status: self.status,
        }
    }
}

fn non_blank(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}

/// Ordered rows of the table file. The header is fixed ([`Column::ALL`]), so
/// an empty table is still well-formed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table {
    rows: Vec<Record>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<Record>) -> Self {
        let mut table = Self::new();
        for r in rows {
            table.push(r);
        }
        table
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Record> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.rows.iter()
    }

    pub fn push(&mut self, mut record: Record) {
        record.normalize_blanks();
        self.rows.push(record);
    }

    /// 1 for an empty table, otherwise one past the largest stored ID. Fails
    /// when the largest ID (possibly written by hand) is `u64::MAX`.
    pub fn next_id(&self) -> Result<RecordId, CoreError> {
        match self.rows.iter().map(|r| r.id).max() {
            None => Ok(1),
            Some(max) => max
                .checked_add(1)
                .ok_or(CoreError::InvalidArgument("largest stored ID leaves no next ID")),
        }
    }

    pub fn contains_id(&self, id: RecordId) -> bool {
        self.rows.iter().any(|r| r.id == id)
    }

    /// First row in file order satisfying `pred`.
    pub fn find(&self, pred: impl Fn(&Record) -> bool) -> Option<&Record> {
        self.rows.iter().find(|r| pred(r))
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
