use crate::{CoreError, Record};

/// Trimmed search key; absent or blank input is a caller error, not a miss.
pub fn normalize_serial(serial: Option<&str>) -> Result<&str, CoreError> {
    match serial.map(str::trim) {
        Some(s) if !s.is_empty() => Ok(s),
        _ => Err(CoreError::InvalidArgument("serial number must not be empty")),
    }
}

/// Exact, case-sensitive comparison after trimming the stored value.
pub fn serial_matches(record: &Record, needle: &str) -> bool {
    record.serial_number.trim() == needle
}

pub fn filter_by_text(records: &[Record], query: &str) -> Vec<Record> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|r| {
            r.equipment_type.to_lowercase().contains(&q)
                || r.brand_model.to_lowercase().contains(&q)
                || r.serial_number.to_lowercase().contains(&q)
                || r.problem.to_lowercase().contains(&q)
        })
        .cloned()
        .collect()
}

pub fn filter_by_status(records: &[Record], status: &str) -> Vec<Record> {
    let q = status.trim().to_lowercase();
    records
        .iter()
        .filter(|r| r.status.trim().to_lowercase() == q)
        .cloned()
        .collect()
}

/// Records still waiting for delivery back to their owner.
pub fn filter_pending(records: &[Record]) -> Vec<Record> {
    records.iter().filter(|r| !r.is_delivered()).cloned().collect()
}
