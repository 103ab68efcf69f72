use crate::Record;
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InventorySummary {
    pub total: u32,
    pub pending: u32,
    pub delivered: u32,
    pub by_status: BTreeMap<String, u32>,
    pub by_type: BTreeMap<String, u32>,
}

impl InventorySummary {
    pub fn record(&mut self, r: &Record) {
        self.total += 1;
        if r.is_delivered() {
            self.delivered += 1;
        } else {
            self.pending += 1;
        }
        *self.by_status.entry(label(&r.status)).or_default() += 1;
        *self.by_type.entry(label(&r.equipment_type)).or_default() += 1;
    }
}

fn label(s: &str) -> String {
    let t = s.trim();
    if t.is_empty() {
        "-".to_string()
    } else {
        t.to_string()
    }
}

pub fn summarize(records: &[Record]) -> InventorySummary {
    let mut summary = InventorySummary::default();
    for r in records {
        summary.record(r);
    }
    summary
}
