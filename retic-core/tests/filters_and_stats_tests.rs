use chrono::NaiveDate;
use retic_core::{
    filter_by_status, filter_by_text, filter_pending, normalize_serial, summarize, CoreError,
    Record, RecordDraft,
};

fn record(id: u64, kind: &str, serial: &str, status: &str) -> Record {
    let mut d = RecordDraft::new(kind, "Dell XPS 15", serial);
    d.problem = "Pantalla azul.".into();
    d.received_by = "Carlos V.".into();
    d.status = status.into();
    d.received_on = NaiveDate::from_ymd_opt(2025, 8, 4).unwrap();
    d.into_record(id)
}

#[test]
fn normalize_serial_rejects_absent_and_blank() {
    assert!(matches!(normalize_serial(None), Err(CoreError::InvalidArgument(_))));
    assert!(matches!(normalize_serial(Some("")), Err(CoreError::InvalidArgument(_))));
    assert!(matches!(normalize_serial(Some("   ")), Err(CoreError::InvalidArgument(_))));
    assert_eq!(normalize_serial(Some("  SN-1 ")).unwrap(), "SN-1");
}

#[test]
fn filters_text_status_and_pending() {
    let r1 = record(1, "Laptop", "SN-001", "Recibido");
    let r2 = record(2, "Impresora", "SN-002", "En Reparacion");
    let mut r3 = record(3, "Monitor", "SN-003", "Entregado");
    r3.delivered_on = Some("2025-08-10".into());
    let v = vec![r1, r2, r3];

    let by_text = filter_by_text(&v, "impre");
    assert_eq!(by_text.len(), 1);
    assert_eq!(by_text[0].id, 2);
    assert_eq!(filter_by_text(&v, "  ").len(), 3);

    let by_status = filter_by_status(&v, "en reparacion");
    assert_eq!(by_status.len(), 1);
    assert_eq!(by_status[0].serial_number, "SN-002");

    let pending = filter_pending(&v);
    assert_eq!(pending.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2]);
}

#[test]
fn summary_counts() {
    let mut delivered = record(3, "Laptop", "SN-003", "Entregado");
    delivered.delivered_on = Some("2025-08-10".into());
    let v = vec![
        record(1, "Laptop", "SN-001", "Recibido"),
        record(2, "Monitor", "SN-002", "Recibido"),
        delivered,
    ];

    let s = summarize(&v);
    assert_eq!(s.total, 3);
    assert_eq!(s.pending, 2);
    assert_eq!(s.delivered, 1);
    assert_eq!(s.by_status.get("Recibido"), Some(&2));
    assert_eq!(s.by_type.get("Laptop"), Some(&2));
    assert_eq!(s.by_type.get("Monitor"), Some(&1));
}

#[test]
fn record_serializes_with_column_names() {
    let r = record(7, "Laptop", "SN-7", "Recibido");
    let v = serde_json::to_value(&r).unwrap();
    assert_eq!(v["ID"], 7);
    assert_eq!(v["Numero de Serie"], "SN-7");
    assert_eq!(v["Fecha de Recepcion"], "2025-08-04");
    assert!(v["Fecha de Entrega"].is_null());
}
