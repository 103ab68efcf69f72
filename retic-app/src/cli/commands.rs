use crate::cli::opts::*;
use crate::init::{open_session, Session};

use anyhow::{bail, Context, Result};
use retic_core::{
    filter_by_status, filter_by_text, filter_pending, normalize_serial, summarize, Column,
    CoreError, Record, RecordDraft, RecordStore,
};
use retic_csv::paths::{default_local_file, PathResolver};

pub async fn run_cli(args: Cli) -> Result<()> {
    let resolver = build_resolver(&args);
    let session = open_session(resolver).await?;
    match args.cmd {
        Command::Status => status_cmd(&session),
        Command::Add(a) => add_cmd(&session, a),
        Command::Find { serial, json } => find_cmd(&session, serial.as_deref(), json),
        Command::List(cmd) => list_cmd(&session, cmd),
        Command::Stats => stats_cmd(&session),
    }
}

pub fn build_resolver(args: &Cli) -> PathResolver {
    let local = args.local_path.clone().unwrap_or_else(default_local_file);
    match &args.network_path {
        Some(shared) => PathResolver::new(shared, local),
        None => PathResolver::local_only(local),
    }
}

fn status_cmd(session: &Session) -> Result<()> {
    let res = &session.resolution;
    println!("table:\t{}", res.path.display());
    println!("mode:\t{}", res.mode_label());
    if let Some(why) = res.diagnostic() {
        println!("reason:\t{why}");
    }
    println!("records:\t{}", session.store.load_all().len());
    Ok(())
}

fn add_cmd(session: &Session, a: RecordAdd) -> Result<()> {
    let mut draft = RecordDraft::new(a.equipment_type, a.model, a.serial);
    draft.id = a.id;
    if let Some(d) = a.received {
        draft.received_on = d;
    }
    draft.delivered_on = a.delivered;
    draft.problem = a.problem;
    draft.components = a.components;
    draft.received_by = a.received_by;
    draft.history = a.history;
    draft.status = a.status;

    let missing = draft.missing_required();
    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(|c| c.header()).collect();
        bail!("required field(s) missing: {}", names.join(", "));
    }

    match session.store.add_record(draft) {
        Ok(r) => {
            println!("registered S/N '{}' with ID {}", r.serial_number.trim(), r.id);
            Ok(())
        }
        Err(err @ CoreError::PersistenceWrite(_)) => Err(err).context(
            "could not save the record; check permissions or whether the table is open in another program",
        ),
        Err(err) => Err(err.into()),
    }
}

fn find_cmd(session: &Session, serial: Option<&str>, json: bool) -> Result<()> {
    let serial = normalize_serial(serial)?;
    match session.store.find_by_serial(serial)? {
        Some(r) if json => println!("{}", serde_json::to_string_pretty(&r)?),
        Some(r) => print_detail(&r),
        None => println!("no equipment found with serial number {serial}"),
    }
    Ok(())
}

fn list_cmd(session: &Session, cmd: ListCmd) -> Result<()> {
    let mut records = session.store.load_all().into_rows();
    if let Some(s) = &cmd.status {
        records = filter_by_status(&records, s);
    }
    if let Some(q) = &cmd.query {
        records = filter_by_text(&records, q);
    }
    if cmd.pending {
        records = filter_pending(&records);
    }

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }
    for r in records {
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}",
            r.id,
            r.value(Column::ReceivedOn),
            r.equipment_type,
            r.brand_model,
            r.serial_number.trim(),
            r.status
        );
    }
    Ok(())
}

fn stats_cmd(session: &Session) -> Result<()> {
    let table = session.store.load_all();
    let s = summarize(table.rows());
    println!("total\t{}", s.total);
    println!("pending\t{}", s.pending);
    println!("delivered\t{}", s.delivered);
    println!("\nby status");
    for (k, v) in &s.by_status {
        println!("  {k}\t{v}");
    }
    println!("\nby type");
    for (k, v) in &s.by_type {
        println!("  {k}\t{v}");
    }
    Ok(())
}

// ===== Helpers =====
fn print_detail(r: &Record) {
    for c in Column::ALL {
        let v = r.value(c);
        let shown = if v.trim().is_empty() { "-" } else { v.as_str() };
        if v.contains('\n') {
            println!("{}:", c.header());
            for line in v.lines() {
                println!("    {line}");
            }
        } else {
            println!("{}: {}", c.header(), shown);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn resolver_without_network_path_is_local_only() {
        let cli = Cli::try_parse_from(["retic", "--local-path", "/tmp/t.csv", "status"]).unwrap();
        let resolver = build_resolver(&cli);
        assert!(resolver.preferred().is_none());
        assert_eq!(resolver.fallback(), std::path::Path::new("/tmp/t.csv"));
    }

    #[tokio::test]
    async fn add_then_find_through_session() {
        let dir = tempfile::tempdir().unwrap();
        let table = dir.path().join("inventario.csv");
        let cli = Cli::try_parse_from([
            "retic",
            "--network-path",
            table.to_str().unwrap(),
            "--local-path",
            dir.path().join("local.csv").to_str().unwrap(),
            "status",
        ])
        .unwrap();
        let session = open_session(build_resolver(&cli)).await.unwrap();
        assert!(session.resolution.is_preferred());

        let add = Cli::try_parse_from([
            "retic", "add", "--type", "Laptop", "--model", "Dell XPS 15", "--serial", "SN-001",
            "--problem", "Pantalla azul.", "--received-by", "Carlos V.",
        ])
        .unwrap();
        let Command::Add(a) = add.cmd else { panic!("expected add") };
        add_cmd(&session, a).unwrap();

        let r = session.store.find_by_serial("SN-001").unwrap().unwrap();
        assert_eq!(r.id, 1);
        assert!(find_cmd(&session, None, false).is_err());
        assert!(find_cmd(&session, Some("NOPE"), false).is_ok());
    }

    #[tokio::test]
    async fn add_with_blank_required_field_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let session = open_session(PathResolver::local_only(dir.path().join("t.csv")))
            .await
            .unwrap();
        let add = Cli::try_parse_from([
            "retic", "add", "--type", "Laptop", "--model", "  ", "--serial", "SN-1",
            "--problem", "x", "--received-by", "y",
        ])
        .unwrap();
        let Command::Add(a) = add.cmd else { panic!("expected add") };
        let err = add_cmd(&session, a).unwrap_err();
        assert!(err.to_string().contains("Marca y Modelo"));
        assert!(session.store.load_all().is_empty());
    }
}
