use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand};
use retic_core::{DATE_FORMAT, DEFAULT_STATUS};
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[command(name = "retic", version, about = "RETI-C equipment reception records")]
pub struct Cli {
    /// Shared table file, used when its folder exists and is writable
    #[arg(long, env = "RETIC_NETWORK_PATH")]
    pub network_path: Option<PathBuf>,

    /// Local table file used otherwise (defaults to the app data dir)
    #[arg(long, env = "RETIC_LOCAL_PATH")]
    pub local_path: Option<PathBuf>,

    /// More log output (-v info, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Errors only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Show which table file is active and why
    Status,
    /// Register a received equipment
    Add(RecordAdd),
    /// Look up a record by serial number
    Find {
        serial: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// List records
    List(ListCmd),
    /// Totals per status and equipment type
    Stats,
}

#[derive(Debug, Args, Clone)]
pub struct RecordAdd {
    /// Tipo de Equipo
    #[arg(long = "type")]
    pub equipment_type: String,
    /// Marca y Modelo
    #[arg(long)]
    pub model: String,
    /// Numero de Serie
    #[arg(long)]
    pub serial: String,
    /// Descripcion del Problema
    #[arg(long)]
    pub problem: String,
    /// Responsable Recepcion
    #[arg(long)]
    pub received_by: String,
    /// Fecha de Recepcion (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub received: Option<NaiveDate>,
    /// Fecha de Entrega (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub delivered: Option<NaiveDate>,
    /// Componentes Entregados
    #[arg(long)]
    pub components: Option<String>,
    /// Historial Intervenciones
    #[arg(long)]
    pub history: Option<String>,
    /// Estado
    #[arg(long, default_value = DEFAULT_STATUS)]
    pub status: String,
    /// Explicit ID instead of the next free one
    #[arg(long)]
    pub id: Option<u64>,
}

#[derive(Debug, Args, Clone)]
pub struct ListCmd {
    #[arg(long)]
    pub status: Option<String>,
    /// Substring match on type, model, serial and problem
    #[arg(long)]
    pub query: Option<String>,
    /// Only records not yet delivered
    #[arg(long)]
    pub pending: bool,
    #[arg(long)]
    pub json: bool,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| format!("expected a date like 2025-08-04, got '{s}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_parses_dates_and_defaults_status() {
        let cli = Cli::try_parse_from([
            "retic", "add", "--type", "Laptop", "--model", "Dell XPS 15", "--serial", "SN-1",
            "--problem", "Pantalla azul.", "--received-by", "Carlos V.", "--received", "2025-08-04",
        ])
        .unwrap();
        let Command::Add(a) = cli.cmd else { panic!("expected add") };
        assert_eq!(a.received, NaiveDate::from_ymd_opt(2025, 8, 4));
        assert_eq!(a.status, DEFAULT_STATUS);
        assert_eq!(a.id, None);
    }

    #[test]
    fn bad_date_is_rejected() {
        let res = Cli::try_parse_from([
            "retic", "add", "--type", "Laptop", "--model", "Dell", "--serial", "SN-1",
            "--problem", "x", "--received-by", "y", "--received", "04/08/2025",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn find_serial_is_optional_at_parse_time() {
        let cli = Cli::try_parse_from(["retic", "find"]).unwrap();
        assert!(matches!(cli.cmd, Command::Find { serial: None, json: false }));
    }
}
