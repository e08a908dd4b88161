//! telephony-probe: print what the telephony API reports for every modem

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use telephony_core::logging::{setup_logging, LoggingConfig};
use telephony_core::tapi::memory::MemoryDaemon;
use telephony_core::{StaticFeatures, TelephonyConfig, TelephonyError, TelephonyHandle};

#[derive(Parser)]
#[command(name = "telephony-probe")]
#[command(about = "Query call, modem and network information from the telephony daemon")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to $TELEPHONY_CONFIG)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Daemon snapshot to serve instead of the configured one
    #[arg(short, long, global = true)]
    snapshot: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Clone, Copy)]
enum Commands {
    /// Everything below, per modem
    Info,
    /// Voice and video call state
    Call,
    /// IMEI
    Modem,
    /// Registered network
    Network,
}

impl Commands {
    fn wants_call(self) -> bool {
        matches!(self, Commands::Info | Commands::Call)
    }

    fn wants_modem(self) -> bool {
        matches!(self, Commands::Info | Commands::Modem)
    }

    fn wants_network(self) -> bool {
        matches!(self, Commands::Info | Commands::Network)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => TelephonyConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => TelephonyConfig::from_env().context("loading configuration")?,
    };
    if let Some(snapshot) = &cli.snapshot {
        config = config.with_snapshot(snapshot);
    }

    let logging = LoggingConfig::from_settings(&config.logging)?;
    setup_logging(&logging);

    let snapshot = config
        .snapshot
        .clone()
        .context("no daemon snapshot configured; pass --snapshot")?;
    let daemon = MemoryDaemon::from_file(&snapshot)
        .with_context(|| format!("loading snapshot {}", snapshot.display()))?;
    debug!("Serving snapshot {}", snapshot.display());

    let features = Arc::new(StaticFeatures::from(&config));
    let handles = telephony_core::init(&daemon, features).context("telephony init")?;
    info!("{} modem(s)", handles.len());

    let reports: Vec<Value> = handles
        .handles()
        .iter()
        .map(|handle| report(handle, cli.command))
        .collect();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            print_text(report);
        }
    }

    handles.deinit().context("telephony deinit")?;
    Ok(())
}

/// Value on success, error name otherwise.
fn field<T: Serialize>(result: Result<T, TelephonyError>) -> Value {
    match result {
        Ok(value) => serde_json::to_value(value).unwrap_or(Value::Null),
        Err(e) => json!({ "error": e.name() }),
    }
}

fn report(handle: &TelephonyHandle, command: Commands) -> Value {
    let mut out = serde_json::Map::new();
    out.insert("cp_name".into(), json!(handle.cp_name()));

    if command.wants_call() {
        out.insert(
            "call".into(),
            json!({
                "voice": field(handle.voice_call_state()),
                "video": field(handle.video_call_state()),
            }),
        );
    }
    if command.wants_modem() {
        out.insert("modem".into(), json!({ "imei": field(handle.imei()) }));
    }
    if command.wants_network() {
        out.insert(
            "network".into(),
            json!({
                "lac": field(handle.lac()),
                "cell_id": field(handle.cell_id()),
                "rssi": field(handle.rssi().map(|r| r.level())),
                "roaming": field(handle.roaming_status()),
                "mcc": field(handle.mcc()),
                "mnc": field(handle.mnc()),
                "network_name": field(handle.network_name()),
                "network_type": field(handle.network_type()),
                "service_state": field(handle.service_state()),
            }),
        );
    }
    Value::Object(out)
}

fn print_text(report: &Value) {
    let name = report["cp_name"].as_str().unwrap_or("?");
    println!("[{}]", name);
    if let Value::Object(sections) = report {
        for (section, values) in sections {
            let Value::Object(values) = values else {
                continue;
            };
            for (key, value) in values {
                let shown = match value {
                    Value::String(s) => s.clone(),
                    Value::Object(e) => format!("<{}>", e["error"].as_str().unwrap_or("error")),
                    other => other.to_string(),
                };
                println!("  {}.{}: {}", section, key, shown);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use telephony_core::tapi::memory::ModemSnapshot;
    use telephony_core::tapi::{CallStatus, CallSubState, CallType, ServiceType};

    fn handle_list() -> (MemoryDaemon, telephony_core::HandleList) {
        let mut modem = ModemSnapshot::new("modem0");
        modem.imei = Some("356938035643809".to_string());
        modem.calls = vec![CallStatus::new(1, CallType::Voice, CallSubState::Held)];
        modem.network.sig_level = Some(5);
        modem.network.plmn = Some("45005".to_string());
        modem.network.service_type = Some(ServiceType::Lte);
        let daemon = MemoryDaemon::single(modem);
        let handles = telephony_core::init(&daemon, Arc::new(StaticFeatures::telephony(true)))
            .expect("init");
        (daemon, handles)
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::parse_from(["telephony-probe", "--json", "network"]);
        assert!(cli.json);
        assert!(cli.command.wants_network());
        assert!(!cli.command.wants_call());
    }

    #[test]
    fn test_report_contains_values_and_errors() {
        let (_daemon, handles) = handle_list();
        let report = report(&handles.handles()[0], Commands::Info);

        assert_eq!(report["cp_name"], "modem0");
        assert_eq!(report["call"]["voice"], "Connected");
        assert_eq!(report["call"]["video"], "Idle");
        assert_eq!(report["modem"]["imei"], "356938035643809");
        assert_eq!(report["network"]["rssi"], 5);
        assert_eq!(report["network"]["mcc"], "450");
        assert_eq!(report["network"]["mnc"], "05");
        assert_eq!(report["network"]["lac"]["error"], "OPERATION_FAILED");
    }

    #[test]
    fn test_report_limited_to_subcommand() {
        let (_daemon, handles) = handle_list();
        let report = report(&handles.handles()[0], Commands::Modem);
        assert!(report.get("modem").is_some());
        assert!(report.get("network").is_none());
    }
}
