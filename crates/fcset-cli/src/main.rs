use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use fcset_link::dispatch::SettingsDispatcher;
use fcset_link::fake::{FakeDevice, RecordingTelemetry};
use fcset_link::reconfig::{restart_required, ReconfigTiming, Reconfigurator};
use fcset_link::sync::{tuning_writes, ConfigSyncState};
use fcset_proto::sync::{ConfigDomain, FieldWrite, SaveOutcome, SettingValue};
use fcset_proto::tuning::{Axis, TuningRecord};
use fcset_rates::{doctor as rates_doctor, rates};

#[derive(Debug, Parser)]
#[command(name = "fcset", version, about = "Flight controller tuning & configuration core")]
struct Cli {
    #[arg(long)]
    config: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    Doctor,
    Rates {
        #[command(subcommand)]
        cmd: RatesCmd,
    },
    Plan {
        /// Classify safety fields as restart-requiring (simulated target)
        #[arg(long)]
        simulated: bool,
        /// Execute the save/reconfigure cycle against an in-memory device
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Debug, Subcommand)]
enum RatesCmd {
    /// Sampled stick -> deg/s table for one axis.
    Preview {
        #[arg(long, default_value = "roll")]
        axis: String,
        #[arg(long, default_value_t = 21)]
        points: usize,
    },
    /// Full-deflection rate per axis.
    Max,
}

#[derive(Debug, serde::Deserialize)]
struct Config {
    tuning: TuningRecord,
    link: Option<LinkCfg>,
    plan: Option<PlanCfg>,
}

#[derive(Debug, serde::Deserialize)]
struct LinkCfg {
    text_settle_ms: Option<u64>,
    commit_flush_ms: Option<u64>,
    reboot_grace_ms: Option<u64>,
    reconnect_target: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct PlanCfg {
    writes: Vec<PlanWriteCfg>,
}

#[derive(Debug, serde::Deserialize)]
struct PlanWriteCfg {
    domain: ConfigDomain,
    name: String,
    value: String,
}

fn load_config(path: &str) -> Result<Config> {
    let s = std::fs::read_to_string(path).context("read config")?;
    Ok(toml::from_str(&s).context("parse config toml")?)
}

fn parse_axis(s: &str) -> Result<Axis> {
    match s {
        "roll" => Ok(Axis::Roll),
        "pitch" => Ok(Axis::Pitch),
        "yaw" => Ok(Axis::Yaw),
        other => anyhow::bail!("unknown axis: {}", other),
    }
}

/// Console values are untyped text; keep numbers numeric where they
/// parse so the structured path gets a proper type.
fn parse_value(s: &str) -> SettingValue {
    if let Ok(v) = s.parse::<i64>() {
        SettingValue::Int(v)
    } else if let Ok(v) = s.parse::<f64>() {
        SettingValue::Float(v)
    } else {
        SettingValue::Text(s.to_string())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let cfg = load_config(&cli.config)?;

    match cli.cmd {
        Command::Doctor => doctor(&cfg)?,
        Command::Rates { cmd } => rates_cmd(&cfg, cmd)?,
        Command::Plan { simulated, dry_run } => plan(&cfg, simulated, dry_run).await?,
    }
    Ok(())
}

fn doctor(cfg: &Config) -> Result<()> {
    info!("doctor: starting");

    rates_doctor::check_tuning(&cfg.tuning)?;

    if let Some(link) = &cfg.link {
        if let Some(grace) = link.reboot_grace_ms {
            anyhow::ensure!(grace >= 1000, "link.reboot_grace_ms shorter than any real boot");
        }
        if let Some(settle) = link.text_settle_ms {
            anyhow::ensure!(settle >= 10, "link.text_settle_ms too short for the console");
        }
    }

    info!("doctor: OK");
    Ok(())
}

fn rates_cmd(cfg: &Config, cmd: RatesCmd) -> Result<()> {
    let record = &cfg.tuning;
    match cmd {
        RatesCmd::Preview { axis, points } => {
            let axis = parse_axis(&axis)?;
            let params = record.axis(axis);
            println!("{:?} / {:?}", axis, record.algorithm);
            for (stick, dps) in rates::curve_points(params, record.algorithm, points) {
                println!("{:+.2}  {:8.1} deg/s", stick, dps);
            }
        }
        RatesCmd::Max => {
            for axis in [Axis::Roll, Axis::Pitch, Axis::Yaw] {
                let dps = rates::max_rate(record.axis(axis), record.algorithm);
                println!("{:?}: {:.1} deg/s", axis, dps);
            }
        }
    }
    Ok(())
}

async fn plan(cfg: &Config, simulated: bool, dry_run: bool) -> Result<()> {
    let plan = cfg.plan.as_ref().context("no [plan] config section")?;

    let mut live: Vec<(ConfigDomain, FieldWrite)> = Vec::new();
    let mut restart: Vec<FieldWrite> = Vec::new();

    for w in &plan.writes {
        let write = FieldWrite { name: w.name.clone(), value: parse_value(&w.value) };
        if restart_required(&w.name, simulated) {
            restart.push(write);
        } else {
            live.push((w.domain, write));
        }
    }

    println!("live writes: {}", live.len());
    for (domain, w) in &live {
        println!("  {:?}: {} = {}", domain, w.name, w.value);
    }
    println!("restart-requiring writes: {}", restart.len());
    for w in &restart {
        println!("  {} = {}", w.name, w.value);
    }

    if !dry_run {
        return Ok(());
    }

    // dry run against the in-memory device
    let timing = link_timing(cfg);
    let dispatcher = dispatcher_from(cfg);
    let target = cfg
        .link
        .as_ref()
        .and_then(|l| l.reconnect_target.clone())
        .unwrap_or_else(|| "fake://device".into());

    let mut dev = FakeDevice::new();
    let mut telemetry = RecordingTelemetry::default();

    let mut state = ConfigSyncState::new();
    for w in tuning_writes(&cfg.tuning) {
        state.stage(ConfigDomain::Tuning, w);
    }
    for (domain, w) in live {
        state.stage(domain, w);
    }

    match state.save_all(&dispatcher, &mut dev, &mut telemetry).await {
        SaveOutcome::Success => println!("dry run: save OK ({} commits)", dev.commits),
        SaveOutcome::PartialFailure(domain) => {
            warn!("dry run: save stopped at {:?}", domain);
            return Ok(());
        }
        SaveOutcome::TransportError(msg) => {
            warn!("dry run: transport failed: {}", msg);
            return Ok(());
        }
    }

    if !restart.is_empty() {
        let mut orch = Reconfigurator::new(dispatcher, timing);
        orch.begin("apply restart-requiring settings")?;
        let mut reloads = 0u32;
        orch.run(&mut dev, &mut telemetry, &restart, &target, || reloads += 1)
            .await?;
        println!("dry run: restart cycle OK (reboots={}, reloads={})", dev.reboots, reloads);
    }

    Ok(())
}

fn link_timing(cfg: &Config) -> ReconfigTiming {
    let mut timing = ReconfigTiming::default();
    if let Some(link) = &cfg.link {
        if let Some(ms) = link.commit_flush_ms {
            timing.commit_flush = std::time::Duration::from_millis(ms);
        }
        if let Some(ms) = link.reboot_grace_ms {
            timing.reboot_grace = std::time::Duration::from_millis(ms);
        }
    }
    timing
}

fn dispatcher_from(cfg: &Config) -> SettingsDispatcher {
    match cfg.link.as_ref().and_then(|l| l.text_settle_ms) {
        Some(ms) => SettingsDispatcher::with_settle(std::time::Duration::from_millis(ms)),
        None => SettingsDispatcher::default(),
    }
}
