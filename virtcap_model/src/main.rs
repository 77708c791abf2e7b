//! # Virtual Capacitor Simulator
//!
//! Loads a simulator TOML (capacitor settings, calibration, input phases),
//! replays the phases through the fixed-point model and logs every output
//! transition and the final summary.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use virtcap_common::config::{ConfigLoader, LogLevel, SimConfig};
use virtcap_common::consts::DEFAULT_CONFIG_PATH;
use virtcap_model::CapacitorModel;
use virtcap_model::scenario::run_scenario;

/// Virtual capacitor: offline fixed-point simulation
#[derive(Parser, Debug)]
#[command(name = "virtcap_sim")]
#[command(version)]
#[command(about = "Replay harvesting/load phases through the virtual capacitor model")]
struct Args {
    /// Path to the simulator configuration TOML.
    #[arg(default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Enable verbose logging (DEBUG level), overriding the config.
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();
    let level = LogLevel::peek(&args.config).unwrap_or_default();
    setup_tracing(&args, level);

    info!("virtcap_sim v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = match SimConfig::load(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("FATAL: {}: {e}", args.config.display());
            process::exit(1);
        }
    };

    if let Err(e) = run(&config) {
        error!("FATAL: {e}");
        process::exit(1);
    }
}

fn run(config: &SimConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        service = %config.shared.service_name,
        phases = config.phases.len(),
        samples = config.total_samples(),
        "configuration loaded"
    );

    let (mut switched_on, mut switched_off) = (0u64, 0u64);
    let mut model = CapacitorModel::init(&config.capacitor, &config.calibration, |on: bool| {
        if on {
            switched_on += 1;
        } else {
            switched_off += 1;
        }
    })?;

    let summary = run_scenario(&mut model, &config.phases);
    let outputting = model.is_outputting();
    drop(model);

    for t in &summary.transitions {
        info!(
            sample = t.sample,
            state = ?t.state,
            cap_mv = t.cap_voltage.to_millivolts(),
            "transition"
        );
    }
    if summary.dropped_transitions > 0 {
        warn!(
            dropped = summary.dropped_transitions,
            "transition log full; later transitions not listed"
        );
    }
    if !summary.faults.is_empty() {
        warn!(faults = ?summary.faults, "fixed-point saturation occurred during the run");
    }

    info!(
        updates = summary.updates,
        transitions = summary.transition_count(),
        switched_on,
        switched_off,
        final_mv = summary.final_voltage.to_millivolts(),
        min_mv = summary.min_voltage.to_millivolts(),
        max_mv = summary.max_voltage.to_millivolts(),
        outputting,
        "simulation complete"
    );
    Ok(())
}

/// Setup tracing subscriber from CLI arguments and the configured level.
fn setup_tracing(args: &Args, level: LogLevel) {
    let directive = if args.verbose {
        LogLevel::Debug.as_directive()
    } else {
        level.as_directive()
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}
