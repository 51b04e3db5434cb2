use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use chrono::Local;
use simulator::{run_simulation, Config};
use tandem::types::constants::DEFAULT_CONFIG_FILE;
use tandem::utils::logging;
use tracing_subscriber::EnvFilter;

// ------------------------------------------------------------------------------------------------
// Main
// ------------------------------------------------------------------------------------------------

/// Usage: `simulator [config file] [output directory]`
///
/// Defaults to `input.txt` in the current directory and writes results next to it.
fn main() -> ExitCode {
    setup_logging();

    let mut args = env::args().skip(1);
    let config_path = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string()));
    let output_dir = PathBuf::from(args.next().unwrap_or_else(|| ".".to_string()));

    let config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading {}: {}", config_path.display(), e);
            // no stale result may survive a rejected configuration
            let _ = simulator::simulation_results::discard_output(&output_dir);
            return ExitCode::FAILURE;
        }
    };
    log_configuration(&config);

    match run_simulation(&config, &output_dir) {
        Ok(results) => {
            for results in &results {
                println!("Run {}: mean delay {}", results.run_index, results.report.mean_delay);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Simulation failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Installs the `log` and `tracing` backends (both honour RUST_LOG) and the per-event trace
fn setup_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // `log` records already go to env_logger, so the subscriber is installed without a log bridge
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to install tracing subscriber: {}", e);
    }

    if let Err(e) = logging::init_logging() {
        eprintln!("Logging disabled: {}", e);
    }
}

fn log_configuration(config: &Config) {
    logging::log("SIMULATOR", "=== Simulation Configuration ===");
    logging::log("SIMULATOR", &format!("Start Time: {}", Local::now().format("%Y-%m-%d %H:%M:%S")));
    logging::log("SIMULATOR", &format!("Mean Inter-arrival Time: {}", config.traffic_config.mean_interarrival_time));
    for (i, mean) in config.network_config.mean_service_times.iter().enumerate() {
        logging::log("SIMULATOR", &format!("Q{} Mean Service Time: {}", i + 1, mean));
    }
    if let (Some(a), Some(b)) = (config.traffic_config.truncation_lower, config.traffic_config.truncation_upper) {
        logging::log("SIMULATOR", &format!("Truncation: [{}, {}]", a, b));
    }
    logging::log("SIMULATOR", &format!("Queue Limit: {}", config.network_config.q_limit));
    logging::log("SIMULATOR", &format!("Packets: {}", config.run_config.num_pkts));
    logging::log("SIMULATOR", &format!("Seed: {}", config.run_config.seed));
    logging::log("SIMULATOR", &format!("Runs: {}", config.run_config.num_runs));
    logging::log("SIMULATOR", "=============================");
}
