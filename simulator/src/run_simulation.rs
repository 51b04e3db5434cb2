use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tandem::types::constants::OUTPUT_FILE;
use tandem::utils::logging;
use tandem::{Simulation, SimulationError, SimulationParameters};
use thiserror::Error;
use crate::config::{Config, ConfigError};
use crate::simulation_results::{discard_output, remove_if_exists, SimulationResults};

/// Name of the aggregate file written after a set of replications
pub const SUMMARY_FILE: &str = "summary.json";

/// z value of a two-sided 95% normal interval
const Z_95: f64 = 1.96;

#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Run {run} failed: {source}")]
    Simulation { run: u32, source: SimulationError },
    #[error("Failed to write results: {0}")]
    Io(#[from] std::io::Error),
}

// ------------------------------------------------------------------------------------------------
// Replication Summary
// ------------------------------------------------------------------------------------------------

/// Spread of the mean delay over a set of replications
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplicationSummary {
    pub num_runs: usize,
    pub seeds: Vec<u64>,
    pub mean_delays: Vec<f64>,
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator), zero for a single run
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    /// Half-width of the 95% normal-approximation interval of the mean
    pub ci95_half_width: f64,
}

impl ReplicationSummary {
    pub fn from_results(results: &[SimulationResults]) -> Self {
        let seeds = results.iter().map(|r| r.parameters.seed).collect();
        let mean_delays: Vec<f64> = results.iter().map(|r| r.report.mean_delay).collect();
        let n = mean_delays.len();

        let mean = if n == 0 { 0.0 } else { mean_delays.iter().sum::<f64>() / n as f64 };
        let std_dev = if n < 2 {
            0.0
        } else {
            let squares: f64 = mean_delays.iter().map(|d| (d - mean).powi(2)).sum();
            (squares / (n - 1) as f64).sqrt()
        };
        let min = mean_delays.iter().copied().fold(f64::INFINITY, f64::min);
        let max = mean_delays.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Self {
            num_runs: n,
            seeds,
            mean,
            std_dev,
            min: if n == 0 { 0.0 } else { min },
            max: if n == 0 { 0.0 } else { max },
            ci95_half_width: if n == 0 { 0.0 } else { Z_95 * std_dev / (n as f64).sqrt() },
            mean_delays,
        }
    }

    pub fn log(&self) {
        logging::log("SIMULATOR", "=== Replication Summary ===");
        logging::log("SIMULATOR", &format!("Runs: {}", self.num_runs));
        logging::log("SIMULATOR", &format!(
            "Mean Delay: {:.6} +/- {:.6} (95%)",
            self.mean, self.ci95_half_width
        ));
        logging::log("SIMULATOR", &format!("Std Dev: {:.6}, Min: {:.6}, Max: {:.6}", self.std_dev, self.min, self.max));
        logging::log("SIMULATOR", "===========================");
    }
}

// ------------------------------------------------------------------------------------------------
// Runs
// ------------------------------------------------------------------------------------------------

/// Runs one simulation to completion and timestamps it
pub fn run_single(params: SimulationParameters, run_index: u32) -> Result<SimulationResults, SimulationError> {
    let started_at = Local::now();
    let start = Instant::now();

    let mut simulation = Simulation::new(params.clone())?;
    let report = simulation.run()?;

    Ok(SimulationResults {
        run_index,
        parameters: params,
        report,
        started_at,
        elapsed: start.elapsed(),
    })
}

/// Runs every replication `config` asks for and saves the results under `output_dir`.
///
/// A single run writes its files straight into `output_dir`. Several runs write into
/// `run_<i>/` subdirectories, plus a `summary.json` and an `output.txt` holding the mean
/// over all runs. Any failure stops the set and removes everything it would have written,
/// including the files of replications that had already finished.
pub fn run_simulation(config: &Config, output_dir: &Path) -> Result<Vec<SimulationResults>, RunError> {
    match run_all(config, output_dir) {
        Ok(results) => Ok(results),
        Err(e) => {
            log::error!("{}", e);
            discard_set(config, output_dir)?;
            Err(e)
        }
    }
}

/// Directory holding the files of replication `run`
pub fn run_directory(output_dir: &Path, run: u32) -> PathBuf {
    output_dir.join(format!("run_{}", run))
}

fn discard_set(config: &Config, output_dir: &Path) -> std::io::Result<()> {
    discard_output(output_dir)?;
    remove_if_exists(&output_dir.join(SUMMARY_FILE))?;
    if config.num_runs() > 1 {
        for run in 0..config.num_runs() {
            remove_if_exists(&run_directory(output_dir, run))?;
        }
    }
    Ok(())
}

fn run_all(config: &Config, output_dir: &Path) -> Result<Vec<SimulationResults>, RunError> {
    let num_runs = config.num_runs();
    fs::create_dir_all(output_dir)?;

    if num_runs == 1 {
        let results = run_and_report(config, 0)?;
        results.save_to_directory(output_dir)?;
        return Ok(vec![results]);
    }

    log::info!("Running {} replications", num_runs);
    let progress_bar = ProgressBar::new(num_runs as u64);
    progress_bar.set_style(ProgressStyle::default_bar()
        .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} runs ({eta}) {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-"));

    let mut all_results = Vec::with_capacity(num_runs as usize);
    for run in 0..num_runs {
        progress_bar.set_message(format!("Run {}/{}", run + 1, num_runs));
        let results = match run_and_report(config, run) {
            Ok(results) => results,
            Err(e) => {
                progress_bar.abandon_with_message(format!("Run {}/{} failed", run + 1, num_runs));
                return Err(e);
            }
        };
        let run_dir = run_directory(output_dir, run);
        results.save_to_directory(&run_dir)?;
        all_results.push(results);
        progress_bar.inc(1);
    }
    progress_bar.finish_with_message(format!("Run {}/{}", num_runs, num_runs));

    let summary = ReplicationSummary::from_results(&all_results);
    summary.log();
    save_summary(&summary, output_dir)?;
    Ok(all_results)
}

fn run_and_report(config: &Config, run: u32) -> Result<SimulationResults, RunError> {
    let params = config.parameters_for_run(run)?;
    log::info!("Starting run {} with seed {}", run, params.seed);

    let results = run_single(params, run).map_err(|source| RunError::Simulation { run, source })?;
    results.log_summary();
    log::info!("Run {} finished, mean delay {:.6}", run, results.report.mean_delay);
    Ok(results)
}

fn save_summary(summary: &ReplicationSummary, output_dir: &Path) -> Result<(), RunError> {
    let summary_file = output_dir.join(SUMMARY_FILE);
    let json = serde_json::to_string_pretty(summary).map_err(std::io::Error::from)?;
    fs::write(&summary_file, json)?;
    fs::write(output_dir.join(OUTPUT_FILE), format!("{}\n", summary.mean))?;
    logging::log("SIMULATOR", &format!("Saved replication summary to {}", summary_file.display()));
    Ok(())
}
