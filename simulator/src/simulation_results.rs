use chrono::{DateTime, Local};
use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;
use tandem::types::constants::OUTPUT_FILE;
use tandem::utils::logging;
use tandem::{SimulationParameters, SimulationReport};

/// Name of the JSON statistics file written next to the result file
pub const STATS_FILE: &str = "simulation_stats.json";

/// Everything recorded about one completed run
#[derive(Debug, Clone)]
pub struct SimulationResults {
    /// 0-based replication index
    pub run_index: u32,
    pub parameters: SimulationParameters,
    pub report: SimulationReport,
    /// Wall-clock start of the run
    pub started_at: DateTime<Local>,
    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl SimulationResults {
    /// Logs the headline numbers of the run
    pub fn log_summary(&self) {
        logging::log("SIMULATOR", &format!("=== Run {} Results ===", self.run_index));
        logging::log("SIMULATOR", &format!("Start Time: {}", self.started_at.format("%Y-%m-%d %H:%M:%S")));
        logging::log("SIMULATOR", &format!("Seed: {}", self.parameters.seed));
        logging::log("SIMULATOR", &format!("Mean Delay: {:.6}", self.report.mean_delay));
        logging::log("SIMULATOR", &format!("Processed Packets: {}", self.report.processed_pkts));
        logging::log("SIMULATOR", &format!("Wall Time: {:.3}s", self.elapsed.as_secs_f64()));
        logging::log("SIMULATOR", "===========================");
    }

    /// Writes `output.txt` (the mean delay on one line) and `simulation_stats.json` into `dir`
    pub fn save_to_directory(&self, dir: &Path) -> io::Result<()> {
        fs::create_dir_all(dir)?;

        let output_file = dir.join(OUTPUT_FILE);
        fs::write(&output_file, format!("{}\n", self.report.mean_delay))?;
        logging::log("SIMULATOR", &format!("Saved mean delay to {}", output_file.display()));

        let stats = serde_json::json!({
            "run_index": self.run_index,
            "start_time": self.started_at.to_rfc3339(),
            "wall_time_seconds": self.elapsed.as_secs_f64(),
            "parameters": {
                "mean_interarrival_time": self.parameters.mean_interarrival_time,
                "mean_service_times": self.parameters.mean_service_times,
                "truncation": self.parameters.truncation,
                "num_pkts": self.parameters.num_pkts,
                "seed": self.parameters.seed,
                "q_limit": self.parameters.q_limit
            },
            "results": {
                "mean_delay": self.report.mean_delay,
                "processed_pkts": self.report.processed_pkts,
                "total_queue_delay": self.report.total_queue_delay,
                "total_service": self.report.total_service,
                "final_time": self.report.final_time,
                "events_processed": self.report.events_processed
            },
            "queues": self.report.queues
        });

        let stats_file = dir.join(STATS_FILE);
        fs::write(&stats_file, serde_json::to_string_pretty(&stats)?)?;
        logging::log("SIMULATOR", &format!("Saved simulation statistics to {}", stats_file.display()));
        Ok(())
    }
}

/// Removes the result and statistics files left in `dir`, so a failed run leaves no result behind
pub fn discard_output(dir: &Path) -> io::Result<()> {
    remove_if_exists(&dir.join(OUTPUT_FILE))?;
    remove_if_exists(&dir.join(STATS_FILE))
}

/// Removes a file or a whole directory, ignoring paths that do not exist
pub fn remove_if_exists(path: &Path) -> io::Result<()> {
    let removed = if path.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    match removed {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
