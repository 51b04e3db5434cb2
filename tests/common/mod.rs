use tandem::{simulate, SimulationParameters, SimulationReport};

/// Runs `params` once per seed in `seeds` and returns every report
pub fn run_seeds(params: &SimulationParameters, seeds: std::ops::Range<u64>) -> Vec<SimulationReport> {
    seeds
        .map(|seed| {
            simulate(params.clone().with_seed(seed))
                .unwrap_or_else(|e| panic!("Run with seed {} failed: {}", seed, e))
        })
        .collect()
}

/// Average of `metric` over `reports`
pub fn average(reports: &[SimulationReport], metric: impl Fn(&SimulationReport) -> f64) -> f64 {
    reports.iter().map(metric).sum::<f64>() / reports.len() as f64
}

/// Uniform values that make a mean-1 exponential return exactly `times`
#[cfg(feature = "test")]
pub fn scripted_times(times: &[f64]) -> tandem::variates::ScriptedUniform {
    tandem::variates::ScriptedUniform::new(times.iter().map(|t| 1.0 - (-t).exp()).collect())
}
