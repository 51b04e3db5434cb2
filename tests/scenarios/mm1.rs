use tandem::utils::logging;
use tandem::SimulationParameters;
use crate::common::{average, run_seeds};

/// Tests a single M/M/1 queue at utilisation 0.5:
/// - mean waiting time in the buffer is close to rho / (mu (1 - rho)) = 1.0
/// - mean delay including service is close to 1 / (mu - lambda) = 2.0
/// - every run stops with exactly `num_pkts` processed
#[test]
fn test_mm1_matches_theory() {
    logging::log("TEST", "=== M/M/1 at rho = 0.5 over 10 seeds ===");
    let params = SimulationParameters::new(2.0, vec![1.0], 1000).with_q_limit(100);
    let reports = run_seeds(&params, 1..11);

    for report in &reports {
        assert_eq!(report.processed_pkts, 1000);
    }

    let waiting = average(&reports, |r| r.total_queue_delay / r.processed_pkts as f64);
    let delay = average(&reports, |r| r.mean_delay);
    println!("[TEST] mean waiting time {:.4}, mean delay {:.4}", waiting, delay);

    assert!((waiting - 1.0).abs() < 0.3, "mean waiting time {} too far from 1.0", waiting);
    assert!((delay - 2.0).abs() < 0.3, "mean delay {} too far from 2.0", delay);
}

/// Tests a long single run against the same theoretical delay
#[test]
fn test_mm1_long_run() {
    let params = SimulationParameters::new(2.0, vec![1.0], 20_000).with_q_limit(1000).with_seed(5);
    let report = tandem::simulate(params).expect("Run failed");

    assert_eq!(report.processed_pkts, 20_000);
    assert!((report.mean_delay - 2.0).abs() < 0.25, "mean delay {}", report.mean_delay);
    // a queue of capacity 100 is never close to full at this load
    assert!(report.queues[0].max_buffered < 100);
}
