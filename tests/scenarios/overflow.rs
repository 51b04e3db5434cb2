use tandem::types::QueueId;
use tandem::{simulate, SimulationError, SimulationParameters};

/// Tests that a zero-capacity queue overflows on the first arrival that finds it busy
#[test]
fn test_zero_capacity_overflows() {
    let params = SimulationParameters::new(1.0, vec![10.0], 1000).with_q_limit(0).with_seed(9);
    match simulate(params) {
        Err(SimulationError::Overflow { source, mean_service_time, mean_interarrival_time }) => {
            assert_eq!(source.queue_id, QueueId(1));
            assert_eq!(source.name, "Q1");
            assert_eq!(source.capacity, 0);
            assert!(source.time > 0.0);
            assert_eq!(mean_service_time, 10.0);
            assert_eq!(mean_interarrival_time, 1.0);
        }
        Err(e) => panic!("Expected an overflow, got {}", e),
        Ok(report) => panic!("Expected an overflow, run finished with mean delay {}", report.mean_delay),
    }
}

/// Tests that the overflow is reported at the scripted instant in a downstream stage
#[cfg(feature = "test")]
#[test]
fn test_downstream_overflow_is_deterministic() {
    use tandem::Simulation;
    use crate::common::scripted_times;

    let params = SimulationParameters::new(1.0, vec![1.0, 1.0], 100).with_q_limit(0);
    // t=1 arrival, Q1 serves 0.5, next arrival t=2, Q2 serves 5 from t=1.5,
    // Q1 serves 0.5 from t=2, next arrival t=12: Q1 departs at 2.5 into a busy Q2
    let source = scripted_times(&[1.0, 0.5, 1.0, 5.0, 0.5, 10.0]);
    let mut simulation = Simulation::with_source(params, source).unwrap();

    match simulation.run() {
        Err(SimulationError::Overflow { source, .. }) => {
            assert_eq!(source.queue_id, QueueId(2));
            assert!((source.time - 2.5).abs() < 1e-9);
            assert_eq!(
                source.to_string(),
                format!("Q2 overflow at (simulated) time {} (buffer limit 0)", source.time)
            );
        }
        other => panic!("Expected an overflow, got {:?}", other.map(|r| r.mean_delay)),
    }
}
