use crate::simulation::{Simulation, SimulationError, SimulationParameters};
use crate::types::{EventKind, QueueId};
use crate::variates::ScriptedUniform;

const EPS: f64 = 1e-9;

/// Uniform values that make a mean-1 exponential return exactly `times`
fn scripted(times: &[f64]) -> ScriptedUniform {
    ScriptedUniform::new(times.iter().map(|t| 1.0 - (-t).exp()).collect())
}

/// Tests a hand-traced single-queue run:
/// - first arrival at t=1, served for 2
/// - second arrival at t=1.5 waits in the buffer until t=3
/// - the run stops as soon as the second packet enters service
#[test]
fn test_single_queue_hand_trace() {
    let params = SimulationParameters::new(1.0, vec![1.0], 2).with_q_limit(10);
    // interarrival 1.0, service 2.0, interarrival 0.5, interarrival 3.0, service 1.0
    let source = scripted(&[1.0, 2.0, 0.5, 3.0, 1.0]);
    let mut simulation = Simulation::with_source(params, source)
        .expect("Failed to build simulation")
        .with_event_trace();

    let report = simulation.run().expect("Run failed");

    assert_eq!(report.processed_pkts, 2);
    assert_eq!(report.events_processed, 3);
    assert!((report.final_time - 3.0).abs() < EPS);
    assert!((report.total_queue_delay - 1.5).abs() < EPS);
    assert!((report.total_service - 2.0).abs() < EPS);
    assert!((report.mean_delay - 1.75).abs() < EPS);

    let kinds: Vec<EventKind> = simulation
        .event_trace()
        .unwrap()
        .iter()
        .map(|event| event.kind)
        .collect();
    assert_eq!(kinds, vec![EventKind::Arrival, EventKind::Arrival, EventKind::Departure]);
    assert_eq!(simulation.variates().draws(), 5);

    let q1 = simulation.stats().queue(QueueId(1)).unwrap();
    assert_eq!(q1.arrivals, 2);
    assert_eq!(q1.departures, 1);
    assert_eq!(q1.max_buffered, 1);
}

/// Tests the zero-latency hand-off between stages:
/// - after Q1's departure event, Q2 has already accepted the packet at the same instant
/// - no separate arrival event is dispatched for Q2
#[test]
fn test_departure_hands_packet_downstream_immediately() {
    let params = SimulationParameters::new(1.0, vec![1.0, 1.0], 5);
    // interarrival 1.0, Q1 service 0.5, interarrival 4.0, Q2 service 2.0
    let source = scripted(&[1.0, 0.5, 4.0, 2.0]);
    let mut simulation = Simulation::with_source(params, source).expect("Failed to build simulation");

    let first = simulation.step().expect("Arrival failed");
    assert_eq!(first.kind, EventKind::Arrival);
    assert_eq!(simulation.stats().processed_pkts(), 0);

    let second = simulation.step().expect("Departure failed");
    assert_eq!(second.kind, EventKind::Departure);
    assert_eq!(second.queue_id, QueueId(1));
    assert!((simulation.now() - 1.5).abs() < EPS);

    let q2 = simulation.network().node(QueueId(2)).unwrap();
    assert!(q2.is_busy());
    assert_eq!(simulation.stats().queue(QueueId(2)).unwrap().arrivals, 1);
    assert_eq!(simulation.stats().processed_pkts(), 1);
    assert!(!simulation.network().node(QueueId(1)).unwrap().is_busy());

    // Q2's departure (t=3.5) precedes the next external arrival (t=5.0)
    let next = simulation.events().peek().unwrap();
    assert_eq!(next.kind, EventKind::Departure);
    assert_eq!(next.queue_id, QueueId(2));
    assert!((next.time - 3.5).abs() < EPS);
}

/// Tests that a zero-capacity queue aborts on the first packet finding it busy
#[test]
fn test_overflow_aborts_run() {
    let params = SimulationParameters::new(1.0, vec![5.0], 10).with_q_limit(0);
    // interarrival 1.0, service 5.0 (mean 5.0), interarrival 1.0
    let source = scripted(&[1.0, 1.0, 1.0]);
    let mut simulation = Simulation::with_source(params, source).expect("Failed to build simulation");

    match simulation.run() {
        Err(SimulationError::Overflow { source, mean_service_time, mean_interarrival_time }) => {
            assert_eq!(source.queue_id, QueueId(1));
            assert_eq!(source.capacity, 0);
            assert!((source.time - 2.0).abs() < EPS);
            assert_eq!(mean_service_time, 5.0);
            assert_eq!(mean_interarrival_time, 1.0);
        }
        other => panic!("Expected overflow, got {:?}", other.map(|r| r.mean_delay)),
    }
}

/// Tests that invalid parameters are rejected before anything is scheduled
#[test]
fn test_invalid_parameters_rejected() {
    let params = SimulationParameters::new(1.0, vec![], 10);
    assert!(matches!(Simulation::new(params), Err(SimulationError::Configuration(_))));
}

/// Tests that the same seed reproduces the same event trace and result
#[test]
fn test_seeded_runs_are_reproducible() {
    let params = SimulationParameters::new(1.0, vec![0.6, 0.8], 300).with_seed(42);

    let mut first = Simulation::new(params.clone()).unwrap().with_event_trace();
    let mut second = Simulation::new(params).unwrap().with_event_trace();
    let first_report = first.run().unwrap();
    let second_report = second.run().unwrap();

    assert_eq!(first_report, second_report);
    let first_times: Vec<f64> = first.event_trace().unwrap().iter().map(|e| e.time).collect();
    let second_times: Vec<f64> = second.event_trace().unwrap().iter().map(|e| e.time).collect();
    assert_eq!(first_times, second_times);
}

/// Tests step-by-step invariants of a seeded run:
/// - the clock never goes backwards
/// - the totals never decrease
/// - the run stops with exactly `num_pkts` processed
#[test]
fn test_accumulators_are_monotonic() {
    let params = SimulationParameters::new(1.0, vec![0.4, 0.7, 0.3], 200).with_seed(3);
    let mut simulation = Simulation::new(params).unwrap();

    let mut last_time = 0.0;
    let mut last_delay = 0.0;
    let mut last_service = 0.0;
    while !simulation.is_finished() {
        let event = simulation.step().unwrap();
        assert!(event.time >= last_time);
        assert!(simulation.stats().total_queue_delay() >= last_delay);
        assert!(simulation.stats().total_service() >= last_service);
        last_time = event.time;
        last_delay = simulation.stats().total_queue_delay();
        last_service = simulation.stats().total_service();
    }
    assert_eq!(simulation.stats().processed_pkts(), 200);
}

/// Tests that truncated interarrival and service times stay inside their bounds
#[test]
fn test_truncated_times_stay_in_bounds() {
    let params = SimulationParameters::new(2.0, vec![0.5], 500)
        .with_seed(11)
        .with_truncation(0.5, 1.5);
    let mut simulation = Simulation::new(params).unwrap().with_event_trace();
    let report = simulation.run().unwrap();

    let q1 = &report.queues[0];
    assert!(q1.departures > 0);
    assert!(q1.total_service >= 0.5 * q1.departures as f64);
    assert!(q1.total_service <= 1.5 * q1.departures as f64);

    let arrivals: Vec<f64> = simulation
        .event_trace()
        .unwrap()
        .iter()
        .filter(|e| e.kind == EventKind::Arrival)
        .map(|e| e.time)
        .collect();
    assert!(arrivals[0] >= 0.5);
    for pair in arrivals.windows(2) {
        let gap = pair[1] - pair[0];
        assert!(gap >= 0.5 - EPS && gap <= 1.5 + EPS);
    }
}
