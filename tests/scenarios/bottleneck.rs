use tandem::types::QueueId;
use tandem::{Simulation, SimulationParameters};

/// Tests a two-stage chain whose second stage is much slower than the first:
/// - Q2 buffers far more packets than Q1
/// - queueing delay is dominated by Q2
/// - every packet entering Q1 eventually reaches Q2 at the instant it leaves Q1
#[test]
fn test_slow_second_stage_dominates_delay() {
    let params = SimulationParameters::new(2.0, vec![0.2, 1.8], 2000)
        .with_q_limit(1000)
        .with_seed(17);
    let mut simulation = Simulation::new(params).expect("Failed to build simulation");
    let report = simulation.run().expect("Run failed");

    let q1 = &report.queues[0];
    let q2 = &report.queues[1];
    println!(
        "[TEST] Q1 delay {:.2} max {}, Q2 delay {:.2} max {}",
        q1.total_queue_delay, q1.max_buffered, q2.total_queue_delay, q2.max_buffered
    );

    assert!(q2.max_buffered > q1.max_buffered);
    assert!(q2.total_queue_delay > 10.0 * q1.total_queue_delay);
    assert!(q2.total_queue_delay > 0.9 * report.total_queue_delay);

    // hand-off: Q2 receives exactly what Q1 has released
    assert_eq!(q2.arrivals, q1.departures);
    assert_eq!(
        simulation.stats().queue(QueueId(2)).unwrap().arrivals,
        simulation.stats().queue(QueueId(1)).unwrap().departures
    );
    assert_eq!(report.processed_pkts, 2000);
}

/// Tests that a long chain only feeds external traffic into the head queue
#[test]
fn test_only_head_receives_external_arrivals() {
    let params = SimulationParameters::new(1.0, vec![0.3, 0.3, 0.3, 0.3], 500).with_seed(2);
    let mut simulation = Simulation::new(params).unwrap().with_event_trace();
    simulation.run().unwrap();

    let trace = simulation.event_trace().unwrap();
    assert!(trace.iter().all(|event| {
        event.kind == tandem::types::EventKind::Departure || event.queue_id == QueueId(1)
    }));

    let queues = simulation.stats().queues();
    for pair in queues.windows(2) {
        assert_eq!(pair[1].arrivals, pair[0].departures);
    }
}
