use crate::network::{NetworkError, TandemNetwork};
use crate::types::QueueId;

/// Tests the chain builder:
/// - Ids are assigned from 1 in order
/// - Each queue links to the next, the last one is the tail
#[test]
fn test_chain_links_queues_in_order() {
    let network = TandemNetwork::chain(&[1.0, 2.0, 3.0], 10).expect("Failed to build chain");
    assert_eq!(network.len(), 3);

    let names: Vec<&str> = network.nodes().iter().map(|q| q.name()).collect();
    assert_eq!(names, vec!["Q1", "Q2", "Q3"]);

    assert_eq!(network.head().map(|q| q.id()), Some(QueueId(1)));
    assert_eq!(network.node(QueueId(1)).unwrap().downstream(), Some(1));
    assert_eq!(network.node(QueueId(2)).unwrap().downstream(), Some(2));
    assert!(network.node(QueueId(3)).unwrap().is_tail());
    assert_eq!(network.node(QueueId(2)).unwrap().mean_service_time(), 2.0);
}

#[test]
fn test_single_queue_chain_is_valid() {
    let network = TandemNetwork::chain(&[1.0], 0).unwrap();
    assert!(network.head().unwrap().is_tail());
    assert!(network.validate().is_ok());
}

#[test]
fn test_empty_chain_is_rejected() {
    assert_eq!(TandemNetwork::chain(&[], 5).unwrap_err(), NetworkError::Empty);
}

/// Tests connection errors:
/// - Connecting an upstream twice
/// - Feeding a downstream twice
/// - Self loops, unknown ids and the head as a downstream
#[test]
fn test_connect_rejects_non_linear_topologies() {
    let mut network = TandemNetwork::new();
    let q1 = network.add_queue(1.0, 5);
    let q2 = network.add_queue(1.0, 5);
    let q3 = network.add_queue(1.0, 5);

    network.connect(q1, q2).unwrap();
    assert_eq!(network.connect(q1, q3), Err(NetworkError::AlreadyConnected(q1)));
    assert_eq!(network.connect(q3, q2), Err(NetworkError::AlreadyFed(q2)));
    assert_eq!(network.connect(q3, q3), Err(NetworkError::SelfLoop(q3)));
    assert_eq!(network.connect(q3, q1), Err(NetworkError::HeadAsDownstream(q1)));
    assert_eq!(network.connect(q2, QueueId(9)), Err(NetworkError::QueueNotFound(QueueId(9))));
    assert_eq!(network.connect(QueueId(0), q2), Err(NetworkError::QueueNotFound(QueueId(0))));
}

/// Tests that loops are refused and validation spots queues the head cannot reach
#[test]
fn test_validate_reports_unreachable_queue() {
    let mut network = TandemNetwork::new();
    let q1 = network.add_queue(1.0, 5);
    let q2 = network.add_queue(1.0, 5);
    let q3 = network.add_queue(1.0, 5);
    network.connect(q2, q3).unwrap();
    assert_eq!(network.connect(q3, q2), Err(NetworkError::Cycle(q3, q2)));

    assert_eq!(network.validate(), Err(NetworkError::Unreachable(q2)));
    network.connect(q1, q2).unwrap();
    assert!(network.validate().is_ok());
}

/// Tests that the unassigned id 0 never resolves to a queue
#[test]
fn test_lookup_rejects_id_zero() {
    let mut network = TandemNetwork::chain(&[1.0, 2.0], 5).expect("Failed to build chain");
    assert!(network.node(QueueId(0)).is_none());
    assert!(network.node_mut(QueueId(0)).is_none());
    assert!(network.node(QueueId(3)).is_none());
    assert_eq!(network.node(QueueId(1)).unwrap().name(), "Q1");
}
