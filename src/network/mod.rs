//! Topology of the pipeline.
//!
//! The network owns every queue in a single `Vec`; downstream links are indices into it.
//! Queue ids are handed out in creation order starting at 1, and the first queue created
//! is the head, the only queue fed by the external arrival stream.

use thiserror::Error;
use crate::queue::QueueNode;
use crate::types::{constants, QueueId};

#[cfg(test)]
mod tests;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum NetworkError {
    #[error("Queue not found: {0}")]
    QueueNotFound(QueueId),
    #[error("{0} was already connected to a queue")]
    AlreadyConnected(QueueId),
    #[error("{0} already has an upstream queue")]
    AlreadyFed(QueueId),
    #[error("Cannot connect {0} to itself")]
    SelfLoop(QueueId),
    #[error("Head queue {0} cannot be downstream of another queue")]
    HeadAsDownstream(QueueId),
    #[error("Connecting {0} to {1} would close a loop")]
    Cycle(QueueId, QueueId),
    #[error("Network has no queues")]
    Empty,
    #[error("{0} is not reachable from the head queue")]
    Unreachable(QueueId),
}

/// A linear chain of queues
#[derive(Debug, Clone, Default)]
pub struct TandemNetwork {
    /// All queues, position `i` holds the queue with id `i + 1`
    nodes: Vec<QueueNode>,
    /// Upstream index of each queue, if it has been connected
    upstream: Vec<Option<usize>>,
}

impl TandemNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds `Q1 -> Q2 -> ... -> Qn` with one queue per entry of `mean_service_times`,
    /// every queue holding at most `capacity` waiting packets.
    pub fn chain(mean_service_times: &[f64], capacity: usize) -> Result<Self, NetworkError> {
        let mut network = Self::new();
        let ids: Vec<QueueId> = mean_service_times
            .iter()
            .map(|mean| network.add_queue(*mean, capacity))
            .collect();
        for pair in ids.windows(2) {
            network.connect(pair[0], pair[1])?;
        }
        network.validate()?;
        Ok(network)
    }

    /// Adds an unconnected queue and returns its id
    pub fn add_queue(&mut self, mean_service_time: f64, capacity: usize) -> QueueId {
        let id = QueueId::from_index(self.nodes.len());
        self.nodes.push(QueueNode::new(id, mean_service_time, capacity));
        self.upstream.push(None);
        id
    }

    /// Connects `upstream -> downstream`: every packet leaving `upstream` arrives at
    /// `downstream` at the same instant.
    pub fn connect(&mut self, upstream: QueueId, downstream: QueueId) -> Result<(), NetworkError> {
        let up = self.index_of(upstream)?;
        let down = self.index_of(downstream)?;
        if up == down {
            return Err(NetworkError::SelfLoop(upstream));
        }
        if downstream == constants::HEAD_QUEUE {
            return Err(NetworkError::HeadAsDownstream(downstream));
        }
        if self.nodes[up].downstream().is_some() {
            return Err(NetworkError::AlreadyConnected(upstream));
        }
        if self.upstream[down].is_some() {
            return Err(NetworkError::AlreadyFed(downstream));
        }
        if self.reaches(down, up) {
            return Err(NetworkError::Cycle(upstream, downstream));
        }
        self.nodes[up].set_downstream(down);
        self.upstream[down] = Some(up);
        Ok(())
    }

    /// Checks that the queues form one chain starting at the head
    pub fn validate(&self) -> Result<(), NetworkError> {
        if self.nodes.is_empty() {
            return Err(NetworkError::Empty);
        }
        let mut visited = vec![false; self.nodes.len()];
        let mut current = constants::HEAD_QUEUE.index();
        while let Some(index) = current {
            if visited[index] {
                break;
            }
            visited[index] = true;
            current = self.nodes[index].downstream();
        }
        match visited.iter().position(|seen| !seen) {
            Some(index) => Err(NetworkError::Unreachable(QueueId::from_index(index))),
            None => Ok(()),
        }
    }

    /// The queue that receives external arrivals
    pub fn head(&self) -> Option<&QueueNode> {
        self.nodes.first()
    }

    pub fn node(&self, id: QueueId) -> Option<&QueueNode> {
        self.nodes.get(id.index()?)
    }

    pub fn node_mut(&mut self, id: QueueId) -> Option<&mut QueueNode> {
        self.nodes.get_mut(id.index()?)
    }

    pub(crate) fn node_at_mut(&mut self, index: usize) -> &mut QueueNode {
        &mut self.nodes[index]
    }

    pub fn nodes(&self) -> &[QueueNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// True if following downstream links from `from` arrives at `to`
    fn reaches(&self, from: usize, to: usize) -> bool {
        let mut current = Some(from);
        let mut hops = 0;
        while let Some(index) = current {
            if index == to {
                return true;
            }
            hops += 1;
            if hops > self.nodes.len() {
                return false;
            }
            current = self.nodes[index].downstream();
        }
        false
    }

    fn index_of(&self, id: QueueId) -> Result<usize, NetworkError> {
        id.index()
            .filter(|index| *index < self.nodes.len())
            .ok_or(NetworkError::QueueNotFound(id))
    }
}
