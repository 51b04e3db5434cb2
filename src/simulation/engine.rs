//! Event loop driving a tandem network.
//!
//! External packets arrive at the head queue. A packet leaving a queue with a downstream
//! neighbour enters that neighbour at the same simulated instant, handled inside the
//! departure event. The run stops once `num_pkts` packets have entered service at the tail.

use crate::network::{NetworkError, TandemNetwork};
use crate::queue::{ArrivalOutcome, DepartureOutcome};
use crate::scheduler::EventList;
use crate::stats::{SimulationReport, StatAccumulators};
use crate::types::constants::HEAD_QUEUE;
use crate::types::{Event, EventKind, QueueId};
use crate::utils::logging;
use crate::variates::{SeededUniform, TimeDistribution, UniformSource, VariateGenerator};
use super::{SimulationError, SimulationParameters};

/// Runs a seeded simulation to completion
pub fn simulate(params: SimulationParameters) -> Result<SimulationReport, SimulationError> {
    Simulation::new(params)?.run()
}

pub struct Simulation<U: UniformSource = SeededUniform> {
    params: SimulationParameters,
    distribution: TimeDistribution,
    network: TandemNetwork,
    events: EventList,
    stats: StatAccumulators,
    variates: VariateGenerator<U>,
    /// Every dispatched event, in dispatch order, when tracing is on
    trace: Option<Vec<Event>>,
}

impl Simulation<SeededUniform> {
    /// Builds a simulation whose uniform stream is seeded with `params.seed`
    pub fn new(params: SimulationParameters) -> Result<Self, SimulationError> {
        let source = SeededUniform::new(params.seed);
        Self::with_source(params, source)
    }
}

impl<U: UniformSource> Simulation<U> {
    /// Builds the chain, zeroes the accumulators and schedules the first external arrival.
    pub fn with_source(params: SimulationParameters, source: U) -> Result<Self, SimulationError> {
        params.validate()?;
        let network = TandemNetwork::chain(&params.mean_service_times, params.q_limit)?;
        network.validate()?;

        let mut simulation = Self {
            distribution: params.distribution(),
            stats: StatAccumulators::new(&network),
            events: EventList::new(),
            variates: VariateGenerator::new(source),
            trace: None,
            network,
            params,
        };

        let first_arrival = simulation.sample_interarrival();
        simulation.events.schedule(Event::arrival(first_arrival, HEAD_QUEUE))?;
        Ok(simulation)
    }

    /// Records every dispatched event, retrievable with [`Simulation::event_trace`]
    pub fn with_event_trace(mut self) -> Self {
        self.trace = Some(Vec::new());
        self
    }

    /// True once `num_pkts` packets have entered their final service
    pub fn is_finished(&self) -> bool {
        self.stats.processed_pkts() >= self.params.num_pkts
    }

    /// Dispatches the most imminent event and returns it
    pub fn step(&mut self) -> Result<Event, SimulationError> {
        let event = self.events.next()?;
        if let Some(trace) = self.trace.as_mut() {
            trace.push(event);
        }

        match event.kind {
            EventKind::Arrival => self.handle_arrival(event.queue_id)?,
            EventKind::Departure => self.handle_departure(event.queue_id)?,
        }
        Ok(event)
    }

    /// Steps until the run is finished and returns the final report
    pub fn run(&mut self) -> Result<SimulationReport, SimulationError> {
        tracing::info!(
            queues = self.network.len(),
            num_pkts = self.params.num_pkts,
            seed = self.params.seed,
            "Starting tandem simulation"
        );

        while !self.is_finished() {
            if let Err(e) = self.step() {
                tracing::error!(time = self.events.now(), "Simulation aborted: {}", e);
                return Err(e);
            }
        }

        let report = self.report();
        tracing::info!(
            mean_delay = report.mean_delay,
            final_time = report.final_time,
            events = report.events_processed,
            "Tandem simulation finished"
        );
        report.log_final_stats();
        Ok(report)
    }

    /// Snapshot of the accumulators at the current clock
    pub fn report(&self) -> SimulationReport {
        self.stats.report(self.events.now(), self.events.events_dispatched())
    }

    pub fn parameters(&self) -> &SimulationParameters {
        &self.params
    }

    pub fn network(&self) -> &TandemNetwork {
        &self.network
    }

    pub fn stats(&self) -> &StatAccumulators {
        &self.stats
    }

    /// Current simulated time
    pub fn now(&self) -> f64 {
        self.events.now()
    }

    pub fn events(&self) -> &EventList {
        &self.events
    }

    pub fn event_trace(&self) -> Option<&[Event]> {
        self.trace.as_deref()
    }

    pub fn variates(&self) -> &VariateGenerator<U> {
        &self.variates
    }

    // --------------------------------------------------------------------------------------------
    // Event handlers
    // --------------------------------------------------------------------------------------------

    fn handle_arrival(&mut self, queue_id: QueueId) -> Result<(), SimulationError> {
        let now = self.events.now();
        let node = self
            .network
            .node_mut(queue_id)
            .ok_or(NetworkError::QueueNotFound(queue_id))?;

        if logging::is_enabled() {
            logging::log("EVENT", &format!(
                "arrival   {:<4}(sim. time: {}) (queue size: {})",
                node.name(), now, node.buffered()
            ));
        }

        match node.arrive(now) {
            Ok(ArrivalOutcome::StartService) => {
                self.stats.record_arrival(queue_id, 0);
                self.start_service(queue_id)?;
            }
            Ok(ArrivalOutcome::Buffered { buffered }) => {
                self.stats.record_arrival(queue_id, buffered);
            }
            Err(overflow) => {
                let mean_service_time = node.mean_service_time();
                tracing::error!(
                    queue = %overflow.name,
                    time = overflow.time,
                    capacity = overflow.capacity,
                    mean_service_time,
                    mean_interarrival_time = self.params.mean_interarrival_time,
                    "Buffer overflow"
                );
                return Err(SimulationError::Overflow {
                    source: overflow,
                    mean_service_time,
                    mean_interarrival_time: self.params.mean_interarrival_time,
                });
            }
        }

        if queue_id == HEAD_QUEUE {
            let next_arrival = now + self.sample_interarrival();
            self.events.schedule(Event::arrival(next_arrival, HEAD_QUEUE))?;
        }
        Ok(())
    }

    fn handle_departure(&mut self, queue_id: QueueId) -> Result<(), SimulationError> {
        let now = self.events.now();
        let node = self
            .network
            .node_mut(queue_id)
            .ok_or(NetworkError::QueueNotFound(queue_id))?;

        if logging::is_enabled() {
            logging::log("EVENT", &format!(
                "departure {:<4}(sim. time: {}) (queue size: {})",
                node.name(), now, node.buffered()
            ));
        }

        let departure = node.complete_service();
        let downstream = node.downstream();
        self.stats.record_departure(queue_id, departure.served_for);

        // The downstream queue sees the packet before this queue pulls its next one.
        if let Some(index) = downstream {
            self.handle_arrival(QueueId::from_index(index))?;
        }

        if let DepartureOutcome::StartNext { arrived_at } = departure.next {
            self.stats.record_queue_delay(queue_id, now - arrived_at);
            self.start_service(queue_id)?;
        }
        Ok(())
    }

    /// Samples a service time for the packet now at the server of `queue_id` and schedules
    /// its departure. A packet entering service at the tail counts as processed.
    fn start_service(&mut self, queue_id: QueueId) -> Result<(), SimulationError> {
        let now = self.events.now();
        let node = self
            .network
            .node_mut(queue_id)
            .ok_or(NetworkError::QueueNotFound(queue_id))?;

        if node.is_tail() {
            self.stats.record_processed();
        }
        let service_time = self.variates.sample(node.mean_service_time(), self.distribution);
        node.begin_service(service_time);
        self.events.schedule(Event::departure(now + service_time, queue_id))?;
        Ok(())
    }

    fn sample_interarrival(&mut self) -> f64 {
        self.variates.sample(self.params.mean_interarrival_time, self.distribution)
    }
}
