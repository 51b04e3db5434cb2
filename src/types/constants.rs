use crate::types::QueueId;

/// Id of the queue that owns the external arrival stream
pub const HEAD_QUEUE: QueueId = QueueId(1);

/// Default file the runner reads its configuration from
pub const DEFAULT_CONFIG_FILE: &str = "input.txt";

/// One-line result file written after a successful run
pub const OUTPUT_FILE: &str = "output.txt";

/// Default file for the per-event trace when logging to a file
pub const DEFAULT_LOG_FILE: &str = "tandem.log";

/// Display name of a queue
pub fn queue_name(id: QueueId) -> String {
    id.to_string()
}
