//! Poll loop configuration.

use std::time::Duration;

/// Timing parameters for the poll-and-fanout loop.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Delay between the end of one cycle and the start of the next.
    pub poll_interval: Duration,

    /// Upper bound on a single vehicle fetch.
    /// A fetch that runs longer counts as a failed cycle.
    pub fetch_timeout: Duration,

    /// Capacity of the command queue from connections to the tracker.
    pub command_buffer: usize,
}

impl TrackerConfig {
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            fetch_timeout: Duration::from_secs(10),
            command_buffer: 256,
        }
    }
}
