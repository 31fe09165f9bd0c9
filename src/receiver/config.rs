use std::time::Duration;

/// Configuration for the receive operation.
///
/// The reference client sent requests with no timeout at all, which leaves a
/// caller hanging on a stalled connection. Every receiver built by this crate
/// carries an explicit request timeout instead.
#[derive(Debug, Clone)]
pub struct ReceiverConfig {
    /// Upper bound on one complete request/response round trip.
    pub request_timeout: Duration,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        ReceiverConfig {
            request_timeout: Duration::from_secs(30),
        }
    }
}
