//! Process-wide logging setup for the dashboard binary.

/// Subscriber configuration (filter, output format).
pub mod tracing;

pub use tracing::LogFormat;

/// Install the subscriber with the `info` filter and the format chosen by
/// `STOCKROOM_LOG_FORMAT`.
///
/// Safe to call more than once; later calls do nothing.
pub fn init() {
    tracing::init(tracing::DEFAULT_FILTER, LogFormat::from_env());
}
