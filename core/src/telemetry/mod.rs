pub mod log;
pub mod metrics;

pub use self::log::{format_elapsed, LogManager};
pub use metrics::{MetricsRecorder, SkipReason};
