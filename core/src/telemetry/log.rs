use std::time::{Duration, Instant};

use log::{info, trace};

use crate::calendar::Chamber;

/// Progress logger for the year-by-year batch loops.
pub struct LogManager {
    started: Instant,
}

impl LogManager {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn record(&self, message: &str) {
        info!("{}", message);
    }

    pub fn trace(&self, message: &str) {
        trace!("{}", message);
    }

    /// Logs the chamber-year about to be processed and the running time.
    pub fn record_progress(&self, chamber: Chamber, year: i32) {
        info!("Chamber: {}. Year: {}", chamber, year);
        info!("Elapsed time: {}", format_elapsed(self.started.elapsed()));
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Formats a duration as `{d}d:{h}h:{mm}m:{ss}s`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let mins = (total % 3_600) / 60;
    let secs = total % 60;
    format!("{}d:{}h:{:0>2}m:{:0>2}s", days, hours, mins, secs)
}
