use std::fmt;

/// Why a speech file did not make it into the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NonMember,
    Procedural,
    InvalidStart,
    Unmatched,
    Whitespace,
}

/// Per-year counters for speeches kept and skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsRecorder {
    processed: usize,
    non_member: usize,
    procedural: usize,
    invalid_start: usize,
    unmatched: usize,
    whitespace: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_processed(&mut self) {
        self.processed += 1;
    }

    pub fn record_skip(&mut self, reason: SkipReason) {
        let counter = match reason {
            SkipReason::NonMember => &mut self.non_member,
            SkipReason::Procedural => &mut self.procedural,
            SkipReason::InvalidStart => &mut self.invalid_start,
            SkipReason::Unmatched => &mut self.unmatched,
            SkipReason::Whitespace => &mut self.whitespace,
        };
        *counter += 1;
    }

    pub fn processed(&self) -> usize {
        self.processed
    }

    pub fn skipped(&self) -> usize {
        self.non_member + self.procedural + self.invalid_start + self.unmatched + self.whitespace
    }

    /// `(processed, skipped)` counts.
    pub fn snapshot(&self) -> (usize, usize) {
        (self.processed, self.skipped())
    }

    pub fn merge(&mut self, other: &MetricsRecorder) {
        self.processed += other.processed;
        self.non_member += other.non_member;
        self.procedural += other.procedural;
        self.invalid_start += other.invalid_start;
        self.unmatched += other.unmatched;
        self.whitespace += other.whitespace;
    }
}

impl fmt::Display for MetricsRecorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "processed={} non_member={} procedural={} invalid_start={} unmatched={} whitespace={}",
            self.processed,
            self.non_member,
            self.procedural,
            self.invalid_start,
            self.unmatched,
            self.whitespace
        )
    }
}
