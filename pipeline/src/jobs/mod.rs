pub mod combine;
pub mod partisan_dummies;
pub mod term_frequencies;

pub use combine::CombineSummary;
pub use partisan_dummies::PartisanSummary;
pub use term_frequencies::TermFrequencySummary;
