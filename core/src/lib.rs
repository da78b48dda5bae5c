//! Core text-processing and metadata matching for the Congressional speech
//! dataset builder.
//!
//! The modules cover the speech normalization chain (cleaning, stopword
//! filtering, stemming, bigram encoding), the fixed vocabulary dictionary,
//! legislator roster matching and the year-partitioned intermediate files
//! shared by the batch jobs.

pub mod calendar;
pub mod corpus;
pub mod error;
pub mod prelude;
pub mod processing;
pub mod store;
pub mod telemetry;
pub mod vocab;

pub use error::{CorpusError, CorpusResult};
pub use prelude::{ProcessingStage, StageInput, StageOutput};
