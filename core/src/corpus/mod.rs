pub mod filename;
pub mod record;
pub mod roster;

pub use filename::{parse_speech_filename, SpeakerKey, SpeechFilename};
pub use record::SpeechRecord;
pub use roster::{Roster, RosterEntry};
