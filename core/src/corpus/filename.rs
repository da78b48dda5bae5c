use once_cell::sync::Lazy;
use regex::Regex;

static SPEAKER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[HS]_([^_]+)_([^_]+)_([^_]+)").expect("valid regex"));

/// Pseudo-states used for procedural speakers rather than members.
const PROCEDURAL_STATES: [&str; 3] = ["CHAIRMAN", "SPEAKER", "NULL"];

/// Identity of the member who delivered a speech, as encoded in its file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeakerKey {
    pub state: String,
    pub last_name: String,
    pub start: i64,
}

/// Outcome of parsing a speech file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechFilename {
    Member(SpeakerKey),
    /// Not in `<state>_<name>_<start>` form, so not spoken by a member.
    NonMember,
    /// Spoken from the chair or by an unidentified speaker.
    Procedural(String),
    /// Member-shaped name whose start field is not a year.
    InvalidStart(String),
}

/// Parses names such as `1994-01-25_H_CA_PELOSI_1987_0001.txt`.
///
/// The last name and start field are upper-cased; the state is kept verbatim.
pub fn parse_speech_filename(filename: &str) -> SpeechFilename {
    let Some(captures) = SPEAKER_PATTERN.captures(filename) else {
        return SpeechFilename::NonMember;
    };

    let state = captures[1].to_string();
    if PROCEDURAL_STATES.contains(&state.as_str()) {
        return SpeechFilename::Procedural(state);
    }

    let last_name = captures[2].to_uppercase();
    let start_field = captures[3].to_uppercase();
    match start_field.parse::<i64>() {
        Ok(start) => SpeechFilename::Member(SpeakerKey {
            state,
            last_name,
            start,
        }),
        Err(_) => SpeechFilename::InvalidStart(start_field),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_filename_yields_speaker_key() {
        let parsed = parse_speech_filename("1994-01-25_H_CA_pelosi_1987_0001.txt");
        assert_eq!(
            parsed,
            SpeechFilename::Member(SpeakerKey {
                state: "CA".into(),
                last_name: "PELOSI".into(),
                start: 1987,
            })
        );
    }

    #[test]
    fn procedural_speakers_are_flagged() {
        assert_eq!(
            parse_speech_filename("S_SPEAKER_NULL_NULL_1.txt"),
            SpeechFilename::Procedural("SPEAKER".into())
        );
        assert_eq!(
            parse_speech_filename("H_NULL_X_1990_2.txt"),
            SpeechFilename::Procedural("NULL".into())
        );
    }

    #[test]
    fn unstructured_names_are_not_members() {
        assert_eq!(parse_speech_filename("prayer.txt"), SpeechFilename::NonMember);
        assert_eq!(parse_speech_filename("H_CA_SMITH"), SpeechFilename::NonMember);
    }

    #[test]
    fn non_numeric_start_is_reported() {
        assert_eq!(
            parse_speech_filename("H_NY_JONES_1990.txt"),
            SpeechFilename::InvalidStart("1990.TXT".into())
        );
    }
}
