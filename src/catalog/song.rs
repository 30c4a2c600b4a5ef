use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::reference::{parse_reference, Reference};
use super::timecode::{format_duration_short, format_timecode, parse_timestamp};

/// Literal token the registry uses for a true boolean cell.
/// The match is exact and case-sensitive; anything else is false.
const TRUE_TOKEN: &str = "TRUE";

/// Placeholder shown when a song's duration cannot be computed.
pub const DURATION_UNKNOWN: &str = "--:--";

/// Errors that reject a registry row outright.
///
/// Identifiers drive playlist resolution and dates drive the sort
/// order, so a row missing either is rejected rather than degraded.
/// Every other malformation falls back to a sentinel value.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("registry row is missing an id")]
    MissingId,

    #[error("song {id}: missing or invalid date {date:?}")]
    InvalidDate { id: String, date: String },
}

/// Availability embargo settings.
///
/// `bypass` honors the raw audio flag even while the embargo is still
/// running. It replaces the original runtime-mutable backdoor flag
/// with an explicit configuration parameter.
#[derive(Debug, Clone, Copy)]
pub struct EmbargoPolicy {
    pub days: i64,
    pub bypass: bool,
}

impl Default for EmbargoPolicy {
    fn default() -> Self {
        EmbargoPolicy {
            days: 5,
            bypass: false,
        }
    }
}

/// One raw row of the song registry CSV. Field names match the
/// registry's column headers.
#[derive(Clone, Deserialize, Debug, Default)]
pub struct SongRow {
    pub id: String,
    pub date: String,
    pub name: String,
    pub localized_name: String,
    pub original_artist: String,
    pub performer: String,
    pub status: String,
    pub language: String,
    pub note: String,
    pub source_id: String,
    pub segment_index: String,
    pub start_time: String,
    pub end_time: String,
    pub reference: String,
    pub reference_cutter: String,
    pub has_audio: String,
    pub has_second_version: String,
}

/// Which archived video and offset a performance came from.
#[derive(Clone, Serialize, Debug, PartialEq, Eq)]
pub struct RecordSource {
    pub source_id: String,
    pub segment_index: u32,
    pub timecode: String,
}

/// One performance of one song, normalized from a registry row.
#[derive(Clone, Serialize, Debug, PartialEq)]
pub struct Song {
    pub date: NaiveDate,
    pub record: RecordSource,
    pub record_start_ms: i64,
    pub name: String,
    pub original_artist: String,
    pub performer: String,
    pub status: String,
    pub language: String,
    pub note: String,
    pub reference: Option<Reference>,
    pub reference_cutter: Option<Reference>,
    pub duration: String,
    pub id: String,
    pub primary_audio_path: String,
    pub secondary_audio_path: String,
    pub audio_available: bool,
    pub days_until_available: i64,
}

impl Song {
    /// Normalize one registry row. Pure: the same row, `today` and
    /// embargo settings always produce the identical record.
    pub fn from_row(
        row: &SongRow,
        today: NaiveDate,
        embargo: EmbargoPolicy,
    ) -> Result<Song, NormalizeError> {
        let id = row.id.trim();
        if id.is_empty() {
            return Err(NormalizeError::MissingId);
        }
        let date = NaiveDate::parse_from_str(row.date.trim(), "%Y-%m-%d").map_err(|_| {
            NormalizeError::InvalidDate {
                id: id.to_owned(),
                date: row.date.clone(),
            }
        })?;

        // An unparseable start time degrades to offset zero, which
        // sorts such rows first within their source video.
        let record_start_ms = match parse_timestamp(&row.start_time) {
            Some(ms) => ms,
            None => {
                debug!("song {id}: unparseable start time {:?}", row.start_time);
                0
            }
        };
        let record = RecordSource {
            source_id: row.source_id.clone(),
            segment_index: row.segment_index.trim().parse().unwrap_or(0),
            timecode: format_timecode(record_start_ms),
        };

        let name = if row.localized_name.is_empty() {
            row.name.clone()
        } else {
            format!("{} ({})", row.name, row.localized_name)
        };

        let days_until_available = embargo.days - (today - date).num_days();
        let mut audio_available = row.has_audio == TRUE_TOKEN;
        if days_until_available > 0 && !embargo.bypass {
            audio_available = false;
        }

        // Duration needs available audio and a parseable end time;
        // otherwise the placeholder stands in.
        let mut duration = DURATION_UNKNOWN.to_owned();
        if audio_available {
            if let Some(end_ms) = parse_timestamp(&row.end_time) {
                duration = format_duration_short(end_ms - record_start_ms);
            }
        }

        let secondary_audio_path = if row.has_second_version == TRUE_TOKEN {
            format!("/treated_songs/{id}.mp3")
        } else {
            String::new()
        };

        Ok(Song {
            date,
            record,
            record_start_ms,
            name,
            original_artist: row.original_artist.clone(),
            performer: row.performer.clone(),
            status: row.status.clone(),
            language: row.language.clone(),
            note: row.note.clone(),
            reference: parse_reference(&row.reference),
            reference_cutter: parse_reference(&row.reference_cutter),
            duration,
            id: id.to_owned(),
            primary_audio_path: format!("/songs/{id}.mp3"),
            secondary_audio_path,
            audio_available,
            days_until_available,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    fn row() -> SongRow {
        SongRow {
            id: "song001".to_owned(),
            date: "2024-03-01".to_owned(),
            name: "Original Title".to_owned(),
            localized_name: String::new(),
            original_artist: "Composer".to_owned(),
            performer: "Alice,Bob".to_owned(),
            status: "complete".to_owned(),
            language: "jp".to_owned(),
            note: String::new(),
            source_id: "BV1abc".to_owned(),
            segment_index: "2".to_owned(),
            start_time: "00:10:00.000".to_owned(),
            end_time: "00:14:30.500".to_owned(),
            reference: "Alice(UID:123)".to_owned(),
            reference_cutter: "nobody".to_owned(),
            has_audio: "TRUE".to_owned(),
            has_second_version: "FALSE".to_owned(),
        }
    }

    #[test]
    fn normalizes_a_plain_row() {
        let song = Song::from_row(&row(), today(), EmbargoPolicy::default()).unwrap();
        assert_eq!(song.id, "song001");
        assert_eq!(song.name, "Original Title");
        assert_eq!(song.record_start_ms, 600_000);
        assert_eq!(song.record.source_id, "BV1abc");
        assert_eq!(song.record.segment_index, 2);
        assert_eq!(song.record.timecode, "00:10:00");
        assert_eq!(song.duration, "4:31");
        assert_eq!(song.primary_audio_path, "/songs/song001.mp3");
        assert_eq!(song.secondary_audio_path, "");
        assert!(song.audio_available);
        assert_eq!(song.days_until_available, -4);
        assert_eq!(
            song.reference,
            Some(Reference {
                name: "Alice".to_owned(),
                id: "123".to_owned(),
            })
        );
        assert_eq!(song.reference_cutter, None);
    }

    #[test]
    fn is_deterministic() {
        let a = Song::from_row(&row(), today(), EmbargoPolicy::default()).unwrap();
        let b = Song::from_row(&row(), today(), EmbargoPolicy::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn appends_localized_name_when_present() {
        let mut r = row();
        r.localized_name = "Localized".to_owned();
        let song = Song::from_row(&r, today(), EmbargoPolicy::default()).unwrap();
        assert_eq!(song.name, "Original Title (Localized)");
    }

    #[test]
    fn embargo_blocks_recent_audio() {
        let mut r = row();
        r.date = "2024-03-07".to_owned(); // three days ago
        let song = Song::from_row(&r, today(), EmbargoPolicy::default()).unwrap();
        assert_eq!(song.days_until_available, 2);
        assert!(!song.audio_available);
        assert_eq!(song.duration, DURATION_UNKNOWN);
    }

    #[test]
    fn bypass_honors_the_raw_flag() {
        let mut r = row();
        r.date = "2024-03-07".to_owned();
        let bypass = EmbargoPolicy {
            days: 5,
            bypass: true,
        };
        let song = Song::from_row(&r, today(), bypass).unwrap();
        assert!(song.audio_available);

        r.has_audio = "FALSE".to_owned();
        let song = Song::from_row(&r, today(), bypass).unwrap();
        assert!(!song.audio_available);
    }

    #[test]
    fn audio_flag_must_be_the_exact_token() {
        for value in ["true", "True", " TRUE", "TRUE ", "1", ""] {
            let mut r = row();
            r.has_audio = value.to_owned();
            let song = Song::from_row(&r, today(), EmbargoPolicy::default()).unwrap();
            assert!(!song.audio_available, "{value:?} must not count as true");
        }
    }

    #[test]
    fn second_version_derives_alternate_path() {
        let mut r = row();
        r.has_second_version = "TRUE".to_owned();
        let song = Song::from_row(&r, today(), EmbargoPolicy::default()).unwrap();
        assert_eq!(song.secondary_audio_path, "/treated_songs/song001.mp3");
    }

    #[test]
    fn malformed_start_time_degrades_to_zero() {
        let mut r = row();
        r.start_time = "ten minutes in".to_owned();
        let song = Song::from_row(&r, today(), EmbargoPolicy::default()).unwrap();
        assert_eq!(song.record_start_ms, 0);
        assert_eq!(song.record.timecode, "00:00:00");
        // the end time still parses, so duration is measured from zero
        assert_eq!(song.duration, "14:31");
    }

    #[test]
    fn malformed_end_time_leaves_duration_unknown() {
        let mut r = row();
        r.end_time = "later".to_owned();
        let song = Song::from_row(&r, today(), EmbargoPolicy::default()).unwrap();
        assert!(song.audio_available);
        assert_eq!(song.duration, DURATION_UNKNOWN);
    }

    #[test]
    fn malformed_segment_degrades_to_zero() {
        let mut r = row();
        r.segment_index = "p2".to_owned();
        let song = Song::from_row(&r, today(), EmbargoPolicy::default()).unwrap();
        assert_eq!(song.record.segment_index, 0);
    }

    #[test]
    fn missing_id_is_rejected() {
        let mut r = row();
        r.id = "  ".to_owned();
        assert!(matches!(
            Song::from_row(&r, today(), EmbargoPolicy::default()),
            Err(NormalizeError::MissingId)
        ));
    }

    #[test]
    fn missing_or_invalid_date_is_rejected() {
        for value in ["", "03/01/2024", "2024-3-1x"] {
            let mut r = row();
            r.date = value.to_owned();
            assert!(matches!(
                Song::from_row(&r, today(), EmbargoPolicy::default()),
                Err(NormalizeError::InvalidDate { .. })
            ));
        }
    }
}
