use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::Serialize;

use super::song::{EmbargoPolicy, NormalizeError, Song, SongRow};

/// Sentinel heading every facet list: "no filter".
pub const FACET_ANY: &str = "--";

/// Distinct-value sets for the UI filter controls. Each list starts
/// with [`FACET_ANY`], the rest keeps first-occurrence order.
#[derive(Clone, Serialize, Debug, PartialEq, Eq)]
pub struct Facets {
    pub status: Vec<String>,
    pub language: Vec<String>,
    pub artist: Vec<String>,
    pub month: Vec<String>,
}

/// The normalized song collection: records in display order plus the
/// facets derived from them. Rebuilt from scratch on every ingestion.
#[derive(Clone, Serialize, Debug)]
pub struct Catalog {
    pub songs: Vec<Song>,
    pub facets: Facets,
}

impl Catalog {
    /// Normalize every registry row, sort, and derive facets.
    ///
    /// A row missing its id or date rejects the whole dataset; the
    /// sort key and playlist resolution cannot tolerate gaps.
    pub fn build(
        rows: &[SongRow],
        today: NaiveDate,
        embargo: EmbargoPolicy,
    ) -> Result<Catalog, NormalizeError> {
        let mut songs = rows
            .iter()
            .map(|row| Song::from_row(row, today, embargo))
            .collect::<Result<Vec<_>, _>>()?;
        songs.sort_by(compare_songs);
        let facets = derive_facets(&songs);
        Ok(Catalog { songs, facets })
    }

    /// Exact-match lookup by song id.
    pub fn find(&self, id: &str) -> Option<&Song> {
        self.songs.iter().find(|song| song.id == id)
    }
}

/// Display order: most recent broadcasts first; within one broadcast,
/// source videos in ascending byte order of their identifiers, then
/// segments and in-video offsets in natural ascending order.
///
/// Identifier collation is plain lexicographic byte comparison of the
/// id string. Any stable total order satisfies the contract; bytewise
/// comparison is deterministic and locale-independent.
fn compare_songs(a: &Song, b: &Song) -> Ordering {
    b.date
        .cmp(&a.date)
        .then_with(|| a.record.source_id.cmp(&b.record.source_id))
        .then_with(|| a.record.segment_index.cmp(&b.record.segment_index))
        .then_with(|| a.record_start_ms.cmp(&b.record_start_ms))
}

fn derive_facets(songs: &[Song]) -> Facets {
    let mut facets = Facets {
        status: vec![FACET_ANY.to_owned()],
        language: vec![FACET_ANY.to_owned()],
        artist: vec![FACET_ANY.to_owned()],
        month: vec![FACET_ANY.to_owned()],
    };
    for song in songs {
        push_distinct(&mut facets.status, &song.status);
        push_distinct(&mut facets.language, &song.language);
        // multi-performer cells are comma-separated
        for artist in song.performer.split(',') {
            push_distinct(&mut facets.artist, artist);
        }
        push_distinct(&mut facets.month, &song.date.format("%Y-%m").to_string());
    }
    facets
}

fn push_distinct(values: &mut Vec<String>, value: &str) {
    if !values.iter().any(|v| v == value) {
        values.push(value.to_owned());
    }
}
