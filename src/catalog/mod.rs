mod collection;
mod playlist;
mod reference;
mod song;
mod timecode;

pub use collection::{Catalog, Facets, FACET_ANY};
pub use playlist::{bind_playlists, Playlist};
pub use reference::{parse_reference, Reference};
pub use song::{EmbargoPolicy, NormalizeError, RecordSource, Song, SongRow, DURATION_UNKNOWN};
pub use timecode::{format_duration_short, format_timecode, parse_timestamp};
