use serde::Serialize;

use super::collection::Catalog;
use super::song::Song;

/// A named, ordered selection of songs. Entries the playlist table
/// references but the catalog does not contain stay as `None`; the
/// consumer decides how to render the gap.
#[derive(Clone, Serialize, Debug, PartialEq)]
pub struct Playlist {
    pub name: String,
    pub entries: Vec<Option<Song>>,
}

/// Bind a column-oriented playlist table against a built catalog.
///
/// The first row carries one playlist name per column; the remaining
/// rows carry song ids, read down each column. Blank cells are
/// skipped, and rows shorter than the name row contribute nothing to
/// the missing columns.
pub fn bind_playlists(table: &[Vec<String>], catalog: &Catalog) -> Vec<Playlist> {
    let Some((names, id_rows)) = table.split_first() else {
        return Vec::new();
    };
    names
        .iter()
        .enumerate()
        .map(|(column, name)| Playlist {
            name: name.clone(),
            entries: id_rows
                .iter()
                .filter_map(|row| row.get(column))
                .filter(|id| !id.is_empty())
                .map(|id| catalog.find(id).cloned())
                .collect(),
        })
        .collect()
}
