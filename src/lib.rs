//! Setlist Catalog Library
//!
//! Ingests two CSV datasets (a song registry and a column-oriented
//! playlist table) into an in-memory catalog: a sorted song collection,
//! filter facets for the consuming UI, and playlists bound to the
//! resolved songs.

pub mod catalog;
pub mod config;
pub mod ingestion;

// Re-export commonly used types for convenience
pub use catalog::{Catalog, EmbargoPolicy, Facets, Playlist, Reference, Song, SongRow};
pub use ingestion::{DatasetFetcher, FetchError, HttpFetcher, IngestError, Ingestor, Snapshot};
