//! Fetches the two CSV datasets and runs them through the catalog
//! pipeline: normalize every registry row, build the sorted collection
//! and its facets, then bind the playlist table against it.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::catalog::{
    bind_playlists, Catalog, EmbargoPolicy, Facets, NormalizeError, Playlist, Song, SongRow,
};

/// Errors from fetching one dataset.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{url} returned status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
}

/// Errors that fail a whole ingestion run. There is no partial
/// result: either both datasets transform cleanly or nothing is
/// exposed to the caller.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("malformed csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("rejected registry row: {0}")]
    Normalize(#[from] NormalizeError),
}

/// Seam for retrieving a dataset as text. The HTTP implementation is
/// the production one; tests substitute an in-memory fetcher.
#[async_trait]
pub trait DatasetFetcher: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError>;
}

/// HTTP dataset fetcher backed by a shared reqwest client.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout_sec: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_sec))
            .build()
            .expect("Failed to create HTTP client");
        Self { client }
    }
}

#[async_trait]
impl DatasetFetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_owned(),
                status,
            });
        }
        Ok(response.text().await?)
    }
}

/// Everything one ingestion run produces. A fresh value every time;
/// the caller replaces whatever it held before.
#[derive(Clone, Serialize, Debug)]
pub struct Snapshot {
    pub songs: Vec<Song>,
    pub facets: Facets,
    pub playlists: Vec<Playlist>,
}

/// Runs the ingestion pipeline against a pair of dataset URLs.
pub struct Ingestor<F> {
    fetcher: F,
    registry_url: String,
    playlist_url: String,
    embargo: EmbargoPolicy,
}

impl<F: DatasetFetcher> Ingestor<F> {
    pub fn new(
        fetcher: F,
        registry_url: String,
        playlist_url: String,
        embargo: EmbargoPolicy,
    ) -> Self {
        Self {
            fetcher,
            registry_url,
            playlist_url,
            embargo,
        }
    }

    /// Ingest both datasets, with availability computed against the
    /// local calendar day.
    pub async fn ingest(&self) -> Result<Snapshot, IngestError> {
        self.ingest_at(chrono::Local::now().date_naive()).await
    }

    /// Ingest both datasets against an explicit `today`. The two
    /// fetches run concurrently and both must succeed before any
    /// transformation starts.
    pub async fn ingest_at(&self, today: NaiveDate) -> Result<Snapshot, IngestError> {
        let (registry_text, playlist_text) = tokio::try_join!(
            self.fetcher.fetch_text(&self.registry_url),
            self.fetcher.fetch_text(&self.playlist_url),
        )?;

        let rows = parse_registry(&registry_text)?;
        info!("Registry fetched: {} rows", rows.len());

        let catalog = Catalog::build(&rows, today, self.embargo)?;

        let table = parse_playlist_table(&playlist_text)?;
        let playlists = bind_playlists(&table, &catalog);
        info!(
            "Catalog ready: {} songs, {} playlists",
            catalog.songs.len(),
            playlists.len()
        );

        let Catalog { songs, facets } = catalog;
        Ok(Snapshot {
            songs,
            facets,
            playlists,
        })
    }
}

/// Parse the row-oriented song registry (first line is the header).
fn parse_registry(text: &str) -> Result<Vec<SongRow>, csv::Error> {
    csv::Reader::from_reader(text.as_bytes())
        .deserialize()
        .collect()
}

/// Parse the column-oriented playlist table. No header row in the CSV
/// sense, and columns may be ragged.
fn parse_playlist_table(text: &str) -> Result<Vec<Vec<String>>, csv::Error> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes())
        .records()
        .map(|record| record.map(|r| r.iter().map(str::to_owned).collect()))
        .collect()
}
