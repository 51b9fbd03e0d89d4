//! Remote track search with deterministic fallback.
//!
//! One GET per call, no retries. Whatever goes wrong (connect error, non-2xx,
//! unparsable body, missing `tracks.items`) the caller gets the fallback list
//! and a warning in the log. Individual result fields are defaulted rather
//! than rejecting the record.

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{info, warn};

use crate::catalog::{fallback_tracks, Track};
use crate::config::LookupConfig;

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
pub const UNKNOWN_ALBUM: &str = "Unknown Album";
pub const UNKNOWN_GENRE: &str = "Unknown";
pub const PLACEHOLDER_COVER: &str = "https://via.placeholder.com/300";

pub struct TrackLookup {
    client: reqwest::Client,
    enabled: bool,
    endpoint: String,
    token: Option<String>,
    limit: u32,
    fallback: Vec<Track>,
}

impl TrackLookup {
    pub fn new(config: &LookupConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            enabled: config.enabled,
            endpoint: config.endpoint.clone(),
            token: config.bearer_token(),
            limit: config.limit,
            fallback: fallback_tracks(),
        }
    }

    /// Replace the list returned on failure.
    pub fn with_fallback(mut self, fallback: Vec<Track>) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn fallback(&self) -> &[Track] {
        &self.fallback
    }

    /// Search for tracks. Never fails: any error yields the fallback list.
    pub async fn fetch_tracks(&self, query: &str) -> Vec<Track> {
        if !self.enabled {
            info!("[lookup] disabled; serving fallback");
            return self.fallback.clone();
        }
        match self.try_fetch(query).await {
            Ok(tracks) => {
                info!("[lookup] {} tracks for {:?}", tracks.len(), query);
                tracks
            }
            Err(e) => {
                warn!("[lookup] search failed, using fallback data: {:#}", e);
                self.fallback.clone()
            }
        }
    }

    async fn try_fetch(&self, query: &str) -> Result<Vec<Track>> {
        let limit = self.limit.to_string();
        let mut request = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query), ("type", "track"), ("limit", limit.as_str())])
            .header("Accept", "application/json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.context("Failed to reach search API")?;

        if !response.status().is_success() {
            anyhow::bail!("search API returned status: {}", response.status());
        }

        let body: Value = response
            .json()
            .await
            .context("Failed to parse search API response")?;

        tracks_from_search(&body).context("search response has no tracks.items array")
    }
}

/// Map a search response body to tracks. `None` when the body lacks a
/// `tracks.items` array; individual missing fields are defaulted.
pub fn tracks_from_search(body: &Value) -> Option<Vec<Track>> {
    let items = body.get("tracks")?.get("items")?.as_array()?;
    Some(
        items
            .iter()
            .enumerate()
            .map(|(idx, item)| track_from_item(idx, item))
            .collect(),
    )
}

fn track_from_item(idx: usize, item: &Value) -> Track {
    let text = |v: &Value| {
        v.as_str()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };

    let album = &item["album"];
    let duration_ms = item["duration_ms"].as_u64().unwrap_or(0);

    Track {
        id: text(&item["id"]).unwrap_or_else(|| format!("unknown-{}", idx)),
        title: text(&item["name"]).unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
        artist: text(&item["artists"][0]["name"]).unwrap_or_else(|| UNKNOWN_ARTIST.to_string()),
        album: text(&album["name"]).unwrap_or_else(|| UNKNOWN_ALBUM.to_string()),
        duration: u32::try_from(duration_ms / 1000).unwrap_or(u32::MAX),
        cover_url: text(&album["images"][0]["url"])
            .unwrap_or_else(|| PLACEHOLDER_COVER.to_string()),
        genre: UNKNOWN_GENRE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_item_maps() {
        let body = json!({
            "tracks": { "items": [{
                "id": "abc",
                "name": "Heat Waves",
                "artists": [{ "name": "Glass Animals" }, { "name": "Someone" }],
                "album": { "name": "Dreamland", "images": [{ "url": "https://img/1" }, { "url": "https://img/2" }] },
                "duration_ms": 238_805
            }]}
        });
        let tracks = tracks_from_search(&body).unwrap();
        assert_eq!(tracks.len(), 1);
        let t = &tracks[0];
        assert_eq!(t.id, "abc");
        assert_eq!(t.title, "Heat Waves");
        assert_eq!(t.artist, "Glass Animals");
        assert_eq!(t.album, "Dreamland");
        assert_eq!(t.cover_url, "https://img/1");
        assert_eq!(t.duration, 238);
        assert_eq!(t.genre, UNKNOWN_GENRE);
    }

    #[test]
    fn test_missing_fields_defaulted() {
        let body = json!({ "tracks": { "items": [
            { "id": "only-id" },
            { "name": "", "artists": [], "album": { "images": [] }, "duration_ms": "oops" }
        ]}});
        let tracks = tracks_from_search(&body).unwrap();
        assert_eq!(tracks[0].id, "only-id");
        assert_eq!(tracks[0].title, UNKNOWN_TITLE);
        assert_eq!(tracks[0].artist, UNKNOWN_ARTIST);
        assert_eq!(tracks[0].album, UNKNOWN_ALBUM);
        assert_eq!(tracks[0].cover_url, PLACEHOLDER_COVER);
        assert_eq!(tracks[0].duration, 0);

        assert_eq!(tracks[1].id, "unknown-1");
        assert_eq!(tracks[1].title, UNKNOWN_TITLE);
        assert_eq!(tracks[1].duration, 0);
    }

    #[test]
    fn test_missing_items_is_malformed() {
        assert!(tracks_from_search(&json!({})).is_none());
        assert!(tracks_from_search(&json!({ "tracks": {} })).is_none());
        assert!(tracks_from_search(&json!({ "tracks": { "items": "nope" } })).is_none());
        assert_eq!(tracks_from_search(&json!({ "tracks": { "items": [] } })), Some(vec![]));
    }

    #[tokio::test]
    async fn test_disabled_serves_fallback() {
        let config = LookupConfig {
            enabled: false,
            endpoint: "http://127.0.0.1:1/never".into(),
            ..LookupConfig::default()
        };
        let lookup = TrackLookup::new(&config);
        assert_eq!(lookup.fetch_tracks("x").await, fallback_tracks());
    }
}
