//! Static catalog: mock tracks, playlist shelves and the fallback data served
//! when the remote lookup is unavailable.

use serde::{Deserialize, Serialize};

// ── Public types ──────────────────────────────────────────────────────────────

/// A single playable unit. Field names serialize in camelCase so persisted
/// ledgers keep the same structural format as the page's local storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub album: String,
    /// Length in whole seconds.
    pub duration: u32,
    pub cover_url: String,
    pub genre: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: String,
    pub title: String,
    pub description: String,
    pub cover_url: String,
    pub track_count: u32,
    pub plays: u64,
}

impl Playlist {
    /// Card footer label, e.g. `12500` plays → `"13K plays"`.
    pub fn plays_label(&self) -> String {
        let thousands = (self.plays as f64 / 1000.0).round() as u64;
        format!("{}K plays", thousands)
    }
}

/// A titled horizontal row of playlists on the home page.
#[derive(Debug, Clone, Copy)]
pub struct Shelf<'a> {
    pub title: &'static str,
    pub playlists: &'a [Playlist],
}

/// Everything the home page renders before any network data arrives.
/// Loaded once; never mutated.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub tracks: Vec<Track>,
    pub listen_now: Vec<Playlist>,
    pub trending: Vec<Playlist>,
    pub chart_top: Vec<Playlist>,
    pub recently_played: Vec<Playlist>,
}

impl Catalog {
    pub fn builtin() -> Self {
        Self {
            tracks: mock_tracks(),
            listen_now: listen_now_playlists(),
            trending: trending_playlists(),
            chart_top: chart_top_playlists(),
            recently_played: recently_played_playlists(),
        }
    }

    pub fn track(&self, id: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    /// Shelves in page order.
    pub fn shelves(&self) -> [Shelf<'_>; 4] {
        [
            Shelf { title: "Listen Now", playlists: &self.listen_now },
            Shelf { title: "Trending", playlists: &self.trending },
            Shelf { title: "Chart Toppers", playlists: &self.chart_top },
            Shelf { title: "Recently Played", playlists: &self.recently_played },
        ]
    }
}

// ── Fallback data ─────────────────────────────────────────────────────────────

/// Tracks substituted whenever the remote lookup fails. Deterministic: every
/// call returns the same list in the same order.
pub fn fallback_tracks() -> Vec<Track> {
    [
        ("1", "Blinding Lights", "The Weeknd", "After Hours", 200, UNSPLASH_DBA8, "Synthwave"),
        ("2", "Levitating", "Dua Lipa", "Future Nostalgia", 203, UNSPLASH_4A5F, "Pop"),
        ("3", "As It Was", "Harry Styles", "Harry's House", 173, UNSPLASH_04BF, "Pop"),
        ("4", "Anti-Hero", "Taylor Swift", "Midnights", 228, UNSPLASH_D835, "Pop"),
        ("5", "Heat Waves", "Glass Animals", "Dreamland", 239, UNSPLASH_491D, "Indie"),
        ("6", "Sunroof", "Nicky Youre", "Single", 215, UNSPLASH_D7CD, "Pop"),
    ]
    .into_iter()
    .map(track)
    .collect()
}

pub fn fallback_playlists() -> Vec<Playlist> {
    [
        ("p1", "Student Study Beats", "Focus music for studying", UNSPLASH_52AD, 50, 12_500),
        ("p2", "Trending Now", "What students are listening to", UNSPLASH_DBA8, 40, 25_000),
        ("p3", "Chill Vibes", "Relax and unwind", UNSPLASH_4A5F, 60, 35_000),
    ]
    .into_iter()
    .map(playlist)
    .collect()
}

/// Trending tracks. There is no live chart source, so this is the fallback list.
pub fn trending_tracks() -> Vec<Track> {
    fallback_tracks()
}

pub fn featured_playlists() -> Vec<Playlist> {
    fallback_playlists()
}

/// Featured playlists whose title contains `category`, ignoring case.
pub fn playlists_by_category(category: &str) -> Vec<Playlist> {
    let needle = category.to_lowercase();
    fallback_playlists()
        .into_iter()
        .filter(|p| p.title.to_lowercase().contains(&needle))
        .collect()
}

// ── Mock page data ────────────────────────────────────────────────────────────

const UNSPLASH_DBA8: &str =
    "https://images.unsplash.com/photo-1470225620780-dba8ba36b745?w=300&h=300&fit=crop";
const UNSPLASH_04BF: &str =
    "https://images.unsplash.com/photo-1459749411175-04bf5292ceea?w=300&h=300&fit=crop";
const UNSPLASH_D835: &str =
    "https://images.unsplash.com/photo-1511379938547-c1f69b13d835?w=300&h=300&fit=crop";
const UNSPLASH_491D: &str =
    "https://images.unsplash.com/photo-1487180144351-b8472da7d491?w=300&h=300&fit=crop";
const UNSPLASH_4A5F: &str =
    "https://images.unsplash.com/photo-1493225457124-a3eb161ffa5f?w=300&h=300&fit=crop";
const UNSPLASH_F032: &str =
    "https://images.unsplash.com/photo-1484704849700-f032a568e944?w=300&h=300&fit=crop";
const UNSPLASH_B849: &str =
    "https://images.unsplash.com/photo-1506157786151-b8491531f063?w=300&h=300&fit=crop";
const UNSPLASH_D7CD: &str =
    "https://images.unsplash.com/photo-1514525253161-7a46d19cd819?w=300&h=300&fit=crop";
const UNSPLASH_52AD: &str =
    "https://images.unsplash.com/photo-1505470468204-1002860e5d52?w=300&h=300&fit=crop";

type TrackRow = (&'static str, &'static str, &'static str, &'static str, u32, &'static str, &'static str);
type PlaylistRow = (&'static str, &'static str, &'static str, &'static str, u32, u64);

fn track((id, title, artist, album, duration, cover_url, genre): TrackRow) -> Track {
    Track {
        id: id.to_string(),
        title: title.to_string(),
        artist: artist.to_string(),
        album: album.to_string(),
        duration,
        cover_url: cover_url.to_string(),
        genre: genre.to_string(),
    }
}

fn playlist((id, title, description, cover_url, track_count, plays): PlaylistRow) -> Playlist {
    Playlist {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        cover_url: cover_url.to_string(),
        track_count,
        plays,
    }
}

fn mock_tracks() -> Vec<Track> {
    [
        ("1", "Midnight Dreams", "Luna Echo", "Neon Nights", 243, UNSPLASH_DBA8, "Electronic"),
        ("2", "Cosmic Vibes", "Stellar Sound", "Universe", 198, UNSPLASH_04BF, "Synthwave"),
        ("3", "Ocean Waves", "Azure Shore", "Serenity", 267, UNSPLASH_D835, "Ambient"),
        ("4", "Urban Pulse", "City Beats", "Metro", 210, UNSPLASH_491D, "Hip Hop"),
        ("5", "Sunrise Horizon", "Golden Hour", "Dawn", 255, UNSPLASH_4A5F, "Indie Pop"),
        ("6", "Neon Lights", "Synth Wave", "Retro Future", 234, UNSPLASH_F032, "Electronic"),
        ("7", "Electric Feelings", "Volt & Amp", "Power Up", 198, UNSPLASH_B849, "Electronic"),
        ("8", "Summer Groove", "Beach Vibes", "Tropical", 211, UNSPLASH_04BF, "Pop"),
    ]
    .into_iter()
    .map(track)
    .collect()
}

fn listen_now_playlists() -> Vec<Playlist> {
    [
        ("ln1", "Chill Study Beats", "Focus-friendly tracks for late-night studying", UNSPLASH_DBA8, 45, 12_500),
        ("ln2", "Trending Now", "What's hot this week in student music", UNSPLASH_D7CD, 50, 45_000),
        ("ln3", "Workout Energy", "High-energy tracks to pump you up", UNSPLASH_491D, 38, 28_000),
        ("ln4", "Peaceful Vibes", "Relaxation and meditation sounds", UNSPLASH_D835, 42, 18_500),
        ("ln5", "Late Night Chill", "Perfect for winding down", UNSPLASH_F032, 55, 31_200),
        ("ln6", "Morning Motivation", "Start your day right", UNSPLASH_4A5F, 36, 22_100),
    ]
    .into_iter()
    .map(playlist)
    .collect()
}

fn trending_playlists() -> Vec<Playlist> {
    [
        ("tr1", "Viral Hits 2024", "The most streamed tracks right now", UNSPLASH_B849, 60, 250_000),
        ("tr2", "Campus Anthems", "Student favorites across the globe", UNSPLASH_DBA8, 48, 85_000),
        ("tr3", "Party Starter", "Get the party going", UNSPLASH_D7CD, 52, 120_000),
        ("tr4", "Indie Rising", "Tomorrow's stars today", UNSPLASH_491D, 44, 62_000),
        ("tr5", "Retro Replay", "Throwback classics that still hit", UNSPLASH_D835, 66, 95_000),
        ("tr6", "Electronic Dreams", "Synth-heavy and hypnotic", UNSPLASH_F032, 54, 71_000),
    ]
    .into_iter()
    .map(playlist)
    .collect()
}

fn chart_top_playlists() -> Vec<Playlist> {
    [
        ("ch1", "Global Top 50", "Worldwide chart dominators", UNSPLASH_4A5F, 50, 500_000),
        ("ch2", "Student Favorites", "What students are listening to", UNSPLASH_B849, 50, 350_000),
        ("ch3", "Rising Stars", "Breaking through the charts", UNSPLASH_DBA8, 50, 280_000),
        ("ch4", "Genre Titans", "Leaders in their category", UNSPLASH_D7CD, 50, 420_000),
        ("ch5", "Discovery Mix", "Find your next favorite", UNSPLASH_491D, 50, 180_000),
        ("ch6", "Collaboration Kings", "Best feature tracks", UNSPLASH_D835, 50, 310_000),
    ]
    .into_iter()
    .map(playlist)
    .collect()
}

fn recently_played_playlists() -> Vec<Playlist> {
    [
        ("rp1", "Summer 2023 Hits", "Your recent favorite listen", UNSPLASH_F032, 42, 5_000),
        ("rp2", "Focus Mode Active", "Your study soundtrack", UNSPLASH_4A5F, 38, 3_200),
        ("rp3", "Night Drive Essentials", "Late night cruising", UNSPLASH_B849, 55, 8_900),
        ("rp4", "Gym Session Energy", "Your workout companion", UNSPLASH_DBA8, 44, 6_200),
        ("rp5", "Weekend Vibes", "Relaxation and fun", UNSPLASH_D7CD, 48, 4_100),
        ("rp6", "Lo-Fi Hip Hop", "Chill beats for focus", UNSPLASH_491D, 60, 11_500),
    ]
    .into_iter()
    .map(playlist)
    .collect()
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_ids_unique() {
        let catalog = Catalog::builtin();
        let ids: HashSet<_> = catalog.tracks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids.len(), catalog.tracks.len());

        let playlist_ids: HashSet<_> = catalog
            .shelves()
            .iter()
            .flat_map(|s| s.playlists.iter().map(|p| p.id.as_str()))
            .collect();
        assert_eq!(playlist_ids.len(), 24);
    }

    #[test]
    fn test_track_lookup_by_id() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.track("3").map(|t| t.title.as_str()), Some("Ocean Waves"));
        assert!(catalog.track("nope").is_none());
    }

    #[test]
    fn test_plays_label_rounds() {
        let mut p = fallback_playlists().remove(0);
        assert_eq!(p.plays_label(), "13K plays");
        p.plays = 499;
        assert_eq!(p.plays_label(), "0K plays");
        p.plays = 250_000;
        assert_eq!(p.plays_label(), "250K plays");
    }

    #[test]
    fn test_playlists_by_category_ignores_case() {
        let hits = playlists_by_category("CHILL");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "p3");
        assert!(playlists_by_category("metal").is_empty());
        assert_eq!(playlists_by_category("").len(), fallback_playlists().len());
    }

    #[test]
    fn test_fallback_is_deterministic() {
        assert_eq!(fallback_tracks(), fallback_tracks());
        assert_eq!(trending_tracks(), fallback_tracks());
        assert_eq!(featured_playlists(), fallback_playlists());
    }

    #[test]
    fn test_track_serializes_camel_case() {
        let json = serde_json::to_value(&fallback_tracks()[0]).unwrap();
        assert_eq!(json["coverUrl"], UNSPLASH_DBA8);
        assert_eq!(json["duration"], 200);
        assert!(json.get("cover_url").is_none());
    }
}
