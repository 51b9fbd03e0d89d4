//! Plain-text rendering of the player bar, track lists and playlist shelves.

use studmusic_proto::catalog::{Shelf, Track};
use studmusic_proto::playback::{format_time, PlaybackState};

const BAR_WIDTH: usize = 20;

/// One-line player bar, e.g.
/// `▶ Midnight Dreams · Luna Echo  [####----------------] 0:48 -3:15  vol 70`
pub fn player_line(state: &PlaybackState) -> String {
    let Some(track) = &state.current else {
        return "(nothing loaded)".to_string();
    };
    let icon = if state.is_playing { '▶' } else { '⏸' };
    format!(
        "{} {} · {}  [{}] {} -{}  vol {}",
        icon,
        track.title,
        track.artist,
        progress_bar(state.progress, BAR_WIDTH),
        format_time(state.position_secs()),
        format_time(state.remaining_secs()),
        state.volume,
    )
}

pub fn progress_bar(progress: u8, width: usize) -> String {
    let filled = (usize::from(progress.min(100)) * width) / 100;
    format!("{}{}", "#".repeat(filled), "-".repeat(width - filled))
}

pub fn track_lines(title: &str, tracks: &[Track]) -> Vec<String> {
    let mut lines = vec![format!("── {} ──", title)];
    lines.extend(tracks.iter().map(|t| {
        format!(
            "  [{}] {} · {} ({}) {}",
            t.id,
            t.title,
            t.artist,
            t.genre,
            format_time(f64::from(t.duration))
        )
    }));
    lines
}

pub fn shelf_lines(shelf: &Shelf<'_>) -> Vec<String> {
    let mut lines = vec![format!("── {} ──", shelf.title)];
    lines.extend(shelf.playlists.iter().map(|p| {
        format!(
            "  {} · {} songs · {}  {}",
            p.title,
            p.track_count,
            p.plays_label(),
            p.description
        )
    }));
    lines
}
