/// PlayerCore — single-owner event loop for the playback session, the
/// recently-played ledger and the displayed track list.
///
/// Inputs arrive as `PlayerEvent`s (stdin commands, lookup completion) on one
/// channel and as `SessionTick`s on the session's own channel. Nothing else
/// touches the session, so no locking is needed.
///
/// The catalog is rendered before the remote lookup resolves; when it does,
/// the track list is swapped in place.
use std::sync::Arc;

use studmusic_proto::catalog::{Catalog, Track};
use studmusic_proto::config::Config;
use studmusic_proto::ledger::RecentlyPlayed;
use studmusic_proto::playback::{PlaybackSession, SessionTick};
use studmusic_proto::storage::KeyValueStore;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::render;

// ── Commands ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Play,
    Pause,
    Toggle,
    Volume(i32),
    Load(String),
    Recent,
    Shelves,
    Status,
    Quit,
}

impl Command {
    /// Parse one stdin line. An empty line toggles, like the transport button.
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let Some(word) = parts.next() else {
            return Some(Self::Toggle);
        };
        let arg = parts.next();
        match (word.to_ascii_lowercase().as_str(), arg) {
            ("play", None) => Some(Self::Play),
            ("pause", None) => Some(Self::Pause),
            ("toggle", None) => Some(Self::Toggle),
            ("vol" | "volume", Some(v)) => v.parse().ok().map(Self::Volume),
            ("load", Some(id)) => Some(Self::Load(id.to_string())),
            ("recent", None) => Some(Self::Recent),
            ("shelves", None) => Some(Self::Shelves),
            ("status", None) => Some(Self::Status),
            ("quit" | "exit" | "q", None) => Some(Self::Quit),
            _ => None,
        }
    }
}

// ── PlayerEvent ───────────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum PlayerEvent {
    Command(Command),
    /// The remote lookup finished (with live or fallback tracks).
    LookupResolved(Vec<Track>),
    /// Stdin reached EOF.
    InputClosed,
}

/// Whether the loop should keep running after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

// ── PlayerCore ────────────────────────────────────────────────────────────────

pub struct PlayerCore {
    catalog: Catalog,
    /// Tracks shown in the "Tracks" list: catalog tracks until the lookup lands.
    tracks: Vec<Track>,
    session: PlaybackSession,
    tick_rx: mpsc::Receiver<SessionTick>,
    ledger: RecentlyPlayed,
}

impl PlayerCore {
    pub fn new(config: &Config, store: Arc<dyn KeyValueStore>) -> Self {
        let catalog = Catalog::builtin();
        let (mut session, tick_rx) = PlaybackSession::new(
            config.player.tick_interval(),
            config.player.default_volume,
        );
        if let Some(first) = catalog.tracks.first() {
            session.load(first.clone());
        }
        Self {
            tracks: catalog.tracks.clone(),
            catalog,
            session,
            tick_rx,
            ledger: RecentlyPlayed::new(store),
        }
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Everything shown at startup, before any network data.
    pub fn initial_screen(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for shelf in self.catalog.shelves() {
            lines.extend(render::shelf_lines(&shelf));
        }
        lines.extend(render::track_lines("Tracks", &self.tracks));
        lines.push(render::player_line(self.session.state()));
        lines
    }

    /// Run until `Quit`, stdin EOF or the event channel closes. The session is
    /// torn down on every exit path.
    pub async fn run(mut self, mut event_rx: mpsc::Receiver<PlayerEvent>) -> anyhow::Result<()> {
        info!("PlayerCore: starting event loop");
        print_lines(&self.initial_screen());

        loop {
            tokio::select! {
                evt = event_rx.recv() => {
                    let Some(evt) = evt else {
                        info!("PlayerCore: event channel closed, shutting down");
                        break;
                    };
                    let (flow, lines) = self.handle_event(evt);
                    print_lines(&lines);
                    if flow == Flow::Stop {
                        break;
                    }
                }
                Some(tick) = self.tick_rx.recv() => {
                    if self.session.handle_tick(tick) {
                        print_progress(&render::player_line(self.session.state()));
                    }
                }
            }
        }

        self.session.shutdown();
        info!("PlayerCore: stopped");
        Ok(())
    }

    /// Apply one event; returns whether to continue and the lines to print.
    pub fn handle_event(&mut self, evt: PlayerEvent) -> (Flow, Vec<String>) {
        match evt {
            PlayerEvent::Command(cmd) => self.handle_command(cmd),
            PlayerEvent::LookupResolved(tracks) => {
                info!("PlayerCore: lookup resolved with {} tracks", tracks.len());
                self.tracks = tracks;
                (Flow::Continue, render::track_lines("Tracks", &self.tracks))
            }
            PlayerEvent::InputClosed => {
                info!("PlayerCore: input closed");
                (Flow::Stop, Vec::new())
            }
        }
    }

    fn handle_command(&mut self, cmd: Command) -> (Flow, Vec<String>) {
        debug!("PlayerCore: command {:?}", cmd);
        let line = match cmd {
            Command::Play => {
                self.session.play();
                self.status_line()
            }
            Command::Pause => {
                self.session.pause();
                self.status_line()
            }
            Command::Toggle => {
                self.session.toggle();
                self.status_line()
            }
            Command::Volume(v) => {
                self.session.set_volume(v);
                self.status_line()
            }
            Command::Load(id) => match self.find_track(&id).cloned() {
                Some(track) => {
                    self.start_track(track);
                    self.status_line()
                }
                None => format!("no track with id {:?}", id),
            },
            Command::Recent => {
                let recent = self.ledger.list(&self.catalog.tracks);
                return (Flow::Continue, render::track_lines("Recently Played", &recent));
            }
            Command::Shelves => {
                let mut lines = Vec::new();
                for shelf in self.catalog.shelves() {
                    lines.extend(render::shelf_lines(&shelf));
                }
                return (Flow::Continue, lines);
            }
            Command::Status => match serde_json::to_string(self.session.state()) {
                Ok(json) => json,
                Err(e) => format!("status unavailable: {}", e),
            },
            Command::Quit => return (Flow::Stop, Vec::new()),
        };
        (Flow::Continue, vec![line])
    }

    /// Displayed tracks first, then the catalog, so ids from either resolve.
    fn find_track(&self, id: &str) -> Option<&Track> {
        self.tracks
            .iter()
            .find(|t| t.id == id)
            .or_else(|| self.catalog.track(id))
    }

    fn start_track(&mut self, track: Track) {
        if let Err(e) = self.ledger.record(&track) {
            warn!("PlayerCore: recently-played not saved: {}", e);
        }
        self.session.load(track);
        self.session.play();
    }

    fn status_line(&self) -> String {
        render::player_line(self.session.state())
    }
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

fn print_progress(line: &str) {
    use std::io::Write;
    print!("\r{}", line);
    let _ = std::io::stdout().flush();
}
