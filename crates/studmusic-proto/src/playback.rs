//! Simulated playback session.
//!
//! There is no audio engine behind this: progress is a 0..100 fraction that a
//! fixed-cadence ticker nudges forward while playing, looping back to 0.
//!
//! ## Ticker ownership
//!
//! `play()` spawns one repeating tokio task that sends a [`SessionTick`] into
//! the session's channel every `tick_interval`. `pause()`, `shutdown()` and
//! drop abort it. Each ticker stamps its ticks with a generation number, so a
//! tick already queued by a cancelled ticker is ignored by
//! [`PlaybackSession::handle_tick`].

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::debug;

use crate::catalog::Track;

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(300);
pub const DEFAULT_VOLUME: u8 = 70;
pub const MAX_VOLUME: u8 = 100;
/// Number of distinct progress positions; progress wraps to 0 on reaching it.
pub const PROGRESS_STEPS: u8 = 100;

const TICK_CHANNEL_CAPACITY: usize = 16;

// ── PlaybackState ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackState {
    pub current: Option<Track>,
    /// Elapsed fraction of the track, 0..100.
    pub progress: u8,
    pub is_playing: bool,
    /// 0..=100.
    pub volume: u8,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            current: None,
            progress: 0,
            is_playing: false,
            volume: DEFAULT_VOLUME,
        }
    }
}

impl PlaybackState {
    /// One progress step. Does nothing while paused.
    pub fn advance(&mut self) -> bool {
        if !self.is_playing {
            return false;
        }
        self.progress = (self.progress + 1) % PROGRESS_STEPS;
        true
    }

    /// Elapsed seconds derived from the progress fraction and track duration.
    pub fn position_secs(&self) -> f64 {
        let duration = self.current.as_ref().map(|t| t.duration).unwrap_or(0);
        f64::from(self.progress) / 100.0 * f64::from(duration)
    }

    pub fn remaining_secs(&self) -> f64 {
        let duration = self.current.as_ref().map(|t| t.duration).unwrap_or(0);
        (f64::from(duration) - self.position_secs()).max(0.0)
    }
}

/// `m:ss`, e.g. `243.0` → `"4:03"`. Negative input renders as `0:00`.
pub fn format_time(seconds: f64) -> String {
    let total = seconds.max(0.0).floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

// ── Ticker ────────────────────────────────────────────────────────────────────

/// A tick emitted by the session's ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTick {
    generation: u64,
}

/// Repeating tick task. Aborted on drop.
struct Ticker {
    handle: tokio::task::JoinHandle<()>,
}

impl Ticker {
    /// Spawn on the current tokio runtime. Returns `None` outside a runtime.
    fn spawn(period: Duration, generation: u64, tx: mpsc::Sender<SessionTick>) -> Option<Self> {
        let runtime = tokio::runtime::Handle::try_current().ok()?;
        let handle = runtime.spawn(async move {
            let start = tokio::time::Instant::now() + period;
            let mut interval = tokio::time::interval_at(start, period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                match tx.try_send(SessionTick { generation }) {
                    Ok(()) => {}
                    // Consumer is behind; drop this tick like a missed interval.
                    Err(TrySendError::Full(_)) => {}
                    Err(TrySendError::Closed(_)) => break,
                }
            }
        });
        Some(Self { handle })
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

// ── PlaybackSession ───────────────────────────────────────────────────────────

pub struct PlaybackSession {
    state: PlaybackState,
    tick_interval: Duration,
    tick_tx: mpsc::Sender<SessionTick>,
    ticker: Option<Ticker>,
    generation: u64,
}

impl PlaybackSession {
    /// Create a paused session with no track loaded. The returned receiver
    /// yields ticks while playing; feed them to [`Self::handle_tick`].
    pub fn new(tick_interval: Duration, volume: u8) -> (Self, mpsc::Receiver<SessionTick>) {
        let (tick_tx, tick_rx) = mpsc::channel(TICK_CHANNEL_CAPACITY);
        let session = Self {
            state: PlaybackState {
                volume: volume.min(MAX_VOLUME),
                ..PlaybackState::default()
            },
            tick_interval,
            tick_tx,
            ticker: None,
            generation: 0,
        };
        (session, tick_rx)
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    /// True while a ticker task is owned by this session.
    pub fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }

    /// Make `track` current and rewind. Playing/paused is left unchanged.
    pub fn load(&mut self, track: Track) {
        debug!("[playback] load id={} title={:?}", track.id, track.title);
        self.state.current = Some(track);
        self.state.progress = 0;
    }

    /// Start playing. Returns `false` if already playing.
    pub fn play(&mut self) -> bool {
        if self.state.is_playing {
            return false;
        }
        self.state.is_playing = true;
        self.start_ticker();
        true
    }

    /// Pause and cancel the ticker. Returns `false` if already paused.
    pub fn pause(&mut self) -> bool {
        if !self.state.is_playing {
            return false;
        }
        self.state.is_playing = false;
        self.stop_ticker();
        true
    }

    /// Transport button: play when paused, pause when playing. Returns the new
    /// playing flag.
    pub fn toggle(&mut self) -> bool {
        if self.state.is_playing {
            self.pause();
        } else {
            self.play();
        }
        self.state.is_playing
    }

    /// Advance progress by one step. No effect while paused.
    pub fn tick(&mut self) -> bool {
        self.state.advance()
    }

    /// Apply a tick from this session's ticker. Ticks from a cancelled ticker
    /// are ignored.
    pub fn handle_tick(&mut self, tick: SessionTick) -> bool {
        if tick.generation != self.generation || self.ticker.is_none() {
            return false;
        }
        self.tick()
    }

    /// Store `volume` clamped to 0..=100; returns the stored value.
    pub fn set_volume(&mut self, volume: i32) -> u8 {
        self.state.volume = volume.clamp(0, i32::from(MAX_VOLUME)) as u8;
        self.state.volume
    }

    /// Tear down: pause and cancel any running ticker.
    pub fn shutdown(&mut self) {
        self.state.is_playing = false;
        self.stop_ticker();
    }

    fn start_ticker(&mut self) {
        self.stop_ticker();
        self.generation += 1;
        self.ticker = Ticker::spawn(self.tick_interval, self.generation, self.tick_tx.clone());
        if self.ticker.is_none() {
            debug!("[playback] no tokio runtime; ticks must be driven manually");
        }
    }

    fn stop_ticker(&mut self) {
        if self.ticker.take().is_some() {
            debug!("[playback] ticker {} cancelled", self.generation);
        }
    }
}
