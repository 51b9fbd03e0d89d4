mod core;
mod render;

use std::sync::Arc;

use studmusic_proto::config::Config;
use studmusic_proto::lookup::TrackLookup;
use studmusic_proto::storage::JsonFileStore;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::core::{Command, PlayerCore, PlayerEvent};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let data_dir = studmusic_proto::platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let log_path = data_dir.join("player.log");

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // stdout belongs to the player bar, so logs go to a file only
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(log_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,studmusic_player=debug")),
        )
        .init();

    info!("Log file: {:?}", log_path);

    let config = Config::load()?;
    info!("Config loaded from: {:?}", Config::config_path());

    let store = Arc::new(JsonFileStore::open(&config.paths.store_file));
    info!("Store file: {:?}", store.path());

    // Event channel — stdin commands and the lookup result funnel into PlayerCore
    let (event_tx, event_rx) = mpsc::channel::<PlayerEvent>(64);

    // Remote lookup: the catalog renders immediately, tracks upgrade when this lands.
    let lookup = TrackLookup::new(&config.lookup);
    let query = config.lookup.query.clone();
    let lookup_tx = event_tx.clone();
    tokio::spawn(async move {
        let tracks = lookup.fetch_tracks(&query).await;
        let _ = lookup_tx.send(PlayerEvent::LookupResolved(tracks)).await;
    });

    // Stdin reader
    let input_tx = event_tx;
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let evt = match Command::parse(&line) {
                        Some(cmd) => PlayerEvent::Command(cmd),
                        None => {
                            println!("unknown command: {:?}", line.trim());
                            continue;
                        }
                    };
                    if input_tx.send(evt).await.is_err() {
                        break;
                    }
                }
                Ok(None) => {
                    let _ = input_tx.send(PlayerEvent::InputClosed).await;
                    break;
                }
                Err(e) => {
                    warn!("stdin read error: {}", e);
                    let _ = input_tx.send(PlayerEvent::InputClosed).await;
                    break;
                }
            }
        }
    });

    PlayerCore::new(&config, store).run(event_rx).await
}
