// src/main.rs — wavectl entry point

use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use wavectl::api::{self, ApiState};
use wavectl::classifier::{CameraPoller, HttpClassifier, LatestFrame};
use wavectl::cli::{Cli, Commands};
use wavectl::gesture::dispatcher::{ControlGateway, Dispatcher};
use wavectl::gesture::feedback;
use wavectl::infra::config::Config;
use wavectl::infra::logger;
use wavectl::session::{ActiveSession, MemorySessionStore, SessionStore};
use wavectl::snapshot::{self, SnapshotHandle};
use wavectl::spotify::{BoundGateway, Gateway, SpotifyClient};

#[tokio::main]
async fn main() {
    // Initialize logging (respects RUST_LOG)
    logger::init_logging("info");

    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = if let Some(ref path) = cli.config {
        let mut c = Config::load_from(std::path::Path::new(path))?;
        c.spotify.apply_env_overrides();
        c
    } else {
        Config::load()?
    };

    match cli.command {
        Some(Commands::Config) => {
            println!("{}", toml::to_string_pretty(&config.redacted())?);
            Ok(())
        }
        Some(Commands::Serve { port, no_camera }) => {
            let mut config = config;
            if let Some(port) = port {
                config.server.port = port;
            }
            if no_camera {
                config.camera.enabled = false;
            }
            serve(config).await
        }
        None => serve(config).await,
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    if config.spotify.client_id.is_empty() || config.spotify.client_secret.is_empty() {
        anyhow::bail!(
            "missing Spotify credentials: set SPOTIFY_CLIENT_ID and SPOTIFY_CLIENT_SECRET, \
             or the [spotify] section of config.toml"
        );
    }

    let sessions: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
    let client = SpotifyClient::new(config.spotify.clone());
    let gateway = Arc::new(Gateway::new(client, Arc::clone(&sessions)));

    let active = ActiveSession::new();
    let snapshot = SnapshotHandle::new();
    let bound: Arc<dyn ControlGateway> = Arc::new(BoundGateway::new(
        Arc::clone(&gateway),
        active.clone(),
        snapshot.clone(),
    ));

    let (feedback_tx, feedback_rx) =
        feedback::channel(Duration::from_millis(config.gesture.ack_ttl_ms));
    tokio::spawn(feedback::drain_to_log(feedback_rx));

    let dispatcher = Arc::new(Dispatcher::new(
        Arc::clone(&bound),
        feedback_tx,
        snapshot.clone(),
        &config.gesture,
    ));

    // Keep the now-playing view current between commands
    tokio::spawn(snapshot::run_poll_loop(
        Arc::clone(&bound),
        Duration::from_millis(config.camera.snapshot_poll_ms),
    ));

    let frames = LatestFrame::new();
    if config.camera.enabled {
        let poll_interval = Duration::from_millis(config.camera.poll_interval_ms);
        let classifier = Arc::new(HttpClassifier::new(
            config.camera.classifier_url.clone(),
            poll_interval,
        ));
        let poller = CameraPoller::new(
            classifier,
            frames.clone(),
            Arc::clone(&dispatcher),
            poll_interval,
        );
        tokio::spawn(poller.run());
    } else {
        tracing::info!("camera gesture loop disabled");
    }

    let state = ApiState {
        gateway,
        dispatcher,
        active,
        frames,
        snapshot,
        frontend_origin: config.server.frontend_origin.clone(),
        pending_state: Arc::new(RwLock::new(None)),
    };

    api::start_server(state, &config.server).await
}
