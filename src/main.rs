use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::sync::Arc;
use tracing::info;
use waiting_room::{
    create_router, AppState, Config, HistoryNavigator, JsonFileStore, Navigator,
    SimulatedDeviceProvider, SimulatedOutcome, WaitingRoom,
};

#[derive(Parser)]
#[command(name = "waiting-room", version, about = "Interview waiting room")]
struct Cli {
    /// Configuration file (extension optional)
    #[arg(long, default_value = "config/waiting-room")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the waiting room HTTP surface
    Serve(DeviceArgs),

    /// Mount one waiting room, start it if possible and print what happens
    Simulate {
        /// Session identifier used in round paths (generated if omitted)
        #[arg(long)]
        session_id: Option<String>,

        #[command(flatten)]
        devices: DeviceArgs,
    },
}

#[derive(Args)]
struct DeviceArgs {
    /// Simulated camera answer: grant, deny or missing
    #[arg(long, default_value = "grant")]
    camera: SimulatedOutcome,

    /// Simulated microphone answer: grant, deny or missing
    #[arg(long, default_value = "grant")]
    microphone: SimulatedOutcome,
}

impl DeviceArgs {
    fn provider(&self) -> Arc<SimulatedDeviceProvider> {
        Arc::new(SimulatedDeviceProvider::new(self.camera, self.microphone))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;
    let store = Arc::new(JsonFileStore::new(cfg.store_path()?));

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));
    info!("Session store: {}", store.path().display());

    match cli.command {
        Command::Serve(devices) => {
            let state = AppState::new(store, devices.provider(), cfg.room_settings());
            let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);

            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("Failed to bind {}", addr))?;
            info!("HTTP server listening on {}", addr);

            axum::serve(listener, create_router(state))
                .await
                .context("HTTP server failed")?;
        }

        Command::Simulate { session_id, devices } => {
            let session_id = session_id.unwrap_or_else(|| format!("session-{}", uuid::Uuid::new_v4()));
            let navigator = Arc::new(HistoryNavigator::new());
            let room_navigator: Arc<dyn Navigator> = navigator.clone();

            let room = WaitingRoom::mount(
                session_id,
                store,
                devices.provider(),
                room_navigator,
                cfg.room_settings(),
            );
            room.settled().await;

            println!("{}", serde_json::to_string_pretty(&room.view())?);

            if room.start() {
                let wait = cfg.room_settings().tick_period * (waiting_room::COUNTDOWN_TICKS + 1);
                tokio::time::sleep(wait).await;
            } else {
                info!("Start not available");
            }

            room.unmount();

            for entry in navigator.history() {
                println!("{} -> {}", entry.at.to_rfc3339(), entry.path);
            }
        }
    }

    Ok(())
}
