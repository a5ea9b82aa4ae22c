//! Bootstrap and startup logic for Zegoop.

use std::sync::Arc;

use tracing::info;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use zegoop_channel_web::{WebChannel, WebChannelConfig};
use zegoop_config::{Config, LoggingConfig};
use zegoop_core::{
    Coordinator, CoordinatorHandle, CoordinatorService, ProviderRegistry, SurfaceRegistry,
};
use zegoop_store_file::JsonFileStore;

use crate::register::register_providers;

/// Initialize tracing with console and optional file output.
///
/// `RUST_LOG` wins over `logging.level`. Log files rotate daily under
/// `logging.dir` and the last 30 are kept.
pub(crate) fn init_tracing(logging: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    // stdout is reserved for command output.
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_ansi(true);

    if !logging.file {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(console)
            .init();
        return Ok(());
    }

    let log_dir = logging.resolved_dir();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("zegoop")
        .filename_suffix("log")
        .max_log_files(30)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Flushes the file writer on exit; must outlive the subscriber.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

/// The background side of the system: store, gateway, coordinator and its
/// mailbox.
pub(crate) struct App {
    pub coordinator: Arc<Coordinator>,
    pub handle: CoordinatorHandle,
    pub surfaces: Arc<SurfaceRegistry>,
}

impl App {
    /// Open the store, seed install defaults, load the mode and start the
    /// coordinator mailbox.
    pub(crate) async fn start(config: &Config) -> Result<Self, Box<dyn std::error::Error>> {
        let store = JsonFileStore::new(config.storage.resolved_path()).await?;
        info!("Settings store at {}", store.path().display());

        let providers = Arc::new(ProviderRegistry::new());
        register_providers(&providers, config);

        let surfaces = Arc::new(SurfaceRegistry::new());
        let coordinator = Arc::new(Coordinator::new(
            Arc::new(store),
            providers,
            surfaces.clone(),
        ));

        if coordinator.on_installed().await? {
            info!("First run: install defaults written");
        }
        coordinator.load_mode().await?;

        let (service, handle) = CoordinatorService::new(coordinator.clone());
        service.spawn();

        Ok(Self {
            coordinator,
            handle,
            surfaces,
        })
    }
}

/// Run the coordinator and the WebSocket channel until Ctrl-C.
pub(crate) async fn run_server(
    mut config: Config,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    info!("Starting Zegoop v{}", env!("CARGO_PKG_VERSION"));

    let app = App::start(&config).await?;
    info!(
        "Providers: {:?}, AI mode: {}",
        app.coordinator.providers().list_ids(),
        app.coordinator.mode().is_on()
    );

    let channel = WebChannel::new(
        WebChannelConfig {
            host: config.server.host.clone(),
            port: config.server.port,
        },
        app.handle.clone(),
        app.surfaces.clone(),
    );
    let addr = channel.start().await?;
    info!("Surfaces connect at ws://{}/ws?surface=content|popup|options", addr);

    tokio::signal::ctrl_c().await?;

    info!("Shutting down...");
    channel.stop().await;
    Ok(())
}
