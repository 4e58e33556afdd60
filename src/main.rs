//! Multi Timer - A browser-served set of independent countdown timers
//! 
//! This is the main entry point for the multi-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use multi_timer::{
    api::create_router,
    config::Config,
    services::AlarmGenerator,
    state::{AppState, TimerBoard},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("multi_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting multi-timer v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, tick={}ms, alarm interval={}ms",
          config.host, config.port, config.tick_ms, config.alarm_interval_ms);

    // The alarm output is only created once a user starts a timer
    let board = TimerBoard::new(config.board_settings(), AlarmGenerator::new(config.mute));
    for duration_ms in config.startup_durations_ms() {
        board.create_timer(duration_ms).map_err(anyhow::Error::msg)?;
    }

    let state = Arc::new(AppState::new(Arc::clone(&board), config.port, config.host.clone()));
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;
    
    info!("Timers available on http://{}", addr);

    // Setup graceful shutdown
    let server = axum::serve(listener, app);
    
    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    if let Err(e) = board.shutdown() {
        tracing::error!("Failed to stop timers: {}", e);
    }
    info!("Server shutdown complete");
    Ok(())
}
