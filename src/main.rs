//! PROXX game server.

use std::sync::Arc;

use anyhow::{Context, Error};
use pico_args::Arguments;
use proxx::server::{create_router, AppState};
use proxx::{logging, ConfigOverrides, GameRegistry, ServerConfig};
use tracing::info;

const HELP: &str = "\
Run the PROXX minesweeper server

USAGE:
  proxx [OPTIONS]

OPTIONS:
  --host       IP          Address to listen on    [default: env HOST or 0.0.0.0]
  --port       PORT        Port to listen on       [default: env PORT or 8080]
  --width      N           Board width             [default: env GAME_WIDTH or 10]
  --height     N           Board height            [default: env GAME_HEIGHT or 10]
  --mines      N           Mines per board         [default: env GAME_MINES or 10]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  A .env file in the working directory is loaded if present.
  RUST_LOG                 Log filter (e.g. debug, proxx=debug)
";

fn parse_args() -> Result<ConfigOverrides, pico_args::Error> {
    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let overrides = ConfigOverrides {
        host: pargs.opt_value_from_str("--host")?,
        port: pargs.opt_value_from_str("--port")?,
        width: pargs.opt_value_from_str("--width")?,
        height: pargs.opt_value_from_str("--height")?,
        mines: pargs.opt_value_from_str("--mines")?,
    };

    let remaining = pargs.finish();
    if !remaining.is_empty() {
        eprintln!("Warning: unused arguments left: {remaining:?}");
    }
    Ok(overrides)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();
    logging::init();

    let overrides = parse_args()?;
    let config = ServerConfig::from_env(overrides)?;

    let registry = Arc::new(GameRegistry::new(config.board));
    let app = create_router(AppState::new(registry));

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    info!(
        "Server PROXX is running on http://{} ({}x{} board, {} mines)",
        config.bind, config.board.width, config.board.height, config.board.mines
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
