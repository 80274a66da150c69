//! Sentinel Terminal UI.
//!
//! Single-conversation chat client for the Sentinel security assistant
//! endpoint: type a question, watch the answer arrive, cancel an in-flight
//! request with Esc.

use std::error::Error;

use clap::Parser;
use tokio::sync::mpsc;
use tracing::info;

mod app;
mod backend;
mod event;
mod state;
mod ui;
mod utils;

use app::App;
use event::{Command, UiEvent};

#[derive(Parser)]
#[command(name = "sentinel")]
#[command(about = "Terminal chat client for the Sentinel security assistant")]
#[command(version)]
struct Cli {
    /// Assistant endpoint base URL
    #[arg(short, long, default_value = "http://127.0.0.1:8000")]
    endpoint: String,

    /// User identity forwarded with each query
    #[arg(short, long, default_value = "tui_user")]
    user_id: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing - write to file to avoid terminal interference
    // Logs go to /tmp/sentinel-tui.log
    let log_file = std::fs::File::create("/tmp/sentinel-tui.log").ok();
    if let Some(file) = log_file {
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_env_filter("sentinel_tui=debug,sentinel_core=debug,sentinel_client=debug")
            .with_ansi(false)
            .init();
    }

    let cli = Cli::parse();

    info!(endpoint = %cli.endpoint, user_id = %cli.user_id, "Starting Sentinel TUI");

    // Create channels for UI <-> backend communication
    let (ui_tx, ui_rx) = mpsc::channel::<UiEvent>(100);
    let (cmd_tx, cmd_rx) = mpsc::channel::<Command>(100);

    // Spawn background thread with its own tokio runtime
    let endpoint = cli.endpoint.clone();
    let user_id = cli.user_id.clone();
    let bg_handle = std::thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
        rt.block_on(backend::run_backend(endpoint, user_id, ui_tx, cmd_rx));
    });

    // Initialize terminal (enters alternate screen, enables raw mode)
    let terminal = ratatui::init();

    // Run UI loop on main thread
    let mut app = App::new(ui_rx, cmd_tx);
    let result = app.run(terminal);

    // Restore terminal (exits alternate screen, disables raw mode)
    ratatui::restore();

    // Wait for background thread to finish
    let _ = bg_handle.join();

    info!("TUI shutdown complete");

    result.map_err(|e| e.into())
}
