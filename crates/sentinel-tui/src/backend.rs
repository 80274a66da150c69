//! Background task that owns the request controller and the transport.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use sentinel_client::HttpTransport;
use sentinel_core::RequestController;

use crate::event::{Command, UiEvent};

/// Run the backend loop.
///
/// This function runs in a separate thread with its own tokio runtime. It
/// owns the [`RequestController`] and drives the whole request lifecycle:
/// commands arrive from the UI over `cmd_rx`, settles arrive from the
/// spawned transport calls, and every log append and phase change is
/// forwarded to the UI over `ui_tx`.
pub async fn run_backend(
    endpoint: String,
    user_id: String,
    ui_tx: mpsc::Sender<UiEvent>,
    mut cmd_rx: mpsc::Receiver<Command>,
) {
    info!(endpoint = %endpoint, "Starting backend");

    let transport = Arc::new(HttpTransport::new(&endpoint));

    let healthy = transport.health().await;
    info!(healthy, "Endpoint health probe");
    let _ = ui_tx.send(UiEvent::ConnectionChecked { healthy }).await;

    let mut controller = RequestController::new(transport, user_id);
    let mut log_rx = controller.subscribe();

    loop {
        tokio::select! {
            // Log appends, mirrored to the UI in order.
            Some(entry) = log_rx.recv() => {
                let _ = ui_tx.send(UiEvent::EntryAppended(entry)).await;
            }

            // The in-flight call settled.
            Some(settle) = controller.next_settle() => {
                controller.reconcile(settle);
                let _ = ui_tx.send(UiEvent::PhaseChanged(controller.phase())).await;
            }

            // Commands from the UI thread.
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(Command::Submit(text)) => {
                        debug!("submit command");
                        controller.submit(&text);
                        let _ = ui_tx.send(UiEvent::PhaseChanged(controller.phase())).await;
                    }
                    Some(Command::Cancel) => {
                        debug!("cancel command");
                        controller.cancel();
                        let _ = ui_tx.send(UiEvent::PhaseChanged(controller.phase())).await;
                    }
                    Some(Command::Quit) | None => {
                        info!("Received quit command, shutting down backend");
                        break;
                    }
                }
            }
        }
    }

    info!("Backend shutdown complete");
}
