use std::{sync::Arc, thread};

use client_core::{Dashboard, DashboardEvent};
use crossbeam_channel::{Receiver, Sender, TrySendError};
use tokio::sync::broadcast::{self, error::RecvError};

use crate::{backend_bridge::commands::BackendCommand, controller::events::UiEvent};

pub fn spawn_backend_thread(
    dashboard: Arc<Dashboard>,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) {
    let events = dashboard.subscribe_events();
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(format!(
                    "backend worker startup failure: failed to build runtime: {err}"
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            tokio::spawn(forward_events(events, ui_tx.clone()));

            while let Ok(cmd) = cmd_rx.recv() {
                tracing::debug!(command = cmd.name(), "backend command received");
                let dashboard = Arc::clone(&dashboard);
                // Commands run concurrently; the record cache drops stale refreshes.
                tokio::spawn(async move { run_command(&dashboard, cmd).await });
            }
            tracing::info!("ui command channel closed; backend worker stopping");
        });
    });
}

async fn run_command(dashboard: &Dashboard, cmd: BackendCommand) {
    match cmd {
        BackendCommand::LoadAll => dashboard.load_all().await,
        BackendCommand::Search(text) => {
            dashboard.search(&text).await;
        }
        BackendCommand::SelectPane(pane) => dashboard.select_pane(pane).await,
        BackendCommand::Download(ticket) => {
            dashboard.trigger_download(&ticket).await;
        }
        BackendCommand::Parse(ticket) => {
            dashboard.trigger_parse(&ticket).await;
        }
        BackendCommand::DownloadAll => {
            dashboard.trigger_download_all().await;
        }
    }
}

async fn forward_events(mut events: broadcast::Receiver<DashboardEvent>, ui_tx: Sender<UiEvent>) {
    loop {
        match events.recv().await {
            // Passenger snapshots reach the UI through the dashboard's watch channel.
            Ok(DashboardEvent::PassengersUpdated(_)) => {}
            Ok(event) => match ui_tx.try_send(UiEvent::Dashboard(event)) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    tracing::warn!("ui event queue full; dropping dashboard event");
                }
                Err(TrySendError::Disconnected(_)) => break,
            },
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "ui fell behind dashboard events");
            }
            Err(RecvError::Closed) => break,
        }
    }
}
