use std::sync::Arc;

use clap::Parser;
use client_core::{load_settings, Dashboard, HttpRecordService};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

mod backend_bridge;
mod controller;
mod ui;

use backend_bridge::{commands::BackendCommand, runtime::spawn_backend_thread};
use controller::events::UiEvent;
use ui::DashboardApp;

#[derive(Parser, Debug)]
struct Args {
    /// Overrides the record service URL from settings.
    #[arg(long)]
    server_url: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(url) = args.server_url {
        settings.server_url = url;
    }
    let service = Arc::new(HttpRecordService::from_settings(&settings)?);
    tracing::info!(server_url = %service.base_url(), "dashboard starting");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    let dashboard = Dashboard::new(service.clone());
    let passengers_rx = dashboard.watch_passengers();
    spawn_backend_thread(dashboard, cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Passenger Invoice Dashboard")
            .with_inner_size([1200.0, 760.0])
            .with_min_inner_size([860.0, 520.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Passenger Invoice Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(DashboardApp::new(
                cmd_tx,
                ui_rx,
                passengers_rx,
                service,
            )))),
    )
    .map_err(|err| anyhow::anyhow!("dashboard window failed: {err}"))
}
