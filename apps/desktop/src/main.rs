use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use client_core::{
    load_settings, render_invoices, render_passengers, render_summary, ActionOutcome, Dashboard,
    DashboardEvent, DownloadAllReport, HttpRecordService, RecordSnapshot,
};
use shared::{
    domain::{InvoiceRecord, SummaryAggregate, TicketNumber},
    protocol::Stage,
};
use tokio::sync::broadcast;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Travel-document dashboard (terminal front-end)")]
struct Args {
    /// Overrides the record service URL from settings.
    #[arg(long)]
    server_url: Option<String>,
    /// Search text applied to the passenger list.
    #[arg(long, global = true)]
    query: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Passengers,
    Invoices,
    Summary,
    Download { ticket: String },
    Parse { ticket: String },
    DownloadAll,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(url) = args.server_url {
        settings.server_url = url;
    }
    info!(server_url = %settings.server_url, "dashboard starting");

    let service = HttpRecordService::from_settings(&settings)?;
    let dashboard = Dashboard::new(Arc::new(service));
    let query = args.query.unwrap_or_default();

    match args.command {
        Command::Passengers => {
            print!("{}", passengers_pane(&dashboard.search(&query).await));
        }
        Command::Invoices => {
            let invoices = dashboard.load_invoices().await;
            print!("{}", render_invoices(&invoices));
        }
        Command::Summary => {
            let summary = dashboard.load_summary().await;
            print!("{}", render_summary(summary.as_ref()));
        }
        Command::Download { ticket } => {
            dashboard.search(&query).await;
            let ticket = TicketNumber::new(ticket);
            let outcome = dashboard.trigger_download(&ticket).await;
            println!("{}", describe_outcome(Stage::Download, &ticket, outcome));
            println!();
            print!("{}", passengers_pane(&dashboard.snapshot().await));
        }
        Command::Parse { ticket } => {
            dashboard.search(&query).await;
            let mut events = dashboard.subscribe_events();
            let ticket = TicketNumber::new(ticket);
            let outcome = dashboard.trigger_parse(&ticket).await;
            let (invoices, summary) = latest_reloads(&mut events);

            println!("{}", describe_outcome(Stage::Parse, &ticket, outcome));
            println!();
            print!("{}", passengers_pane(&dashboard.snapshot().await));
            println!();
            print!("{}", render_invoices(&invoices));
            println!();
            print!("{}", render_summary(summary.as_ref()));
        }
        Command::DownloadAll => {
            dashboard.search(&query).await;
            let report = dashboard.trigger_download_all().await;
            println!("{}", describe_report(&report));
            println!();
            print!("{}", passengers_pane(&dashboard.snapshot().await));
        }
    }

    Ok(())
}

fn passengers_pane(snapshot: &Arc<RecordSnapshot>) -> String {
    render_passengers(snapshot.as_ref()).to_string()
}

/// Picks the invoice and summary data published by the parse reconciliation.
fn latest_reloads(
    events: &mut broadcast::Receiver<DashboardEvent>,
) -> (Arc<Vec<InvoiceRecord>>, Option<SummaryAggregate>) {
    let mut invoices = Arc::new(Vec::new());
    let mut summary = None;
    while let Ok(event) = events.try_recv() {
        match event {
            DashboardEvent::InvoicesUpdated(latest) => invoices = latest,
            DashboardEvent::SummaryUpdated(latest) => summary = latest,
            _ => {}
        }
    }
    (invoices, summary)
}

fn describe_outcome(stage: Stage, ticket: &TicketNumber, outcome: ActionOutcome) -> String {
    let action = stage.as_path_segment();
    match outcome {
        ActionOutcome::Sent => format!("{action} requested for {ticket}"),
        ActionOutcome::Rejected { status } => {
            format!("{action} for {ticket} rejected by server (HTTP {status})")
        }
        ActionOutcome::TransportFailed => {
            format!("{action} for {ticket} could not reach the server")
        }
    }
}

fn describe_report(report: &DownloadAllReport) -> String {
    if report.attempted.is_empty() {
        return "Nothing to download.".to_string();
    }
    let mut line = format!(
        "Download requested for {} passenger(s)",
        report.attempted.len()
    );
    if !report.failed.is_empty() {
        let failed: Vec<&str> = report.failed.iter().map(TicketNumber::as_str).collect();
        line.push_str(&format!("; failed: {}", failed.join(", ")));
    }
    line
}
