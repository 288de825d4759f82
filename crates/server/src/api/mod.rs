use std::{io, path::PathBuf, sync::Arc};

use shared::{
    domain::{
        AirlineTotal, InvoiceRecord, PassengerRecord, StageStatus, SummaryAggregate, TicketNumber,
    },
    error::{ApiException, ErrorCode},
};
use tokio::sync::RwLock;
use tracing::{info, warn};

mod extractor;

pub use extractor::{InvoiceExtractor, SimulatedExtractor};

/// Download status shown when no PDF exists for a ticket.
pub const NOT_FOUND_STATUS: &str = "Not Found";

#[derive(Clone)]
pub struct ApiContext {
    pub store: Arc<RwLock<RecordStore>>,
    pub invoice_dir: PathBuf,
    pub extractor: Arc<dyn InvoiceExtractor>,
}

impl ApiContext {
    pub fn new(
        passengers: Vec<PassengerRecord>,
        invoice_dir: impl Into<PathBuf>,
        extractor: Arc<dyn InvoiceExtractor>,
    ) -> Self {
        Self {
            store: Arc::new(RwLock::new(RecordStore::new(passengers))),
            invoice_dir: invoice_dir.into(),
            extractor,
        }
    }
}

/// In-memory roster plus the invoice ledger built up by parse actions.
#[derive(Debug, Default)]
pub struct RecordStore {
    passengers: Vec<PassengerRecord>,
    invoices: Vec<InvoiceRecord>,
}

impl RecordStore {
    pub fn new(passengers: Vec<PassengerRecord>) -> Self {
        Self {
            passengers,
            invoices: Vec::new(),
        }
    }

    fn contains(&self, ticket: &TicketNumber) -> bool {
        self.passengers.iter().any(|p| &p.ticket_number == ticket)
    }

    fn passenger_mut(&mut self, ticket: &TicketNumber) -> Result<&mut PassengerRecord, ApiException> {
        self.passengers
            .iter_mut()
            .find(|p| &p.ticket_number == ticket)
            .ok_or_else(|| ApiException::not_found(format!("unknown ticket {ticket}")))
    }
}

/// A PDF found for a ticket, ready to be streamed back.
#[derive(Debug)]
pub struct Artifact {
    pub filename: String,
    pub bytes: Vec<u8>,
}

pub async fn list_records(ctx: &ApiContext, query: Option<&str>) -> Vec<PassengerRecord> {
    let store = ctx.store.read().await;
    let Some(needle) = query.map(str::trim).filter(|q| !q.is_empty()) else {
        return store.passengers.clone();
    };
    let needle = needle.to_lowercase();
    store
        .passengers
        .iter()
        .filter(|p| {
            p.ticket_number.as_str().to_lowercase().contains(&needle)
                || p.display_name().to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

pub async fn list_invoices(ctx: &ApiContext) -> Vec<InvoiceRecord> {
    ctx.store.read().await.invoices.clone()
}

/// Per-carrier totals in the order each carrier first appears in the ledger.
pub async fn summarize(ctx: &ApiContext) -> SummaryAggregate {
    let store = ctx.store.read().await;
    let mut airline_totals: Vec<AirlineTotal> = Vec::new();
    for invoice in &store.invoices {
        let amount = invoice.amount.unwrap_or_default();
        match airline_totals
            .iter_mut()
            .find(|line| line.airline == invoice.airline)
        {
            Some(line) => {
                line.total += amount;
                line.count += 1;
            }
            None => airline_totals.push(AirlineTotal {
                airline: invoice.airline.clone(),
                total: amount,
                count: 1,
            }),
        }
    }
    for line in &mut airline_totals {
        line.total = round_cents(line.total);
    }

    SummaryAggregate {
        high_value_count: store.invoices.iter().filter(|i| i.is_high_value()).count() as u64,
        airline_totals,
    }
}

/// Looks for `<invoice_dir>/<ticket>.pdf` and records the outcome on the passenger.
pub async fn download_ticket(
    ctx: &ApiContext,
    ticket: &TicketNumber,
) -> Result<Artifact, ApiException> {
    if !ctx.store.read().await.contains(ticket) {
        return Err(ApiException::not_found(format!("unknown ticket {ticket}")));
    }

    let filename = format!("{ticket}.pdf");
    let read = tokio::fs::read(ctx.invoice_dir.join(&filename)).await;

    let mut store = ctx.store.write().await;
    let passenger = store.passenger_mut(ticket)?;
    match read {
        Ok(bytes) => {
            passenger.download_status = StageStatus::Success;
            passenger.pdf_filename = Some(filename.clone());
            info!(%ticket, size = bytes.len(), "invoice pdf located");
            Ok(Artifact { filename, bytes })
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            passenger.download_status = StageStatus::Error(NOT_FOUND_STATUS.to_string());
            warn!(%ticket, "no invoice pdf for ticket");
            Err(ApiException::not_found(format!("no pdf for ticket {ticket}")))
        }
        Err(err) => Err(ApiException::new(ErrorCode::Internal, err.to_string())),
    }
}

/// Extracts an invoice for a downloaded ticket and appends it to the ledger.
pub async fn parse_ticket(
    ctx: &ApiContext,
    ticket: &TicketNumber,
) -> Result<InvoiceRecord, ApiException> {
    let mut store = ctx.store.write().await;
    let passenger = store.passenger_mut(ticket)?;
    if !passenger.download_status.is_success() {
        return Err(ApiException::validation(format!(
            "ticket {ticket} has not been downloaded"
        )));
    }

    let invoice = ctx.extractor.extract(passenger);
    passenger.parse_status = StageStatus::Success;
    info!(%ticket, invoice = ?invoice.invoice_number, "invoice extracted");
    store.invoices.push(invoice.clone());
    Ok(invoice)
}

/// Reads a stored PDF by bare file name.
pub async fn read_artifact(ctx: &ApiContext, filename: &str) -> Result<Vec<u8>, ApiException> {
    if filename.is_empty()
        || filename.contains(['/', '\\'])
        || filename == "."
        || filename == ".."
    {
        return Err(ApiException::validation("invalid artifact name"));
    }

    match tokio::fs::read(ctx.invoice_dir.join(filename)).await {
        Ok(bytes) => Ok(bytes),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            Err(ApiException::not_found(format!("no artifact {filename}")))
        }
        Err(err) => Err(ApiException::new(ErrorCode::Internal, err.to_string())),
    }
}

pub(crate) fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
