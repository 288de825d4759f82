use rand::Rng;
use shared::{
    domain::{InvoiceRecord, PassengerRecord},
    protocol::artifact_link,
};

use super::round_cents;

const SIMULATED_AIRLINE: &str = "Thai Airways";
const SIMULATED_GSTIN: &str = "29ABCDE1234F2Z5";

/// Turns a downloaded ticket PDF into an invoice record.
pub trait InvoiceExtractor: Send + Sync {
    fn extract(&self, passenger: &PassengerRecord) -> InvoiceRecord;
}

/// Stand-in extractor that fabricates plausible invoice fields.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimulatedExtractor;

impl InvoiceExtractor for SimulatedExtractor {
    fn extract(&self, passenger: &PassengerRecord) -> InvoiceRecord {
        let mut rng = rand::rng();
        let number: u32 = rng.random_range(1000..=9999);
        let amount: f64 = rng.random_range(100.0..20_000.0);
        let gstin = rng.random_bool(0.5).then(|| SIMULATED_GSTIN.to_string());
        let confidence: u32 = rng.random_range(80..=100);

        InvoiceRecord {
            invoice_number: Some(format!("INV-{number}")),
            date: Some(chrono::Local::now().format("%Y-%m-%d").to_string()),
            airline: Some(SIMULATED_AIRLINE.to_string()),
            amount: Some(round_cents(amount)),
            gstin,
            confidence: Some(f64::from(confidence)),
            ticket_number: Some(passenger.ticket_number.clone()),
            first_name: passenger.first_name.clone(),
            last_name: passenger.last_name.clone(),
            passenger_id: passenger.id,
            pdf: passenger.pdf_filename.as_deref().map(artifact_link),
        }
    }
}
