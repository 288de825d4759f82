use std::{fs::File, io::Read, path::Path};

use anyhow::Context;
use serde::Deserialize;
use shared::domain::PassengerRecord;

#[derive(Debug, Deserialize)]
struct RosterRow {
    #[serde(rename = "Ticket Number")]
    ticket_number: String,
    #[serde(rename = "First Name", default)]
    first_name: Option<String>,
    #[serde(rename = "Last Name", default)]
    last_name: Option<String>,
}

pub fn load_roster(path: &Path) -> anyhow::Result<Vec<PassengerRecord>> {
    let file = File::open(path).with_context(|| format!("opening roster {}", path.display()))?;
    parse_roster(file).with_context(|| format!("reading roster {}", path.display()))
}

/// Rows become passengers with ids 1..N and both stages pending.
pub fn parse_roster(input: impl Read) -> anyhow::Result<Vec<PassengerRecord>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(input);
    let mut passengers = Vec::new();
    for (index, row) in reader.deserialize::<RosterRow>().enumerate() {
        let row = row?;
        let mut passenger = PassengerRecord::new(normalize_ticket(&row.ticket_number));
        passenger.id = Some(index as i64 + 1);
        passenger.first_name = row.first_name.filter(|n| !n.is_empty());
        passenger.last_name = row.last_name.filter(|n| !n.is_empty());
        passengers.push(passenger);
    }
    Ok(passengers)
}

/// Spreadsheet exports turn numeric tickets into floats; drop the `.0`.
fn normalize_ticket(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed.strip_suffix(".0").unwrap_or(trimmed).to_string()
}
