//! Pure renderers from cached data to displayable views.
//!
//! Nothing here touches the cache or the network. Front-ends draw the view
//! models directly (the GUI) or print their `Display` form (the CLI).

use std::fmt;

use shared::{
    domain::{InvoiceRecord, PassengerRecord, StageStatus, SummaryAggregate, TicketNumber},
    protocol::artifact_link,
};

use crate::cache::RecordSnapshot;

pub const EMPTY_PASSENGERS_MESSAGE: &str = "No passengers found.";
pub const EMPTY_INVOICES_MESSAGE: &str = "No invoices yet.";
pub const NO_SUMMARY_MESSAGE: &str = "No invoices yet.";
pub const HIGH_VALUE_MARKER: &str = "High";
const MISSING: &str = "—";
const CURRENCY: &str = "₹";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Badge {
    Success,
    Pending,
    /// Server-supplied label, shown verbatim.
    Error(String),
}

impl Badge {
    pub fn from_status(status: &StageStatus) -> Self {
        match status {
            StageStatus::Success => Self::Success,
            StageStatus::Pending => Self::Pending,
            StageStatus::Error(reason) => Self::Error(reason.clone()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Success => "Success",
            Self::Pending => "Pending",
            Self::Error(reason) => reason,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassengerCounters {
    pub total: usize,
    pub pending_downloads: usize,
    pub parsed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RowActions {
    pub download: bool,
    pub parse: bool,
    pub artifact_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassengerRow {
    pub ticket: TicketNumber,
    pub name: String,
    pub download: Badge,
    pub parse: Badge,
    pub actions: RowActions,
    /// Row checkbox. Drawn but bound to no state or bulk action.
    pub selectable: bool,
}

impl PassengerRow {
    fn from_record(record: &PassengerRecord) -> Self {
        Self {
            ticket: record.ticket_number.clone(),
            name: record.display_name(),
            download: Badge::from_status(&record.download_status),
            parse: Badge::from_status(&record.parse_status),
            actions: RowActions {
                download: record.can_download(),
                parse: record.can_parse(),
                artifact_link: record.pdf_filename.as_deref().map(artifact_link),
            },
            selectable: true,
        }
    }

    pub fn ticket_label(&self) -> &str {
        if self.ticket.as_str().is_empty() {
            MISSING
        } else {
            self.ticket.as_str()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassengerView {
    Empty,
    Table {
        version: u64,
        counters: PassengerCounters,
        rows: Vec<PassengerRow>,
    },
}

impl PassengerView {
    pub fn counters(&self) -> Option<PassengerCounters> {
        match self {
            Self::Empty => None,
            Self::Table { counters, .. } => Some(*counters),
        }
    }

    pub fn rows(&self) -> &[PassengerRow] {
        match self {
            Self::Empty => &[],
            Self::Table { rows, .. } => rows,
        }
    }
}

pub fn render_passengers(snapshot: &RecordSnapshot) -> PassengerView {
    if snapshot.is_empty() {
        return PassengerView::Empty;
    }

    let records = &snapshot.records;
    let counters = PassengerCounters {
        total: records.len(),
        pending_downloads: records
            .iter()
            .filter(|r| r.download_status.is_pending())
            .count(),
        parsed: records.iter().filter(|r| r.parse_status.is_success()).count(),
    };

    PassengerView::Table {
        version: snapshot.version,
        counters,
        rows: records.iter().map(PassengerRow::from_record).collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceRow {
    pub invoice_number: String,
    pub date: String,
    pub airline: String,
    pub amount: String,
    pub high_value: bool,
    pub gstin: String,
    pub confidence: String,
    pub passenger: String,
    pub artifact_link: Option<String>,
}

impl InvoiceRow {
    fn from_invoice(invoice: &InvoiceRecord) -> Self {
        let passenger = match invoice.first_name.as_deref().filter(|n| !n.is_empty()) {
            Some(first) => format!(
                "{first} {}",
                invoice.last_name.as_deref().unwrap_or_default()
            )
            .trim_end()
            .to_string(),
            None => invoice
                .ticket_number
                .as_ref()
                .map(|t| t.to_string())
                .unwrap_or_else(|| MISSING.to_string()),
        };

        Self {
            invoice_number: or_missing(invoice.invoice_number.as_deref()),
            date: or_missing(invoice.date.as_deref()),
            airline: or_missing(invoice.airline.as_deref()),
            amount: invoice
                .amount
                .map(format_money)
                .unwrap_or_else(|| MISSING.to_string()),
            high_value: invoice.is_high_value(),
            gstin: or_missing(invoice.gstin.as_deref()),
            confidence: invoice
                .confidence
                .map(|c| format!("{c}%"))
                .unwrap_or_else(|| MISSING.to_string()),
            passenger,
            artifact_link: invoice.pdf.clone().filter(|p| !p.is_empty()),
        }
    }

    /// Amount cell including the inline high-value marker.
    pub fn amount_cell(&self) -> String {
        if self.high_value {
            format!("{} {HIGH_VALUE_MARKER}", self.amount)
        } else {
            self.amount.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvoiceView {
    Empty,
    Table(Vec<InvoiceRow>),
}

pub fn render_invoices(invoices: &[InvoiceRecord]) -> InvoiceView {
    if invoices.is_empty() {
        return InvoiceView::Empty;
    }
    InvoiceView::Table(invoices.iter().map(InvoiceRow::from_invoice).collect())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarrierLine {
    pub airline: String,
    pub total: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryView {
    NoData,
    Totals {
        carriers: Vec<CarrierLine>,
        high_value_count: u64,
    },
}

/// Displays server-side totals as-is; no arithmetic happens here.
pub fn render_summary(summary: Option<&SummaryAggregate>) -> SummaryView {
    let Some(summary) = summary.filter(|s| !s.is_empty()) else {
        return SummaryView::NoData;
    };

    SummaryView::Totals {
        carriers: summary
            .airline_totals
            .iter()
            .map(|line| CarrierLine {
                airline: line
                    .airline
                    .clone()
                    .filter(|a| !a.is_empty())
                    .unwrap_or_else(|| "Unknown".to_string()),
                total: format_money(line.total),
                count: line.count,
            })
            .collect(),
        high_value_count: summary.high_value_count,
    }
}

fn or_missing(value: Option<&str>) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or(MISSING)
        .to_string()
}

fn format_money(amount: f64) -> String {
    format!("{CURRENCY}{amount}")
}

fn write_table(f: &mut fmt::Formatter<'_>, headers: &[&str], rows: &[Vec<String>]) -> fmt::Result {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    write_row(f, &widths, &header_cells)?;
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_row(f, &widths, &rule)?;
    for row in rows {
        write_row(f, &widths, row)?;
    }
    Ok(())
}

fn write_row(f: &mut fmt::Formatter<'_>, widths: &[usize], cells: &[String]) -> fmt::Result {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    writeln!(f, "{}", line.trim_end())
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error(reason) => write!(f, "!{reason}"),
            other => f.write_str(other.label()),
        }
    }
}

impl fmt::Display for PassengerView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self::Table { counters, rows, .. } = self else {
            return writeln!(f, "{EMPTY_PASSENGERS_MESSAGE}");
        };

        writeln!(
            f,
            "Total: {} | Pending Downloads: {} | Parsed: {}",
            counters.total, counters.pending_downloads, counters.parsed
        )?;
        writeln!(f)?;

        let cells: Vec<Vec<String>> = rows
            .iter()
            .map(|row| {
                let mut actions = Vec::new();
                if row.actions.download {
                    actions.push("[Download]".to_string());
                }
                if row.actions.parse {
                    actions.push("[Parse]".to_string());
                }
                if let Some(link) = &row.actions.artifact_link {
                    actions.push(format!("Open PDF <{link}>"));
                }
                vec![
                    row.ticket_label().to_string(),
                    row.name.clone(),
                    row.download.to_string(),
                    row.parse.to_string(),
                    actions.join(" "),
                    if row.selectable { "[ ]" } else { "" }.to_string(),
                ]
            })
            .collect();
        write_table(
            f,
            &["Ticket", "Passenger", "Download", "Parse", "Actions", "Flag"],
            &cells,
        )
    }
}

impl fmt::Display for InvoiceView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self::Table(rows) = self else {
            return writeln!(f, "{EMPTY_INVOICES_MESSAGE}");
        };

        let cells: Vec<Vec<String>> = rows
            .iter()
            .map(|row| {
                vec![
                    row.invoice_number.clone(),
                    row.date.clone(),
                    row.airline.clone(),
                    row.amount_cell(),
                    row.gstin.clone(),
                    row.confidence.clone(),
                    row.passenger.clone(),
                    row.artifact_link.clone().unwrap_or_else(|| MISSING.to_string()),
                ]
            })
            .collect();
        write_table(
            f,
            &[
                "Invoice", "Date", "Airline", "Amount", "GSTIN", "Confidence", "Passenger", "PDF",
            ],
            &cells,
        )
    }
}

impl fmt::Display for SummaryView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self::Totals {
            carriers,
            high_value_count,
        } = self
        else {
            return writeln!(f, "{NO_SUMMARY_MESSAGE}");
        };

        writeln!(f, "Airline Totals")?;
        for line in carriers {
            writeln!(
                f,
                "  {}: {} — {} invoices",
                line.airline, line.total, line.count
            )?;
        }
        writeln!(f, "High-value invoices (>{CURRENCY}10,000): {high_value_count}")
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
