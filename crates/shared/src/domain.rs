use std::fmt;

use serde::{Deserialize, Serialize};

/// Amount above which an invoice is flagged as high value.
pub const HIGH_VALUE_THRESHOLD: f64 = 10_000.0;

const PENDING_LABEL: &str = "Pending";
const SUCCESS_LABEL: &str = "Success";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketNumber(pub String);

impl TicketNumber {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TicketNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TicketNumber {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// State of one pipeline stage for a record.
///
/// The wire form is a bare string. Anything other than `Pending` or
/// `Success` is an error carrying the server-supplied label verbatim; a
/// `null` status reads as `Pending`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum StageStatus {
    #[default]
    Pending,
    Success,
    Error(String),
}

impl StageStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Pending => PENDING_LABEL,
            Self::Success => SUCCESS_LABEL,
            Self::Error(reason) => reason,
        }
    }
}

impl From<String> for StageStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            PENDING_LABEL => Self::Pending,
            SUCCESS_LABEL => Self::Success,
            _ => Self::Error(value),
        }
    }
}

impl From<Option<String>> for StageStatus {
    fn from(value: Option<String>) -> Self {
        value.map(Self::from).unwrap_or_default()
    }
}

impl From<StageStatus> for String {
    fn from(value: StageStatus) -> Self {
        match value {
            StageStatus::Error(reason) => reason,
            other => other.label().to_string(),
        }
    }
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassengerRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub ticket_number: TicketNumber,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub download_status: StageStatus,
    #[serde(default)]
    pub parse_status: StageStatus,
    #[serde(default)]
    pub pdf_filename: Option<String>,
}

impl PassengerRecord {
    pub fn new(ticket_number: impl Into<String>) -> Self {
        Self {
            id: None,
            ticket_number: TicketNumber::new(ticket_number),
            first_name: None,
            last_name: None,
            download_status: StageStatus::Pending,
            parse_status: StageStatus::Pending,
            pdf_filename: None,
        }
    }

    pub fn display_name(&self) -> String {
        format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or_default(),
            self.last_name.as_deref().unwrap_or_default()
        )
        .trim()
        .to_string()
    }

    /// Stage 1 can be (re)requested until it has succeeded.
    pub fn can_download(&self) -> bool {
        !self.download_status.is_success()
    }

    /// Stage 2 is offered only after stage 1 succeeded and until it succeeds itself.
    pub fn can_parse(&self) -> bool {
        self.download_status.is_success() && !self.parse_status.is_success()
    }
}

/// Invoice extracted server-side. Every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    #[serde(default)]
    pub invoice_number: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub airline: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub gstin: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub ticket_number: Option<TicketNumber>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passenger_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf: Option<String>,
}

impl InvoiceRecord {
    pub fn is_high_value(&self) -> bool {
        self.amount.is_some_and(|amount| amount > HIGH_VALUE_THRESHOLD)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AirlineTotal {
    #[serde(default)]
    pub airline: Option<String>,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryAggregate {
    #[serde(default)]
    pub airline_totals: Vec<AirlineTotal>,
    #[serde(default)]
    pub high_value_count: u64,
}

impl SummaryAggregate {
    pub fn is_empty(&self) -> bool {
        self.airline_totals.is_empty()
    }
}
