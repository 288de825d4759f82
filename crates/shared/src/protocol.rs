//! Routes and query shapes shared by the record service and its clients.

use serde::{Deserialize, Serialize};

use crate::domain::TicketNumber;

pub const RECORDS_QUERY_PARAM: &str = "query";

pub fn healthz_route() -> &'static str {
    "/healthz"
}

pub fn records_route() -> &'static str {
    "/records"
}

pub fn invoices_route() -> &'static str {
    "/invoices"
}

pub fn summary_route() -> &'static str {
    "/summary"
}

pub fn download_action_route() -> &'static str {
    "/actions/download/:ticket"
}

pub fn parse_action_route() -> &'static str {
    "/actions/parse/:ticket"
}

pub fn artifact_route() -> &'static str {
    "/artifacts/:filename"
}

/// Path segments for a stage action, ready to be appended to a base url.
pub fn action_path_segments(stage: Stage, ticket: &TicketNumber) -> [&str; 3] {
    ["actions", stage.as_path_segment(), ticket.as_str()]
}

/// Relative link to a stored document artifact.
pub fn artifact_link(filename: &str) -> String {
    format!("/artifacts/{filename}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Download,
    Parse,
}

impl Stage {
    pub fn as_path_segment(self) -> &'static str {
        match self {
            Self::Download => "download",
            Self::Parse => "parse",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordsQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

impl RecordsQuery {
    /// Trims the text; an empty query omits the parameter entirely.
    pub fn from_text(text: &str) -> Self {
        let trimmed = text.trim();
        Self {
            query: (!trimmed.is_empty()).then(|| trimmed.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_query_is_omitted() {
        assert!(RecordsQuery::from_text("   ").query.is_none());
        assert_eq!(
            RecordsQuery::from_text(" ada ").query.as_deref(),
            Some("ada")
        );
    }

    #[test]
    fn action_segments_name_stage_and_ticket() {
        let ticket = TicketNumber::from("2171234567");
        assert_eq!(
            action_path_segments(Stage::Parse, &ticket),
            ["actions", "parse", "2171234567"]
        );
        assert_eq!(artifact_link("2171234567.pdf"), "/artifacts/2171234567.pdf");
    }
}
