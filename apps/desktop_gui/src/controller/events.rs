//! Events flowing from the backend worker to the UI thread.

use client_core::{ActionOutcome, DashboardEvent, DownloadAllReport};
use shared::{domain::TicketNumber, protocol::Stage};

#[derive(Debug, Clone)]
pub enum UiEvent {
    Dashboard(DashboardEvent),
    Error(String),
}

/// Status bar text for events worth surfacing to the operator.
pub fn status_line(event: &DashboardEvent) -> Option<String> {
    match event {
        DashboardEvent::ActionFinished {
            stage,
            ticket,
            outcome,
        } => Some(describe_action(*stage, ticket, *outcome)),
        DashboardEvent::DownloadAllFinished(report) => Some(describe_download_all(report)),
        _ => None,
    }
}

fn describe_action(stage: Stage, ticket: &TicketNumber, outcome: ActionOutcome) -> String {
    let action = match stage {
        Stage::Download => "Download",
        Stage::Parse => "Parse",
    };
    match outcome {
        ActionOutcome::Sent => format!("{action} requested for {ticket}"),
        ActionOutcome::Rejected { status } => {
            format!("{action} for {ticket} rejected (HTTP {status})")
        }
        ActionOutcome::TransportFailed => format!("{action} for {ticket}: server unreachable"),
    }
}

fn describe_download_all(report: &DownloadAllReport) -> String {
    match report.failed.len() {
        0 => format!("Download all: {} requested", report.attempted.len()),
        failed => format!(
            "Download all: {} requested, {failed} failed",
            report.attempted.len()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use client_core::Pane;

    #[test]
    fn action_results_become_status_text() {
        let event = DashboardEvent::ActionFinished {
            stage: Stage::Parse,
            ticket: "T9".into(),
            outcome: ActionOutcome::Rejected { status: 400 },
        };
        assert_eq!(
            status_line(&event).as_deref(),
            Some("Parse for T9 rejected (HTTP 400)")
        );

        let report = DownloadAllReport {
            attempted: vec!["T1".into(), "T2".into()],
            failed: vec!["T2".into()],
        };
        assert_eq!(
            status_line(&DashboardEvent::DownloadAllFinished(report)).as_deref(),
            Some("Download all: 2 requested, 1 failed")
        );
    }

    #[test]
    fn data_updates_do_not_touch_status() {
        assert!(status_line(&DashboardEvent::PaneChanged(Pane::Invoices)).is_none());
        assert!(status_line(&DashboardEvent::SummaryUpdated(None)).is_none());
    }
}
