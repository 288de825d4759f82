//! Stage-advance actions with pull-based reconciliation.
//!
//! The dispatcher only promises that a request was sent. Whatever the
//! service answered, the follow-up refresh is what the operator sees.

use std::sync::Arc;

use async_trait::async_trait;
use shared::{domain::TicketNumber, protocol::Stage};
use tracing::{info, warn};

use crate::{cache::RecordSnapshot, error::ServiceError, service::RecordService};

/// Reloads the dispatcher triggers after an action.
#[async_trait]
pub trait Reconciler: Send + Sync {
    async fn refresh_passengers(&self);
    async fn reload_invoices(&self);
    async fn reload_summary(&self);
    async fn current_snapshot(&self) -> Arc<RecordSnapshot>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Sent,
    Rejected { status: u16 },
    TransportFailed,
}

impl ActionOutcome {
    fn from_result(result: &Result<(), ServiceError>) -> Self {
        match result {
            Ok(()) => Self::Sent,
            Err(ServiceError::Status { status, .. }) => Self::Rejected { status: *status },
            Err(_) => Self::TransportFailed,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadAllReport {
    pub attempted: Vec<TicketNumber>,
    pub failed: Vec<TicketNumber>,
}

pub struct ActionDispatcher<'a> {
    service: &'a dyn RecordService,
    reconciler: &'a dyn Reconciler,
}

impl<'a> ActionDispatcher<'a> {
    pub fn new(service: &'a dyn RecordService, reconciler: &'a dyn Reconciler) -> Self {
        Self {
            service,
            reconciler,
        }
    }

    pub async fn trigger_download(&self, ticket: &TicketNumber) -> ActionOutcome {
        let outcome = self.send(Stage::Download, ticket).await;
        self.reconciler.refresh_passengers().await;
        outcome
    }

    /// A parse can create invoices, so all three panes are reloaded.
    pub async fn trigger_parse(&self, ticket: &TicketNumber) -> ActionOutcome {
        let outcome = self.send(Stage::Parse, ticket).await;
        self.reconciler.refresh_passengers().await;
        self.reconciler.reload_invoices().await;
        self.reconciler.reload_summary().await;
        outcome
    }

    /// Downloads every cached record that has not succeeded yet, one request
    /// at a time, then refreshes once.
    pub async fn trigger_download_all(&self) -> DownloadAllReport {
        let snapshot = self.reconciler.current_snapshot().await;
        let eligible: Vec<TicketNumber> = snapshot
            .records
            .iter()
            .filter(|record| record.can_download())
            .map(|record| record.ticket_number.clone())
            .collect();
        info!(eligible = eligible.len(), "download all started");

        let mut report = DownloadAllReport::default();
        for ticket in eligible {
            if self.send(Stage::Download, &ticket).await != ActionOutcome::Sent {
                report.failed.push(ticket.clone());
            }
            report.attempted.push(ticket);
        }

        self.reconciler.refresh_passengers().await;
        info!(
            attempted = report.attempted.len(),
            failed = report.failed.len(),
            "download all finished"
        );
        report
    }

    async fn send(&self, stage: Stage, ticket: &TicketNumber) -> ActionOutcome {
        let result = self.service.trigger_stage(stage, ticket).await;
        if let Err(err) = &result {
            warn!(
                stage = stage.as_path_segment(),
                %ticket,
                %err,
                "stage action not accepted; next refresh will show the real status"
            );
        }
        ActionOutcome::from_result(&result)
    }
}

#[cfg(test)]
#[path = "tests/dispatcher_tests.rs"]
mod tests;
