//! In-process record service used by the dashboard and dispatcher tests.

use std::{
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
    time::Duration,
};

use async_trait::async_trait;
use shared::{
    domain::{InvoiceRecord, PassengerRecord, StageStatus, SummaryAggregate, TicketNumber},
    protocol::{RecordsQuery, Stage},
};
use tokio::sync::Mutex;

use crate::{error::ServiceError, service::RecordService};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    FetchRecords(Option<String>),
    FetchInvoices,
    FetchSummary,
    Trigger(Stage, TicketNumber),
}

pub(crate) struct FakeRecordService {
    pub(crate) records: Mutex<Vec<PassengerRecord>>,
    pub(crate) invoices: Mutex<Vec<InvoiceRecord>>,
    pub(crate) summary: Mutex<Option<SummaryAggregate>>,
    pub(crate) calls: Mutex<Vec<Call>>,
    pub(crate) fail_reads: AtomicBool,
    pub(crate) fail_actions: AtomicBool,
    pub(crate) action_delay: Duration,
    in_flight: AtomicUsize,
    pub(crate) max_in_flight: AtomicUsize,
}

impl FakeRecordService {
    pub(crate) fn with_records(records: Vec<PassengerRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            invoices: Mutex::new(Vec::new()),
            summary: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
            fail_reads: AtomicBool::new(false),
            fail_actions: AtomicBool::new(false),
            action_delay: Duration::ZERO,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub(crate) fn with_action_delay(mut self, delay: Duration) -> Self {
        self.action_delay = delay;
        self
    }

    pub(crate) async fn calls(&self) -> Vec<Call> {
        self.calls.lock().await.clone()
    }

    pub(crate) async fn trigger_count(&self, stage: Stage) -> usize {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|call| matches!(call, Call::Trigger(s, _) if *s == stage))
            .count()
    }

    fn read_failure(&self, route: &str) -> Result<(), ServiceError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ServiceError::Decode {
                url: route.to_string(),
                source: serde_json::from_str::<serde_json::Value>("<html>")
                    .expect_err("not json"),
            });
        }
        Ok(())
    }
}

pub(crate) fn record(ticket: &str, download: StageStatus, parse: StageStatus) -> PassengerRecord {
    let mut record = PassengerRecord::new(ticket);
    record.download_status = download;
    record.parse_status = parse;
    record
}

#[async_trait]
impl RecordService for FakeRecordService {
    async fn fetch_records(
        &self,
        query: &RecordsQuery,
    ) -> Result<Vec<PassengerRecord>, ServiceError> {
        self.calls
            .lock()
            .await
            .push(Call::FetchRecords(query.query.clone()));
        self.read_failure("/records")?;
        let records = self.records.lock().await.clone();
        Ok(match &query.query {
            Some(text) => records
                .into_iter()
                .filter(|r| r.ticket_number.as_str().contains(text.as_str()))
                .collect(),
            None => records,
        })
    }

    async fn fetch_invoices(&self) -> Result<Vec<InvoiceRecord>, ServiceError> {
        self.calls.lock().await.push(Call::FetchInvoices);
        self.read_failure("/invoices")?;
        Ok(self.invoices.lock().await.clone())
    }

    async fn fetch_summary(&self) -> Result<Option<SummaryAggregate>, ServiceError> {
        self.calls.lock().await.push(Call::FetchSummary);
        self.read_failure("/summary")?;
        Ok(self.summary.lock().await.clone())
    }

    async fn trigger_stage(&self, stage: Stage, ticket: &TicketNumber) -> Result<(), ServiceError> {
        self.calls
            .lock()
            .await
            .push(Call::Trigger(stage, ticket.clone()));
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.action_delay.is_zero() {
            tokio::time::sleep(self.action_delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail_actions.load(Ordering::SeqCst) {
            return Err(ServiceError::Status {
                url: format!("/actions/{}/{ticket}", stage.as_path_segment()),
                status: 404,
            });
        }

        let mut records = self.records.lock().await;
        if let Some(record) = records.iter_mut().find(|r| &r.ticket_number == ticket) {
            match stage {
                Stage::Download => record.download_status = StageStatus::Success,
                Stage::Parse => record.parse_status = StageStatus::Success,
            }
        }
        Ok(())
    }
}
