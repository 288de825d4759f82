//! Dashboard orchestration: owns the cache, pane selection and search text,
//! and publishes fresh data to whichever front-end is drawing it.

use std::sync::Arc;

use async_trait::async_trait;
use shared::{
    domain::{InvoiceRecord, SummaryAggregate, TicketNumber},
    protocol::{RecordsQuery, Stage},
};
use tokio::sync::{broadcast, watch, Mutex};
use tracing::{debug, info, warn};

use crate::{
    cache::{RecordCache, RecordSnapshot},
    dispatcher::{ActionDispatcher, ActionOutcome, DownloadAllReport, Reconciler},
    service::RecordService,
    view::{Pane, PaneLoad, ViewSelector},
};

const EVENT_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
pub enum DashboardEvent {
    PassengersUpdated(Arc<RecordSnapshot>),
    InvoicesUpdated(Arc<Vec<InvoiceRecord>>),
    SummaryUpdated(Option<SummaryAggregate>),
    PaneChanged(Pane),
    ActionFinished {
        stage: Stage,
        ticket: TicketNumber,
        outcome: ActionOutcome,
    },
    DownloadAllFinished(DownloadAllReport),
}

pub struct Dashboard {
    service: Arc<dyn RecordService>,
    cache: RecordCache,
    selector: Mutex<ViewSelector>,
    search_text: Mutex<String>,
    events: broadcast::Sender<DashboardEvent>,
    /// Latest applied snapshot; a slow reader skips to it instead of missing it.
    passengers: watch::Sender<Arc<RecordSnapshot>>,
}

impl Dashboard {
    pub fn new(service: Arc<dyn RecordService>) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let (passengers, _) = watch::channel(Arc::new(RecordSnapshot::default()));
        Arc::new(Self {
            service,
            cache: RecordCache::new(),
            selector: Mutex::new(ViewSelector::default()),
            search_text: Mutex::new(String::new()),
            events,
            passengers,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<DashboardEvent> {
        self.events.subscribe()
    }

    /// Passenger snapshots, coalesced to the most recent one.
    pub fn watch_passengers(&self) -> watch::Receiver<Arc<RecordSnapshot>> {
        self.passengers.subscribe()
    }

    pub async fn snapshot(&self) -> Arc<RecordSnapshot> {
        self.cache.snapshot().await
    }

    pub async fn active_pane(&self) -> Pane {
        self.selector.lock().await.active()
    }

    pub async fn search_text(&self) -> String {
        self.search_text.lock().await.clone()
    }

    /// Startup load of all three panes.
    pub async fn load_all(&self) {
        self.refresh().await;
        self.load_invoices().await;
        self.load_summary().await;
    }

    /// Remembers the search text and refreshes with it.
    pub async fn search(&self, text: &str) -> Arc<RecordSnapshot> {
        *self.search_text.lock().await = text.trim().to_string();
        self.refresh().await
    }

    /// Fetches the record list for the active search and replaces the cache.
    /// A failed or undecodable read empties the cache instead of keeping it.
    pub async fn refresh(&self) -> Arc<RecordSnapshot> {
        let query = RecordsQuery::from_text(&self.search_text().await);
        let ticket = self.cache.begin_refresh();

        let records = match self.service.fetch_records(&query).await {
            Ok(records) => records,
            Err(err) => {
                warn!(%err, "record refresh failed; showing empty list");
                Vec::new()
            }
        };

        match self.cache.apply(ticket, records).await {
            Some(snapshot) => {
                debug!(
                    version = snapshot.version,
                    records = snapshot.len(),
                    "record cache replaced"
                );
                self.passengers.send_replace(Arc::clone(&snapshot));
                self.publish(DashboardEvent::PassengersUpdated(Arc::clone(&snapshot)));
                snapshot
            }
            None => self.cache.snapshot().await,
        }
    }

    pub async fn load_invoices(&self) -> Arc<Vec<InvoiceRecord>> {
        let invoices = match self.service.fetch_invoices().await {
            Ok(invoices) => invoices,
            Err(err) => {
                warn!(%err, "invoice load failed; showing empty list");
                Vec::new()
            }
        };
        let invoices = Arc::new(invoices);
        self.publish(DashboardEvent::InvoicesUpdated(Arc::clone(&invoices)));
        invoices
    }

    pub async fn load_summary(&self) -> Option<SummaryAggregate> {
        let summary = match self.service.fetch_summary().await {
            Ok(summary) => summary,
            Err(err) => {
                warn!(%err, "summary load failed; showing no data");
                None
            }
        };
        self.publish(DashboardEvent::SummaryUpdated(summary.clone()));
        summary
    }

    /// Shows `pane` and loads its data, whether or not it was loaded before.
    pub async fn select_pane(&self, pane: Pane) {
        let load = self.selector.lock().await.select(pane);
        self.publish(DashboardEvent::PaneChanged(pane));
        match load {
            PaneLoad::Passengers => {
                self.refresh().await;
            }
            PaneLoad::Invoices => {
                self.load_invoices().await;
            }
            PaneLoad::Summary => {
                self.load_summary().await;
            }
        }
    }

    pub async fn trigger_download(&self, ticket: &TicketNumber) -> ActionOutcome {
        let outcome = self.dispatcher().trigger_download(ticket).await;
        self.action_finished(Stage::Download, ticket, outcome);
        outcome
    }

    pub async fn trigger_parse(&self, ticket: &TicketNumber) -> ActionOutcome {
        let outcome = self.dispatcher().trigger_parse(ticket).await;
        self.action_finished(Stage::Parse, ticket, outcome);
        outcome
    }

    pub async fn trigger_download_all(&self) -> DownloadAllReport {
        let report = self.dispatcher().trigger_download_all().await;
        self.publish(DashboardEvent::DownloadAllFinished(report.clone()));
        report
    }

    fn dispatcher(&self) -> ActionDispatcher<'_> {
        ActionDispatcher::new(self.service.as_ref(), self)
    }

    fn action_finished(&self, stage: Stage, ticket: &TicketNumber, outcome: ActionOutcome) {
        info!(
            stage = stage.as_path_segment(),
            %ticket,
            ?outcome,
            "stage action reconciled"
        );
        self.publish(DashboardEvent::ActionFinished {
            stage,
            ticket: ticket.clone(),
            outcome,
        });
    }

    fn publish(&self, event: DashboardEvent) {
        // No subscribers is fine: the CLI reads return values instead.
        let _ = self.events.send(event);
    }
}

#[async_trait]
impl Reconciler for Dashboard {
    async fn refresh_passengers(&self) {
        self.refresh().await;
    }

    async fn reload_invoices(&self) {
        self.load_invoices().await;
    }

    async fn reload_summary(&self) {
        self.load_summary().await;
    }

    async fn current_snapshot(&self) -> Arc<RecordSnapshot> {
        self.snapshot().await
    }
}

#[cfg(test)]
#[path = "tests/dashboard_tests.rs"]
mod tests;
