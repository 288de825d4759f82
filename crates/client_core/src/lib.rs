//! Client core for the travel-document dashboard: keeps a local view of
//! passenger records consistent with the record service, triggers stage
//! actions, and renders panes from whatever was last fetched.

pub mod cache;
pub mod config;
pub mod dashboard;
pub mod dispatcher;
pub mod error;
pub mod render;
pub mod service;
pub mod view;

pub use cache::{RecordCache, RecordSnapshot, RefreshTicket};
pub use config::{load_settings, ClientSettings};
pub use dashboard::{Dashboard, DashboardEvent};
pub use dispatcher::{ActionDispatcher, ActionOutcome, DownloadAllReport, Reconciler};
pub use error::ServiceError;
pub use render::{
    render_invoices, render_passengers, render_summary, Badge, InvoiceView, PassengerView,
    SummaryView,
};
pub use service::{HttpRecordService, RecordService};
pub use view::{Pane, PaneLoad, ViewSelector};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
