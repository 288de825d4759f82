//! UI layer for the dashboard window.

pub mod app;

pub use app::DashboardApp;
