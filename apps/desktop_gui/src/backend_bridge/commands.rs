//! Backend commands queued from UI to backend worker.

use client_core::Pane;
use shared::domain::TicketNumber;

#[derive(Debug, Clone)]
pub enum BackendCommand {
    LoadAll,
    Search(String),
    SelectPane(Pane),
    Download(TicketNumber),
    Parse(TicketNumber),
    DownloadAll,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoadAll => "load_all",
            Self::Search(_) => "search",
            Self::SelectPane(_) => "select_pane",
            Self::Download(_) => "download",
            Self::Parse(_) => "parse",
            Self::DownloadAll => "download_all",
        }
    }
}
