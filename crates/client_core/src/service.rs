//! Remote record service seam and its HTTP implementation.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use shared::{
    domain::{InvoiceRecord, PassengerRecord, SummaryAggregate, TicketNumber},
    protocol::{self, RecordsQuery, Stage, RECORDS_QUERY_PARAM},
};
use tracing::debug;
use url::Url;

use crate::{config::ClientSettings, error::ServiceError};

#[async_trait]
pub trait RecordService: Send + Sync {
    async fn fetch_records(&self, query: &RecordsQuery)
        -> Result<Vec<PassengerRecord>, ServiceError>;
    async fn fetch_invoices(&self) -> Result<Vec<InvoiceRecord>, ServiceError>;
    /// `Ok(None)` when the service has nothing to report yet.
    async fn fetch_summary(&self) -> Result<Option<SummaryAggregate>, ServiceError>;
    /// Sends a stage-advance request. Success only means the service accepted it.
    async fn trigger_stage(&self, stage: Stage, ticket: &TicketNumber)
        -> Result<(), ServiceError>;
}

pub struct HttpRecordService {
    http: Client,
    base_url: Url,
}

impl HttpRecordService {
    pub fn new(server_url: &str) -> Result<Self, ServiceError> {
        Self::with_client(server_url, Client::new())
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Self, ServiceError> {
        let http = Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(|source| ServiceError::Transport {
                url: settings.server_url.clone(),
                source,
            })?;
        Self::with_client(&settings.server_url, http)
    }

    fn with_client(server_url: &str, http: Client) -> Result<Self, ServiceError> {
        let base_url = Url::parse(server_url.trim()).map_err(|err| ServiceError::InvalidUrl {
            url: server_url.to_string(),
            reason: err.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ServiceError::InvalidUrl {
                url: server_url.to_string(),
                reason: "url cannot carry a path".to_string(),
            });
        }
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute url for a link handed out by the service. Relative links such
    /// as artifact paths are resolved under the base url's path.
    pub fn resolve_link(&self, link: &str) -> Result<Url, ServiceError> {
        match Url::parse(link) {
            Ok(absolute) => Ok(absolute),
            Err(_) => self.endpoint(link),
        }
    }

    fn endpoint(&self, route: &str) -> Result<Url, ServiceError> {
        let segments = route.trim_start_matches('/').split('/');
        self.endpoint_segments(segments)
    }

    fn endpoint_segments<'a>(
        &self,
        segments: impl IntoIterator<Item = &'a str>,
    ) -> Result<Url, ServiceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ServiceError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: "url cannot carry a path".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ServiceError> {
        let body = self.get_bytes(url.clone()).await?;
        serde_json::from_slice(&body).map_err(|source| ServiceError::Decode {
            url: url.to_string(),
            source,
        })
    }

    async fn get_bytes(&self, url: Url) -> Result<Vec<u8>, ServiceError> {
        debug!(%url, "record service GET");
        let res = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|source| ServiceError::Transport {
                url: url.to_string(),
                source,
            })?;
        if !res.status().is_success() {
            return Err(ServiceError::Status {
                url: url.to_string(),
                status: res.status().as_u16(),
            });
        }
        let bytes = res.bytes().await.map_err(|source| ServiceError::Transport {
            url: url.to_string(),
            source,
        })?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl RecordService for HttpRecordService {
    async fn fetch_records(
        &self,
        query: &RecordsQuery,
    ) -> Result<Vec<PassengerRecord>, ServiceError> {
        let mut url = self.endpoint(protocol::records_route())?;
        if let Some(text) = &query.query {
            url.query_pairs_mut().append_pair(RECORDS_QUERY_PARAM, text);
        }
        self.get_json(url).await
    }

    async fn fetch_invoices(&self) -> Result<Vec<InvoiceRecord>, ServiceError> {
        let url = self.endpoint(protocol::invoices_route())?;
        self.get_json(url).await
    }

    async fn fetch_summary(&self) -> Result<Option<SummaryAggregate>, ServiceError> {
        let url = self.endpoint(protocol::summary_route())?;
        let body = self.get_bytes(url.clone()).await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        serde_json::from_slice(&body).map_err(|source| ServiceError::Decode {
            url: url.to_string(),
            source,
        })
    }

    async fn trigger_stage(&self, stage: Stage, ticket: &TicketNumber) -> Result<(), ServiceError> {
        let url = self.endpoint_segments(protocol::action_path_segments(stage, ticket))?;
        debug!(%url, stage = stage.as_path_segment(), "record service POST");
        let res = self
            .http
            .post(url.clone())
            .send()
            .await
            .map_err(|source| ServiceError::Transport {
                url: url.to_string(),
                source,
            })?;
        if !res.status().is_success() {
            return Err(ServiceError::Status {
                url: url.to_string(),
                status: res.status().as_u16(),
            });
        }
        Ok(())
    }
}
