use chrono::NaiveDate;
use std::time::Duration;
use ureq::Agent;

use crate::config::ApiSettings;
use crate::error::FetchError;
use crate::invoice::model::{parse_invoices, InvoiceRecord};

/// Something that can GET a URL and hand back the response body.
pub trait Transport {
    fn get(&self, url: &str) -> Result<String, FetchError>;
}

/// Blocking HTTP transport backed by a ureq agent.
/// Non-2xx responses surface as `FetchError::Status`.
pub struct HttpTransport {
    agent: Agent,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        Self { agent }
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<String, FetchError> {
        let body = self.agent.get(url).call()?.body_mut().read_to_string()?;
        Ok(body)
    }
}

/// Build the request URL for one day of invoices
pub fn request_url(endpoint: &str, organization_id: &str, date: NaiveDate) -> String {
    let separator = if endpoint.contains('?') { '&' } else { '?' };
    format!(
        "{endpoint}{separator}organization_id={organization_id}&date={}",
        date.format("%Y-%m-%d")
    )
}

pub struct InvoiceFetcher<T: Transport> {
    transport: T,
    endpoint: String,
    organization_id: String,
}

impl InvoiceFetcher<HttpTransport> {
    pub fn from_settings(api: &ApiSettings) -> Self {
        Self::new(
            HttpTransport::new(Duration::from_secs(api.timeout_secs)),
            &api.endpoint,
            &api.organization_id,
        )
    }
}

impl<T: Transport> InvoiceFetcher<T> {
    pub fn new(transport: T, endpoint: &str, organization_id: &str) -> Self {
        Self {
            transport,
            endpoint: endpoint.to_string(),
            organization_id: organization_id.to_string(),
        }
    }

    /// Fetch every invoice issued on `date`
    pub fn fetch(&self, date: NaiveDate) -> Result<Vec<InvoiceRecord>, FetchError> {
        let url = request_url(&self.endpoint, &self.organization_id, date);
        tracing::debug!(%url, "fetching invoices");

        let body = self.transport.get(&url)?;
        let invoices = parse_invoices(&body)?;

        tracing::debug!(%date, count = invoices.len(), "fetched invoices");
        Ok(invoices)
    }
}
