//! Blocking AHPS site client.
//!
//! Bundles a `reqwest` client (built with the configured timeout), the
//! endpoint and the ordering policy, so callers can go straight from a
//! gauge id to a parsed `SiteRecord`.

use log::info;

use crate::config::{AhpsConfig, ObservationOrder, ServiceConfig};
use crate::ingest::ahps::{fetch_site_xml, parse_site_with};
use crate::model::{AhpsError, SiteRecord};

pub struct SiteClient {
    http: reqwest::blocking::Client,
    base_url: String,
    order: ObservationOrder,
}

impl SiteClient {
    /// Client for the default endpoint with a 5 second timeout.
    pub fn new() -> Result<Self, AhpsError> {
        Self::from_config(&AhpsConfig::default())
    }

    pub fn from_config(config: &AhpsConfig) -> Result<Self, AhpsError> {
        Self::with_service(&config.service, config.parsing.observation_order)
    }

    pub fn with_service(
        service: &ServiceConfig,
        order: ObservationOrder,
    ) -> Result<Self, AhpsError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(service.timeout())
            .build()
            .map_err(|e| AhpsError::RequestError(e.to_string()))?;

        Ok(Self {
            http,
            base_url: service.base_url.clone(),
            order,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Raw document bytes for `gauge`.
    pub fn fetch_raw(&self, gauge: &str) -> Result<Vec<u8>, AhpsError> {
        fetch_site_xml(&self.http, &self.base_url, gauge)
    }

    /// Fetches and parses the report for `gauge`.
    ///
    /// Transport and HTTP failures surface as `RequestError`/`HttpError`;
    /// anything the service returns that isn't a valid `<site>` document
    /// surfaces as the corresponding parse error.
    pub fn get_site(&self, gauge: &str) -> Result<SiteRecord, AhpsError> {
        let body = self.fetch_raw(gauge)?;
        let site = parse_site_with(&body, self.order)?;
        info!(
            "{}: {} observed, {} forecast points",
            gauge,
            site.observed.len(),
            site.forecast.points.len()
        );
        Ok(site)
    }
}

/// Fetches and parses `gauge` from the public AHPS endpoint with default
/// settings.
pub fn get_site(gauge: &str) -> Result<SiteRecord, AhpsError> {
    SiteClient::new()?.get_site(gauge)
}
