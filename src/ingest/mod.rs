//! Data ingestion from the NWS AHPS hydrograph service.
//!
//! Submodules:
//! - `ahps`     - URL construction, blocking fetch, XML parsing.
//! - `fixtures` - (test only) representative XML documents.

pub mod ahps;

#[cfg(test)]
pub(crate) mod fixtures;
