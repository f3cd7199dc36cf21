//! ahps_service: NWS AHPS river-gauge report retrieval and derived readings.
//!
//! # Module structure
//!
//! ```text
//! ahps_service
//! ├── model       - shared data types (SiteRecord, TimePoint, Threshold, RiverPoint, AhpsError, …)
//! ├── config      - service/gauge configuration loader (ahps.toml)
//! ├── client      - blocking fetch + parse of one gauge report
//! ├── ingest
//! │   ├── ahps    - AHPS hydrograph API: URL construction, fetch, XML parsing
//! │   └── fixtures (test only) - representative XML documents
//! └── analysis
//!     └── site_queries - current stage, current level, projected crest
//! ```

pub mod analysis;
pub mod client;
pub mod config;
pub mod ingest;
pub mod model;
