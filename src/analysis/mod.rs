//! Derived readings for the AHPS gauge report service.
//!
//! Submodules:
//! - `site_queries` - current stage, current level and projected crest.

pub mod site_queries;
