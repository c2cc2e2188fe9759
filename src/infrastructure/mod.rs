//! Infrastructure layer providing external service integrations.
//!
//! This module contains the HTTP client for the loan service, CSV export
//! of results, and log output setup.

pub mod http;
pub mod logging;
pub mod persistence;

pub use http::*;
pub use persistence::*;
