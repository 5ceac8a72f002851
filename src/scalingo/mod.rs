//! Scalingo API interaction module
//!
//! Thin authenticated client over the platform's REST APIs: the regional
//! API (`api.<region>.scalingo.com`), the region-independent authentication
//! API (`auth.scalingo.com`) and the regional database API
//! (`db-api.<region>.scalingo.com`).

pub mod client;
pub mod http;

pub use client::{ClientConfig, Page, PageOpts, ScalingoClient, DEFAULT_PER_PAGE};
pub use http::{format_api_error, is_not_found, ApiError};
