//! Queryable tables over the Scalingo platform API.
//!
//! Each resource type of the platform (apps, addons, deployments, events,
//! domains, ...) is exposed as a table with a declared column schema. Given a
//! table name and optional key-column qualifiers, the scan drivers fetch the
//! matching resources over REST, paginate, and stream rows to a sink.
//!
//! # Module structure
//!
//! - [`config`] - per-connection settings (token, regions, endpoints)
//! - [`scalingo`] - authenticated REST client for the platform APIs
//! - [`plugin`] - table descriptors, query context, caches, scan drivers
//! - [`tables`] - one module per resource table

pub mod config;
pub mod plugin;
pub mod scalingo;
pub mod tables;
