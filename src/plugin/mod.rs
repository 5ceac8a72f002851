//! Plugin framework seam
//!
//! The pieces a host query engine would negotiate with, plus the scan
//! drivers that exercise them here:
//!
//! - [`table`] - declarative table/column descriptors and row rendering
//! - [`registry`] - the name-keyed table map
//! - [`context`] - per-call query context, row budget and streaming sink
//! - [`cache`] - per-region client cache and region matrix
//! - [`scan`] - list/get execution with region fan-out and pagination

pub mod cache;
pub mod context;
pub mod registry;
pub mod scan;
pub mod table;

pub use cache::{build_region_matrix, connect, ConnectionCache, DEFAULT_REGION, MATRIX_QUAL_REGION};
pub use context::{CollectingSink, QueryContext, QueryStatus, RowSink};
pub use registry::{plugin, Plugin};
pub use scan::{scan_get, scan_list, stream_paginated, ScanOptions};
pub use table::{Column, ColumnType, GetConfig, KeyColumn, ListConfig, Table, Transform};
