//! Query context
//!
//! Per-hydrate-call state handed to table handlers: key-column qualifiers,
//! the optional row limit, the shared row budget, the streaming row sink and
//! a cancellation flag. This is the seam the host engine fills in; the CLI
//! harness and tests provide their own sinks.

use crate::config::ConnectionConfig;
use crate::plugin::cache::ConnectionCache;
use crate::plugin::table::Table;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

/// Streaming row sink. Rows are pushed one at a time; nothing buffers the
/// full result set on the plugin side.
pub trait RowSink: Send + Sync {
    fn push_row(&self, row: Value);
}

/// Sink collecting rows in memory (tests, small CLI runs)
#[derive(Default)]
pub struct CollectingSink {
    rows: Mutex<Vec<Value>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> Vec<Value> {
        self.rows.lock().expect("sink lock poisoned").clone()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().expect("sink lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RowSink for CollectingSink {
    fn push_row(&self, row: Value) {
        self.rows.lock().expect("sink lock poisoned").push(row);
    }
}

/// Row counter shared across the hydrate calls of one query (one per region
/// in a fan-out), backing the cooperative row budget.
#[derive(Default)]
pub struct QueryStatus {
    emitted: AtomicI64,
}

impl QueryStatus {
    pub fn emitted(&self) -> i64 {
        self.emitted.load(Ordering::Relaxed)
    }

    fn record_row(&self) {
        self.emitted.fetch_add(1, Ordering::Relaxed);
    }
}

/// Context for one hydrate invocation
pub struct QueryContext {
    table: Arc<Table>,
    quals: HashMap<String, String>,
    limit: Option<i64>,
    connection: Arc<ConnectionConfig>,
    cache: Arc<ConnectionCache>,
    status: Arc<QueryStatus>,
    sink: Arc<dyn RowSink>,
    cancelled: Arc<AtomicBool>,
}

impl QueryContext {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        table: Arc<Table>,
        quals: HashMap<String, String>,
        limit: Option<i64>,
        connection: Arc<ConnectionConfig>,
        cache: Arc<ConnectionCache>,
        status: Arc<QueryStatus>,
        sink: Arc<dyn RowSink>,
    ) -> Self {
        Self {
            table,
            quals,
            limit,
            connection,
            cache,
            status,
            sink,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Share a cancellation flag owned by the caller
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancelled = flag;
        self
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Value of a key-column qualifier, if the query supplied one
    pub fn qual(&self, name: &str) -> Option<&str> {
        self.quals.get(name).map(|s| s.as_str())
    }

    pub fn limit(&self) -> Option<i64> {
        self.limit
    }

    pub fn connection(&self) -> &ConnectionConfig {
        &self.connection
    }

    pub fn cache(&self) -> &ConnectionCache {
        &self.cache
    }

    /// Remaining row budget. Unlimited queries report `i64::MAX`.
    pub fn rows_remaining(&self) -> i64 {
        match self.limit {
            Some(limit) => limit - self.status.emitted(),
            None => i64::MAX,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Shape one raw API item into a row and push it to the sink
    pub fn stream_item(&self, item: Value) {
        let row = self.table.render_row(&item, &self.quals);
        self.sink.push_row(row);
        self.status.record_row();
    }
}
