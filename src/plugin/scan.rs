//! Scan drivers
//!
//! Executes a table's list or get operation the way the host engine would:
//! validate key-column qualifiers, fan out over the region matrix, run the
//! hydrate function per region, and classify ignorable errors. Also home of
//! the bounded pagination loop shared by paginated hydrate functions.

use crate::config::ConnectionConfig;
use crate::plugin::cache::{ConnectionCache, MATRIX_QUAL_REGION};
use crate::plugin::context::{QueryContext, QueryStatus, RowSink};
use crate::plugin::registry::Plugin;
use crate::plugin::table::{KeyColumn, Table};
use crate::scalingo::{Page, PageOpts, DEFAULT_PER_PAGE};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Options for one scan
#[derive(Default)]
pub struct ScanOptions {
    /// Key-column qualifier values, by column name
    pub quals: HashMap<String, String>,
    /// Row-count limit requested by the caller
    pub limit: Option<i64>,
    /// Cooperative cancellation flag, checked between pages and regions
    pub cancel: Option<Arc<AtomicBool>>,
}

/// Execute a table's list operation, streaming rows to `sink`.
pub async fn scan_list(
    plugin: &Plugin,
    table_name: &str,
    options: ScanOptions,
    connection: Arc<ConnectionConfig>,
    cache: Arc<ConnectionCache>,
    sink: Arc<dyn RowSink>,
) -> Result<()> {
    let table = plugin
        .table(table_name)
        .with_context(|| format!("Unknown table: {table_name}"))?;
    let list = table
        .list
        .as_ref()
        .with_context(|| format!("Table {table_name} does not support list"))?;

    check_required_quals(table_name, &list.key_columns, &options.quals)?;

    execute(
        table.clone(),
        list.hydrate,
        list.should_ignore,
        options,
        connection,
        cache,
        sink,
    )
    .await
}

/// Execute a table's get operation (zero or one row per region).
pub async fn scan_get(
    plugin: &Plugin,
    table_name: &str,
    options: ScanOptions,
    connection: Arc<ConnectionConfig>,
    cache: Arc<ConnectionCache>,
    sink: Arc<dyn RowSink>,
) -> Result<()> {
    let table = plugin
        .table(table_name)
        .with_context(|| format!("Unknown table: {table_name}"))?;
    let get = table
        .get
        .as_ref()
        .with_context(|| format!("Table {table_name} does not support get"))?;

    check_required_quals(table_name, &get.key_columns, &options.quals)?;

    execute(
        table.clone(),
        get.hydrate,
        get.should_ignore,
        options,
        connection,
        cache,
        sink,
    )
    .await
}

fn check_required_quals(
    table_name: &str,
    key_columns: &[KeyColumn],
    quals: &HashMap<String, String>,
) -> Result<()> {
    for key in key_columns.iter().filter(|k| k.required) {
        if !quals.contains_key(key.name) {
            anyhow::bail!(
                "Table {table_name} requires the '{}' qualifier",
                key.name
            );
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn execute(
    table: Arc<Table>,
    hydrate: crate::plugin::table::HydrateFn,
    should_ignore: Option<crate::plugin::table::IgnorePredicate>,
    options: ScanOptions,
    connection: Arc<ConnectionConfig>,
    cache: Arc<ConnectionCache>,
    sink: Arc<dyn RowSink>,
) -> Result<()> {
    // region fan-out: one hydrate call per matrix entry
    let regions: Vec<Option<String>> = match table.matrix {
        Some(matrix) => matrix(&connection, &cache)
            .into_iter()
            .map(Some)
            .collect(),
        None => vec![None],
    };

    let status = Arc::new(QueryStatus::default());
    let cancel = options
        .cancel
        .unwrap_or_else(|| Arc::new(AtomicBool::new(false)));

    for region in regions {
        let mut quals = options.quals.clone();
        if let Some(region) = &region {
            quals.insert(MATRIX_QUAL_REGION.to_string(), region.clone());
        }

        let ctx = QueryContext::new(
            table.clone(),
            quals,
            options.limit,
            connection.clone(),
            cache.clone(),
            status.clone(),
            sink.clone(),
        )
        .with_cancel_flag(cancel.clone());

        match hydrate(&ctx).await {
            Ok(()) => {}
            Err(err) if should_ignore.is_some_and(|pred| pred(&err)) => {
                tracing::debug!(
                    table = table.name,
                    region = region.as_deref().unwrap_or("-"),
                    "Ignoring error: {err}"
                );
            }
            Err(err) => return Err(err),
        }

        if options.limit.is_some_and(|limit| status.emitted() >= limit) {
            break;
        }
        if ctx.is_cancelled() {
            break;
        }
    }

    Ok(())
}

/// Fetch pages from a paginated list endpoint and stream every item, stopping
/// when the source reports no next page, the row budget is exhausted, or the
/// query is cancelled.
///
/// The budget is cooperative: a page already fetched is streamed in full, so
/// a limited query may overshoot by at most one page. The first request
/// clamps the page size to the limit when one is known.
pub async fn stream_paginated<F, Fut>(ctx: &QueryContext, mut fetch_page: F) -> Result<()>
where
    F: FnMut(PageOpts) -> Fut,
    Fut: Future<Output = Result<Page>>,
{
    let mut opts = PageOpts::default();
    if let Some(limit) = ctx.limit() {
        if limit > 0 && limit < i64::from(DEFAULT_PER_PAGE) {
            opts.per_page = limit as u32;
        }
    }

    loop {
        let page = fetch_page(opts).await?;
        for item in page.items {
            ctx.stream_item(item);
        }

        let Some(next_page) = page.next_page else {
            break;
        };
        opts.page = next_page;

        if ctx.rows_remaining() <= 0 {
            break;
        }
        if ctx.is_cancelled() {
            tracing::debug!(table = ctx.table().name, "Pagination cancelled");
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::context::CollectingSink;
    use crate::plugin::table::{Column, ColumnType};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn test_table() -> Arc<Table> {
        Arc::new(Table {
            name: "t",
            description: "",
            list: None,
            get: None,
            matrix: None,
            columns: vec![Column::new("id", ColumnType::Int, "")],
        })
    }

    fn context(limit: Option<i64>, sink: Arc<CollectingSink>) -> QueryContext {
        QueryContext::new(
            test_table(),
            HashMap::new(),
            limit,
            Arc::new(ConnectionConfig::default()),
            Arc::new(ConnectionCache::default()),
            Arc::new(QueryStatus::default()),
            sink,
        )
    }

    /// Fake source: pages of 100, 100 and 40 items
    fn page_for(request: PageOpts) -> Page {
        let (count, next_page) = match request.page {
            1 => (100.min(request.per_page), Some(2)),
            2 => (100.min(request.per_page), Some(3)),
            _ => (40, None),
        };
        Page {
            items: (0..count).map(|i| json!({"id": i})).collect(),
            next_page,
        }
    }

    #[tokio::test]
    async fn test_paginates_until_exhausted() {
        let sink = Arc::new(CollectingSink::new());
        let ctx = context(None, sink.clone());
        let calls = AtomicUsize::new(0);

        stream_paginated(&ctx, |opts| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { Ok(page_for(opts)) }
        })
        .await
        .unwrap();

        assert_eq!(sink.len(), 240);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_row_limit_short_circuits_after_budget() {
        let sink = Arc::new(CollectingSink::new());
        let ctx = context(Some(150), sink.clone());
        let calls = AtomicUsize::new(0);
        let mut first_per_page = 0;

        stream_paginated(&ctx, |opts| {
            calls.fetch_add(1, Ordering::SeqCst);
            if opts.page == 1 {
                first_per_page = opts.per_page;
            }
            async move { Ok(page_for(opts)) }
        })
        .await
        .unwrap();

        // budget exhausted after page 2; never fetches a third page
        assert!(first_per_page <= 150);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(sink.len(), 200);
    }

    #[tokio::test]
    async fn test_small_limit_clamps_page_size() {
        let sink = Arc::new(CollectingSink::new());
        let ctx = context(Some(50), sink.clone());
        let calls = AtomicUsize::new(0);

        stream_paginated(&ctx, |opts| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { Ok(page_for(opts)) }
        })
        .await
        .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(sink.len(), 50);
    }

    #[tokio::test]
    async fn test_cancellation_stops_between_pages() {
        let sink = Arc::new(CollectingSink::new());
        let flag = Arc::new(AtomicBool::new(false));
        let ctx = context(None, sink.clone()).with_cancel_flag(flag.clone());
        let calls = AtomicUsize::new(0);

        stream_paginated(&ctx, |opts| {
            calls.fetch_add(1, Ordering::SeqCst);
            flag.store(true, Ordering::Relaxed);
            async move { Ok(page_for(opts)) }
        })
        .await
        .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(sink.len(), 100);
    }
}
