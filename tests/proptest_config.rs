//! Property-based tests using proptest
//!
//! These tests verify the region matrix precedence rules, the pagination
//! budget behavior, and row rendering against randomized inputs.

use proptest::prelude::*;
use scalingo_tables::config::ConnectionConfig;
use scalingo_tables::plugin::table::extract_value;
use scalingo_tables::plugin::{
    build_region_matrix, stream_paginated, CollectingSink, ConnectionCache, QueryContext,
    QueryStatus, Table, DEFAULT_REGION,
};
use scalingo_tables::scalingo::{Page, PageOpts};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// Generate an arbitrary region identifier
fn arb_region() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z]{3}-[a-z]{2,8}[0-9]").unwrap()
}

fn arb_region_list() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(arb_region(), 0..5)
}

fn empty_table() -> Arc<Table> {
    Arc::new(Table {
        name: "t",
        description: "",
        list: None,
        get: None,
        matrix: None,
        columns: Vec::new(),
    })
}

fn context(limit: Option<i64>, sink: Arc<CollectingSink>) -> QueryContext {
    QueryContext::new(
        empty_table(),
        HashMap::new(),
        limit,
        Arc::new(ConnectionConfig::default()),
        Arc::new(ConnectionCache::default()),
        Arc::new(QueryStatus::default()),
        sink,
    )
}

/// Paginated fake: `total` items split into pages of `per_page`
fn fake_page(total: u32, opts: PageOpts) -> Page {
    let start = (opts.page - 1) * opts.per_page;
    let count = opts.per_page.min(total.saturating_sub(start));
    let next_page = if start + count < total {
        Some(opts.page + 1)
    } else {
        None
    };
    Page {
        items: (0..count).map(|i| json!({"id": start + i})).collect(),
        next_page,
    }
}

proptest! {
    /// A non-empty region list always replaces the singular region
    #[test]
    fn matrix_prefers_non_empty_list(
        singular in prop::option::of(arb_region()),
        list in arb_region_list(),
    ) {
        let connection = ConnectionConfig {
            region: singular.clone(),
            regions: Some(list.clone()),
            ..Default::default()
        };
        let matrix = build_region_matrix(&connection, &ConnectionCache::default());

        if !list.is_empty() {
            prop_assert_eq!(matrix, list);
        } else if let Some(region) = singular {
            prop_assert_eq!(matrix, vec![region]);
        } else {
            prop_assert_eq!(matrix, vec![DEFAULT_REGION.to_string()]);
        }
    }

    /// The matrix is never empty
    #[test]
    fn matrix_is_never_empty(
        singular in prop::option::of(arb_region()),
        list in prop::option::of(arb_region_list()),
    ) {
        let connection = ConnectionConfig {
            region: singular,
            regions: list,
            ..Default::default()
        };
        let matrix = build_region_matrix(&connection, &ConnectionCache::default());
        prop_assert!(!matrix.is_empty());
    }

    /// Without a limit, pagination streams every item exactly once
    #[test]
    fn pagination_streams_everything(total in 0u32..500) {
        let sink = Arc::new(CollectingSink::new());
        let ctx = context(None, sink.clone());

        tokio_test::block_on(stream_paginated(&ctx, |opts| {
            let page = fake_page(total, opts);
            async move { Ok(page) }
        })).unwrap();

        prop_assert_eq!(sink.len() as u32, total);
    }

    /// With a limit, the overshoot is bounded by one page
    #[test]
    fn pagination_overshoot_is_at_most_one_page(
        total in 0u32..500,
        limit in 1i64..300,
    ) {
        let sink = Arc::new(CollectingSink::new());
        let ctx = context(Some(limit), sink.clone());
        let mut max_per_page = 0u32;

        tokio_test::block_on(stream_paginated(&ctx, |opts| {
            max_per_page = max_per_page.max(opts.per_page);
            let page = fake_page(total, opts);
            async move { Ok(page) }
        })).unwrap();

        let emitted = sink.len() as i64;
        prop_assert!(emitted <= total as i64);
        // never requests more than the limit on the first page
        prop_assert!(i64::from(max_per_page) <= limit.max(100));
        // cooperative budget: bounded overshoot
        prop_assert!(emitted < limit + i64::from(max_per_page));
    }

    /// Dot-path extraction returns exactly the nested value
    #[test]
    fn extract_value_roundtrips_nested_fields(
        outer in "[a-z]{1,8}",
        inner in "[a-z]{1,8}",
        value in "[a-zA-Z0-9 ]{0,20}",
    ) {
        let item = json!({ &outer: { &inner: &value } });
        let path = format!("{outer}.{inner}");
        prop_assert_eq!(extract_value(&item, &path), Value::String(value));
    }
}
