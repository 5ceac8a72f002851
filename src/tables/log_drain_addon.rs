//! The scalingo_log_drain_addon table

use crate::plugin::cache::{build_region_matrix, connect, MATRIX_QUAL_REGION};
use crate::plugin::context::QueryContext;
use crate::plugin::table::{Column, ColumnType, KeyColumn, ListConfig, Table};
use crate::scalingo::is_not_found;
use anyhow::{Context, Result};

pub fn table() -> Table {
    Table {
        name: "scalingo_log_drain_addon",
        description: "A log drain forwarding the logs of one of an app's addons.",
        list: Some(ListConfig {
            hydrate: |ctx| Box::pin(list(ctx)),
            key_columns: vec![
                KeyColumn::required("app_name"),
                KeyColumn::required("addon_id"),
            ],
            should_ignore: Some(is_not_found),
        }),
        get: None,
        matrix: Some(build_region_matrix),
        columns: vec![
            Column::from_qual("app_name", ColumnType::String, "app_name", "Name of the app."),
            Column::from_qual("addon_id", ColumnType::String, "addon_id", "Unique ID of the addon."),
            Column::from_qual(
                "region",
                ColumnType::String,
                MATRIX_QUAL_REGION,
                "Region the app is hosted in.",
            ),
            Column::new("url", ColumnType::String, "Endpoint the logs are forwarded to."),
        ],
    }
}

async fn list(ctx: &QueryContext) -> Result<()> {
    let client = connect(ctx)?;
    let app_name = ctx.qual("app_name").context("missing app_name qualifier")?;
    let addon_id = ctx.qual("addon_id").context("missing addon_id qualifier")?;

    let url = client.app_url(
        app_name,
        &format!("addons/{}/log_drains", urlencoding::encode(addon_id)),
    );
    let drains = client.list(&url, "drains").await?;
    for drain in drains {
        ctx.stream_item(drain);
    }
    Ok(())
}
