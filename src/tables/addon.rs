//! The scalingo_addon table

use crate::plugin::cache::{build_region_matrix, connect, MATRIX_QUAL_REGION};
use crate::plugin::context::QueryContext;
use crate::plugin::table::{Column, ColumnType, KeyColumn, ListConfig, Table};
use crate::scalingo::is_not_found;
use anyhow::{Context, Result};

pub fn table() -> Table {
    Table {
        name: "scalingo_addon",
        description: "An addon is a database or service provisioned for an app.",
        list: Some(ListConfig {
            hydrate: |ctx| Box::pin(list(ctx)),
            key_columns: vec![KeyColumn::required("app_name")],
            should_ignore: Some(is_not_found),
        }),
        get: None,
        matrix: Some(build_region_matrix),
        columns: vec![
            Column::from_qual("app_name", ColumnType::String, "app_name", "Name of the app."),
            Column::from_qual(
                "region",
                ColumnType::String,
                MATRIX_QUAL_REGION,
                "Region the app is hosted in.",
            ),
            Column::new("id", ColumnType::String, "Unique ID of the addon."),
            Column::new("resource_id", ColumnType::String, "Resource reference of the addon."),
            Column::new("status", ColumnType::String, "Status of the addon."),
            Column::from_field("plan_id", ColumnType::String, "plan.id", "Unique ID of the plan."),
            Column::from_field("plan_name", ColumnType::String, "plan.name", "Name of the plan."),
            Column::from_field(
                "addon_provider_id",
                ColumnType::String,
                "addon_provider.id",
                "Unique ID of the addon provider.",
            ),
            Column::from_field(
                "addon_provider_name",
                ColumnType::String,
                "addon_provider.name",
                "Name of the addon provider.",
            ),
            Column::new("provisioned_at", ColumnType::Timestamp, "Provisioning date of the addon."),
            Column::new("deprovisioned_at", ColumnType::Timestamp, "Deprovisioning date of the addon."),
        ],
    }
}

async fn list(ctx: &QueryContext) -> Result<()> {
    let client = connect(ctx)?;
    let app_name = ctx.qual("app_name").context("missing app_name qualifier")?;

    let addons = client
        .list(&client.app_url(app_name, "addons"), "addons")
        .await?;
    for addon in addons {
        ctx.stream_item(addon);
    }
    Ok(())
}
