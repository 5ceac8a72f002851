//! The scalingo_database table

use crate::plugin::cache::{build_region_matrix, connect, MATRIX_QUAL_REGION};
use crate::plugin::context::QueryContext;
use crate::plugin::table::{Column, ColumnType, KeyColumn, ListConfig, Table};
use crate::scalingo::is_not_found;
use anyhow::{Context, Result};

pub fn table() -> Table {
    Table {
        name: "scalingo_database",
        description: "A database backing one of an app's addons.",
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
                "Region the database is hosted in.",
            ),
            Column::new("id", ColumnType::String, "Unique ID of the database."),
            Column::new("resource_id", ColumnType::String, "Resource reference of the database."),
            Column::new("type_id", ColumnType::String, "Unique ID of the database type."),
            Column::new("type_name", ColumnType::String, "Name of the database type."),
            Column::new("plan", ColumnType::String, "Plan of the database."),
            Column::new("status", ColumnType::String, "Status of the database."),
            Column::new("readable_version", ColumnType::String, "Running version of the database."),
            Column::new("encryption_at_rest", ColumnType::Bool, "Whether encryption at rest is enabled."),
            Column::new("features", ColumnType::Json, "Features activated on the database."),
            Column::new("created_at", ColumnType::Timestamp, "Creation date of the database."),
        ],
    }
}

async fn list(ctx: &QueryContext) -> Result<()> {
    let client = connect(ctx)?;
    ctx.qual("app_name").context("missing app_name qualifier")?;
    let addon_id = ctx.qual("addon_id").context("missing addon_id qualifier")?;

    let database = client
        .get_one(
            &client.database_api_url(&format!("databases/{}", urlencoding::encode(addon_id))),
            "database",
        )
        .await?;
    ctx.stream_item(database);
    Ok(())
}
