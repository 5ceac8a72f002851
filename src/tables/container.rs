//! The scalingo_container table

use crate::plugin::cache::{build_region_matrix, connect, MATRIX_QUAL_REGION};
use crate::plugin::context::QueryContext;
use crate::plugin::table::{Column, ColumnType, KeyColumn, ListConfig, Table};
use crate::scalingo::is_not_found;
use anyhow::{Context, Result};

pub fn table() -> Table {
    Table {
        name: "scalingo_container",
        description: "A container type of the formation of an app, with its scale and size.",
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
            Column::new("name", ColumnType::String, "Type of the container (web, worker, ...)."),
            Column::new("amount", ColumnType::Int, "Number of containers of this type."),
            Column::new("size", ColumnType::String, "Size of the containers (S, M, XL, ...)."),
            Column::new("command", ColumnType::String, "Command run by the containers, if customized."),
        ],
    }
}

async fn list(ctx: &QueryContext) -> Result<()> {
    let client = connect(ctx)?;
    let app_name = ctx.qual("app_name").context("missing app_name qualifier")?;

    let containers = client
        .list(&client.app_url(app_name, "containers"), "containers")
        .await?;
    for container in containers {
        ctx.stream_item(container);
    }
    Ok(())
}
