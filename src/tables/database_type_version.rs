//! The scalingo_database_type_version table

use crate::plugin::cache::{build_region_matrix, connect, MATRIX_QUAL_REGION};
use crate::plugin::context::QueryContext;
use crate::plugin::table::{Column, ColumnType, GetConfig, KeyColumn, Table};
use crate::scalingo::is_not_found;
use anyhow::{Context, Result};

pub fn table() -> Table {
    Table {
        name: "scalingo_database_type_version",
        description: "A version of a database type available on the platform.",
        list: None,
        get: Some(GetConfig {
            hydrate: |ctx| Box::pin(get(ctx)),
            key_columns: vec![KeyColumn::required("id")],
            should_ignore: Some(is_not_found),
        }),
        matrix: Some(build_region_matrix),
        columns: vec![
            Column::from_qual(
                "region",
                ColumnType::String,
                MATRIX_QUAL_REGION,
                "Region the version is available in.",
            ),
            Column::new("id", ColumnType::String, "Unique ID of the version."),
            Column::new(
                "database_type_id",
                ColumnType::String,
                "Unique ID of the database type.",
            ),
            Column::new(
                "database_type_name",
                ColumnType::String,
                "Name of the database type.",
            ),
            Column::new("features", ColumnType::Json, "Features supported by this version."),
            Column::new("next_upgrade", ColumnType::Json, "Next version an upgrade would move to."),
        ],
    }
}

async fn get(ctx: &QueryContext) -> Result<()> {
    let client = connect(ctx)?;
    let id = ctx.qual("id").context("missing id qualifier")?;

    let version = client
        .get_one(
            &client.database_api_url(&format!(
                "database_type_versions/{}",
                urlencoding::encode(id)
            )),
            "database_type_version",
        )
        .await?;
    ctx.stream_item(version);
    Ok(())
}
