//! The scalingo_cron table

use crate::plugin::cache::{build_region_matrix, connect, MATRIX_QUAL_REGION};
use crate::plugin::context::QueryContext;
use crate::plugin::table::{Column, ColumnType, KeyColumn, ListConfig, Table};
use crate::scalingo::is_not_found;
use anyhow::{Context, Result};

pub fn table() -> Table {
    Table {
        name: "scalingo_cron",
        description: "A cron task is a job scheduled periodically for an app.",
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
            Column::new("command", ColumnType::String, "Cron expression and command of the job."),
            Column::new("size", ColumnType::String, "Size of the container running the job."),
        ],
    }
}

async fn list(ctx: &QueryContext) -> Result<()> {
    let client = connect(ctx)?;
    let app_name = ctx.qual("app_name").context("missing app_name qualifier")?;

    let jobs = client
        .list(&client.app_url(app_name, "cron_tasks"), "jobs")
        .await?;
    for job in jobs {
        ctx.stream_item(job);
    }
    Ok(())
}
