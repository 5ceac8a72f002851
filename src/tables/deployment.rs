//! The scalingo_deployment table

use crate::plugin::cache::{build_region_matrix, connect, MATRIX_QUAL_REGION};
use crate::plugin::context::QueryContext;
use crate::plugin::scan::stream_paginated;
use crate::plugin::table::{Column, ColumnType, KeyColumn, ListConfig, Table};
use crate::scalingo::is_not_found;
use anyhow::{Context, Result};

pub fn table() -> Table {
    Table {
        name: "scalingo_deployment",
        description: "A deployment is one release of an app pushed to the platform.",
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
            Column::new("id", ColumnType::String, "Unique ID of the deployment."),
            Column::new("created_at", ColumnType::Timestamp, "Creation date of the deployment."),
            Column::new("status", ColumnType::String, "Status of the deployment."),
            Column::new("git_ref", ColumnType::String, "Git reference that was deployed."),
            Column::new("image_size", ColumnType::Int, "Size of the built image in bytes."),
            Column::new("duration", ColumnType::Int, "Duration of the deployment in seconds."),
            Column::new("postdeploy_hook", ColumnType::String, "Postdeploy hook command, if any."),
            Column::from_field("user_id", ColumnType::String, "user.id", "Unique ID of the deployer."),
            Column::from_field(
                "user_username",
                ColumnType::String,
                "user.username",
                "Username of the deployer.",
            ),
        ],
    }
}

async fn list(ctx: &QueryContext) -> Result<()> {
    let client = connect(ctx)?;
    let app_name = ctx.qual("app_name").context("missing app_name qualifier")?;

    let url = client.app_url(app_name, "deployments");
    stream_paginated(ctx, |opts| client.list_page(&url, "deployments", opts)).await
}
