//! The scalingo_app table

use crate::plugin::cache::{build_region_matrix, connect, MATRIX_QUAL_REGION};
use crate::plugin::context::QueryContext;
use crate::plugin::table::{Column, ColumnType, GetConfig, KeyColumn, ListConfig, Table};
use crate::scalingo::is_not_found;
use anyhow::{Context, Result};

pub fn table() -> Table {
    Table {
        name: "scalingo_app",
        description: "An app is the base unit of deployment on the platform.",
        list: Some(ListConfig {
            hydrate: |ctx| Box::pin(list(ctx)),
            key_columns: Vec::new(),
            should_ignore: None,
        }),
        get: Some(GetConfig {
            hydrate: |ctx| Box::pin(get(ctx)),
            key_columns: vec![KeyColumn::required("name")],
            should_ignore: Some(is_not_found),
        }),
        matrix: Some(build_region_matrix),
        columns: vec![
            Column::new("id", ColumnType::String, "Unique ID of the app."),
            Column::new("name", ColumnType::String, "Name of the app."),
            Column::from_qual(
                "region",
                ColumnType::String,
                MATRIX_QUAL_REGION,
                "Region the app is hosted in.",
            ),
            Column::new("status", ColumnType::String, "Status of the app."),
            Column::new("url", ColumnType::String, "Default URL of the app."),
            Column::new("git_url", ColumnType::String, "Git remote URL of the app."),
            Column::new("force_https", ColumnType::Bool, "Whether HTTP traffic is redirected to HTTPS."),
            Column::new("sticky_session", ColumnType::Bool, "Whether requests are routed to a consistent container."),
            Column::new("router_logs", ColumnType::Bool, "Whether router logs are enabled."),
            Column::new("stack_id", ColumnType::String, "ID of the runtime stack."),
            Column::from_field("owner_id", ColumnType::String, "owner.id", "Unique ID of the owner."),
            Column::from_field("owner_username", ColumnType::String, "owner.username", "Username of the owner."),
            Column::from_field("owner_email", ColumnType::String, "owner.email", "Email of the owner."),
            Column::new("created_at", ColumnType::Timestamp, "Creation date of the app."),
            Column::new("updated_at", ColumnType::Timestamp, "Last update date of the app."),
            Column::new("last_deployed_at", ColumnType::Timestamp, "Date of the last deployment."),
            Column::new("last_deployed_by", ColumnType::String, "Author of the last deployment."),
        ],
    }
}

async fn list(ctx: &QueryContext) -> Result<()> {
    let client = connect(ctx)?;

    let apps = client.list(&client.api_url("apps"), "apps").await?;
    for app in apps {
        ctx.stream_item(app);
    }
    Ok(())
}

async fn get(ctx: &QueryContext) -> Result<()> {
    let client = connect(ctx)?;
    let name = ctx.qual("name").context("missing name qualifier")?;

    let app = client
        .get_one(&client.api_url(&format!("apps/{}", urlencoding::encode(name))), "app")
        .await?;
    ctx.stream_item(app);
    Ok(())
}
