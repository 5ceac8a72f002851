//! The scalingo_collaborator table

use crate::plugin::cache::{build_region_matrix, connect, MATRIX_QUAL_REGION};
use crate::plugin::context::QueryContext;
use crate::plugin::table::{Column, ColumnType, KeyColumn, ListConfig, Table};
use crate::scalingo::is_not_found;
use anyhow::{Context, Result};

pub fn table() -> Table {
    Table {
        name: "scalingo_collaborator",
        description: "A collaborator is a user invited to work on an app.",
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
            Column::new("id", ColumnType::String, "Unique ID of the collaborator."),
            Column::new("email", ColumnType::String, "Email of the collaborator."),
            Column::new("username", ColumnType::String, "Username of the collaborator."),
            Column::new("status", ColumnType::String, "Status of the invitation."),
        ],
    }
}

async fn list(ctx: &QueryContext) -> Result<()> {
    let client = connect(ctx)?;
    let app_name = ctx.qual("app_name").context("missing app_name qualifier")?;

    let collaborators = client
        .list(&client.app_url(app_name, "collaborators"), "collaborators")
        .await?;
    for collaborator in collaborators {
        ctx.stream_item(collaborator);
    }
    Ok(())
}
