//! The scalingo_app_event table

use crate::plugin::cache::{build_region_matrix, connect, MATRIX_QUAL_REGION};
use crate::plugin::context::QueryContext;
use crate::plugin::scan::stream_paginated;
use crate::plugin::table::{Column, ColumnType, KeyColumn, ListConfig, Table};
use crate::scalingo::is_not_found;
use anyhow::{Context, Result};

pub fn table() -> Table {
    Table {
        name: "scalingo_app_event",
        description: "An app event is generated for every change made to an app.",
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
            Column::new("id", ColumnType::String, "Unique ID identifying the event."),
            Column::new("created_at", ColumnType::Timestamp, "Creation date of the event."),
            Column::new("type", ColumnType::String, "Type of the event."),
            Column::new("type_data", ColumnType::Json, "Data of the event."),
            Column::from_field("user_id", ColumnType::String, "user.id", "Unique ID of the user."),
            Column::from_field(
                "user_username",
                ColumnType::String,
                "user.username",
                "Username of the user.",
            ),
        ],
    }
}

async fn list(ctx: &QueryContext) -> Result<()> {
    let client = connect(ctx)?;
    let app_name = ctx.qual("app_name").context("missing app_name qualifier")?;

    let url = client.app_url(app_name, "events");
    stream_paginated(ctx, |opts| client.list_page(&url, "events", opts)).await
}
