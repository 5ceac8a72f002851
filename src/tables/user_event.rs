//! The scalingo_user_event table

use crate::plugin::cache::{build_region_matrix, connect, MATRIX_QUAL_REGION};
use crate::plugin::context::QueryContext;
use crate::plugin::scan::stream_paginated;
use crate::plugin::table::{Column, ColumnType, ListConfig, Table};
use crate::scalingo::is_not_found;
use anyhow::Result;

pub fn table() -> Table {
    Table {
        name: "scalingo_user_event",
        description: "A user event is generated automatically according to your, other, or the platform action.",
        list: Some(ListConfig {
            hydrate: |ctx| Box::pin(list(ctx)),
            key_columns: Vec::new(),
            should_ignore: Some(is_not_found),
        }),
        get: None,
        matrix: Some(build_region_matrix),
        columns: vec![
            Column::from_qual(
                "region",
                ColumnType::String,
                MATRIX_QUAL_REGION,
                "Region the event was recorded in.",
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
            Column::from_field("user_email", ColumnType::String, "user.email", "Email of the user."),
        ],
    }
}

async fn list(ctx: &QueryContext) -> Result<()> {
    let client = connect(ctx)?;

    let url = client.api_url("events");
    stream_paginated(ctx, |opts| client.list_page(&url, "events", opts)).await
}
