//! The scalingo_region table

use crate::plugin::cache::connect;
use crate::plugin::context::QueryContext;
use crate::plugin::table::{Column, ColumnType, ListConfig, Table};
use anyhow::Result;

pub fn table() -> Table {
    Table {
        name: "scalingo_region",
        description: "A region the platform is available in.",
        list: Some(ListConfig {
            hydrate: |ctx| Box::pin(list(ctx)),
            key_columns: Vec::new(),
            should_ignore: None,
        }),
        get: None,
        // the region catalog itself lives on the auth API
        matrix: None,
        columns: vec![
            Column::new("name", ColumnType::String, "Identifier of the region."),
            Column::new("display_name", ColumnType::String, "Human-readable name of the region."),
            Column::new("api", ColumnType::String, "API endpoint of the region."),
            Column::new("dashboard", ColumnType::String, "Dashboard URL of the region."),
            Column::new("database_api", ColumnType::String, "Database API endpoint of the region."),
            Column::new("ssh", ColumnType::String, "SSH endpoint of the region."),
            Column::new("default", ColumnType::Bool, "Whether this is the default region."),
        ],
    }
}

async fn list(ctx: &QueryContext) -> Result<()> {
    let client = connect(ctx)?;

    let regions = client.list(&client.auth_url("regions"), "regions").await?;
    for region in regions {
        ctx.stream_item(region);
    }
    Ok(())
}
