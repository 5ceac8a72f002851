//! The scalingo_token table

use crate::plugin::cache::connect;
use crate::plugin::context::QueryContext;
use crate::plugin::table::{Column, ColumnType, ListConfig, Table};
use anyhow::Result;

pub fn table() -> Table {
    Table {
        name: "scalingo_token",
        description: "An API token issued for the account.",
        list: Some(ListConfig {
            hydrate: |ctx| Box::pin(list(ctx)),
            key_columns: Vec::new(),
            should_ignore: None,
        }),
        get: None,
        // account-level resource on the auth API, no region fan-out
        matrix: None,
        columns: vec![
            Column::new("id", ColumnType::String, "Unique ID of the token."),
            Column::new("name", ColumnType::String, "Name of the token."),
            Column::new("created_at", ColumnType::Timestamp, "Creation date of the token."),
            Column::new("last_used_at", ColumnType::Timestamp, "Date the token was last used."),
        ],
    }
}

async fn list(ctx: &QueryContext) -> Result<()> {
    let client = connect(ctx)?;

    let tokens = client.list(&client.auth_url("tokens"), "tokens").await?;
    for token in tokens {
        ctx.stream_item(token);
    }
    Ok(())
}
