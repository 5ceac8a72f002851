//! The scalingo_key table

use crate::plugin::cache::connect;
use crate::plugin::context::QueryContext;
use crate::plugin::table::{Column, ColumnType, ListConfig, Table};
use anyhow::Result;

pub fn table() -> Table {
    Table {
        name: "scalingo_key",
        description: "An SSH key registered on the account.",
        list: Some(ListConfig {
            hydrate: |ctx| Box::pin(list(ctx)),
            key_columns: Vec::new(),
            should_ignore: None,
        }),
        get: None,
        // account-level resource on the auth API, no region fan-out
        matrix: None,
        columns: vec![
            Column::new("id", ColumnType::String, "Unique ID of the key."),
            Column::new("name", ColumnType::String, "Name of the key."),
            Column::new("content", ColumnType::String, "Public key content."),
        ],
    }
}

async fn list(ctx: &QueryContext) -> Result<()> {
    let client = connect(ctx)?;

    let keys = client.list(&client.auth_url("keys"), "keys").await?;
    for key in keys {
        ctx.stream_item(key);
    }
    Ok(())
}
