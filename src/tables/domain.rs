//! The scalingo_domain table

use crate::plugin::cache::{build_region_matrix, connect, MATRIX_QUAL_REGION};
use crate::plugin::context::QueryContext;
use crate::plugin::table::{Column, ColumnType, KeyColumn, ListConfig, Table};
use crate::scalingo::is_not_found;
use anyhow::{Context, Result};

pub fn table() -> Table {
    Table {
        name: "scalingo_domain",
        description: "A domain name attached to an app.",
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
            Column::new("id", ColumnType::String, "Unique ID of the domain."),
            Column::new("name", ColumnType::String, "Domain name."),
            Column::new("canonical", ColumnType::Bool, "Whether this is the canonical domain of the app."),
            Column::new("ssl", ColumnType::Bool, "Whether a TLS certificate covers the domain."),
            Column::new("validity", ColumnType::Timestamp, "Expiry date of the TLS certificate."),
            Column::new("letsencrypt", ColumnType::Bool, "Whether the certificate is managed by Let's Encrypt."),
            Column::new("letsencrypt_status", ColumnType::String, "Status of the Let's Encrypt certificate."),
        ],
    }
}

async fn list(ctx: &QueryContext) -> Result<()> {
    let client = connect(ctx)?;
    let app_name = ctx.qual("app_name").context("missing app_name qualifier")?;

    let domains = client
        .list(&client.app_url(app_name, "domains"), "domains")
        .await?;
    for domain in domains {
        ctx.stream_item(domain);
    }
    Ok(())
}
