//! The scalingo_scm_repo_link table

use crate::plugin::cache::{build_region_matrix, connect, MATRIX_QUAL_REGION};
use crate::plugin::context::QueryContext;
use crate::plugin::table::{Column, ColumnType, KeyColumn, ListConfig, Table};
use crate::scalingo::is_not_found;
use anyhow::{Context, Result};

pub fn table() -> Table {
    Table {
        name: "scalingo_scm_repo_link",
        description: "The link between an app and a source repository (GitHub, GitLab, ...).",
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
            Column::new("scm_type", ColumnType::String, "Type of the source control platform."),
            Column::new("owner", ColumnType::String, "Owner of the repository."),
            Column::new("repo", ColumnType::String, "Name of the repository."),
            Column::new("branch", ColumnType::String, "Branch deployed automatically."),
            Column::new(
                "auto_deploy_enabled",
                ColumnType::Bool,
                "Whether pushes to the branch trigger a deployment.",
            ),
            Column::new(
                "deploy_review_apps_enabled",
                ColumnType::Bool,
                "Whether review apps are created for pull requests.",
            ),
            Column::from_field(
                "linker_username",
                ColumnType::String,
                "linker.username",
                "Username of the account that created the link.",
            ),
            Column::new("created_at", ColumnType::Timestamp, "Creation date of the link."),
        ],
    }
}

async fn list(ctx: &QueryContext) -> Result<()> {
    let client = connect(ctx)?;
    let app_name = ctx.qual("app_name").context("missing app_name qualifier")?;

    // one link at most per app, returned as a single object
    let link = client
        .get_one(&client.app_url(app_name, "scm_repo_link"), "scm_repo_link")
        .await?;
    ctx.stream_item(link);
    Ok(())
}
