//! Connection cache
//!
//! Process-lifetime cache service injected into every query: one Scalingo
//! client per region, plus the region matrix computed once per connection.

use crate::config::ConnectionConfig;
use crate::plugin::context::QueryContext;
use crate::scalingo::{ClientConfig, ScalingoClient};
use anyhow::Result;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

/// Qualifier column carrying the region a hydrate call targets
pub const MATRIX_QUAL_REGION: &str = "region";

/// Region used when neither the query nor the connection names one
pub const DEFAULT_REGION: &str = "osc-fr1";

/// Environment variable supplying a fallback API token
pub const TOKEN_ENV_VAR: &str = "SCALINGO_TOKEN";

/// Per-connection cache of clients and the region matrix.
///
/// Entries live for the process lifetime; there is no eviction, so a rotated
/// token only takes effect after a restart.
#[derive(Default)]
pub struct ConnectionCache {
    clients: RwLock<HashMap<String, Arc<ScalingoClient>>>,
    region_matrix: OnceLock<Vec<String>>,
}

/// Get the client for the query's region, constructing and caching it on
/// first use.
///
/// The token comes from the connection config when set, else from
/// SCALINGO_TOKEN. Concurrent first access for the same region may construct
/// a duplicate client; last write wins, which is harmless for a stateless
/// HTTP wrapper.
pub fn connect(ctx: &QueryContext) -> Result<Arc<ScalingoClient>> {
    let region = ctx.qual(MATRIX_QUAL_REGION).unwrap_or(DEFAULT_REGION);

    let cache_key = format!("scalingo-{region}");
    if let Some(client) = ctx
        .cache()
        .clients
        .read()
        .expect("client cache lock poisoned")
        .get(&cache_key)
    {
        return Ok(client.clone());
    }

    let mut token = std::env::var(TOKEN_ENV_VAR).unwrap_or_default();
    if let Some(config_token) = &ctx.connection().token {
        token = config_token.clone();
    }

    if token.is_empty() {
        anyhow::bail!(
            "'token' must be set in the connection configuration, \
             or provided through the {TOKEN_ENV_VAR} environment variable"
        );
    }

    let connection = ctx.connection();
    let client = Arc::new(ScalingoClient::new(ClientConfig {
        api_token: token,
        region: region.to_string(),
        api_endpoint: connection.api_endpoint.clone(),
        auth_endpoint: connection.auth_endpoint.clone(),
        database_api_endpoint: connection.database_api_endpoint.clone(),
    })?);

    ctx.cache()
        .clients
        .write()
        .expect("client cache lock poisoned")
        .insert(cache_key, client.clone());

    Ok(client)
}

/// Compute the ordered region list a table's list operation fans out over.
/// Cached once per connection; stable for the process lifetime.
///
/// A non-empty `regions` list fully replaces the legacy singular `region`;
/// with neither set the default region is used.
pub fn build_region_matrix(connection: &ConnectionConfig, cache: &ConnectionCache) -> Vec<String> {
    cache
        .region_matrix
        .get_or_init(|| {
            let mut regions = Vec::new();

            // compatibility with the old singular region configuration
            if let Some(region) = &connection.region {
                regions.push(region.clone());
            }

            if let Some(list) = &connection.regions {
                if !list.is_empty() {
                    regions = list.clone();
                }
            }

            if regions.is_empty() {
                regions.push(DEFAULT_REGION.to_string());
            }

            regions
        })
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::context::{CollectingSink, QueryStatus};
    use crate::plugin::table::{Column, ColumnType, Table};
    use std::sync::Mutex;

    // connect() reads SCALINGO_TOKEN; serialize the tests that touch it
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn test_table() -> Arc<Table> {
        Arc::new(Table {
            name: "t",
            description: "",
            list: None,
            get: None,
            matrix: None,
            columns: vec![Column::new("id", ColumnType::String, "")],
        })
    }

    fn context_for(
        connection: ConnectionConfig,
        cache: Arc<ConnectionCache>,
        region: Option<&str>,
    ) -> QueryContext {
        let mut quals = HashMap::new();
        if let Some(region) = region {
            quals.insert(MATRIX_QUAL_REGION.to_string(), region.to_string());
        }
        QueryContext::new(
            test_table(),
            quals,
            None,
            Arc::new(connection),
            cache,
            Arc::new(QueryStatus::default()),
            Arc::new(CollectingSink::new()),
        )
    }

    fn config_with_token(token: &str) -> ConnectionConfig {
        ConnectionConfig {
            token: Some(token.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_connect_caches_one_client_per_region() {
        let cache = Arc::new(ConnectionCache::default());

        let ctx_fr = context_for(config_with_token("tk"), cache.clone(), Some("osc-fr1"));
        let ctx_fr_again = context_for(config_with_token("tk"), cache.clone(), Some("osc-fr1"));
        let ctx_secnum = context_for(config_with_token("tk"), cache, Some("osc-secnum-fr1"));

        let first = connect(&ctx_fr).unwrap();
        let second = connect(&ctx_fr_again).unwrap();
        let other = connect(&ctx_secnum).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert!(!Arc::ptr_eq(&first, &other));
        assert_eq!(other.region(), "osc-secnum-fr1");
    }

    #[test]
    fn test_connect_defaults_region_without_qualifier() {
        let cache = Arc::new(ConnectionCache::default());
        let ctx = context_for(config_with_token("tk"), cache, None);

        let client = connect(&ctx).unwrap();
        assert_eq!(client.region(), DEFAULT_REGION);
    }

    #[test]
    fn test_connect_fails_without_any_token() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::remove_var(TOKEN_ENV_VAR);

        let cache = Arc::new(ConnectionCache::default());
        let ctx = context_for(ConnectionConfig::default(), cache.clone(), None);

        let err = connect(&ctx).unwrap_err();
        assert!(err.to_string().contains("token"));
        assert!(cache.clients.read().unwrap().is_empty());
    }

    #[test]
    fn test_connect_uses_env_token_as_fallback() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var(TOKEN_ENV_VAR, "tk-from-env");

        let cache = Arc::new(ConnectionCache::default());
        let ctx = context_for(ConnectionConfig::default(), cache, None);

        let client = connect(&ctx).unwrap();
        assert_eq!(client.token(), "tk-from-env");

        std::env::remove_var(TOKEN_ENV_VAR);
    }

    #[test]
    fn test_config_token_wins_over_env() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var(TOKEN_ENV_VAR, "tk-from-env");

        let cache = Arc::new(ConnectionCache::default());
        let ctx = context_for(config_with_token("tk-from-config"), cache, None);

        let client = connect(&ctx).unwrap();
        assert_eq!(client.token(), "tk-from-config");

        std::env::remove_var(TOKEN_ENV_VAR);
    }

    #[test]
    fn test_matrix_list_overrides_singular() {
        let connection = ConnectionConfig {
            region: Some("osc-fr1".to_string()),
            regions: Some(vec!["osc-secnum-fr1".to_string(), "osc-fr1".to_string()]),
            ..Default::default()
        };
        let cache = ConnectionCache::default();

        assert_eq!(
            build_region_matrix(&connection, &cache),
            vec!["osc-secnum-fr1".to_string(), "osc-fr1".to_string()]
        );
    }

    #[test]
    fn test_matrix_empty_list_falls_back_to_singular() {
        let connection = ConnectionConfig {
            region: Some("osc-fr1".to_string()),
            regions: Some(Vec::new()),
            ..Default::default()
        };
        let cache = ConnectionCache::default();

        assert_eq!(
            build_region_matrix(&connection, &cache),
            vec!["osc-fr1".to_string()]
        );
    }

    #[test]
    fn test_matrix_defaults_when_unconfigured() {
        let cache = ConnectionCache::default();
        assert_eq!(
            build_region_matrix(&ConnectionConfig::default(), &cache),
            vec![DEFAULT_REGION.to_string()]
        );
    }

    #[test]
    fn test_matrix_cached_per_connection() {
        let connection = ConnectionConfig {
            region: Some("osc-fr1".to_string()),
            ..Default::default()
        };
        let cache = ConnectionCache::default();

        let first = build_region_matrix(&connection, &cache);

        // later config changes are ignored for the cache's lifetime
        let changed = ConnectionConfig {
            region: Some("osc-secnum-fr1".to_string()),
            ..Default::default()
        };
        let second = build_region_matrix(&changed, &cache);

        assert_eq!(first, second);
    }
}
