//! Scalingo client
//!
//! Authenticated client for one platform region, combining endpoint
//! construction and HTTP functionality.

use super::http::HttpClient;
use anyhow::{Context, Result};
use serde_json::Value;
use url::Url;

/// Default page size for paginated list endpoints.
pub const DEFAULT_PER_PAGE: u32 = 100;

/// Client configuration, mirroring the platform client library surface.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    pub api_token: String,
    pub region: String,
    /// Override for the regional API endpoint (private platforms, tests).
    pub api_endpoint: Option<String>,
    /// Override for the authentication API endpoint.
    pub auth_endpoint: Option<String>,
    /// Override for the regional database API endpoint.
    pub database_api_endpoint: Option<String>,
}

/// Pagination cursor for list endpoints.
#[derive(Debug, Clone, Copy)]
pub struct PageOpts {
    pub page: u32,
    pub per_page: u32,
}

impl Default for PageOpts {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// One page of a paginated collection.
#[derive(Debug)]
pub struct Page {
    pub items: Vec<Value>,
    /// Next page number, absent once the collection is exhausted.
    pub next_page: Option<u32>,
}

/// Main Scalingo client, bound to one region and one API token
#[derive(Clone)]
pub struct ScalingoClient {
    http: HttpClient,
    token: String,
    region: String,
    api_base: String,
    auth_base: String,
    database_api_base: String,
}

// manual impl: the token must never end up in logs or panic messages
impl std::fmt::Debug for ScalingoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScalingoClient")
            .field("token", &"***")
            .field("region", &self.region)
            .field("api_base", &self.api_base)
            .field("auth_base", &self.auth_base)
            .field("database_api_base", &self.database_api_base)
            .finish()
    }
}

impl ScalingoClient {
    /// Create a new Scalingo client
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.api_token.is_empty() {
            anyhow::bail!("Scalingo client requires a non-empty API token");
        }
        if config.region.is_empty() {
            anyhow::bail!("Scalingo client requires a region");
        }

        let http = HttpClient::new()?;

        let api_base = config
            .api_endpoint
            .unwrap_or_else(|| format!("https://api.{}.scalingo.com/v1", config.region));
        let auth_base = config
            .auth_endpoint
            .unwrap_or_else(|| "https://auth.scalingo.com/v1".to_string());
        let database_api_base = config
            .database_api_endpoint
            .unwrap_or_else(|| format!("https://db-api.{}.scalingo.com/api", config.region));

        Ok(Self {
            http,
            token: config.api_token,
            region: config.region,
            api_base,
            auth_base,
            database_api_base,
        })
    }

    /// The API token this client authenticates with
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The region this client is bound to
    pub fn region(&self) -> &str {
        &self.region
    }

    // =========================================================================
    // Endpoint builders
    // =========================================================================

    /// Build a regional API URL
    pub fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path)
    }

    /// Build a regional API URL scoped to one app
    pub fn app_url(&self, app_name: &str, resource: &str) -> String {
        self.api_url(&format!("apps/{}/{}", urlencoding::encode(app_name), resource))
    }

    /// Build an authentication API URL (region-independent)
    pub fn auth_url(&self, path: &str) -> String {
        format!("{}/{}", self.auth_base, path)
    }

    /// Build a regional database API URL
    pub fn database_api_url(&self, path: &str) -> String {
        format!("{}/{}", self.database_api_base, path)
    }

    // =========================================================================
    // Fetch helpers
    // =========================================================================

    /// Fetch an unpaginated collection; `key` names the array in the response.
    pub async fn list(&self, url: &str, key: &str) -> Result<Vec<Value>> {
        let response = self.http.get(url, &self.token).await?;
        Ok(extract_items(&response, key))
    }

    /// Fetch one page of a paginated collection.
    pub async fn list_page(&self, url: &str, key: &str, opts: PageOpts) -> Result<Page> {
        let url = Url::parse_with_params(
            url,
            &[
                ("page", opts.page.to_string()),
                ("per_page", opts.per_page.to_string()),
            ],
        )
        .with_context(|| format!("Invalid API URL: {url}"))?;

        let response = self.http.get(url.as_str(), &self.token).await?;
        let items = extract_items(&response, key);
        let next_page = response
            .pointer("/meta/pagination/next_page")
            .and_then(|v| v.as_u64())
            .filter(|&p| p > 0)
            .map(|p| p as u32);

        Ok(Page { items, next_page })
    }

    /// Fetch a single object; `key` names the object in the response.
    pub async fn get_one(&self, url: &str, key: &str) -> Result<Value> {
        let response = self.http.get(url, &self.token).await?;
        response
            .get(key)
            .cloned()
            .with_context(|| format!("Response is missing the '{key}' object"))
    }
}

/// Extract the collection named `key` from a response body.
fn extract_items(response: &Value, key: &str) -> Vec<Value> {
    response
        .get(key)
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_client() -> ScalingoClient {
        ScalingoClient::new(ClientConfig {
            api_token: "tk-test".to_string(),
            region: "osc-fr1".to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_default_endpoints() {
        let client = test_client();
        assert_eq!(
            client.api_url("apps"),
            "https://api.osc-fr1.scalingo.com/v1/apps"
        );
        assert_eq!(
            client.auth_url("tokens"),
            "https://auth.scalingo.com/v1/tokens"
        );
        assert_eq!(
            client.database_api_url("databases/ad-1"),
            "https://db-api.osc-fr1.scalingo.com/api/databases/ad-1"
        );
    }

    #[test]
    fn test_app_url_encodes_path_segment() {
        let client = test_client();
        assert_eq!(
            client.app_url("my app", "variables"),
            "https://api.osc-fr1.scalingo.com/v1/apps/my%20app/variables"
        );
    }

    #[test]
    fn test_endpoint_overrides() {
        let client = ScalingoClient::new(ClientConfig {
            api_token: "tk".to_string(),
            region: "osc-fr1".to_string(),
            api_endpoint: Some("http://127.0.0.1:9999/v1".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(client.api_url("apps"), "http://127.0.0.1:9999/v1/apps");
    }

    #[test]
    fn test_new_rejects_empty_token() {
        let result = ScalingoClient::new(ClientConfig {
            region: "osc-fr1".to_string(),
            ..Default::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_masks_token() {
        let rendered = format!("{:?}", test_client());
        assert!(!rendered.contains("tk-test"));
        assert!(rendered.contains("osc-fr1"));
    }

    #[test]
    fn test_extract_items() {
        let response = json!({"apps": [{"name": "a"}, {"name": "b"}]});
        assert_eq!(extract_items(&response, "apps").len(), 2);
        assert!(extract_items(&response, "addons").is_empty());
        assert!(extract_items(&json!("nope"), "apps").is_empty());
    }
}
