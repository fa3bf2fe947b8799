//! Google Custom Search tool
//!
//! Calls the Custom Search JSON API with the caller's query and returns the
//! matching results as a JSON array of `{title, link}` objects. The HTTP
//! client, endpoint and credential source are injected, so tests can point
//! the tool at a local mock server without touching process-wide state.

use crate::config::{SearchCredentials, SearchSection, SecretSource, DEFAULT_SEARCH_ENDPOINT};
use crate::protocol::CallToolResult;
use crate::tools::{Tool, ToolDescription, ToolError};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use url::Url;

pub const TOOL_NAME: &str = "google_search";

const QUERY_REQUIRED: &str = "query parameter is required";

/// Arguments accepted by the `google_search` tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchArgs {
    /// The search terms to query.
    pub query: String,
}

/// One search hit as returned to the caller
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchResultItem {
    pub title: String,
    pub link: String,
}

/// Upstream response body; the API omits `items` entirely when nothing matched
#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    items: Option<Vec<ApiItem>>,
}

#[derive(Debug, Deserialize)]
struct ApiItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
}

/// Endpoint and timeout for the upstream call
#[derive(Debug, Clone)]
pub struct GoogleSearchConfig {
    pub endpoint: String,
    pub timeout: Duration,
}

impl Default for GoogleSearchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl From<&SearchSection> for GoogleSearchConfig {
    fn from(section: &SearchSection) -> Self {
        Self {
            endpoint: section.endpoint.clone(),
            timeout: section.timeout(),
        }
    }
}

/// Build the shared HTTP client used for upstream calls
pub fn default_client() -> Result<reqwest::Client, ToolError> {
    reqwest::Client::builder()
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .build()
        .map_err(|e| ToolError::ExecutionError(format!("Failed to build HTTP client: {e}")))
}

/// Google Custom Search tool
pub struct GoogleSearchTool {
    client: reqwest::Client,
    config: GoogleSearchConfig,
    secrets: Arc<dyn SecretSource>,
}

impl GoogleSearchTool {
    pub fn new(
        client: reqwest::Client,
        config: GoogleSearchConfig,
        secrets: Arc<dyn SecretSource>,
    ) -> Self {
        Self {
            client,
            config,
            secrets,
        }
    }

    /// Extract a non-blank `query` string (pure function)
    fn extract_query(arguments: &Value) -> Option<&str> {
        arguments
            .get("query")
            .and_then(Value::as_str)
            .filter(|q| !q.trim().is_empty())
    }

    /// Build the upstream URL with every parameter form-encoded (pure function)
    fn build_search_url(
        endpoint: &str,
        credentials: &SearchCredentials,
        query: &str,
    ) -> Result<Url, ToolError> {
        let mut url = Url::parse(endpoint).map_err(|e| {
            ToolError::ExecutionError(format!("Invalid search endpoint '{endpoint}': {e}"))
        })?;

        url.query_pairs_mut()
            .append_pair("key", &credentials.api_key)
            .append_pair("cx", &credentials.engine_id)
            .append_pair("q", query);

        Ok(url)
    }

    /// Map upstream items 1:1 preserving order (pure function)
    fn to_result_items(response: ApiResponse) -> Vec<SearchResultItem> {
        response
            .items
            .unwrap_or_default()
            .into_iter()
            .map(|item| SearchResultItem {
                title: item.title,
                link: item.link,
            })
            .collect()
    }

    fn input_schema() -> Value {
        serde_json::to_value(schemars::schema_for!(SearchArgs)).unwrap_or_else(|_| {
            json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The search terms to query."
                    }
                },
                "required": ["query"]
            })
        })
    }
}

/// Render an error with its source chain; reqwest keeps the useful part
/// (connection refused, timed out) in `source()`
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[async_trait]
impl Tool for GoogleSearchTool {
    fn describe(&self) -> ToolDescription {
        ToolDescription {
            name: TOOL_NAME.to_string(),
            description: "Performs a Google Custom Search query.".to_string(),
            parameters: Self::input_schema(),
        }
    }

    async fn execute(&self, arguments: &Value) -> Result<CallToolResult, ToolError> {
        let Some(query) = Self::extract_query(arguments) else {
            return Ok(CallToolResult::error(QUERY_REQUIRED));
        };

        let credentials = match SearchCredentials::resolve(self.secrets.as_ref()) {
            Ok(credentials) => credentials,
            Err(e) => {
                warn!("Google search unavailable: {}", e);
                return Ok(CallToolResult::error(e.to_string()));
            }
        };

        info!(query = %query, "Performing Google search");

        let url = Self::build_search_url(&self.config.endpoint, &credentials, query)?;

        let response = self
            .client
            .get(url)
            .timeout(self.config.timeout)
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                error!("Failed to call Google Search API: {}", error_chain(&e));
                ToolError::Upstream(error_chain(&e))
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "Google Search API returned non-success status");
            return Ok(CallToolResult::error(format!(
                "Google Search API returned an error: {status}"
            )));
        }

        let api_response: ApiResponse = response.json().await.map_err(|e| {
            let e = e.without_url();
            error!("Failed to decode Google Search API response: {}", error_chain(&e));
            if e.is_decode() {
                ToolError::Decode(error_chain(&e))
            } else {
                ToolError::Upstream(error_chain(&e))
            }
        })?;

        let results = Self::to_result_items(api_response);
        info!(query = %query, results = results.len(), "Google search completed");

        let payload = serde_json::to_string(&results).map_err(|e| {
            error!("Failed to serialize search results: {}", e);
            ToolError::Serialization(e.to_string())
        })?;

        Ok(CallToolResult::text(payload))
    }
}
