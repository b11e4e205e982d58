//! Blocking GraphQL-over-HTTPS client.

use super::response::{GraphQlRequest, GraphQlResponse};
use crate::error::{HierarchyError, Result};
use crate::provider::RequestContext;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// GraphQL client configuration.
#[derive(Debug, Clone)]
pub struct GraphQlConfig {
    /// Scheme and host, without a trailing slash
    pub base_url: String,
    /// Path of the data endpoint (hubs, folders, items)
    pub data_path: String,
    /// Path of the manufacturing endpoint (projects, components, occurrences)
    pub manufacturing_path: String,
    /// Upper bound for a single HTTP request
    pub timeout: Duration,
    /// Retries after a transport failure
    pub max_retries: u8,
}

impl Default for GraphQlConfig {
    fn default() -> Self {
        Self {
            base_url: "https://developer.api.autodesk.com".to_string(),
            data_path: "/graphql".to_string(),
            manufacturing_path: "/mfg/graphql".to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 3,
        }
    }
}

/// Which of the two GraphQL endpoints a query targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Data,
    Manufacturing,
}

/// HTTP client shared by all provider calls.
///
/// The underlying `reqwest` client carries no default authorization header;
/// the bearer token is attached per request from the [`RequestContext`].
pub struct GraphQlClient {
    client: Client,
    config: GraphQlConfig,
}

/// Helper to convert reqwest errors to network errors
fn network_error(operation: &str, err: &reqwest::Error) -> HierarchyError {
    HierarchyError::network(operation, err.to_string())
}

impl GraphQlClient {
    pub fn new(config: GraphQlConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| network_error("creating HTTP client", &e))?;

        Ok(Self { client, config })
    }

    #[must_use]
    pub const fn config(&self) -> &GraphQlConfig {
        &self.config
    }

    /// Full URL of an endpoint.
    #[must_use]
    pub fn url(&self, endpoint: Endpoint) -> String {
        let path = match endpoint {
            Endpoint::Data => &self.config.data_path,
            Endpoint::Manufacturing => &self.config.manufacturing_path,
        };
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Run a query and return its `data` payload.
    ///
    /// Transport failures are retried with exponential backoff (1s, 2s, 4s, ...)
    /// as long as the backoff fits in the context's remaining time. HTTP and
    /// GraphQL errors are returned immediately.
    pub fn execute<T: DeserializeOwned>(
        &self,
        ctx: &RequestContext,
        endpoint: Endpoint,
        operation: &str,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T> {
        let url = self.url(endpoint);
        let body = GraphQlRequest { query, variables };
        let mut attempt: u8 = 0;

        loop {
            ctx.check()?;
            match self.send(ctx, &url, operation, &body) {
                Ok(data) => return Ok(data),
                Err(e @ HierarchyError::Network { .. }) if attempt < self.config.max_retries => {
                    attempt += 1;
                    let delay = Duration::from_secs(1u64 << (attempt - 1).min(6));
                    if ctx.remaining().is_some_and(|left| left <= delay) {
                        tracing::debug!("{operation}: no time left to retry: {e}");
                        ctx.check()?;
                        return Err(e);
                    }
                    tracing::debug!(
                        "{operation}: attempt {attempt} failed, retrying after {delay:?}: {e}"
                    );
                    std::thread::sleep(delay);
                }
                Err(e) => {
                    // A transport timeout caused by the deadline reports as such.
                    ctx.check()?;
                    return Err(e);
                }
            }
        }
    }

    fn send<T: DeserializeOwned>(
        &self,
        ctx: &RequestContext,
        url: &str,
        operation: &str,
        body: &GraphQlRequest<'_>,
    ) -> Result<T> {
        let mut request = self
            .client
            .post(url)
            .bearer_auth(ctx.token().secret())
            .json(body);
        if let Some(remaining) = ctx.remaining() {
            request = request.timeout(remaining.min(self.config.timeout));
        }

        tracing::debug!("POST {url} ({operation})");
        let response = request.send().map_err(|e| network_error(operation, &e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            return Err(HierarchyError::request_failed(
                operation,
                status.as_u16(),
                text,
            ));
        }

        let envelope: GraphQlResponse<T> = response
            .json()
            .map_err(|e| HierarchyError::invalid_response(operation, e.to_string()))?;

        let summary = envelope.error_summary();
        match (envelope.data, summary) {
            (Some(data), errors) => {
                if let Some(errors) = errors {
                    tracing::warn!("{operation}: partial GraphQL errors: {errors}");
                }
                Ok(data)
            }
            (None, Some(errors)) => Err(HierarchyError::invalid_response(operation, errors)),
            (None, None) => Err(HierarchyError::invalid_response(
                operation,
                "response carried neither data nor errors",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = GraphQlConfig::default();
        assert_eq!(config.base_url, "https://developer.api.autodesk.com");
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn test_endpoint_urls() {
        let client = GraphQlClient::new(GraphQlConfig {
            base_url: "https://example.test/".to_string(),
            ..GraphQlConfig::default()
        })
        .unwrap();
        assert_eq!(client.url(Endpoint::Data), "https://example.test/graphql");
        assert_eq!(
            client.url(Endpoint::Manufacturing),
            "https://example.test/mfg/graphql"
        );
    }
}
