use reqwest::Client;

use super::types::{select_payloads, Cursor, RelayResponse};
use crate::error::{Error, Result};

/// Client for the payload relay.
///
/// The web app posts request documents to the relay under a workspace name;
/// this client polls for them.
#[derive(Clone)]
pub struct RelayClient {
    client: Client,
    api_url: String,
    workspace: String,
}

impl RelayClient {
    /// Create a client, rejecting a blank API URL or workspace.
    pub fn new(client: Client, api_url: &str, workspace: &str) -> Result<Self> {
        let api_url = api_url.trim().trim_end_matches('/').to_string();
        let workspace = workspace.trim().to_string();
        if api_url.is_empty() {
            return Err(Error::Validation(
                "API URL is required. Enter your backend URL (e.g. https://your-app.vercel.app).".to_string(),
            ));
        }
        if workspace.is_empty() {
            return Err(Error::Validation("Workspace name is required.".to_string()));
        }
        Ok(Self { client, api_url, workspace })
    }

    /// Workspace this client polls.
    pub fn workspace(&self) -> &str {
        &self.workspace
    }

    /// Payload endpoint.
    pub fn payload_url(&self) -> String {
        format!("{}/api/payload", self.api_url)
    }

    /// Fetch the stored payload(s), newer than `since` when given.
    pub async fn fetch(&self, since: Option<i64>) -> Result<RelayResponse> {
        let url = self.payload_url();
        let mut query: Vec<(&str, String)> = vec![("workspace", self.workspace.clone())];
        if let Some(since) = since {
            query.push(("since", since.to_string()));
        }

        let resp = self.client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| Error::Network(format!("Request to {url} failed: {e}")))?;

        let status = resp.status();
        let body = resp.text()
            .await
            .map_err(|e| Error::Network(format!("Reading body from {url} failed: {e}")))?;
        let parsed: Option<RelayResponse> = serde_json::from_str(&body).ok();

        if !status.is_success() {
            let message = parsed
                .and_then(|r| r.error)
                .unwrap_or_else(|| format!("Error {}", status.as_u16()));
            return Err(Error::relay_status(message, status.as_u16()));
        }

        parsed.ok_or_else(|| Error::parse(format!("Invalid JSON from {url}"), None))
    }

    /// Fetch and select the documents to process.
    ///
    /// Manual polls send no `since` and always return the latest payload.
    pub async fn poll(&self, cursor: Cursor, manual: bool) -> Result<(Vec<String>, Cursor)> {
        let since = (!manual).then(|| cursor.since());
        let response = self.fetch(since).await?;
        let (docs, next) = select_payloads(&response, cursor, manual)?;
        tracing::info!(
            "Relay {}: {} payload(s), cursor {:?}",
            self.workspace,
            docs.len(),
            next.as_datetime()
        );
        Ok((docs, next))
    }
}
