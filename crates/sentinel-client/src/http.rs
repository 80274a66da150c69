//! HTTP transport against the assistant endpoint.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use sentinel_core::{Transport, TransportError};

use crate::wire::{ChatRequest, ChatResponse};

/// HTTP implementation of the assistant transport.
///
/// POSTs to `{base}/api/chat` and decodes `{"response": "..."}`. The
/// cancellation token is observed for the whole call, including the body
/// read: when it fires, the request future is dropped, which best-effort
/// aborts the underlying connection.
pub struct HttpTransport {
    inner: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport for the given base URL.
    pub fn new(base_url: &str) -> Self {
        Self {
            inner: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Check if the endpoint is reachable (`GET {base}/`).
    pub async fn health(&self) -> bool {
        let url = format!("{}/", self.base_url);
        debug!(url = %url, "Checking endpoint health");

        match self.inner.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    async fn post_chat(&self, query: &str, user_id: &str) -> Result<String, TransportError> {
        let url = format!("{}/api/chat", self.base_url);
        debug!(url = %url, "POST chat request");

        let body = ChatRequest {
            query: query.to_string(),
            user_id: user_id.to_string(),
        };

        let response = self
            .inner
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        if !response.status().is_success() {
            return Err(TransportError::Status(response.status().as_u16()));
        }

        let decoded: ChatResponse = response
            .json()
            .await
            .map_err(|e| TransportError::Serialization(e.to_string()))?;

        Ok(decoded.response)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send_query(
        &self,
        query: &str,
        user_id: &str,
        cancel: CancellationToken,
    ) -> Result<String, TransportError> {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("chat request aborted by cancellation token");
                Err(TransportError::Cancelled)
            }
            result = self.post_chat(query, user_id) => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let transport = HttpTransport::new("http://127.0.0.1:8000/");
        assert_eq!(transport.base_url, "http://127.0.0.1:8000");
    }

    #[tokio::test]
    async fn test_cancelled_token_short_circuits() {
        // No server is listening here; the already-fired token must win the
        // select before any connection attempt can settle.
        let transport = HttpTransport::new("http://127.0.0.1:9");
        let token = CancellationToken::new();
        token.cancel();

        let result = transport.send_query("hello", "tui_user", token).await;
        assert!(matches!(result, Err(TransportError::Cancelled)));
    }
}
