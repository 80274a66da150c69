//! Transport abstraction for the remote assistant endpoint.

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Errors a transport call can settle with.
///
/// `Cancelled` is kept distinct from the other variants: the controller's
/// reconciliation treats it as "already handled locally", while everything
/// else surfaces as the generic error notice. Detail strings go to tracing
/// only, never into the conversation log.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The call was aborted via its cancellation token.
    #[error("request cancelled")]
    Cancelled,

    /// Connectivity failure (could not reach the endpoint, request aborted
    /// mid-flight, timeout at the HTTP layer).
    #[error("connection failed: {0}")]
    Connection(String),

    /// The endpoint answered with a non-success status.
    #[error("endpoint returned HTTP {0}")]
    Status(u16),

    /// The response body could not be decoded.
    #[error("malformed response: {0}")]
    Serialization(String),
}

/// Opaque async boundary to the remote assistant.
///
/// One request in, one of {response text, cancellation, error} out. The
/// implementation observes the token cooperatively and best-effort aborts
/// the underlying operation when it fires; callers never wait on that abort.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Submit a query and wait for the assistant's response text.
    async fn send_query(
        &self,
        query: &str,
        user_id: &str,
        cancel: CancellationToken,
    ) -> Result<String, TransportError>;
}
