//! Wire types for the assistant's REST API.

use serde::{Deserialize, Serialize};

/// Request body for `POST /api/chat`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// User query text (already trimmed by the controller).
    pub query: String,
    /// Opaque user identity forwarded to the endpoint.
    pub user_id: String,
}

/// Response body from `POST /api/chat`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    /// Assistant's response text.
    pub response: String,
}
