use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How a request/response body string is to be interpreted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyEncoding {
    /// Body is the literal UTF-8 text
    #[default]
    Text,
    /// Body is Base64-encoded binary data
    Base64,
}

/// An HTTP request forwarded from the gateway down the tunnel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestEnvelope {
    /// Opaque correlation token generated by the gateway; echoed unmodified
    /// in the paired response
    pub request_id: String,

    /// HTTP method (GET, POST, PUT, DELETE, etc.)
    pub method: String,

    /// Request path including any query string, as received by the gateway
    /// Example: "/api/v1/users?limit=10"
    pub path: String,

    /// HTTP headers as a map of header name to value
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Request body; absent or empty means no body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    /// Governs how `body` is decoded
    #[serde(default)]
    pub body_encoding: BodyEncoding,
}

impl RequestEnvelope {
    /// Check if the request carries a body
    pub fn has_body(&self) -> bool {
        self.body.as_deref().is_some_and(|b| !b.is_empty())
    }
}
