use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::BodyEncoding;

/// The uncompressed response to one forwarded request, built from the local
/// server's reply (or synthesized on failure)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponsePayload {
    /// Must match the request_id of the corresponding RequestEnvelope
    pub request_id: String,

    /// HTTP status code (200, 404, 502, ...)
    pub status: u16,

    /// Response headers as a map of header name to value
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Response body, encoded per `body_encoding`
    #[serde(default)]
    pub body: String,

    #[serde(default)]
    pub body_encoding: BodyEncoding,
}

impl ResponsePayload {
    /// Synthesize a plain-text response, used for the 5xx errors the agent
    /// produces itself (502 unreachable, 504 timeout, 500 internal)
    pub fn synthesized(request_id: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            status,
            headers: HashMap::from([(
                "content-type".to_string(),
                "text/plain".to_string(),
            )]),
            body: body.into(),
            body_encoding: BodyEncoding::Text,
        }
    }
}

/// One of the two wire shapes a response takes; exactly one is emitted per
/// logical response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseEnvelope {
    /// Large, compressible responses: `data` is base64(gzip(json of the
    /// full plain wire message))
    Compressed {
        request_id: String,
        compressed: bool,
        data: String,
    },
    /// The payload inline, uncompressed
    Plain(ResponsePayload),
}

impl ResponseEnvelope {
    pub fn request_id(&self) -> &str {
        match self {
            Self::Compressed { request_id, .. } => request_id,
            Self::Plain(payload) => &payload.request_id,
        }
    }
}
