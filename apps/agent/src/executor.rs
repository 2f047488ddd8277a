//! Local executor: issues one HTTP call against the local server for each
//! request envelope and turns the outcome into a response payload.
//!
//! Failures never escape to the session: an unreachable local server becomes
//! a synthesized 502, an overrun of the request timeout a 504. Retry policy
//! lives with the reconnect supervisor, not here; a failed local call is a
//! legitimate application-level response, not a tunnel fault.

use std::time::{Duration, Instant};

use edge_tunnel_common::{
    RequestEnvelope, ResponsePayload, Result, TunnelError, decode_request_body,
    encode_response_body, headers_to_map, map_to_headers,
};
use reqwest::{Client, Method};
use tracing::{debug, error, info, warn};

pub struct LocalExecutor {
    client: Client,
    local_port: u16,
    timeout: Duration,
}

impl LocalExecutor {
    pub fn new(local_port: u16, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| TunnelError::HttpError(e.to_string()))?;

        Ok(Self {
            client,
            local_port,
            timeout,
        })
    }

    /// Forward a request to the local server, bounded by the configured
    /// timeout. Always produces a payload; 504 on timeout.
    pub async fn execute(&self, req: &RequestEnvelope) -> ResponsePayload {
        match tokio::time::timeout(self.timeout, self.forward(req)).await {
            Ok(payload) => payload,
            Err(_) => {
                error!(
                    request_id = %req.request_id,
                    "Timeout forwarding request to local server"
                );
                ResponsePayload::synthesized(
                    &req.request_id,
                    504,
                    "Gateway Timeout: local server took too long to respond",
                )
            }
        }
    }

    /// The unbounded forward: transport failures become a synthesized 502
    async fn forward(&self, req: &RequestEnvelope) -> ResponsePayload {
        let url = format!("http://127.0.0.1:{}{}", self.local_port, req.path);
        info!(request_id = %req.request_id, "Forwarding {} {}", req.method, req.path);

        let method = match Method::from_bytes(req.method.as_bytes()) {
            Ok(m) => m,
            Err(e) => {
                warn!(request_id = %req.request_id, "Invalid HTTP method: {e}");
                return ResponsePayload::synthesized(
                    &req.request_id,
                    502,
                    format!("Agent error: invalid method {:?}", req.method),
                );
            }
        };

        let mut builder = self
            .client
            .request(method, &url)
            .headers(map_to_headers(&req.headers));

        if let Some(body) = decode_request_body(req) {
            debug!(request_id = %req.request_id, "Request body: {} bytes", body.len());
            builder = builder.body(body);
        }

        let start = Instant::now();
        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                error!(
                    request_id = %req.request_id,
                    "Error forwarding request to local server after {:.2?}",
                    start.elapsed()
                );
                return ResponsePayload::synthesized(
                    &req.request_id,
                    502,
                    format!("Agent error: {e}"),
                );
            }
        };

        let status = response.status().as_u16();
        info!(
            request_id = %req.request_id,
            "Local server responded: {status} in {:.2?}",
            start.elapsed()
        );

        let headers = headers_to_map(response.headers());
        let content_type = headers
            .get("content-type")
            .cloned()
            .unwrap_or_default();

        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(request_id = %req.request_id, "Failed to read response body: {e}");
                return ResponsePayload::synthesized(
                    &req.request_id,
                    502,
                    format!("Agent error: {e}"),
                );
            }
        };

        let (body, body_encoding) = encode_response_body(&bytes, &content_type);

        ResponsePayload {
            request_id: req.request_id.clone(),
            status,
            headers,
            body,
            body_encoding,
        }
    }
}
