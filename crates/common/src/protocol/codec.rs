//! Payload codec: body decode/encode with lossless fallbacks, plus the
//! compression decision for outbound responses.
//!
//! Bad encoding metadata never fails a request: an undecodable base64 body
//! falls back to its literal bytes, and a non-UTF-8 "text" response falls
//! back to base64. The worst case is a suboptimal encoding, not an error.

use std::io::Write;

use flate2::Compression;
use flate2::write::GzEncoder;
use tracing::{debug, warn};

use crate::constants::{
    COMPRESSION_MIN_RATIO, COMPRESSION_THRESHOLD_BYTES, LARGE_PAYLOAD_WARN_BYTES,
};
use crate::error::Result;
use crate::protocol::{BodyEncoding, Message, RequestEnvelope, ResponseEnvelope, ResponsePayload};
use crate::utils::{decode_base64, encode_base64, is_binary_content_type};

/// Decode a request body to raw bytes. Returns `None` when the envelope
/// carries no body.
pub fn decode_request_body(req: &RequestEnvelope) -> Option<Vec<u8>> {
    let body = req.body.as_deref().filter(|b| !b.is_empty())?;

    match req.body_encoding {
        BodyEncoding::Base64 => match decode_base64(body) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!(
                    request_id = %req.request_id,
                    "Failed to decode base64 body, using literal bytes: {e}"
                );
                Some(body.as_bytes().to_vec())
            }
        },
        BodyEncoding::Text => Some(body.as_bytes().to_vec()),
    }
}

/// Encode a local server's response body for the wire, classifying by
/// content type.
pub fn encode_response_body(bytes: &[u8], content_type: &str) -> (String, BodyEncoding) {
    if is_binary_content_type(content_type) {
        return (encode_base64(bytes), BodyEncoding::Base64);
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => (text.to_string(), BodyEncoding::Text),
        Err(_) => {
            warn!(content_type, "Response is not valid UTF-8, treating as binary");
            (encode_base64(bytes), BodyEncoding::Base64)
        }
    }
}

/// Produce the wire message for a response, compressing when the serialized
/// payload is over 1 KiB and gzip actually saves more than 10%.
pub fn seal_response(payload: ResponsePayload) -> Result<Message> {
    let request_id = payload.request_id.clone();
    let plain = Message::Response(ResponseEnvelope::Plain(payload));
    let json = serde_json::to_string(&plain)?;
    let size = json.len();

    if size > LARGE_PAYLOAD_WARN_BYTES {
        warn!(
            %request_id,
            size_mb = size / (1024 * 1024),
            "Very large response payload, may cause issues"
        );
    }

    if size <= COMPRESSION_THRESHOLD_BYTES {
        return Ok(plain);
    }

    let compressed = gzip(json.as_bytes())?;
    #[allow(clippy::cast_precision_loss)]
    let beneficial = (compressed.len() as f64) < size as f64 * COMPRESSION_MIN_RATIO;
    if beneficial {
        debug!(
            %request_id,
            from = size,
            to = compressed.len(),
            "Compressed response payload"
        );
        Ok(Message::Response(ResponseEnvelope::Compressed {
            request_id,
            compressed: true,
            data: encode_base64(&compressed),
        }))
    } else {
        debug!(%request_id, "Compression not beneficial, sending uncompressed");
        Ok(plain)
    }
}

fn gzip(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}
