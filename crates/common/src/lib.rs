//! Common types and utilities for the edge tunnel system
//!
//! This crate provides the wire protocol, the payload codec and shared helpers
//! used by the agent (and by anything else that speaks the tunnel protocol).

pub mod constants;
pub mod error;
pub mod protocol;
pub mod utils;

// Re-export commonly used types for convenience
pub use error::{Result, TunnelError};
pub use protocol::{
    BodyEncoding, Message, RequestEnvelope, ResponseEnvelope, ResponsePayload,
    decode_request_body, encode_response_body, seal_response,
};
pub use utils::{
    decode_base64, encode_base64, headers_to_map, is_binary_content_type, map_to_headers,
};
