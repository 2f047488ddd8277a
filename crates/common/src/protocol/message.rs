use serde::{Deserialize, Serialize};

use super::{RequestEnvelope, ResponseEnvelope};

/// All tunnel messages are JSON text frames tagged by a `type` field
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    /// Liveness messages, sent in both directions. Peers may attach extra
    /// fields (e.g. a timestamp); they are ignored on receive.
    Ping,
    Pong,

    /// Sent by the gateway once it has assigned a public identity to this
    /// connection (ephemeral model: no prior registration required)
    Connected {
        public_url: String,
        #[serde(default)]
        slug: String,
        #[serde(default)]
        tunnel_id: String,
    },

    /// Data plane messages
    Request(RequestEnvelope),
    Response(ResponseEnvelope),

    /// Gateway-initiated clean session termination
    Shutdown,

    /// Any unrecognized tag; dispatched nowhere but never an error
    #[serde(other)]
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{BodyEncoding, ResponsePayload};
    use std::collections::HashMap;

    #[test]
    fn test_ping_pong_serialization() {
        let ping = Message::Ping;
        let json = serde_json::to_string(&ping).unwrap();
        assert_eq!(json, r#"{"type":"ping"}"#);

        let pong = Message::Pong;
        let json = serde_json::to_string(&pong).unwrap();
        assert_eq!(json, r#"{"type":"pong"}"#);

        let parsed: Message = serde_json::from_str(&json).unwrap();
        assert!(matches!(parsed, Message::Pong));
    }

    #[test]
    fn test_ping_with_timestamp_field() {
        // Gateways may attach a "ts" field to pings; it must not break parsing
        let json = r#"{"type":"ping","ts":1234567890}"#;
        let parsed: Message = serde_json::from_str(json).unwrap();
        assert!(matches!(parsed, Message::Ping));
    }

    #[test]
    fn test_connected_serialization() {
        let json = r#"{"type":"connected","public_url":"https://abc123.tunnel.example.com","slug":"abc123","tunnel_id":"tunnel_9"}"#;

        let parsed: Message = serde_json::from_str(json).unwrap();
        match parsed {
            Message::Connected {
                public_url,
                slug,
                tunnel_id,
            } => {
                assert_eq!(public_url, "https://abc123.tunnel.example.com");
                assert_eq!(slug, "abc123");
                assert_eq!(tunnel_id, "tunnel_9");
            }
            _ => panic!("Expected Connected"),
        }
    }

    #[test]
    fn test_connected_minimal_fields() {
        // slug and tunnel_id default to empty when a gateway omits them
        let json = r#"{"type":"connected","public_url":"https://t.example.com"}"#;

        let parsed: Message = serde_json::from_str(json).unwrap();
        match parsed {
            Message::Connected { slug, tunnel_id, .. } => {
                assert!(slug.is_empty());
                assert!(tunnel_id.is_empty());
            }
            _ => panic!("Expected Connected"),
        }
    }

    #[test]
    fn test_request_serialization() {
        let json = r#"{"type":"request","request_id":"req_123","method":"GET","path":"/api/v1/users?limit=10","headers":{"host":"example.com"}}"#;

        let parsed: Message = serde_json::from_str(json).unwrap();
        match parsed {
            Message::Request(req) => {
                assert_eq!(req.request_id, "req_123");
                assert_eq!(req.method, "GET");
                assert_eq!(req.path, "/api/v1/users?limit=10");
                assert!(req.body.is_none());
                assert_eq!(req.body_encoding, BodyEncoding::Text);
            }
            _ => panic!("Expected Request"),
        }
    }

    #[test]
    fn test_response_serialization() {
        let payload = ResponsePayload {
            request_id: "req_123".to_string(),
            status: 200,
            headers: HashMap::new(),
            body: "OK".to_string(),
            body_encoding: BodyEncoding::Text,
        };

        let msg = Message::Response(ResponseEnvelope::Plain(payload));
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""type":"response"#));
        assert!(json.contains(r#""request_id":"req_123"#));
        assert!(json.contains(r#""status":200"#));
        assert!(json.contains(r#""body_encoding":"text"#));

        let parsed: Message = serde_json::from_str(&json).unwrap();
        assert!(matches!(
            parsed,
            Message::Response(ResponseEnvelope::Plain(_))
        ));
    }

    #[test]
    fn test_shutdown_serialization() {
        let json = r#"{"type":"shutdown"}"#;
        let parsed: Message = serde_json::from_str(json).unwrap();
        assert!(matches!(parsed, Message::Shutdown));
    }

    #[test]
    fn test_unknown_type_parses() {
        let json = r#"{"type":"frobnicate","payload":42}"#;
        let parsed: Message = serde_json::from_str(json).unwrap();
        assert!(matches!(parsed, Message::Unknown));
    }
}
