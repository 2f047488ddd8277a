use base64::{Engine as _, engine::general_purpose::STANDARD};

/// Encode bytes to a Base64 string
pub fn encode_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decode a Base64 string to bytes
pub fn decode_base64(encoded: &str) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(encoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_empty() {
        assert_eq!(encode_base64(&[]), "");
        assert_eq!(decode_base64("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_encode_simple_text() {
        assert_eq!(encode_base64(b"Hello, World!"), "SGVsbG8sIFdvcmxkIQ==");
    }

    #[test]
    fn test_decode_simple_text() {
        let decoded = decode_base64("SGVsbG8sIFdvcmxkIQ==").unwrap();
        assert_eq!(decoded, b"Hello, World!");
    }

    #[test]
    fn test_roundtrip_binary() {
        let original: Vec<u8> = (0..=255).collect();
        let decoded = decode_base64(&encode_base64(&original)).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_roundtrip_utf8_text() {
        let utf8_text = "Hello 世界 🌍".as_bytes();
        let decoded = decode_base64(&encode_base64(utf8_text)).unwrap();
        assert_eq!(decoded, utf8_text);
    }

    #[test]
    fn test_decode_invalid_base64() {
        assert!(decode_base64("This is not valid base64!!!").is_err());
        assert!(decode_base64("SGVsbG8").is_err()); // missing padding
    }
}
