/// Content types treated as text on the wire
const TEXT_TYPES: &[&str] = &[
    "text/",
    "application/json",
    "application/javascript",
    "application/xml",
    "application/x-www-form-urlencoded",
    "application/ld+json",
    "application/rdf+xml",
    "application/soap+xml",
];

/// Content types treated as binary (base64-encoded on the wire)
const BINARY_TYPES: &[&str] = &[
    "image/",
    "video/",
    "audio/",
    "application/pdf",
    "application/octet-stream",
    "application/zip",
    "application/gzip",
    "application/x-tar",
    "application/vnd.",
    "font/",
];

/// Decide whether a MIME content-type carries binary data.
///
/// The input may include parameters (`; charset=utf-8`) or be empty. Known
/// text types win over binary types; unknown types default to text.
pub fn is_binary_content_type(content_type: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();

    if TEXT_TYPES.iter().any(|t| content_type.contains(t)) {
        return false;
    }

    BINARY_TYPES.iter().any(|t| content_type.contains(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_types() {
        for ct in TEXT_TYPES {
            assert!(!is_binary_content_type(ct), "{ct} should be text");
        }
        assert!(!is_binary_content_type("text/html"));
        assert!(!is_binary_content_type("application/json"));
    }

    #[test]
    fn test_binary_types() {
        for ct in BINARY_TYPES {
            assert!(is_binary_content_type(ct), "{ct} should be binary");
        }
        assert!(is_binary_content_type("image/png"));
        assert!(is_binary_content_type("application/vnd.ms-excel"));
    }

    #[test]
    fn test_unknown_type_defaults_to_text() {
        assert!(!is_binary_content_type("application/x-custom"));
        assert!(!is_binary_content_type(""));
    }

    #[test]
    fn test_parameters_and_case() {
        assert!(!is_binary_content_type("application/json; charset=utf-8"));
        assert!(!is_binary_content_type("TEXT/HTML; charset=ISO-8859-1"));
        assert!(is_binary_content_type("IMAGE/PNG"));
    }

    #[test]
    fn test_classification_is_idempotent() {
        for ct in ["application/pdf", "text/csv", "application/x-custom"] {
            assert_eq!(is_binary_content_type(ct), is_binary_content_type(ct));
        }
    }
}
