use http::{HeaderMap, HeaderName, HeaderValue};
use std::collections::HashMap;

/// Convert HTTP headers to the wire's single-value map.
///
/// The wire format carries one value per header name; for repeated headers
/// the last value wins. Non-UTF-8 values become empty strings.
pub fn headers_to_map(headers: &HeaderMap) -> HashMap<String, String> {
    let mut map = HashMap::new();

    for (name, value) in headers.iter() {
        map.insert(
            name.as_str().to_string(),
            value.to_str().unwrap_or("").to_string(),
        );
    }

    map
}

/// Convert a wire header map to an HTTP HeaderMap, skipping entries that are
/// not valid header names or values
pub fn map_to_headers(map: &HashMap<String, String>) -> HeaderMap {
    let mut headers = HeaderMap::new();

    for (name, value) in map.iter() {
        if let (Ok(header_name), Ok(header_value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            headers.insert(header_name, header_value);
        }
    }

    headers
}
