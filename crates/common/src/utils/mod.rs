mod content_type;
mod encoding;
mod headers;

pub use content_type::is_binary_content_type;
pub use encoding::{decode_base64, encode_base64};
pub use headers::{headers_to_map, map_to_headers};
