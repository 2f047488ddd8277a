mod codec;
mod message;
mod request;
mod response;

pub use codec::{decode_request_body, encode_response_body, seal_response};
pub use message::Message;
pub use request::{BodyEncoding, RequestEnvelope};
pub use response::{ResponseEnvelope, ResponsePayload};
