//! Custom request extractors.

mod payload;
mod validated_json;

pub use payload::Payload;
pub use validated_json::ValidatedJson;
