//! Outbound WebSocket message types.
//!
//! Inbound content is never parsed: the arrival of a data frame is the
//! whole request.

use serde::Serialize;

use realix_core::result::AppResult;

use crate::allocator::Value;

/// The single push the server sends: `{"random_number": <digits>}`.
#[derive(Debug, Clone, Serialize)]
pub struct RandomNumberMessage {
    /// Freshly issued value, emitted as a JSON number of any length.
    pub random_number: Value,
}

impl RandomNumberMessage {
    /// Wraps an issued value.
    pub fn new(random_number: Value) -> Self {
        Self { random_number }
    }

    /// Serializes to the text frame payload.
    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::{OsRandom, UpperBound};

    fn draw(bound: &str) -> Value {
        bound
            .parse::<UpperBound>()
            .unwrap()
            .draw(&OsRandom)
            .unwrap()
    }

    #[test]
    fn test_shape_matches_wire_format() {
        let message = RandomNumberMessage::new(draw("1"));
        assert_eq!(message.to_json().unwrap(), r#"{"random_number":1}"#);
    }

    #[test]
    fn test_large_values_keep_every_digit() {
        let value = draw("1000000000000000000000000000000000000000");
        let json = RandomNumberMessage::new(value.clone()).to_json().unwrap();
        assert_eq!(json, format!(r#"{{"random_number":{}}}"#, value.key()));

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(parsed.get("random_number").unwrap().is_number());
    }
}
