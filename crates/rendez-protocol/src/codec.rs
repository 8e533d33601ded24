//! Codec trait and the JSON implementation.
//!
//! A codec converts between event types and the text frames the
//! transport carries. The rest of the stack only sees the [`Codec`]
//! trait, so a binary format could be swapped in without touching the
//! handler or registry.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Encodes events to text frames and decodes frames back.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into a text frame.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Encode`] if serialization fails.
    fn encode<T: Serialize>(&self, value: &T)
    -> Result<String, ProtocolError>;

    /// Deserializes a text frame back into a value.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Decode`] if the frame is malformed or
    /// doesn't match the expected type.
    fn decode<T: DeserializeOwned>(
        &self,
        frame: &str,
    ) -> Result<T, ProtocolError>;
}

/// A [`Codec`] that uses JSON via `serde_json`.
///
/// JSON text frames are what browser clients speak natively, and they
/// keep every relayed payload inspectable in DevTools.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<String, ProtocolError> {
        serde_json::to_string(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        frame: &str,
    ) -> Result<T, ProtocolError> {
        serde_json::from_str(frame).map_err(ProtocolError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ServerEvent;

    #[test]
    fn test_json_codec_round_trip() {
        let codec = JsonCodec;
        let event = ServerEvent::JoinError {
            message: "nope".into(),
        };
        let frame = codec.encode(&event).unwrap();
        let decoded: ServerEvent = codec.decode(&frame).unwrap();
        assert_eq!(event, decoded);
    }

    #[test]
    fn test_json_codec_decode_garbage_fails() {
        let codec = JsonCodec;
        let result: Result<ServerEvent, _> = codec.decode("{{{{");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }
}
