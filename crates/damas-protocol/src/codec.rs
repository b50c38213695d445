//! Codec trait and implementations for serializing/deserializing events.
//!
//! The server only needs something that implements [`Codec`]; the JSON
//! codec is what browser clients speak.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// A codec that can encode Rust types to bytes and decode bytes back.
///
/// `Send + Sync + 'static` because one codec instance is shared by every
/// connection task for the lifetime of the server.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed,
    /// incomplete, or don't match the expected type.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;

    /// Serializes a value into a text frame.
    ///
    /// The default goes through [`encode`](Self::encode) and rejects
    /// output that is not UTF-8.
    fn encode_text<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<String, ProtocolError> {
        String::from_utf8(self.encode(value)?)
            .map_err(|e| ProtocolError::InvalidMessage(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// ## Example
///
/// ```rust
/// use damas_protocol::{ClientEvent, Codec, JsonCodec};
///
/// let codec = JsonCodec;
/// let event: ClientEvent = codec
///     .decode(br#"{"event":"join_game","data":{"room_code":"K7QZ"}}"#)
///     .unwrap();
/// assert!(matches!(event, ClientEvent::JoinGame { .. }));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }

    fn encode_text<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<String, ProtocolError> {
        serde_json::to_string(value).map_err(ProtocolError::Encode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ClientEvent, Color, RoomCode, ServerEvent};

    #[test]
    fn test_decode_malformed_json_returns_decode_error() {
        let result: Result<ClientEvent, _> = JsonCodec.decode(b"{not json");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_decode_unknown_event_returns_decode_error() {
        let result: Result<ClientEvent, _> =
            JsonCodec.decode(br#"{"event":"resign"}"#);
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_encode_text_matches_encode_bytes() {
        let event = ServerEvent::RoomCreated {
            room: RoomCode::new("AB12"),
            color: Color::White,
        };
        let text = JsonCodec.encode_text(&event).unwrap();
        let bytes = JsonCodec.encode(&event).unwrap();
        assert_eq!(text.as_bytes(), bytes.as_slice());
    }

    #[test]
    fn test_default_encode_text_rejects_invalid_utf8() {
        struct RawCodec;
        impl Codec for RawCodec {
            fn encode<T: Serialize>(
                &self,
                _value: &T,
            ) -> Result<Vec<u8>, ProtocolError> {
                Ok(vec![0xff, 0xfe])
            }
            fn decode<T: DeserializeOwned>(
                &self,
                data: &[u8],
            ) -> Result<T, ProtocolError> {
                JsonCodec.decode(data)
            }
        }

        let result = RawCodec.encode_text(&ServerEvent::Waiting("x".into()));
        assert!(matches!(result, Err(ProtocolError::InvalidMessage(_))));
    }
}
