//! Response body decoders.

use std::io::Read;

use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Converts a response body stream into a typed value.
pub trait ResponseDecoder {
    fn decode<T: DeserializeOwned>(&self, body: &mut dyn Read) -> Result<T, ApiError>;
}

/// Decodes JSON bodies with serde_json.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl ResponseDecoder for JsonDecoder {
    fn decode<T: DeserializeOwned>(&self, body: &mut dyn Read) -> Result<T, ApiError> {
        serde_json::from_reader(body).map_err(|e| ApiError::Decoding(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Cursor;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Player {
        name: String,
        kills: u32,
    }

    #[test]
    fn decodes_json_object() {
        let mut body = Cursor::new(r#"{"name":"ninja","kills":12}"#);
        let player: Player = JsonDecoder.decode(&mut body).unwrap();
        assert_eq!(
            player,
            Player {
                name: "ninja".to_string(),
                kills: 12
            }
        );
    }

    #[test]
    fn shape_mismatch_is_decoding_error() {
        let mut body = Cursor::new(r#"{"name":"ninja"}"#);
        let err = JsonDecoder.decode::<Player>(&mut body).unwrap_err();
        assert!(matches!(err, ApiError::Decoding(_)));
    }

    #[test]
    fn empty_body_is_decoding_error() {
        let mut body = Cursor::new("");
        let err = JsonDecoder.decode::<Vec<Player>>(&mut body).unwrap_err();
        assert!(matches!(err, ApiError::Decoding(_)));
    }
}
