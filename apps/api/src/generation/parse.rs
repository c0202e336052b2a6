//! Shared response decoding for all generation tasks.

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::llm_client::extract_json_span;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("model response contained no usable text")]
    Empty,

    #[error("model response did not match the expected JSON shape: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Decodes the brace-delimited span of `raw` (or all of `raw` if it has none) as `T`.
pub fn decode_json<T: DeserializeOwned>(raw: &str) -> Result<T, ParseError> {
    if raw.trim().is_empty() {
        return Err(ParseError::Empty);
    }
    Ok(serde_json::from_str(extract_json_span(raw))?)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Payload {
        message: String,
        count: u32,
    }

    #[test]
    fn test_fenced_and_bare_payloads_decode_identically() {
        let bare = r#"{"message": "hi", "count": 2}"#;
        let fenced = format!("Here is the result:\n```json\n{bare}\n```");

        let a: Payload = decode_json(bare).unwrap();
        let b: Payload = decode_json(&fenced).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_blank_response_is_empty_error() {
        let err = decode_json::<Payload>("  \n ").unwrap_err();
        assert!(matches!(err, ParseError::Empty));
    }

    #[test]
    fn test_prose_is_decode_error() {
        let err = decode_json::<Payload>("not json at all").unwrap_err();
        assert!(matches!(err, ParseError::Decode(_)));
    }

    #[test]
    fn test_two_objects_are_not_split() {
        // Greedy span covers both objects, which is not valid JSON.
        let raw = r#"{"message": "a", "count": 1} and {"message": "b", "count": 2}"#;
        assert!(decode_json::<Payload>(raw).is_err());
    }
}
