//! Segment codec for the compact token format.
//!
//! Each segment is JSON encoded with base64url, no padding.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{de::DeserializeOwned, Serialize};

use crate::errors::{TokenError, TokenResult};

/// Borrowed view of the three segments of a compact token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenParts<'a> {
    pub header: &'a str,
    pub payload: &'a str,
    pub signature: &'a str,
}

impl<'a> TokenParts<'a> {
    /// The `header.payload` string the signature covers
    pub fn signing_input(&self) -> String {
        signing_input(self.header, self.payload)
    }
}

/// Joins encoded header and payload into the signed message
pub fn signing_input(header: &str, payload: &str) -> String {
    format!("{}.{}", header, payload)
}

/// Splits a token into exactly three non-empty segments
pub fn split_token(token: &str) -> TokenResult<TokenParts<'_>> {
    let mut segments = token.split('.');
    match (segments.next(), segments.next(), segments.next(), segments.next()) {
        (Some(header), Some(payload), Some(signature), None)
            if !header.is_empty() && !payload.is_empty() && !signature.is_empty() =>
        {
            Ok(TokenParts {
                header,
                payload,
                signature,
            })
        }
        _ => Err(TokenError::MalformedToken),
    }
}

/// Serializes `value` to JSON and encodes it as a segment
pub fn encode_segment<T: Serialize + ?Sized>(value: &T) -> TokenResult<String> {
    let json = serde_json::to_vec(value).map_err(|e| {
        tracing::error!(error = %e, event = "segment_encode_failed", "Failed to serialize token segment");
        TokenError::invalid_parameter("claims could not be serialized")
    })?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

/// Decodes a segment and deserializes its JSON content
pub fn decode_segment<T: DeserializeOwned>(segment: &str) -> TokenResult<T> {
    let bytes = URL_SAFE_NO_PAD.decode(segment).map_err(|e| {
        tracing::debug!(error = %e, event = "segment_base64_invalid", "Token segment is not base64url");
        TokenError::MalformedToken
    })?;
    serde_json::from_slice(&bytes).map_err(|e| {
        tracing::debug!(error = %e, event = "segment_json_invalid", "Token segment is not valid JSON");
        TokenError::MalformedToken
    })
}
