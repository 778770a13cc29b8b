//! HMAC-SHA256 signature primitive (HS256)

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use constant_time_eq::constant_time_eq;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::domain::entities::token::SigningKey;
use crate::errors::{TokenError, TokenResult};

type HmacSha256 = Hmac<Sha256>;

/// Signs `message`, returning the base64url signature segment
pub fn sign(key: &SigningKey, message: &[u8]) -> TokenResult<String> {
    let mut mac = HmacSha256::new_from_slice(key.as_bytes())
        .map_err(|_| TokenError::invalid_parameter("signing key rejected by HMAC"))?;
    mac.update(message);
    Ok(URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes()))
}

/// Checks a base64url signature segment against `message`.
///
/// The encoded segments are compared in constant time, so any altered
/// character fails, including non-canonical trailing bits.
pub fn verify(key: &SigningKey, message: &[u8], signature: &str) -> TokenResult<bool> {
    let expected = sign(key, message)?;
    Ok(constant_time_eq(expected.as_bytes(), signature.as_bytes()))
}
