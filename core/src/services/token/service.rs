//! Main token service implementation

use jsonwebtoken::{Algorithm, Header};

use crate::domain::entities::claims::{ClaimSet, EXP_CLAIM, SUB_CLAIM};
use crate::domain::entities::token::{IssuanceRequest, SigningKey, Token};
use crate::errors::{TokenError, TokenResult};

use super::clock::{Clock, SystemClock};
use super::codec::{decode_segment, encode_segment, signing_input, split_token};
use super::config::TokenDefaults;
use super::signature;

/// Issues and verifies HS256-signed tokens.
///
/// The service keeps no state besides its clock and never retains keys or
/// claims, so a single instance can be shared freely between threads.
#[derive(Debug, Clone)]
pub struct TokenService<C = SystemClock> {
    clock: C,
    header: Header,
}

impl TokenService<SystemClock> {
    /// Creates a token service reading the wall clock
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for TokenService<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> TokenService<C> {
    /// Creates a token service with an explicit time source
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            header: Header::new(Algorithm::HS256),
        }
    }

    /// The time source consulted once per call
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Issues a token carrying `claims`, a `sub` claim when `subject` is given,
    /// and an `exp` claim `expiration_seconds` from now.
    ///
    /// A caller-supplied `exp` is always replaced. A caller-supplied `sub` is
    /// replaced only when `subject` is given.
    ///
    /// # Arguments
    ///
    /// * `claims` - Claims to carry
    /// * `signing_key` - Exactly 32 bytes
    /// * `expiration_seconds` - Lifetime, must be positive
    /// * `subject` - Optional subject
    ///
    /// # Returns
    ///
    /// * `Ok(Token)` - The signed token
    /// * `Err(TokenError::InvalidParameter)` - Bad key length or lifetime
    pub fn issue<K: AsRef<[u8]>>(
        &self,
        claims: &ClaimSet,
        signing_key: K,
        expiration_seconds: i64,
        subject: Option<&str>,
    ) -> TokenResult<Token> {
        let now = self.clock.now();
        let signing_key = SigningKey::from_bytes(signing_key.as_ref())?;
        self.sign_at(now, claims, &signing_key, expiration_seconds, subject)
    }

    /// Issues a token from a prepared request
    pub fn issue_request(&self, request: &IssuanceRequest) -> TokenResult<Token> {
        let now = self.clock.now();
        self.sign_at(
            now,
            &request.claims,
            &request.signing_key,
            request.expiration_seconds,
            request.subject.as_deref(),
        )
    }

    /// Issues a token with the subject, key and lifetime held by `defaults`
    pub fn issue_with_defaults(
        &self,
        claims: &ClaimSet,
        defaults: &TokenDefaults,
    ) -> TokenResult<Token> {
        let now = self.clock.now();
        self.sign_at(
            now,
            claims,
            &defaults.signing_key,
            defaults.expiration_seconds,
            defaults.subject.as_deref(),
        )
    }

    /// Verifies a token and returns its claims.
    ///
    /// The returned set contains every claim in the payload, including the
    /// injected `exp` and `sub`.
    ///
    /// # Returns
    ///
    /// * `Ok(ClaimSet)` - Signature valid and `exp` still in the future
    /// * `Err(TokenError::InvalidParameter)` - Empty token or bad key length
    /// * `Err(TokenError::MalformedToken)` - Structure, encoding or header invalid
    /// * `Err(TokenError::SignatureInvalid)` - Signature mismatch
    /// * `Err(TokenError::Expired)` - `exp` missing or not after now
    pub fn verify<K: AsRef<[u8]>>(&self, token: &str, signing_key: K) -> TokenResult<ClaimSet> {
        let now = self.clock.now();
        if token.is_empty() {
            return Err(TokenError::invalid_parameter("token must not be empty"));
        }
        let signing_key = SigningKey::from_bytes(signing_key.as_ref())?;
        self.verify_at(now, token, &signing_key)
    }

    /// Verifies a token with the key held by `defaults`
    pub fn verify_with_defaults(
        &self,
        token: &str,
        defaults: &TokenDefaults,
    ) -> TokenResult<ClaimSet> {
        self.verify(token, &defaults.signing_key)
    }

    fn sign_at(
        &self,
        now: i64,
        claims: &ClaimSet,
        signing_key: &SigningKey,
        expiration_seconds: i64,
        subject: Option<&str>,
    ) -> TokenResult<Token> {
        if expiration_seconds <= 0 {
            return Err(TokenError::invalid_parameter(format!(
                "expiration must be positive, got {} seconds",
                expiration_seconds
            )));
        }
        let expires_at = now.checked_add(expiration_seconds).ok_or_else(|| {
            TokenError::invalid_parameter("expiration overflows the timestamp range")
        })?;

        let mut payload = claims.clone();
        if let Some(subject) = subject {
            payload.insert(SUB_CLAIM, subject);
        }
        if payload.insert(EXP_CLAIM, expires_at).is_some() {
            tracing::debug!(
                event = "caller_exp_replaced",
                "Caller supplied an exp claim, replaced by the issued expiration"
            );
        }

        let header = encode_segment(&self.header)?;
        let body = encode_segment(&payload)?;
        let message = signing_input(&header, &body);
        let signature = signature::sign(signing_key, message.as_bytes())?;

        tracing::debug!(
            claim_count = payload.len(),
            has_subject = subject.is_some(),
            expires_at = expires_at,
            event = "token_issued",
            "Issued token"
        );

        Ok(Token::new(format!("{}.{}", message, signature)))
    }

    fn verify_at(&self, now: i64, token: &str, signing_key: &SigningKey) -> TokenResult<ClaimSet> {
        let result = Self::check(now, token, signing_key);
        match &result {
            Ok(claims) => tracing::debug!(
                claim_count = claims.len(),
                event = "token_verified",
                "Token verified"
            ),
            Err(e) => tracing::warn!(
                error_code = e.error_code(),
                reason = %e,
                event = "token_rejected",
                "Token verification failed"
            ),
        }
        result
    }

    fn check(now: i64, token: &str, signing_key: &SigningKey) -> TokenResult<ClaimSet> {
        let parts = split_token(token)?;

        let header: Header = decode_segment(parts.header)?;
        if header.alg != Algorithm::HS256 {
            return Err(TokenError::MalformedToken);
        }

        if !signature::verify(signing_key, parts.signing_input().as_bytes(), parts.signature)? {
            return Err(TokenError::SignatureInvalid);
        }

        let claims: ClaimSet = decode_segment(parts.payload)?;
        match claims.expiration() {
            None => Err(TokenError::Expired),
            Some(None) => Err(TokenError::MalformedToken),
            Some(Some(exp)) if exp <= now => Err(TokenError::Expired),
            Some(Some(_)) => Ok(claims),
        }
    }
}
