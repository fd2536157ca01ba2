use std::time::{SystemTime, UNIX_EPOCH};

use derive_more::Display;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde_json::{Map, Value};

use crate::models::IdentityClaims;

#[derive(Debug, Display)]
pub enum TokenError {
    /// No `Authorization` header was presented.
    #[display(fmt = "missing credential")]
    Missing,

    /// Malformed header, bad signature or expired token.
    #[display(fmt = "invalid token: {}", _0)]
    Invalid(String),

    #[display(fmt = "token signing failed: {}", _0)]
    Signing(String),
}

impl std::error::Error for TokenError {}

fn now() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as usize)
        .unwrap_or_default()
}

/// HS256 signer/verifier for identity tokens. Tokens are not revocable.
#[derive(Clone)]
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: usize,
}

impl TokenSigner {
    pub fn new(secret: &str, ttl: usize) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Signs any claim set. `exp`/`iat` from the payload are replaced.
    pub fn issue(&self, mut payload: Map<String, Value>) -> Result<String, TokenError> {
        let email = match payload.remove("email") {
            Some(Value::String(email)) => Some(email),
            Some(other) => {
                payload.insert("email".to_string(), other);
                None
            }
            None => None,
        };
        payload.remove("exp");
        payload.remove("iat");

        let issued_at = now();
        let claims = IdentityClaims {
            email,
            exp: issued_at + self.ttl,
            iat: issued_at,
            extra: payload,
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<IdentityClaims, TokenError> {
        decode::<IdentityClaims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| TokenError::Invalid(e.to_string()))
    }

    /// Verifies the value of an `Authorization` header. Only an absent header
    /// is `Missing`, anything presented but unusable is `Invalid`.
    pub fn verify_header(&self, header: Option<&str>) -> Result<IdentityClaims, TokenError> {
        let header = header.ok_or(TokenError::Missing)?;
        let token = match header.trim().split_once(' ') {
            Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") => token.trim(),
            _ => return Err(TokenError::Invalid("expected a bearer credential".into())),
        };
        if token.is_empty() {
            return Err(TokenError::Invalid("empty bearer token".into()));
        }
        self.verify(token)
    }
}
