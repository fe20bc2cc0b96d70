use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use super::{AuthError, Claims, Clock};

#[derive(Clone)]
pub struct JwtKeys {
    pub enc: EncodingKey,
    pub dec: DecodingKey,
}

impl JwtKeys {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            enc: EncodingKey::from_secret(secret),
            dec: DecodingKey::from_secret(secret),
        }
    }
}

pub fn now_unix(clock: &dyn Clock) -> usize {
    clock.now().timestamp().max(0) as usize
}

pub fn encode_token(keys: &JwtKeys, claims: &Claims) -> Result<String, AuthError> {
    let mut header = Header::new(Algorithm::HS256);
    header.typ = Some("JWT".into());

    encode(&header, claims, &keys.enc).map_err(AuthError::TokenSigning)
}

pub fn make_access_claims(user_id: &Uuid, email: &str, iat: usize, ttl_secs: usize) -> Claims {
    Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        iat,
        exp: iat + ttl_secs,
    }
}

/// Checks the HS256 signature and the `exp` claim against `now` (unix
/// seconds) rather than the wall clock, so an injected clock stays
/// authoritative.
pub fn decode_access_token(keys: &JwtKeys, token: &str, now: usize) -> Result<Claims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<Claims>(token, &keys.dec, &validation).map_err(|err| {
        tracing::debug!(error = %err, "access token rejected");
        AuthError::InvalidAccessToken
    })?;

    if now >= data.claims.exp {
        return Err(AuthError::InvalidAccessToken);
    }
    Ok(data.claims)
}
