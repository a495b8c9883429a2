use crate::{error::AuthError, models::Claims};
use chrono::{DateTime, Utc};
use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use uuid::Uuid;

pub fn generate_token(
    subject_id: &str,
    email: &str,
    secret: &str,
    ttl: usize,
) -> Result<(String, Claims), jsonwebtoken::errors::Error> {
    let now = Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: subject_id.to_string(),
        email: email.to_string(),
        iat: now,
        exp: now + ttl,
        jti: Uuid::new_v4().to_string(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok((token, claims))
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::Expired,
        _ => AuthError::Invalid,
    })
}

/// Expiry of a token as a timestamp, for revocation bookkeeping.
pub fn expires_at(claims: &Claims) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(claims.exp as i64, 0).unwrap_or_else(Utc::now)
}

#[cfg(test)]
pub(crate) fn expired_token(subject_id: &str, email: &str, secret: &str) -> String {
    let now = Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: subject_id.to_string(),
        email: email.to_string(),
        iat: now - 7200,
        exp: now - 3600,
        jti: Uuid::new_v4().to_string(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn round_trips_claims() {
        let (token, issued) = generate_token("user-1", "a@example.com", SECRET, 600).unwrap();
        let claims = verify_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email, "a@example.com");
        assert_eq!(claims.jti, issued.jti);
    }

    #[test]
    fn each_token_gets_a_fresh_jti() {
        let (_, a) = generate_token("user-1", "a@example.com", SECRET, 600).unwrap();
        let (_, b) = generate_token("user-1", "a@example.com", SECRET, 600).unwrap();
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn wrong_secret_is_invalid() {
        let (token, _) = generate_token("user-1", "a@example.com", SECRET, 600).unwrap();
        assert_eq!(verify_token(&token, "other"), Err(AuthError::Invalid));
    }

    #[test]
    fn garbage_is_invalid() {
        assert_eq!(verify_token("not.a.jwt", SECRET), Err(AuthError::Invalid));
    }

    #[test]
    fn past_expiry_is_expired() {
        let token = expired_token("user-1", "a@example.com", SECRET);
        assert_eq!(verify_token(&token, SECRET), Err(AuthError::Expired));
    }
}
