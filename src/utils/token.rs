use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub iat: usize,
    pub kind: TokenKind,
    pub role: Option<String>,
}

impl Claims {
    pub fn user_id(&self) -> Result<i64> {
        self.sub
            .parse()
            .map_err(|_| Error::Unauthorized("Invalid token subject".into()))
    }
}

pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

pub fn issue_token(
    secret: &str,
    user_id: i64,
    role: &str,
    kind: TokenKind,
    ttl: Duration,
) -> Result<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (now + ttl).timestamp() as usize,
        iat: now.timestamp() as usize,
        kind,
        role: Some(role.to_string()),
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

pub fn issue_pair(
    secret: &str,
    user_id: i64,
    role: &str,
    access_ttl: Duration,
    refresh_ttl: Duration,
) -> Result<TokenPair> {
    Ok(TokenPair {
        access: issue_token(secret, user_id, role, TokenKind::Access, access_ttl)?,
        refresh: issue_token(secret, user_id, role, TokenKind::Refresh, refresh_ttl)?,
    })
}

/// Decodes and checks expiry plus the expected token kind.
pub fn decode_token(secret: &str, token: &str, expected: TokenKind) -> Result<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;
    if data.claims.kind != expected {
        return Err(Error::Unauthorized("Wrong token type".into()));
    }
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn access_token_round_trip() {
        let token = issue_token(SECRET, 42, "student", TokenKind::Access, Duration::minutes(5))
            .unwrap();
        let claims = decode_token(SECRET, &token, TokenKind::Access).unwrap();
        assert_eq!(claims.user_id().unwrap(), 42);
        assert_eq!(claims.role.as_deref(), Some("student"));
    }

    #[test]
    fn refresh_token_is_not_an_access_token() {
        let pair = issue_pair(SECRET, 7, "admin", Duration::minutes(5), Duration::days(1)).unwrap();
        assert!(matches!(
            decode_token(SECRET, &pair.refresh, TokenKind::Access),
            Err(Error::Unauthorized(_))
        ));
        tokio_test::assert_ok!(decode_token(SECRET, &pair.refresh, TokenKind::Refresh));
    }

    #[test]
    fn expired_or_foreign_tokens_fail() {
        let expired =
            issue_token(SECRET, 1, "student", TokenKind::Access, Duration::minutes(-10)).unwrap();
        assert!(matches!(
            decode_token(SECRET, &expired, TokenKind::Access),
            Err(Error::Token(_))
        ));
        let foreign =
            issue_token("other", 1, "student", TokenKind::Access, Duration::minutes(5)).unwrap();
        assert!(decode_token(SECRET, &foreign, TokenKind::Access).is_err());
    }
}
