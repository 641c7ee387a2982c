use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::Error as JwtError, Algorithm, DecodingKey, EncodingKey, Header,
    Validation,
};
use serde::{Deserialize, Serialize};

/// Lifetime of an issued token.
pub const TOKEN_TTL_HOURS: i64 = 24;

/// Represents the claims encoded within a JWT.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject of the token: the username it was issued to.
    pub sub: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: usize,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
}

/// Issues and verifies HS256-signed bearer tokens with a server-held secret.
///
/// Tokens are stateless: nothing is recorded at issue time, and verification only
/// checks the signature and the `exp` claim.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &[u8]) -> Self {
        // A token is valid only strictly before its `exp`; no clock skew allowed.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl: Duration::hours(TOKEN_TTL_HOURS),
        }
    }

    /// Generates a token for `username`, valid for [`TOKEN_TTL_HOURS`].
    pub fn generate(&self, username: &str) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            sub: username.to_string(),
            iat: now.timestamp() as usize,
            exp: (now + self.ttl).timestamp() as usize,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
    }

    /// Verifies a token's signature and expiry and returns its claims.
    ///
    /// Malformed tokens, bad signatures and expired tokens all fail; the error
    /// kind says which, but callers surface every failure as Unauthorized.
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(token, &self.decoding, &self.validation).map(|data| data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::errors::ErrorKind;

    const SECRET: &[u8] = b"test_secret_for_tokens";

    #[test]
    fn test_token_generation_and_verification() {
        let issuer = TokenIssuer::new(SECRET);
        let token = issuer.generate("alice").unwrap();
        let claims = issuer.verify(&token).unwrap();

        assert_eq!(claims.sub, "alice");
        assert_eq!(
            claims.exp - claims.iat,
            (TOKEN_TTL_HOURS * 60 * 60) as usize
        );
    }

    #[test]
    fn test_token_expiration() {
        let issuer = TokenIssuer::new(SECRET);
        let issued = Utc::now() - Duration::hours(26);
        let claims_expired = Claims {
            sub: "alice".to_string(),
            iat: issued.timestamp() as usize,
            exp: (issued + Duration::hours(TOKEN_TTL_HOURS)).timestamp() as usize,
        };
        let expired_token = encode(
            &Header::default(),
            &claims_expired,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        let err = issuer.verify(&expired_token).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::ExpiredSignature);
    }

    #[test]
    fn test_token_rejected_just_after_expiry() {
        let issuer = TokenIssuer::new(SECRET);
        let now = Utc::now();
        let claims = Claims {
            sub: "alice".to_string(),
            iat: (now - Duration::hours(1)).timestamp() as usize,
            exp: (now - Duration::seconds(5)).timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET)).unwrap();

        let err = issuer.verify(&token).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::ExpiredSignature);
    }

    #[test]
    fn test_invalid_token_signature() {
        let token = TokenIssuer::new(b"a_completely_different_secret")
            .generate("alice")
            .unwrap();

        let err = TokenIssuer::new(SECRET).verify(&token).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidSignature);
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let issuer = TokenIssuer::new(SECRET);
        let token = issuer.generate("alice").unwrap();
        let other = issuer.generate("mallory").unwrap();

        // Splice mallory's claims onto alice's signature.
        let parts: Vec<&str> = token.split('.').collect();
        let other_parts: Vec<&str> = other.split('.').collect();
        let forged = format!("{}.{}.{}", parts[0], other_parts[1], parts[2]);

        assert!(issuer.verify(&forged).is_err());
    }

    #[test]
    fn test_malformed_token() {
        let issuer = TokenIssuer::new(SECRET);
        assert!(issuer.verify("invalidtoken").is_err());
        assert!(issuer.verify("").is_err());
    }
}
