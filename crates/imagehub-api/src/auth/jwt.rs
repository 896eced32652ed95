//! HS256 token issuance and verification

use crate::auth::models::JwtClaims;
use chrono::{Duration, Utc};
use imagehub_core::models::Account;
use imagehub_core::AppError;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_hours: i64,
}

impl JwtService {
    pub fn new(secret: &str, expiry_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiry_hours,
        }
    }

    /// Token lifetime in seconds
    pub fn expires_in(&self) -> i64 {
        self.expiry_hours * 3600
    }

    pub fn issue(&self, account: &Account) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = JwtClaims::new(
            account.id,
            account.role,
            now.timestamp(),
            (now + Duration::hours(self.expiry_hours)).timestamp(),
        );

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }

    pub fn verify(&self, token: &str) -> Result<JwtClaims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);

        decode::<JwtClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token rejected");
                match e.kind() {
                    ErrorKind::ExpiredSignature => {
                        AppError::Unauthorized("Token has expired".to_string())
                    }
                    ErrorKind::InvalidSignature => {
                        AppError::Unauthorized("Invalid token signature".to_string())
                    }
                    ErrorKind::MissingRequiredClaim(claim) => {
                        AppError::Unauthorized(format!("Token is missing the '{}' claim", claim))
                    }
                    _ => AppError::Unauthorized("Invalid or expired token".to_string()),
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imagehub_core::models::{Actor, Role};

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn account(id: i64, role: Role) -> Account {
        Account {
            id,
            email: "someone@example.com".to_string(),
            password_hash: String::new(),
            role,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_issue_and_verify() {
        let jwt = JwtService::new(SECRET, 24);
        let token = jwt.issue(&account(42, Role::Admin)).unwrap();

        let claims = jwt.verify(&token).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
        assert_eq!(claims.actor().unwrap(), Actor::admin(42));
    }

    #[test]
    fn test_token_without_subject_rejected() {
        #[derive(serde::Serialize)]
        struct NoSubject {
            role: Role,
            iat: i64,
            exp: i64,
        }

        let now = Utc::now().timestamp();
        let token = encode(
            &Header::new(Algorithm::HS256),
            &NoSubject {
                role: Role::User,
                iat: now,
                exp: now + 3600,
            },
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        match JwtService::new(SECRET, 1).verify(&token) {
            Err(AppError::Unauthorized(message)) => assert!(message.contains("sub")),
            other => panic!("expected missing subject rejection, got {:?}", other.map(|c| c.sub)),
        }
    }

    #[test]
    fn test_non_numeric_subject_has_no_actor() {
        let claims = JwtClaims {
            sub: "not-an-id".to_string(),
            role: Role::User,
            iat: 0,
            exp: 0,
        };
        assert!(matches!(claims.actor(), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = JwtService::new(SECRET, 1)
            .issue(&account(1, Role::User))
            .unwrap();
        let other = JwtService::new("ffffffffffffffffffffffffffffffff", 1);

        assert!(matches!(
            other.verify(&token),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        // far enough in the past to exceed the default leeway
        let jwt = JwtService::new(SECRET, -2);
        let token = jwt.issue(&account(1, Role::User)).unwrap();
        match jwt.verify(&token) {
            Err(AppError::Unauthorized(message)) => assert_eq!(message, "Token has expired"),
            other => panic!("expected expiry rejection, got {:?}", other.map(|c| c.sub)),
        }
    }

    #[test]
    fn test_garbage_rejected() {
        let jwt = JwtService::new(SECRET, 1);
        assert!(jwt.verify("not.a.token").is_err());
    }
}
