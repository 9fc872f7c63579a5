use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::JwtSettings;
use crate::error::ApiError;

/// Subject treated as administrator: the first-ever registered user.
/// A deliberately crude placeholder policy, not an RBAC system.
const RESERVED_ADMIN_SUBJECT: i64 = 1;

pub const TOKEN_TYPE_ACCESS: &str = "access";
pub const TOKEN_TYPE_REFRESH: &str = "refresh";

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Unique token identifier, the revocation lookup key
    pub jti: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// True only for tokens minted directly from a password login
    pub fresh: bool,
    /// Token type: "access" or "refresh"
    pub token_type: String,
    /// Computed at issuance from the reserved admin subject
    pub is_admin: bool,
}

impl Claims {
    pub fn user_id(&self) -> Result<i64, ApiError> {
        self.sub.parse().map_err(|_| ApiError::TokenInvalid)
    }

    pub fn is_refresh(&self) -> bool {
        self.token_type == TOKEN_TYPE_REFRESH
    }

    /// Gate for sensitive operations that must not run on a token derived
    /// from a refresh exchange.
    pub fn require_fresh(&self) -> Result<(), ApiError> {
        if self.fresh {
            Ok(())
        } else {
            Err(ApiError::FreshnessRequired)
        }
    }
}

/// Mints and validates bearer credentials.
///
/// Validation is stateless and does not consult the revocation registry;
/// the request gate composes the two checks.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    pub fn new(settings: &JwtSettings) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(settings.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(settings.secret.as_bytes()),
            access_ttl: Duration::seconds(settings.access_ttl_secs as i64),
            refresh_ttl: Duration::seconds(settings.refresh_ttl_secs as i64),
        }
    }

    /// Generate an access token with a fresh jti.
    pub fn issue_access_token(&self, user_id: i64, fresh: bool) -> Result<String, ApiError> {
        self.issue(user_id, fresh, TOKEN_TYPE_ACCESS, self.access_ttl)
    }

    /// Generate a refresh token: always non-fresh, longer TTL.
    pub fn issue_refresh_token(&self, user_id: i64) -> Result<String, ApiError> {
        self.issue(user_id, false, TOKEN_TYPE_REFRESH, self.refresh_ttl)
    }

    fn issue(
        &self,
        user_id: i64,
        fresh: bool,
        token_type: &str,
        ttl: Duration,
    ) -> Result<String, ApiError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            fresh,
            token_type: token_type.to_string(),
            is_admin: user_id == RESERVED_ADMIN_SUBJECT,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ApiError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Verify signature and expiry only.
    pub fn decode(&self, token: &str) -> Result<Claims, ApiError> {
        let mut validation = Validation::default();
        validation.validate_exp = true;

        match decode::<Claims>(token, &self.decoding_key, &validation) {
            Ok(data) => Ok(data.claims),
            Err(e) => match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => Err(ApiError::TokenExpired),
                _ => Err(ApiError::TokenInvalid),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(&JwtSettings {
            secret: "test-secret-key".to_string(),
            access_ttl_secs: 3600,
            refresh_ttl_secs: 2_592_000,
        })
    }

    #[test]
    fn test_login_pair_freshness() {
        let svc = service();

        let access = svc.decode(&svc.issue_access_token(7, true).unwrap()).unwrap();
        let refresh = svc.decode(&svc.issue_refresh_token(7).unwrap()).unwrap();

        assert!(access.fresh);
        assert_eq!(access.token_type, TOKEN_TYPE_ACCESS);
        assert!(!refresh.fresh);
        assert_eq!(refresh.token_type, TOKEN_TYPE_REFRESH);
    }

    #[test]
    fn test_claims_contents() {
        let svc = service();
        let claims = svc.decode(&svc.issue_access_token(42, true).unwrap()).unwrap();

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.user_id().unwrap(), 42);
        assert!(claims.iat > 0);
        assert!(claims.exp > claims.iat);
        assert!(Uuid::parse_str(&claims.jti).is_ok());
    }

    #[test]
    fn test_jtis_are_unique() {
        let svc = service();
        let a = svc.decode(&svc.issue_access_token(1, true).unwrap()).unwrap();
        let b = svc.decode(&svc.issue_access_token(1, true).unwrap()).unwrap();
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_refresh_token_has_longer_expiry() {
        let svc = service();
        let access = svc.decode(&svc.issue_access_token(1, true).unwrap()).unwrap();
        let refresh = svc.decode(&svc.issue_refresh_token(1).unwrap()).unwrap();
        assert!(refresh.exp > access.exp);
    }

    #[test]
    fn test_is_admin_for_reserved_subject_only() {
        let svc = service();
        let admin = svc.decode(&svc.issue_access_token(1, true).unwrap()).unwrap();
        let regular = svc.decode(&svc.issue_access_token(2, true).unwrap()).unwrap();

        assert!(admin.is_admin);
        assert!(!regular.is_admin);
    }

    #[test]
    fn test_tampered_token_rejected() {
        let svc = service();
        let token = svc.issue_access_token(1, true).unwrap();

        let mut parts: Vec<String> = token.split('.').map(|s| s.to_string()).collect();
        parts[2] = parts[2].chars().rev().collect();
        let tampered = parts.join(".");

        assert!(matches!(svc.decode(&tampered), Err(ApiError::TokenInvalid)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let svc = service();
        let other = TokenService::new(&JwtSettings {
            secret: "another-secret".to_string(),
            access_ttl_secs: 3600,
            refresh_ttl_secs: 2_592_000,
        });

        let token = svc.issue_access_token(1, true).unwrap();
        assert!(matches!(other.decode(&token), Err(ApiError::TokenInvalid)));
    }

    #[test]
    fn test_expired_token_maps_to_token_expired() {
        let svc = TokenService::new(&JwtSettings {
            secret: "test-secret-key".to_string(),
            access_ttl_secs: 0,
            refresh_ttl_secs: 0,
        });

        // jsonwebtoken applies default leeway; pre-date far enough to be past it.
        let now = Utc::now();
        let claims = Claims {
            sub: "1".to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: (now - Duration::hours(2)).timestamp(),
            exp: (now - Duration::hours(1)).timestamp(),
            fresh: true,
            token_type: TOKEN_TYPE_ACCESS.to_string(),
            is_admin: false,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret-key"),
        )
        .unwrap();

        assert!(matches!(svc.decode(&token), Err(ApiError::TokenExpired)));
    }

    #[test]
    fn test_require_fresh() {
        let svc = service();
        let fresh = svc.decode(&svc.issue_access_token(1, true).unwrap()).unwrap();
        let stale = svc.decode(&svc.issue_access_token(1, false).unwrap()).unwrap();

        assert!(fresh.require_fresh().is_ok());
        assert!(matches!(
            stale.require_fresh(),
            Err(ApiError::FreshnessRequired)
        ));
    }
}
