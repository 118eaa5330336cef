//! JWT claim structures for authentication tokens.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Discriminates access from refresh tokens signed with the same secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims for access tokens.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// User ID (subject claim)
    pub sub: String,
    /// User's email address at issuance
    pub email: String,
    pub token_type: TokenType,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: usize,
    /// Token issued-at timestamp (Unix timestamp)
    pub iat: usize,
}

/// JWT claims for refresh tokens.
///
/// Refresh tokens are long-lived and used to obtain new access tokens
/// without requiring the user to re-authenticate with their password.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenClaims {
    pub sub: String,
    pub email: String,
    pub token_type: TokenType,
    pub exp: usize,
    pub iat: usize,
    /// Unique token identifier (JWT ID) to ensure token uniqueness
    pub jti: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_serialize() {
        let claims = Claims {
            sub: "user-id-123".to_string(),
            email: "test@example.com".to_string(),
            token_type: TokenType::Access,
            exp: 1234567890,
            iat: 1234567800,
        };
        let serialized = serde_json::to_string(&claims).unwrap();
        assert!(serialized.contains(r#""sub":"user-id-123""#));
        assert!(serialized.contains(r#""token_type":"access""#));
    }

    #[test]
    fn test_claims_deserialize() {
        let json = r#"{"sub":"user-id-456","email":"user@test.com","token_type":"access","exp":9999999999,"iat":9999999900}"#;
        let claims: Claims = serde_json::from_str(json).unwrap();
        assert_eq!(claims.sub, "user-id-456");
        assert_eq!(claims.token_type, TokenType::Access);
        assert_eq!(claims.exp, 9999999999);
    }

    #[test]
    fn test_claims_without_token_type_rejected() {
        let json = r#"{"sub":"user-id-456","email":"user@test.com","exp":9999999999,"iat":9999999900}"#;
        assert!(serde_json::from_str::<Claims>(json).is_err());
    }

    #[test]
    fn test_refresh_token_claims_serialize() {
        let claims = RefreshTokenClaims {
            sub: "user-123".to_string(),
            email: "refresh@test.com".to_string(),
            token_type: TokenType::Refresh,
            exp: 1234567890,
            iat: 1234567800,
            jti: "test-jti-123".to_string(),
        };
        let serialized = serde_json::to_string(&claims).unwrap();
        assert!(serialized.contains(r#""token_type":"refresh""#));
        assert!(serialized.contains(r#""jti":"test-jti-123""#));
    }
}
