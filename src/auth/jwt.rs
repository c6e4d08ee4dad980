use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

/// Claims issued by the external identity provider. This service only
/// verifies tokens; it never mints them.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: u64,
    pub sub: String,
    pub role: u8, // role id
    pub exp: usize,
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}

#[cfg(test)]
pub fn issue_test_token(user_id: u64, sub: &str, role: u8, secret: &str) -> String {
    use jsonwebtoken::{EncodingKey, Header, encode};
    use std::time::{SystemTime, UNIX_EPOCH};

    let exp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize
        + 900;
    let claims = Claims {
        user_id,
        sub: sub.to_string(),
        role,
        exp,
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

    #[test]
    fn verifies_a_provider_issued_token() {
        let token = issue_test_token(42, "jane@company.com", 2, "secret");
        let claims = verify_token(&token, "secret").unwrap();
        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.sub, "jane@company.com");
        assert_eq!(claims.role, 2);
    }

    #[test]
    fn rejects_a_token_signed_with_another_secret() {
        let token = issue_test_token(42, "jane@company.com", 2, "secret");
        assert!(verify_token(&token, "other-secret").is_err());
    }
}
