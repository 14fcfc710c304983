use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::models::claims::Claims;
use crate::models::user::User;
use crate::utils::config::Config;
use crate::utils::error::ApiError;

/// Signing secret, token lifetime and password hashing cost, shared as app data.
#[derive(Clone)]
pub struct AuthSettings {
    secret: String,
    token_ttl: Duration,
    bcrypt_cost: u32,
}

impl AuthSettings {
    pub fn new(secret: impl Into<String>, token_ttl: Duration, bcrypt_cost: u32) -> AuthSettings {
        AuthSettings {
            secret: secret.into(),
            token_ttl,
            bcrypt_cost,
        }
    }

    pub fn from_config(config: &Config) -> AuthSettings {
        AuthSettings::new(
            config.jwt_secret.clone(),
            Duration::hours(config.token_ttl_hours),
            config.bcrypt_cost,
        )
    }

    pub fn issue_token(&self, user: &User) -> Result<String, ApiError> {
        let claims = Claims {
            user_id: user.id,
            sub: user.username.clone(),
            role: user.role,
            exp: (Utc::now() + self.token_ttl).timestamp() as usize,
        };

        Ok(encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(self.secret.as_ref()),
        )?)
    }

    pub fn decode_token(&self, token: &str) -> Result<Claims, ApiError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_ref()),
            &Validation::new(Algorithm::HS512),
        )
        .map(|token_data| token_data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => ApiError::Unauthorized("Token expired"),
            _ => ApiError::Unauthorized("Invalid token"),
        })
    }

    pub fn hash_password(&self, password: &str) -> Result<String, ApiError> {
        Ok(hash(password, self.bcrypt_cost)?)
    }

    pub fn verify_password(&self, password: &str, hashed_password: &str) -> Result<bool, ApiError> {
        Ok(verify(password, hashed_password)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::Role;

    fn user() -> User {
        User {
            id: 7,
            username: String::from("alice"),
            hashed_password: String::new(),
            role: Role::Supervisor,
            full_name: String::from("Alice A"),
        }
    }

    #[test]
    fn issued_token_decodes_to_the_same_identity() {
        let settings = AuthSettings::new("secret", Duration::hours(1), 4);
        let token = settings.issue_token(&user()).unwrap();
        let claims = settings.decode_token(&token).unwrap();
        assert_eq!(claims.user_id, 7);
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.role, Role::Supervisor);
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let issuer = AuthSettings::new("secret", Duration::hours(1), 4);
        let verifier = AuthSettings::new("other-secret", Duration::hours(1), 4);
        let token = issuer.issue_token(&user()).unwrap();
        assert!(matches!(
            verifier.decode_token(&token),
            Err(ApiError::Unauthorized("Invalid token"))
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let settings = AuthSettings::new("secret", Duration::hours(-2), 4);
        let token = settings.issue_token(&user()).unwrap();
        assert!(matches!(
            settings.decode_token(&token),
            Err(ApiError::Unauthorized("Token expired"))
        ));
    }

    #[test]
    fn password_hash_verifies() {
        let settings = AuthSettings::new("secret", Duration::hours(1), 4);
        let hashed = settings.hash_password("hunter2").unwrap();
        assert!(settings.verify_password("hunter2", &hashed).unwrap());
        assert!(!settings.verify_password("hunter3", &hashed).unwrap());
    }
}
