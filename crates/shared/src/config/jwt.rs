use crate::{
    abstract_trait::JwtServiceTrait,
    domain::{AuthUser, UserRole},
    errors::ServiceError,
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i32,
    pub role: UserRole,
    pub exp: usize,
    pub iat: usize,
    pub token_type: String,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub jwt_secret: String,
}

impl JwtConfig {
    pub fn new(jwt_secret: &str) -> Self {
        JwtConfig {
            jwt_secret: jwt_secret.to_string(),
        }
    }
}

impl JwtServiceTrait for JwtConfig {
    fn verify_token(&self, token: &str, expected_type: &str) -> Result<AuthUser, ServiceError> {
        let decoding_key = DecodingKey::from_secret(self.jwt_secret.as_ref());
        let token_data = decode::<Claims>(token, &decoding_key, &Validation::default())
            .map_err(|e| ServiceError::Unauthorized(format!("Invalid token: {e}")))?;

        if token_data.claims.token_type != expected_type {
            return Err(ServiceError::Unauthorized("Invalid token type".into()));
        }

        Ok(AuthUser {
            user_id: token_data.claims.user_id,
            role: token_data.claims.role,
        })
    }
}
