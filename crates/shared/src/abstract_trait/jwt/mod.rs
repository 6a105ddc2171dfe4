use crate::{domain::AuthUser, errors::ServiceError};
use std::sync::Arc;

pub type DynJwtService = Arc<dyn JwtServiceTrait + Send + Sync>;

/// Verifies bearer tokens issued elsewhere; this service never mints them.
pub trait JwtServiceTrait: Send + Sync + std::fmt::Debug {
    fn verify_token(&self, token: &str, expected_type: &str) -> Result<AuthUser, ServiceError>;
}
