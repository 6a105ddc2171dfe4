use axum::{
    Extension,
    body::Body,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use shared::{abstract_trait::DynJwtService, domain::AuthUser, errors::HttpError};
use tracing::warn;

/// Verifies the access token from the `token` cookie or the bearer header and
/// exposes the caller as an `AuthUser` extension.
pub async fn auth_middleware(
    cookie_jar: CookieJar,
    Extension(jwt): Extension<DynJwtService>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, HttpError> {
    let token = cookie_jar
        .get("token")
        .map(|cookie| cookie.value().to_string())
        .or_else(|| {
            req.headers()
                .get(header::AUTHORIZATION)
                .and_then(|auth_header| auth_header.to_str().ok())
                .and_then(|auth_value| auth_value.strip_prefix("Bearer ").map(str::to_owned))
        })
        .ok_or_else(|| {
            HttpError::Unauthorized("You are not logged in, please provide token".into())
        })?;

    let user = jwt.verify_token(&token, "access").map_err(|err| {
        warn!("🔒 Rejected token: {err}");
        HttpError::Unauthorized("Invalid token".into())
    })?;

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

/// Must run after [`auth_middleware`].
pub async fn require_admin(
    Extension(user): Extension<AuthUser>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, HttpError> {
    if !user.is_admin() {
        warn!("🔒 User {} tried an admin route", user.user_id);
        return Err(HttpError::Forbidden("Admin access required".into()));
    }

    Ok(next.run(req).await)
}
