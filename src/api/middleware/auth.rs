//! Bearer session authentication middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;

use crate::domain::entities::CurrentUser;
use crate::{error::AppError, state::AppState};

/// Authenticates requests using the session token in the Authorization header.
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <session token>
/// ```
///
/// # Authentication Flow
///
/// 1. Extract token from `Authorization` header
/// 2. Resolve the session (hash lookup, not revoked, not expired)
/// 3. Insert the session's [`CurrentUser`] into request extensions
/// 4. Continue to next middleware/handler
///
/// Handlers read the user with `Extension<CurrentUser>`.
///
/// # Errors
///
/// Returns `401 Unauthorized` if the header is missing or malformed, or the
/// session is unknown, revoked or expired.
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let req = attach_current_user(&st, req).await?;
    Ok(next.run(req).await)
}

/// Like [`layer`], but lets requests without an Authorization header through
/// anonymously. A header that is present must still be valid.
pub async fn optional_layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !req.headers().contains_key(AUTHORIZATION) {
        return Ok(next.run(req).await);
    }

    let req = attach_current_user(&st, req).await?;
    Ok(next.run(req).await)
}

/// Rejects non-admin users with `403 Forbidden`.
///
/// Must be layered inside [`layer`], which supplies the [`CurrentUser`].
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let is_admin = req
        .extensions()
        .get::<CurrentUser>()
        .is_some_and(CurrentUser::is_admin);

    if !is_admin {
        return Err(AppError::forbidden(
            "Administrator access required",
            serde_json::json!({}),
        ));
    }

    Ok(next.run(req).await)
}

async fn attach_current_user(st: &AppState, req: Request) -> Result<Request, AppError> {
    let (mut parts, body) = req.into_parts();

    let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            AppError::unauthorized(
                "Unauthorized",
                serde_json::json!({"reason": "Authorization header is missing or invalid"}),
            )
        })?;

    let user = st.auth_service.authenticate(&token).await?;
    parts.extensions.insert(user);

    Ok(Request::from_parts(parts, body))
}
