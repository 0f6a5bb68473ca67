//! Cookie-based admin authentication for the dashboard.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::COOKIE},
    middleware::Next,
    response::{Redirect, Response},
};

use crate::state::AppState;

/// Name of the cookie holding the raw session token.
pub const AUTH_COOKIE: &str = "auth_token";

const LOGIN_PATH: &str = "/dashboard/login";

/// Authenticates dashboard requests using the `auth_token` cookie.
///
/// # Cookie Format
///
/// ```text
/// Cookie: auth_token=<session token>
/// ```
///
/// # Authentication Flow
///
/// 1. Extract `auth_token` cookie from request
/// 2. Resolve the session via [`crate::application::services::AuthService`]
/// 3. Require the admin role
/// 4. Insert the [`crate::domain::entities::CurrentUser`] and continue
///
/// Unlike the API middleware, failures redirect to `/dashboard/login`
/// instead of returning `401`/`403`.
pub async fn layer(
    State(st): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Redirect> {
    let Some(token) = auth_cookie(req.headers()) else {
        return Err(Redirect::to(LOGIN_PATH));
    };

    match st.auth_service.authenticate(&token).await {
        Ok(user) if user.is_admin() => {
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Ok(user) => {
            tracing::warn!(user_id = %user.id, "Non-admin attempted dashboard access");
            Err(Redirect::to(LOGIN_PATH))
        }
        Err(_) => Err(Redirect::to(LOGIN_PATH)),
    }
}

/// Extracts the session token from the `Cookie` header.
///
/// Handles multiple cookies separated by semicolons and ignores the rest.
pub fn auth_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .find_map(|cookie| {
            let (name, value) = cookie.trim().split_once('=')?;
            (name == AUTH_COOKIE && !value.is_empty()).then(|| value.to_string())
        })
}
