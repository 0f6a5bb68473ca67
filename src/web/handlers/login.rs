//! Dashboard login and logout.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::{StatusCode, header::SET_COOKIE},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::state::AppState;
use crate::web::middleware::web_auth::AUTH_COOKIE;

/// Dashboard cookies expire after a working day; the session itself may live longer.
const COOKIE_MAX_AGE_SECS: u32 = 8 * 60 * 60;

/// Template for the login page.
///
/// Renders `templates/login.html` with a session token form.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub token: String,
}

/// Renders the login page.
///
/// # Endpoint
///
/// `GET /dashboard/login`
pub async fn login_page_handler() -> impl IntoResponse {
    LoginTemplate { error: None }
}

/// Checks an admin session token and stores it in the `auth_token` cookie.
///
/// # Endpoint
///
/// `POST /dashboard/login` (form field `token`)
///
/// Redirects to `/dashboard` on success; re-renders the form with `401`
/// for an invalid token or a non-admin session.
pub async fn login_submit_handler(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Response {
    let token = form.token.trim();

    match state.auth_service.authenticate(token).await {
        Ok(user) if user.is_admin() => {
            tracing::info!(user_id = %user.id, "Dashboard login");
            let cookie = session_cookie(token, COOKIE_MAX_AGE_SECS, state.secure_cookies);
            ([(SET_COOKIE, cookie)], Redirect::to("/dashboard")).into_response()
        }
        Ok(_) => login_failed("This account is not an administrator"),
        Err(_) => login_failed("Invalid or expired session token"),
    }
}

/// Clears the dashboard cookie.
///
/// # Endpoint
///
/// `POST /dashboard/logout`
pub async fn logout_handler(State(state): State<AppState>) -> impl IntoResponse {
    let cookie = session_cookie("", 0, state.secure_cookies);
    ([(SET_COOKIE, cookie)], Redirect::to("/dashboard/login"))
}

fn login_failed(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        LoginTemplate {
            error: Some(message.to_string()),
        },
    )
        .into_response()
}

fn session_cookie(token: &str, max_age: u32, secure: bool) -> String {
    let mut cookie = format!(
        "{AUTH_COOKIE}={token}; Path=/dashboard; HttpOnly; SameSite=Strict; Max-Age={max_age}"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("tok", 60, false);
        assert_eq!(
            cookie,
            "auth_token=tok; Path=/dashboard; HttpOnly; SameSite=Strict; Max-Age=60"
        );
        assert!(session_cookie("tok", 60, true).ends_with("; Secure"));
    }

    #[test]
    fn test_login_template_shows_error() {
        let html = LoginTemplate {
            error: Some("Invalid <token>".to_string()),
        }
        .render()
        .unwrap();
        assert!(html.contains("Invalid &#60;token&#62;") || html.contains("Invalid &lt;token&gt;"));
    }
}
