//! Session cookie issuing and introspection.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde_json::{json, Map, Value};
use tracing::info;

use crate::gates::SessionAuth;
use crate::models::Identity;
use crate::state::AppState;
use crate::utils::http_helpers::HTTPError;

/// Registers session routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/jwt", post(issue_session))
        .route("/session", get(current_session))
}

/// Signs the posted identity payload and returns it as an HTTP-only cookie.
async fn issue_session(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<Map<String, Value>>,
) -> Result<(CookieJar, Json<Value>), HTTPError> {
    let token = state.session.issue(payload).map_err(HTTPError::internal)?;

    let cookie = Cookie::build((state.session.cookie_name().to_string(), token))
        .http_only(true)
        .secure(state.session.secure_cookie())
        .path("/");
    info!("Issued session cookie");

    Ok((jar.add(cookie), Json(json!({ "success": true }))))
}

/// Returns the identity carried by the session cookie.
async fn current_session(SessionAuth(identity): SessionAuth) -> Json<Identity> {
    Json(identity)
}
