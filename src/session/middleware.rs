use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::{error, warn};

use super::{extract_session_id, USER_ID_KEY};
use crate::{error::ApiError, state::AppState};

/// Paths reachable without a session.
const PUBLIC_PATHS: &[&str] = &["/users/signup", "/users/signin", "/health"];

/// Id of the signed-in user, available to handlers behind `require_login`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionUser(pub i64);

/// Rejects requests to non-public paths unless the session cookie resolves to
/// a live session holding a user id.
pub async fn require_login(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if PUBLIC_PATHS.contains(&req.uri().path()) {
        return Ok(next.run(req).await);
    }

    let Some(id) = extract_session_id(req.headers(), &state.config.session.cookie_name) else {
        warn!(path = %req.uri().path(), "request without session cookie");
        return Err(ApiError::Unauthorized);
    };

    let session = state.sessions.load(&id).await.map_err(|e| {
        error!(error = %e, "session load failed");
        ApiError::internal(e)
    })?;

    let Some(user_id) = session.and_then(|s| s.get::<i64>(USER_ID_KEY)) else {
        warn!(path = %req.uri().path(), "session missing or expired");
        return Err(ApiError::Unauthorized);
    };

    req.extensions_mut().insert(SessionUser(user_id));
    Ok(next.run(req).await)
}
