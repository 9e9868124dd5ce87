use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{header, HeaderName, HeaderValue, StatusCode},
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::{json, Value};
use time::Duration;
use tracing::{error, info, instrument, warn};

use crate::{
    error::ApiError,
    session::{middleware::SessionUser, session_cookie, Session, USER_ID_KEY},
    state::AppState,
};

use super::{
    domain::NewUser,
    dto::{EditRequest, PublicUser, SigninRequest, SignupRequest},
    error::AuthError,
    validation::{is_valid_email, is_valid_password},
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/signup", post(signup))
        .route("/users/signin", post(signin))
        .route("/users/profile/:id", get(profile))
        .route("/users/edit", post(edit))
}

fn bad_json(rejection: JsonRejection) -> ApiError {
    warn!(error = %rejection, "malformed request body");
    ApiError::BadRequest(rejection.body_text())
}

fn internal(e: AuthError) -> ApiError {
    error!(error = %e, "user operation failed");
    ApiError::internal(e)
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(req) = payload.map_err(bad_json)?;

    if !is_valid_email(&req.email) {
        warn!(email = %req.email, "invalid email");
        return Err(ApiError::BadRequest("invalid email".into()));
    }
    if req.password != req.confirm_password {
        warn!("password confirmation mismatch");
        return Err(ApiError::BadRequest(
            "password and confirm password do not match".into(),
        ));
    }
    if !is_valid_password(&req.password) {
        warn!("password does not meet complexity rules");
        return Err(ApiError::BadRequest("invalid password".into()));
    }

    match state
        .users
        .signup(NewUser {
            email: req.email,
            password: req.password,
        })
        .await
    {
        Ok(user) => {
            info!(user_id = user.id, "user registered");
            Ok((StatusCode::CREATED, Json(json!({}))))
        }
        Err(AuthError::DuplicateEmail) => {
            warn!("email already registered");
            Err(ApiError::BadRequest("email already exists".into()))
        }
        Err(e) => Err(internal(e)),
    }
}

#[instrument(skip(state, payload))]
pub async fn signin(
    State(state): State<AppState>,
    payload: Result<Json<SigninRequest>, JsonRejection>,
) -> Result<([(HeaderName, HeaderValue); 1], Json<PublicUser>), ApiError> {
    let Json(req) = payload.map_err(bad_json)?;

    let user = match state.users.signin(&req.email, &req.password).await {
        Ok(u) => u,
        Err(AuthError::InvalidCredential | AuthError::UserNotFound) => {
            warn!(email = %req.email, "signin rejected");
            return Err(ApiError::BadRequest("invalid user or password".into()));
        }
        Err(e) => return Err(internal(e)),
    };

    let cfg = &state.config.session;
    let mut session = Session::new();
    session.set_max_age(Duration::seconds(cfg.ttl_seconds));
    session.set(USER_ID_KEY, user.id).map_err(ApiError::internal)?;
    state.sessions.save(&session).await.map_err(|e| {
        error!(error = %e, user_id = user.id, "session save failed");
        ApiError::internal(e)
    })?;
    let cookie = session_cookie(&cfg.cookie_name, &session, cfg.cookie_secure)
        .map_err(ApiError::internal)?;

    info!(user_id = user.id, "user signed in");
    Ok(([(header::SET_COOKIE, cookie)], Json(PublicUser::from(user))))
}

#[instrument(skip(state))]
pub async fn profile(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<PublicUser>, ApiError> {
    let Path(id) = id.map_err(|e| {
        warn!(error = %e, "invalid user id");
        ApiError::BadRequest("invalid user ID".into())
    })?;

    match state.users.find_by_id(id).await {
        Ok(user) => Ok(Json(user.into())),
        Err(AuthError::UserNotFound) => {
            warn!(user_id = id, "profile not found");
            Err(ApiError::NotFound("user not found".into()))
        }
        Err(e) => Err(internal(e)),
    }
}

#[instrument(skip(state, payload))]
pub async fn edit(
    State(state): State<AppState>,
    Extension(SessionUser(session_user)): Extension<SessionUser>,
    payload: Result<Json<EditRequest>, JsonRejection>,
) -> Result<Json<PublicUser>, ApiError> {
    let Json(req) = payload.map_err(bad_json)?;

    if !is_valid_email(&req.email) {
        warn!(email = %req.email, "invalid email");
        return Err(ApiError::BadRequest("invalid email".into()));
    }
    if !is_valid_password(&req.password) {
        warn!("password does not meet complexity rules");
        return Err(ApiError::BadRequest("invalid password".into()));
    }

    match state
        .users
        .edit_profile(req.id, req.email, &req.password)
        .await
    {
        Ok(user) => {
            info!(user_id = user.id, session_user, "user edited");
            Ok(Json(user.into()))
        }
        Err(AuthError::UserNotFound) => {
            warn!(user_id = req.id, "edit target not found");
            Err(ApiError::NotFound("user not found".into()))
        }
        Err(AuthError::DuplicateEmail) => {
            warn!(user_id = req.id, "edit to an email already in use");
            Err(ApiError::BadRequest("email already exists".into()))
        }
        Err(e) => Err(internal(e)),
    }
}
