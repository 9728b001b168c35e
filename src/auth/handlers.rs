use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::CookieJar;
use tracing::{instrument, warn};

use crate::{
    auth::{
        dto::{CredentialsRequest, LoginResponse, MessageResponse, RegisterResponse},
        extractors::{cleared_session_cookie, session_cookie, SessionToken},
        repo_types::PublicUser,
    },
    error::AppError,
    state::AppState,
    validation::{validate_credentials, Issue},
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
}

fn body_issue(rejection: JsonRejection) -> AppError {
    warn!(error = %rejection, "rejected request body");
    AppError::Validation(vec![Issue::new("body", rejection.body_text())])
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let Json(payload) = payload.map_err(body_issue)?;
    let creds = validate_credentials(payload)?;

    let user = state.auth.register(&creds.email, &creds.password).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".into(),
            success: true,
            data: user,
        }),
    ))
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<LoginResponse>), AppError> {
    let Json(payload) = payload.map_err(body_issue)?;
    let creds = validate_credentials(payload)?;

    let data = state.auth.login(&creds.email, &creds.password).await?;

    let cookie = session_cookie(
        data.token.clone(),
        state.config.environment.is_production(),
        state.auth.keys().ttl(),
    );

    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            message: "Login successful".into(),
            data,
        }),
    ))
}

#[instrument(skip(state, jar))]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    state.auth.logout();
    let cleared = cleared_session_cookie(state.config.environment.is_production());
    (
        jar.add(cleared),
        Json(MessageResponse {
            message: "Logout successful".into(),
            success: true,
        }),
    )
}

#[instrument(skip(state, token))]
pub async fn me(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
) -> Result<Json<PublicUser>, AppError> {
    let user = state.auth.me(token.as_deref()).await?;
    Ok(Json(user))
}
