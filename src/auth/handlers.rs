use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, ProtectedResponse, RegisterRequest},
        extractors::AuthUser,
        services::{self, LoginError, RegisterError},
    },
    dto::ApiMessage,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/protected-route", get(protected))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiMessage>), (StatusCode, Json<ApiMessage>)> {
    match services::register(&state, &payload.name, &payload.phone, &payload.password).await {
        Ok(_) => Ok((
            StatusCode::CREATED,
            Json(ApiMessage::ok("User registered successfully")),
        )),
        Err(e @ (RegisterError::WeakPassword | RegisterError::InvalidPhone)) => {
            warn!(error = %e, "register rejected");
            Err((StatusCode::BAD_REQUEST, Json(ApiMessage::fail(e.to_string()))))
        }
        Err(e @ RegisterError::Conflict) => {
            warn!("register conflict");
            Err((StatusCode::CONFLICT, Json(ApiMessage::fail(e.to_string()))))
        }
        Err(RegisterError::Internal(e)) => {
            error!(error = %e, "register failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiMessage::fail("Registration failed. Please try again later")),
            ))
        }
    }
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, (StatusCode, Json<ApiMessage>)> {
    match services::login(&state, &payload.phone, &payload.password).await {
        Ok(token) => Ok(Json(LoginResponse {
            success: true,
            message: "Logged in successfully".into(),
            token,
        })),
        Err(e @ LoginError::InvalidCredentials) => {
            Err((StatusCode::UNAUTHORIZED, Json(ApiMessage::fail(e.to_string()))))
        }
        Err(LoginError::Internal(e)) => {
            error!(error = %e, "login failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiMessage::fail("Login failed. Please try again later")),
            ))
        }
    }
}

/// Example of a route only reachable with a valid session token.
#[instrument(skip(claims))]
pub async fn protected(AuthUser(claims): AuthUser) -> Json<ProtectedResponse> {
    Json(ProtectedResponse {
        message: format!("Welcome, {}! You reached a protected route.", claims.name),
        user_id: claims.sub,
    })
}
