use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use tracing::{error, instrument, warn};

use crate::{
    dto::ApiMessage,
    otp::{
        dto::{GenerateOtpRequest, VerifyOtpRequest},
        services::{self, OtpError},
    },
    state::AppState,
};

pub fn otp_routes() -> Router<AppState> {
    Router::new()
        .route("/generate-otp", post(generate_otp))
        .route("/verify-otp", post(verify_otp))
}

#[instrument(skip(state, payload))]
pub async fn generate_otp(
    State(state): State<AppState>,
    Json(payload): Json<GenerateOtpRequest>,
) -> Result<Json<ApiMessage>, (StatusCode, Json<ApiMessage>)> {
    match services::request_code(&state, &payload.phone_number).await {
        Ok(()) => Ok(Json(ApiMessage::ok("OTP code generated and sent"))),
        Err(e @ OtpError::InvalidFormat) => {
            warn!("generate-otp invalid phone");
            Err((StatusCode::BAD_REQUEST, Json(ApiMessage::fail(e.to_string()))))
        }
        Err(OtpError::Delivery(e)) => {
            error!(error = %e, "otp delivery failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiMessage::fail("Could not send the code. Please try again later")),
            ))
        }
        // issue() cannot report NotFound/Expired/Mismatch
        Err(e) => {
            error!(error = %e, "unexpected generate-otp error");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiMessage::fail("Could not send the code. Please try again later")),
            ))
        }
    }
}

#[instrument(skip(state, payload))]
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(payload): Json<VerifyOtpRequest>,
) -> Result<Json<ApiMessage>, (StatusCode, Json<ApiMessage>)> {
    match services::verify_code(&state, &payload.phone_number, &payload.otp_code).await {
        Ok(()) => Ok(Json(ApiMessage::ok("OTP code verified successfully"))),
        Err(OtpError::Delivery(e)) => {
            error!(error = %e, "unexpected verify-otp error");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiMessage::fail("Verification failed. Please try again later")),
            ))
        }
        Err(e) => {
            let status = match e {
                OtpError::NotFound => StatusCode::NOT_FOUND,
                OtpError::Expired | OtpError::InvalidFormat => StatusCode::BAD_REQUEST,
                OtpError::Mismatch => StatusCode::UNAUTHORIZED,
                OtpError::Delivery(_) => unreachable!("handled above"),
            };
            warn!(error = %e, "otp verification failed");
            Err((status, Json(ApiMessage::fail(e.to_string()))))
        }
    }
}
