use std::time::Duration;

use thiserror::Error;
use tracing::info;

use crate::{otp::store::OtpVerifyError, state::AppState, validation::is_valid_phone};

#[derive(Debug, Error)]
pub enum OtpError {
    #[error("invalid phone number format")]
    InvalidFormat,
    #[error("no active code for this number")]
    NotFound,
    #[error("code has expired")]
    Expired,
    #[error("incorrect code")]
    Mismatch,
    #[error(transparent)]
    Delivery(#[from] anyhow::Error),
}

impl From<OtpVerifyError> for OtpError {
    fn from(e: OtpVerifyError) -> Self {
        match e {
            OtpVerifyError::NotFound => OtpError::NotFound,
            OtpVerifyError::Expired => OtpError::Expired,
            OtpVerifyError::Mismatch => OtpError::Mismatch,
        }
    }
}

/// Issues a code for the phone number and hands it to the delivery
/// collaborator. The code never appears in the HTTP response.
pub async fn request_code(state: &AppState, phone: &str) -> Result<(), OtpError> {
    if !is_valid_phone(phone) {
        return Err(OtpError::InvalidFormat);
    }

    let ttl = Duration::from_secs(state.config.otp.ttl_seconds);
    // issue() releases the store lock before we touch the delivery channel
    let code = state.otp.issue(phone, ttl).await;
    state.delivery.deliver(phone, &code).await?;

    info!(ttl_seconds = state.config.otp.ttl_seconds, "otp code issued");
    Ok(())
}

/// Checks a candidate code; success consumes it.
pub async fn verify_code(state: &AppState, phone: &str, candidate: &str) -> Result<(), OtpError> {
    state.otp.verify(phone, candidate).await?;
    info!("otp code verified");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;

    #[tokio::test]
    async fn request_rejects_bad_phone() {
        let state = AppState::fake();
        assert!(matches!(
            request_code(&state, "12345").await,
            Err(OtpError::InvalidFormat)
        ));
    }

    #[tokio::test]
    async fn request_then_verify_roundtrip() {
        let delivery = std::sync::Arc::new(crate::otp::delivery::CaptureDelivery::default());
        let state = AppState::fake_with_delivery(delivery.clone());

        request_code(&state, "771234567").await.expect("request");
        let code = delivery.last_code_for("771234567").await.expect("delivered");
        verify_code(&state, "771234567", &code).await.expect("verify");
        // single use
        assert!(matches!(
            verify_code(&state, "771234567", &code).await,
            Err(OtpError::NotFound)
        ));
    }

    #[tokio::test]
    async fn verify_translates_store_errors() {
        let state = AppState::fake();
        assert!(matches!(
            verify_code(&state, "771234567", "000000").await,
            Err(OtpError::NotFound)
        ));
    }
}
