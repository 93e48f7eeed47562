use serde::Deserialize;

/// Request body for OTP issuance.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateOtpRequest {
    pub phone_number: String,
}

/// Request body for OTP verification.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    pub phone_number: String,
    pub otp_code: String,
}
