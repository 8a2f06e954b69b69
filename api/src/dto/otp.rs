use sd_core::domain::entities::otp_record::ContactChannel;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendOtpRequest {
    /// Email address or 10-digit phone number to verify
    #[validate(length(min = 1, max = 255))]
    pub identifier: String,

    /// Delivery channel: "email" or "phone"
    #[serde(rename = "type")]
    pub channel: ContactChannel,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyOtpRequest {
    /// Email address or 10-digit phone number the code was sent to
    #[validate(length(min = 1, max = 255))]
    pub identifier: String,

    /// Delivery channel: "email" or "phone"
    #[serde(rename = "type")]
    pub channel: ContactChannel,

    /// 6-digit verification code
    #[validate(length(equal = 6))]
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOtpResponse {
    pub success: bool,
    /// Attempt ceiling for the fresh code (fixed at issuance)
    pub attempts_remaining: i32,
    /// Resends left for this identifier/channel chain
    pub resend_remaining: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyOtpResponse {
    pub success: bool,
}
