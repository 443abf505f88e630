use serde_json::json;

use crate::error::Result;

/// Delivers one-time codes through the configured SMS gateway. Without a
/// gateway URL the code is written to the log, which is how local
/// environments read it.
#[derive(Clone)]
pub struct SmsService {
    client: reqwest::Client,
}

impl SmsService {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub async fn send_otp(&self, phone: &str, code: &str) -> Result<()> {
        let config = crate::config::get_config();
        let Some(gateway_url) = config.sms_gateway_url.as_deref() else {
            tracing::info!(phone = %phone, code = %code, "sms gateway not configured, otp logged");
            return Ok(());
        };

        let response = self
            .client
            .post(gateway_url)
            .json(&json!({
                "to": phone,
                "message": format!("Your verification code is {}. Valid for {} minutes.", code, config.otp_ttl_minutes),
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "sms gateway returned an error");
        }
        Ok(())
    }
}

impl Default for SmsService {
    fn default() -> Self {
        Self::new()
    }
}
