//! SMS delivery through the Twilio REST API.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use swc_telemetry::Metrics;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::error::{MessagingError, MessagingResult};
use crate::validation::is_e164;

pub const DEFAULT_TWILIO_API_BASE: &str = "https://api.twilio.com";
pub const SMS_STATUS_CALLBACK_PATH: &str = "/api/public/sms/events/status";

/// A message to send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendSmsPayload {
    pub to: String,
    pub body: String,
}

impl SendSmsPayload {
    pub fn new(to: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            body: body.into(),
        }
    }

    /// Check the payload before it reaches the provider.
    pub fn validate(&self) -> MessagingResult<()> {
        if self.body.trim().is_empty() {
            return Err(MessagingError::InvalidPayload("body is empty".to_string()));
        }
        if self.to.trim().is_empty() {
            return Err(MessagingError::InvalidPayload("to is empty".to_string()));
        }
        if !is_e164(self.to.trim()) {
            return Err(MessagingError::InvalidPayload(format!(
                "to is not an E.164 phone number: {}",
                self.to
            )));
        }
        Ok(())
    }
}

/// Provider acknowledgement for an accepted message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentMessage {
    pub sid: String,
    pub status: String,
}

/// Anything that can deliver an SMS.
#[async_trait]
pub trait SmsClient: Send + Sync {
    async fn send_sms(&self, payload: &SendSmsPayload) -> MessagingResult<SentMessage>;
}

/// Credentials and addresses for the Twilio account.
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
    /// Public base URL of this deployment, used for the status callback.
    pub base_url: String,
    pub api_base: String,
}

impl TwilioConfig {
    pub fn from_env() -> MessagingResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> MessagingResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| MessagingError::MissingEnvVar(name.to_string()))
        };

        Ok(Self {
            account_sid: required("TWILIO_ACCOUNT_SID")?,
            auth_token: required("TWILIO_AUTH_TOKEN")?,
            from_number: required("TWILIO_PHONE_NUMBER")?,
            base_url: required("NEXT_PUBLIC_BASE_URL")?,
            api_base: lookup("TWILIO_API_BASE").unwrap_or_else(|| DEFAULT_TWILIO_API_BASE.to_string()),
        })
    }

    pub fn status_callback_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), SMS_STATUS_CALLBACK_PATH)
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.api_base.trim_end_matches('/'),
            self.account_sid
        )
    }
}

#[derive(Debug, Error)]
#[error("provider returned {status}: {message}")]
struct ProviderError {
    status: u16,
    message: String,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: Option<String>,
}

/// Twilio-backed [`SmsClient`].
pub struct TwilioSmsClient {
    client: Client,
    config: TwilioConfig,
    metrics: Metrics,
}

impl TwilioSmsClient {
    /// Create a new SMS client.
    ///
    /// # Arguments
    /// * `config` - Account credentials and callback base URL
    /// * `metrics` - Metrics collector
    pub fn new(config: TwilioConfig, metrics: Metrics) -> Self {
        info!("Initialized SMS client for account {}", config.account_sid);
        Self {
            client: Client::new(),
            config,
            metrics,
        }
    }

    async fn post_message(&self, payload: &SendSmsPayload) -> Result<SentMessage, Box<dyn std::error::Error + Send + Sync>> {
        let status_callback = self.config.status_callback_url();
        let form = [
            ("To", payload.to.trim()),
            ("From", self.config.from_number.as_str()),
            ("Body", payload.body.as_str()),
            ("StatusCallback", status_callback.as_str()),
        ];

        let response = self
            .client
            .post(self.config.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ProviderErrorBody>(&text)
                .ok()
                .and_then(|body| body.message)
                .unwrap_or(text);
            return Err(Box::new(ProviderError {
                status: status.as_u16(),
                message,
            }));
        }

        Ok(response.json::<SentMessage>().await?)
    }
}

#[async_trait]
impl SmsClient for TwilioSmsClient {
    async fn send_sms(&self, payload: &SendSmsPayload) -> MessagingResult<SentMessage> {
        payload.validate()?;

        let start = Instant::now();
        let result = self.post_message(payload).await;
        self.metrics
            .observe_request_latency("twilio_send_sms", start.elapsed().as_secs_f64());

        match result {
            Ok(message) => {
                self.metrics.inc_sms_sent();
                debug!(sid = %message.sid, status = %message.status, "SMS accepted");
                Ok(message)
            }
            Err(source) => {
                self.metrics.inc_sms_failed();
                warn!(to = %payload.to, error = %source, "SMS send failed");
                Err(MessagingError::SendSms {
                    to: payload.to.clone(),
                    source,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_payload_validation() {
        assert!(SendSmsPayload::new("+12025550100", "hi").validate().is_ok());
        assert!(matches!(
            SendSmsPayload::new("+12025550100", "  ").validate(),
            Err(MessagingError::InvalidPayload(_))
        ));
        assert!(matches!(
            SendSmsPayload::new("2025550100", "hi").validate(),
            Err(MessagingError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_config_from_lookup() {
        let config = TwilioConfig::from_lookup(lookup_from(&[
            ("TWILIO_ACCOUNT_SID", "AC123"),
            ("TWILIO_AUTH_TOKEN", "secret"),
            ("TWILIO_PHONE_NUMBER", "+15550001111"),
            ("NEXT_PUBLIC_BASE_URL", "https://www.standwithcrypto.org/"),
        ]))
        .unwrap();

        assert_eq!(
            config.status_callback_url(),
            "https://www.standwithcrypto.org/api/public/sms/events/status"
        );
        assert_eq!(
            config.messages_url(),
            "https://api.twilio.com/2010-04-01/Accounts/AC123/Messages.json"
        );
    }

    #[test]
    fn test_config_reports_missing_variable() {
        let err = TwilioConfig::from_lookup(lookup_from(&[("TWILIO_ACCOUNT_SID", "AC123")])).unwrap_err();
        assert!(matches!(err, MessagingError::MissingEnvVar(name) if name == "TWILIO_AUTH_TOKEN"));
    }
}
