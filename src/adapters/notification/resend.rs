//! Resend e-mail adapter.
//!
//! Renders plain-text messages and posts them to the Resend `/emails`
//! endpoint. Language-specific templates are not supported yet; every
//! message is rendered in English.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::domain::foundation::{DomainError, ErrorCode, Money, Timestamp};
use crate::ports::NotificationSender;

const DEFAULT_API_BASE_URL: &str = "https://api.resend.com";

/// Connection settings for the Resend API.
#[derive(Clone)]
pub struct ResendConfig {
    api_key: SecretString,
    from_header: String,
    api_base_url: String,
}

impl ResendConfig {
    pub fn new(api_key: impl Into<String>, from_header: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            from_header: from_header.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

#[derive(Debug, Serialize)]
struct EmailPayload<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: String,
    text: String,
}

pub struct ResendNotificationSender {
    config: ResendConfig,
    http_client: reqwest::Client,
}

impl ResendNotificationSender {
    pub fn new(config: ResendConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    async fn send(&self, to: &str, subject: String, text: String) -> Result<(), DomainError> {
        let url = format!("{}/emails", self.config.api_base_url);
        let payload = EmailPayload {
            from: &self.config.from_header,
            to: [to],
            subject,
            text,
        };

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::NotificationFailed,
                    format!("E-mail request failed: {}", e),
                )
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, error = %error_text, "Resend send failed");
            return Err(DomainError::new(
                ErrorCode::NotificationFailed,
                format!("E-mail provider returned {}", status),
            ));
        }

        tracing::debug!(to = %to, subject = %payload.subject, "E-mail sent");
        Ok(())
    }
}

#[async_trait]
impl NotificationSender for ResendNotificationSender {
    async fn send_welcome(&self, to: &str, first_name: &str) -> Result<(), DomainError> {
        self.send(
            to,
            "Welcome to the club".to_string(),
            welcome_text(first_name),
        )
        .await
    }

    async fn send_payment_confirmation(
        &self,
        to: &str,
        first_name: &str,
        amount: &Money,
        transaction_id: &str,
    ) -> Result<(), DomainError> {
        self.send(
            to,
            "Payment received".to_string(),
            payment_text(first_name, amount, transaction_id),
        )
        .await
    }

    async fn send_workout_reminder(
        &self,
        to: &str,
        first_name: &str,
        session_time: &Timestamp,
    ) -> Result<(), DomainError> {
        self.send(
            to,
            "Upcoming workout".to_string(),
            reminder_text(first_name, session_time),
        )
        .await
    }
}

fn welcome_text(first_name: &str) -> String {
    format!(
        "Hi {},\n\nYour membership account is ready. See you at the gym!",
        first_name
    )
}

fn payment_text(first_name: &str, amount: &Money, transaction_id: &str) -> String {
    format!(
        "Hi {},\n\nWe received your payment of {}.\nTransaction: {}",
        first_name, amount, transaction_id
    )
}

fn reminder_text(first_name: &str, session_time: &Timestamp) -> String {
    format!(
        "Hi {},\n\nThis is a reminder of your workout on {} UTC.",
        first_name,
        session_time.as_datetime().format("%Y-%m-%d %H:%M")
    )
}
