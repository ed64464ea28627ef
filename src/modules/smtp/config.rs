// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::modules::error::code::ErrorCode;
use crate::modules::error::BulkMailerResult;
use crate::raise_error;

#[derive(Clone, Copy, Default, Debug, Eq, PartialEq, Serialize, Deserialize, ValueEnum)]
pub enum Encryption {
    /// SSL/TLS encrypted connection
    #[default]
    Ssl,
    /// StartTLS encryption
    StartTls,
    /// Unencrypted connection
    None,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub encryption: Encryption,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout_secs: u64,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 465,
            encryption: Encryption::Ssl,
            username: None,
            password: None,
            timeout_secs: 30,
        }
    }
}

impl SmtpConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Default::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Returns the login pair, or `None` when the session should stay anonymous.
    ///
    /// Empty strings count as absent. Supplying only one half of the pair is an error.
    pub fn credentials(&self) -> BulkMailerResult<Option<(String, String)>> {
        let username = self.username.as_deref().filter(|u| !u.is_empty());
        let password = self.password.as_deref().filter(|p| !p.is_empty());
        match (username, password) {
            (Some(username), Some(password)) => {
                Ok(Some((username.to_string(), password.to_string())))
            }
            (None, None) => Ok(None),
            (Some(_), None) => Err(raise_error!(
                "User provided but password missing".into(),
                ErrorCode::IncompleteLogin
            )),
            (None, Some(_)) => Err(raise_error!(
                "Password provided but user missing".into(),
                ErrorCode::IncompleteLogin
            )),
        }
    }

    pub fn validate(&self) -> BulkMailerResult<()> {
        if self.host.trim().is_empty() {
            return Err(raise_error!(
                "SMTP host is not configured".into(),
                ErrorCode::MissingConfiguration
            ));
        }
        self.credentials().map(|_| ())
    }
}

#[derive(Clone, Debug)]
pub struct MailerOptions {
    /// Ask for confirmation before every send unless overridden per call.
    pub confirm_send: bool,
    /// Minimum time between two consecutive sends.
    pub delay: Duration,
    pub detailed_log: bool,
}

impl Default for MailerOptions {
    fn default() -> Self {
        Self {
            confirm_send: false,
            delay: Duration::ZERO,
            detailed_log: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_apply_to_missing_fields() {
        let config: SmtpConfig =
            serde_json::from_str(r#"{"host": "smtp.example.com"}"#).unwrap();
        assert_eq!(config.host, "smtp.example.com");
        assert_eq!(config.port, 465);
        assert_eq!(config.encryption, Encryption::Ssl);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.credentials().unwrap().is_none());

        let config: SmtpConfig = serde_json::from_str(
            r#"{"host": "localhost", "port": 587, "encryption": "StartTls",
                "username": "bob", "password": "secret"}"#,
        )
        .unwrap();
        assert_eq!(config.encryption, Encryption::StartTls);
        assert_eq!(
            config.credentials().unwrap(),
            Some(("bob".to_string(), "secret".to_string()))
        );
    }

    #[test]
    fn half_a_login_is_rejected() {
        let mut config = SmtpConfig::new("localhost");
        config.username = Some("bob".into());
        let error = config.credentials().unwrap_err();
        assert_eq!(error.code(), ErrorCode::IncompleteLogin);
        assert_eq!(error.to_string(), "User provided but password missing");

        config.username = Some(String::new());
        config.password = Some("secret".into());
        let error = config.validate().unwrap_err();
        assert_eq!(error.code(), ErrorCode::IncompleteLogin);
        assert_eq!(error.to_string(), "Password provided but user missing");

        config.password = Some(String::new());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_host_is_missing_configuration() {
        let error = SmtpConfig::default().validate().unwrap_err();
        assert_eq!(error.code(), ErrorCode::MissingConfiguration);
    }

    #[test]
    fn mailer_options_defaults() {
        let options = MailerOptions::default();
        assert!(!options.confirm_send);
        assert_eq!(options.delay, Duration::ZERO);
        assert!(options.detailed_log);
    }
}
