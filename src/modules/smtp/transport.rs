// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashMap;
use std::fmt;

use tokio::runtime::Runtime;
use tracing::{debug, warn};

use crate::modules::error::code::ErrorCode;
use crate::modules::error::BulkMailerResult;
use crate::modules::smtp::client::{self, Sender, SmtpSession};
use crate::modules::smtp::config::SmtpConfig;
use crate::modules::smtp::manager::SmtpClientManager;
use crate::raise_error;

/// A server reply explaining why a recipient was refused.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SmtpReply {
    pub code: u16,
    pub message: String,
}

impl SmtpReply {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for SmtpReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(code {}): {}", self.code, self.message)
    }
}

/// Refused wire addresses and the reply the server gave for each.
pub type RefusedRecipients = HashMap<String, SmtpReply>;

/// A connected mail submission channel.
pub trait Transport {
    /// Submits `message` for `recipients` with `from` as the envelope sender.
    ///
    /// Returns the refused subset. When every recipient is refused the error is
    /// `BulkMailerError::RecipientsRefused` and nothing was sent.
    fn send(
        &mut self,
        message: &[u8],
        from: &str,
        recipients: &[String],
    ) -> BulkMailerResult<RefusedRecipients>;

    /// Ends the session. Calling it again is a no-op.
    fn quit(&mut self) -> BulkMailerResult<()>;
}

/// Blocking SMTP transport over `mail-send`.
pub struct SmtpTransport {
    runtime: Runtime,
    session: Option<SmtpSession>,
}

impl SmtpTransport {
    pub fn connect(config: &SmtpConfig) -> BulkMailerResult<Self> {
        config.validate()?;
        // Already installed by an earlier connection in this process.
        let _ = rustls::crypto::CryptoProvider::install_default(
            rustls::crypto::ring::default_provider(),
        );
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::InternalError))?;
        let session = runtime.block_on(SmtpClientManager::new(config).build())?;
        debug!("connected to {}:{}", config.host, config.port);
        Ok(Self {
            runtime,
            session: Some(session),
        })
    }
}

impl Transport for SmtpTransport {
    fn send(
        &mut self,
        message: &[u8],
        from: &str,
        recipients: &[String],
    ) -> BulkMailerResult<RefusedRecipients> {
        let session = self.session.as_mut().ok_or_else(|| {
            raise_error!(
                "SMTP session already closed".into(),
                ErrorCode::SmtpConnectionFailed
            )
        })?;
        self.runtime
            .block_on(client::deliver(session, message, from, recipients))
    }

    fn quit(&mut self) -> BulkMailerResult<()> {
        match self.session.take() {
            Some(session) => self.runtime.block_on(session.quit()),
            None => Ok(()),
        }
    }
}

impl Drop for SmtpTransport {
    fn drop(&mut self) {
        if let Err(error) = self.quit() {
            warn!("failed to close SMTP session: {}", error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_display() {
        let reply = SmtpReply::new(550, "5.1.1 no such user");
        assert_eq!(reply.to_string(), "(code 550): 5.1.1 no such user");
    }

    #[test]
    fn connect_validates_before_dialing() {
        let mut config = SmtpConfig::new("127.0.0.1");
        config.port = 1;
        config.password = Some("secret".into());
        let error = SmtpTransport::connect(&config).err().unwrap();
        assert_eq!(error.code(), ErrorCode::IncompleteLogin);
    }
}
