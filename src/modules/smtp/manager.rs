// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::error::code::ErrorCode;
use crate::modules::error::BulkMailerResult;
use crate::modules::smtp::client::SmtpSession;
use crate::modules::smtp::config::{Encryption, SmtpConfig};
use crate::raise_error;
use mail_send::smtp::tls::build_tls_connector;
use mail_send::smtp::AssertReply;
use mail_send::{Credentials, SmtpClient};
use std::time::Duration;
use tokio::net::TcpStream;
use tracing::debug;

pub const EXT_START_TLS: u32 = 1 << 24;

pub struct SmtpClientManager<'a> {
    config: &'a SmtpConfig,
}

impl<'a> SmtpClientManager<'a> {
    pub fn new(config: &'a SmtpConfig) -> Self {
        Self { config }
    }

    /// Opens the TCP connection and brings the session up to an authenticated
    /// (or anonymous) state ready for `MAIL FROM`.
    pub async fn build(&self) -> BulkMailerResult<SmtpSession> {
        let credentials = self
            .config
            .credentials()?
            .map(|(username, password)| Credentials::new(username, password));
        let timeout = self.config.timeout();
        let address = format!("{}:{}", self.config.host, self.config.port);

        debug!(
            "connecting to {} ({:?})",
            address, self.config.encryption
        );
        let tcp_stream = tokio::time::timeout(timeout, TcpStream::connect(&address))
            .await
            .map_err(|_| {
                raise_error!(
                    format!("Timed out connecting to {}", address),
                    ErrorCode::ConnectionTimeout
                )
            })?
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::SmtpConnectionFailed))?;

        Self::connect(
            self.config.encryption,
            &self.config.host,
            timeout,
            tcp_stream,
            credentials,
        )
        .await
        .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::SmtpConnectionFailed))
    }

    async fn connect(
        encryption: Encryption,
        host: &str,
        timeout: Duration,
        tcp_stream: TcpStream,
        credentials: Option<Credentials<String>>,
    ) -> Result<SmtpSession, mail_send::Error> {
        tokio::time::timeout(timeout, async {
            let mut client = SmtpClient {
                stream: tcp_stream,
                timeout,
            };

            let local_host = gethostname::gethostname()
                .to_str()
                .unwrap_or("[127.0.0.1]")
                .to_string();
            let tls_connector = build_tls_connector(false);
            match encryption {
                Encryption::Ssl => {
                    let mut client = client.into_tls(&tls_connector, host).await?;
                    client.read().await?.assert_positive_completion()?;
                    let capabilities = client.capabilities(&local_host, false).await?;
                    if let Some(credentials) = &credentials {
                        client.authenticate(credentials, &capabilities).await?;
                    }
                    Ok(SmtpSession::Tls(client))
                }
                Encryption::StartTls => {
                    client.read().await?.assert_positive_completion()?;
                    let response = client.ehlo(&local_host).await?;
                    if !response.has_capability(EXT_START_TLS) {
                        return Err(mail_send::Error::MissingStartTls);
                    }
                    let mut client = client.start_tls(&tls_connector, host).await?;
                    let capabilities = client.capabilities(&local_host, false).await?;
                    if let Some(credentials) = &credentials {
                        client.authenticate(credentials, &capabilities).await?;
                    }
                    Ok(SmtpSession::Tls(client))
                }
                Encryption::None => {
                    client.read().await?.assert_positive_completion()?;
                    let capabilities = client.capabilities(&local_host, false).await?;
                    if let Some(credentials) = &credentials {
                        client.authenticate(credentials, &capabilities).await?;
                    }
                    Ok(SmtpSession::Plain(client))
                }
            }
        })
        .await
        .map_err(|_| mail_send::Error::Timeout)?
    }
}
