// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::error::code::ErrorCode;
use crate::modules::error::{BulkMailerResult, RecipientsRefusedSnafu};
use crate::modules::smtp::transport::{RefusedRecipients, SmtpReply};
use crate::raise_error;
use mail_send::smtp::message::Parameters;
use mail_send::SmtpClient;
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;

pub enum SmtpSession {
    Plain(SmtpClient<TcpStream>),
    Tls(SmtpClient<TlsStream<TcpStream>>),
}

/// Outcome of a single `RCPT TO`.
pub(crate) enum RcptOutcome {
    Accepted,
    Refused(SmtpReply),
}

pub(crate) trait Sender {
    async fn mail_from(&mut self, from: &str) -> BulkMailerResult<()>;
    async fn rcpt_to(&mut self, address: &str) -> BulkMailerResult<RcptOutcome>;
    async fn data(&mut self, message: &[u8]) -> BulkMailerResult<()>;
    async fn reset(&mut self) -> BulkMailerResult<()>;
    async fn quit(self) -> BulkMailerResult<()>;
}

fn refusal(error: mail_send::Error) -> BulkMailerResult<RcptOutcome> {
    match error {
        mail_send::Error::UnexpectedReply(response) => Ok(RcptOutcome::Refused(SmtpReply::new(
            response.code,
            response.message,
        ))),
        other => Err(raise_error!(
            format!("{:#?}", other),
            ErrorCode::SmtpCommandFailed
        )),
    }
}

impl Sender for SmtpSession {
    async fn mail_from(&mut self, from: &str) -> BulkMailerResult<()> {
        let params = Parameters::default();
        match self {
            SmtpSession::Plain(smtp_client) => smtp_client
                .mail_from(from, &params)
                .await
                .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::SmtpCommandFailed)),
            SmtpSession::Tls(smtp_client) => smtp_client
                .mail_from(from, &params)
                .await
                .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::SmtpCommandFailed)),
        }
    }

    async fn rcpt_to(&mut self, address: &str) -> BulkMailerResult<RcptOutcome> {
        let params = Parameters::default();
        let result = match self {
            SmtpSession::Plain(smtp_client) => smtp_client.rcpt_to(address, &params).await,
            SmtpSession::Tls(smtp_client) => smtp_client.rcpt_to(address, &params).await,
        };
        match result {
            Ok(()) => Ok(RcptOutcome::Accepted),
            Err(e) => refusal(e),
        }
    }

    async fn data(&mut self, message: &[u8]) -> BulkMailerResult<()> {
        match self {
            SmtpSession::Plain(smtp_client) => smtp_client
                .data(message)
                .await
                .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::SmtpCommandFailed)),
            SmtpSession::Tls(smtp_client) => smtp_client
                .data(message)
                .await
                .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::SmtpCommandFailed)),
        }
    }

    async fn reset(&mut self) -> BulkMailerResult<()> {
        match self {
            SmtpSession::Plain(smtp_client) => smtp_client
                .rset()
                .await
                .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::SmtpCommandFailed)),
            SmtpSession::Tls(smtp_client) => smtp_client
                .rset()
                .await
                .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::SmtpCommandFailed)),
        }
    }

    async fn quit(self) -> BulkMailerResult<()> {
        match self {
            SmtpSession::Plain(smtp_client) => smtp_client
                .quit()
                .await
                .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::SmtpCommandFailed)),
            SmtpSession::Tls(smtp_client) => smtp_client
                .quit()
                .await
                .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::SmtpCommandFailed)),
        }
    }
}

/// Runs one mail transaction: `MAIL FROM`, one `RCPT TO` per address, then `DATA`.
///
/// Refused recipients are collected and returned. When every recipient is
/// refused, or there was nobody to begin with, the transaction is reset and a
/// `RecipientsRefused` error is returned instead.
pub(crate) async fn deliver<S: Sender>(
    session: &mut S,
    message: &[u8],
    from: &str,
    recipients: &[String],
) -> BulkMailerResult<RefusedRecipients> {
    session.mail_from(from).await?;

    let mut refused = RefusedRecipients::new();
    for address in recipients {
        if let RcptOutcome::Refused(reply) = session.rcpt_to(address).await? {
            refused.insert(address.clone(), reply);
        }
    }

    if refused.len() == recipients.len() {
        session.reset().await?;
        return Err(RecipientsRefusedSnafu { refused }.build());
    }

    session.data(message).await?;
    Ok(refused)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct ScriptedSession {
        refusals: HashMap<String, SmtpReply>,
        commands: Vec<String>,
    }

    impl Sender for ScriptedSession {
        async fn mail_from(&mut self, from: &str) -> BulkMailerResult<()> {
            self.commands.push(format!("MAIL FROM:<{}>", from));
            Ok(())
        }

        async fn rcpt_to(&mut self, address: &str) -> BulkMailerResult<RcptOutcome> {
            self.commands.push(format!("RCPT TO:<{}>", address));
            Ok(match self.refusals.get(address) {
                Some(reply) => RcptOutcome::Refused(reply.clone()),
                None => RcptOutcome::Accepted,
            })
        }

        async fn data(&mut self, _message: &[u8]) -> BulkMailerResult<()> {
            self.commands.push("DATA".into());
            Ok(())
        }

        async fn reset(&mut self) -> BulkMailerResult<()> {
            self.commands.push("RSET".into());
            Ok(())
        }

        async fn quit(self) -> BulkMailerResult<()> {
            Ok(())
        }
    }

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
    }

    #[test]
    fn partial_refusal_still_sends_data() {
        let mut session = ScriptedSession::default();
        session
            .refusals
            .insert("b@example.com".into(), SmtpReply::new(550, "no such user"));
        let recipients = vec!["a@example.com".to_string(), "b@example.com".to_string()];

        let refused = runtime()
            .block_on(deliver(&mut session, b"body", "me@example.com", &recipients))
            .unwrap();

        assert_eq!(refused.len(), 1);
        assert_eq!(refused["b@example.com"].code, 550);
        assert_eq!(
            session.commands,
            vec![
                "MAIL FROM:<me@example.com>",
                "RCPT TO:<a@example.com>",
                "RCPT TO:<b@example.com>",
                "DATA",
            ]
        );
    }

    #[test]
    fn refusing_everyone_resets_instead_of_sending() {
        let mut session = ScriptedSession::default();
        session
            .refusals
            .insert("a@example.com".into(), SmtpReply::new(553, "mailbox name invalid"));
        let recipients = vec!["a@example.com".to_string()];

        let error = runtime()
            .block_on(deliver(&mut session, b"body", "me@example.com", &recipients))
            .unwrap_err();

        match error {
            crate::modules::error::BulkMailerError::RecipientsRefused { refused, .. } => {
                assert_eq!(refused["a@example.com"].code, 553);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(session.commands.last().map(String::as_str), Some("RSET"));
        assert!(!session.commands.iter().any(|c| c == "DATA"));
    }

    #[test]
    fn no_recipients_is_refused_like_everyone_refused() {
        let mut session = ScriptedSession::default();

        let error = runtime()
            .block_on(deliver(&mut session, b"body", "me@example.com", &[]))
            .unwrap_err();

        match error {
            crate::modules::error::BulkMailerError::RecipientsRefused { refused, .. } => {
                assert!(refused.is_empty());
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(session.commands, vec!["MAIL FROM:<me@example.com>", "RSET"]);
    }

    /// Blocking transport running the real transaction against a scripted server.
    struct ScriptedTransport {
        runtime: tokio::runtime::Runtime,
        session: ScriptedSession,
    }

    impl crate::modules::smtp::transport::Transport for ScriptedTransport {
        fn send(
            &mut self,
            message: &[u8],
            from: &str,
            recipients: &[String],
        ) -> BulkMailerResult<RefusedRecipients> {
            self.runtime
                .block_on(deliver(&mut self.session, message, from, recipients))
        }

        fn quit(&mut self) -> BulkMailerResult<()> {
            Ok(())
        }
    }

    #[test]
    fn mailer_reports_empty_envelope_as_failed_delivery() {
        use crate::modules::entities::Emailable;
        use crate::modules::smtp::config::MailerOptions;
        use crate::modules::smtp::envelope::Multi;
        use crate::modules::smtp::mailer::Mailer;
        use crate::modules::smtp::message::Message;

        let transport = ScriptedTransport {
            runtime: runtime(),
            session: ScriptedSession::default(),
        };
        let mut mailer = Mailer::with_transport(
            transport,
            Emailable::new("me@example.com", "Me"),
            MailerOptions::default(),
        );

        let delivery = mailer
            .send_mail(
                Message::plain("Nobody", "Body"),
                Multi::new(Vec::<Emailable>::new()),
                None,
            )
            .unwrap();

        assert!(delivery.succeeded.is_empty() && delivery.failed.is_empty());
        assert_eq!(delivery.level(), tracing::Level::ERROR);
        assert_eq!(
            mailer.transport().session.commands,
            vec!["MAIL FROM:<me@example.com>", "RSET"]
        );
    }
}
