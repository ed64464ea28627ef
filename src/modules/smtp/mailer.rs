// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::Instant;

use itertools::Itertools;
use tracing::{debug, error, info, warn, Level, Span};

use crate::log_at;
use crate::modules::confirm::{ask_mail_confirmation, Confirm, ConsoleConfirm};
use crate::modules::entities::Emailable;
use crate::modules::error::code::ErrorCode;
use crate::modules::error::{BulkMailerError, BulkMailerResult};
use crate::modules::smtp::config::{MailerOptions, SmtpConfig};
use crate::modules::smtp::envelope::{Envelope, RecipientShape, Single};
use crate::modules::smtp::message::Message;
use crate::modules::smtp::pacer::{remaining_delay, Clock, SystemClock};
use crate::modules::smtp::queue::MailQueue;
use crate::modules::smtp::result::{Delivery, QueueSummary, SendResult};
use crate::modules::smtp::transport::{SmtpReply, SmtpTransport, Transport};
use crate::raise_error;

/// Sends envelopes over one connection on behalf of one sender.
pub struct Mailer<T = SmtpTransport, C = SystemClock> {
    transport: T,
    sender: Emailable,
    options: MailerOptions,
    last_send: Option<Instant>,
    confirmer: Box<dyn Confirm>,
    clock: C,
    span: Span,
}

impl Mailer {
    /// Connects to the SMTP server in `config`.
    ///
    /// Credentials are checked before any connection is attempted.
    pub fn connect(
        config: &SmtpConfig,
        sender: impl Into<Emailable>,
        options: MailerOptions,
    ) -> BulkMailerResult<Self> {
        config.credentials()?;
        let transport = SmtpTransport::connect(config)?;
        Ok(Mailer::with_transport(transport, sender, options))
    }
}

impl<T: Transport> Mailer<T> {
    pub fn with_transport(
        transport: T,
        sender: impl Into<Emailable>,
        options: MailerOptions,
    ) -> Self {
        Self {
            transport,
            sender: sender.into(),
            options,
            last_send: None,
            confirmer: Box::new(ConsoleConfirm::new()),
            clock: SystemClock,
            span: Span::none(),
        }
    }
}

impl<T: Transport, C: Clock> Mailer<T, C> {
    pub fn with_clock<N: Clock>(self, clock: N) -> Mailer<T, N> {
        Mailer {
            transport: self.transport,
            sender: self.sender,
            options: self.options,
            last_send: self.last_send,
            confirmer: self.confirmer,
            clock,
            span: self.span,
        }
    }

    pub fn with_confirmer(mut self, confirmer: Box<dyn Confirm>) -> Self {
        self.confirmer = confirmer;
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn sender(&self) -> &Emailable {
        &self.sender
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Sends `message` to `recipients`.
    ///
    /// `confirm` overrides the mailer's `confirm_send` default for this call.
    /// Declining the confirmation fails with `ErrorCode::SendCancelled`.
    pub fn send_mail<S: RecipientShape>(
        &mut self,
        message: Message,
        recipients: S,
        confirm: Option<bool>,
    ) -> BulkMailerResult<Delivery> {
        let mut envelope = Envelope::new(message, recipients);
        self.deliver(&mut envelope, confirm)
    }

    /// Sends a personal message and returns the refusal reason, if any.
    pub fn send_personal(
        &mut self,
        message: Message,
        to: impl Into<Single>,
    ) -> BulkMailerResult<Option<SmtpReply>> {
        let delivery = self.send_mail(message, to.into(), None)?;
        Ok(delivery.failed.into_iter().next().map(|(_, reply)| reply))
    }

    /// Sends every queued envelope lazily, one per `next`.
    ///
    /// Cancelled envelopes come back as cancelled results; other errors are
    /// yielded as they happen and iteration carries on with the next envelope.
    pub fn send_queue_iter<S: RecipientShape>(
        &mut self,
        queue: MailQueue<S>,
    ) -> SendQueueIter<'_, S, T, C> {
        SendQueueIter {
            mailer: self,
            envelopes: queue.into_iter(),
        }
    }

    pub fn send_queue<S: RecipientShape>(&mut self, queue: MailQueue<S>) -> QueueSummary {
        info!(parent: &self.span, "Sending {} queued e-mails", queue.len());
        let mut summary = QueueSummary::default();
        for envelope in queue {
            let recipients = envelope.all_recipients();
            match self.send_envelope(envelope) {
                Ok(result) if result.is_cancelled() => {
                    recipients
                        .into_iter()
                        .for_each(|person| summary.record_cancelled(person));
                }
                Ok(result) => {
                    for person in result.succeeded() {
                        summary.record_succeeded(person.clone());
                    }
                    for (person, _) in result.failed() {
                        summary.record_failed(person.clone());
                    }
                }
                Err(e) => {
                    error!(parent: &self.span, "Sending e-mail failed: {}", e);
                    recipients
                        .into_iter()
                        .for_each(|person| summary.record_failed(person));
                }
            }
        }

        log_at!(
            summary.level(),
            parent: &self.span,
            "Sending queue finished ({} successful, {} failed, {} cancelled)",
            summary.succeeded.len(),
            summary.failed.len(),
            summary.cancelled.len()
        );
        if self.options.detailed_log || tracing::enabled!(Level::DEBUG) {
            for person in &summary.succeeded {
                info!(parent: &self.span, "   SUCCEEDED:  {}", person);
            }
            for person in &summary.failed {
                error!(parent: &self.span, "   FAILED:  {}", person);
            }
            for person in &summary.cancelled {
                warn!(parent: &self.span, "   CANCELLED:  {}", person);
            }
        }
        summary
    }

    /// Closes the SMTP session.
    pub fn quit(&mut self) -> BulkMailerResult<()> {
        self.transport.quit()
    }

    fn send_envelope<S: RecipientShape>(
        &mut self,
        mut envelope: Envelope<S>,
    ) -> BulkMailerResult<SendResult<S>> {
        match self.deliver(&mut envelope, None) {
            Ok(delivery) => Ok(SendResult::delivered(envelope, delivery)),
            Err(e) if e.is_cancelled() => Ok(SendResult::cancelled(envelope)),
            Err(e) => Err(e),
        }
    }

    fn deliver<S: RecipientShape>(
        &mut self,
        envelope: &mut Envelope<S>,
        confirm: Option<bool>,
    ) -> BulkMailerResult<Delivery> {
        envelope.message.set_addresses(
            &self.sender,
            envelope.recipients.to(),
            envelope.recipients.cc(),
        );
        let people = envelope.all_recipients();
        // people sharing an address are one RCPT TO
        let addresses: Vec<String> = people
            .iter()
            .map(|person| person.address().to_string())
            .unique()
            .collect();
        let bytes = envelope.message.to_bytes()?;

        if confirm.unwrap_or(self.options.confirm_send)
            && !ask_mail_confirmation(self.confirmer.as_mut(), envelope, "Send", "Cancel")
        {
            info!(parent: &self.span, "Sending e-mail cancelled");
            return Err(raise_error!(
                "Send cancelled".into(),
                ErrorCode::SendCancelled
            ));
        }

        let wait = remaining_delay(self.options.delay, self.last_send, self.clock.now());
        if !wait.is_zero() {
            debug!(parent: &self.span, "Waiting {:?} before sending", wait);
            self.clock.sleep(wait);
        }
        self.last_send = Some(self.clock.now());

        let refused = match self
            .transport
            .send(&bytes, self.sender.address(), &addresses)
        {
            Ok(refused) => refused,
            Err(BulkMailerError::RecipientsRefused { refused, .. }) => refused,
            Err(e) => return Err(e),
        };

        let mut delivery = Delivery::default();
        for person in people {
            match refused.get(person.address()) {
                Some(reply) => delivery.failed.push((person, reply.clone())),
                None => delivery.succeeded.push(person),
            }
        }
        self.log_delivery(&delivery);
        Ok(delivery)
    }

    fn log_delivery(&self, delivery: &Delivery) {
        let total = delivery.succeeded.len() + delivery.failed.len();
        let summary = if delivery.succeeded.is_empty() {
            "E-mail sent: rejected for every recipient".to_string()
        } else if delivery.failed.is_empty() {
            "E-mail sent: accepted for every recipient".to_string()
        } else {
            format!(
                "E-mail sent: accepted by {} of {} recipients",
                delivery.succeeded.len(),
                total
            )
        };
        log_at!(delivery.level(), parent: &self.span, "{}", summary);

        if self.options.detailed_log || tracing::enabled!(Level::DEBUG) {
            for person in &delivery.succeeded {
                info!(parent: &self.span, "   ACCEPTED:  {}", person);
            }
            for (person, reply) in &delivery.failed {
                error!(parent: &self.span, "   REJECTED:  {} {}", person, reply);
            }
        }
    }
}

/// Iterator returned by [`Mailer::send_queue_iter`].
pub struct SendQueueIter<'a, S, T, C> {
    mailer: &'a mut Mailer<T, C>,
    envelopes: std::vec::IntoIter<Envelope<S>>,
}

impl<S: RecipientShape, T: Transport, C: Clock> Iterator for SendQueueIter<'_, S, T, C> {
    type Item = BulkMailerResult<SendResult<S>>;

    fn next(&mut self) -> Option<Self::Item> {
        let envelope = self.envelopes.next()?;
        Some(self.mailer.send_envelope(envelope))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.envelopes.size_hint()
    }
}
