// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt::Display;

use tracing::{info, warn, Level, Span};

use crate::log_at;
use crate::modules::confirm::{ask_mail_confirmation, Confirm, ConsoleConfirm};
use crate::modules::entities::Emailable;
use crate::modules::error::BulkMailerResult;
use crate::modules::smtp::envelope::{Envelope, RecipientShape, Single};
use crate::modules::smtp::message::Message;

/// Envelopes waiting to be sent, in insertion order.
pub struct MailQueue<S> {
    items: Vec<Envelope<S>>,
    confirm_on_add: bool,
    confirmer: Box<dyn Confirm>,
    detailed_log: bool,
    span: Span,
}

/// Which recipients of an `add_for` call ended up in the queue.
#[derive(Clone, Debug)]
pub struct AddReport<R> {
    pub accepted: Vec<R>,
    pub cancelled: Vec<R>,
}

impl<R> AddReport<R> {
    pub fn level(&self) -> Level {
        if self.accepted.is_empty() {
            Level::ERROR
        } else if !self.cancelled.is_empty() {
            Level::WARN
        } else {
            Level::INFO
        }
    }
}

impl<S: RecipientShape> MailQueue<S> {
    pub fn new(confirm_on_add: bool) -> Self {
        Self {
            items: Vec::new(),
            confirm_on_add,
            confirmer: Box::new(ConsoleConfirm::new()),
            detailed_log: true,
            span: Span::none(),
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

    pub fn with_detailed_log(mut self, detailed_log: bool) -> Self {
        self.detailed_log = detailed_log;
        self
    }

    /// Queues `message` for `recipients`, asking first when confirmation is on.
    ///
    /// Returns whether the envelope was queued.
    pub fn add(&mut self, message: Message, recipients: impl Into<S>) -> bool {
        let envelope = Envelope::new(message, recipients.into());
        if self.confirm_on_add
            && !ask_mail_confirmation(self.confirmer.as_mut(), &envelope, "Accept", "Reject")
        {
            return false;
        }
        self.items.push(envelope);
        true
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, recipient: &Emailable) -> bool {
        self.items
            .iter()
            .any(|envelope| envelope.all_recipients().contains(recipient))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Envelope<S>> {
        self.items.iter()
    }
}

impl MailQueue<Single> {
    /// Builds and queues one personal message per recipient, in order.
    ///
    /// A failing `build` aborts and returns its error; envelopes already
    /// queued stay queued.
    pub fn add_for<R, F>(&mut self, recipients: &[R], mut build: F) -> BulkMailerResult<AddReport<R>>
    where
        R: AsRef<Emailable> + Clone + Display,
        F: FnMut(&R) -> BulkMailerResult<Message>,
    {
        info!(parent: &self.span, "Adding {} e-mails to queue", recipients.len());
        let mut report = AddReport {
            accepted: Vec::new(),
            cancelled: Vec::new(),
        };
        for recipient in recipients {
            let message = build(recipient)?;
            if self.add(message, Single(recipient.as_ref().clone())) {
                report.accepted.push(recipient.clone());
            } else {
                report.cancelled.push(recipient.clone());
            }
        }

        let total = recipients.len();
        let accepted = report.accepted.len();
        let summary = if accepted == total {
            "All e-mails have been added to the queue".to_string()
        } else if accepted == 0 {
            "No e-mails have been added to the queue".to_string()
        } else {
            format!("{} of {} e-mails have been added to queue", accepted, total)
        };
        log_at!(report.level(), parent: &self.span, "{}", summary);

        if self.detailed_log || tracing::enabled!(Level::DEBUG) {
            for recipient in &report.accepted {
                info!(parent: &self.span, "   ACCEPTED:  {}", recipient);
            }
            for recipient in &report.cancelled {
                warn!(parent: &self.span, "   CANCELLED:  {}", recipient);
            }
        }
        Ok(report)
    }
}

impl<S> IntoIterator for MailQueue<S> {
    type Item = Envelope<S>;
    type IntoIter = std::vec::IntoIter<Envelope<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, S> IntoIterator for &'a MailQueue<S> {
    type Item = &'a Envelope<S>;
    type IntoIter = std::slice::Iter<'a, Envelope<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
