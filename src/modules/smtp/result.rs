// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashSet;

use tracing::Level;

use crate::modules::entities::Emailable;
use crate::modules::smtp::envelope::{Envelope, RecipientShape, Single};
use crate::modules::smtp::transport::SmtpReply;

/// Per-recipient outcome of one accepted transaction.
#[derive(Clone, Debug, Default)]
pub struct Delivery {
    pub succeeded: Vec<Emailable>,
    pub failed: Vec<(Emailable, SmtpReply)>,
}

impl Delivery {
    /// Error when nobody got the mail, warning when some did, info when all did.
    pub fn level(&self) -> Level {
        if self.succeeded.is_empty() {
            Level::ERROR
        } else if !self.failed.is_empty() {
            Level::WARN
        } else {
            Level::INFO
        }
    }
}

/// What happened to one queued envelope.
#[derive(Debug)]
pub struct SendResult<S> {
    pub envelope: Envelope<S>,
    succeeded: Vec<Emailable>,
    failed: Vec<(Emailable, SmtpReply)>,
    cancelled: bool,
}

impl<S: RecipientShape> SendResult<S> {
    pub fn delivered(envelope: Envelope<S>, delivery: Delivery) -> Self {
        debug_assert!(
            {
                let everyone = envelope.all_recipients();
                let expected: HashSet<&Emailable> = everyone.iter().collect();
                let reported: Vec<&Emailable> = delivery
                    .succeeded
                    .iter()
                    .chain(delivery.failed.iter().map(|(person, _)| person))
                    .collect();
                let distinct: HashSet<&Emailable> = reported.iter().copied().collect();
                distinct.len() == reported.len() && distinct == expected
            },
            "delivery must account for every recipient exactly once"
        );
        Self {
            envelope,
            succeeded: delivery.succeeded,
            failed: delivery.failed,
            cancelled: false,
        }
    }

    pub fn cancelled(envelope: Envelope<S>) -> Self {
        Self {
            envelope,
            succeeded: Vec::new(),
            failed: Vec::new(),
            cancelled: true,
        }
    }

    pub fn succeeded(&self) -> &[Emailable] {
        &self.succeeded
    }

    pub fn failed(&self) -> &[(Emailable, SmtpReply)] {
        &self.failed
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

impl SendResult<Single> {
    /// The refusal reason of a personal mail, if it was refused.
    pub fn error(&self) -> Option<&SmtpReply> {
        self.failed.first().map(|(_, reply)| reply)
    }
}

/// Everyone touched by draining a queue, split by outcome.
///
/// Each recipient sits in exactly one list. When one recipient is queued more
/// than once, the worst outcome wins: failed over cancelled over succeeded.
#[derive(Clone, Debug, Default)]
pub struct QueueSummary {
    pub succeeded: Vec<Emailable>,
    pub failed: Vec<Emailable>,
    pub cancelled: Vec<Emailable>,
}

impl QueueSummary {
    pub fn record_succeeded(&mut self, person: Emailable) {
        if self.succeeded.contains(&person)
            || self.failed.contains(&person)
            || self.cancelled.contains(&person)
        {
            return;
        }
        self.succeeded.push(person);
    }

    pub fn record_cancelled(&mut self, person: Emailable) {
        if self.failed.contains(&person) || self.cancelled.contains(&person) {
            return;
        }
        self.succeeded.retain(|p| p != &person);
        self.cancelled.push(person);
    }

    pub fn record_failed(&mut self, person: Emailable) {
        if self.failed.contains(&person) {
            return;
        }
        self.succeeded.retain(|p| p != &person);
        self.cancelled.retain(|p| p != &person);
        self.failed.push(person);
    }

    pub fn level(&self) -> Level {
        if self.succeeded.is_empty() {
            Level::ERROR
        } else if !self.failed.is_empty() || !self.cancelled.is_empty() {
            Level::WARN
        } else {
            Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::smtp::envelope::Multi;
    use crate::modules::smtp::message::Message;

    #[test]
    fn delivery_level() {
        let a = Emailable::new("a@example.com", "A");
        let refused = (a.clone(), SmtpReply::new(550, "nope"));

        let all = Delivery {
            succeeded: vec![a.clone()],
            failed: vec![],
        };
        assert_eq!(all.level(), Level::INFO);

        let some = Delivery {
            succeeded: vec![a.clone()],
            failed: vec![refused.clone()],
        };
        assert_eq!(some.level(), Level::WARN);

        let none = Delivery {
            succeeded: vec![],
            failed: vec![refused],
        };
        assert_eq!(none.level(), Level::ERROR);
    }

    #[test]
    fn cancelled_result_is_empty() {
        let envelope = Envelope::new(
            Message::plain("s", "b"),
            Multi::new(Emailable::new("a@example.com", "A")),
        );
        let result = SendResult::cancelled(envelope);
        assert!(result.is_cancelled());
        assert!(result.succeeded().is_empty());
        assert!(result.failed().is_empty());
    }

    #[test]
    fn personal_error_accessor() {
        let person = Emailable::new("p@example.com", "P");
        let envelope = Envelope::new(Message::plain("s", "b"), Single(person.clone()));
        let result = SendResult::delivered(
            envelope,
            Delivery {
                succeeded: vec![],
                failed: vec![(person, SmtpReply::new(552, "mailbox full"))],
            },
        );
        assert_eq!(result.error().map(|reply| reply.code), Some(552));
    }

    #[test]
    fn queue_summary_level() {
        let a = Emailable::new("a@example.com", "A");
        let b = Emailable::new("b@example.com", "B");
        let mut summary = QueueSummary::default();
        assert_eq!(summary.level(), Level::ERROR);
        summary.record_succeeded(a);
        assert_eq!(summary.level(), Level::INFO);
        summary.record_cancelled(b);
        assert_eq!(summary.level(), Level::WARN);
    }

    #[test]
    fn queue_summary_keeps_each_recipient_once() {
        let a = Emailable::new("a@example.com", "A");
        let b = Emailable::new("b@example.com", "B");
        let mut summary = QueueSummary::default();

        summary.record_succeeded(a.clone());
        summary.record_succeeded(a.clone());
        assert_eq!(summary.succeeded.len(), 1);

        summary.record_cancelled(a.clone());
        assert!(summary.succeeded.is_empty());
        assert_eq!(summary.cancelled.len(), 1);
        summary.record_succeeded(a.clone());
        assert!(summary.succeeded.is_empty());

        summary.record_failed(a.clone());
        summary.record_cancelled(a.clone());
        assert_eq!(summary.failed.len(), 1);
        assert!(summary.cancelled.is_empty());

        summary.record_succeeded(b.clone());
        summary.record_failed(b);
        assert!(summary.succeeded.is_empty());
        assert_eq!(summary.failed.len(), 2);
    }
}
