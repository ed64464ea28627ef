// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use itertools::Itertools;

use crate::modules::entities::{Emailable, Person};
use crate::modules::smtp::message::Message;

/// One recipient or a list of them.
#[derive(Clone, Debug)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }
}

impl From<Emailable> for OneOrMany<Emailable> {
    fn from(recipient: Emailable) -> Self {
        OneOrMany::One(recipient)
    }
}

impl From<Person> for OneOrMany<Emailable> {
    fn from(person: Person) -> Self {
        OneOrMany::One(person.into())
    }
}

impl From<Vec<Emailable>> for OneOrMany<Emailable> {
    fn from(recipients: Vec<Emailable>) -> Self {
        OneOrMany::Many(recipients)
    }
}

impl From<Vec<Person>> for OneOrMany<Emailable> {
    fn from(people: Vec<Person>) -> Self {
        OneOrMany::Many(people.into_iter().map(Into::into).collect())
    }
}

/// How an envelope addresses its recipients.
pub trait RecipientShape {
    fn to(&self) -> &[Emailable];

    fn cc(&self) -> &[Emailable] {
        &[]
    }

    fn bcc(&self) -> &[Emailable] {
        &[]
    }
}

/// Exactly one recipient, used for personal mailings.
#[derive(Clone, Debug)]
pub struct Single(pub Emailable);

impl Single {
    pub fn recipient(&self) -> &Emailable {
        &self.0
    }
}

impl RecipientShape for Single {
    fn to(&self) -> &[Emailable] {
        std::slice::from_ref(&self.0)
    }
}

impl From<Emailable> for Single {
    fn from(recipient: Emailable) -> Self {
        Single(recipient)
    }
}

impl From<Person> for Single {
    fn from(person: Person) -> Self {
        Single(person.into())
    }
}

/// To, Cc and Bcc groups of a generic mailing.
#[derive(Clone, Debug, Default)]
pub struct Multi {
    to: Vec<Emailable>,
    cc: Vec<Emailable>,
    bcc: Vec<Emailable>,
}

impl Multi {
    pub fn new(to: impl Into<OneOrMany<Emailable>>) -> Self {
        Self {
            to: to.into().into_vec(),
            ..Default::default()
        }
    }

    pub fn with_cc(mut self, cc: impl Into<OneOrMany<Emailable>>) -> Self {
        self.cc = cc.into().into_vec();
        self
    }

    pub fn with_bcc(mut self, bcc: impl Into<OneOrMany<Emailable>>) -> Self {
        self.bcc = bcc.into().into_vec();
        self
    }
}

impl RecipientShape for Multi {
    fn to(&self) -> &[Emailable] {
        &self.to
    }

    fn cc(&self) -> &[Emailable] {
        &self.cc
    }

    fn bcc(&self) -> &[Emailable] {
        &self.bcc
    }
}

/// A message bound to the recipients it has not yet been sent to.
#[derive(Clone, Debug)]
pub struct Envelope<S> {
    pub message: Message,
    pub recipients: S,
}

impl<S: RecipientShape> Envelope<S> {
    pub fn new(message: Message, recipients: S) -> Self {
        Self {
            message,
            recipients,
        }
    }

    /// Everyone the message goes to (to, cc, bcc), each identity once, first-seen order.
    pub fn all_recipients(&self) -> Vec<Emailable> {
        self.recipients
            .to()
            .iter()
            .chain(self.recipients.cc())
            .chain(self.recipients.bcc())
            .unique()
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_or_many_builds_groups() {
        let a = Person::new("Ada", "Lovelace", "ada@example.com");
        let b = Emailable::new("b@example.com", "B");
        let c = Emailable::new("c@example.com", "C");

        let shape = Multi::new(a.clone())
            .with_cc(vec![b.clone(), c.clone()])
            .with_bcc(Vec::<Emailable>::new());
        assert_eq!(shape.to(), &[a.emailable().clone()]);
        assert_eq!(shape.cc(), &[b, c]);
        assert!(shape.bcc().is_empty());
    }

    #[test]
    fn all_recipients_dedupes_by_identity() {
        let a = Emailable::new("shared@example.com", "A");
        let twin = Emailable::new("shared@example.com", "A");
        let shape = Multi::new(vec![a.clone(), twin.clone()])
            .with_cc(a.clone())
            .with_bcc(twin.clone());
        let envelope = Envelope::new(Message::plain("s", "b"), shape);
        assert_eq!(envelope.all_recipients(), vec![a, twin]);
    }

    #[test]
    fn single_has_only_to() {
        let person = Person::new("Grace", "Hopper", "grace@example.com");
        let envelope = Envelope::new(Message::plain("s", "b"), Single::from(person.clone()));
        assert_eq!(envelope.recipients.recipient(), person.emailable());
        assert_eq!(envelope.all_recipients().len(), 1);
        assert!(envelope.recipients.cc().is_empty());
    }
}
