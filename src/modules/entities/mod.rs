// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_RECIPIENT_ID: AtomicU64 = AtomicU64::new(1);

/// An addressable party: an e-mail address plus a display name.
///
/// Every `Emailable::new` call creates a new identity. Clones share the identity
/// of the value they were cloned from, so equality and hashing follow identity and
/// never the address: two recipients created separately with the same address are
/// still two recipients.
#[derive(Clone, Debug)]
pub struct Emailable {
    id: u64,
    address: String,
    name: String,
}

impl Emailable {
    pub fn new(address: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: NEXT_RECIPIENT_ID.fetch_add(1, Ordering::Relaxed),
            address: address.into(),
            name: name.into(),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The mailbox as written into `From`/`To`/`Cc` headers, e.g. `Jane Doe <jane@example.com>`.
    pub fn header_name(&self) -> String {
        if self.name.is_empty() {
            return self.address.clone();
        }
        if self.name.chars().any(is_special) {
            let escaped = self.name.replace('\\', "\\\\").replace('"', "\\\"");
            format!("\"{}\" <{}>", escaped, self.address)
        } else {
            format!("{} <{}>", self.name, self.address)
        }
    }
}

// RFC 5322 specials that force a quoted display name.
fn is_special(c: char) -> bool {
    matches!(
        c,
        '(' | ')' | '<' | '>' | '[' | ']' | ':' | ';' | '@' | '\\' | ',' | '.' | '"'
    )
}

impl PartialEq for Emailable {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Emailable {}

impl Hash for Emailable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl AsRef<Emailable> for Emailable {
    fn as_ref(&self) -> &Emailable {
        self
    }
}

impl fmt::Display for Emailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.address)
    }
}

/// A named person. The display name is always `"{first} {last}"`.
#[derive(Clone, Debug)]
pub struct Person {
    first_name: String,
    last_name: String,
    emailable: Emailable,
}

impl Person {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        let first_name = first_name.into();
        let last_name = last_name.into();
        let full_name = format!("{} {}", first_name, last_name);
        Self {
            emailable: Emailable::new(address, full_name),
            first_name,
            last_name,
        }
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn full_name(&self) -> &str {
        self.emailable.name()
    }

    pub fn emailable(&self) -> &Emailable {
        &self.emailable
    }
}

impl PartialEq for Person {
    fn eq(&self, other: &Self) -> bool {
        self.emailable == other.emailable
    }
}

impl Eq for Person {}

impl Hash for Person {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.emailable.hash(state);
    }
}

impl AsRef<Emailable> for Person {
    fn as_ref(&self) -> &Emailable {
        &self.emailable
    }
}

impl From<Person> for Emailable {
    fn from(person: Person) -> Self {
        person.emailable
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.emailable, f)
    }
}
