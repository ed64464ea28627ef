// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Cow;
use std::path::Path;

use mail_send::mail_builder::headers::address::Address;
use mail_send::mail_builder::mime::BodyPart;
use mail_send::mail_builder::MessageBuilder;
use mime_guess::from_path;

use crate::modules::entities::Emailable;
use crate::modules::error::code::ErrorCode;
use crate::modules::error::BulkMailerResult;
use crate::modules::smtp::util::generate_message_id;
use crate::raise_error;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// A plain-text message with optional attachments.
///
/// The `From`, `To` and `Cc` headers are filled in by the mailer right before
/// sending. There is no Bcc header at all: blind copies only exist on the envelope.
#[derive(Clone, Debug)]
pub struct Message {
    subject: String,
    body: String,
    attachments: Vec<Attachment>,
    from: Option<Emailable>,
    to: Vec<Emailable>,
    cc: Vec<Emailable>,
}

impl Message {
    pub fn plain(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
            attachments: Vec::new(),
            from: None,
            to: Vec::new(),
            cc: Vec::new(),
        }
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    pub(crate) fn set_addresses(&mut self, from: &Emailable, to: &[Emailable], cc: &[Emailable]) {
        self.from = Some(from.clone());
        self.to = to.to_vec();
        self.cc = cc.to_vec();
    }

    fn content_type(&self) -> &'static str {
        if self.attachments.is_empty() {
            "text/plain; charset=\"utf-8\""
        } else {
            "multipart/mixed"
        }
    }

    /// Header fields in the order they are shown for review.
    ///
    /// `From` and `To` appear once set, `Cc` only when non-empty.
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = vec![
            ("Subject", self.subject.clone()),
            ("MIME-Version", "1.0".to_string()),
            ("Content-Type", self.content_type().to_string()),
        ];
        if let Some(from) = &self.from {
            headers.push(("From", from.header_name()));
        }
        if !self.to.is_empty() {
            headers.push(("To", join_header_names(&self.to)));
        }
        if !self.cc.is_empty() {
            headers.push(("Cc", join_header_names(&self.cc)));
        }
        headers
    }

    /// Renders the RFC 5322 wire form under a fresh Message-ID.
    pub fn to_bytes(&self) -> BulkMailerResult<Vec<u8>> {
        let mut builder = MessageBuilder::new()
            .subject(self.subject.clone())
            .message_id(generate_message_id())
            .text_body(self.body.clone());
        if let Some(from) = &self.from {
            builder = builder.from(to_address(from));
        }
        if !self.to.is_empty() {
            builder = builder.to(to_address_list(&self.to));
        }
        if !self.cc.is_empty() {
            builder = builder.cc(to_address_list(&self.cc));
        }
        for attachment in &self.attachments {
            builder = builder.attachment(
                attachment.mime_type.clone(),
                attachment.filename.clone(),
                BodyPart::Binary(Cow::Owned(attachment.bytes.clone())),
            );
        }
        builder.write_to_vec().map_err(|e| {
            raise_error!(
                format!("Failed to build message: {}", e),
                ErrorCode::MessageBuildFailed
            )
        })
    }
}

pub(crate) fn join_header_names(people: &[Emailable]) -> String {
    people
        .iter()
        .map(Emailable::header_name)
        .collect::<Vec<_>>()
        .join(", ")
}

fn to_address(person: &Emailable) -> Address<'static> {
    if person.name().is_empty() {
        Address::new_address(None::<&str>, Cow::Owned(person.address().to_string()))
    } else {
        Address::from((person.name().to_string(), person.address().to_string()))
    }
}

fn to_address_list(people: &[Emailable]) -> Address<'static> {
    if people.len() == 1 {
        to_address(&people[0])
    } else {
        Address::new_list(people.iter().map(to_address).collect())
    }
}

fn read_attachment(path: &Path) -> BulkMailerResult<Attachment> {
    let bytes = std::fs::read(path).map_err(|e| {
        raise_error!(
            format!("Cannot read attachment {}: {}", path.display(), e),
            ErrorCode::AttachmentUnreadable
        )
    })?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let mime_type = from_path(path).first_or_octet_stream().to_string();
    Ok(Attachment {
        filename,
        mime_type,
        bytes,
    })
}

/// Builds a plain-text message, reading every attachment from disk.
pub fn create_plain_mail<P: AsRef<Path>>(
    subject: &str,
    body: &str,
    attachments: &[P],
) -> BulkMailerResult<Message> {
    let mut message = Message::plain(subject, body);
    for path in attachments {
        message = message.with_attachment(read_attachment(path.as_ref())?);
    }
    Ok(message)
}
