// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

pub mod modules;

pub use modules::confirm::{confirmer, Confirm, ConfirmBackend, ConsoleConfirm};
pub use modules::entities::{Emailable, Person};
pub use modules::error::{code::ErrorCode, BulkMailerError, BulkMailerResult};
pub use modules::smtp::config::{Encryption, MailerOptions, SmtpConfig};
pub use modules::smtp::envelope::{Envelope, Multi, OneOrMany, RecipientShape, Single};
pub use modules::smtp::mailer::Mailer;
pub use modules::smtp::message::{create_plain_mail, Attachment, Message};
pub use modules::smtp::pacer::{Clock, SystemClock};
pub use modules::smtp::queue::{AddReport, MailQueue};
pub use modules::smtp::result::{Delivery, QueueSummary, SendResult};
pub use modules::smtp::transport::{RefusedRecipients, SmtpReply, SmtpTransport, Transport};
