// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use code::ErrorCode;
use snafu::{Location, Snafu};

use crate::modules::smtp::transport::RefusedRecipients;

pub mod code;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum BulkMailerError {
    #[snafu(display("{message}"))]
    Generic {
        message: String,
        #[snafu(implicit)]
        location: Location,
        code: ErrorCode,
    },
    /// The server refused every recipient of a transaction, so no DATA was sent.
    #[snafu(display("all {} recipient(s) refused by the server", refused.len()))]
    RecipientsRefused {
        refused: RefusedRecipients,
        #[snafu(implicit)]
        location: Location,
    },
}

pub type BulkMailerResult<T, E = BulkMailerError> = std::result::Result<T, E>;

impl BulkMailerError {
    pub fn code(&self) -> ErrorCode {
        match self {
            BulkMailerError::Generic { code, .. } => *code,
            BulkMailerError::RecipientsRefused { .. } => ErrorCode::SmtpCommandFailed,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.code() == ErrorCode::SendCancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::smtp::transport::SmtpReply;
    use crate::raise_error;

    #[test]
    fn generic_error_keeps_code_and_message() {
        let error = raise_error!("Send cancelled".into(), ErrorCode::SendCancelled);
        assert!(error.is_cancelled());
        assert_eq!(error.code(), ErrorCode::SendCancelled);
        assert_eq!(error.to_string(), "Send cancelled");
    }

    #[test]
    fn refused_error_reports_count() {
        let mut refused = RefusedRecipients::new();
        refused.insert("a@example.com".into(), SmtpReply::new(550, "no such user"));
        refused.insert("b@example.com".into(), SmtpReply::new(553, "mailbox name invalid"));
        let error = RecipientsRefusedSnafu { refused }.build();
        assert!(!error.is_cancelled());
        assert_eq!(error.code(), ErrorCode::SmtpCommandFailed);
        assert_eq!(error.to_string(), "all 2 recipient(s) refused by the server");
    }
}
