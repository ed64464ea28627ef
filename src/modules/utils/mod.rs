// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use super::error::code::ErrorCode;
use crate::raise_error;

#[macro_export]
macro_rules! bulkmailer_version {
    () => {
        env!("CARGO_PKG_VERSION")
    };
}

#[macro_export]
macro_rules! utc_now {
    () => {{
        use chrono::Utc;
        Utc::now().timestamp_millis()
    }};
}

#[macro_export]
macro_rules! raise_error {
    ($msg:expr, $code:expr) => {
        $crate::modules::error::BulkMailerError::Generic {
            message: $msg,
            location: snafu::Location::default(),
            code: $code,
        }
    };
}

/// Emits a tracing event whose level is only known at runtime.
///
/// `tracing` needs a constant level per callsite, so this expands to one
/// callsite per level.
#[macro_export]
macro_rules! log_at {
    ($level:expr, parent: $span:expr, $($arg:tt)+) => {{
        let level: tracing::Level = $level;
        if level == tracing::Level::ERROR {
            tracing::error!(parent: $span, $($arg)+)
        } else if level == tracing::Level::WARN {
            tracing::warn!(parent: $span, $($arg)+)
        } else if level == tracing::Level::INFO {
            tracing::info!(parent: $span, $($arg)+)
        } else if level == tracing::Level::DEBUG {
            tracing::debug!(parent: $span, $($arg)+)
        } else {
            tracing::trace!(parent: $span, $($arg)+)
        }
    }};
}

#[macro_export]
macro_rules! validate_email {
    ($email:expr) => {{
        $crate::modules::utils::validate_email($email)
    }};
}

pub fn validate_email(email: &str) -> crate::modules::error::BulkMailerResult<()> {
    use std::str::FromStr;
    let email_address = email_address::EmailAddress::from_str(email).map_err(|_| {
        raise_error!(
            format!("Invalid email format : {}", email),
            ErrorCode::InvalidParameter
        )
    })?;
    if email != email_address.email() {
        return Err(raise_error!(
            format!("Invalid email format: {}", email),
            ErrorCode::InvalidParameter
        ));
    }
    Ok(())
}
