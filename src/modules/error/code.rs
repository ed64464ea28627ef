// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(u32)]
pub enum ErrorCode {
    // Client-side errors (10000–10999)
    InvalidParameter = 10000,
    MissingConfiguration = 10020,
    AttachmentUnreadable = 10050,

    // Authentication errors (20000–20999)
    IncompleteLogin = 20000,

    // Interactive errors (30000–30999)
    SendCancelled = 30000,

    // Network connection errors (40000–40999)
    ConnectionTimeout = 40010,

    // Mail service errors (50000–50999)
    SmtpCommandFailed = 50030,
    SmtpConnectionFailed = 50040,
    MessageBuildFailed = 50050,

    // Internal system errors (70000–70999)
    InternalError = 70000,
}
