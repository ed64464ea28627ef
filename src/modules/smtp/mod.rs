// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

pub mod client;
pub mod config;
pub mod envelope;
pub mod mailer;
pub mod manager;
pub mod message;
pub mod pacer;
pub mod queue;
pub mod result;
pub mod transport;
pub mod util;
