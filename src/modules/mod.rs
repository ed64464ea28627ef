// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

pub mod confirm;
pub mod entities;
pub mod error;
pub mod logger;
pub mod settings;
pub mod smtp;
pub mod utils;
