// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use clap::{builder::ValueParser, ArgAction, Parser};
use std::{path::PathBuf, sync::LazyLock, time::Duration};

use crate::modules::confirm::ConfirmBackend;
use crate::modules::smtp::config::{Encryption, MailerOptions, SmtpConfig};

#[cfg(not(test))]
pub static SETTINGS: LazyLock<Settings> = LazyLock::new(Settings::parse);

#[cfg(test)]
pub static SETTINGS: LazyLock<Settings> = LazyLock::new(Settings::new_for_test);

#[derive(Debug, Parser)]
#[clap(
    name = "bulkmailer",
    about = "Send plain-text mail to groups or individually to many recipients over SMTP,
    with optional confirmation before every send.",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Settings {
    /// bulkmailer log level (default: "info")
    #[clap(
        long,
        default_value = "info",
        env,
        help = "Set the log level for bulkmailer"
    )]
    pub bulkmailer_log_level: String,

    /// Enable ANSI logs (default: true)
    #[clap(
        long,
        default_value = "true",
        env,
        action = ArgAction::Set,
        help = "Enable ANSI formatted logs"
    )]
    pub bulkmailer_ansi_logs: bool,

    /// Enable log file output (default: false)
    /// If false, logs will be printed to stdout
    #[clap(
        long,
        default_value = "false",
        env,
        action = ArgAction::Set,
        help = "Enable log file output (otherwise logs go to stdout)"
    )]
    pub bulkmailer_log_to_file: bool,

    /// Enable JSON logs (default: false)
    #[clap(
        long,
        default_value = "false",
        env,
        action = ArgAction::Set,
        help = "Enable JSON formatted logs"
    )]
    pub bulkmailer_json_logs: bool,

    #[clap(
        long,
        default_value = "logs",
        env,
        help = "Directory for log files when log file output is enabled"
    )]
    pub bulkmailer_log_dir: PathBuf,

    /// Maximum number of log files (default: 5)
    #[clap(
        long,
        default_value = "5",
        env,
        help = "Set the maximum number of log files to keep"
    )]
    pub bulkmailer_max_log_files: usize,

    #[clap(
        long,
        env,
        default_value = "",
        help = "SMTP server host name"
    )]
    pub bulkmailer_smtp_host: String,

    #[clap(
        long,
        env,
        default_value = "465",
        help = "SMTP server port"
    )]
    pub bulkmailer_smtp_port: u16,

    #[clap(
        long,
        env,
        value_enum,
        default_value = "ssl",
        help = "Connection security: ssl (implicit TLS), start-tls or none"
    )]
    pub bulkmailer_smtp_encryption: Encryption,

    #[clap(long, env, help = "SMTP login user (requires a password)")]
    pub bulkmailer_smtp_username: Option<String>,

    #[clap(long, env, help = "SMTP login password (requires a user)")]
    pub bulkmailer_smtp_password: Option<String>,

    #[clap(
        long,
        env,
        default_value = "30",
        help = "Timeout in seconds for connecting and for each SMTP command"
    )]
    pub bulkmailer_smtp_timeout_secs: u64,

    #[clap(
        long,
        env,
        default_value = "false",
        action = ArgAction::Set,
        help = "Ask for confirmation before every send"
    )]
    pub bulkmailer_confirm: bool,

    #[clap(
        long,
        env,
        value_enum,
        default_value = "console",
        help = "How confirmation is asked: console or window"
    )]
    pub bulkmailer_confirm_backend: ConfirmBackend,

    /// Minimum pause between two sends, in seconds (fractions allowed).
    #[clap(
        long,
        env,
        default_value = "0",
        help = "Minimum number of seconds between two consecutive sends",
        value_parser = ValueParser::new(parse_delay)
    )]
    pub bulkmailer_delay_secs: Duration,

    #[clap(
        long,
        env,
        default_value = "true",
        action = ArgAction::Set,
        help = "Log every recipient's outcome, not just the summary"
    )]
    pub bulkmailer_detailed_log: bool,
}

fn parse_delay(s: &str) -> Result<Duration, String> {
    let secs: f64 = s.parse().map_err(|_| format!("'{}' is not a number", s))?;
    if !secs.is_finite() || secs < 0.0 {
        return Err("The delay must be a non-negative number of seconds".to_string());
    }
    Duration::try_from_secs_f64(secs).map_err(|e| format!("Delay of {} seconds: {}", s, e))
}

impl Settings {
    pub fn smtp_config(&self) -> SmtpConfig {
        SmtpConfig {
            host: self.bulkmailer_smtp_host.clone(),
            port: self.bulkmailer_smtp_port,
            encryption: self.bulkmailer_smtp_encryption,
            username: self.bulkmailer_smtp_username.clone(),
            password: self.bulkmailer_smtp_password.clone(),
            timeout_secs: self.bulkmailer_smtp_timeout_secs,
        }
    }

    pub fn mailer_options(&self) -> MailerOptions {
        MailerOptions {
            confirm_send: self.bulkmailer_confirm,
            delay: self.bulkmailer_delay_secs,
            detailed_log: self.bulkmailer_detailed_log,
        }
    }

    #[cfg(test)]
    fn new_for_test() -> Self {
        Self {
            bulkmailer_log_level: "info".to_string(),
            bulkmailer_ansi_logs: false,
            bulkmailer_log_to_file: false,
            bulkmailer_json_logs: false,
            bulkmailer_log_dir: PathBuf::from("logs"),
            bulkmailer_max_log_files: 5,
            bulkmailer_smtp_host: "localhost".to_string(),
            bulkmailer_smtp_port: 465,
            bulkmailer_smtp_encryption: Encryption::Ssl,
            bulkmailer_smtp_username: None,
            bulkmailer_smtp_password: None,
            bulkmailer_smtp_timeout_secs: 30,
            bulkmailer_confirm: false,
            bulkmailer_confirm_backend: ConfirmBackend::Console,
            bulkmailer_delay_secs: Duration::ZERO,
            bulkmailer_detailed_log: true,
        }
    }
}
