// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::error::code::ErrorCode;
use crate::modules::error::BulkMailerResult;
use crate::modules::logger::file::setup_file_logger;
use crate::modules::settings::cli::Settings;
use crate::raise_error;
use chrono::Local;
use tracing::Level;
use tracing_subscriber::fmt::{format::Writer, time::FormatTime};

mod file;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z"))
    }
}

/// Installs the global subscriber: stdout by default, daily rolling files
/// when `bulkmailer_log_to_file` is set.
pub fn initialize_logging(settings: &Settings) -> BulkMailerResult<()> {
    let level = validate_log_level(&settings.bulkmailer_log_level)?;
    if settings.bulkmailer_log_to_file {
        setup_file_logger(settings, level)
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::InternalError))
    } else {
        setup_stdout_logger(settings, level)
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::InternalError))
    }
}

fn setup_stdout_logger(
    settings: &Settings,
    level: Level,
) -> Result<(), tracing::dispatcher::SetGlobalDefaultError> {
    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(settings.bulkmailer_ansi_logs)
        .with_writer(std::io::stdout)
        .with_level(true)
        .with_target(true)
        .with_timer(LocalTimer);

    if settings.bulkmailer_json_logs {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    }
}

fn validate_log_level(value: &str) -> BulkMailerResult<Level> {
    value.parse::<Level>().map_err(|_| {
        raise_error!(
            format!(
                "Invalid log level specified. Use one of: error, warn, info, debug, trace. \
                 The log level you currently specified is 'bulkmailer_log_level'='{}'",
                value
            ),
            ErrorCode::InvalidParameter
        )
    })
}
