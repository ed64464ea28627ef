// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::logger::LocalTimer;
use crate::modules::settings::cli::Settings;
use std::sync::OnceLock;
use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;

pub static LOG_WORKER_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

#[derive(Debug)]
pub enum FileLoggerError {
    Appender(InitError),
    Subscriber(tracing::dispatcher::SetGlobalDefaultError),
}

pub fn setup_file_logger(settings: &Settings, level: Level) -> Result<(), FileLoggerError> {
    let (writer, guard) = mail_log_writer(settings).map_err(FileLoggerError::Appender)?;
    // a second initialization keeps the first guard alive
    let _ = LOG_WORKER_GUARD.set(guard);

    let layer = fmt::layer()
        .with_timer(LocalTimer)
        .with_ansi(false)
        .with_level(true)
        .with_writer(writer)
        .with_target(true);

    let subscriber = tracing_subscriber::registry()
        .with(LevelFilter::from_level(level))
        .with(layer);

    tracing::subscriber::set_global_default(subscriber).map_err(FileLoggerError::Subscriber)
}

fn mail_log_writer(settings: &Settings) -> Result<(NonBlocking, WorkerGuard), InitError> {
    let rolling = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("bulkmailer")
        .filename_suffix("log")
        .max_log_files(settings.bulkmailer_max_log_files)
        .build(&settings.bulkmailer_log_dir)?;
    Ok(tracing_appender::non_blocking(rolling))
}
