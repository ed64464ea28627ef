// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::io::{self, BufRead, Write};

use bulkmailer::modules::{
    confirm::confirmer,
    entities::Emailable,
    error::{code::ErrorCode, BulkMailerResult},
    logger,
    settings::cli::SETTINGS,
    smtp::{mailer::Mailer, message::create_plain_mail},
};
use bulkmailer::{bulkmailer_version, raise_error, validate_email};
use tracing::{info, info_span, warn};

fn main() -> BulkMailerResult<()> {
    logger::initialize_logging(&SETTINGS)?;
    info!("Starting bulkmailer");
    info!("Version:  {}", bulkmailer_version!());
    info!("Git:      [{}]", env!("GIT_HASH"));

    if let Err(error) = run() {
        eprintln!("{:?}", error);
        return Err(error);
    }
    Ok(())
}

/// Sends a test message to the person entered on the console, from that same person.
fn run() -> BulkMailerResult<()> {
    let name = prompt("Name: ")?;
    let address = prompt("E-mail address: ")?;
    validate_email!(&address)?;
    let person = Emailable::new(address, name);

    let mut config = SETTINGS.smtp_config();
    if config.host.is_empty() {
        config.host = prompt("SMTP address: ")?;
    }

    let span = info_span!("mailer", sender = %person.address());
    let mut mailer = Mailer::connect(&config, person.clone(), SETTINGS.mailer_options())?
        .with_confirmer(confirmer(SETTINGS.bulkmailer_confirm_backend))
        .with_span(span);

    let mail = create_plain_mail::<&str>("Hello", "This is a test!", &[])?;
    if let Some(reply) = mailer.send_personal(mail, person)? {
        warn!("The server refused the test message {}", reply);
    }
    mailer.quit()
}

fn prompt(label: &str) -> BulkMailerResult<String> {
    print!("{}", label);
    io::stdout()
        .flush()
        .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::InternalError))?;
    let mut line = String::new();
    let read = io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::InternalError))?;
    if read == 0 {
        return Err(raise_error!(
            format!("No input for '{}'", label.trim_end_matches(": ")),
            ErrorCode::InvalidParameter
        ));
    }
    Ok(line.trim().to_string())
}
