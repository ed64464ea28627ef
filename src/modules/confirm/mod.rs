// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt::Write;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::modules::smtp::envelope::{Envelope, RecipientShape};
use crate::modules::smtp::message::join_header_names;

pub mod console;
#[cfg(feature = "gui")]
pub mod window;

pub use console::ConsoleConfirm;
#[cfg(feature = "gui")]
pub use window::WindowConfirm;

/// A yes/no checkpoint shown to a human before mail goes out.
pub trait Confirm {
    /// Shows `text` with two choices and blocks until one is picked.
    ///
    /// Returns `true` for `accept`. Rejecting, or abandoning the prompt, returns `false`.
    fn ask(&mut self, text: &str, accept: &str, reject: &str) -> bool;
}

#[derive(Clone, Copy, Default, Debug, Eq, PartialEq, Serialize, Deserialize, ValueEnum)]
pub enum ConfirmBackend {
    /// Prompt on the terminal
    #[default]
    Console,
    /// Native dialog window (requires the `gui` feature)
    Window,
}

pub fn confirmer(backend: ConfirmBackend) -> Box<dyn Confirm> {
    match backend {
        ConfirmBackend::Console => Box::new(ConsoleConfirm::new()),
        #[cfg(feature = "gui")]
        ConfirmBackend::Window => Box::new(WindowConfirm),
        #[cfg(not(feature = "gui"))]
        ConfirmBackend::Window => {
            tracing::warn!(
                "Window confirmation requested but bulkmailer was built without the `gui` feature, falling back to console"
            );
            Box::new(ConsoleConfirm::new())
        }
    }
}

/// Renders an envelope for review. The output is never parsed back.
pub fn render_envelope<S: RecipientShape>(envelope: &Envelope<S>) -> String {
    let recipients = &envelope.recipients;
    let message = &envelope.message;
    let mut text = String::new();

    text.push_str("--- RECIPIENTS ---\n");
    let _ = writeln!(text, "To: {}", join_header_names(recipients.to()));
    let _ = writeln!(text, "Cc: {}", join_header_names(recipients.cc()));
    let _ = writeln!(text, "Bcc: {}", join_header_names(recipients.bcc()));
    text.push_str("\n\n");

    text.push_str("--- ATTACHMENTS ---\n");
    for attachment in message.attachments() {
        let _ = writeln!(text, "{} ({})", attachment.filename, attachment.mime_type);
    }
    text.push_str("\n\n");

    text.push_str("--- HEADER ---\n");
    for (name, value) in message.headers() {
        let _ = writeln!(text, "{}: {}", name, value);
    }
    text.push_str("\n\n");

    text.push_str("--- BODY ---\n");
    text.push_str(message.body());
    text
}

pub fn ask_mail_confirmation<S: RecipientShape>(
    confirmer: &mut dyn Confirm,
    envelope: &Envelope<S>,
    accept: &str,
    reject: &str,
) -> bool {
    confirmer.ask(&render_envelope(envelope), accept, reject)
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Confirm;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Answers prompts from a script and records what it was asked.
    #[derive(Clone, Default)]
    pub struct ScriptedConfirm {
        answers: Arc<Mutex<VecDeque<bool>>>,
        pub asked: Arc<Mutex<Vec<(String, String, String)>>>,
    }

    impl ScriptedConfirm {
        pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
            Self {
                answers: Arc::new(Mutex::new(answers.into_iter().collect())),
                asked: Arc::default(),
            }
        }

        pub fn times_asked(&self) -> usize {
            self.asked.lock().unwrap().len()
        }
    }

    impl Confirm for ScriptedConfirm {
        fn ask(&mut self, text: &str, accept: &str, reject: &str) -> bool {
            self.asked
                .lock()
                .unwrap()
                .push((text.to_string(), accept.to_string(), reject.to_string()));
            self.answers.lock().unwrap().pop_front().unwrap_or(false)
        }
    }
}
