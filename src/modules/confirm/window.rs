// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use rfd::{MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};

use super::Confirm;

/// Native dialog with an accept and a reject button. Closing it rejects.
///
/// The text goes into the platform message box, which does not scroll: very
/// long envelopes may be cut off. Use the console backend to review those.
#[derive(Clone, Copy, Debug, Default)]
pub struct WindowConfirm;

impl Confirm for WindowConfirm {
    fn ask(&mut self, text: &str, accept: &str, reject: &str) -> bool {
        let (accept_label, reject_label) = button_labels(accept, reject);
        let result = MessageDialog::new()
            .set_level(MessageLevel::Info)
            .set_title("bulkmailer")
            .set_description(text)
            .set_buttons(MessageButtons::OkCancelCustom(
                accept_label.clone(),
                reject_label,
            ))
            .show();
        is_accepted(&result, &accept_label)
    }
}

fn button_labels(accept: &str, reject: &str) -> (String, String) {
    (format!("✓ {}", accept), format!("✗ {}", reject))
}

fn is_accepted(result: &MessageDialogResult, accept_label: &str) -> bool {
    match result {
        MessageDialogResult::Ok | MessageDialogResult::Yes => true,
        MessageDialogResult::Custom(label) => label == accept_label,
        _ => false,
    }
}
