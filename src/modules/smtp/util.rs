// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use rand::Rng;

use crate::utc_now;

/// Builds a Message-ID value without the surrounding angle brackets; the
/// message builder adds them when writing the header.
pub fn generate_message_id() -> String {
    let random_bytes: [u8; 16] = rand::rng().random();
    let random_id = hex::encode(random_bytes);
    let timestamp_millis = utc_now!();
    format!("{}.{}@bulkmailer", timestamp_millis, random_id)
}

#[cfg(test)]
mod test {
    use crate::modules::smtp::util::generate_message_id;

    #[test]
    fn message_ids_are_unique_and_unbracketed() {
        let first = generate_message_id();
        let second = generate_message_id();
        assert_ne!(first, second);
        assert!(first.ends_with("@bulkmailer"));
        assert!(!first.starts_with('<'));
        let (_, random) = first
            .trim_end_matches("@bulkmailer")
            .split_once('.')
            .unwrap();
        assert_eq!(random.len(), 32);
    }
}
