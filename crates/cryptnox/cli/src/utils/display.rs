//! Terminal output for the Cryptnox CLI

use colored::Colorize;
use cryptnox::{HandshakeError, Session};

/// Bytes of the shared secret shown on screen
const SECRET_PREVIEW_LEN: usize = 8;

/// Bytes per group in [`hex_field`]
const HEX_GROUP_LEN: usize = 4;

/// Green confirmation line
pub fn success(message: &str) -> String {
    format!("✅ {}", message.green().bold())
}

/// Yellow warning line
pub fn warning(message: &str) -> String {
    format!("⚠️  {}", message.yellow().bold())
}

/// Blue informational line
pub fn info(message: &str) -> String {
    format!("ℹ️  {}", message.blue())
}

/// Upper-case hex, split into groups of four bytes
pub fn hex_field(bytes: &[u8]) -> String {
    bytes
        .chunks(HEX_GROUP_LEN)
        .map(hex::encode_upper)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Underlined title followed by indented `key: value` lines
pub fn key_value_box(title: &str, items: &[(&str, String)]) -> String {
    let width = items.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let mut result = format!("{}", title.bold().underline());

    for (key, value) in items {
        result.push_str(&format!("\n  {:<width$}  {}", key.bold(), value));
    }

    result
}

/// Which step failed, the state left behind and why
pub fn handshake_failure(error: &HandshakeError) -> String {
    format!(
        "{}\n  {} {}",
        warning(&format!("Handshake failed at {}", error.step)),
        format!("after {}:", error.reached).as_str().dimmed(),
        error.source
    )
}

/// Handshake material worth showing; only a prefix of the shared secret is printed
pub fn session_box(session: &Session) -> String {
    let secret = session.shared_secret().as_bytes();
    key_value_box(
        "Session",
        &[
            ("Nonce sent", hex_field(session.sent_nonce())),
            ("Nonce echoed", hex_field(session.certificate().nonce())),
            ("Salt", hex_field(session.salt())),
            ("Card key", hex_field(session.card_ephemeral_key().full())),
            (
                "Client key",
                hex_field(&session.client_keypair().public_key_uncompressed()),
            ),
            (
                "Shared secret",
                format!("{} …", hex_field(&secret[..SECRET_PREVIEW_LEN])),
            ),
        ],
    )
}

/// UID of a tag that cannot run the handshake
pub fn uid_box(uid: &[u8]) -> String {
    key_value_box("Tag", &[("UID", hex_field(uid)), ("Length", uid.len().to_string())])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_field_groups() {
        assert_eq!(hex_field(&[]), "");
        assert_eq!(hex_field(&[0x04, 0xA1, 0xB2]), "04A1B2");
        assert_eq!(
            hex_field(&[0xDE, 0xAD, 0xBE, 0xEF, 0x01, 0x02]),
            "DEADBEEF 0102"
        );
    }

    #[test]
    fn test_key_value_box_aligns_keys() {
        colored::control::set_override(false);
        let rendered = key_value_box(
            "Tag",
            &[("UID", "04A1B2C3".to_string()), ("Length", "4".to_string())],
        );
        assert_eq!(rendered, "Tag\n  UID     04A1B2C3\n  Length  4");
    }
}
