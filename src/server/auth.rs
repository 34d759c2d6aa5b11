//! Inbound request integrity.
//!
//! Push webhooks are authenticated by an HMAC-SHA256 signature over the raw
//! body (`x-hub-signature-256: sha256=<hex>`); bot updates by a shared
//! secret token header. Verification runs before any body field is parsed
//! or trusted, and both comparisons are constant-time.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Parses a signature header (e.g. "sha256=abc123...") into raw bytes.
///
/// Returns `None` for malformed headers: missing prefix, wrong algorithm,
/// invalid hex.
pub fn parse_signature_header(header: &str) -> Option<Vec<u8>> {
    let hex_sig = header.strip_prefix("sha256=")?;
    hex::decode(hex_sig).ok()
}

/// Computes the HMAC-SHA256 signature of a payload with the given secret.
///
/// This is the signing side; the relay itself only verifies, but tests and
/// delivery tooling need to produce valid headers.
pub fn compute_signature(payload: &[u8], secret: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(payload);
    mac.finalize().into_bytes().to_vec()
}

/// Formats a signature as a `sha256=<hex>` header value.
pub fn format_signature_header(signature: &[u8]) -> String {
    format!("sha256={}", hex::encode(signature))
}

/// Verifies a push webhook signature against the raw payload and secret.
///
/// Length is checked before content; the content comparison itself is
/// constant-time via the HMAC library.
pub fn verify_signature(payload: &[u8], signature_header: &str, secret: &[u8]) -> bool {
    let Some(expected) = parse_signature_header(signature_header) else {
        return false;
    };
    if expected.len() != 32 {
        return false;
    }

    let Ok(mut mac) = HmacSha256::new_from_slice(secret) else {
        return false;
    };
    mac.update(payload);
    mac.verify_slice(&expected).is_ok()
}

/// Constant-time shared-token check for the bot endpoint.
///
/// Length mismatch (and an absent header, arriving here as an empty string)
/// rejects without comparing content.
pub fn verify_secret_token(received: &str, configured: &str) -> bool {
    if received.is_empty() || received.len() != configured.len() {
        return false;
    }
    received.as_bytes().ct_eq(configured.as_bytes()).into()
}
