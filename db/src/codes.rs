//! Short human-enterable codes for session check-in and course enrollment.
//!
//! Codes are upper-case alphanumerics. They are not meant to be secret; the
//! alphabet and minimum length only need to keep collisions among live codes
//! negligible, and storage enforces uniqueness regardless.

use rand::Rng;
use util::config::MIN_CODE_LENGTH;

/// 36 symbols: `A-Z` then `0-9`.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generates a random code of `len` characters (never shorter than
/// [`MIN_CODE_LENGTH`]).
pub fn generate_code(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len.max(MIN_CODE_LENGTH))
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// Canonical form used for storage and comparison: surrounding whitespace
/// removed, ASCII letters upper-cased.
pub fn normalize_code(input: &str) -> String {
    input.trim().to_ascii_uppercase()
}
