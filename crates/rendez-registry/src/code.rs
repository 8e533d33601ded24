//! Room code normalization and random identifier generation.

use rand::Rng;

/// Alphabet for generated room codes. Visually confusable characters
/// (`O`/`0`, `I`/`1`) are excluded so codes survive being read aloud
/// or scribbled on paper.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Length of a generated room code.
pub const CODE_LEN: usize = 5;

/// Normalizes a client-supplied room code: trimmed and uppercased.
pub fn normalize_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Generates a fresh 5-character room code.
///
/// Generation does not check for collisions against existing rooms; at
/// 32^5 possible codes a clash is vanishingly unlikely at this scale,
/// and a clash simply joins the existing room.
pub fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LEN)
        .map(|_| {
            CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char
        })
        .collect()
}

/// Generates a room seed: a random 31-bit non-negative integer shared
/// with all joiners for deterministic client-side randomness.
pub fn generate_seed() -> u32 {
    rand::rng().random_range(0..(1u32 << 31))
}
