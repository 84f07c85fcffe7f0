//! Sample text generation.
//!
//! When the client has no input file, or `--generate` is given, it sends
//! synthetic text instead. The text is built from a seeded RNG so a run can
//! be reproduced exactly.
//!
//! Generated text mixes:
//! - runs of a single character (one-symbol stretches)
//! - words over a skewed alphabet (natural-language-like frequencies)
//! - lines of digits and punctuation

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Letters roughly ordered by English frequency; earlier ones are picked more.
const LETTERS: &[u8] = b"etaoinshrdlcumwfgypbvkjxqz";

/// Generate `size_bytes` of ASCII sample text.
pub fn generate_sample_text(seed: u64, size_bytes: usize) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut text = Vec::with_capacity(size_bytes);

    while text.len() < size_bytes {
        let section: u8 = rng.gen_range(0..10);

        match section {
            // 10% runs of one character
            0 => {
                let ch = LETTERS[rng.gen_range(0..LETTERS.len())];
                let run = rng.gen_range(8..=64);
                text.extend(std::iter::repeat(ch).take(run));
                text.push(b'\n');
            }

            // 70% words
            1..=7 => {
                for _ in 0..rng.gen_range(4..=16) {
                    let word_len = rng.gen_range(1..=9);
                    for _ in 0..word_len {
                        text.push(skewed_letter(&mut rng));
                    }
                    text.push(b' ');
                }
                text.push(if rng.gen_bool(0.5) { b'.' } else { b',' });
                text.push(b'\n');
            }

            // 20% numbers and punctuation
            _ => {
                for _ in 0..rng.gen_range(4..=24) {
                    let ch = match rng.gen_range(0..4) {
                        0 => b"!?;:-()"[rng.gen_range(0..7)],
                        _ => b'0' + rng.gen_range(0..10),
                    };
                    text.push(ch);
                }
                text.push(b'\n');
            }
        }
    }

    text.truncate(size_bytes);
    text
}

/// Pick a letter, favoring the front of `LETTERS`.
fn skewed_letter(rng: &mut ChaCha8Rng) -> u8 {
    let r: f64 = rng.gen();
    let idx = (r * r * LETTERS.len() as f64) as usize;
    LETTERS[idx.min(LETTERS.len() - 1)]
}
