use rand::{Rng, rng};
use std::collections::HashSet;
use std::ops::Range;

const RUNES_ALPHA: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// SSRCs handed out for local encodings, kept clear of the low values some
/// engines reserve.
pub const SSRC_RANGE: Range<u32> = 100_000_000..900_000_000;

/// math_rand_alpha generates a mathematical random alphabet sequence of the requested length.
pub fn math_rand_alpha(n: usize) -> String {
    generate_random_string(n, RUNES_ALPHA)
}

fn generate_random_string(n: usize, runes: &[u8]) -> String {
    let mut rng = rng();

    let rand_string: String = (0..n)
        .map(|_| {
            let idx = rng.random_range(0..runes.len());
            runes[idx] as char
        })
        .collect();

    rand_string
}

/// generate_ssrc returns a random SSRC in [`SSRC_RANGE`] that is not in `used`,
/// and records it there.
pub fn generate_ssrc(used: &mut HashSet<u32>) -> u32 {
    let mut rng = rng();
    loop {
        let ssrc = rng.random_range(SSRC_RANGE);
        if used.insert(ssrc) {
            return ssrc;
        }
    }
}
