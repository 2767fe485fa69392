//! Bounded sliding-window LZSS factorization: a simpler O(n·w)
//! alternative to the LCP-driven core, sharing the same `Factor`
//! representation and bit-stream coder.
//!
//! Grounded on `tudocomp/compressors/LZSSSlidingWindowCompressor.hpp`:
//! for each position, scan back up to `window` bytes for the longest
//! matching run (including runs that overlap past the current position,
//! which is what makes a single factor able to express a long run of a
//! repeated byte), and either emit a factor or leave the position as a
//! literal.

use crate::factor::{Factor, FactorBuffer};
use crate::lzsscoder;
use crate::Error;

/// Factorizes `text` with a `window`-byte lookback and `threshold`
/// minimum factor length, then encodes it with the shared LZSS coder.
pub fn compress(text: &[u8], threshold: usize, window: usize) -> Vec<u8> {
    let factors = factorize(text, threshold, window);
    lzsscoder::encode(text, &factors)
}

pub fn expand(data: &[u8]) -> Result<Vec<u8>, Error> {
    lzsscoder::decode(data)
}

fn factorize(text: &[u8], threshold: usize, window: usize) -> FactorBuffer {
    let n = text.len();
    let mut factors = FactorBuffer::new();
    let mut pos = 0;
    while pos < n {
        let win_start = pos.saturating_sub(window);
        let mut best_len = 0;
        let mut best_src = 0;
        for src in win_start..pos {
            let mut len = 0;
            while pos + len < n && text[src + len] == text[pos + len] {
                len += 1;
            }
            if len > best_len {
                best_len = len;
                best_src = src;
            }
        }
        if best_len >= threshold {
            factors.push(Factor::new(pos, best_src, best_len));
            pos += best_len;
        } else {
            pos += 1;
        }
    }
    factors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(text: &[u8], threshold: usize, window: usize) {
        let encoded = compress(text, threshold, window);
        let decoded = expand(&encoded).unwrap();
        assert_eq!(decoded, text);
    }

    #[test]
    fn abracadabra() {
        roundtrip(b"abracadabra\0", 2, 16);
    }

    #[test]
    fn all_same_byte_self_overlapping_run() {
        roundtrip(b"aaaaaaaa\0", 2, 16);
    }

    #[test]
    fn no_repeats() {
        roundtrip(b"abcdef\0", 2, 16);
    }

    #[test]
    fn empty_text() {
        roundtrip(b"\0", 2, 16);
    }

    #[test]
    fn window_limits_lookback() {
        // A repeat further back than the window cannot be factored.
        let text = b"abcdefghij abcdefghij\0";
        let encoded = compress(text, 4, 4);
        let decoded = expand(&encoded).unwrap();
        assert_eq!(&decoded, text);
    }
}
