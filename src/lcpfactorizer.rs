//! The LCP-driven factorizer: the hard core of this crate.
//!
//! Grounded directly on the design in spec §4.5 of this system's own
//! component notes (no single teacher file covers this — it combines
//! the heap-driven "always take the longest remaining repeat" loop with
//! the suffix-array/LCP text index). At each step the heap gives the
//! suffix-array slot with the largest LCP; its neighbor in suffix order
//! is the closest lexicographic match, so the two suffixes' shared
//! prefix becomes a factor. Marking the factor's target range may
//! shrink the usable common prefix of overlapping suffix pairs, which
//! are pushed back down the heap (or removed outright) before the next
//! iteration.

use bit_vec::BitVec;

use crate::factor::{Factor, FactorBuffer};
use crate::heap::ArrayMaxHeap;
use crate::textindex::TextIndex;

/// Runs the factorization described in spec §4.5 and returns the
/// resulting (unsorted) `FactorBuffer`. The caller is expected to
/// `sort()` (and optionally `flatten()`) the result before encoding.
pub fn factorize(index: &mut TextIndex, threshold: usize) -> FactorBuffer {
    let n = index.len();
    let mut heap = ArrayMaxHeap::new(n);
    for i in 1..n {
        if index.lcp(i) >= threshold {
            heap.insert(i, |k| index.lcp(k) as u64);
        }
    }

    let mut marked = BitVec::from_elem(n, false);
    let mut factors = FactorBuffer::new();

    while let Some(i_star) = heap.get_max() {
        let l = index.lcp(i_star);
        if l < threshold {
            break;
        }
        let p = index.sa(i_star);
        let s = index.sa(i_star - 1);
        let (tgt, src) = if p > s { (p, s) } else { (s, p) };

        let len = unmarked_run(&marked, tgt, l);
        if len >= threshold {
            factors.push(Factor::new(tgt, src, len));
            for q in tgt..tgt + len {
                marked.set(q, true);
            }
            refresh_neighbors(index, &mut heap, &marked, threshold, tgt, len);
        }

        heap.remove(i_star, |k| index.lcp(k) as u64);
    }

    factors
}

/// Longest prefix of `[start, start+max_len)` that is entirely unmarked.
fn unmarked_run(marked: &BitVec, start: usize, max_len: usize) -> usize {
    let n = marked.len();
    let mut len = 0;
    while len < max_len && start + len < n && !marked[start + len] {
        len += 1;
    }
    len
}

/// After marking `[tgt, tgt+len)`, every suffix-array slot whose
/// neighbor relationship touches a position in that range may have had
/// its effective (still-usable) common prefix shrink. Recomputed
/// conservatively as the common prefix length capped by how far each
/// of the two suffixes runs before hitting a marked byte, so whichever
/// orientation is later chosen as the target is guaranteed to still be
/// unmarked for its full claimed length (the main loop re-clamps again
/// regardless, so this is a performance refresh, not a correctness
/// requirement).
fn refresh_neighbors(
    index: &mut TextIndex,
    heap: &mut ArrayMaxHeap,
    marked: &BitVec,
    threshold: usize,
    tgt: usize,
    len: usize,
) {
    for q in tgt..tgt + len {
        let k = index.isa(q);
        for cand in [k, k + 1] {
            if cand == 0 || cand >= index.len() || !heap.contains(cand) {
                continue;
            }
            let a = index.sa(cand - 1);
            let b = index.sa(cand);
            let old = index.lcp(cand);
            let new_len = old
                .min(unmarked_run(marked, a, old))
                .min(unmarked_run(marked, b, old));
            if new_len == old {
                continue;
            }
            if new_len >= threshold {
                index.set_lcp(cand, new_len);
                heap.decrease_key(cand, |j| index.lcp(j) as u64);
            } else {
                index.set_lcp(cand, 0);
                heap.remove(cand, |j| index.lcp(j) as u64);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip_literal_check(text: &[u8], threshold: usize) {
        let mut index = TextIndex::build(text.to_vec());
        let mut factors = factorize(&mut index, threshold);
        factors.sort();
        factors.flatten();

        // Replay factors left to right against a growing output buffer
        // and confirm it reproduces the original text exactly.
        let n = text.len();
        let mut marked = vec![false; n];
        for f in factors.iter() {
            for k in 0..f.len {
                marked[f.pos + k] = true;
            }
        }
        // After flatten(), every factor's source range is guaranteed to
        // lie entirely in unmarked (literal) text, so filling literals
        // first and then applying copies in any order reproduces the
        // text exactly.
        let mut out = vec![0u8; n];
        for i in 0..n {
            if !marked[i] {
                out[i] = text[i];
            }
        }
        for f in factors.iter() {
            for k in 0..f.len {
                assert!(!marked[f.src + k], "flatten left a factor referencing a covered position");
                out[f.pos + k] = out[f.src + k];
            }
        }
        assert_eq!(out, text, "factorization did not reproduce the original text");

        for f in factors.iter() {
            assert!(f.src < f.pos);
            assert!(f.len >= threshold);
            assert!(f.pos + f.len <= n);
        }
    }

    #[test]
    fn abracadabra() {
        roundtrip_literal_check(b"abracadabra\0", 2);
    }

    #[test]
    fn all_same_byte() {
        roundtrip_literal_check(b"aaaaaaaa\0", 2);
    }

    #[test]
    fn mississippi() {
        roundtrip_literal_check(b"mississippi\0", 2);
    }

    #[test]
    fn no_repeats() {
        roundtrip_literal_check(b"abcdef\0", 2);
    }

    #[test]
    fn empty_text() {
        roundtrip_literal_check(b"\0", 2);
    }

    #[test]
    fn high_threshold_yields_no_factors() {
        let mut index = TextIndex::build(b"abracadabra\0".to_vec());
        let factors = factorize(&mut index, 100);
        assert!(factors.is_empty());
    }
}
