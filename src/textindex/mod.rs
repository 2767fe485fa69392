//! Text index provider: produces the suffix array, inverse suffix
//! array, and LCP array (plus the Φ/PLCP intermediates) that the
//! factorizer needs.
//!
//! Grounded on two sources: the suffix-array doubling construction and
//! Kasai-style LCP scan in `Tomyyy-1337-Archiver/src/suffix_array.rs`,
//! and the Φ/PLCP/ISA derivation chain described in
//! `tudocomp/ds/providers/ISAFromSA.hpp` and spec §4.2 ("SA by any
//! linear/suffix-array algorithm; Φ from SA...; PLCP from Φ...; LCP
//! from PLCP...; ISA by inverse permutation").
//!
//! Suffix-array construction algorithm choice is explicitly out of
//! scope (spec Non-goals): this uses a straightforward O(n log^2 n)
//! rank-doubling sort, which is easy to verify correct and fast enough
//! for the offline, single-shot use this crate makes of it.

use crate::intvector::{bits_for, IntVector};

/// A text with a unique-minimum sentinel already appended, and its
/// suffix array / inverse suffix array / LCP array.
pub struct TextIndex {
    text: Vec<u8>,
    sa: IntVector,
    isa: IntVector,
    lcp: IntVector,
}

impl TextIndex {
    /// Builds the index over `text`, which must already end with a
    /// sentinel byte strictly smaller than every other byte in it (spec
    /// §3, "Text"). Appends nothing; the caller is the one asserting
    /// the sentinel invariant, mirroring spec §4.2's "the provider
    /// guarantees the text has a unique-minimum sentinel" (a
    /// precondition this constructor checks rather than silently fixes).
    pub fn build(text: Vec<u8>) -> Self {
        let n = text.len();
        if n > 0 {
            let sentinel = text[n - 1];
            debug_assert!(
                text[..n - 1].iter().all(|&b| b > sentinel),
                "text must end in a unique-minimum sentinel"
            );
        }
        let sa_raw = suffix_array(&text);
        let isa_raw = inverse(&sa_raw);
        let lcp_raw = lcp_via_kasai(&text, &sa_raw, &isa_raw);

        let width = bits_for(n.max(1) as u64 - 1).max(1);
        let mut sa = IntVector::new(n, width, 0);
        let mut isa = IntVector::new(n, width, 0);
        let mut lcp = IntVector::new(n, width, 0);
        for i in 0..n {
            sa.set(i, sa_raw[i] as u64);
            isa.set(i, isa_raw[i] as u64);
            lcp.set(i, lcp_raw[i] as u64);
        }
        Self { text, sa, isa, lcp }
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn text(&self) -> &[u8] {
        &self.text
    }

    pub fn sa(&self, i: usize) -> usize {
        self.sa.get(i) as usize
    }

    pub fn isa(&self, pos: usize) -> usize {
        self.isa.get(pos) as usize
    }

    pub fn lcp(&self, i: usize) -> usize {
        self.lcp.get(i) as usize
    }

    /// Mutable access to a single LCP entry; the factorizer reuses the
    /// LCP array as transient working memory when it shrinks an entry
    /// via `decrease_key` (spec §5, "LCP... is borrowed mutably... and
    /// is logically transient working memory").
    pub fn set_lcp(&mut self, i: usize, value: usize) {
        self.lcp.set(i, value as u64);
    }
}

/// Rank-doubling suffix array construction, O(n log^2 n). Returns a
/// permutation of `0..n` such that suffixes are in ascending
/// lexicographic order.
fn suffix_array(text: &[u8]) -> Vec<usize> {
    let n = text.len();
    if n == 0 {
        return Vec::new();
    }
    let mut rank: Vec<i64> = text.iter().map(|&b| b as i64).collect();
    let mut sa: Vec<usize> = (0..n).collect();
    let mut tmp = vec![0i64; n];
    let mut k = 1;
    while k < n {
        let rank_at = |i: usize| -> i64 {
            if i < n {
                rank[i]
            } else {
                -1
            }
        };
        sa.sort_by(|&a, &b| {
            (rank[a], rank_at(a + k)).cmp(&(rank[b], rank_at(b + k)))
        });
        tmp[sa[0]] = 0;
        for i in 1..n {
            let prev = (rank[sa[i - 1]], rank_at(sa[i - 1] + k));
            let cur = (rank[sa[i]], rank_at(sa[i] + k));
            tmp[sa[i]] = tmp[sa[i - 1]] + if cur > prev { 1 } else { 0 };
        }
        std::mem::swap(&mut rank, &mut tmp);
        if rank[sa[n - 1]] as usize == n - 1 {
            break;
        }
        k *= 2;
    }
    sa
}

fn inverse(sa: &[usize]) -> Vec<usize> {
    let n = sa.len();
    let mut isa = vec![0; n];
    for (i, &p) in sa.iter().enumerate() {
        isa[p] = i;
    }
    isa
}

/// Φ[SA[i]] = SA[i-1], PLCP by the linear Kasai-style scan, LCP[i] =
/// PLCP[SA[i]] — spec §4.2's derivation chain, condensed into one pass
/// since this implementation only needs the end result, not the
/// intermediate arrays as separately addressable structures.
fn lcp_via_kasai(text: &[u8], sa: &[usize], isa: &[usize]) -> Vec<usize> {
    let n = text.len();
    let mut lcp = vec![0usize; n];
    if n == 0 {
        return lcp;
    }
    let mut h = 0usize;
    for i in 0..n {
        let rank = isa[i];
        if rank > 0 {
            let j = sa[rank - 1];
            while i + h < n && j + h < n && text[i + h] == text[j + h] {
                h += 1;
            }
            lcp[rank] = h;
            if h > 0 {
                h -= 1;
            }
        } else {
            h = 0;
        }
    }
    lcp
}
