//! LZSS-style factors and the buffer that collects, sorts, and flattens
//! them before encoding.
//!
//! Grounded on `tudocomp/compressors/LCPCompressor.hpp`'s pipeline
//! (factorize → `factors.sort()` → optionally `factors.flatten()` →
//! encode). The flatten algorithm itself rewrites a factor's source so
//! it never points into a region covered by another factor: every
//! rewrite moves `src` strictly earlier in the text (since a factor's
//! source always precedes its own target), so the fixed point is
//! reached in a bounded number of steps.

/// One back-reference: `len` bytes starting at output position `pos`
/// are a copy of the `len` bytes starting at output position `src`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Factor {
    pub pos: usize,
    pub src: usize,
    pub len: usize,
}

impl Factor {
    pub fn new(pos: usize, src: usize, len: usize) -> Self {
        debug_assert!(src < pos, "a factor's source must precede its target");
        Self { pos, src, len }
    }

    pub fn end(&self) -> usize {
        self.pos + self.len
    }
}

/// Collects factors as they're discovered, then sorts them by target
/// position and, optionally, flattens references so that no factor's
/// source range lies inside another factor's target range.
#[derive(Default)]
pub struct FactorBuffer {
    factors: Vec<Factor>,
}

impl FactorBuffer {
    pub fn new() -> Self {
        Self { factors: Vec::new() }
    }

    pub fn push(&mut self, factor: Factor) {
        self.factors.push(factor);
    }

    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    /// Orders factors by target position, the order an LZSS decoder
    /// consumes them in. Must be called before `flatten`.
    pub fn sort(&mut self) {
        self.factors.sort_by_key(|f| f.pos);
    }

    /// Rewrites every factor so its `src` never falls inside another
    /// factor's target range (reference chains of depth 1). Requires
    /// the buffer to already be sorted by `pos`.
    pub fn flatten(&mut self) {
        for i in 0..self.factors.len() {
            loop {
                let src = self.factors[i].src;
                let Some(j) = covering_factor(&self.factors, src) else {
                    break;
                };
                let f_prime = self.factors[j];
                let offset = src - f_prime.pos;
                let new_src = f_prime.src + offset;
                let new_len = self.factors[i].len.min(f_prime.len - offset);
                self.factors[i].src = new_src;
                self.factors[i].len = new_len;
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Factor> {
        self.factors.iter()
    }

    pub fn into_vec(self) -> Vec<Factor> {
        self.factors
    }
}

/// Finds the index of the factor whose `[pos, pos+len)` range contains
/// `p`, if any. `factors` must be sorted by `pos`.
fn covering_factor(factors: &[Factor], p: usize) -> Option<usize> {
    let idx = factors.partition_point(|f| f.pos <= p);
    if idx == 0 {
        return None;
    }
    let candidate = idx - 1;
    if p < factors[candidate].end() {
        Some(candidate)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_orders_by_target_position() {
        let mut buf = FactorBuffer::new();
        buf.push(Factor::new(10, 2, 3));
        buf.push(Factor::new(5, 1, 2));
        buf.sort();
        let v: Vec<_> = buf.iter().map(|f| f.pos).collect();
        assert_eq!(v, vec![5, 10]);
    }

    #[test]
    fn factor_end_is_pos_plus_len() {
        let f = Factor::new(8, 3, 4);
        assert_eq!(f.end(), 12);
    }

    #[test]
    fn covering_factor_finds_containing_range() {
        let factors = vec![Factor::new(10, 2, 3), Factor::new(20, 5, 4)];
        assert_eq!(covering_factor(&factors, 11), Some(0));
        assert_eq!(covering_factor(&factors, 22), Some(1));
        assert_eq!(covering_factor(&factors, 15), None);
    }

    #[test]
    fn flatten_rewrites_source_inside_earlier_factor() {
        // factor at pos=10 references src=1, which is itself inside the
        // target range [5,8) of the factor at pos=5 sourced at 0.
        let mut buf = FactorBuffer::new();
        buf.push(Factor::new(5, 0, 3));
        buf.push(Factor::new(10, 6, 2));
        buf.sort();
        buf.flatten();
        let v: Vec<_> = buf.iter().copied().collect();
        // pos=10 originally src=6 which lies inside [5,8): offset=1,
        // rewritten to src=0+1=1, len=min(2, 3-1)=2.
        assert_eq!(v[1], Factor::new(10, 1, 2));
    }

    #[test]
    fn flatten_is_a_no_op_when_nothing_overlaps() {
        let mut buf = FactorBuffer::new();
        buf.push(Factor::new(5, 0, 3));
        buf.push(Factor::new(20, 12, 4));
        buf.sort();
        buf.flatten();
        let v: Vec<_> = buf.iter().copied().collect();
        assert_eq!(v, vec![Factor::new(5, 0, 3), Factor::new(20, 12, 4)]);
    }

    #[test]
    fn flatten_follows_a_chain_of_depth_two() {
        // pos=20 -> src=6 (inside factor@5's [5,8)) -> rewritten src=1
        // (inside factor@0's... not applicable here, single hop check
        // with a genuine two-hop chain):
        let mut buf = FactorBuffer::new();
        buf.push(Factor::new(3, 0, 3)); // [3,6) <- [0,3)
        buf.push(Factor::new(8, 4, 3)); // [8,11) <- [4,7), and 4..7 overlaps [3,6)
        buf.push(Factor::new(20, 9, 2)); // [20,22) <- [9,11), overlaps [8,11)
        buf.sort();
        buf.flatten();
        let v: Vec<_> = buf.iter().copied().collect();
        // factor@8: src=4 inside [3,6) (offset=1) -> src=0+1=1, len=min(3,3-1)=2
        assert_eq!(v[1], Factor::new(8, 1, 2));
        // factor@20: src=9 inside [8,11) -> offset=1 -> using ORIGINAL
        // factor@8 state during the scan for factor@8 itself, but by
        // the time factor@20 is processed factor@8 has already been
        // rewritten to (8,1,2), so src=9 (offset=1) -> new_src=1+1=2,
        // len=min(2, 2-1)=1.
        assert_eq!(v[2], Factor::new(20, 2, 1));
    }
}
