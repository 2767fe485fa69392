//! # lcpcomp
//!
//! Lossless text compression via LCP-driven dictionary factorization.
//!
//! The hard core is `lcpfactorizer`: given a text index (suffix array,
//! inverse suffix array, LCP array), it greedily extracts the longest
//! available repeat at each step using a max-heap over LCP values, turning
//! the text into a sequence of literal runs and back-reference factors
//! (`factor::Factor`). `lzsscoder` then serializes those factors to a
//! compact bit stream via `bits::BitSink`/`BitSource`.
//!
//! Two alternative strategies share the same `Factor`/coder interfaces:
//! `lzss_window` (a simple bounded sliding-window factorizer) and `rle`
//! (a standalone run-length wrapper). `compressor` ties all three behind
//! one dispatch enum, selected at runtime by an algorithm string parsed
//! by `algorithm_string`.
//!
//! ## Buffer example
//!
//! ```rs
//! use lcpcomp::compressor::{Compressor, CompressorConfig};
//! let cfg = CompressorConfig::default();
//! let compressed = Compressor::Lcpcomp(cfg.clone()).compress(b"abracadabra\0");
//! let restored = Compressor::Lcpcomp(cfg).expand(&compressed).unwrap();
//! assert_eq!(restored, b"abracadabra\0");
//! ```

pub mod algorithm_string;
pub mod bits;
pub mod compressor;
pub mod factor;
pub mod heap;
pub mod intvector;
pub mod lcpfactorizer;
pub mod lzss_window;
pub mod lzsscoder;
pub mod rle;
pub mod textindex;

pub type DynErr = Box<dyn std::error::Error>;
pub type StdResult = Result<(), DynErr>;

/// Crate-wide error type, covering the four conceptual kinds named by
/// the external-interfaces design: a bad configuration (CLI flags or an
/// algorithm string that doesn't resolve), an I/O failure, a malformed
/// compressed stream, and an internal invariant violation.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("configuration error: {reason}")]
    Configuration { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("format error at bit {at_bit}: {reason}")]
    FormatError { at_bit: usize, reason: String },

    #[error("invariant violation: {reason}")]
    InvariantViolation { reason: String },
}
