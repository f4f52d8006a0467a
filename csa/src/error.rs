// Copyright 2025 Logan Magee
//
// SPDX-License-Identifier: Apache-2.0

use std::io;

use thiserror::Error;

/// An error raised while deriving, encoding, or decoding a compressed suffix array.
///
/// Every failure is local to the call that produced it. No codec keeps state across calls, so a
/// failed compression or decompression never poisons a later one.
#[derive(Debug, Error)]
pub enum Error {
    /// The input suffix array is not a permutation of `0..len`.
    #[error("suffix array of length {len} is not a permutation of 0..{len}")]
    NotAPermutation {
        /// Length of the rejected suffix array.
        len: usize,
    },

    /// The text is not terminated by a single trailing sentinel byte.
    #[error("text must end with a 0x00 sentinel and contain it nowhere else")]
    BadSentinel,

    /// The text and suffix array passed to a compressor have different lengths.
    #[error("text length {text_len} does not match suffix array length {sa_len}")]
    TextLengthMismatch {
        /// Length of the text.
        text_len: usize,
        /// Length of the suffix array.
        sa_len: usize,
    },

    /// The number of increasing Psi runs does not match the alphabet size.
    #[error("found {found} increasing runs for an alphabet of {expected} symbols")]
    AlphabetMismatch {
        /// Number of runs a valid suffix array over the alphabet would produce.
        expected: usize,
        /// Number of runs actually found.
        found: usize,
    },

    /// A Psi value points outside the array during inversion.
    #[error("psi value {value} at rank {rank} is out of range")]
    InvalidPsi {
        /// Rank at which the bad value was read.
        rank: usize,
        /// The out-of-range value.
        value: u32,
    },

    /// A delta value does not fit the codec's 16-bit width.
    #[error("value {value} does not fit the 16-bit delta width")]
    DeltaOverflow {
        /// The unrepresentable value.
        value: i64,
    },

    /// A decoded artifact produced the wrong number of elements.
    #[error("expected {expected} decoded elements, found {found}")]
    LengthMismatch {
        /// Element count the artifact declares.
        expected: usize,
        /// Element count actually decoded.
        found: usize,
    },

    /// An encoded bit vector ended before its declared length.
    #[error("encoded bit stream ended after {available} of {needed} bits")]
    TruncatedBitStream {
        /// Bits the decoder needed to read.
        needed: usize,
        /// Bits the bucket actually holds.
        available: usize,
    },

    /// A substituted Re-Pair symbol has no rule in the artifact's dictionary.
    #[error("no substitution rule for symbol {symbol}")]
    MissingRule {
        /// The symbol without a rule.
        symbol: i64,
    },

    /// A decoded value falls outside `0..len`.
    #[error("decoded value {value} is outside 0..{len}")]
    ValueOutOfRange {
        /// The out-of-range value.
        value: i64,
        /// Length of the array being reconstructed.
        len: usize,
    },

    /// A serialized Elias-Fano bucket declares impossible bit widths.
    #[error("bucket bit widths ({leading}, {lower}) are invalid")]
    BadWidths {
        /// Declared leading-part width.
        leading: u8,
        /// Declared lower-part width.
        lower: u8,
    },

    /// A serialized artifact has the wrong magic number.
    #[error("bad magic: found {0:#010x}")]
    BadMagic(u32),

    /// A serialized artifact has an unsupported format version.
    #[error("unsupported version: {0}")]
    UnsupportedVersion(u32),

    /// A serialized artifact declares an unknown codec tag.
    #[error("unknown codec tag: {0}")]
    UnknownCodec(u8),

    /// An I/O error occurred while reading or writing a serialized artifact.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
