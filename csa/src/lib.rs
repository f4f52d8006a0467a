// Copyright 2025 Logan Magee
//
// SPDX-License-Identifier: Apache-2.0

//! Compact, exactly-invertible encodings of suffix arrays.
//!
//! This crate re-expresses a suffix array through its Psi function, whose values form one
//! strictly increasing run per alphabet symbol, and compresses that structure with three
//! independent codecs: difference coding ([`delta`]), a succinct monotone-sequence encoding
//! ([`elias_fano`]), and grammar-based pair substitution over the raw first-difference array
//! ([`repair`]). Each codec reconstructs the original suffix array bit-for-bit; the three are
//! alternative representations of the same artifact and are never composed.
//!
//! Suffix array construction is out of scope: compressors consume a sentinel-terminated byte
//! string together with its already-built suffix array (a permutation of `0..n`), e.g. from the
//! workspace's `sufsort` crate.
//!
//! # Examples
//!
//! Compressing a text's suffix array and recovering it exactly:
//!
//! ```
//! let mut text = b"mississippi".to_vec();
//! // The codecs expect a trailing 0 sentinel
//! text.push(0);
//! let sa = sufsort::SuffixArray::new(&text);
//!
//! let artifact = csa::elias_fano::compress(&text, sa.as_slice())?;
//! assert_eq!(csa::elias_fano::decompress(&artifact)?, sa.as_slice());
//! # Ok::<(), csa::Error>(())
//! ```
//!
//! Artifacts can be serialized and decoded later without knowing which codec wrote them:
//!
//! ```
//! use csa::Artifact;
//!
//! let mut text = b"mississippi".to_vec();
//! text.push(0);
//! let sa = sufsort::SuffixArray::new(&text);
//!
//! let mut encoded = Vec::new();
//! csa::repair::compress(sa.as_slice()).to_writer(&mut encoded)?;
//!
//! let artifact = Artifact::from_reader(&mut encoded.as_slice())?;
//! assert_eq!(artifact.decompress()?, sa.as_slice());
//! # Ok::<(), csa::Error>(())
//! ```

mod bits;
pub mod delta;
pub mod elias_fano;
mod error;
mod format;
mod header;
pub mod psi;
pub mod repair;

pub use error::Error;
pub use format::Artifact;
pub use psi::Psi;
