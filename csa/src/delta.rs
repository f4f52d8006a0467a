// Copyright 2025 Logan Magee
//
// SPDX-License-Identifier: Apache-2.0

//! Difference coding of the Psi function.
//!
//! Each per-symbol increasing run is stored as its first value followed by the differences
//! between successive values. Psi gaps within a run stay small for natural-language alphabets,
//! so a fixed 16-bit width holds them; inputs where it does not are rejected rather than
//! truncated.

use std::collections::BTreeMap;

use log::debug;

use crate::{
    error::Error,
    psi::{self, Psi},
};

/// A suffix array compressed with the Delta codec.
///
/// The artifact is self-contained: alphabet order is the map's key order, and the original
/// length and inversion seed travel with the buckets.
pub struct DeltaArtifact {
    buckets: BTreeMap<u8, Vec<i16>>,
    len: u32,
    missing_rank: u32,
}

impl DeltaArtifact {
    pub(crate) fn from_parts(buckets: BTreeMap<u8, Vec<i16>>, len: u32, missing_rank: u32) -> Self {
        Self {
            buckets,
            len,
            missing_rank,
        }
    }

    /// Returns the per-symbol delta sequences, in alphabet order.
    #[must_use]
    pub fn buckets(&self) -> &BTreeMap<u8, Vec<i16>> {
        &self.buckets
    }

    /// Returns the length of the suffix array this artifact decodes to.
    #[must_use]
    pub fn len(&self) -> u32 {
        self.len
    }

    /// Returns `true` if the artifact decodes to an empty suffix array.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn missing_rank(&self) -> u32 {
        self.missing_rank
    }
}

/// Compresses a suffix array by difference-coding its Psi function.
///
/// # Errors
///
/// Returns an error if `text` and `sa` are not a consistent sentinel-terminated text and suffix
/// array pair, or [`Error::DeltaOverflow`] if any stored value exceeds the 16-bit width.
///
/// # Examples
///
/// ```
/// let mut text = b"banana".to_vec();
/// text.push(0);
/// let sa = sufsort::SuffixArray::new(&text);
///
/// let artifact = csa::delta::compress(&text, sa.as_slice())?;
/// assert_eq!(csa::delta::decompress(&artifact)?, sa.as_slice());
/// # Ok::<(), csa::Error>(())
/// ```
pub fn compress(text: &[u8], sa: &[u32]) -> Result<DeltaArtifact, Error> {
    let (psi, runs) = psi::runs_of(text, sa)?;

    let mut buckets = BTreeMap::new();
    for (symbol, run) in runs {
        let mut deltas = Vec::with_capacity(run.len());
        deltas.push(narrow(i64::from(run[0]))?);
        for pair in run.windows(2) {
            deltas.push(narrow(i64::from(pair[1]) - i64::from(pair[0]))?);
        }
        buckets.insert(symbol, deltas);
    }

    debug!(
        "delta: encoded {} ranks into {} buckets",
        psi.len(),
        buckets.len(),
    );

    Ok(DeltaArtifact {
        buckets,
        len: psi.len() as u32,
        missing_rank: psi.missing_rank(),
    })
}

/// Reconstructs the suffix array from a Delta artifact.
///
/// Each bucket is prefix-summed back to absolute Psi values, buckets are concatenated in
/// alphabet order starting at rank 1 (rank 0 is the implicit sentinel marker), and the result is
/// inverted.
///
/// # Errors
///
/// Returns an error if the artifact's element count or any reconstructed value is inconsistent
/// with its declared length.
pub fn decompress(artifact: &DeltaArtifact) -> Result<Vec<u32>, Error> {
    let n = artifact.len as usize;
    if n == 0 {
        return Ok(Vec::new());
    }

    let found = 1 + artifact.buckets.values().map(Vec::len).sum::<usize>();
    if found != n {
        return Err(Error::LengthMismatch {
            expected: n,
            found,
        });
    }

    let mut values = vec![0; n];
    values[0] = Psi::SENTINEL;
    let mut rank = 1;
    for deltas in artifact.buckets.values() {
        let mut current = 0;
        for (i, &delta) in deltas.iter().enumerate() {
            current = if i == 0 {
                i64::from(delta)
            } else {
                current + i64::from(delta)
            };
            if current < 0 || current >= n as i64 {
                return Err(Error::ValueOutOfRange {
                    value: current,
                    len: n,
                });
            }
            values[rank] = current as u32;
            rank += 1;
        }
    }

    Psi::from_parts(values, artifact.missing_rank).to_suffix_array()
}

fn narrow(value: i64) -> Result<i16, Error> {
    i16::try_from(value).map_err(|_| Error::DeltaOverflow { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BANANA: &[u8] = b"banana\0";
    const BANANA_SA: [u32; 7] = [6, 5, 3, 1, 0, 4, 2];

    #[test]
    fn encodes_banana_buckets_as_deltas() {
        let artifact = compress(BANANA, &BANANA_SA).unwrap();

        assert_eq!(artifact.buckets()[&b'a'], [0, 5, 1]);
        assert_eq!(artifact.buckets()[&b'b'], [3]);
        assert_eq!(artifact.buckets()[&b'n'], [1, 1]);
    }

    #[test]
    fn round_trips_banana() {
        let artifact = compress(BANANA, &BANANA_SA).unwrap();

        assert_eq!(decompress(&artifact).unwrap(), BANANA_SA);
    }

    #[test]
    fn round_trips_degenerate_texts() {
        for (text, sa) in [(&b""[..], &[][..]), (&b"\0"[..], &[0][..])] {
            let artifact = compress(text, sa).unwrap();
            assert_eq!(decompress(&artifact).unwrap(), sa);
        }
    }

    #[test]
    fn rejects_mismatched_lengths() {
        assert!(matches!(
            compress(BANANA, &[0, 1, 2]),
            Err(Error::TextLengthMismatch { .. }),
        ));
    }

    #[test]
    fn rejects_missing_sentinel() {
        let sa = [5, 3, 1, 0, 4, 2];

        assert!(matches!(
            compress(b"banana", &sa),
            Err(Error::BadSentinel),
        ));
    }

    #[test]
    fn overflows_on_wide_psi_gap() {
        // The suffix array of (ab)^k '\0' in closed form: the sentinel suffix, then the 'a'
        // suffixes shortest first, then the 'b' suffixes shortest first. For k > 32767 the
        // first 'a' bucket value (the rank of "b\0") exceeds the 16-bit width.
        let k: u32 = 33_000;
        let n = 2 * k + 1;
        let mut text = b"ab".repeat(k as usize);
        text.push(0);
        let mut sa = Vec::with_capacity(n as usize);
        sa.push(n - 1);
        sa.extend((0..k).map(|i| n - 3 - 2 * i));
        sa.extend((0..k).map(|i| n - 2 - 2 * i));

        assert!(matches!(
            compress(&text, &sa),
            Err(Error::DeltaOverflow { value: 33_001 }),
        ));
    }

    #[test]
    fn rejects_truncated_artifact() {
        let mut buckets = BTreeMap::new();
        buckets.insert(b'a', vec![0, 5]);
        let artifact = DeltaArtifact::from_parts(buckets, 7, 4);

        assert!(matches!(
            decompress(&artifact),
            Err(Error::LengthMismatch {
                expected: 7,
                found: 3,
            }),
        ));
    }
}
