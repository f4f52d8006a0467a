// Copyright 2025 Logan Magee
//
// SPDX-License-Identifier: Apache-2.0

//! The Psi function and its per-symbol increasing runs.

use std::collections::BTreeMap;
use std::mem;

use crate::error::Error;

/// The Psi function of a suffix array.
///
/// `Psi` maps the rank of a suffix to the rank of the same suffix with its first character
/// removed. Restricted to the block of ranks whose suffixes share a first character, the mapping
/// is strictly increasing, which is the property every codec in this crate compresses.
///
/// # Examples
///
/// ```
/// use csa::Psi;
///
/// // The suffix array of b"banana\0"
/// let sa = [6, 5, 3, 1, 0, 4, 2];
/// let psi = Psi::from_suffix_array(&sa)?;
///
/// assert_eq!(psi.to_suffix_array()?, sa);
/// # Ok::<(), csa::Error>(())
/// ```
pub struct Psi {
    values: Vec<u32>,
    missing_rank: u32,
}

impl Psi {
    /// The marker stored at the rank of the sentinel-terminated one-character suffix, which has
    /// no successor.
    pub const SENTINEL: u32 = u32::MAX;

    /// Derives the Psi function from a suffix array.
    ///
    /// The auxiliary offset-to-rank mapping is built in one pass, so this operation is
    /// *O*(*n*).
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAPermutation`] if `sa` is not a permutation of `0..sa.len()`.
    pub fn from_suffix_array(sa: &[u32]) -> Result<Self, Error> {
        let n = sa.len();
        if n > u32::MAX as usize {
            return Err(Error::NotAPermutation { len: n });
        }

        // rank_of[offset] = rank of the suffix starting at offset
        let mut rank_of = vec![Self::SENTINEL; n];
        for (i, &offset) in sa.iter().enumerate() {
            let offset = offset as usize;
            if offset >= n || rank_of[offset] != Self::SENTINEL {
                return Err(Error::NotAPermutation { len: n });
            }
            rank_of[offset] = i as u32;
        }

        let mut values = vec![0; n];
        let mut missing_rank = 0;
        for (i, &offset) in sa.iter().enumerate() {
            if offset == 0 {
                missing_rank = i as u32;
            }
            values[i] = if offset as usize == n - 1 {
                Self::SENTINEL
            } else {
                rank_of[offset as usize + 1]
            };
        }

        Ok(Self {
            values,
            missing_rank,
        })
    }

    /// Reassembles a Psi function a decoder has reconstructed.
    pub(crate) fn from_parts(values: Vec<u32>, missing_rank: u32) -> Self {
        Self {
            values,
            missing_rank,
        }
    }

    /// Returns the Psi values, with [`Psi::SENTINEL`] at the rank of the sentinel suffix.
    #[must_use]
    pub fn values(&self) -> &[u32] {
        &self.values
    }

    /// Returns the rank of the suffix starting at offset 0, which seeds inversion.
    #[must_use]
    pub fn missing_rank(&self) -> u32 {
        self.missing_rank
    }

    /// Returns the number of ranks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the Psi function is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Partitions the Psi values into one strictly increasing run per alphabet symbol.
    ///
    /// Ranks `1..n` are scanned in order and a new run starts wherever a value decreases. Runs
    /// are paired with alphabet symbols in alphabet order, which map iteration preserves.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlphabetMismatch`] if the number of runs found differs from the alphabet
    /// size, which means the suffix array and text are inconsistent.
    pub fn increasing_runs(&self, alphabet: &[u8]) -> Result<BTreeMap<u8, Vec<u32>>, Error> {
        let mut runs = Vec::new();
        let mut current = Vec::new();

        for i in 1..self.values.len() {
            if i > 1 && self.values[i - 1] > self.values[i] {
                runs.push(mem::take(&mut current));
            }
            current.push(self.values[i]);
        }
        if !current.is_empty() {
            runs.push(current);
        }

        if runs.len() != alphabet.len() {
            return Err(Error::AlphabetMismatch {
                expected: alphabet.len(),
                found: runs.len(),
            });
        }

        Ok(alphabet.iter().copied().zip(runs).collect())
    }

    /// Reconstructs the suffix array this Psi function was derived from.
    ///
    /// Starting from [`missing_rank`](Self::missing_rank), each application of Psi yields the
    /// rank of a one-character-longer prefix removal, so a single walk of length `n` recovers
    /// every entry. *O*(*n*), no recursion.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPsi`] if a value points outside the array, which means the Psi
    /// function was reconstructed from a corrupt artifact.
    pub fn to_suffix_array(&self) -> Result<Vec<u32>, Error> {
        let n = self.values.len();
        let mut sa = vec![0; n];
        if n == 0 {
            return Ok(sa);
        }

        let mut j = self.missing_rank as usize;
        if j >= n {
            return Err(Error::InvalidPsi {
                rank: 0,
                value: self.missing_rank,
            });
        }
        sa[j] = 0;
        for i in 1..n {
            let next = self.values[j];
            if next as usize >= n {
                return Err(Error::InvalidPsi {
                    rank: j,
                    value: next,
                });
            }
            j = next as usize;
            sa[j] = i as u32;
        }

        Ok(sa)
    }
}

/// Returns the sorted distinct symbols of `text`, excluding the sentinel.
#[must_use]
pub fn alphabet(text: &[u8]) -> Vec<u8> {
    let mut seen = [false; 256];
    for &byte in text {
        seen[byte as usize] = true;
    }

    (1..=u8::MAX).filter(|&b| seen[b as usize]).collect()
}

/// Checks that `text` is a sentinel-terminated byte string.
///
/// The empty text is valid: there is nothing to terminate.
pub(crate) fn check_text(text: &[u8]) -> Result<(), Error> {
    if text.is_empty() {
        return Ok(());
    }

    match text.split_last() {
        Some((0, body)) if !body.contains(&0) => Ok(()),
        _ => Err(Error::BadSentinel),
    }
}

/// Derives the per-symbol increasing runs both Psi-based codecs compress.
pub(crate) fn runs_of(text: &[u8], sa: &[u32]) -> Result<(Psi, BTreeMap<u8, Vec<u32>>), Error> {
    if text.len() != sa.len() {
        return Err(Error::TextLengthMismatch {
            text_len: text.len(),
            sa_len: sa.len(),
        });
    }
    check_text(text)?;

    let psi = Psi::from_suffix_array(sa)?;
    let runs = psi.increasing_runs(&alphabet(text))?;

    Ok((psi, runs))
}
