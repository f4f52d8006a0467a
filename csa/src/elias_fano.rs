// Copyright 2025 Logan Magee
//
// SPDX-License-Identifier: Apache-2.0

//! Succinct monotone-sequence coding of the Psi function.
//!
//! Each per-symbol increasing run is split into fixed-width lower bits, stored verbatim, and
//! leading bits, stored as a unary-coded occupancy histogram. The two streams are concatenated
//! into one bit vector per run. The bit vector is not self-describing: its exact bit length and
//! the `(leading_bits, lower_bits)` width pair are side channels that must travel with it, and
//! the artifact keeps all three together.

use log::debug;

use crate::{
    bits::{BitReader, BitWriter},
    error::Error,
    psi::{self, Psi},
};

/// One encoded increasing run and the side channels required to decode it.
pub struct EliasFanoBucket {
    bytes: Vec<u8>,
    bit_len: u32,
    leading_bits: u8,
    lower_bits: u8,
}

impl EliasFanoBucket {
    pub(crate) fn from_parts(bytes: Vec<u8>, bit_len: u32, leading_bits: u8, lower_bits: u8) -> Self {
        Self {
            bytes,
            bit_len,
            leading_bits,
            lower_bits,
        }
    }

    /// Returns the packed bit vector, zero-padded to whole bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the exact length of the bit vector in bits.
    #[must_use]
    pub fn bit_len(&self) -> u32 {
        self.bit_len
    }

    /// Returns the number of bits in each element's leading part.
    #[must_use]
    pub fn leading_bits(&self) -> u8 {
        self.leading_bits
    }

    /// Returns the number of bits in each element's lower part.
    #[must_use]
    pub fn lower_bits(&self) -> u8 {
        self.lower_bits
    }
}

/// A suffix array compressed with the Elias-Fano codec.
pub struct EliasFanoArtifact {
    buckets: Vec<EliasFanoBucket>,
    len: u32,
    missing_rank: u32,
}

impl EliasFanoArtifact {
    pub(crate) fn from_parts(buckets: Vec<EliasFanoBucket>, len: u32, missing_rank: u32) -> Self {
        Self {
            buckets,
            len,
            missing_rank,
        }
    }

    /// Returns the encoded buckets, in alphabet order.
    #[must_use]
    pub fn buckets(&self) -> &[EliasFanoBucket] {
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

/// Compresses a suffix array by Elias-Fano-coding its Psi function.
///
/// # Errors
///
/// Returns an error if `text` and `sa` are not a consistent sentinel-terminated text and suffix
/// array pair.
///
/// # Examples
///
/// ```
/// let mut text = b"banana".to_vec();
/// text.push(0);
/// let sa = sufsort::SuffixArray::new(&text);
///
/// let artifact = csa::elias_fano::compress(&text, sa.as_slice())?;
/// assert_eq!(csa::elias_fano::decompress(&artifact)?, sa.as_slice());
/// # Ok::<(), csa::Error>(())
/// ```
pub fn compress(text: &[u8], sa: &[u32]) -> Result<EliasFanoArtifact, Error> {
    let (psi, runs) = psi::runs_of(text, sa)?;

    let buckets = runs
        .iter()
        .map(|(&symbol, run)| {
            let bucket = encode_run(run);
            debug!(
                "elias-fano: symbol {:#04x} count {} widths ({}, {})",
                symbol,
                run.len(),
                bucket.leading_bits,
                bucket.lower_bits,
            );
            bucket
        })
        .collect();

    Ok(EliasFanoArtifact {
        buckets,
        len: psi.len() as u32,
        missing_rank: psi.missing_rank(),
    })
}

/// Reconstructs the suffix array from an Elias-Fano artifact.
///
/// # Errors
///
/// Returns an error if a bit vector ends before its declared content does, or if the decoded
/// element count or any decoded value is inconsistent with the artifact's declared length.
pub fn decompress(artifact: &EliasFanoArtifact) -> Result<Vec<u32>, Error> {
    let n = artifact.len as usize;
    if n == 0 {
        return Ok(Vec::new());
    }

    let mut values = Vec::with_capacity(n);
    values.push(Psi::SENTINEL);
    for bucket in &artifact.buckets {
        decode_run(bucket, &mut values)?;
    }

    if values.len() != n {
        return Err(Error::LengthMismatch {
            expected: n,
            found: values.len(),
        });
    }
    for &value in &values[1..] {
        if value as usize >= n {
            return Err(Error::ValueOutOfRange {
                value: i64::from(value),
                len: n,
            });
        }
    }

    Psi::from_parts(values, artifact.missing_rank).to_suffix_array()
}

/// Returns the smallest width `w >= 1` with `2^w > value`.
fn bits_to_express(value: u32) -> u8 {
    ((u32::BITS - value.leading_zeros()).max(1)) as u8
}

fn encode_run(run: &[u32]) -> EliasFanoBucket {
    let count = run.len() as u32;
    let max = run[run.len() - 1];
    let leading_bits = bits_to_express(count);
    let total_bits = bits_to_express(max);
    // The run can need as many leading bits as total bits (count close to max); the leading
    // part then carries whole values and the lower stream is empty.
    let lower_bits = total_bits.saturating_sub(leading_bits);

    let mut histogram = vec![0u32; 1 << leading_bits];
    for &value in run {
        histogram[(value >> lower_bits) as usize] += 1;
    }

    // Leading stream: one unary run per histogram cell, each terminated by a zero, so its
    // length is always count + 2^leading_bits.
    let mut writer = BitWriter::new();
    for &occupancy in &histogram {
        for _ in 0..occupancy {
            writer.push(true);
        }
        writer.push(false);
    }
    if lower_bits > 0 {
        let mask = (1 << lower_bits) - 1;
        for &value in run {
            writer.write_bits(value & mask, lower_bits);
        }
    }

    EliasFanoBucket {
        bit_len: writer.bit_len() as u32,
        bytes: writer.into_bytes(),
        leading_bits,
        lower_bits,
    }
}

fn decode_run(bucket: &EliasFanoBucket, values: &mut Vec<u32>) -> Result<(), Error> {
    let mut reader = BitReader::new(&bucket.bytes, bucket.bit_len as usize);

    let cells = 1u64 << u64::from(bucket.leading_bits.min(63));
    if cells > reader.bit_len() as u64 {
        return Err(Error::TruncatedBitStream {
            needed: cells as usize,
            available: reader.bit_len(),
        });
    }

    // Replay the unary histogram: ones count a cell's occupancy, a zero closes the cell.
    let mut histogram = vec![0u32; cells as usize];
    for occupancy in &mut histogram {
        loop {
            match reader.read() {
                Some(true) => *occupancy += 1,
                Some(false) => break,
                None => {
                    return Err(Error::TruncatedBitStream {
                        needed: reader.pos() + 1,
                        available: reader.bit_len(),
                    });
                }
            }
        }
    }

    if bucket.lower_bits == 0 {
        // Degenerate split: the leading part alone is the value.
        for (cell, &occupancy) in histogram.iter().enumerate() {
            for _ in 0..occupancy {
                values.push(cell as u32);
            }
        }
        return Ok(());
    }

    // Expanding cells in ascending order restores original element order: within one run the
    // leading parts never decrease.
    for (cell, &occupancy) in histogram.iter().enumerate() {
        for _ in 0..occupancy {
            let lower =
                reader
                    .read_bits(bucket.lower_bits)
                    .ok_or(Error::TruncatedBitStream {
                        needed: bucket.bit_len as usize,
                        available: reader.bit_len(),
                    })?;
            values.push((cell as u32) << bucket.lower_bits | lower);
        }
    }

    Ok(())
}
