// Copyright 2025 Logan Magee
//
// SPDX-License-Identifier: Apache-2.0

//! Serialized artifact format.
//!
//! Every artifact starts with the same header: magic, format version, and a one-byte codec tag.
//! The body is the artifact's side channels and payload, with fixed-width fields little-endian
//! and counts and symbols as varints. The layout exists so a harness can store artifacts and
//! decode them later; nothing here recomputes what compression produced.

use std::{
    collections::BTreeMap,
    io::{Read, Write},
};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use integer_encoding::{VarIntReader, VarIntWriter};

use crate::{
    delta::DeltaArtifact,
    elias_fano::{EliasFanoArtifact, EliasFanoBucket},
    error::Error,
    header::{MAGIC, VERSION},
    repair::{RePairArtifact, Rule},
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
enum Codec {
    Delta = 1,
    EliasFano = 2,
    RePair = 3,
}

impl Codec {
    fn from_u8(value: u8) -> Result<Self, Error> {
        match value {
            1 => Ok(Self::Delta),
            2 => Ok(Self::EliasFano),
            3 => Ok(Self::RePair),
            _ => Err(Error::UnknownCodec(value)),
        }
    }
}

/// A deserialized artifact of any codec.
///
/// Readers dispatch on the codec tag in the header, so callers that only want a suffix array
/// back do not need to know which codec produced a file.
pub enum Artifact {
    /// A Delta artifact.
    Delta(DeltaArtifact),
    /// An Elias-Fano artifact.
    EliasFano(EliasFanoArtifact),
    /// A Re-Pair artifact.
    RePair(RePairArtifact),
}

impl Artifact {
    /// Reads any serialized artifact.
    ///
    /// # Errors
    ///
    /// Returns an error if the header's magic, version, or codec tag is invalid, if a declared
    /// field is inconsistent, or if an I/O error occurs.
    pub fn from_reader<R>(reader: &mut R) -> Result<Self, Error>
    where
        R: Read + ?Sized,
    {
        let magic = reader.read_u32::<LittleEndian>()?;
        if magic != MAGIC {
            return Err(Error::BadMagic(magic));
        }
        let version = reader.read_u32::<LittleEndian>()?;
        if version != VERSION {
            return Err(Error::UnsupportedVersion(version));
        }

        match Codec::from_u8(reader.read_u8()?)? {
            Codec::Delta => read_delta(reader).map(Self::Delta),
            Codec::EliasFano => read_elias_fano(reader).map(Self::EliasFano),
            Codec::RePair => read_repair(reader).map(Self::RePair),
        }
    }

    /// Decodes the suffix array, whichever codec produced the artifact.
    ///
    /// # Errors
    ///
    /// Propagates the wrapped codec's decompression errors.
    pub fn decompress(&self) -> Result<Vec<u32>, Error> {
        match self {
            Self::Delta(artifact) => crate::delta::decompress(artifact),
            Self::EliasFano(artifact) => crate::elias_fano::decompress(artifact),
            Self::RePair(artifact) => crate::repair::decompress(artifact),
        }
    }
}

fn write_header<W>(writer: &mut W, codec: Codec) -> Result<(), Error>
where
    W: Write + ?Sized,
{
    writer.write_u32::<LittleEndian>(MAGIC)?;
    writer.write_u32::<LittleEndian>(VERSION)?;
    writer.write_u8(codec as u8)?;

    Ok(())
}

impl DeltaArtifact {
    /// Serializes the artifact.
    ///
    /// # Errors
    ///
    /// Returns an error if an I/O error occurs while writing.
    pub fn to_writer<W>(&self, mut writer: &mut W) -> Result<(), Error>
    where
        W: Write + ?Sized,
    {
        write_header(writer, Codec::Delta)?;
        writer.write_varint(self.len())?;
        writer.write_varint(self.missing_rank())?;
        writer.write_varint(self.buckets().len())?;
        for (&symbol, deltas) in self.buckets() {
            writer.write_u8(symbol)?;
            writer.write_varint(deltas.len())?;
            for &delta in deltas {
                writer.write_i16::<LittleEndian>(delta)?;
            }
        }

        Ok(())
    }
}

fn read_delta<R>(mut reader: &mut R) -> Result<DeltaArtifact, Error>
where
    R: Read + ?Sized,
{
    let len = reader.read_varint::<u32>()?;
    let missing_rank = reader.read_varint::<u32>()?;
    let bucket_count = reader.read_varint::<usize>()?;

    let mut buckets = BTreeMap::new();
    for _ in 0..bucket_count {
        let symbol = reader.read_u8()?;
        let count = reader.read_varint::<usize>()?;
        let mut deltas = Vec::new();
        for _ in 0..count {
            deltas.push(reader.read_i16::<LittleEndian>()?);
        }
        buckets.insert(symbol, deltas);
    }

    Ok(DeltaArtifact::from_parts(buckets, len, missing_rank))
}

impl EliasFanoArtifact {
    /// Serializes the artifact, bit vectors and side channels together.
    ///
    /// # Errors
    ///
    /// Returns an error if an I/O error occurs while writing.
    pub fn to_writer<W>(&self, mut writer: &mut W) -> Result<(), Error>
    where
        W: Write + ?Sized,
    {
        write_header(writer, Codec::EliasFano)?;
        writer.write_varint(self.len())?;
        writer.write_varint(self.missing_rank())?;
        writer.write_varint(self.buckets().len())?;
        for bucket in self.buckets() {
            writer.write_u8(bucket.leading_bits())?;
            writer.write_u8(bucket.lower_bits())?;
            writer.write_varint(bucket.bit_len())?;
            writer.write_varint(bucket.bytes().len())?;
            writer.write_all(bucket.bytes())?;
        }

        Ok(())
    }
}

fn read_elias_fano<R>(mut reader: &mut R) -> Result<EliasFanoArtifact, Error>
where
    R: Read + ?Sized,
{
    let len = reader.read_varint::<u32>()?;
    let missing_rank = reader.read_varint::<u32>()?;
    let bucket_count = reader.read_varint::<usize>()?;

    let mut buckets = Vec::new();
    for _ in 0..bucket_count {
        let leading_bits = reader.read_u8()?;
        let lower_bits = reader.read_u8()?;
        // Widths a compressor can never produce: values are u32, and the leading part always
        // claims at least one of the total bits.
        if leading_bits > 32 || lower_bits > 31 {
            return Err(Error::BadWidths {
                leading: leading_bits,
                lower: lower_bits,
            });
        }
        let bit_len = reader.read_varint::<u32>()?;
        let byte_count = reader.read_varint::<usize>()?;
        let mut bytes = vec![0; byte_count];
        reader.read_exact(&mut bytes)?;
        buckets.push(EliasFanoBucket::from_parts(
            bytes,
            bit_len,
            leading_bits,
            lower_bits,
        ));
    }

    Ok(EliasFanoArtifact::from_parts(buckets, len, missing_rank))
}

impl RePairArtifact {
    /// Serializes the artifact, compressed sequence and rule table together.
    ///
    /// # Errors
    ///
    /// Returns an error if an I/O error occurs while writing.
    pub fn to_writer<W>(&self, mut writer: &mut W) -> Result<(), Error>
    where
        W: Write + ?Sized,
    {
        write_header(writer, Codec::RePair)?;
        writer.write_varint(self.len())?;
        writer.write_varint(self.seq().len())?;
        for &symbol in self.seq() {
            writer.write_varint(symbol)?;
        }
        writer.write_varint(self.rules().len())?;
        for rule in self.rules() {
            writer.write_varint(rule.left)?;
            writer.write_varint(rule.right)?;
        }

        Ok(())
    }
}

fn read_repair<R>(mut reader: &mut R) -> Result<RePairArtifact, Error>
where
    R: Read + ?Sized,
{
    let original_len = reader.read_varint::<u32>()?;
    let seq_count = reader.read_varint::<usize>()?;
    let mut seq = Vec::new();
    for _ in 0..seq_count {
        seq.push(reader.read_varint::<i64>()?);
    }
    let rule_count = reader.read_varint::<usize>()?;
    let mut rules = Vec::new();
    for _ in 0..rule_count {
        let left = reader.read_varint::<i64>()?;
        let right = reader.read_varint::<i64>()?;
        rules.push(Rule { left, right });
    }

    Ok(RePairArtifact::from_parts(seq, rules, original_len))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BANANA: &[u8] = b"banana\0";
    const BANANA_SA: [u32; 7] = [6, 5, 3, 1, 0, 4, 2];

    #[test]
    fn round_trips_delta_artifact() {
        let artifact = crate::delta::compress(BANANA, &BANANA_SA).unwrap();
        let mut encoded = Vec::new();
        artifact.to_writer(&mut encoded).unwrap();

        let read = Artifact::from_reader(&mut encoded.as_slice()).unwrap();
        assert!(matches!(read, Artifact::Delta(_)));
        assert_eq!(read.decompress().unwrap(), BANANA_SA);
    }

    #[test]
    fn round_trips_elias_fano_artifact() {
        let artifact = crate::elias_fano::compress(BANANA, &BANANA_SA).unwrap();
        let mut encoded = Vec::new();
        artifact.to_writer(&mut encoded).unwrap();

        let read = Artifact::from_reader(&mut encoded.as_slice()).unwrap();
        assert!(matches!(read, Artifact::EliasFano(_)));
        assert_eq!(read.decompress().unwrap(), BANANA_SA);
    }

    #[test]
    fn round_trips_repair_artifact() {
        let artifact = crate::repair::compress(&BANANA_SA);
        let mut encoded = Vec::new();
        artifact.to_writer(&mut encoded).unwrap();

        let read = Artifact::from_reader(&mut encoded.as_slice()).unwrap();
        assert!(matches!(read, Artifact::RePair(_)));
        assert_eq!(read.decompress().unwrap(), BANANA_SA);
    }

    #[test]
    fn rejects_bad_magic() {
        let encoded = [0, 0, 0, 0];

        assert!(matches!(
            Artifact::from_reader(&mut encoded.as_slice()),
            Err(Error::BadMagic(0)),
        ));
    }

    #[test]
    fn rejects_unsupported_version() {
        let mut encoded = Vec::new();
        encoded.extend_from_slice(&MAGIC.to_le_bytes());
        encoded.extend_from_slice(&99u32.to_le_bytes());

        assert!(matches!(
            Artifact::from_reader(&mut encoded.as_slice()),
            Err(Error::UnsupportedVersion(99)),
        ));
    }

    #[test]
    fn rejects_unknown_codec_tag() {
        let mut encoded = Vec::new();
        encoded.extend_from_slice(&MAGIC.to_le_bytes());
        encoded.extend_from_slice(&VERSION.to_le_bytes());
        encoded.push(7);

        assert!(matches!(
            Artifact::from_reader(&mut encoded.as_slice()),
            Err(Error::UnknownCodec(7)),
        ));
    }

    #[test]
    fn rejects_impossible_bucket_widths() {
        let artifact = crate::elias_fano::compress(BANANA, &BANANA_SA).unwrap();
        let mut encoded = Vec::new();
        artifact.to_writer(&mut encoded).unwrap();
        // 9 header bytes, then three single-byte varints (len 7, missing rank 4, bucket
        // count 3) put the first bucket's leading-width byte at offset 12
        assert_eq!(encoded[12], 2);
        encoded[12] = 200;

        assert!(matches!(
            Artifact::from_reader(&mut encoded.as_slice()),
            Err(Error::BadWidths { leading: 200, .. }),
        ));
    }
}
