// Copyright 2025 Logan Magee
//
// SPDX-License-Identifier: Apache-2.0

#![allow(missing_docs)]

use csa::{Artifact, Error};
use sufsort::SuffixArray;

/// Deterministic filler text over the given alphabet.
fn synthetic_text(len: usize, alphabet: &[u8], seed: u64) -> Vec<u8> {
    let mut state = seed | 1;
    let mut text: Vec<u8> = (0..len)
        .map(|_| {
            state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
            alphabet[(state >> 33) as usize % alphabet.len()]
        })
        .collect();
    text.push(0);

    text
}

fn assert_all_codecs_round_trip(text: &[u8]) {
    let sa = SuffixArray::new(text);
    let sa = sa.as_slice();

    let delta = csa::delta::compress(text, sa).unwrap();
    assert_eq!(csa::delta::decompress(&delta).unwrap(), sa);

    let elias_fano = csa::elias_fano::compress(text, sa).unwrap();
    assert_eq!(csa::elias_fano::decompress(&elias_fano).unwrap(), sa);

    let repair = csa::repair::compress(sa);
    assert_eq!(csa::repair::decompress(&repair).unwrap(), sa);
}

#[test]
fn all_codecs_round_trip_classic_texts() {
    for text in [
        &b"banana\0"[..],
        b"mississippi\0",
        b"abracadabra\0",
        b"the quick brown fox jumped over the lazy dog\0",
    ] {
        assert_all_codecs_round_trip(text);
    }
}

#[test]
fn all_codecs_round_trip_degenerate_texts() {
    assert_all_codecs_round_trip(b"\0");
    assert_all_codecs_round_trip(b"a\0");
    assert_all_codecs_round_trip(b"aaaaaaaa\0");
}

#[test]
fn all_codecs_round_trip_synthetic_texts() {
    let alphabets: [&[u8]; 3] = [b"ab", b"acgt", b"abcdefghijklmnopqrstuvwxyz"];

    for (i, alphabet) in alphabets.iter().enumerate() {
        for seed in 0..4 {
            let text = synthetic_text(1500 + 37 * seed as usize, alphabet, seed + i as u64 * 101);
            assert_all_codecs_round_trip(&text);
        }
    }
}

#[test]
fn serialized_artifacts_survive_storage() {
    let text = synthetic_text(2000, b"abcde", 7);
    let sa = SuffixArray::new(&text);
    let sa = sa.as_slice();

    let mut stored = Vec::new();
    csa::delta::compress(&text, sa).unwrap().to_writer(&mut stored).unwrap();
    let delta_end = stored.len();
    csa::elias_fano::compress(&text, sa).unwrap().to_writer(&mut stored).unwrap();
    let elias_fano_end = stored.len();
    csa::repair::compress(sa).to_writer(&mut stored).unwrap();

    // Each artifact is read back independently of the codec that wrote it
    for range in [0..delta_end, delta_end..elias_fano_end, elias_fano_end..stored.len()] {
        let artifact = Artifact::from_reader(&mut &stored[range]).unwrap();
        assert_eq!(artifact.decompress().unwrap(), sa);
    }
}

#[test]
fn delta_rejects_wide_psi_gaps() {
    // Alternating symbols push the first 'a' bucket value to k + 1, past the 16-bit width
    let mut text = b"ab".repeat(33_000);
    text.push(0);
    let sa = SuffixArray::new(&text);

    assert!(matches!(
        csa::delta::compress(&text, sa.as_slice()),
        Err(Error::DeltaOverflow { value: 33_001 }),
    ));
}
