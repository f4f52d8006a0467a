// Copyright 2025 Logan Magee
//
// SPDX-License-Identifier: Apache-2.0

use core::mem;

/// Computes the suffix array of `data` by prefix doubling.
///
/// Suffixes are sorted by their first `k` characters for doubling `k`, comparing a suffix as the
/// pair of its rank and the rank of the suffix `k` positions later (0 when none exists, which
/// orders a shorter suffix before any extension of it). The loop ends once every rank is
/// distinct, after at most log₂ *n* rounds of *O*(*n* log *n*) sorting.
pub(crate) fn doubling(data: &[u8]) -> Vec<u32> {
    let n = data.len();
    if n == 0 {
        return Vec::new();
    }

    let mut suffix_array: Vec<u32> = (0..n as u32).collect();
    let mut rank: Vec<u32> = data.iter().map(|&b| u32::from(b)).collect();
    let mut next_rank = vec![0; n];

    let mut k = 1;
    loop {
        let key = |i: u32| {
            let i = i as usize;
            let tail = if i + k < n { rank[i + k] + 1 } else { 0 };
            (rank[i], tail)
        };

        suffix_array.sort_unstable_by_key(|&i| key(i));

        next_rank[suffix_array[0] as usize] = 0;
        for w in 1..n {
            let bump = u32::from(key(suffix_array[w - 1]) != key(suffix_array[w]));
            next_rank[suffix_array[w] as usize] = next_rank[suffix_array[w - 1] as usize] + bump;
        }
        mem::swap(&mut rank, &mut next_rank);

        if rank[suffix_array[n - 1] as usize] as usize == n - 1 {
            break;
        }
        k *= 2;
    }

    suffix_array
}
