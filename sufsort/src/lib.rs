// Copyright 2025 Logan Magee
//
// SPDX-License-Identifier: Apache-2.0

mod doubling;
mod suffix_array;

pub use suffix_array::SuffixArray;
