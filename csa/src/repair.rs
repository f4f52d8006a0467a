// Copyright 2025 Logan Magee
//
// SPDX-License-Identifier: Apache-2.0

//! Grammar compression of the suffix array's first-difference sequence.
//!
//! Re-Pair repeatedly replaces the most frequent adjacent symbol pair with a freshly minted
//! symbol, recording the substitution as a grammar rule. Unlike the Psi-based codecs it works on
//! the raw suffix array: the working sequence starts as `sa[0]` followed by the differences
//! between successive entries, so terminals always lie in `-(n-1)..n` and fresh symbols can be
//! assigned from `n` upward without collision.

use std::collections::HashMap;

use log::debug;

use crate::error::Error;

/// A grammar rule: the ordered pair of symbols a fresh symbol substitutes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Rule {
    /// The first symbol of the replaced pair.
    pub left: i64,
    /// The second symbol of the replaced pair.
    pub right: i64,
}

/// A suffix array compressed with the Re-Pair codec.
///
/// Rule `k` defines the symbol `original_len + k`; the rule table is append-only, so the
/// sequence and table pair is all the decoder needs. The table is owned by the artifact rather
/// than shared between runs, so compressing unrelated inputs can never collide in the symbol
/// numbering space.
pub struct RePairArtifact {
    seq: Vec<i64>,
    rules: Vec<Rule>,
    original_len: u32,
}

impl RePairArtifact {
    pub(crate) fn from_parts(seq: Vec<i64>, rules: Vec<Rule>, original_len: u32) -> Self {
        Self {
            seq,
            rules,
            original_len,
        }
    }

    /// Returns the compressed symbol sequence.
    #[must_use]
    pub fn seq(&self) -> &[i64] {
        &self.seq
    }

    /// Returns the substitution rules, in the order their symbols were minted.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Returns the length of the suffix array this artifact decodes to.
    #[must_use]
    pub fn len(&self) -> u32 {
        self.original_len
    }

    /// Returns `true` if the artifact decodes to an empty suffix array.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.original_len == 0
    }
}

/// Compresses a suffix array with Re-Pair.
///
/// Each round scans the working sequence for adjacent pairs, substitutes the strictly most
/// frequent one (ties broken by first appearance in scan order, which keeps the output
/// deterministic), and stops when no pair occurs twice. Every substitution shortens the
/// sequence, so the loop terminates after at most `n - 1` rounds.
///
/// # Examples
///
/// ```
/// let mut text = b"banana".to_vec();
/// text.push(0);
/// let sa = sufsort::SuffixArray::new(&text);
///
/// let artifact = csa::repair::compress(sa.as_slice());
/// assert_eq!(csa::repair::decompress(&artifact)?, sa.as_slice());
/// # Ok::<(), csa::Error>(())
/// ```
#[must_use]
pub fn compress(sa: &[u32]) -> RePairArtifact {
    let mut seq = first_difference(sa);
    let mut rules = Vec::new();
    let mut fresh = sa.len() as i64;

    while let Some(pair) = most_frequent_pair(&seq) {
        let mut shortened = Vec::with_capacity(seq.len());
        let mut i = 0;
        while i < seq.len() {
            if i + 1 < seq.len() && seq[i] == pair.left && seq[i + 1] == pair.right {
                shortened.push(fresh);
                i += 2;
            } else {
                shortened.push(seq[i]);
                i += 1;
            }
        }

        debug!(
            "re-pair: round {}: ({}, {}) -> {}, {} -> {} symbols",
            rules.len(),
            pair.left,
            pair.right,
            fresh,
            seq.len(),
            shortened.len(),
        );
        rules.push(pair);
        seq = shortened;
        fresh += 1;
    }

    RePairArtifact {
        seq,
        rules,
        original_len: sa.len() as u32,
    }
}

/// Reconstructs the suffix array from a Re-Pair artifact.
///
/// Substituted symbols are expanded with an explicit stack (right symbol pushed first, so the
/// left one surfaces next), then the fully expanded difference sequence is prefix-summed back
/// to absolute values. A sequence that contains no substituted symbol passes through the
/// expansion unchanged.
///
/// # Errors
///
/// Returns [`Error::MissingRule`] if a substituted symbol has no rule, or an error if the
/// expanded sequence's length or prefix sums are inconsistent with the declared original
/// length.
pub fn decompress(artifact: &RePairArtifact) -> Result<Vec<u32>, Error> {
    let n = artifact.original_len as usize;
    let first_fresh = artifact.original_len as i64;

    let mut expanded = Vec::with_capacity(n);
    let mut stack = Vec::new();
    for &symbol in &artifact.seq {
        stack.push(symbol);
        while let Some(symbol) = stack.pop() {
            if symbol >= first_fresh {
                let rule = artifact
                    .rules
                    .get((symbol - first_fresh) as usize)
                    .ok_or(Error::MissingRule { symbol })?;
                stack.push(rule.right);
                stack.push(rule.left);
            } else {
                expanded.push(symbol);
            }
        }
    }

    if expanded.len() != n {
        return Err(Error::LengthMismatch {
            expected: n,
            found: expanded.len(),
        });
    }

    let mut sa = Vec::with_capacity(n);
    let mut current = 0;
    for (i, &difference) in expanded.iter().enumerate() {
        current = if i == 0 { difference } else { current + difference };
        if current < 0 || current >= n as i64 {
            return Err(Error::ValueOutOfRange {
                value: current,
                len: n,
            });
        }
        sa.push(current as u32);
    }

    Ok(sa)
}

fn first_difference(sa: &[u32]) -> Vec<i64> {
    let mut seq = Vec::with_capacity(sa.len());
    if let Some(&first) = sa.first() {
        seq.push(i64::from(first));
    }
    for pair in sa.windows(2) {
        seq.push(i64::from(pair[1]) - i64::from(pair[0]));
    }

    seq
}

/// Returns the pair with the strictly highest count, requiring a count of at least two.
///
/// Every adjacent position is counted, and ties are broken by each pair's first appearance in
/// the scan, not by map iteration order.
fn most_frequent_pair(seq: &[i64]) -> Option<Rule> {
    let mut counts: HashMap<(i64, i64), u32> = HashMap::new();
    let mut first_seen = Vec::new();
    for pair in seq.windows(2) {
        let key = (pair[0], pair[1]);
        let count = counts.entry(key).or_insert(0);
        if *count == 0 {
            first_seen.push(key);
        }
        *count += 1;
    }

    let mut best = None;
    let mut best_count = 1;
    for key in first_seen {
        let count = counts[&key];
        if count > best_count {
            best = Some(Rule {
                left: key.0,
                right: key.1,
            });
            best_count = count;
        }
    }

    best
}
