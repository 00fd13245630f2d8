// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::iter::FusedIterator;

use crate::hash::Hashable;
use crate::hash::DEFAULT_SALT;

/// A family of `k` hash functions derived from one salted hash pair (double hashing).
///
/// Computing `k` independent hashes would take `k` passes over an item. Double hashing takes one
/// pass producing two 32-bit values `h1` and `h2`, then derives the `i`-th index as
/// `h1 + i * h2` with wrapping arithmetic, for `i` in `0..k`. Kirsch and Mitzenmacher show this
/// keeps the asymptotic false positive rate of truly independent hashes.
///
/// The indices are raw `u32` values; the filter reduces them modulo its bit count.
///
/// # Examples
///
/// ```
/// # use probset::bloom::DoubleHash;
/// let family = DoubleHash::new(3);
/// let indices: Vec<u32> = family.indices("foo").collect();
/// assert_eq!(indices.len(), 3);
/// assert_eq!(indices, family.indices("foo").collect::<Vec<_>>());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DoubleHash {
    num_hashes: u16,
    salt: u64,
}

impl DoubleHash {
    /// Creates a family of `num_hashes` functions using [`DEFAULT_SALT`].
    ///
    /// # Panics
    ///
    /// Panics if `num_hashes` is zero.
    pub fn new(num_hashes: u16) -> Self {
        Self::with_salt(num_hashes, DEFAULT_SALT)
    }

    /// Creates a family of `num_hashes` functions using a custom salt.
    ///
    /// # Panics
    ///
    /// Panics if `num_hashes` is zero.
    pub fn with_salt(num_hashes: u16, salt: u64) -> Self {
        assert!(num_hashes > 0, "num_hashes must be at least 1");
        DoubleHash { num_hashes, salt }
    }

    /// Returns the number of indices derived per item (k).
    pub fn num_hashes(&self) -> u16 {
        self.num_hashes
    }

    /// Returns the salt passed to the item's hash provider.
    pub fn salt(&self) -> u64 {
        self.salt
    }

    /// Derives the `k` raw indices of `item`.
    ///
    /// Calls [`Hashable::hash_salt`] exactly once; the returned iterator does the rest.
    pub fn indices<T: Hashable + ?Sized>(&self, item: &T) -> Indices {
        Indices::from_pair(item.hash_salt(self.salt), self.num_hashes)
    }
}

/// The lazy, finite sequence of indices produced by [`DoubleHash::indices`].
///
/// A clone continues from the same position as the original; call [`DoubleHash::indices`] again
/// to start over.
#[derive(Debug, Clone)]
pub struct Indices {
    h1: u32,
    h2: u32,
    next: u32,
    num_hashes: u32,
}

impl Indices {
    /// Builds the sequence from a packed pair (`h1` in the high 32 bits, `h2` in the low 32 bits).
    pub fn from_pair(pair: u64, num_hashes: u16) -> Self {
        Indices {
            h1: (pair >> 32) as u32,
            h2: pair as u32,
            next: 0,
            num_hashes: u32::from(num_hashes),
        }
    }
}

impl Iterator for Indices {
    type Item = u32;

    #[inline]
    fn next(&mut self) -> Option<u32> {
        if self.next >= self.num_hashes {
            return None;
        }
        let index = self.h1.wrapping_add(self.next.wrapping_mul(self.h2));
        self.next += 1;
        Some(index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.num_hashes - self.next) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Indices {}

impl FusedIterator for Indices {}
