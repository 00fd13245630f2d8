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

use std::fmt;
use std::marker::PhantomData;

use tracing::trace;

use super::BitArray;
use super::BitArrayMut;
use super::DoubleHash;
use crate::hash::Hashable;

/// A Bloom filter under construction.
///
/// Owns its bit array exclusively; items are added with [`insert`](Self::insert). Once every
/// item is in, [`freeze`](Self::freeze) turns it into a read-only [`BloomFilter`] that can be
/// shared across threads. Freezing consumes the builder, so the bits move without a copy.
///
/// The filter never records which items were inserted, only the bits they set. `T` can be
/// unsized, so `BloomFilterMut<str>` accepts `&str` directly.
///
/// # Examples
///
/// ```
/// # use probset::bloom::BloomFilterMut;
/// let mut filter = BloomFilterMut::<str>::with_size(1024, 5);
/// filter.insert("foo");
/// filter.insert("bar");
///
/// let filter = filter.freeze();
/// assert!(filter.contains("foo"));
/// assert!(filter.contains("bar"));
/// ```
pub struct BloomFilterMut<T: ?Sized> {
    pub(super) hasher: DoubleHash,
    pub(super) bits: BitArrayMut,
    pub(super) _item: PhantomData<fn(&T)>,
}

/// An immutable (frozen) Bloom filter.
///
/// Produced by [`BloomFilterMut::freeze`] or [`BloomFilter::from_items`]. It has no mutators,
/// and is `Send + Sync` whatever `T` is, so it can be queried from many threads without
/// locking.
///
/// See the [module level documentation](super) for more.
pub struct BloomFilter<T: ?Sized> {
    pub(super) hasher: DoubleHash,
    pub(super) bits: BitArray,
    pub(super) _item: PhantomData<fn(&T)>,
}

impl<T: Hashable + ?Sized> BloomFilterMut<T> {
    /// Creates an empty filter of `num_bits` bits using the given hash family.
    ///
    /// # Panics
    ///
    /// Panics if `num_bits` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// # use probset::bloom::{BloomFilterMut, DoubleHash};
    /// let filter = BloomFilterMut::<u64>::new(DoubleHash::with_salt(4, 42), 1000);
    /// assert_eq!(filter.len(), 1000);
    /// assert_eq!(filter.num_hashes(), 4);
    /// assert_eq!(filter.salt(), 42);
    /// ```
    pub fn new(hasher: DoubleHash, num_bits: u32) -> Self {
        BloomFilterMut {
            hasher,
            bits: BitArrayMut::new(num_bits),
            _item: PhantomData,
        }
    }

    /// Creates an empty filter of `num_bits` bits and `num_hashes` hash functions with the
    /// default salt.
    ///
    /// # Panics
    ///
    /// Panics if `num_bits` or `num_hashes` is zero.
    pub fn with_size(num_bits: u32, num_hashes: u16) -> Self {
        Self::new(DoubleHash::new(num_hashes), num_bits)
    }

    /// Inserts an item into the filter.
    ///
    /// Inserting the same item again has no further effect.
    ///
    /// # Examples
    ///
    /// ```
    /// # use probset::bloom::BloomFilterMut;
    /// let mut filter = BloomFilterMut::<u64>::with_size(1000, 3);
    /// filter.insert(&42);
    /// assert!(filter.contains(&42));
    /// ```
    pub fn insert(&mut self, item: &T) {
        let num_bits = self.bits.len();
        for index in self.hasher.indices(item) {
            self.bits.set(index % num_bits);
        }
    }

    /// Tests whether an item is possibly in the set.
    ///
    /// Returns:
    /// - `true`: Item was **possibly** inserted (or false positive)
    /// - `false`: Item was **definitely not** inserted
    pub fn contains(&self, item: &T) -> bool {
        if self.is_empty() {
            return false;
        }
        let num_bits = self.bits.len();
        self.hasher
            .indices(item)
            .all(|index| self.bits.test(index % num_bits))
    }

    /// Tests and inserts an item in a single operation.
    ///
    /// Returns whether the item was possibly already in the set before insertion.
    /// This hashes the item once instead of twice for `contains()` then `insert()`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use probset::bloom::BloomFilterMut;
    /// let mut filter = BloomFilterMut::<str>::with_size(1000, 3);
    ///
    /// assert!(!filter.contains_and_insert("apple")); // First insertion
    /// assert!(filter.contains_and_insert("apple")); // Now it's in the set
    /// ```
    pub fn contains_and_insert(&mut self, item: &T) -> bool {
        let num_bits = self.bits.len();
        let mut was_present = true;
        for index in self.hasher.indices(item) {
            if self.bits.set(index % num_bits) {
                was_present = false;
            }
        }
        was_present
    }

    /// Freezes this filter into an immutable one without copying its bits.
    ///
    /// # Examples
    ///
    /// ```
    /// # use probset::bloom::BloomFilterMut;
    /// let mut filter = BloomFilterMut::<str>::with_size(1000, 3);
    /// filter.insert("apple");
    /// let frozen = filter.freeze();
    /// assert!(frozen.contains("apple"));
    /// ```
    pub fn freeze(self) -> BloomFilter<T> {
        trace!(
            num_bits = self.len(),
            bits_used = self.bits_used(),
            "freezing bloom filter"
        );
        BloomFilter {
            hasher: self.hasher,
            bits: self.bits.freeze(),
            _item: PhantomData,
        }
    }

    /// Returns an immutable copy of the current state, leaving this filter usable.
    ///
    /// Unlike [`freeze`](Self::freeze) this copies the whole bit array.
    pub fn snapshot(&self) -> BloomFilter<T> {
        BloomFilter {
            hasher: self.hasher,
            bits: self.bits.clone().freeze(),
            _item: PhantomData,
        }
    }
}

impl<T: ?Sized> BloomFilterMut<T> {
    /// Returns the number of bits in the filter (not the number of items inserted).
    pub fn len(&self) -> u32 {
        self.bits.len()
    }

    /// Returns the number of hash functions used.
    pub fn num_hashes(&self) -> u16 {
        self.hasher.num_hashes()
    }

    /// Returns the hash salt.
    pub fn salt(&self) -> u64 {
        self.hasher.salt()
    }

    /// Returns the hash family used to derive bit indices.
    pub fn hasher(&self) -> DoubleHash {
        self.hasher
    }

    /// Returns whether the filter is empty (no bit set).
    pub fn is_empty(&self) -> bool {
        self.bits.is_clear()
    }

    /// Returns the number of bits set to 1.
    ///
    /// Useful for monitoring filter saturation.
    pub fn bits_used(&self) -> u64 {
        self.bits.count_ones()
    }

    /// Returns the current load factor (fraction of bits set).
    pub fn load_factor(&self) -> f64 {
        load_factor(self.bits_used(), self.len())
    }

    /// Estimates the current false positive probability as `load_factor^k`.
    pub fn estimated_fpp(&self) -> f64 {
        self.load_factor().powi(i32::from(self.num_hashes()))
    }
}

impl<T: Hashable + ?Sized> BloomFilter<T> {
    /// Tests whether an item is possibly in the set.
    ///
    /// Returns:
    /// - `true`: Item was **possibly** inserted (or false positive)
    /// - `false`: Item was **definitely not** inserted
    ///
    /// # Examples
    ///
    /// ```
    /// # use probset::bloom::BloomFilter;
    /// let filter: BloomFilter<str> = BloomFilter::from_items(0.01, ["apple"]).unwrap();
    ///
    /// assert!(filter.contains("apple")); // true - was inserted
    /// ```
    pub fn contains(&self, item: &T) -> bool {
        if self.is_empty() {
            return false;
        }
        let num_bits = self.bits.len();
        self.hasher
            .indices(item)
            .all(|index| self.bits.test(index % num_bits))
    }

    /// Returns `true` if the item was **definitely not** inserted.
    pub fn not_contains(&self, item: &T) -> bool {
        !self.contains(item)
    }

    /// Converts this filter back into a mutable one without copying its bits.
    ///
    /// # Examples
    ///
    /// ```
    /// # use probset::bloom::BloomFilter;
    /// let filter: BloomFilter<str> = BloomFilter::from_items(0.01, ["apple"]).unwrap();
    /// let mut filter = filter.unfreeze();
    /// filter.insert("banana");
    /// assert!(filter.contains("apple"));
    /// ```
    pub fn unfreeze(self) -> BloomFilterMut<T> {
        trace!(
            num_bits = self.len(),
            bits_used = self.bits_used(),
            "unfreezing bloom filter"
        );
        BloomFilterMut {
            hasher: self.hasher,
            bits: self.bits.thaw(),
            _item: PhantomData,
        }
    }
}

impl<T: ?Sized> BloomFilter<T> {
    /// Returns the number of bits in the filter (not the number of items inserted).
    pub fn len(&self) -> u32 {
        self.bits.len()
    }

    /// Returns the number of hash functions used.
    pub fn num_hashes(&self) -> u16 {
        self.hasher.num_hashes()
    }

    /// Returns the hash salt.
    pub fn salt(&self) -> u64 {
        self.hasher.salt()
    }

    /// Returns the hash family used to derive bit indices.
    pub fn hasher(&self) -> DoubleHash {
        self.hasher
    }

    /// Returns whether the filter is empty (no bit set).
    pub fn is_empty(&self) -> bool {
        self.bits.is_clear()
    }

    /// Returns the number of bits set to 1.
    pub fn bits_used(&self) -> u64 {
        self.bits.count_ones()
    }

    /// Returns the load factor (fraction of bits set).
    ///
    /// Values near 0.5 indicate the filter is at its designed capacity.
    /// Values above 0.5 indicate degraded false positive rates.
    pub fn load_factor(&self) -> f64 {
        load_factor(self.bits_used(), self.len())
    }

    /// Estimates the false positive probability as `load_factor^k`.
    ///
    /// This assumes uniform bit distribution and is more accurate than
    /// trying to estimate insertion count from the load factor.
    pub fn estimated_fpp(&self) -> f64 {
        self.load_factor().powi(i32::from(self.num_hashes()))
    }
}

fn load_factor(bits_used: u64, num_bits: u32) -> f64 {
    bits_used as f64 / f64::from(num_bits)
}

impl<'a, T: Hashable + ?Sized + 'a> Extend<&'a T> for BloomFilterMut<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        for item in iter {
            self.insert(item);
        }
    }
}

// Manual impls: derives would put bounds on `T`, which is never stored.

impl<T: ?Sized> Clone for BloomFilterMut<T> {
    fn clone(&self) -> Self {
        BloomFilterMut {
            hasher: self.hasher,
            bits: self.bits.clone(),
            _item: PhantomData,
        }
    }
}

impl<T: ?Sized> Clone for BloomFilter<T> {
    fn clone(&self) -> Self {
        BloomFilter {
            hasher: self.hasher,
            bits: self.bits.clone(),
            _item: PhantomData,
        }
    }
}

impl<T: ?Sized> PartialEq for BloomFilterMut<T> {
    fn eq(&self, other: &Self) -> bool {
        self.hasher == other.hasher && self.bits == other.bits
    }
}

impl<T: ?Sized> Eq for BloomFilterMut<T> {}

impl<T: ?Sized> PartialEq for BloomFilter<T> {
    fn eq(&self, other: &Self) -> bool {
        self.hasher == other.hasher && self.bits == other.bits
    }
}

impl<T: ?Sized> Eq for BloomFilter<T> {}

impl<T: ?Sized> fmt::Debug for BloomFilterMut<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BloomFilterMut")
            .field("num_bits", &self.len())
            .field("num_hashes", &self.num_hashes())
            .field("salt", &self.salt())
            .field("bits_used", &self.bits_used())
            .finish()
    }
}

impl<T: ?Sized> fmt::Debug for BloomFilter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BloomFilter")
            .field("num_bits", &self.len())
            .field("num_hashes", &self.num_hashes())
            .field("salt", &self.salt())
            .field("bits_used", &self.bits_used())
            .finish()
    }
}
