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

use std::borrow::Borrow;

use tracing::debug;

use super::suggest_sizing;
use super::BloomFilter;
use super::BloomFilterMut;
use super::DoubleHash;
use super::Sizing;
use crate::error::Error;
use crate::hash::Hashable;
use crate::hash::DEFAULT_SALT;

pub const MIN_NUM_BITS: u32 = 1;
pub const MIN_NUM_HASHES: u16 = 1;

/// Builder for creating [`BloomFilterMut`] instances.
///
/// Provides two construction modes:
/// - [`with_accuracy()`](Self::with_accuracy): Specify expected items and false positive rate
///   (recommended)
/// - [`with_size()`](Self::with_size): Specify bit count and hash functions (manual)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BloomFilterBuilder {
    num_bits: u32,
    num_hashes: u16,
    salt: u64,
}

impl BloomFilterBuilder {
    /// Creates a builder with the smallest dimensions that meet a target accuracy.
    ///
    /// See [`suggest_sizing`] for how the dimensions are chosen.
    ///
    /// # Arguments
    ///
    /// - `capacity`: Expected number of distinct items
    /// - `error_rate`: Target false positive probability (e.g., 0.01 for 1%)
    ///
    /// # Errors
    ///
    /// Returns the sizing error if `capacity` is zero, `error_rate` is outside (0.0, 1.0), or
    /// the filter would need more than `u32::MAX` bits.
    ///
    /// # Examples
    ///
    /// ```
    /// # use probset::bloom::BloomFilterBuilder;
    /// let mut filter = BloomFilterBuilder::with_accuracy(10_000, 0.01)
    ///     .unwrap()
    ///     .salt(42)
    ///     .build::<str>();
    /// filter.insert("apple");
    /// assert!(filter.contains("apple"));
    /// ```
    pub fn with_accuracy(capacity: u64, error_rate: f64) -> Result<Self, Error> {
        suggest_sizing(capacity, error_rate).map(Self::from)
    }

    /// Creates a builder with manual size specification.
    ///
    /// Use this when you want precise control over the filter size, or when working with
    /// pre-calculated parameters.
    ///
    /// # Panics
    ///
    /// Panics if `num_bits` < MIN_NUM_BITS or `num_hashes` < MIN_NUM_HASHES.
    ///
    /// # Examples
    ///
    /// ```
    /// # use probset::bloom::BloomFilterBuilder;
    /// let filter = BloomFilterBuilder::with_size(10_000, 7).build::<u64>();
    /// assert_eq!(filter.len(), 10_000);
    /// ```
    pub fn with_size(num_bits: u32, num_hashes: u16) -> Self {
        assert!(
            num_bits >= MIN_NUM_BITS,
            "num_bits must be at least {}",
            MIN_NUM_BITS
        );
        assert!(
            num_hashes >= MIN_NUM_HASHES,
            "num_hashes must be at least {}",
            MIN_NUM_HASHES
        );

        BloomFilterBuilder {
            num_bits,
            num_hashes,
            salt: DEFAULT_SALT,
        }
    }

    /// Sets a custom hash salt (default: [`DEFAULT_SALT`]).
    pub fn salt(mut self, salt: u64) -> Self {
        self.salt = salt;
        self
    }

    /// Returns the configured number of bits.
    pub fn num_bits(&self) -> u32 {
        self.num_bits
    }

    /// Returns the configured number of hash functions.
    pub fn num_hashes(&self) -> u16 {
        self.num_hashes
    }

    /// Builds an empty Bloom filter for items of type `T`.
    pub fn build<T: Hashable + ?Sized>(self) -> BloomFilterMut<T> {
        let hasher = DoubleHash::with_salt(self.num_hashes, self.salt);
        BloomFilterMut::new(hasher, self.num_bits)
    }
}

impl From<Sizing> for BloomFilterBuilder {
    fn from(sizing: Sizing) -> Self {
        Self::with_size(sizing.num_bits(), sizing.num_hashes())
    }
}

impl<T: Hashable + ?Sized> BloomFilter<T> {
    /// Builds a frozen filter holding every item of a finite collection.
    ///
    /// The filter is sized for the collection's length and `error_rate`, filled, then frozen.
    /// The length must be known up front, hence the [`ExactSizeIterator`] bound. An empty
    /// collection is sized as if it held one item and yields a filter that contains nothing.
    ///
    /// # Errors
    ///
    /// Returns the sizing error unchanged if `error_rate` is outside (0.0, 1.0) or the
    /// collection is too large for a `u32`-indexed bit array.
    ///
    /// # Examples
    ///
    /// ```
    /// # use probset::bloom::BloomFilter;
    /// let filter: BloomFilter<str> = BloomFilter::from_items(0.01, ["foo", "bar"]).unwrap();
    /// assert!(filter.contains("foo"));
    /// assert!(filter.contains("bar"));
    ///
    /// let words = vec!["a".to_string(), "b".to_string()];
    /// let filter: BloomFilter<str> = BloomFilter::from_items(0.01, words).unwrap();
    /// assert!(filter.contains("a"));
    ///
    /// assert!(BloomFilter::<str>::from_items(1.0, ["foo"]).is_err());
    /// ```
    pub fn from_items<I>(error_rate: f64, items: I) -> Result<Self, Error>
    where
        I: IntoIterator,
        I::IntoIter: ExactSizeIterator,
        I::Item: Borrow<T>,
    {
        let items = items.into_iter();
        let num_items = items.len() as u64;
        let sizing = suggest_sizing(num_items.max(1), error_rate)?;

        let mut filter = BloomFilterBuilder::from(sizing).build::<T>();
        for item in items {
            filter.insert(item.borrow());
        }

        debug!(
            num_items,
            error_rate,
            num_bits = filter.len(),
            num_hashes = filter.num_hashes(),
            bits_used = filter.bits_used(),
            "built bloom filter"
        );
        Ok(filter.freeze())
    }
}

impl<T: ?Sized> BloomFilterMut<T> {
    /// Returns a builder preconfigured with this filter's dimensions and salt.
    ///
    /// Useful for creating an empty filter that is compatible with this one.
    pub fn to_builder(&self) -> BloomFilterBuilder {
        BloomFilterBuilder {
            num_bits: self.len(),
            num_hashes: self.num_hashes(),
            salt: self.salt(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_builder_with_accuracy() {
        let builder = BloomFilterBuilder::with_accuracy(1000, 0.01).unwrap();
        assert_eq!(builder.num_bits(), 9593);
        assert_eq!(builder.num_hashes(), 7);

        let filter = builder.build::<str>();
        assert_eq!(filter.len(), 9593);
        assert!(filter.is_empty());
    }

    #[test]
    fn test_builder_with_size() {
        let filter = BloomFilterBuilder::with_size(1024, 5).build::<u32>();
        assert_eq!(filter.len(), 1024);
        assert_eq!(filter.num_hashes(), 5);
        assert_eq!(filter.salt(), DEFAULT_SALT);
    }

    #[test]
    fn test_builder_salt() {
        let a = BloomFilterBuilder::with_size(1024, 5).salt(1).build::<str>();
        let b = BloomFilterBuilder::with_size(1024, 5).salt(2).build::<str>();
        assert_eq!(a.salt(), 1);
        assert_ne!(a.hasher(), b.hasher());
        assert_eq!(a.to_builder(), BloomFilterBuilder::with_size(1024, 5).salt(1));
    }

    #[test]
    fn test_builder_rejects_invalid_accuracy() {
        let err = BloomFilterBuilder::with_accuracy(0, 0.01).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CapacityTooSmall);
        let err = BloomFilterBuilder::with_accuracy(10, 0.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidErrorRate);
    }

    #[test]
    #[should_panic(expected = "num_bits must be at least 1")]
    fn test_invalid_num_bits() {
        BloomFilterBuilder::with_size(0, 3);
    }

    #[test]
    #[should_panic(expected = "num_hashes must be at least 1")]
    fn test_invalid_num_hashes() {
        BloomFilterBuilder::with_size(100, 0);
    }

    #[test]
    fn test_from_items() {
        let filter: BloomFilter<str> = BloomFilter::from_items(0.01, ["foo", "bar"]).unwrap();
        assert_eq!(filter.len(), 20);
        assert_eq!(filter.num_hashes(), 5);
        assert!(filter.contains("foo"));
        assert!(filter.contains("bar"));
    }

    #[test]
    fn test_from_items_empty() {
        let items: [&str; 0] = [];
        let filter: BloomFilter<str> = BloomFilter::from_items(0.01, items).unwrap();
        assert!(filter.is_empty());
        assert!(!filter.contains("foo"));
        assert!(!filter.contains(""));
    }

    #[test]
    fn test_from_items_propagates_sizing_error() {
        let err = BloomFilter::<u64>::from_items(1.5, [1_u64, 2, 3]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidErrorRate);
        assert_eq!(
            err.message(),
            "invalid error rate: expected a value in (0.0, 1.0), got 1.5"
        );
    }
}
