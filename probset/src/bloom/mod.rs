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

//! Bloom Filter implementation for probabilistic set membership testing.
//!
//! A Bloom filter is a space-efficient probabilistic data structure used to test whether
//! an element is a member of a set. False positive matches are possible, but false negatives
//! are not. In other words, a query returns either "possibly in set" or "definitely not in set".
//!
//! # Properties
//!
//! - **No false negatives**: If an item was inserted, `contains()` will always return `true`
//! - **Possible false positives**: `contains()` may return `true` for items never inserted
//! - **Fixed size**: the bit array is sized once, at creation, and never resized
//! - **Insert only**: items cannot be removed
//!
//! # Build, then freeze
//!
//! A filter lives in two phases. [`BloomFilterMut`] is owned by one builder and accepts
//! inserts. [`BloomFilterMut::freeze`] consumes it and hands its bits, without copying, to a
//! [`BloomFilter`], which only answers queries and may be shared by any number of threads.
//!
//! ```rust
//! use probset::bloom::BloomFilterBuilder;
//!
//! // Sized for 1000 items with a 1% false positive rate
//! let mut filter = BloomFilterBuilder::with_accuracy(1000, 0.01)
//!     .unwrap()
//!     .build::<str>();
//!
//! filter.insert("apple");
//! filter.insert("banana");
//!
//! let filter = filter.freeze();
//! assert!(filter.contains("apple")); // true - definitely inserted
//! println!("Est. FPP: {:.4}%", filter.estimated_fpp() * 100.0);
//! ```
//!
//! When all items are known up front, [`BloomFilter::from_items`] does the sizing, inserting
//! and freezing in one call:
//!
//! ```rust
//! use probset::bloom::BloomFilter;
//!
//! let filter: BloomFilter<u32> = BloomFilter::from_items(0.01, 0..10_000_u32).unwrap();
//! assert!(filter.contains(&1234));
//! ```
//!
//! # Sizing
//!
//! [`suggest_sizing`] picks the bit-array width and hash count for an expected item count and
//! a target false positive rate. Of all hash counts up to 50, it keeps the one needing the
//! fewest bits. Bit indices are `u32`, so a filter holds at most `u32::MAX` bits; larger
//! requests fail rather than overflow.
//!
//! # Implementation Details
//!
//! - Items provide their own salted hash pair through [`Hashable`](crate::hash::Hashable)
//! - Implements double hashing (Kirsch-Mitzenmacher method) for k hash functions
//! - Bits packed efficiently in `u64` words
//!
//! # References
//!
//! - Bloom, Burton H. (1970). "Space/time trade-offs in hash coding with allowable errors"
//! - Kirsch and Mitzenmacher (2008). "Less Hashing, Same Performance: Building a Better Bloom
//!   Filter"

mod bits;
mod builder;
mod hashing;
mod sizing;
mod sketch;

pub use self::bits::BitArray;
pub use self::bits::BitArrayMut;
pub use self::builder::BloomFilterBuilder;
pub use self::hashing::DoubleHash;
pub use self::hashing::Indices;
pub use self::sizing::suggest_sizing;
pub use self::sizing::sizings;
pub use self::sizing::Sizing;
pub use self::sizing::MAX_CANDIDATE_HASHES;
pub use self::sizing::MAX_NUM_BITS;
pub use self::sketch::BloomFilter;
pub use self::sketch::BloomFilterMut;
