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

use tracing::debug;

use crate::error::Error;

/// Largest hash count considered when sizing a filter.
pub const MAX_CANDIDATE_HASHES: u16 = 50;

/// Largest bit-array width addressable by the `u32` index space.
///
/// A candidate width is accepted while it does not exceed this value; rounding it up keeps it
/// within `u32`.
pub const MAX_NUM_BITS: u32 = u32::MAX;

/// Dimensions of a Bloom filter: bit-array width and hash count.
///
/// Ordering compares `num_bits` first and `num_hashes` second, so the minimum of a set of
/// sizings is the smallest filter, with ties going to the cheaper hash count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Sizing {
    num_bits: u32,
    num_hashes: u16,
}

impl Sizing {
    /// Returns the bit-array width (m).
    pub fn num_bits(&self) -> u32 {
        self.num_bits
    }

    /// Returns the number of hash functions (k).
    pub fn num_hashes(&self) -> u16 {
        self.num_hashes
    }

    /// Splits the sizing into `(num_bits, num_hashes)`.
    pub fn into_parts(self) -> (u32, u16) {
        (self.num_bits, self.num_hashes)
    }

    /// Returns the theoretical false positive probability after inserting `capacity` distinct
    /// items into a filter of these dimensions.
    ///
    /// Formula: `(1 - e^(-k * n / m))^k`
    pub fn expected_fpp(&self, capacity: u64) -> f64 {
        let k = f64::from(self.num_hashes);
        let n = capacity as f64;
        let m = f64::from(self.num_bits);
        (1.0 - (-k * n / m).exp()).powf(k)
    }
}

/// Returns the raw candidate sizings for `k = 1..=50`, as `(bits, k)` pairs.
///
/// Each width comes from the Bloom filter capacity formula
/// `bits(k) = -k * n / ln(1 - p^(1/k))` and is neither rounded nor range checked. Inputs are
/// not validated; use [`suggest_sizing`] for that.
///
/// # Examples
///
/// ```
/// # use probset::bloom::sizings;
/// let candidates: Vec<(f64, u16)> = sizings(1000, 0.01).collect();
/// assert_eq!(candidates.len(), 50);
/// assert_eq!(candidates[0].1, 1);
/// ```
pub fn sizings(capacity: u64, error_rate: f64) -> impl Iterator<Item = (f64, u16)> {
    let n = capacity as f64;
    (1..=MAX_CANDIDATE_HASHES).map(move |num_hashes| {
        let k = f64::from(num_hashes);
        let bits = -k * n / (1.0 - error_rate.powf(1.0 / k)).ln();
        (bits, num_hashes)
    })
}

/// Suggests the smallest filter that keeps the false positive rate at or below `error_rate`
/// after inserting `capacity` distinct items.
///
/// Every candidate hash count from 1 to [`MAX_CANDIDATE_HASHES`] is considered and the one
/// needing the fewest bits wins. Hash count is not minimized: double hashing derives all `k`
/// indices from one hash call, so extra hash functions cost a few integer operations each.
/// Widths are rounded up.
///
/// # Errors
///
/// - [`ErrorKind::CapacityTooSmall`] if `capacity` is zero.
/// - [`ErrorKind::InvalidErrorRate`] if `error_rate` is not strictly between 0 and 1.
/// - [`ErrorKind::CapacityTooLarge`] if every candidate needs more than [`MAX_NUM_BITS`] bits.
///
/// [`ErrorKind::CapacityTooSmall`]: crate::error::ErrorKind::CapacityTooSmall
/// [`ErrorKind::InvalidErrorRate`]: crate::error::ErrorKind::InvalidErrorRate
/// [`ErrorKind::CapacityTooLarge`]: crate::error::ErrorKind::CapacityTooLarge
///
/// # Examples
///
/// ```
/// # use probset::bloom::suggest_sizing;
/// let sizing = suggest_sizing(1000, 0.01).unwrap();
/// assert_eq!(sizing.num_hashes(), 7);
/// assert!(sizing.num_bits() > 9500 && sizing.num_bits() < 9700);
///
/// assert!(suggest_sizing(0, 0.01).is_err());
/// assert!(suggest_sizing(100, 1.0).is_err());
/// ```
pub fn suggest_sizing(capacity: u64, error_rate: f64) -> Result<Sizing, Error> {
    if capacity == 0 {
        return Err(Error::capacity_too_small(capacity).with_context("capacity", capacity));
    }
    // also rejects NaN
    if !(error_rate > 0.0 && error_rate < 1.0) {
        return Err(Error::invalid_error_rate(error_rate)
            .with_context("capacity", capacity)
            .with_context("error_rate", error_rate));
    }

    // ceil(x) <= u32::MAX for every x <= u32::MAX, so the cast below cannot truncate
    let max_bits = f64::from(MAX_NUM_BITS);
    let mut candidates = 0;
    let best = sizings(capacity, error_rate)
        .filter(|&(bits, _)| bits.is_finite() && bits > 0.0 && bits <= max_bits)
        .map(|(bits, num_hashes)| Sizing {
            num_bits: bits.ceil() as u32,
            num_hashes,
        })
        .inspect(|_| candidates += 1)
        .min();

    match best {
        Some(sizing) => {
            debug!(
                capacity,
                error_rate,
                candidates,
                num_bits = sizing.num_bits,
                num_hashes = sizing.num_hashes,
                "suggested bloom filter sizing"
            );
            Ok(sizing)
        }
        None => Err(Error::capacity_too_large(capacity, error_rate)
            .with_context("capacity", capacity)
            .with_context("error_rate", error_rate)),
    }
}
