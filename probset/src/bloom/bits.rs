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

/// Number of bits in one backing word.
const WORD_BITS: u32 = u64::BITS;

/// Backing words shown by `Debug` before the output is cut short.
const DEBUG_WORDS: usize = 8;

#[inline]
fn word_index(bit_index: u32) -> usize {
    (bit_index >> 6) as usize // bit_index / 64
}

#[inline]
fn bit_mask(bit_index: u32) -> u64 {
    1u64 << (bit_index & 63) // bit_index % 64
}

/// A fixed-length array of bits packed into `u64` words, writable by its single owner.
///
/// Bits can only be set, never cleared. Convert it into a read-only [`BitArray`] with
/// [`freeze`](Self::freeze); the conversion moves the backing words instead of copying them.
#[derive(Clone, PartialEq, Eq)]
pub struct BitArrayMut {
    len: u32,
    /// Count of bits set to 1.
    ones: u64,
    words: Box<[u64]>,
}

impl BitArrayMut {
    /// Allocates `len` bits, all clear.
    ///
    /// # Panics
    ///
    /// Panics if `len` is zero.
    pub fn new(len: u32) -> Self {
        assert!(len > 0, "bit array length must be at least 1");
        let num_words = len.div_ceil(WORD_BITS) as usize;
        BitArrayMut {
            len,
            ones: 0,
            words: vec![0u64; num_words].into_boxed_slice(),
        }
    }

    /// Sets the bit at `index`. Returns `true` if the bit was previously clear.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    pub fn set(&mut self, index: u32) -> bool {
        assert!(
            index < self.len,
            "bit index {index} out of range for length {}",
            self.len
        );
        let word = &mut self.words[word_index(index)];
        let mask = bit_mask(index);
        if *word & mask == 0 {
            *word |= mask;
            self.ones += 1;
            true
        } else {
            false
        }
    }

    /// Returns whether the bit at `index` is set.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    pub fn test(&self, index: u32) -> bool {
        test_bit(&self.words, self.len, index)
    }

    /// Returns the number of bits in the array.
    pub fn len(&self) -> u32 {
        self.len
    }

    /// Returns the number of bits set to 1.
    pub fn count_ones(&self) -> u64 {
        self.ones
    }

    /// Returns true if no bit is set.
    pub fn is_clear(&self) -> bool {
        self.ones == 0
    }

    /// Converts this array into a read-only one without copying the backing words.
    pub fn freeze(self) -> BitArray {
        BitArray {
            len: self.len,
            ones: self.ones,
            words: self.words,
        }
    }
}

/// A read-only array of bits, produced by [`BitArrayMut::freeze`].
///
/// It has no mutators, so a shared reference may be read from any number of threads at once.
#[derive(Clone, PartialEq, Eq)]
pub struct BitArray {
    len: u32,
    ones: u64,
    words: Box<[u64]>,
}

impl BitArray {
    /// Returns whether the bit at `index` is set.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    pub fn test(&self, index: u32) -> bool {
        test_bit(&self.words, self.len, index)
    }

    /// Returns the number of bits in the array.
    pub fn len(&self) -> u32 {
        self.len
    }

    /// Returns the number of bits set to 1.
    pub fn count_ones(&self) -> u64 {
        self.ones
    }

    /// Returns true if no bit is set.
    pub fn is_clear(&self) -> bool {
        self.ones == 0
    }

    /// Converts this array back into a writable one without copying the backing words.
    pub fn thaw(self) -> BitArrayMut {
        BitArrayMut {
            len: self.len,
            ones: self.ones,
            words: self.words,
        }
    }
}

fn test_bit(words: &[u64], len: u32, index: u32) -> bool {
    assert!(index < len, "bit index {index} out of range for length {len}");
    words[word_index(index)] & bit_mask(index) != 0
}

fn fmt_words(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    len: u32,
    ones: u64,
    words: &[u64],
) -> fmt::Result {
    write!(f, "{name} {{ len: {len}, ones: {ones}, bits: ")?;
    for w in words.iter().take(DEBUG_WORDS) {
        write!(f, "{w:#018X} ")?;
    }
    if words.len() > DEBUG_WORDS {
        write!(f, ".. ")?;
    }
    write!(f, "}}")
}

impl fmt::Debug for BitArrayMut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_words(f, "BitArrayMut", self.len, self.ones, &self.words)
    }
}

impl fmt::Debug for BitArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_words(f, "BitArray", self.len, self.ones, &self.words)
    }
}
