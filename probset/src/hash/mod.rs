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

//! The hash provider contract consumed by the filters.
//!
//! A filter never looks at the bytes of an item. It asks the item for a single salted 64-bit
//! value that packs two logically independent 32-bit hashes (`h1` in the high half, `h2` in the
//! low half) and derives every bit index from that pair. Anything implementing [`Hashable`] can
//! be stored in a filter.
//!
//! Scalars, strings and byte sequences hash their little-endian bytes in one pass through
//! MurmurHash3 x64/128 seeded with the salt. Composite values (tuples, options, sequences of
//! composite values) thread the running salt through each component in turn, so the output of
//! one component's hash becomes the salt of the next.
//!
//! Types that only implement [`std::hash::Hash`] can be wrapped in [`ViaHash`].

use std::hash::Hash;
use std::hash::Hasher;
use std::rc::Rc;
use std::sync::Arc;

mod murmurhash;

pub(crate) use self::murmurhash::MurmurHash3X64128;

/// The salt applied to every item unless a filter is configured with another one.
///
/// Filters built with different salts set different bits for the same item, so a filter must
/// always be queried with the salt it was built with; the salt travels with the filter for that
/// reason.
pub const DEFAULT_SALT: u64 = 0x9150_a946_c4a8_966e;

/// A value that can produce two independent 32-bit hashes of itself from a 64-bit salt.
///
/// Implementations must be pure: the same `(salt, value)` pair always yields the same result.
/// Both insertion and lookup in a filter rely on it, and a non-deterministic implementation
/// breaks the no-false-negative guarantee.
///
/// # Examples
///
/// ```
/// use probset::hash::Hashable;
///
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl Hashable for Point {
///     fn hash_salt(&self, salt: u64) -> u64 {
///         (self.x, self.y).hash_salt(salt)
///     }
/// }
///
/// let p = Point { x: 1, y: 2 };
/// assert_eq!(p.hash_salt(7), (1_i32, 2_i32).hash_salt(7));
/// ```
pub trait Hashable {
    /// Hashes `self` with `salt`, returning `h1` in the high 32 bits and `h2` in the low 32 bits.
    fn hash_salt(&self, salt: u64) -> u64;

    /// Hashes a slice of values.
    ///
    /// The default threads the salt through every element after mixing in the slice length.
    /// Fixed-width scalars override it to hash all their bytes in a single pass.
    fn hash_slice(data: &[Self], salt: u64) -> u64
    where
        Self: Sized,
    {
        let salt = (data.len() as u64).hash_salt(salt);
        data.iter().fold(salt, |salt, item| item.hash_salt(salt))
    }
}

macro_rules! impl_hashable_for_scalar {
    ($($ty:ty),* $(,)?) => {$(
        impl Hashable for $ty {
            fn hash_salt(&self, salt: u64) -> u64 {
                MurmurHash3X64128::hash_pair(salt, &self.to_le_bytes())
            }

            fn hash_slice(data: &[Self], salt: u64) -> u64 {
                let mut hasher = MurmurHash3X64128::with_seed(salt);
                for value in data {
                    hasher.write(&value.to_le_bytes());
                }
                hasher.finish_pair()
            }
        }
    )*};
}

impl_hashable_for_scalar!(u8, u16, u32, u64, u128, i8, i16, i32, i64, i128);

// Values whose hash is the hash of another representation.
macro_rules! impl_hashable_via {
    ($($ty:ty => $repr:ty: |$v:ident| $conv:expr),* $(,)?) => {$(
        impl Hashable for $ty {
            fn hash_salt(&self, salt: u64) -> u64 {
                let $v = *self;
                let repr: $repr = $conv;
                repr.hash_salt(salt)
            }

            fn hash_slice(data: &[Self], salt: u64) -> u64 {
                let mut hasher = MurmurHash3X64128::with_seed(salt);
                for &$v in data {
                    let repr: $repr = $conv;
                    hasher.write(&repr.to_le_bytes());
                }
                hasher.finish_pair()
            }
        }
    )*};
}

impl_hashable_via! {
    // platform independent: a filter built on a 32-bit target answers the same on 64-bit
    usize => u64: |v| v as u64,
    isize => i64: |v| v as i64,
    bool => u8: |v| u8::from(v),
    char => u32: |v| u32::from(v),
    f32 => u32: |v| canonical_float(v),
    f64 => u64: |v| canonical_double(v),
}

/// Canonical bit pattern of an `f32`: one NaN, and `-0.0` hashes like `0.0`.
fn canonical_float(value: f32) -> u32 {
    if value.is_nan() {
        0x7fc00000u32
    } else {
        (value + 0.0).to_bits()
    }
}

/// Canonical bit pattern of an `f64`: one NaN, and `-0.0` hashes like `0.0`.
fn canonical_double(value: f64) -> u64 {
    if value.is_nan() {
        0x7ff8000000000000u64
    } else {
        // -0.0 + 0.0 == +0.0 under IEEE754 roundTiesToEven rounding mode
        (value + 0.0).to_bits()
    }
}

impl Hashable for str {
    fn hash_salt(&self, salt: u64) -> u64 {
        MurmurHash3X64128::hash_pair(salt, self.as_bytes())
    }
}

impl Hashable for String {
    fn hash_salt(&self, salt: u64) -> u64 {
        self.as_str().hash_salt(salt)
    }
}

impl Hashable for () {
    fn hash_salt(&self, salt: u64) -> u64 {
        MurmurHash3X64128::hash_pair(salt, &[])
    }
}

impl<T: Hashable> Hashable for [T] {
    fn hash_salt(&self, salt: u64) -> u64 {
        T::hash_slice(self, salt)
    }
}

impl<T: Hashable, const N: usize> Hashable for [T; N] {
    fn hash_salt(&self, salt: u64) -> u64 {
        T::hash_slice(self.as_slice(), salt)
    }
}

impl<T: Hashable> Hashable for Vec<T> {
    fn hash_salt(&self, salt: u64) -> u64 {
        T::hash_slice(self.as_slice(), salt)
    }
}

impl<T: Hashable> Hashable for Option<T> {
    fn hash_salt(&self, salt: u64) -> u64 {
        match self {
            None => 0u8.hash_salt(salt),
            Some(value) => value.hash_salt(1u8.hash_salt(salt)),
        }
    }
}

impl<T: Hashable + ?Sized> Hashable for &T {
    fn hash_salt(&self, salt: u64) -> u64 {
        (**self).hash_salt(salt)
    }
}

impl<T: Hashable + ?Sized> Hashable for Box<T> {
    fn hash_salt(&self, salt: u64) -> u64 {
        (**self).hash_salt(salt)
    }
}

impl<T: Hashable + ?Sized> Hashable for Rc<T> {
    fn hash_salt(&self, salt: u64) -> u64 {
        (**self).hash_salt(salt)
    }
}

impl<T: Hashable + ?Sized> Hashable for Arc<T> {
    fn hash_salt(&self, salt: u64) -> u64 {
        (**self).hash_salt(salt)
    }
}

macro_rules! impl_hashable_for_tuple {
    ($($name:ident)+) => {
        impl<$($name: Hashable),+> Hashable for ($($name,)+) {
            #[allow(non_snake_case)]
            fn hash_salt(&self, salt: u64) -> u64 {
                let ($($name,)+) = self;
                $(let salt = $name.hash_salt(salt);)+
                salt
            }
        }
    };
}

impl_hashable_for_tuple!(A);
impl_hashable_for_tuple!(A B);
impl_hashable_for_tuple!(A B C);
impl_hashable_for_tuple!(A B C D);
impl_hashable_for_tuple!(A B C D E);
impl_hashable_for_tuple!(A B C D E F);

/// Adapter that makes any [`std::hash::Hash`] type usable as a filter item.
///
/// The wrapped value is fed through the crate's MurmurHash3 hasher seeded with the salt, so the
/// result is only as deterministic as the type's `Hash` impl. Derived impls are fine; impls that
/// hash addresses or iteration order of unordered collections are not.
///
/// # Examples
///
/// ```
/// use probset::bloom::BloomFilter;
/// use probset::hash::ViaHash;
///
/// #[derive(Hash)]
/// enum Color {
///     Red,
///     Green,
/// }
///
/// let filter: BloomFilter<ViaHash<Color>> =
///     BloomFilter::from_items(0.01, [ViaHash(Color::Red)]).unwrap();
/// assert!(filter.contains(&ViaHash(Color::Red)));
/// # let _ = Color::Green;
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViaHash<T>(pub T);

impl<T: Hash> Hashable for ViaHash<T> {
    fn hash_salt(&self, salt: u64) -> u64 {
        let mut hasher = MurmurHash3X64128::with_seed(salt);
        self.0.hash(&mut hasher);
        hasher.finish_pair()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        assert_eq!("foo".hash_salt(DEFAULT_SALT), "foo".hash_salt(DEFAULT_SALT));
        assert_eq!(42_u64.hash_salt(7), 42_u64.hash_salt(7));
        assert_ne!("foo".hash_salt(DEFAULT_SALT), "bar".hash_salt(DEFAULT_SALT));
    }

    #[test]
    fn test_salt_perturbs_hash() {
        assert_ne!("foo".hash_salt(1), "foo".hash_salt(2));
        assert_ne!(7_u32.hash_salt(1), 7_u32.hash_salt(2));
    }

    #[test]
    fn test_text_and_bytes_agree() {
        let salt = DEFAULT_SALT;
        let text = "hello world";
        let expected = text.hash_salt(salt);
        assert_eq!(text.to_string().hash_salt(salt), expected);
        assert_eq!(text.as_bytes().hash_salt(salt), expected);
        assert_eq!(text.as_bytes().to_vec().hash_salt(salt), expected);
        assert_eq!((&text).hash_salt(salt), expected);
        assert_eq!(Box::<str>::from(text).hash_salt(salt), expected);
    }

    #[test]
    fn test_scalar_slice_is_single_pass() {
        let words = [1_u32, 2, 3];
        let mut bytes = Vec::new();
        for w in words {
            bytes.extend_from_slice(&w.to_le_bytes());
        }
        assert_eq!(words.hash_salt(9), bytes.hash_salt(9));
    }

    #[test]
    fn test_tuples_thread_salt() {
        let salt = 11;
        let pair = ("foo", 3_u16);
        assert_eq!(pair.hash_salt(salt), 3_u16.hash_salt("foo".hash_salt(salt)));

        let triple = (1_u8, "x", 2_i64);
        let expected = 2_i64.hash_salt("x".hash_salt(1_u8.hash_salt(salt)));
        assert_eq!(triple.hash_salt(salt), expected);

        // order matters
        assert_ne!((1_u8, 2_u8).hash_salt(salt), (2_u8, 1_u8).hash_salt(salt));
    }

    #[test]
    fn test_nested_sequences_are_length_delimited() {
        let flat: Vec<Vec<u8>> = vec![vec![1, 2]];
        let split: Vec<Vec<u8>> = vec![vec![1], vec![2]];
        assert_ne!(flat.hash_salt(0), split.hash_salt(0));

        let empty: Vec<String> = vec![];
        assert_ne!(empty.hash_salt(0), 0);
    }

    #[test]
    fn test_platform_independent_sizes() {
        assert_eq!(5_usize.hash_salt(3), 5_u64.hash_salt(3));
        assert_eq!((-5_isize).hash_salt(3), (-5_i64).hash_salt(3));
        assert_eq!(true.hash_salt(3), 1_u8.hash_salt(3));
        assert_eq!('a'.hash_salt(3), 97_u32.hash_salt(3));
    }

    #[test]
    fn test_float_canonicalization() {
        assert_eq!((-0.0_f64).hash_salt(1), 0.0_f64.hash_salt(1));
        assert_eq!(f64::NAN.hash_salt(1), (-f64::NAN).hash_salt(1));
        assert_eq!((-0.0_f32).hash_salt(1), 0.0_f32.hash_salt(1));
        assert_ne!(1.0_f64.hash_salt(1), 2.0_f64.hash_salt(1));
    }

    #[test]
    fn test_option_distinguishes_none() {
        assert_ne!(None::<u8>.hash_salt(5), Some(0_u8).hash_salt(5));
        assert_eq!(Some("a").hash_salt(5), Some("a").hash_salt(5));
    }

    #[test]
    fn test_via_hash_is_deterministic() {
        #[derive(Hash)]
        struct Key {
            id: u64,
            name: &'static str,
        }

        let a = ViaHash(Key { id: 1, name: "a" });
        let b = ViaHash(Key { id: 1, name: "a" });
        let c = ViaHash(Key { id: 2, name: "a" });
        assert_eq!(a.hash_salt(DEFAULT_SALT), b.hash_salt(DEFAULT_SALT));
        assert_ne!(a.hash_salt(DEFAULT_SALT), c.hash_salt(DEFAULT_SALT));
    }
}
