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

use googletest::assert_that;
use googletest::prelude::eq;
use googletest::prelude::gt;
use googletest::prelude::lt;
use googletest::prelude::near;
use probset::bloom::suggest_sizing;
use probset::bloom::BloomFilter;
use probset::bloom::BloomFilterBuilder;
use probset::bloom::BloomFilterMut;
use probset::error::ErrorKind;
use probset::hash::ViaHash;

#[test]
fn test_small_filter_exact_behavior() {
    let filter: BloomFilter<str> = BloomFilter::from_items(0.01, ["foo", "bar"]).unwrap();
    assert!(filter.contains("foo"));
    assert!(filter.contains("bar"));
    // no guarantee either way, only that it answers
    let _maybe = filter.contains("quux");
}

#[test]
fn test_empty_filter_contains_nothing() {
    for error_rate in [0.5, 0.01, 1e-9] {
        let filter = BloomFilter::<str>::from_items(error_rate, Vec::<String>::new()).unwrap();
        assert!(filter.is_empty());
        assert_that!(filter.bits_used(), eq(0));
        for item in ["", "foo", "bar", "quux"] {
            assert!(!filter.contains(item));
        }
    }
}

#[test]
fn test_observed_false_positive_rate() {
    let error_rate = 0.01;
    let inserted: Vec<String> = (0..10_000).map(|i| format!("inserted-{i}")).collect();
    let filter: BloomFilter<str> =
        BloomFilter::from_items(error_rate, inserted.iter().map(String::as_str)).unwrap();

    assert!(inserted.iter().all(|item| filter.contains(item)));

    let false_positives = (0..10_000)
        .map(|i| format!("absent-{i}"))
        .filter(|item| filter.contains(item))
        .count();
    let observed = false_positives as f64 / 10_000.0;
    println!("false positive rate: {observed:.5}, target {error_rate}");
    assert_that!(observed, lt(error_rate * 5.0));
}

#[test]
fn test_saturation_at_capacity() {
    let filter: BloomFilter<u32> = BloomFilter::from_items(0.01, 0..10_000_u32).unwrap();
    assert_that!(filter.num_hashes(), eq(7));
    // an optimally sized filter is about half full at capacity
    assert_that!(filter.load_factor(), near(0.5, 0.05));
    assert_that!(filter.estimated_fpp(), near(0.01, 0.005));
}

#[test]
fn test_false_positive_rate_for_integers() {
    let filter: BloomFilter<u64> =
        BloomFilter::from_items(0.001, (0..50_000_u32).map(u64::from)).unwrap();
    assert!((0..50_000_u64).all(|i| filter.contains(&i)));

    let false_positives = (50_000..100_000_u64).filter(|i| filter.contains(i)).count();
    let observed = false_positives as f64 / 50_000.0;
    assert_that!(observed, lt(0.005));
}

#[test]
fn test_item_types() {
    let bytes: BloomFilter<[u8]> =
        BloomFilter::from_items(0.01, [b"abc".as_slice(), b"\x00\xff".as_slice()]).unwrap();
    assert!(bytes.contains(b"abc"));
    assert!(bytes.contains(&[0x00, 0xff]));

    let pairs = vec![(1_u32, "one".to_string()), (2, "two".to_string())];
    let tuples: BloomFilter<(u32, String)> = BloomFilter::from_items(0.01, pairs).unwrap();
    assert!(tuples.contains(&(1, "one".to_string())));
    assert!(tuples.contains(&(2, "two".to_string())));

    let floats: BloomFilter<f64> = BloomFilter::from_items(0.01, [0.0, 1.5, f64::NAN]).unwrap();
    assert!(floats.contains(&-0.0));
    assert!(floats.contains(&1.5));
    assert!(floats.contains(&f64::NAN));

    #[derive(Hash)]
    struct Key(u8, &'static str);
    let keys: BloomFilter<ViaHash<Key>> =
        BloomFilter::from_items(0.01, [ViaHash(Key(1, "a")), ViaHash(Key(2, "b"))]).unwrap();
    assert!(keys.contains(&ViaHash(Key(1, "a"))));
    assert!(keys.contains(&ViaHash(Key(2, "b"))));
}

#[test]
fn test_text_and_bytes_share_bits() {
    let mut text = BloomFilterMut::<str>::with_size(4096, 5);
    let mut bytes = BloomFilterMut::<[u8]>::with_size(4096, 5);
    text.insert("hello");
    bytes.insert(b"hello");
    assert_that!(text.bits_used(), eq(bytes.bits_used()));
    assert!(bytes.contains("hello".as_bytes()));
}

#[test]
fn test_manual_sizing_flow() {
    let sizing = suggest_sizing(500, 0.02).unwrap();
    let mut filter = BloomFilterBuilder::from(sizing).salt(7).build::<String>();
    for i in 0..500 {
        filter.insert(&i.to_string());
    }
    let filter = filter.freeze();
    assert_that!(filter.len(), eq(sizing.num_bits()));
    assert_that!(filter.salt(), eq(7));
    assert!((0..500).all(|i| filter.contains(&i.to_string())));
}

#[test]
fn test_salts_are_independent() {
    let mut a = BloomFilterBuilder::with_size(1 << 16, 4).salt(1).build::<u32>();
    let mut b = BloomFilterBuilder::with_size(1 << 16, 4).salt(2).build::<u32>();
    a.extend(&[1, 2, 3]);
    b.extend(&[1, 2, 3]);
    assert_ne!(a, b);
    assert!((1..=3).all(|i| a.contains(&i) && b.contains(&i)));
}

#[test]
fn test_sizing_rejects_invalid_input() {
    let err = suggest_sizing(0, 0.01).unwrap_err();
    assert_that!(err.kind(), eq(ErrorKind::CapacityTooSmall));
    let err = suggest_sizing(100, 0.0).unwrap_err();
    assert_that!(err.kind(), eq(ErrorKind::InvalidErrorRate));
    let err = suggest_sizing(100, 1.0).unwrap_err();
    assert_that!(err.kind(), eq(ErrorKind::InvalidErrorRate));
    let err = suggest_sizing(u64::from(u32::MAX), 0.0001).unwrap_err();
    assert_that!(err.kind(), eq(ErrorKind::CapacityTooLarge));
}

#[test]
fn test_build_error_is_descriptive() {
    let err = BloomFilter::<str>::from_items(0.0, ["foo"]).unwrap_err();
    assert_that!(err.kind(), eq(ErrorKind::InvalidErrorRate));
    assert!(err.to_string().contains("invalid error rate"));
    assert_that!(err.context().len(), gt(0));
}

#[test]
fn test_concurrent_readers() {
    let items: Vec<u64> = (0..20_000).collect();
    let filter: BloomFilter<u64> = BloomFilter::from_items(0.01, &items).unwrap();
    let filter = std::sync::Arc::new(filter);

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let filter = std::sync::Arc::clone(&filter);
            std::thread::spawn(move || {
                (0..20_000_u64)
                    .filter(|i| i % 8 == t)
                    .all(|i| filter.contains(&i))
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
}
