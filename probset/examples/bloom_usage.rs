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

use probset::bloom::suggest_sizing;
use probset::bloom::BloomFilter;
use probset::bloom::BloomFilterBuilder;
use tracing_subscriber::EnvFilter;

fn main() {
    // RUST_LOG=probset=trace shows freeze events too
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("probset=debug")),
        )
        .init();

    // One call: size, fill and freeze
    let words = ["apple", "banana", "cherry", "damson", "elderberry"];
    let filter: BloomFilter<str> = match BloomFilter::from_items(0.01, words) {
        Ok(filter) => filter,
        Err(err) => {
            eprintln!("cannot build filter: {err}");
            return;
        }
    };
    println!("{filter:?}");
    for word in ["apple", "cherry", "fig", "grape"] {
        println!("  contains({word:?}) = {}", filter.contains(word));
    }

    // Manual control over dimensions
    let capacity = 100_000;
    let sizing = suggest_sizing(capacity, 0.001).expect("valid sizing input");
    println!(
        "\n{capacity} items at 0.1%: {} bits ({:.1} KiB), {} hashes",
        sizing.num_bits(),
        f64::from(sizing.num_bits()) / 8192.0,
        sizing.num_hashes()
    );

    let mut builder = BloomFilterBuilder::from(sizing).build::<u64>();
    for i in 0..capacity {
        builder.insert(&i);
    }
    let filter = builder.freeze();

    let false_positives = (capacity..capacity * 2)
        .filter(|i| filter.contains(i))
        .count();
    println!(
        "load factor {:.3}, estimated fpp {:.5}, observed fpp {:.5}",
        filter.load_factor(),
        filter.estimated_fpp(),
        false_positives as f64 / capacity as f64
    );

    // Sizing failures are values, not panics
    for (capacity, error_rate) in [(0, 0.01), (100, 1.0), (10_000_000_000, 0.01)] {
        if let Err(err) = suggest_sizing(capacity, error_rate) {
            println!("suggest_sizing({capacity}, {error_rate}): {err}");
        }
    }
}
