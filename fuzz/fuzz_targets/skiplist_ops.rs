//! Fuzz harness for skip list operations
//!
//! Decodes the input into insert/delete/search operations and mirrors them
//! into a `BTreeMap`, checking that sizes, lookups, and traversal order agree
//! and that the level structure stays consistent.

#![no_main]

use libfuzzer_sys::fuzz_target;
use skipscore_skiplist::SkipList;
use std::collections::BTreeMap;

fuzz_target!(|data: &[u8]| {
    let Some((seed, ops)) = data.split_first_chunk::<8>() else {
        return;
    };
    let mut list = SkipList::seeded(u64::from_le_bytes(*seed));
    let mut model: BTreeMap<i16, u8> = BTreeMap::new();

    for op in ops.chunks_exact(3) {
        let score = i16::from_le_bytes([op[1], op[2]]);
        match op[0] % 3 {
            0 => {
                list.insert(f64::from(score), op[0]);
                model.insert(score, op[0]);
            }
            1 => {
                let removed = list.delete(f64::from(score)).map(|e| e.value);
                assert_eq!(removed, model.remove(&score));
            }
            _ => {
                let found = list.search(f64::from(score)).map(|n| *n.value());
                assert_eq!(found, model.get(&score).copied());
            }
        }
        assert_eq!(list.size(), model.len());
    }

    let actual: Vec<(f64, u8)> = list.iter().map(|(s, v)| (s, *v)).collect();
    let expected: Vec<(f64, u8)> = model.iter().map(|(k, v)| (f64::from(*k), *v)).collect();
    assert_eq!(actual, expected);
    if let Err(err) = list.verify() {
        panic!("structure check failed: {err:#}");
    }
});
