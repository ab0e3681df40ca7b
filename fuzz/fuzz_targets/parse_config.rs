//! Fuzz harness for skip list configuration files
//!
//! Feeds arbitrary text to both config parsers. Anything that parses must
//! also pass validation and be usable to build a list.

#![no_main]

use libfuzzer_sys::fuzz_target;
use skipscore_config::{ConfigFormat, parse_config};
use skipscore_skiplist::SkipList;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    for format in [ConfigFormat::Yaml, ConfigFormat::Json] {
        if let Ok(config) = parse_config(input, format) {
            assert!(config.validate().is_ok());
            assert!(SkipList::<()>::with_config(&config).is_ok());
        }
    }
});
