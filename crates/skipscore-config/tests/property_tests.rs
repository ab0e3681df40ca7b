//! Property tests for skipscore-config
//!
//! Validation must accept exactly the parameter space the level generator
//! can work with.

use proptest::prelude::*;
use skipscore_config::{ConfigFormat, MAX_LEVEL_LIMIT, SkipListConfig, parse_config};

proptest! {
    /// Any max_level inside the limit and any open-interval probability is accepted
    #[test]
    fn prop_valid_parameters_accepted(
        max_level in 1..=MAX_LEVEL_LIMIT,
        probability in 0.001f64..0.999,
    ) {
        let config = SkipListConfig::new()
            .with_max_level(max_level)
            .with_probability(probability);
        prop_assert!(config.validate().is_ok());
    }

    /// max_level above the limit is always rejected
    #[test]
    fn prop_oversized_max_level_rejected(max_level in (MAX_LEVEL_LIMIT + 1)..1000usize) {
        let config = SkipListConfig::new().with_max_level(max_level);
        prop_assert!(config.validate().is_err());
    }

    /// Probabilities outside (0, 1) are always rejected
    #[test]
    fn prop_out_of_range_probability_rejected(
        probability in prop_oneof![-10.0f64..=0.0, 1.0f64..10.0],
    ) {
        let config = SkipListConfig::new().with_probability(probability);
        prop_assert!(config.validate().is_err());
    }

    /// A parsed seed survives exactly
    #[test]
    fn prop_seed_parsed_exactly(seed in any::<u64>()) {
        let json = format!(r#"{{"seed": {seed}}}"#);
        let config = parse_config(&json, ConfigFormat::Json).unwrap();
        prop_assert_eq!(config.seed, Some(seed));
    }
}
