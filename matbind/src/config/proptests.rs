//! Property-based tests for configuration merging and validation.

use super::merger::ConfigMerger;
use super::schema::Config;
use super::validator::ConfigValidator;
use crate::binding::{Purpose, Strength};
use proptest::prelude::*;

fn purpose_strategy() -> impl Strategy<Value = Purpose> {
    prop::sample::select(Purpose::ALL.to_vec())
}

fn strength_strategy() -> impl Strategy<Value = Strength> {
    prop::sample::select(vec![
        Strength::FallbackStrength,
        Strength::StrongerThanDescendants,
        Strength::WeakerThanDescendants,
    ])
}

fn config_strategy() -> impl Strategy<Value = Config> {
    (
        prop::option::of(purpose_strategy()),
        prop::option::of(strength_strategy()),
        prop::option::of(0u32..50),
        prop::option::of("[a-zA-Z]{0,12}"),
    )
        .prop_map(|(purpose, strength, limit, key)| Config {
            default_purpose: purpose,
            default_strength: strength,
            unbind_limit: limit,
            material_id_key: key,
            ..Default::default()
        })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    // Fields set in the higher source win; unset fields keep the lower value
    #[test]
    fn merge_higher_precedence_wins(low in config_strategy(), high in config_strategy()) {
        let mut merged = low.clone();
        ConfigMerger::merge_into(&mut merged, &high);
        prop_assert_eq!(merged.default_purpose, high.default_purpose.or(low.default_purpose));
        prop_assert_eq!(merged.default_strength, high.default_strength.or(low.default_strength));
        prop_assert_eq!(merged.unbind_limit, high.unbind_limit.or(low.unbind_limit));
        prop_assert_eq!(
            merged.material_id_key,
            high.material_id_key.or(low.material_id_key)
        );
    }

    // Merging a config into itself changes nothing
    #[test]
    fn merge_is_idempotent(config in config_strategy()) {
        let mut merged = config.clone();
        ConfigMerger::merge_into(&mut merged, &config);
        prop_assert_eq!(merged, config);
    }

    // Validation accepts exactly the positive limits and non-empty keys
    #[test]
    fn validation_matches_rules(config in config_strategy()) {
        let expected = config.unbind_limit != Some(0)
            && config.material_id_key.as_deref().map_or(true, |k| !k.is_empty());
        prop_assert_eq!(ConfigValidator::validate(&config).is_ok(), expected);
    }
}
