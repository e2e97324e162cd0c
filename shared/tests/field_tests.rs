//! Numeric field table tests
//!
//! - Every field key addresses a value in its page's input record
//! - Typed text parses and formats back with the field's precision

use proptest::prelude::*;
use serde_json::Value;
use shared::field::{field_by_key, NumericField, PLACEHOLDER};
use shared::routes::Route;
use shared::{BaseWineInputs, BottlingInputs, Lot, PackagingInputs, SamplePlan, StarterInputs};

/// Follow a dotted key such as `yeast.doseGPerHl`
fn lookup<'a>(record: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.').try_fold(record, |value, part| value.get(part))
}

fn assert_keys_resolve(fields: &[NumericField], record: &Value) {
    for field in fields {
        assert!(lookup(record, field.key).is_some(), "missing {}", field.key);
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_calculator_keys_match_input_records() {
        assert_keys_resolve(
            Route::BaseWine.fields(),
            &serde_json::to_value(BaseWineInputs::default()).unwrap(),
        );
        assert_keys_resolve(
            Route::Bottling.fields(),
            &serde_json::to_value(BottlingInputs::default()).unwrap(),
        );
        assert_keys_resolve(
            Route::Starter.fields(),
            &serde_json::to_value(StarterInputs::default()).unwrap(),
        );
        assert_keys_resolve(
            Route::Packaging.fields(),
            &serde_json::to_value(PackagingInputs::default()).unwrap(),
        );
    }

    #[test]
    fn test_blend_keys_match_lot_or_sample_plan() {
        let lot = serde_json::to_value(Lot::empty()).unwrap();
        let plan = serde_json::to_value(SamplePlan::default()).unwrap();

        for field in Route::Blend.fields() {
            assert!(
                lookup(&lot, field.key).is_some() || lookup(&plan, field.key).is_some(),
                "missing {}",
                field.key
            );
        }
    }

    #[test]
    fn test_base_wine_defaults_display() {
        let record = serde_json::to_value(BaseWineInputs::default()).unwrap();
        let shown: Vec<String> = Route::BaseWine
            .fields()
            .iter()
            .map(|field| field.format(lookup(&record, field.key).and_then(Value::as_f64)))
            .collect();

        assert_eq!(shown[0], "2000 L");
        assert_eq!(shown[1], "11.50 %");
        assert_eq!(shown[6], "16.50");
    }

    #[test]
    fn test_field_by_key() {
        let field = field_by_key(Route::Bottling.fields(), "adjuvantMlPerHl").unwrap();
        assert_eq!(field.unit, Some("mL/hL"));
        assert!(field_by_key(Route::Bottling.fields(), "starterPercent").is_none());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn field_strategy() -> impl Strategy<Value = &'static NumericField> {
        let fields: Vec<&'static NumericField> = Route::ALL
            .iter()
            .flat_map(|route| route.fields().iter())
            .collect();
        prop::sample::select(fields)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_typed_value_formats_with_field_decimals(
            field in field_strategy(),
            value in 0.0f64..100_000.0f64,
        ) {
            let parsed = field.parse(&value.to_string());
            prop_assert_eq!(parsed, Some(value));

            let shown = field.format(parsed);
            let number = shown.split(' ').next().unwrap();
            let decimals = number.split_once('.').map(|(_, d)| d.len()).unwrap_or(0);
            prop_assert_eq!(decimals as u32, field.decimals);
        }

        #[test]
        fn prop_garbage_is_unknown(field in field_strategy(), text in "[a-z ]{0,8}") {
            prop_assert_eq!(field.parse(&text), None);
            prop_assert!(field.format(None).starts_with(PLACEHOLDER));
        }
    }
}
