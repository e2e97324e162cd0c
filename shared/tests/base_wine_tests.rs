//! Base-wine dosing tests
//!
//! - Cross-checks reproduce the targets for any consistent input
//! - Missing fields never produce numbers
//! - Valid results never carry negative must or sugar

use proptest::prelude::*;
use shared::field::fmt;
use shared::{BaseWineInputs, DosingStatus};

fn close(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() <= 1e-6 * expected.abs().max(1.0)
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_default_inputs_display() {
        let results = BaseWineInputs::default().calculate();

        assert_eq!(results.status, DosingStatus::Valid);
        assert_eq!(fmt(results.total_volume, 1), "2082.3");
        assert_eq!(fmt(results.must_volume, 1), "62.5");
        assert_eq!(fmt(results.added_sugar.map(|g| g / 1000.0), 2), "31.47");
    }

    #[test]
    fn test_json_inputs_from_page() {
        let inputs: BaseWineInputs = serde_json::from_str(
            r#"{"wineVolume": 1000, "initialAlcohol": 11.5, "residualSugar": 2.0}"#,
        )
        .unwrap();
        let results = inputs.calculate();

        assert_eq!(results.status, DosingStatus::Valid);
        assert!(close(results.checks.sugar_concentration.unwrap(), 24.0));
    }

    #[test]
    fn test_results_serialize_unknowns_as_null() {
        let inputs = BaseWineInputs {
            must_sugar: None,
            ..Default::default()
        };
        let json = serde_json::to_value(inputs.calculate()).unwrap();

        assert_eq!(json["status"], "incomplete");
        assert!(json["mustVolume"].is_null());
        assert!(json["breakdown"]["fromMust"].is_null());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn inputs_strategy() -> impl Strategy<Value = BaseWineInputs> {
        (
            100.0..5000.0f64,
            8.0..13.0f64,
            0.0..10.0f64,
            120.0..260.0f64,
            16.0..28.0f64,
            10.0..14.0f64,
            15.0..18.0f64,
            1500.0..1650.0f64,
        )
            .prop_map(|(v, a0, rv, sm, st, af, g, rho)| BaseWineInputs {
                wine_volume: Some(v),
                initial_alcohol: Some(a0),
                residual_sugar: Some(rv),
                must_sugar: Some(sm),
                target_sugar: Some(st),
                target_alcohol: Some(af),
                grams_per_percent: Some(g),
                sucrose_density: Some(rho),
            })
    }

    /// Index of the field to blank out
    fn field_strategy() -> impl Strategy<Value = usize> {
        0..8usize
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Recomputing T, St and Af forward from M and S gives the inputs back
        #[test]
        fn prop_cross_checks_reproduce_targets(inputs in inputs_strategy()) {
            let results = inputs.calculate();
            let t = results.total_volume.unwrap();

            prop_assert!(close(results.checks.total_volume.unwrap(), t));
            prop_assert!(close(
                results.checks.sugar_concentration.unwrap(),
                inputs.target_sugar.unwrap()
            ));
            prop_assert!(close(
                results.checks.final_alcohol.unwrap(),
                inputs.target_alcohol.unwrap()
            ));
        }

        /// Per-litre sugar by source adds up to the target sugar
        #[test]
        fn prop_breakdown_sums_to_target_sugar(inputs in inputs_strategy()) {
            let b = inputs.calculate().breakdown;
            let sum = b.from_must.unwrap() + b.from_added_sugar.unwrap() + b.from_residual.unwrap();
            prop_assert!(close(sum, inputs.target_sugar.unwrap()));
        }

        #[test]
        fn prop_valid_means_non_negative(inputs in inputs_strategy()) {
            let results = inputs.calculate();
            if results.is_valid() {
                prop_assert!(results.total_volume.unwrap() > 0.0);
                prop_assert!(results.must_volume.unwrap() >= 0.0);
                prop_assert!(results.added_sugar.unwrap() >= 0.0);
                prop_assert!(results.diagnostic().is_none());
            } else {
                prop_assert!(results.diagnostic().is_some());
            }
        }

        #[test]
        fn prop_missing_field_is_incomplete(inputs in inputs_strategy(), field in field_strategy()) {
            let mut inputs = inputs;
            let slot = match field {
                0 => &mut inputs.wine_volume,
                1 => &mut inputs.initial_alcohol,
                2 => &mut inputs.residual_sugar,
                3 => &mut inputs.must_sugar,
                4 => &mut inputs.target_sugar,
                5 => &mut inputs.target_alcohol,
                6 => &mut inputs.grams_per_percent,
                _ => &mut inputs.sucrose_density,
            };
            *slot = None;

            let results = inputs.calculate();
            prop_assert_eq!(results.status, DosingStatus::Incomplete);
            prop_assert!(results.must_volume.is_none());
            prop_assert!(results.added_sugar.is_none());
            prop_assert!(results.chart_data().iter().all(|p| p.value.is_none()));
        }
    }
}
