//! Base-wine dosing: must and sugar needed to reach a tirage target
//!
//! The base wine (volume V at alcohol A0) is topped up with must (M litres at
//! Sm g/L) and crystal sugar (S grams, occupying S/ρ litres) so that the mix
//! reaches the target sugar St and, after the second fermentation, the target
//! alcohol Af. Volume and sugar balances give a closed form for T, M and S.

use serde::{Deserialize, Serialize};

use crate::field::{finite, known, per_volume, ratio, NumericField};
use crate::types::ChartPoint;

/// Input fields in page order
pub const BASE_WINE_FIELDS: &[NumericField] = &[
    NumericField::new("wineVolume", "Vinvolym (V)", Some("L"), 1.0, 0).with_min(0.0),
    NumericField::new("initialAlcohol", "Vinets alkohol (A₀)", Some("%"), 0.05, 2),
    NumericField::new("residualSugar", "RS i basvin (Rᵥ)", Some("g/L"), 0.1, 1),
    NumericField::new("mustSugar", "Mustens socker (Sₘ)", Some("g/L"), 1.0, 0),
    NumericField::new("targetSugar", "Målsocker (Sₜ)", Some("g/L"), 0.5, 1),
    NumericField::new("targetAlcohol", "Slutlig alkohol mål (A_f)", Some("%"), 0.05, 2),
    NumericField::new("gramsPerPercent", "g/L per 1 %-vol", None, 0.05, 2),
    NumericField::new("sucroseDensity", "Densitet sackaros (ρ)", Some("g/L"), 1.0, 0),
];

/// Base-wine calculator inputs; `None` means the field is not filled in
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct BaseWineInputs {
    /// V, litres of base wine
    pub wine_volume: Option<f64>,
    /// A0, % vol of the base wine
    pub initial_alcohol: Option<f64>,
    /// Rv, residual sugar of the base wine in g/L
    pub residual_sugar: Option<f64>,
    /// Sm, sugar content of the must in g/L
    pub must_sugar: Option<f64>,
    /// St, sugar target of the tirage mix in g/L
    pub target_sugar: Option<f64>,
    /// Af, alcohol target after second fermentation in % vol
    pub target_alcohol: Option<f64>,
    /// Grams of sugar per litre that ferment to 1 % vol
    pub grams_per_percent: Option<f64>,
    /// ρ, density of sucrose in g/L
    pub sucrose_density: Option<f64>,
}

impl Default for BaseWineInputs {
    fn default() -> Self {
        Self {
            wine_volume: Some(2000.0),
            initial_alcohol: Some(11.50),
            residual_sugar: Some(3.0),
            must_sugar: Some(200.0),
            target_sugar: Some(24.0),
            target_alcohol: Some(12.50),
            grams_per_percent: Some(16.5),
            sucrose_density: Some(1590.0),
        }
    }
}

/// Outcome of a base-wine calculation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DosingStatus {
    Valid,
    /// At least one input is missing
    Incomplete,
    /// The inputs cannot be met with non-negative must and sugar
    Invalid,
}

/// Forward recomputation of the targets from M and S
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CrossChecks {
    /// V + M + S/ρ
    pub total_volume: Option<f64>,
    /// Sugar of the finished mix, g/L
    pub sugar_concentration: Option<f64>,
    /// Alcohol after second fermentation, % vol
    pub final_alcohol: Option<f64>,
}

/// Sugar per litre of the finished mix by source, g/L
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SugarBreakdown {
    pub from_must: Option<f64>,
    pub from_added_sugar: Option<f64>,
    pub from_residual: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BaseWineResults {
    /// M, litres of must
    pub must_volume: Option<f64>,
    /// S, grams of sugar
    pub added_sugar: Option<f64>,
    /// T, litres of finished mix
    pub total_volume: Option<f64>,
    pub checks: CrossChecks,
    pub breakdown: SugarBreakdown,
    pub status: DosingStatus,
}

impl BaseWineResults {
    pub fn is_valid(&self) -> bool {
        self.status == DosingStatus::Valid
    }

    /// Message shown instead of the figures when they cannot be trusted
    pub fn diagnostic(&self) -> Option<&'static str> {
        match self.status {
            DosingStatus::Valid => None,
            DosingStatus::Incomplete => Some("Fyll i alla fält för att beräkna doseringen."),
            DosingStatus::Invalid => Some(
                "Ogiltig kombination av indata: mustvolym och socker kan inte bli negativa. \
                 Kontrollera målalkohol, målsocker och mustens socker.",
            ),
        }
    }

    /// Bar chart series, sugar per litre by source
    pub fn chart_data(&self) -> Vec<ChartPoint> {
        vec![
            ChartPoint::new("Från must", self.breakdown.from_must),
            ChartPoint::new("Från socker", self.breakdown.from_added_sugar),
            ChartPoint::new("RS basvin", self.breakdown.from_residual),
        ]
    }
}

/// All eight inputs, present and finite
struct Known {
    v: f64,
    a0: f64,
    rv: f64,
    sm: f64,
    st: f64,
    af: f64,
    g_per_pct: f64,
    rho: f64,
}

impl BaseWineInputs {
    fn known(&self) -> Option<Known> {
        Some(Known {
            v: known(self.wine_volume)?,
            a0: known(self.initial_alcohol)?,
            rv: known(self.residual_sugar)?,
            sm: known(self.must_sugar)?,
            st: known(self.target_sugar)?,
            af: known(self.target_alcohol)?,
            g_per_pct: known(self.grams_per_percent)?,
            rho: known(self.sucrose_density)?,
        })
    }

    /// Alcohol the mix must have before the second fermentation, % vol
    pub fn alcohol_before_tirage(&self) -> Option<f64> {
        let k = self.known()?;
        finite(k.af - ratio(k.st, k.g_per_pct)?)
    }

    pub fn calculate(&self) -> BaseWineResults {
        let Some(k) = self.known() else {
            return BaseWineResults {
                must_volume: None,
                added_sugar: None,
                total_volume: None,
                checks: CrossChecks::default(),
                breakdown: SugarBreakdown::default(),
                status: DosingStatus::Incomplete,
            };
        };

        let total_volume = self
            .alcohol_before_tirage()
            .filter(|a| *a > 0.0)
            .and_then(|a| ratio(k.v * k.a0, a));
        let must_volume = total_volume
            .and_then(|t| ratio(k.st * t - k.v * k.rv - k.rho * (t - k.v), k.sm - k.rho));
        let added_sugar = match (total_volume, must_volume) {
            (Some(t), Some(m)) => finite(k.rho * (t - k.v - m)),
            _ => None,
        };

        let checks = match (must_volume, added_sugar) {
            (Some(m), Some(s)) => cross_checks(&k, m, s),
            _ => CrossChecks::default(),
        };

        let breakdown = match total_volume {
            Some(t) => SugarBreakdown {
                from_must: must_volume.and_then(|m| per_volume(k.sm * m, t)),
                from_added_sugar: added_sugar.and_then(|s| per_volume(s, t)),
                from_residual: per_volume(k.rv * k.v, t),
            },
            None => SugarBreakdown::default(),
        };

        let valid = matches!(total_volume, Some(t) if t > 0.0)
            && matches!(must_volume, Some(m) if m >= 0.0)
            && matches!(added_sugar, Some(s) if s >= 0.0);

        BaseWineResults {
            must_volume,
            added_sugar,
            total_volume,
            checks,
            breakdown,
            status: if valid {
                DosingStatus::Valid
            } else {
                DosingStatus::Invalid
            },
        }
    }
}

fn cross_checks(k: &Known, must_volume: f64, added_sugar: f64) -> CrossChecks {
    let total_volume = ratio(added_sugar, k.rho).and_then(|sugar_l| finite(k.v + must_volume + sugar_l));
    let Some(t) = total_volume else {
        return CrossChecks::default();
    };
    let sugar_mass = must_volume * k.sm + added_sugar + k.v * k.rv;
    CrossChecks {
        total_volume,
        sugar_concentration: per_volume(sugar_mass, t),
        final_alcohol: per_volume(k.v * k.a0, t)
            .zip(ratio(k.st, k.g_per_pct))
            .and_then(|(before, produced)| finite(before + produced)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Option<f64>, b: f64, tol: f64) -> bool {
        matches!(a, Some(x) if (x - b).abs() < tol)
    }

    #[test]
    fn test_default_inputs_are_valid() {
        let results = BaseWineInputs::default().calculate();

        assert!(results.is_valid());
        assert!(results.diagnostic().is_none());
        assert!(close(results.total_volume, 2082.3045, 1e-3));
        assert!(close(results.must_volume, 62.5100, 1e-3));
        assert!(close(results.added_sugar, 31473.31, 1e-2));
    }

    #[test]
    fn test_default_cross_checks_match_targets() {
        let results = BaseWineInputs::default().calculate();

        assert!(close(results.checks.total_volume, 2082.3045, 1e-3));
        assert!(close(results.checks.sugar_concentration, 24.0, 1e-9));
        assert!(close(results.checks.final_alcohol, 12.5, 1e-9));
    }

    #[test]
    fn test_breakdown_sums_to_target_sugar() {
        let b = BaseWineInputs::default().calculate().breakdown;
        let sum = b.from_must.unwrap() + b.from_added_sugar.unwrap() + b.from_residual.unwrap();

        assert!((sum - 24.0).abs() < 1e-9);
        assert!(close(b.from_must, 6.0039, 1e-3));
        assert!(close(b.from_residual, 2.8814, 1e-3));
    }

    #[test]
    fn test_missing_field_is_incomplete() {
        let inputs = BaseWineInputs {
            residual_sugar: None,
            ..Default::default()
        };
        let results = inputs.calculate();

        assert_eq!(results.status, DosingStatus::Incomplete);
        assert!(results.must_volume.is_none());
        assert!(results.diagnostic().is_some());
    }

    #[test]
    fn test_nan_field_is_treated_as_missing() {
        let inputs = BaseWineInputs {
            wine_volume: Some(f64::NAN),
            ..Default::default()
        };
        assert_eq!(inputs.calculate().status, DosingStatus::Incomplete);
    }

    #[test]
    fn test_must_sugar_equal_to_density_is_invalid() {
        let inputs = BaseWineInputs {
            must_sugar: Some(1590.0),
            ..Default::default()
        };
        let results = inputs.calculate();

        assert_eq!(results.status, DosingStatus::Invalid);
        assert!(results.must_volume.is_none());
        assert!(results.added_sugar.is_none());
        assert!(results.total_volume.is_some());
    }

    #[test]
    fn test_unreachable_alcohol_target_is_invalid() {
        // 24 g/L ferments to about 1.45 %, so a 1 % target is unreachable.
        let inputs = BaseWineInputs {
            target_alcohol: Some(1.0),
            ..Default::default()
        };
        let results = inputs.calculate();

        assert_eq!(results.status, DosingStatus::Invalid);
        assert!(results.total_volume.is_none());
        assert_eq!(results.breakdown, SugarBreakdown::default());
    }

    #[test]
    fn test_negative_sugar_is_invalid_but_breakdown_is_finite() {
        // Diluting 11.5 % wine down to 11 % needs more must than the sugar
        // target allows, so S comes out negative.
        let inputs = BaseWineInputs {
            target_alcohol: Some(11.0),
            ..Default::default()
        };
        let results = inputs.calculate();

        assert_eq!(results.status, DosingStatus::Invalid);
        assert!(results.added_sugar.unwrap() < 0.0);
        assert!(results.breakdown.from_residual.unwrap().is_finite());
    }

    #[test]
    fn test_zero_volume_is_invalid_without_infinities() {
        let inputs = BaseWineInputs {
            wine_volume: Some(0.0),
            ..Default::default()
        };
        let results = inputs.calculate();

        assert_eq!(results.status, DosingStatus::Invalid);
        assert!(results.breakdown.from_must.is_none());
        assert!(results.breakdown.from_residual.is_none());
    }

    #[test]
    fn test_chart_data_labels_in_order() {
        let names: Vec<String> = BaseWineInputs::default()
            .calculate()
            .chart_data()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Från must", "Från socker", "RS basvin"]);
    }

    #[test]
    fn test_inputs_deserialize_with_missing_fields() {
        let inputs: BaseWineInputs =
            serde_json::from_str(r#"{"wineVolume": 1500, "initialAlcohol": null}"#).unwrap();
        assert_eq!(inputs.wine_volume, Some(1500.0));
        assert_eq!(inputs.initial_alcohol, None);
        assert_eq!(inputs.sucrose_density, Some(1590.0));
    }
}
