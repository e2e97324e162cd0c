//! Yeast starter for second fermentation, built in three stages
//!
//! Stage 1 rehydrates yeast and organic nutrient, stage 2 acclimatises the
//! culture to wine and sugar, stage 3 grows it to its final size over about
//! three days. Stage 2 and stage 3 quantities are fixed fractions of the wine
//! volume V; stage 3 fractions are cumulative targets, so only the part not
//! already added in stage 2 is dosed.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::field::{fmt0, fmt1, or_zero, ratio, NumericField};
use crate::models::dosing::{
    additive_grams, rehydration_litres, DEFAULT_INORGANIC_NUTRIENT, DEFAULT_ORGANIC_NUTRIENT,
    DEFAULT_YEAST, MILLILITRES_PER_LITRE,
};
use crate::schedule::{deserialize_optional_date, display_timestamp, Timestamp};
use crate::types::{AdditiveDose, ManualSection};

/// Days before bottling on which the starter is begun
pub const STARTER_LEAD_DAYS: u64 = 3;

// ============================================================================
// Coefficients
// ============================================================================

/// Stage 2 and stage 3 quantities as fractions of the wine volume
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BuildCoefficients {
    /// L wine per L of V
    pub stage2_wine: f64,
    /// L water per L of V
    pub stage2_water: f64,
    /// kg sugar per L of V
    pub stage2_sugar: f64,
    /// L of volume contributed per kg of dissolved sugar
    pub sugar_volume_l_per_kg: f64,
    pub stage3_sugar: f64,
    pub stage3_wine: f64,
    pub stage3_water: f64,
}

impl BuildCoefficients {
    pub const STANDARD: Self = Self {
        stage2_wine: 0.001,
        stage2_water: 0.002,
        stage2_sugar: 0.0005,
        sugar_volume_l_per_kg: 0.63,
        stage3_sugar: 0.0031,
        stage3_wine: 0.0158,
        stage3_water: 0.0122,
    };
}

impl Default for BuildCoefficients {
    fn default() -> Self {
        Self::STANDARD
    }
}

// ============================================================================
// Inputs
// ============================================================================

/// Numeric input fields in page order
pub const STARTER_FIELDS: &[NumericField] = &[
    NumericField::new("wineVolume", "Mängd vin", Some("L"), 1.0, 0).with_min(0.0),
    NumericField::new("yeast.doseGPerHl", "Jäst", Some("g/hL"), 0.1, 1).with_min(0.0),
    NumericField::new("yeast.rehydrationRatio", "Jäst, rehydrering", Some("× vikt i vatten"), 1.0, 0)
        .with_min(0.0),
    NumericField::new("organicNutrient.doseGPerHl", "Organisk näring", Some("g/hL"), 0.1, 1).with_min(0.0),
    NumericField::new(
        "organicNutrient.rehydrationRatio",
        "Organisk näring, rehydrering",
        Some("× vikt i vatten"),
        1.0,
        0,
    )
    .with_min(0.0),
    NumericField::new(
        "inorganicNutrient.doseGPerHl",
        "Oorganisk näring",
        Some("g/hL av jäststart"),
        0.1,
        1,
    )
    .with_min(0.0),
    NumericField::new("starterPercent", "Jäststart", Some("%"), 0.1, 1).with_min(0.0),
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct StarterInputs {
    pub wine_volume: Option<f64>,
    pub wine_name: String,
    pub wine_lot: String,
    #[serde(deserialize_with = "deserialize_optional_date")]
    pub bottling_date: Option<NaiveDate>,
    /// Dosed on V
    pub yeast: AdditiveDose,
    /// Dosed on V
    pub organic_nutrient: AdditiveDose,
    /// Dosed on the stage 2 culture volume, not on V
    pub inorganic_nutrient: AdditiveDose,
    /// Informative starter size as % of V
    pub starter_percent: Option<f64>,
}

impl Default for StarterInputs {
    fn default() -> Self {
        Self {
            wine_volume: Some(2000.0),
            wine_name: "Förstavin 2024".to_string(),
            wine_lot: "2401".to_string(),
            bottling_date: None,
            yeast: AdditiveDose::new(DEFAULT_YEAST, 10.0, Some(5.0)),
            organic_nutrient: AdditiveDose::new(DEFAULT_ORGANIC_NUTRIENT, 10.0, Some(5.0)),
            inorganic_nutrient: AdditiveDose::new(DEFAULT_INORGANIC_NUTRIENT, 30.0, None),
            starter_percent: Some(3.0),
        }
    }
}

// ============================================================================
// Results
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RehydrationStage {
    pub yeast_water_l: f64,
    pub organic_nutrient_water_l: f64,
    /// Yeast and nutrient are rehydrated together in this much water
    pub water_l: f64,
    /// Water plus solids, counting 1 kg of solids as 1 L
    pub mix_l: f64,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AcclimatisationStage {
    pub wine_l: f64,
    pub water_l: f64,
    pub sugar_kg: f64,
    pub sugar_volume_l: f64,
    /// Culture volume after stage 2
    pub starter_volume_l: f64,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DevelopmentStage {
    pub sugar_target_kg: f64,
    pub wine_target_l: f64,
    pub water_target_l: f64,
    pub sugar_add_kg: f64,
    pub wine_add_l: f64,
    pub water_add_l: f64,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StarterSchedule {
    pub rehydration: Option<Timestamp>,
    pub acclimatisation: Option<Timestamp>,
    pub development: Option<Timestamp>,
}

impl StarterSchedule {
    /// All three stages run on the first day of the build
    pub fn for_date(bottling_date: NaiveDate) -> Self {
        let start = starter_start_date(bottling_date);
        let at = |hour, minute| start.and_then(|day| Timestamp::on(day, hour, minute));
        Self {
            rehydration: at(8, 0),
            acclimatisation: at(8, 30),
            development: at(16, 0),
        }
    }
}

/// One pre-filled row of the density and aeration log
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JournalRow {
    pub date: String,
    pub time: String,
}

impl From<Timestamp> for JournalRow {
    fn from(at: Timestamp) -> Self {
        Self {
            date: at.date_string(),
            time: at.time_string(),
        }
    }
}

/// Log slots from the start of stage 3 until the bottling morning
///
/// Day -3 at 16:00, then 08:00 and 16:00 on every following day before
/// bottling, then 07:00 on the bottling day.
pub fn journal_rows(bottling_date: NaiveDate) -> Vec<JournalRow> {
    let mut rows: Vec<JournalRow> = Vec::new();
    rows.extend(
        starter_start_date(bottling_date)
            .and_then(|day| Timestamp::on(day, 16, 0))
            .map(JournalRow::from),
    );

    for days_before in (1..STARTER_LEAD_DAYS).rev() {
        for (hour, minute) in [(8, 0), (16, 0)] {
            rows.extend(Timestamp::before(bottling_date, days_before, hour, minute).map(JournalRow::from));
        }
    }

    rows.extend(Timestamp::on(bottling_date, 7, 0).map(JournalRow::from));
    rows
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StarterResults {
    /// starter_percent / 100 × V, informative only
    pub starter_amount_l: f64,
    pub yeast_g: f64,
    pub organic_nutrient_g: f64,
    pub inorganic_nutrient_g: f64,
    pub rehydration: RehydrationStage,
    pub acclimatisation: AcclimatisationStage,
    pub development: DevelopmentStage,
    /// Stage 2 culture as % of V, unknown when V ≤ 0
    pub starter_percent_of_volume: Option<f64>,
    pub bottling_date: NaiveDate,
    pub schedule: StarterSchedule,
}

// ============================================================================
// Calculation
// ============================================================================

impl StarterInputs {
    pub fn starting(today: NaiveDate) -> Self {
        Self {
            bottling_date: Some(today),
            ..Self::default()
        }
    }

    pub fn calculate(&self, today: NaiveDate) -> StarterResults {
        self.calculate_with(&BuildCoefficients::STANDARD, today)
    }

    pub fn calculate_with(&self, k: &BuildCoefficients, today: NaiveDate) -> StarterResults {
        let volume = or_zero(self.wine_volume);

        let yeast_g = additive_grams(or_zero(self.yeast.dose_g_per_hl), volume);
        let organic_nutrient_g = additive_grams(or_zero(self.organic_nutrient.dose_g_per_hl), volume);

        let yeast_water_l = rehydration_litres(yeast_g, or_zero(self.yeast.rehydration_ratio));
        let organic_nutrient_water_l =
            rehydration_litres(organic_nutrient_g, or_zero(self.organic_nutrient.rehydration_ratio));
        let water_l = yeast_water_l + organic_nutrient_water_l;
        let rehydration = RehydrationStage {
            yeast_water_l,
            organic_nutrient_water_l,
            water_l,
            mix_l: water_l + (yeast_g + organic_nutrient_g) / MILLILITRES_PER_LITRE,
        };

        let sugar_kg = k.stage2_sugar * volume;
        let sugar_volume_l = k.sugar_volume_l_per_kg * sugar_kg;
        let wine_l = k.stage2_wine * volume;
        let stage2_water_l = k.stage2_water * volume;
        let acclimatisation = AcclimatisationStage {
            wine_l,
            water_l: stage2_water_l,
            sugar_kg,
            sugar_volume_l,
            starter_volume_l: rehydration.mix_l + wine_l + stage2_water_l + sugar_volume_l,
        };

        let sugar_target_kg = k.stage3_sugar * volume;
        let wine_target_l = k.stage3_wine * volume;
        let water_target_l = k.stage3_water * volume;
        let development = DevelopmentStage {
            sugar_target_kg,
            wine_target_l,
            water_target_l,
            sugar_add_kg: remaining(sugar_target_kg, acclimatisation.sugar_kg),
            wine_add_l: remaining(wine_target_l, acclimatisation.wine_l),
            water_add_l: remaining(water_target_l, acclimatisation.water_l),
        };

        let starter_percent_of_volume = if volume > 0.0 {
            ratio(acclimatisation.starter_volume_l, volume).map(|r| r * 100.0)
        } else {
            None
        };

        let bottling_date = self.bottling_date.unwrap_or(today);

        StarterResults {
            starter_amount_l: or_zero(self.starter_percent) / 100.0 * volume,
            yeast_g,
            organic_nutrient_g,
            inorganic_nutrient_g: additive_grams(
                or_zero(self.inorganic_nutrient.dose_g_per_hl),
                acclimatisation.starter_volume_l,
            ),
            rehydration,
            acclimatisation,
            development,
            starter_percent_of_volume,
            bottling_date,
            schedule: StarterSchedule::for_date(bottling_date),
        }
    }

    /// Printable three-stage build instructions
    pub fn manual(&self, results: &StarterResults) -> Vec<ManualSection> {
        let yeast = self.yeast.brand_or(DEFAULT_YEAST);
        let organic = self.organic_nutrient.brand_or(DEFAULT_ORGANIC_NUTRIENT);
        let inorganic = self.inorganic_nutrient.brand_or(DEFAULT_INORGANIC_NUTRIENT);
        let stage1 = &results.rehydration;
        let stage2 = &results.acclimatisation;
        let stage3 = &results.development;

        vec![
            ManualSection {
                title: "Steg 1 – Återfuktning".to_string(),
                when: Some(display_timestamp(results.schedule.rehydration)),
                note: Some("Tid: 20–30 min. Blanda väl i början av återfuktningen och igen innan nästa steg.".to_string()),
                steps: vec![
                    format!("{} g {}", fmt0(results.organic_nutrient_g), organic),
                    format!("{} g {}", fmt0(results.yeast_g), yeast),
                    format!("{} L vatten (35–38 °C)", fmt1(stage1.water_l)),
                ],
            },
            ManualSection {
                title: "Steg 2 – Acklimatisering".to_string(),
                when: Some(display_timestamp(results.schedule.acclimatisation)),
                note: Some("Tid: 6–12 timmar".to_string()),
                steps: vec![
                    format!("{} L återfuktad jäst (allt från steg 1)", fmt1(stage1.mix_l)),
                    format!("{} kg socker", fmt1(stage2.sugar_kg)),
                    format!("{} L basvin (17 °C)", fmt1(stage2.wine_l)),
                    format!("{} L vatten (17 °C)", fmt1(stage2.water_l)),
                    format!("{} g DAP ({})", fmt0(results.inorganic_nutrient_g), inorganic),
                ],
            },
            ManualSection {
                title: "Steg 3 – Utveckling".to_string(),
                when: Some(display_timestamp(results.schedule.development)),
                note: Some("Tid: ≈ 3 dagar".to_string()),
                steps: vec![
                    format!("{} L (redan blandad från steg 2)", fmt1(stage2.starter_volume_l)),
                    format!("{} kg socker", fmt1(stage3.sugar_add_kg)),
                    format!("{} L basvin (17 °C)", fmt1(stage3.wine_add_l)),
                    format!("{} L vatten (17 °C)", fmt1(stage3.water_add_l)),
                ],
            },
            ManualSection {
                title: "Vägledning under utveckling".to_string(),
                when: None,
                note: None,
                steps: vec![
                    "Mät densitet – se till att den inte går under 996.".to_string(),
                    "Om kulturen är för aktiv och densiteten sjunker för snabbt: tillsätt socker och 4× vikten i vatten.".to_string(),
                    "Om kulturen går för långsamt: höj temperaturen.".to_string(),
                    "Fram till densiteten når ca 1000 vid 20 °C: lufta 2× dagligen.".to_string(),
                    "Fram till densiteten når 996–998: sänk temperaturen gradvis till 16 °C och fortsätt lufta.".to_string(),
                ],
            },
        ]
    }
}

/// What is left to add to reach a cumulative target, never negative
fn remaining(target: f64, already_added: f64) -> f64 {
    (target - already_added).max(0.0)
}

/// First calendar day of the starter build
pub fn starter_start_date(bottling_date: NaiveDate) -> Option<NaiveDate> {
    bottling_date.checked_sub_days(Days::new(STARTER_LEAD_DAYS))
}
