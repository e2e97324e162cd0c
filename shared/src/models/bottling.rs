//! Bottling for second fermentation: yeast, nutrients and riddling adjuvant
//!
//! All doses are given per hectolitre of the full wine volume V. The adjuvant
//! is prepared as a stock suspension two days ahead and diluted 1:2 on the
//! morning of bottling.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::field::{fmt0, fmt1, or_zero, NumericField};
use crate::models::dosing::{
    additive_grams, rehydration_litres, DEFAULT_INORGANIC_NUTRIENT, DEFAULT_ORGANIC_NUTRIENT,
    DEFAULT_YEAST, LITRES_PER_HECTOLITRE, MILLILITRES_PER_LITRE,
};
use crate::schedule::{deserialize_optional_date, display_timestamp, Timestamp};
use crate::types::{AdditiveDose, ManualSection};

/// Water added per part of adjuvant stock (1:2 dilution)
pub const ADJUVANT_DILUTION_WATER_PARTS: f64 = 2.0;

/// Working suspension per part of stock after dilution
pub const ADJUVANT_WORKING_PARTS: f64 = 3.0;

/// Grams of adjuvant powder per litre of stock
pub const ADJUVANT_POWDER_G_PER_L: f64 = 30.0;

/// Numeric input fields in page order
pub const BOTTLING_FIELDS: &[NumericField] = &[
    NumericField::new("wineVolume", "Mängd vin", Some("L"), 1.0, 0).with_min(0.0),
    NumericField::new("tirageMustL", "Must (tirage)", Some("L"), 0.1, 1).with_min(0.0),
    NumericField::new("tirageSugarKg", "Socker (tirage)", Some("kg"), 0.1, 1).with_min(0.0),
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
    NumericField::new("inorganicNutrient.doseGPerHl", "Oorganisk näring", Some("g/hL"), 0.1, 1).with_min(0.0),
    NumericField::new("adjuvantMlPerHl", "Adjuvant", Some("mL/hL"), 1.0, 0).with_min(0.0),
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct BottlingInputs {
    /// V, litres of wine
    pub wine_volume: Option<f64>,
    pub wine_name: String,
    pub wine_lot: String,
    #[serde(deserialize_with = "deserialize_optional_date")]
    pub bottling_date: Option<NaiveDate>,
    /// Litres of must in the tirage
    pub tirage_must_l: Option<f64>,
    /// Kilograms of sugar in the tirage
    pub tirage_sugar_kg: Option<f64>,
    pub yeast: AdditiveDose,
    pub organic_nutrient: AdditiveDose,
    /// Dosed dry, no rehydration ratio
    pub inorganic_nutrient: AdditiveDose,
    /// mL of adjuvant stock per hL of wine, before the 1:2 dilution
    pub adjuvant_ml_per_hl: Option<f64>,
}

impl Default for BottlingInputs {
    fn default() -> Self {
        Self {
            wine_volume: Some(2000.0),
            wine_name: "Förstavin 2024".to_string(),
            wine_lot: "2401".to_string(),
            bottling_date: None,
            tirage_must_l: Some(0.0),
            tirage_sugar_kg: Some(0.0),
            yeast: AdditiveDose::new(DEFAULT_YEAST, 10.0, Some(5.0)),
            organic_nutrient: AdditiveDose::new(DEFAULT_ORGANIC_NUTRIENT, 10.0, Some(5.0)),
            inorganic_nutrient: AdditiveDose::new(DEFAULT_INORGANIC_NUTRIENT, 10.0, None),
            // Middle of the recommended 60-80 mL/hL
            adjuvant_ml_per_hl: Some(70.0),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdjuvantPreparation {
    /// Stock suspension before dilution, mL
    pub stock_ml: f64,
    /// Water to add for the 1:2 dilution, mL
    pub dilution_water_ml: f64,
    /// Diluted working suspension, mL
    pub working_ml: f64,
    /// Powder for the stock, g
    pub powder_g: f64,
}

impl AdjuvantPreparation {
    pub fn for_volume(dose_ml_per_hl: f64, wine_volume_l: f64) -> Self {
        let stock_ml = dose_ml_per_hl * (wine_volume_l / LITRES_PER_HECTOLITRE);
        Self {
            stock_ml,
            dilution_water_ml: ADJUVANT_DILUTION_WATER_PARTS * stock_ml,
            working_ml: ADJUVANT_WORKING_PARTS * stock_ml,
            powder_g: ADJUVANT_POWDER_G_PER_L * (stock_ml / MILLILITRES_PER_LITRE),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BottlingSchedule {
    /// Two days before, afternoon
    pub adjuvant_start: Option<Timestamp>,
    pub morning_start: Option<Timestamp>,
    pub yeast_ready: Option<Timestamp>,
    pub union_mix: Option<Timestamp>,
    /// Everything must be ready by this time
    pub deadline: Option<Timestamp>,
}

impl BottlingSchedule {
    pub fn for_date(bottling_date: NaiveDate) -> Self {
        Self {
            adjuvant_start: Timestamp::before(bottling_date, 2, 16, 0),
            morning_start: Timestamp::on(bottling_date, 6, 30),
            yeast_ready: Timestamp::on(bottling_date, 6, 50),
            union_mix: Timestamp::on(bottling_date, 7, 10),
            deadline: Timestamp::on(bottling_date, 7, 30),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BottlingResults {
    pub yeast_g: f64,
    pub organic_nutrient_g: f64,
    pub inorganic_nutrient_g: f64,
    /// The yeast is rehydrated on its own
    pub yeast_water_l: f64,
    /// Informational; the organic nutrient is not rehydrated with the yeast
    pub organic_nutrient_water_l: f64,
    pub adjuvant: AdjuvantPreparation,
    pub tirage_must_l: f64,
    pub tirage_sugar_kg: f64,
    pub bottling_date: NaiveDate,
    pub schedule: BottlingSchedule,
}

impl BottlingInputs {
    /// Defaults with the bottling date set to `today`
    pub fn starting(today: NaiveDate) -> Self {
        Self {
            bottling_date: Some(today),
            ..Self::default()
        }
    }

    /// Compute doses; a missing bottling date falls back to `today`
    pub fn calculate(&self, today: NaiveDate) -> BottlingResults {
        let volume = or_zero(self.wine_volume);
        let yeast_g = additive_grams(or_zero(self.yeast.dose_g_per_hl), volume);
        let organic_nutrient_g = additive_grams(or_zero(self.organic_nutrient.dose_g_per_hl), volume);
        let bottling_date = self.bottling_date.unwrap_or(today);

        BottlingResults {
            yeast_g,
            organic_nutrient_g,
            inorganic_nutrient_g: additive_grams(or_zero(self.inorganic_nutrient.dose_g_per_hl), volume),
            yeast_water_l: rehydration_litres(yeast_g, or_zero(self.yeast.rehydration_ratio)),
            organic_nutrient_water_l: rehydration_litres(
                organic_nutrient_g,
                or_zero(self.organic_nutrient.rehydration_ratio),
            ),
            adjuvant: AdjuvantPreparation::for_volume(or_zero(self.adjuvant_ml_per_hl), volume),
            tirage_must_l: or_zero(self.tirage_must_l),
            tirage_sugar_kg: or_zero(self.tirage_sugar_kg),
            bottling_date,
            schedule: BottlingSchedule::for_date(bottling_date),
        }
    }

    /// Printable checklist for the adjuvant preparation and bottling morning
    pub fn manual(&self, results: &BottlingResults) -> Vec<ManualSection> {
        let yeast = self.yeast.brand_or(DEFAULT_YEAST);
        let organic = self.organic_nutrient.brand_or(DEFAULT_ORGANIC_NUTRIENT);
        let inorganic = self.inorganic_nutrient.brand_or(DEFAULT_INORGANIC_NUTRIENT);
        let adjuvant = &results.adjuvant;
        let schedule = &results.schedule;

        vec![
            ManualSection {
                title: "Förberedelse – Adjuvant 83".to_string(),
                when: Some(display_timestamp(schedule.adjuvant_start)),
                note: Some(
                    "Starta 2 dagar före buteljering (eftermiddag). Låt svälla 24–48 h. \
                     Underhåll omrörning före och under användning."
                        .to_string(),
                ),
                steps: vec![
                    format!(
                        "Blanda stock – mål {} L \u{201c}Liquid Adjuvant\u{201d} (stock, före 1:2).",
                        fmt0(adjuvant.stock_ml / MILLILITRES_PER_LITRE)
                    ),
                    format!(
                        "Tillsätt {} g pulver (30 g/L stock) i kallt dricksvatten. Rör kraftigt \
                         (propeller/omrörare) 1 h, toppa till volym, vila 24–48 h.",
                        fmt0(adjuvant.powder_g)
                    ),
                    "Vid användning: omrör och håll suspensionen i rörelse.".to_string(),
                ],
            },
            ManualSection {
                title: "Buteljeringsmorgon".to_string(),
                when: Some(format!(
                    "{} → senast {}",
                    display_timestamp(schedule.morning_start),
                    display_timestamp(schedule.deadline)
                )),
                note: Some("Allt ska vara klart före 07:30.".to_string()),
                steps: vec![
                    format!(
                        "Återfukta jäst – {} g {} i {} L vatten (37 °C), 20 min. Utan {} i rehyd.",
                        fmt0(results.yeast_g),
                        yeast,
                        fmt1(results.yeast_water_l),
                        organic
                    ),
                    format!(
                        "Späd adjuvant – tillsätt {} mL vatten till stock {} mL (1:2), håll omrört.",
                        fmt0(adjuvant.dilution_water_ml),
                        fmt0(adjuvant.stock_ml)
                    ),
                    format!(
                        "Blanda tirage – {} L must + {} kg socker (17 °C).",
                        fmt1(results.tirage_must_l),
                        fmt1(results.tirage_sugar_kg)
                    ),
                    "Union – förena jäst + adjuvant, håll ≈30 min kontakt.".to_string(),
                    "Inkorporera – tillsätt jäst+adjuvant till vin + tirage, blanda väl, \
                     håll kontinuerlig omrörning under buteljering."
                        .to_string(),
                    format!(
                        "Dosera näring – Organisk: {} g {}; Inorganisk: {} g {}.",
                        fmt0(results.organic_nutrient_g),
                        organic,
                        fmt0(results.inorganic_nutrient_g),
                        inorganic
                    ),
                ],
            },
        ]
    }
}
