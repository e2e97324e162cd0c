//! Blend composition: volume-weighted analyses over a set of lots

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::field::{finite, known, or_zero, per_volume, NumericField};
use crate::types::ChartPoint;

/// Label used for a lot whose name field is empty
pub const UNNAMED_LOT: &str = "(utan namn)";

/// Numeric lot columns, then the tasting sample inputs
pub const BLEND_FIELDS: &[NumericField] = &[
    NumericField::new("volume", "Volym", Some("L"), 1.0, 0).with_min(0.0),
    NumericField::new("alcohol", "Alk", Some("%"), 0.01, 2),
    NumericField::new("residualSugar", "RS", Some("g/L"), 0.1, 1),
    NumericField::new("titratableAcid", "TA", Some("g/L"), 0.01, 2),
    NumericField::new("ph", "pH", None, 0.01, 2),
    NumericField::new("tasters", "Antal provare", None, 1.0, 0).with_min(0.0),
    NumericField::new("clPerGlass", "Mängd per provglas", Some("cl"), 0.5, 1).with_min(0.0),
];

/// One batch of wine going into the blend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Lot {
    pub id: Uuid,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tank: String,
    /// Litres
    #[serde(default)]
    pub volume: Option<f64>,
    /// % vol
    #[serde(default)]
    pub alcohol: Option<f64>,
    /// g/L
    #[serde(default)]
    pub residual_sugar: Option<f64>,
    /// g/L
    #[serde(default)]
    pub titratable_acid: Option<f64>,
    #[serde(default)]
    pub ph: Option<f64>,
}

impl Lot {
    /// A fresh row with a generated id and every field empty
    pub fn empty() -> Self {
        Self {
            id: Uuid::new_v4(),
            selected: false,
            name: String::new(),
            tank: String::new(),
            volume: None,
            alcohol: None,
            residual_sugar: None,
            titratable_acid: None,
            ph: None,
        }
    }

    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            UNNAMED_LOT
        } else {
            &self.name
        }
    }

    /// Volume counted towards the blend; negative or missing volumes are left out
    pub fn counted_volume(&self) -> Option<f64> {
        known(self.volume).filter(|v| *v >= 0.0)
    }

    fn analysis(&self, analysis: Analysis) -> Option<f64> {
        match analysis {
            Analysis::Alcohol => self.alcohol,
            Analysis::ResidualSugar => self.residual_sugar,
            Analysis::TitratableAcid => self.titratable_acid,
            Analysis::Ph => self.ph,
        }
    }
}

/// Lab analyses carried by each lot
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Analysis {
    Alcohol,
    ResidualSugar,
    TitratableAcid,
    /// Averaged linearly like the others, which is a known simplification
    /// for a logarithmic quantity.
    Ph,
}

/// Volume-weighted analyses of the whole blend
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BlendAnalyses {
    pub alcohol: Option<f64>,
    pub residual_sugar: Option<f64>,
    pub titratable_acid: Option<f64>,
    pub ph: Option<f64>,
}

/// One lot's slice of the volume-share pie chart
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PieShare {
    pub name: String,
    pub value: f64,
    /// Percent of the total volume
    pub percent: f64,
}

/// How much of each lot goes into a tasting sample of the blend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SampleDraw {
    pub id: Uuid,
    pub name: String,
    pub tank: String,
    /// Percent of the blend volume
    pub share_percent: f64,
    pub millilitres: f64,
}

/// Tasting sample ("provblend") parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SamplePlan {
    pub tasters: Option<f64>,
    /// Centilitres poured per glass
    pub cl_per_glass: Option<f64>,
}

impl Default for SamplePlan {
    fn default() -> Self {
        Self {
            tasters: Some(4.0),
            cl_per_glass: Some(4.0),
        }
    }
}

impl SamplePlan {
    /// Total sample volume in mL
    pub fn total_ml(&self) -> f64 {
        or_zero(self.tasters) * or_zero(self.cl_per_glass) * 10.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BlendResults {
    pub total_volume: f64,
    pub analyses: BlendAnalyses,
    pub pie: Vec<PieShare>,
    pub sample_total_ml: f64,
    pub sample: Vec<SampleDraw>,
}

/// The editable list of lots on the blend page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Blend {
    lots: Vec<Lot>,
    #[serde(default)]
    pub sample_plan: SamplePlan,
}

impl Default for Blend {
    fn default() -> Self {
        Self::new()
    }
}

impl Blend {
    /// A blend with one empty row, as the page starts
    pub fn new() -> Self {
        Self {
            lots: vec![Lot::empty()],
            sample_plan: SamplePlan::default(),
        }
    }

    pub fn from_lots(lots: Vec<Lot>) -> Self {
        Self {
            lots,
            sample_plan: SamplePlan::default(),
        }
    }

    pub fn lots(&self) -> &[Lot] {
        &self.lots
    }

    /// Append an empty lot and return its id
    pub fn add_lot(&mut self) -> Uuid {
        let lot = Lot::empty();
        let id = lot.id;
        self.lots.push(lot);
        id
    }

    pub fn push(&mut self, lot: Lot) {
        self.lots.push(lot);
    }

    pub fn lot_mut(&mut self, id: Uuid) -> Option<&mut Lot> {
        self.lots.iter_mut().find(|lot| lot.id == id)
    }

    pub fn set_selected(&mut self, id: Uuid, selected: bool) -> bool {
        match self.lot_mut(id) {
            Some(lot) => {
                lot.selected = selected;
                true
            }
            None => false,
        }
    }

    pub fn select_all(&mut self, selected: bool) {
        for lot in &mut self.lots {
            lot.selected = selected;
        }
    }

    pub fn all_selected(&self) -> bool {
        !self.lots.is_empty() && self.lots.iter().all(|lot| lot.selected)
    }

    /// Drop every selected lot, returning how many were removed
    pub fn remove_selected(&mut self) -> usize {
        let before = self.lots.len();
        self.lots.retain(|lot| !lot.selected);
        before - self.lots.len()
    }

    /// Start over with a single empty row
    pub fn clear(&mut self) {
        self.lots = vec![Lot::empty()];
    }

    pub fn total_volume(&self) -> f64 {
        self.lots.iter().filter_map(Lot::counted_volume).sum()
    }

    /// Volume-weighted value of one analysis, undefined for an empty blend
    pub fn weighted(&self, analysis: Analysis) -> Option<f64> {
        let total = self.total_volume();
        let weighted_sum: f64 = self
            .lots
            .iter()
            .filter_map(|lot| {
                let volume = lot.counted_volume()?;
                finite(volume * known(lot.analysis(analysis))?)
            })
            .sum();
        per_volume(weighted_sum, total)
    }

    pub fn analyses(&self) -> BlendAnalyses {
        BlendAnalyses {
            alcohol: self.weighted(Analysis::Alcohol),
            residual_sugar: self.weighted(Analysis::ResidualSugar),
            titratable_acid: self.weighted(Analysis::TitratableAcid),
            ph: self.weighted(Analysis::Ph),
        }
    }

    /// Pie slices for lots with volume, in insertion order
    pub fn pie_data(&self) -> Vec<PieShare> {
        let total = self.total_volume();
        if total <= 0.0 {
            return Vec::new();
        }
        self.lots
            .iter()
            .filter_map(|lot| {
                let volume = lot.counted_volume().filter(|v| *v > 0.0)?;
                Some(PieShare {
                    name: lot.display_name().to_string(),
                    value: volume,
                    percent: volume / total.max(1.0) * 100.0,
                })
            })
            .collect()
    }

    pub fn chart_data(&self) -> Vec<ChartPoint> {
        self.pie_data()
            .into_iter()
            .map(|share| ChartPoint::new(share.name, Some(share.value)))
            .collect()
    }

    /// Draw per lot for the tasting sample, one row per lot
    pub fn sample_draws(&self) -> Vec<SampleDraw> {
        let total = self.total_volume();
        let sample_ml = self.sample_plan.total_ml();
        self.lots
            .iter()
            .map(|lot| {
                let fraction = per_volume(lot.counted_volume().unwrap_or(0.0), total).unwrap_or(0.0);
                SampleDraw {
                    id: lot.id,
                    name: lot.display_name().to_string(),
                    tank: lot.tank.clone(),
                    share_percent: fraction * 100.0,
                    millilitres: sample_ml * fraction,
                }
            })
            .collect()
    }

    pub fn calculate(&self) -> BlendResults {
        BlendResults {
            total_volume: self.total_volume(),
            analyses: self.analyses(),
            pie: self.pie_data(),
            sample_total_ml: self.sample_plan.total_ml(),
            sample: self.sample_draws(),
        }
    }
}
