//! Packaging material reporting per material stream
//!
//! Quarterly report of packaging mass put on the market. Six counted items
//! feed eight component/material combinations; each combination belongs to
//! one material stream and the stream totals are reported in kilograms.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::field::{deserialize_decimal_or_zero, NumericField};

const GRAMS_PER_KILOGRAM: Decimal = Decimal::ONE_THOUSAND;

/// Item counted from the bottling records
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CountedItem {
    Cage,
    Foil,
    Cap,
    Bottle,
    Label,
    Cork,
}

impl CountedItem {
    pub const ALL: [CountedItem; 6] = [
        CountedItem::Cage,
        CountedItem::Foil,
        CountedItem::Cap,
        CountedItem::Bottle,
        CountedItem::Label,
        CountedItem::Cork,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CountedItem::Cage => "Grimmor (st)",
            CountedItem::Foil => "Folie (st)",
            CountedItem::Cap => "Kapsyl (st)",
            CountedItem::Bottle => "Flaska (st)",
            CountedItem::Label => "Etikett (st)",
            CountedItem::Cork => "Kork (st)",
        }
    }
}

/// Material stream the mass is reported under
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MaterialStream {
    AluminiumHousehold,
    SteelHousehold,
    PlasticBHousehold,
    GlassHousehold,
    PaperHousehold,
    WoodHousehold,
    SteelBusiness,
    PlasticBusiness,
}

impl MaterialStream {
    /// Report order
    pub const ALL: [MaterialStream; 8] = [
        MaterialStream::AluminiumHousehold,
        MaterialStream::SteelHousehold,
        MaterialStream::PlasticBHousehold,
        MaterialStream::GlassHousehold,
        MaterialStream::PaperHousehold,
        MaterialStream::WoodHousehold,
        MaterialStream::SteelBusiness,
        MaterialStream::PlasticBusiness,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MaterialStream::AluminiumHousehold => "Aluminium – Hushåll",
            MaterialStream::SteelHousehold => "Stålplåt – Hushåll",
            MaterialStream::PlasticBHousehold => "Plast B – Hushåll",
            MaterialStream::GlassHousehold => "Glas – Hushåll",
            MaterialStream::PaperHousehold => "Papper – Hushåll",
            MaterialStream::WoodHousehold => "Trä – Hushåll",
            MaterialStream::SteelBusiness => "Stålplåt – Verksamhet",
            MaterialStream::PlasticBusiness => "Plast – Verksamhet",
        }
    }
}

/// One component/material combination with its unit weight
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    CageAluminium,
    CageSteel,
    FoilPlastic,
    CapSteel,
    CapPlastic,
    BottleGlass,
    LabelPaper,
    CorkWood,
}

impl Component {
    /// Detail table order
    pub const ALL: [Component; 8] = [
        Component::CageAluminium,
        Component::CageSteel,
        Component::FoilPlastic,
        Component::CapSteel,
        Component::CapPlastic,
        Component::BottleGlass,
        Component::LabelPaper,
        Component::CorkWood,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Component::CageAluminium => "Grimma – Aluminium",
            Component::CageSteel => "Grimma – Stålplåt",
            Component::FoilPlastic => "Folie – Plast B",
            Component::CapSteel => "Kapsyl – Stålplåt",
            Component::CapPlastic => "Kapsyl – Plast",
            Component::BottleGlass => "Flaska – Glas",
            Component::LabelPaper => "Etikett – Papper",
            Component::CorkWood => "Kork – Trä",
        }
    }

    /// Which count drives this component
    pub fn item(&self) -> CountedItem {
        match self {
            Component::CageAluminium | Component::CageSteel => CountedItem::Cage,
            Component::FoilPlastic => CountedItem::Foil,
            Component::CapSteel | Component::CapPlastic => CountedItem::Cap,
            Component::BottleGlass => CountedItem::Bottle,
            Component::LabelPaper => CountedItem::Label,
            Component::CorkWood => CountedItem::Cork,
        }
    }

    pub fn stream(&self) -> MaterialStream {
        match self {
            Component::CageAluminium => MaterialStream::AluminiumHousehold,
            Component::CageSteel => MaterialStream::SteelHousehold,
            Component::FoilPlastic => MaterialStream::PlasticBHousehold,
            Component::CapSteel => MaterialStream::SteelBusiness,
            Component::CapPlastic => MaterialStream::PlasticBusiness,
            Component::BottleGlass => MaterialStream::GlassHousehold,
            Component::LabelPaper => MaterialStream::PaperHousehold,
            Component::CorkWood => MaterialStream::WoodHousehold,
        }
    }

    /// Default unit weight in g/piece
    pub fn default_weight(&self) -> Decimal {
        match self {
            Component::CageAluminium => Decimal::new(16, 1),
            Component::CageSteel => Decimal::new(34, 1),
            Component::FoilPlastic => Decimal::new(28, 1),
            Component::CapSteel => Decimal::new(14, 1),
            Component::CapPlastic => Decimal::new(11, 1),
            Component::BottleGlass => Decimal::new(835, 0),
            Component::LabelPaper => Decimal::new(25, 1),
            Component::CorkWood => Decimal::new(93, 1),
        }
    }
}

// ============================================================================
// Inputs
// ============================================================================

/// Numeric input fields: counts first, then unit weights
pub const PACKAGING_FIELDS: &[NumericField] = &[
    NumericField::new("counts.cage", "Grimmor (st)", None, 1.0, 0).with_min(0.0),
    NumericField::new("counts.foil", "Folie (st)", None, 1.0, 0).with_min(0.0),
    NumericField::new("counts.cap", "Kapsyl (st)", None, 1.0, 0).with_min(0.0),
    NumericField::new("counts.bottle", "Flaska (st)", None, 1.0, 0).with_min(0.0),
    NumericField::new("counts.label", "Etikett (st)", None, 1.0, 0).with_min(0.0),
    NumericField::new("counts.cork", "Kork (st)", None, 1.0, 0).with_min(0.0),
    NumericField::new("weights.cage_aluminium", "Grimma – Aluminium (Hushåll)", Some("g/st"), 0.1, 1).with_min(0.0),
    NumericField::new("weights.cage_steel", "Grimma – Stålplåt (Hushåll)", Some("g/st"), 0.1, 1).with_min(0.0),
    NumericField::new("weights.foil_plastic", "Folie – Plast B (Hushåll)", Some("g/st"), 0.1, 1).with_min(0.0),
    NumericField::new("weights.cap_steel", "Kapsyl – Stålplåt (Verksamhet)", Some("g/st"), 0.1, 1).with_min(0.0),
    NumericField::new("weights.cap_plastic", "Kapsyl – Plast (Verksamhet)", Some("g/st"), 0.1, 1).with_min(0.0),
    NumericField::new("weights.bottle_glass", "Flaska – Glas (Hushåll)", Some("g/st"), 1.0, 0).with_min(0.0),
    NumericField::new("weights.label_paper", "Etikett – Papper (Hushåll)", Some("g/st"), 0.1, 1).with_min(0.0),
    NumericField::new("weights.cork_wood", "Kork – Trä (Hushåll)", Some("g/st"), 0.1, 1).with_min(0.0),
];

/// Counted items; a cleared or unparsable field counts as zero
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ItemCounts {
    #[serde(deserialize_with = "deserialize_decimal_or_zero")]
    pub cage: Decimal,
    #[serde(deserialize_with = "deserialize_decimal_or_zero")]
    pub foil: Decimal,
    #[serde(deserialize_with = "deserialize_decimal_or_zero")]
    pub cap: Decimal,
    #[serde(deserialize_with = "deserialize_decimal_or_zero")]
    pub bottle: Decimal,
    #[serde(deserialize_with = "deserialize_decimal_or_zero")]
    pub label: Decimal,
    #[serde(deserialize_with = "deserialize_decimal_or_zero")]
    pub cork: Decimal,
}

impl ItemCounts {
    pub fn get(&self, item: CountedItem) -> Decimal {
        match item {
            CountedItem::Cage => self.cage,
            CountedItem::Foil => self.foil,
            CountedItem::Cap => self.cap,
            CountedItem::Bottle => self.bottle,
            CountedItem::Label => self.label,
            CountedItem::Cork => self.cork,
        }
    }

    pub fn set(&mut self, item: CountedItem, count: impl Into<Decimal>) {
        let count = count.into();
        match item {
            CountedItem::Cage => self.cage = count,
            CountedItem::Foil => self.foil = count,
            CountedItem::Cap => self.cap = count,
            CountedItem::Bottle => self.bottle = count,
            CountedItem::Label => self.label = count,
            CountedItem::Cork => self.cork = count,
        }
    }
}

/// Unit weights in g/piece, editable when a supplier changes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", default)]
pub struct UnitWeights {
    #[serde(deserialize_with = "deserialize_decimal_or_zero")]
    pub cage_aluminium: Decimal,
    #[serde(deserialize_with = "deserialize_decimal_or_zero")]
    pub cage_steel: Decimal,
    #[serde(deserialize_with = "deserialize_decimal_or_zero")]
    pub foil_plastic: Decimal,
    #[serde(deserialize_with = "deserialize_decimal_or_zero")]
    pub cap_steel: Decimal,
    #[serde(deserialize_with = "deserialize_decimal_or_zero")]
    pub cap_plastic: Decimal,
    #[serde(deserialize_with = "deserialize_decimal_or_zero")]
    pub bottle_glass: Decimal,
    #[serde(deserialize_with = "deserialize_decimal_or_zero")]
    pub label_paper: Decimal,
    #[serde(deserialize_with = "deserialize_decimal_or_zero")]
    pub cork_wood: Decimal,
}

impl Default for UnitWeights {
    fn default() -> Self {
        Self {
            cage_aluminium: Component::CageAluminium.default_weight(),
            cage_steel: Component::CageSteel.default_weight(),
            foil_plastic: Component::FoilPlastic.default_weight(),
            cap_steel: Component::CapSteel.default_weight(),
            cap_plastic: Component::CapPlastic.default_weight(),
            bottle_glass: Component::BottleGlass.default_weight(),
            label_paper: Component::LabelPaper.default_weight(),
            cork_wood: Component::CorkWood.default_weight(),
        }
    }
}

impl UnitWeights {
    pub fn get(&self, component: Component) -> Decimal {
        match component {
            Component::CageAluminium => self.cage_aluminium,
            Component::CageSteel => self.cage_steel,
            Component::FoilPlastic => self.foil_plastic,
            Component::CapSteel => self.cap_steel,
            Component::CapPlastic => self.cap_plastic,
            Component::BottleGlass => self.bottle_glass,
            Component::LabelPaper => self.label_paper,
            Component::CorkWood => self.cork_wood,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PackagingInputs {
    pub counts: ItemCounts,
    pub weights: UnitWeights,
}

// ============================================================================
// Results
// ============================================================================

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComponentRow {
    pub component: Component,
    pub label: &'static str,
    pub count: Decimal,
    pub unit_weight_g: Decimal,
    pub mass_g: Decimal,
    pub mass_kg: String,
    pub stream: &'static str,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StreamTotal {
    pub stream: MaterialStream,
    pub label: &'static str,
    pub mass_g: Decimal,
    pub mass_kg: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PackagingResults {
    pub streams: Vec<StreamTotal>,
    pub components: Vec<ComponentRow>,
}

impl PackagingResults {
    pub fn stream(&self, stream: MaterialStream) -> Option<&StreamTotal> {
        self.streams.iter().find(|s| s.stream == stream)
    }
}

/// Grams to a two-decimal kilogram string
pub fn format_kg(grams: Decimal) -> String {
    let kg = (grams / GRAMS_PER_KILOGRAM).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", kg)
}

impl PackagingInputs {
    pub fn component_mass(&self, component: Component) -> Decimal {
        self.counts.get(component.item()) * self.weights.get(component)
    }

    pub fn calculate(&self) -> PackagingResults {
        let components: Vec<ComponentRow> = Component::ALL
            .iter()
            .map(|&component| {
                let mass_g = self.component_mass(component);
                ComponentRow {
                    component,
                    label: component.label(),
                    count: self.counts.get(component.item()),
                    unit_weight_g: self.weights.get(component),
                    mass_g,
                    mass_kg: format_kg(mass_g),
                    stream: component.stream().label(),
                }
            })
            .collect();

        let streams = MaterialStream::ALL
            .iter()
            .map(|&stream| {
                let mass_g: Decimal = components
                    .iter()
                    .filter(|row| row.component.stream() == stream)
                    .map(|row| row.mass_g)
                    .sum();
                StreamTotal {
                    stream,
                    label: stream.label(),
                    mass_g,
                    mass_kg: format_kg(mass_g),
                }
            })
            .collect();

        PackagingResults { streams, components }
    }
}
