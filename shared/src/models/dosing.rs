//! Dose-rate arithmetic shared by the bottling and starter pages

/// Dose rates are given per hectolitre
pub const LITRES_PER_HECTOLITRE: f64 = 100.0;

/// Rehydration ratios are millilitres of water per gram of additive
pub const MILLILITRES_PER_LITRE: f64 = 1000.0;

pub const DEFAULT_YEAST: &str = "DV10";
pub const DEFAULT_ORGANIC_NUTRIENT: &str = "Start Y SP";
pub const DEFAULT_INORGANIC_NUTRIENT: &str = "Phosphate Compose";

/// Grams of additive for `volume_l` litres at `dose` g/hL
pub fn additive_grams(dose_g_per_hl: f64, volume_l: f64) -> f64 {
    dose_g_per_hl * (volume_l / LITRES_PER_HECTOLITRE)
}

/// Litres of water to rehydrate `mass_g` grams at `ratio` times its weight
pub fn rehydration_litres(mass_g: f64, ratio: f64) -> f64 {
    mass_g * ratio / MILLILITRES_PER_LITRE
}
