use serde::{Deserialize, Serialize};

/// Sustainability attributes inferred by the vision model for one product.
///
/// Only the numeric fields are required; the descriptive ones are kept when
/// present and otherwise default to empty. Numbers are read as `f64` so
/// replies such as `4.0` or `1.5` score like any other number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcoAttributes {
    #[serde(default)]
    pub clothing_type: Option<String>,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub texture: Option<String>,
    #[serde(default)]
    pub finish: Option<String>,
    #[serde(default)]
    pub design_details: Vec<String>,
    pub wear_lifecycle: WearLifecycle,
    /// 0 for items that are not usually washed.
    pub recommended_wash_frequency_in_wears: f64,
    /// 0 for non-washable items.
    pub estimated_washes_before_deterioration: f64,
    /// 0 if the item is not machine-washed.
    pub recommended_washing_temperature_celsius: f64,
    /// 1–5.
    pub durability_score: f64,
    /// 1–5; higher for items that naturally last longer.
    pub usage_type_score: f64,
    pub eco_impact: EcoImpact,
}

/// Wears before each stage of visible wear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WearLifecycle {
    pub minor_wear: f64,
    pub moderate_wear: f64,
    pub needs_replacing: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcoImpact {
    /// `"natural sustainable"`, `"mixed"`, or `"synthetic"`.
    #[serde(default)]
    pub material_type: Option<String>,
    /// 1–5, lower is worse for the environment.
    pub material_score: f64,
    /// 1–5, 1 = energy intensive, 5 = simple or undyed.
    pub dye_score: f64,
    /// `"low"`, `"medium"`, or `"high"`.
    #[serde(default)]
    pub shipping_footprint: Option<String>,
    /// 1–5, lower is worse for the environment.
    pub shipping_score: f64,
}

/// Every intermediate value of the eco-score computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EcoBreakdown {
    /// Average wears across the lifecycle stages, capped at 25. Reported only;
    /// it is not part of the weighted total.
    pub lifecycle: f64,
    pub durability: f64,
    pub washing: f64,
    pub material_impact: f64,
    pub shipping: f64,
    pub usage_adjustment: f64,
    /// Σ score × weight over the weighted components.
    pub total_score: f64,
    pub total_weight: f64,
    /// Total shrunk toward the prior mean, before clamping and bucketing.
    pub bayesian: f64,
    /// Final score: clamped to 0..=100 and floored to a multiple of 5.
    pub score: u8,
}
