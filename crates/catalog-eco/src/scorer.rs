//! Deterministic eco score from model-inferred attributes.
//!
//! Five component scores are weighted into a total, shrunk toward a fixed
//! prior with a Bayesian average, clamped to `0..=100`, and floored to a
//! multiple of 5. All arithmetic is `f64` in a fixed order so identical input
//! always yields the identical score.
//!
//! The wear-lifecycle average is computed and reported in [`EcoBreakdown`] but
//! carries no weight. That matches the scoring the catalog has always used;
//! weighting it would shift every existing score.

use crate::types::{EcoAttributes, EcoBreakdown};

/// Prior mean the weighted total is shrunk toward.
pub const PRIOR_MEAN: f64 = 65.0;

const DURABILITY_WEIGHT: f64 = 25.0;
const WASHING_WEIGHT: f64 = 25.0;
const MATERIAL_WEIGHT: f64 = 25.0;
const SHIPPING_WEIGHT: f64 = 15.0;
const USAGE_WEIGHT: f64 = 10.0;

/// Items washed at or below this temperature get the full temperature score.
const COOL_WASH_MAX_CELSIUS: f64 = 30.0;

/// Computes the bucketed eco score, a multiple of 5 in `0..=100`.
#[must_use]
pub fn compute_eco_score(attrs: &EcoAttributes) -> u8 {
    score_breakdown(attrs).score
}

/// Computes every component of the eco score.
#[must_use]
pub fn score_breakdown(attrs: &EcoAttributes) -> EcoBreakdown {
    let wear = &attrs.wear_lifecycle;
    let lifecycle = ((wear.minor_wear + wear.moderate_wear + wear.needs_replacing) / 3.0).min(25.0);

    let durability = (attrs.durability_score * 2.5).min(25.0);

    let wash_freq = attrs.recommended_wash_frequency_in_wears.min(10.0);
    let temp_score = if attrs.recommended_washing_temperature_celsius <= COOL_WASH_MAX_CELSIUS {
        10.0
    } else {
        5.0
    };
    let wash_deterioration = (attrs.estimated_washes_before_deterioration / 2.0).min(10.0);
    let washing = ((wash_freq + temp_score + wash_deterioration) / 30.0) * 25.0;

    let impact = &attrs.eco_impact;
    let material_impact =
        ((3.0 - impact.material_score) * 6.0 + (3.0 - impact.dye_score) * 6.0).min(25.0);
    let shipping = (3.0 - impact.shipping_score) * 5.0;
    let usage_adjustment = (attrs.usage_type_score / 10.0) * 10.0;

    let weighted = [
        (durability, DURABILITY_WEIGHT),
        (washing, WASHING_WEIGHT),
        (material_impact, MATERIAL_WEIGHT),
        (shipping, SHIPPING_WEIGHT),
        (usage_adjustment, USAGE_WEIGHT),
    ];
    let total_weight = weighted.iter().fold(0.0, |sum, (_, weight)| sum + weight);
    let total_score = weighted
        .iter()
        .fold(0.0, |sum, (score, weight)| sum + score * weight);

    let bayesian = (total_score + total_weight * PRIOR_MEAN) / (total_weight + 1.0);
    let clamped = bayesian.clamp(0.0, 100.0);

    // Floor of a value in 0..=100 divided by 5, times 5: fits in u8.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let score = ((clamped / 5.0).floor() * 5.0) as u8;

    EcoBreakdown {
        lifecycle,
        durability,
        washing,
        material_impact,
        shipping,
        usage_adjustment,
        total_score,
        total_weight,
        bayesian,
        score,
    }
}
