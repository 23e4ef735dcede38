use crate::config::{risk_thresholds, risk_weights, DEFAULT_ESTIMATED_DIAMETER_KM};
use crate::types::{RawNeoRecord, RiskLevel};

/// Heuristic hazard score for one object (higher = more concerning).
/// Factors: closest recorded miss distance, catalog hazard flag, estimated size.
/// Each threshold is checked independently, so a very close approach earns
/// both distance bonuses and a large object earns both size bonuses.
///
/// A NaN `min_distance_km` fails every comparison and contributes nothing.
pub fn compute_risk_score(min_distance_km: f64, is_hazardous: bool, estimated_diameter_km: f64) -> u32 {
    let mut score = 0;

    if min_distance_km < risk_thresholds::VERY_CLOSE_KM {
        score += risk_weights::VERY_CLOSE;
    }
    if min_distance_km < risk_thresholds::CLOSE_KM {
        score += risk_weights::CLOSE;
    }
    if is_hazardous {
        score += risk_weights::HAZARDOUS;
    }
    if estimated_diameter_km > risk_thresholds::LARGE_DIAMETER_KM {
        score += risk_weights::LARGE;
    }
    if estimated_diameter_km > risk_thresholds::MEDIUM_DIAMETER_KM {
        score += risk_weights::MEDIUM;
    }

    score
}

/// Diameter used for scoring: the catalog estimate, or 0.1 km when the
/// estimate is missing or zero.
pub fn scoring_diameter_km(raw: &RawNeoRecord) -> f64 {
    raw.diameter_km()
        .and_then(|d| d.estimated)
        .filter(|d| *d != 0.0 && !d.is_nan())
        .unwrap_or(DEFAULT_ESTIMATED_DIAMETER_KM)
}

/// Score and classify in one step.
pub fn assess(min_distance_km: f64, is_hazardous: bool, estimated_diameter_km: f64) -> (u32, RiskLevel) {
    let score = compute_risk_score(min_distance_km, is_hazardous, estimated_diameter_km);
    (score, RiskLevel::from_score(score))
}
