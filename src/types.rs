use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Upstream APIs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Upstream {
    Apod,
    Mars,
    Eonet,
    Neo,
    Images,
}

impl std::fmt::Display for Upstream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Upstream::Apod => "apod",
            Upstream::Mars => "mars",
            Upstream::Eonet => "eonet",
            Upstream::Neo => "neo",
            Upstream::Images => "images",
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// Raw NeoWs record (input to the visualization transform)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct RawNeoRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_potentially_hazardous_asteroid: bool,
    #[serde(default)]
    pub estimated_diameter: Option<RawEstimatedDiameter>,
    #[serde(default)]
    pub close_approach_data: Option<Vec<RawCloseApproach>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEstimatedDiameter {
    #[serde(default)]
    pub kilometers: Option<RawDiameterRange>,
}

/// Live NeoWs names the bounds `estimated_diameter_min` / `_max`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDiameterRange {
    #[serde(default, alias = "estimated_diameter_min")]
    pub estimated_min: Option<f64>,
    #[serde(default, alias = "estimated_diameter_max")]
    pub estimated_max: Option<f64>,
    #[serde(default)]
    pub estimated: Option<f64>,
}

/// One close approach. Distance and velocity arrive as decimal strings.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCloseApproach {
    /// Empty when absent; treated like any other unparsable date.
    #[serde(default)]
    pub close_approach_date: String,
    #[serde(default)]
    pub miss_distance: RawMissDistance,
    #[serde(default)]
    pub relative_velocity: RawRelativeVelocity,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMissDistance {
    #[serde(default, deserialize_with = "decimal_text")]
    pub kilometers: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRelativeVelocity {
    #[serde(default, deserialize_with = "decimal_text")]
    pub kilometers_per_hour: String,
}

/// NeoWs sends decimals as strings, but a bare number is accepted too.
/// Anything else becomes empty text, which later parses as NaN.
fn decimal_text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

impl RawNeoRecord {
    pub fn diameter_km(&self) -> Option<&RawDiameterRange> {
        self.estimated_diameter
            .as_ref()
            .and_then(|d| d.kilometers.as_ref())
    }
}

// ---------------------------------------------------------------------------
// Processed NEO payload (output of the visualization transform)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedNeoData {
    pub id: String,
    pub name: String,
    pub is_hazardous: bool,
    pub diameter: Diameter,
    pub miss_distance_trend: MissDistanceTrend,
    pub statistics: ApproachStatistics,
    pub hazard_assessment: HazardAssessment,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Diameter {
    pub min: f64,
    pub max: f64,
    pub estimated: f64,
}

/// Parallel arrays, one entry per close approach, ascending by date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissDistanceTrend {
    pub dates: Vec<String>,
    pub distances: Vec<f64>,
    pub velocities: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproachStatistics {
    pub closest_approach: ClosestApproach,
    pub average_distance: f64,
    pub average_velocity: f64,
    pub total_approaches: usize,
    pub future_approaches: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClosestApproach {
    pub date: String,
    pub distance: f64,
    pub velocity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HazardAssessment {
    pub risk_level: RiskLevel,
    pub risk_score: u32,
    pub next_close_approach: NextCloseApproach,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextCloseApproach {
    pub date: String,
    pub distance: f64,
    pub days_from_now: i64,
}

impl NextCloseApproach {
    /// Placeholder reported when no approach lies ahead of "now".
    pub fn none() -> Self {
        Self {
            date: "N/A".to_string(),
            distance: 0.0,
            days_from_now: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Risk classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// score < 30
    Low,
    /// score 30–49
    Medium,
    /// score >= 50
    High,
}

impl RiskLevel {
    pub fn from_score(score: u32) -> Self {
        use crate::config::risk_thresholds::*;
        if score >= HIGH_MIN {
            RiskLevel::High
        } else if score >= MEDIUM_MIN {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// Mars rover manifest
// ---------------------------------------------------------------------------

/// Subset of `photo_manifest` used to validate photo searches.
#[derive(Debug, Clone, Deserialize)]
pub struct RoverManifest {
    pub name: String,
    pub landing_date: String,
    pub max_date: String,
    #[serde(default)]
    pub total_photos: u64,
}

/// Manifest block echoed back to clients alongside date validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestSummary {
    pub rover: String,
    pub landing_date: String,
    pub max_date: String,
    pub total_photos: u64,
}

impl From<&RoverManifest> for ManifestSummary {
    fn from(m: &RoverManifest) -> Self {
        Self {
            rover: m.name.clone(),
            landing_date: m.landing_date.clone(),
            max_date: m.max_date.clone(),
            total_photos: m.total_photos,
        }
    }
}
