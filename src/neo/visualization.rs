//! Raw NeoWs record → chart/statistics payload for the visualization page.
//!
//! Pure apart from `now`, which callers pass in (the HTTP layer uses
//! `Utc::now()`), so the same record and instant always give the same output.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};

use crate::config::MS_PER_DAY;
use crate::error::TransformError;
use crate::scorer;
use crate::types::{
    ApproachStatistics, ClosestApproach, Diameter, HazardAssessment, MissDistanceTrend,
    NextCloseApproach, ProcessedNeoData, RawCloseApproach, RawDiameterRange, RawNeoRecord,
};

/// A close approach with its date and numeric fields parsed once.
#[derive(Debug, Clone)]
struct Approach<'a> {
    date: &'a str,
    /// UTC midnight of `date`; None when the date is not `YYYY-MM-DD`.
    at: Option<DateTime<Utc>>,
    distance_km: f64,
    velocity_kph: f64,
}

impl<'a> Approach<'a> {
    fn parse(raw: &'a RawCloseApproach) -> Self {
        Self {
            date: &raw.close_approach_date,
            at: parse_approach_date(&raw.close_approach_date),
            distance_km: parse_numeric(&raw.miss_distance.kilometers),
            velocity_kph: parse_numeric(&raw.relative_velocity.kilometers_per_hour),
        }
    }

    fn is_future(&self, now: DateTime<Utc>) -> bool {
        self.at.is_some_and(|at| at >= now)
    }
}

/// Decimal string → f64. Anything unparsable becomes NaN and is left to
/// propagate through the arithmetic.
pub fn parse_numeric(s: &str) -> f64 {
    s.trim().parse::<f64>().unwrap_or(f64::NAN)
}

/// `YYYY-MM-DD` → UTC midnight of that day.
pub fn parse_approach_date(s: &str) -> Option<DateTime<Utc>> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Valid dates ascending. Unparsable dates (including missing ones) are moved
/// after every valid date, keeping their relative order, instead of staying
/// where they arrived in the upstream list.
fn chronological(a: &Approach<'_>, b: &Approach<'_>) -> Ordering {
    match (a.at, b.at) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Smallest value, or NaN if any value is NaN.
fn min_or_nan(values: &[f64]) -> f64 {
    values.iter().fold(f64::INFINITY, |min, &v| {
        if min.is_nan() || v.is_nan() {
            f64::NAN
        } else {
            min.min(v)
        }
    })
}

fn days_until(at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let ms = (at - now).num_milliseconds() as f64;
    (ms / MS_PER_DAY).ceil() as i64
}

/// Build the visualization payload for one NEO.
///
/// Errors with [`TransformError::EmptyApproachHistory`] when the record has no
/// close approaches: there is no closest approach or minimum distance to
/// report.
pub fn process_for_visualization(
    raw: &RawNeoRecord,
    now: DateTime<Utc>,
) -> Result<ProcessedNeoData, TransformError> {
    let mut approaches: Vec<Approach<'_>> = raw
        .close_approach_data
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(Approach::parse)
        .collect();

    if approaches.is_empty() {
        return Err(TransformError::EmptyApproachHistory { id: raw.id.clone() });
    }

    // Stable, so same-day approaches keep their upstream order.
    approaches.sort_by(chronological);

    let future: Vec<&Approach<'_>> = approaches.iter().filter(|a| a.is_future(now)).collect();

    let dates: Vec<String> = approaches.iter().map(|a| a.date.to_string()).collect();
    let distances: Vec<f64> = approaches.iter().map(|a| a.distance_km).collect();
    let velocities: Vec<f64> = approaches.iter().map(|a| a.velocity_kph).collect();

    let closest = approaches
        .iter()
        .reduce(|best, a| if a.distance_km < best.distance_km { a } else { best })
        .ok_or_else(|| TransformError::EmptyApproachHistory { id: raw.id.clone() })?;

    let next_close_approach = match future.first() {
        Some(next) => NextCloseApproach {
            date: next.date.to_string(),
            distance: next.distance_km,
            days_from_now: next.at.map_or(0, |at| days_until(at, now)),
        },
        None => NextCloseApproach::none(),
    };

    let (risk_score, risk_level) = scorer::assess(
        min_or_nan(&distances),
        raw.is_potentially_hazardous_asteroid,
        scorer::scoring_diameter_km(raw),
    );

    let range = raw.diameter_km();
    let diameter_field = |pick: fn(&RawDiameterRange) -> Option<f64>| {
        range.and_then(pick).filter(|v| !v.is_nan()).unwrap_or(0.0)
    };

    Ok(ProcessedNeoData {
        id: raw.id.clone(),
        name: raw.name.clone(),
        is_hazardous: raw.is_potentially_hazardous_asteroid,
        diameter: Diameter {
            min: diameter_field(|d| d.estimated_min),
            max: diameter_field(|d| d.estimated_max),
            estimated: diameter_field(|d| d.estimated),
        },
        statistics: ApproachStatistics {
            closest_approach: ClosestApproach {
                date: closest.date.to_string(),
                distance: closest.distance_km,
                velocity: closest.velocity_kph,
            },
            average_distance: mean(&distances),
            average_velocity: mean(&velocities),
            total_approaches: approaches.len(),
            future_approaches: future.len(),
        },
        miss_distance_trend: MissDistanceTrend {
            dates,
            distances,
            velocities,
        },
        hazard_assessment: HazardAssessment {
            risk_level,
            risk_score,
            next_close_approach,
        },
    })
}
