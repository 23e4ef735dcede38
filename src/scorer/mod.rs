pub mod risk_scorer;

pub use risk_scorer::{assess, scoring_diameter_km};
