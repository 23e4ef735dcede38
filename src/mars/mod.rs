pub mod validation;

pub use validation::{is_iso_date, validate_earth_date};
