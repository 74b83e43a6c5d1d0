//! Small input checks shared by domain types.

use crate::domain::InvalidInput;

pub fn valid_latitude(lat: f64) -> bool {
    lat.is_finite() && (-90.0..=90.0).contains(&lat)
}

pub fn valid_longitude(lng: f64) -> bool {
    lng.is_finite() && (-180.0..=180.0).contains(&lng)
}

/// Rejects empty or whitespace-only values, naming the field.
pub fn require_non_empty(field: &str, value: &str) -> Result<(), InvalidInput> {
    if value.trim().is_empty() {
        return Err(InvalidInput::new(format!("{field} must not be empty")));
    }
    Ok(())
}
