//! Settings domain types and validation.
//!
//! Pure domain types with no infrastructure dependencies.

use serde::{Deserialize, Serialize};

/// Radius the home page searches with when the user hasn't picked one.
pub const DEFAULT_RADIUS_KM: f64 = 5.0;

/// Largest radius a directory query may ask for.
pub const DEFAULT_MAX_RADIUS_KM: f64 = 50.0;

pub const DEFAULT_MAX_COMMENT_LENGTH: u32 = 1000;

/// Application settings structure.
///
/// All fields are optional to support partial updates and graceful defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Radius used when a directory query doesn't specify one.
    pub default_radius_km: Option<f64>,
    /// Upper bound on directory query radius.
    pub max_radius_km: Option<f64>,
    /// Longest accepted review comment, in characters.
    pub max_comment_length: Option<u32>,
}

impl Settings {
    /// Create settings with sensible defaults.
    #[must_use]
    pub const fn with_defaults() -> Self {
        Self {
            default_radius_km: Some(DEFAULT_RADIUS_KM),
            max_radius_km: Some(DEFAULT_MAX_RADIUS_KM),
            max_comment_length: Some(DEFAULT_MAX_COMMENT_LENGTH),
        }
    }

    #[must_use]
    pub fn effective_default_radius_km(&self) -> f64 {
        self.default_radius_km.unwrap_or(DEFAULT_RADIUS_KM)
    }

    #[must_use]
    pub fn effective_max_radius_km(&self) -> f64 {
        self.max_radius_km.unwrap_or(DEFAULT_MAX_RADIUS_KM)
    }

    #[must_use]
    pub fn effective_max_comment_length(&self) -> usize {
        self.max_comment_length
            .unwrap_or(DEFAULT_MAX_COMMENT_LENGTH) as usize
    }

    /// Merge a partial update into these settings, only touching fields that are Some.
    pub fn merge(&mut self, other: &SettingsUpdate) {
        if let Some(radius) = other.default_radius_km {
            self.default_radius_km = radius;
        }
        if let Some(radius) = other.max_radius_km {
            self.max_radius_km = radius;
        }
        if let Some(length) = other.max_comment_length {
            self.max_comment_length = length;
        }
    }
}

/// Partial settings update.
///
/// Each field is `Option<Option<T>>`:
/// - `None` = don't change this field
/// - `Some(None)` = reset to the built-in default
/// - `Some(Some(value))` = set field to value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub default_radius_km: Option<Option<f64>>,
    pub max_radius_km: Option<Option<f64>>,
    pub max_comment_length: Option<Option<u32>>,
}

/// Settings validation error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SettingsError {
    #[error("Radius must be a positive number of kilometres, got {0}")]
    InvalidRadius(f64),

    #[error("Default radius {default} km exceeds the maximum radius {max} km")]
    DefaultAboveMax { default: f64, max: f64 },

    #[error("Max comment length must be between 1 and 10,000, got {0}")]
    InvalidCommentLength(u32),
}

fn valid_radius(radius: f64) -> bool {
    radius.is_finite() && radius > 0.0
}

/// Validate settings values.
pub fn validate_settings(settings: &Settings) -> Result<(), SettingsError> {
    if let Some(radius) = settings.default_radius_km {
        if !valid_radius(radius) {
            return Err(SettingsError::InvalidRadius(radius));
        }
    }

    if let Some(radius) = settings.max_radius_km {
        if !valid_radius(radius) {
            return Err(SettingsError::InvalidRadius(radius));
        }
    }

    let default = settings.effective_default_radius_km();
    let max = settings.effective_max_radius_km();
    if default > max {
        return Err(SettingsError::DefaultAboveMax { default, max });
    }

    if let Some(length) = settings.max_comment_length {
        if !(1..=10_000).contains(&length) {
            return Err(SettingsError::InvalidCommentLength(length));
        }
    }

    Ok(())
}
