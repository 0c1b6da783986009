//! Grid configuration.
//!
//! Captures the grid dimensions and the pixel spacing constants as a single
//! [`GridConfig`] that can be loaded from TOML or JSON at startup.
//!
//! ```toml
//! # gridboard.toml
//! columns = 16
//! rows = 8
//! margin_px = 6.0
//! padding_px = 6.0
//! ```
//!
//! Every field defaults to the built-in constants, so a partial file (or an
//! empty one) yields the standard 16x8 grid.

use serde::{Deserialize, Serialize};

/// Visible grid columns. Items wider than this cannot be auto-placed.
pub const GRID_COLUMNS: u16 = 16;

/// Visible grid rows. Rows beyond this scroll.
pub const GRID_ROWS: u16 = 8;

/// Gap between adjacent cells, in pixels.
pub const GRID_MARGIN_PX: f64 = 6.0;

/// Outer padding around the grid, in pixels.
pub const GRID_PADDING_PX: f64 = 6.0;

/// Grid dimensions and spacing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub columns: u16,
    pub rows: u16,
    pub margin_px: f64,
    pub padding_px: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: GRID_COLUMNS,
            rows: GRID_ROWS,
            margin_px: GRID_MARGIN_PX,
            padding_px: GRID_PADDING_PX,
        }
    }
}

impl GridConfig {
    /// Load from a TOML string and validate.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, GridConfigError> {
        let config: Self = toml::from_str(s).map_err(GridConfigError::Toml)?;
        config.validated()
    }

    /// Load from a JSON string and validate.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, GridConfigError> {
        let config: Self = serde_json::from_str(s).map_err(GridConfigError::Json)?;
        config.validated()
    }

    /// Check every parameter.
    ///
    /// An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.columns == 0 {
            errors.push("columns must be > 0".into());
        }
        if self.rows == 0 {
            errors.push("rows must be > 0".into());
        }
        if !self.margin_px.is_finite() || self.margin_px < 0.0 {
            errors.push(format!(
                "margin_px must be finite and >= 0, got {}",
                self.margin_px
            ));
        }
        if !self.padding_px.is_finite() || self.padding_px < 0.0 {
            errors.push(format!(
                "padding_px must be finite and >= 0, got {}",
                self.padding_px
            ));
        }

        errors
    }

    /// Return `self` if [`validate`](Self::validate) finds nothing.
    pub fn validated(self) -> Result<Self, GridConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(GridConfigError::Validation(errors))
        }
    }
}

/// Errors from loading or validating a [`GridConfig`].
#[derive(Debug)]
pub enum GridConfigError {
    /// TOML parse error.
    #[cfg(feature = "config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for GridConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(feature = "config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for GridConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            #[cfg(feature = "config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_constants() {
        let config = GridConfig::default();
        assert_eq!(config.columns, 16);
        assert_eq!(config.rows, 8);
        assert_eq!(config.margin_px, 6.0);
        assert_eq!(config.padding_px, 6.0);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn validation_collects_every_problem() {
        let config = GridConfig {
            columns: 0,
            rows: 0,
            margin_px: -1.0,
            padding_px: f64::NAN,
        };
        let errors = config.validate();
        assert_eq!(errors.len(), 4);
        let err = config.validated().expect_err("invalid config");
        assert!(err.to_string().starts_with("validation errors: columns must be > 0"));
    }

    #[cfg(feature = "config")]
    #[test]
    fn partial_toml_fills_defaults() {
        let config = GridConfig::from_toml_str("columns = 12\n").expect("valid toml");
        assert_eq!(config.columns, 12);
        assert_eq!(config.rows, GRID_ROWS);
        assert_eq!(config.margin_px, GRID_MARGIN_PX);
    }

    #[cfg(feature = "config")]
    #[test]
    fn empty_toml_is_default() {
        let config = GridConfig::from_toml_str("").expect("valid toml");
        assert_eq!(config, GridConfig::default());
    }

    #[cfg(feature = "config")]
    #[test]
    fn json_round_trip_and_validation() {
        let config = GridConfig::from_json_str(r#"{"rows": 10, "padding_px": 4.0}"#)
            .expect("valid json");
        assert_eq!(config.rows, 10);
        assert_eq!(config.padding_px, 4.0);
        assert_eq!(config.columns, GRID_COLUMNS);

        let err = GridConfig::from_json_str(r#"{"columns": 0}"#).expect_err("zero columns");
        assert!(matches!(err, GridConfigError::Validation(_)));

        let err = GridConfig::from_json_str("{").expect_err("malformed json");
        assert!(matches!(err, GridConfigError::Json(_)));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[cfg(feature = "config")]
    #[test]
    fn malformed_toml_is_reported() {
        let err = GridConfig::from_toml_str("columns = \"wide\"").expect_err("wrong type");
        assert!(matches!(err, GridConfigError::Toml(_)));
        assert!(err.to_string().starts_with("TOML parse error"));
    }
}
