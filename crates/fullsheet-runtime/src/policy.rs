#![forbid(unsafe_code)]

//! Policy-as-data configuration for the overlay stack.
//!
//! [`SheetPolicy`] groups the tunables of the controller and renderer so
//! they can be loaded from TOML or JSON at startup.
//!
//! # Loading
//!
//! ```toml
//! # fullsheet.toml
//! [animation]
//! enter_duration_ms = 280
//! exit_falls_back_to_enter = true
//!
//! [defaults]
//! enter_direction = "right"
//! close_on_backdrop_click = true
//! ```
//!
//! ```rust,ignore
//! let policy = SheetPolicy::from_toml_file("fullsheet.toml")?;
//! let policy = SheetPolicy::from_json_str(json)?;
//! ```
//!
//! # Defaults
//!
//! `SheetPolicy::default()` reproduces the baseline behavior: no animation
//! unless an entry asks for one, backdrop clicks do not close, exits never
//! borrow the enter direction.

#[cfg(feature = "policy-config")]
use std::path::Path;
use std::time::Duration;

#[cfg(feature = "policy-config")]
use serde::{Deserialize, Serialize};

use fullsheet_core::{AnimationDirection, SheetOptions};

/// Longest animation duration accepted by [`SheetPolicy::validate`].
pub const MAX_DURATION_MS: u64 = 10_000;

/// Top-level policy for controllers and renderers.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "policy-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "policy-config", serde(default))]
pub struct SheetPolicy {
    /// Frame-driven animation timing.
    pub animation: AnimationPolicy,

    /// Defaults for options that entries leave unset.
    pub defaults: DefaultsPolicy,
}

impl SheetPolicy {
    /// Load from a TOML string.
    #[cfg(feature = "policy-config")]
    pub fn from_toml_str(s: &str) -> Result<Self, PolicyConfigError> {
        toml::from_str(s).map_err(PolicyConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "policy-config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, PolicyConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(PolicyConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "policy-config")]
    pub fn from_json_str(s: &str) -> Result<Self, PolicyConfigError> {
        serde_json::from_str(s).map_err(PolicyConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "policy-config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, PolicyConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(PolicyConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the policy
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.animation.enter_duration_ms > MAX_DURATION_MS {
            errors.push(format!(
                "animation.enter_duration_ms must be <= {MAX_DURATION_MS}, got {}",
                self.animation.enter_duration_ms
            ));
        }
        if self.animation.exit_duration_ms > MAX_DURATION_MS {
            errors.push(format!(
                "animation.exit_duration_ms must be <= {MAX_DURATION_MS}, got {}",
                self.animation.exit_duration_ms
            ));
        }
        errors
    }

    /// Return `self` if [`validate`](Self::validate) reports no problems.
    pub fn validated(self) -> Result<Self, PolicyConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(PolicyConfigError::Validation(errors))
        }
    }

    /// Fill the unset fields of `options` from [`DefaultsPolicy`].
    pub fn apply_defaults(&self, options: SheetOptions) -> SheetOptions {
        options.with_fallbacks(
            self.defaults.enter_direction,
            self.defaults.exit_direction,
            self.defaults.close_on_backdrop_click,
        )
    }
}

/// Animation timing.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "policy-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "policy-config", serde(default))]
pub struct AnimationPolicy {
    /// Enter animation length. Default: 350.
    pub enter_duration_ms: u64,
    /// Exit animation length. Default: 350.
    pub exit_duration_ms: u64,
    /// Use the entry's enter direction when it has no exit direction.
    /// Default: false.
    pub exit_falls_back_to_enter: bool,
}

impl Default for AnimationPolicy {
    fn default() -> Self {
        Self {
            enter_duration_ms: 350,
            exit_duration_ms: 350,
            exit_falls_back_to_enter: false,
        }
    }
}

impl AnimationPolicy {
    pub fn enter_duration(&self) -> Duration {
        Duration::from_millis(self.enter_duration_ms)
    }

    pub fn exit_duration(&self) -> Duration {
        Duration::from_millis(self.exit_duration_ms)
    }
}

/// Defaults applied to options that leave a field unset.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "policy-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "policy-config", serde(default))]
pub struct DefaultsPolicy {
    /// Default: none.
    pub enter_direction: AnimationDirection,
    /// Default: none.
    pub exit_direction: AnimationDirection,
    /// Default: false.
    pub close_on_backdrop_click: bool,
}

/// Errors that can occur when loading a policy.
#[derive(Debug)]
pub enum PolicyConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "policy-config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "policy-config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for PolicyConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "policy-config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "policy-config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => write!(f, "validation errors: {}", errors.join("; ")),
        }
    }
}

impl std::error::Error for PolicyConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "policy-config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "policy-config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}
