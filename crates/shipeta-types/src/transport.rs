//! Transport mode definitions.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::FeatureError;

/// Freight transport mode.
///
/// The discriminant is the numeric code the model is trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    /// Ocean freight, the slowest mode.
    Sea = 0,
    /// Road haulage.
    Road = 1,
    /// Air freight, the fastest mode.
    Air = 2,
}

impl TransportMode {
    /// Returns the numeric feature code for this mode.
    #[must_use]
    pub const fn code(&self) -> i64 {
        *self as i64
    }

    /// Looks up a mode by its numeric feature code.
    #[must_use]
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Sea),
            1 => Some(Self::Road),
            2 => Some(Self::Air),
            _ => None,
        }
    }

    /// Returns the mode as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sea => "sea",
            Self::Road => "road",
            Self::Air => "air",
        }
    }

    /// Returns all transport modes in code order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Sea, Self::Road, Self::Air]
    }
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransportMode {
    type Err = FeatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sea" | "ocean" | "0" => Ok(Self::Sea),
            "road" | "truck" | "1" => Ok(Self::Road),
            "air" | "2" => Ok(Self::Air),
            _ => Err(FeatureError::UnknownTransportMode(s.to_string())),
        }
    }
}
