//! Container size definitions.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::FeatureError;

/// Nominal container size in feet (TEU class).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerType {
    /// 20ft container (one TEU).
    #[serde(rename = "20")]
    Teu20,
    /// 40ft container (two TEU).
    #[serde(rename = "40")]
    Teu40,
}

impl ContainerType {
    /// Returns the numeric feature code (nominal length in feet).
    #[must_use]
    pub const fn code(&self) -> i64 {
        match self {
            Self::Teu20 => 20,
            Self::Teu40 => 40,
        }
    }

    /// Looks up a container type by its numeric feature code.
    #[must_use]
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            20 => Some(Self::Teu20),
            40 => Some(Self::Teu40),
            _ => None,
        }
    }

    /// Returns the container size in twenty-foot equivalent units.
    #[must_use]
    pub const fn teu(&self) -> u8 {
        match self {
            Self::Teu20 => 1,
            Self::Teu40 => 2,
        }
    }

    /// Returns all container types in code order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Teu20, Self::Teu40]
    }
}

impl std::fmt::Display for ContainerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}ft", self.code())
    }
}

impl FromStr for ContainerType {
    type Err = FeatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "20" | "20ft" | "teu20" => Ok(Self::Teu20),
            "40" | "40ft" | "teu40" => Ok(Self::Teu40),
            _ => Err(FeatureError::UnknownContainerType(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(ContainerType::Teu20.code(), 20);
        assert_eq!(ContainerType::Teu40.code(), 40);
        assert_eq!(ContainerType::from_code(40), Some(ContainerType::Teu40));
        assert_eq!(ContainerType::from_code(30), None);
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("40FT".parse::<ContainerType>().unwrap(), ContainerType::Teu40);
        assert_eq!(ContainerType::Teu20.to_string(), "20ft");
        assert!("45".parse::<ContainerType>().is_err());
    }
}
