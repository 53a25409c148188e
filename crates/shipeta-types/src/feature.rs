//! Feature vector encoding.

use serde::{Deserialize, Serialize};

use crate::{ContainerType, FeatureError, TransportMode};

/// Number of features the model consumes.
pub const FEATURE_COUNT: usize = 3;

/// Feature names in the exact order produced by [`FeatureVector::to_array`].
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = ["distance_km", "transport_mode", "container_type"];

/// The model inputs for a single shipment.
///
/// Mode and container are kept as raw integer codes so that out-of-domain
/// values reach the estimator unchanged; use [`FeatureVector::validate`] to
/// reject them instead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Route distance in kilometres.
    pub distance_km: f64,
    /// Transport mode code (0 = sea, 1 = road, 2 = air).
    pub transport_mode: i64,
    /// Container code (20 or 40).
    pub container_type: i64,
}

impl FeatureVector {
    /// Encodes raw request fields into a feature vector.
    ///
    /// No validation is performed.
    #[must_use]
    pub const fn encode(distance_km: f64, transport_mode: i64, container_type: i64) -> Self {
        Self {
            distance_km,
            transport_mode,
            container_type,
        }
    }

    /// Encodes a feature vector from typed mode and container values.
    #[must_use]
    pub const fn from_typed(
        distance_km: f64,
        transport_mode: TransportMode,
        container_type: ContainerType,
    ) -> Self {
        Self::encode(distance_km, transport_mode.code(), container_type.code())
    }

    /// Returns the numeric model input in [`FEATURE_NAMES`] order.
    #[must_use]
    pub const fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.distance_km,
            self.transport_mode as f64,
            self.container_type as f64,
        ]
    }

    /// Returns the transport mode, if the code is known.
    #[must_use]
    pub const fn transport(&self) -> Option<TransportMode> {
        TransportMode::from_code(self.transport_mode)
    }

    /// Returns the container type, if the code is known.
    #[must_use]
    pub const fn container(&self) -> Option<ContainerType> {
        ContainerType::from_code(self.container_type)
    }

    /// Returns true if every feature is finite.
    #[must_use]
    pub const fn is_finite(&self) -> bool {
        self.distance_km.is_finite()
    }

    /// Checks that every feature lies in the trained domain.
    ///
    /// # Errors
    ///
    /// Returns the first out-of-domain feature found, checked in feature order.
    pub fn validate(&self) -> Result<(), FeatureError> {
        if !self.distance_km.is_finite() {
            return Err(FeatureError::NonFiniteDistance(self.distance_km));
        }
        if self.distance_km <= 0.0 {
            return Err(FeatureError::NonPositiveDistance(self.distance_km));
        }
        if self.transport().is_none() {
            return Err(FeatureError::UnknownTransportMode(
                self.transport_mode.to_string(),
            ));
        }
        if self.container().is_none() {
            return Err(FeatureError::UnknownContainerType(
                self.container_type.to_string(),
            ));
        }
        Ok(())
    }
}

impl std::fmt::Display for FeatureVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "distance_km={} transport_mode={} container_type={}",
            self.distance_km, self.transport_mode, self.container_type
        )
    }
}
