//! Server configuration.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::path::PathBuf;
use std::str::FromStr;

/// Default listen address.
pub const DEFAULT_ADDR: SocketAddr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 5000));

/// Treatment of feature values outside the known domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ValidationPolicy {
    /// Score whatever arrives; the model extrapolates.
    #[default]
    Passthrough,
    /// Answer `422` for a non-positive distance, an unknown mode or an unknown container.
    Reject,
}

impl ValidationPolicy {
    /// Returns the policy name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Passthrough => "passthrough",
            Self::Reject => "reject",
        }
    }
}

impl std::fmt::Display for ValidationPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValidationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "passthrough" | "lenient" => Ok(Self::Passthrough),
            "reject" | "strict" => Ok(Self::Reject),
            _ => Err(format!(
                "Unknown validation policy: {s}. Valid options: passthrough, reject"
            )),
        }
    }
}

/// Settings for [`crate::serve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServeConfig {
    /// Address to listen on.
    pub addr: SocketAddr,
    /// Artifact to load at startup.
    pub model_path: PathBuf,
    /// Out-of-domain handling.
    pub validation: ValidationPolicy,
}

impl ServeConfig {
    /// Creates a configuration serving the artifact at `model_path` on [`DEFAULT_ADDR`].
    #[must_use]
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self {
            addr: DEFAULT_ADDR,
            model_path: model_path.into(),
            validation: ValidationPolicy::default(),
        }
    }

    /// Sets the listen address.
    #[must_use]
    pub const fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    /// Sets the validation policy.
    #[must_use]
    pub const fn with_validation(mut self, validation: ValidationPolicy) -> Self {
        self.validation = validation;
        self
    }
}
