//! Serve command implementation.

use anyhow::{Context, Result};
use shipeta_lib::{ServeConfig, ValidationPolicy};
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::display::model_path;

/// Serve estimates over HTTP until interrupted.
pub(crate) async fn serve(model: Option<PathBuf>, addr: SocketAddr, strict: bool) -> Result<()> {
    let validation = if strict {
        ValidationPolicy::Reject
    } else {
        ValidationPolicy::Passthrough
    };
    let config = ServeConfig::new(model_path(model))
        .with_addr(addr)
        .with_validation(validation);

    let path = config.model_path.clone();
    shipeta_lib::serve(config)
        .await
        .with_context(|| format!("Failed to serve model {}", path.display()))
}
