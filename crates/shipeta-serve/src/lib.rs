//! HTTP serving boundary for shipeta.
//!
//! - [`router`] - The axum application over a shared [`AppState`]
//! - [`serve`] - Load the artifact, bind, and run until shutdown
//! - [`ValidationPolicy`] - How out-of-domain feature values are treated

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/shipeta/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod handlers;
mod server;

pub use config::{DEFAULT_ADDR, ServeConfig, ValidationPolicy};
pub use error::{ApiError, ServeError};
pub use handlers::{HealthResponse, PredictRequest, PredictResponse};
pub use server::{AppState, router, serve, shutdown_signal};
