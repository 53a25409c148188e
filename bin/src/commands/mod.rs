//! CLI command implementations.

pub(crate) mod info;
pub(crate) mod predict;
pub(crate) mod serve;
pub(crate) mod train;
