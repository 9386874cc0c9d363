//! Core library for the `marine` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The HTTP seam the forecast client talks through
//! - The StormGlass point-forecast client and its normalization
//! - Shared domain models (raw responses, normalized forecast points)
//!
//! It is used by `marine-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod http;
pub mod model;
pub mod provider;

pub use config::{Config, StormGlassConfig};
pub use error::{ErrorKind, StormGlassError};
pub use http::{HttpError, HttpRequest, HttpRequester, ReqwestRequester};
pub use model::{Coordinate, ForecastPoint, ForecastVariable};
pub use provider::{CANONICAL_SOURCE, ForecastProvider, Source, stormglass::StormGlass};
