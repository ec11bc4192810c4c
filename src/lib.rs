//! Relay and tester for the VARCO text-to-speech API.
//!
//! The relay keeps the API key off the browser: it validates and reshapes
//! synthesis requests, forwards them to one of two upstream tiers, and serves
//! a cached local voice catalog. The client side (catalog normalization,
//! filtering, synthesis form, audio handling) lives in [`catalog`] and
//! [`client`] as presentation-independent state.

pub mod api;
pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod relay;

pub use api::routes::{create_router, AppState};
pub use config::Config;
pub use error::AppError;
