//! `whisprtales-api` -- HTTP client for the WhisprTales REST API.
//!
//! [`api::StoryApi`] wraps the remote endpoints the client core
//! consumes: per-scene media generation, scene reads, story export
//! previews, and the profile/credits lookup. Authentication is injected
//! through the [`auth::TokenProvider`] seam; nothing in this crate
//! holds global mutable state.
//!
//! [`geo::GeoLocator`] races redundant country-lookup providers and
//! caches the winner with a TTL.

pub mod api;
pub mod auth;
pub mod config;
pub mod geo;
pub mod models;

pub use api::{ApiError, StoryApi};
pub use auth::{StaticToken, TokenProvider};
pub use config::ClientConfig;
