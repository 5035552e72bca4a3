//! `whisprtales-core` -- pure domain logic for the WhisprTales client.
//!
//! Everything in this crate is I/O-free: credit estimation, scene
//! selection, media-kind completion predicates, export formats, and the
//! shared error type. Network and timing concerns live in
//! `whisprtales-api` and `whisprtales-engine`.

pub mod error;
pub mod estimation;
pub mod export;
pub mod media;
pub mod notices;
pub mod selection;
pub mod types;
