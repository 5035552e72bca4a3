//! Message type constants for user-facing notifications.
//!
//! Used by `whisprtales-engine` when broadcasting batch lifecycle
//! updates to UI subscribers. The values double as stable identifiers
//! for toast/banner deduplication on the presentation side.

/// A generation batch was accepted and polling has started.
pub const MSG_TYPE_BATCH_STARTED: &str = "batch_started";

/// A single scene's start request was rejected by the backend.
pub const MSG_TYPE_SCENE_REJECTED: &str = "scene_rejected";

/// All jobs in a batch completed successfully.
pub const MSG_TYPE_BATCH_COMPLETED: &str = "batch_completed";

/// A status read failed while the batch was in flight.
pub const MSG_TYPE_BATCH_FAILED: &str = "batch_failed";

/// The wall-clock polling budget elapsed with jobs still pending.
pub const MSG_TYPE_BATCH_TIMED_OUT: &str = "batch_timed_out";

/// The credit balance was re-fetched after a completed batch.
pub const MSG_TYPE_CREDITS_REFRESHED: &str = "credits_refreshed";

/// An export preview became available.
pub const MSG_TYPE_EXPORT_READY: &str = "export_ready";
