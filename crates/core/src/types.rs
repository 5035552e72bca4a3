//! Shared identifier types.

/// Server-assigned numeric identifier, as returned by the REST API.
pub type DbId = i64;

/// Identifier of a story.
pub type StoryId = DbId;

/// Identifier of a scene within a story.
pub type SceneId = DbId;
