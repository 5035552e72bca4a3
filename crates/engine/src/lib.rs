//! `whisprtales-engine` -- the asynchronous generation job engine.
//!
//! Implements the submit-then-poll pattern the WhisprTales client uses
//! for every long-running backend task: batch media generation for
//! selected scenes and story export previews. Submission fans out one
//! request per target, the poller watches status reads at a fixed
//! cadence until completion, failure, or a wall-clock timeout, and
//! [`session::GenerationSession`] orchestrates the end-to-end flow
//! (credit gate, preconditions, generating flag, balance refresh),
//! broadcasting [`events::EngineEvent`]s to UI subscribers.

pub mod events;
pub mod job;
pub mod poller;
pub mod probe;
pub mod session;
pub mod submit;

pub use events::EngineEvent;
pub use job::{Job, JobKind, JobStatus};
pub use poller::{watch_batch, PollConfig, PollOutcome};
pub use probe::JobProbe;
pub use session::{
    BatchReport, ExportReport, GenerateRequest, GenerationSession, SceneInput, SessionError,
};
pub use submit::{submit_batch, BatchRequest, BatchSubmission, SceneRejection};
