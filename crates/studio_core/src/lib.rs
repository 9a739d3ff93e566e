//! Studio core: pure state machine and view-model helpers for the generation
//! workspace. No IO happens here; timers, network and files live behind
//! [`Effect`]s executed by the caller.
mod effect;
mod error;
mod msg;
mod options;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use error::{Notice, StudioError};
pub use msg::{ExportOutcome, JobOutcome, Msg, OverlayRegion, ThumbnailOutcome};
pub use options::{AspectRatio, ClipDuration, Orientation};
pub use state::{AppState, GeneratedResult, JobId, JobPhase, JobRequest, ResultId, ThumbnailStatus};
pub use update::update;
pub use view_model::{AppViewModel, FormView, JobView, NoticeView, ResultCardView, Severity};
