use chrono::{DateTime, Utc};
use url::Url;

use crate::{AspectRatio, ClipDuration, JobId, ResultId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the prompt text.
    PromptChanged(String),
    /// User picked a clip duration.
    DurationSelected(ClipDuration),
    /// User picked an aspect ratio.
    AspectRatioSelected(AspectRatio),
    /// User pressed Generate.
    SubmitClicked,
    /// User asked to abandon the running job.
    CancelClicked,
    /// Clock tick from the running job.
    JobProgress { job_id: JobId, percent: u8 },
    /// Terminal event for a job.
    JobDone { job_id: JobId, outcome: JobOutcome },
    /// Placeholder image fetch finished.
    ThumbnailLoaded {
        result_id: ResultId,
        outcome: ThumbnailOutcome,
    },
    /// User opened a gallery card.
    ResultSelected { result_id: ResultId },
    /// User dismissed the preview with its close control.
    PreviewClosed,
    /// Pointer click while the preview overlay is shown.
    OverlayClicked { region: OverlayRegion },
    /// User pressed a download control, on a card or in the preview.
    DownloadClicked { result_id: ResultId },
    /// Export collaborator finished.
    ExportFinished {
        result_id: ResultId,
        outcome: ExportOutcome,
    },
    /// User dismissed the notice line.
    NoticeDismissed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Completed {
        thumbnail: Url,
        created_at: DateTime<Utc>,
    },
    TimedOut,
    Failed { reason: String },
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThumbnailOutcome {
    Loaded { bytes: u64 },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Saved { location: String },
    Failed { reason: String },
}

/// Where a click landed relative to the preview content box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayRegion {
    Backdrop,
    Content,
}
