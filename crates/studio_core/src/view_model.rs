use chrono::{DateTime, Utc};
use url::Url;

use crate::{AspectRatio, ClipDuration, JobPhase, Notice, ResultId, ThumbnailStatus};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub form: FormView,
    pub job: JobView,
    /// Newest first.
    pub cards: Vec<ResultCardView>,
    /// Gallery is empty and nothing is generating.
    pub show_empty_state: bool,
    pub preview: Option<ResultCardView>,
    pub notice: Option<NoticeView>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormView {
    pub prompt: String,
    pub duration: ClipDuration,
    pub aspect_ratio: AspectRatio,
    /// False while a job runs; every input is read-only then.
    pub enabled: bool,
    pub can_submit: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JobView {
    pub phase: JobPhase,
    pub progress: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultCardView {
    pub id: ResultId,
    pub prompt: String,
    pub duration: ClipDuration,
    pub aspect_ratio: AspectRatio,
    pub thumbnail: Url,
    pub thumbnail_status: ThumbnailStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeView {
    pub severity: Severity,
    pub text: String,
}

impl From<&Notice> for NoticeView {
    fn from(notice: &Notice) -> Self {
        match notice {
            Notice::Info(text) => NoticeView {
                severity: Severity::Info,
                text: text.clone(),
            },
            Notice::Error(err) => NoticeView {
                severity: Severity::Error,
                text: err.to_string(),
            },
        }
    }
}
