use std::collections::HashMap;

use chrono::{DateTime, Utc};
use url::Url;

use crate::view_model::{AppViewModel, FormView, JobView, NoticeView, ResultCardView};
use crate::{AspectRatio, ClipDuration, Notice};

pub type JobId = u64;
pub type ResultId = u64;

/// Snapshot of the form taken when a job starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRequest {
    pub prompt: String,
    pub duration: ClipDuration,
    pub aspect_ratio: AspectRatio,
}

/// One completed generation. Never mutated after it enters the gallery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedResult {
    pub id: ResultId,
    pub prompt: String,
    pub thumbnail: Url,
    pub duration: ClipDuration,
    pub aspect_ratio: AspectRatio,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThumbnailStatus {
    #[default]
    Pending,
    Ready {
        bytes: u64,
    },
    /// Fetch failed; render the placeholder graphic instead.
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobPhase {
    #[default]
    Idle,
    Running,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum JobState {
    #[default]
    Idle,
    Running {
        job_id: JobId,
        request: JobRequest,
        progress: u8,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    prompt: String,
    duration: ClipDuration,
    aspect_ratio: AspectRatio,
    job: JobState,
    /// Newest first.
    gallery: Vec<GeneratedResult>,
    thumbnails: HashMap<ResultId, ThumbnailStatus>,
    preview: Option<ResultId>,
    notice: Option<Notice>,
    next_job_id: JobId,
    next_result_id: ResultId,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            duration: ClipDuration::default(),
            aspect_ratio: AspectRatio::default(),
            job: JobState::Idle,
            gallery: Vec::new(),
            thumbnails: HashMap::new(),
            preview: None,
            notice: None,
            next_job_id: 1,
            next_result_id: 1,
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        let running = self.is_running();
        let cards: Vec<ResultCardView> = self
            .gallery
            .iter()
            .map(|result| self.card_view(result))
            .collect();
        let preview = self
            .preview
            .and_then(|id| self.result(id))
            .map(|result| self.card_view(result));

        AppViewModel {
            form: FormView {
                prompt: self.prompt.clone(),
                duration: self.duration,
                aspect_ratio: self.aspect_ratio,
                enabled: !running,
                can_submit: !running && !self.prompt.trim().is_empty(),
            },
            job: JobView {
                phase: self.phase(),
                progress: self.progress(),
            },
            show_empty_state: cards.is_empty() && !running,
            cards,
            preview,
            notice: self.notice.as_ref().map(NoticeView::from),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn phase(&self) -> JobPhase {
        match self.job {
            JobState::Idle => JobPhase::Idle,
            JobState::Running { .. } => JobPhase::Running,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase() == JobPhase::Running
    }

    pub fn running_job(&self) -> Option<JobId> {
        match self.job {
            JobState::Running { job_id, .. } => Some(job_id),
            JobState::Idle => None,
        }
    }

    pub fn result(&self, id: ResultId) -> Option<&GeneratedResult> {
        self.gallery.iter().find(|result| result.id == id)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn prompt(&self) -> &str {
        &self.prompt
    }

    pub(crate) fn set_prompt(&mut self, prompt: String) {
        if self.prompt != prompt {
            self.prompt = prompt;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_duration(&mut self, duration: ClipDuration) {
        if self.duration != duration {
            self.duration = duration;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_aspect_ratio(&mut self, aspect_ratio: AspectRatio) {
        if self.aspect_ratio != aspect_ratio {
            self.aspect_ratio = aspect_ratio;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_notice(&mut self, notice: Option<Notice>) {
        if self.notice != notice {
            self.notice = notice;
            self.mark_dirty();
        }
    }

    pub(crate) fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Moves Idle -> Running, capturing the current form values.
    pub(crate) fn start_job(&mut self) -> (JobId, JobRequest) {
        let job_id = self.next_job_id;
        self.next_job_id += 1;
        let request = JobRequest {
            prompt: self.prompt.clone(),
            duration: self.duration,
            aspect_ratio: self.aspect_ratio,
        };
        self.job = JobState::Running {
            job_id,
            request: request.clone(),
            progress: 0,
        };
        self.mark_dirty();
        (job_id, request)
    }

    /// Raises progress for the running job. Stale ids and regressions are ignored.
    pub(crate) fn apply_progress(&mut self, id: JobId, percent: u8) -> bool {
        if let JobState::Running {
            job_id, progress, ..
        } = &mut self.job
        {
            let clamped = percent.min(100);
            if *job_id == id && clamped > *progress {
                *progress = clamped;
                self.dirty = true;
                return true;
            }
        }
        false
    }

    /// Leaves Running if `id` is the running job, handing back its request.
    pub(crate) fn finish_job(&mut self, id: JobId) -> Option<JobRequest> {
        match &self.job {
            JobState::Running { job_id, .. } if *job_id == id => {}
            _ => return None,
        }
        match std::mem::take(&mut self.job) {
            JobState::Running { request, .. } => {
                self.mark_dirty();
                Some(request)
            }
            JobState::Idle => None,
        }
    }

    /// Prepends a new result and returns it.
    pub(crate) fn push_result(
        &mut self,
        request: JobRequest,
        thumbnail: Url,
        created_at: DateTime<Utc>,
    ) -> &GeneratedResult {
        let id = self.next_result_id;
        self.next_result_id += 1;
        self.thumbnails.insert(id, ThumbnailStatus::Pending);
        self.gallery.insert(
            0,
            GeneratedResult {
                id,
                prompt: request.prompt,
                thumbnail,
                duration: request.duration,
                aspect_ratio: request.aspect_ratio,
                created_at,
            },
        );
        self.mark_dirty();
        &self.gallery[0]
    }

    pub(crate) fn set_thumbnail_status(&mut self, id: ResultId, status: ThumbnailStatus) -> bool {
        match self.thumbnails.get_mut(&id) {
            Some(current) if *current != status => {
                *current = status;
                self.dirty = true;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn open_preview(&mut self, id: ResultId) -> bool {
        if self.result(id).is_none() {
            return false;
        }
        if self.preview != Some(id) {
            self.preview = Some(id);
            self.mark_dirty();
        }
        true
    }

    pub(crate) fn close_preview(&mut self) {
        if self.preview.take().is_some() {
            self.mark_dirty();
        }
    }

    fn progress(&self) -> u8 {
        match self.job {
            JobState::Running { progress, .. } => progress,
            JobState::Idle => 0,
        }
    }

    fn card_view(&self, result: &GeneratedResult) -> ResultCardView {
        ResultCardView {
            id: result.id,
            prompt: result.prompt.clone(),
            duration: result.duration,
            aspect_ratio: result.aspect_ratio,
            thumbnail: result.thumbnail.clone(),
            thumbnail_status: self.thumbnails.get(&result.id).copied().unwrap_or_default(),
            created_at: result.created_at,
        }
    }
}
