use studio_logging::{studio_debug, studio_info, studio_warn};

use crate::{
    AppState, Effect, ExportOutcome, JobId, JobOutcome, Msg, Notice, OverlayRegion, StudioError,
    ThumbnailOutcome, ThumbnailStatus,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::PromptChanged(text) => {
            if !state.is_running() {
                if !text.trim().is_empty()
                    && state.notice() == Some(&Notice::Error(StudioError::Validation))
                {
                    state.set_notice(None);
                }
                state.set_prompt(text);
            }
            Vec::new()
        }
        Msg::DurationSelected(duration) => {
            if !state.is_running() {
                state.set_duration(duration);
            }
            Vec::new()
        }
        Msg::AspectRatioSelected(aspect_ratio) => {
            if !state.is_running() {
                state.set_aspect_ratio(aspect_ratio);
            }
            Vec::new()
        }
        Msg::SubmitClicked => submit(&mut state),
        Msg::CancelClicked => match state.running_job() {
            Some(job_id) => {
                state.finish_job(job_id);
                state.set_notice(Some(Notice::Info("Generation cancelled".to_string())));
                studio_info!("Job {} cancelled by user", job_id);
                vec![Effect::CancelGeneration { job_id }]
            }
            None => Vec::new(),
        },
        Msg::JobProgress { job_id, percent } => {
            state.apply_progress(job_id, percent);
            Vec::new()
        }
        Msg::JobDone { job_id, outcome } => complete(&mut state, job_id, outcome),
        Msg::ThumbnailLoaded { result_id, outcome } => {
            match outcome {
                ThumbnailOutcome::Loaded { bytes } => {
                    state.set_thumbnail_status(result_id, ThumbnailStatus::Ready { bytes });
                }
                ThumbnailOutcome::Failed { reason } => {
                    if state.set_thumbnail_status(result_id, ThumbnailStatus::Fallback) {
                        studio_warn!("Thumbnail for result {} failed: {}", result_id, reason);
                        state.set_notice(Some(StudioError::AssetFetch(reason).into()));
                    }
                }
            }
            Vec::new()
        }
        Msg::ResultSelected { result_id } => {
            state.open_preview(result_id);
            Vec::new()
        }
        Msg::PreviewClosed
        | Msg::OverlayClicked {
            region: OverlayRegion::Backdrop,
        } => {
            state.close_preview();
            Vec::new()
        }
        Msg::OverlayClicked {
            region: OverlayRegion::Content,
        } => Vec::new(),
        Msg::DownloadClicked { result_id } => match state.result(result_id) {
            Some(result) => vec![Effect::Export {
                result: result.clone(),
            }],
            None => Vec::new(),
        },
        Msg::ExportFinished { result_id, outcome } => {
            let notice = match outcome {
                ExportOutcome::Saved { location } => {
                    Notice::Info(format!("Saved result #{result_id} to {location}"))
                }
                ExportOutcome::Failed { reason } => StudioError::Export(reason).into(),
            };
            state.set_notice(Some(notice));
            Vec::new()
        }
        Msg::NoticeDismissed => {
            state.set_notice(None);
            Vec::new()
        }
    };

    (state, effects)
}

fn submit(state: &mut AppState) -> Vec<Effect> {
    // The disabled form is the only guard against overlapping jobs.
    if state.is_running() {
        return Vec::new();
    }
    if state.prompt().trim().is_empty() {
        state.set_notice(Some(StudioError::Validation.into()));
        return Vec::new();
    }

    state.set_notice(None);
    let (job_id, request) = state.start_job();
    studio_info!(
        "Job {} started duration={} aspect={} prompt_len={}",
        job_id,
        request.duration,
        request.aspect_ratio,
        request.prompt.len()
    );
    vec![Effect::StartGeneration { job_id, request }]
}

fn complete(state: &mut AppState, job_id: JobId, outcome: JobOutcome) -> Vec<Effect> {
    let Some(request) = state.finish_job(job_id) else {
        studio_debug!("Ignoring outcome for stale job {}", job_id);
        return Vec::new();
    };

    match outcome {
        JobOutcome::Completed {
            thumbnail,
            created_at,
        } => {
            let result = state.push_result(request, thumbnail, created_at);
            let effect = Effect::FetchThumbnail {
                result_id: result.id,
                url: result.thumbnail.clone(),
            };
            studio_info!("Job {} completed as result {}", job_id, result.id);
            state.set_prompt(String::new());
            vec![effect]
        }
        JobOutcome::TimedOut => {
            studio_warn!("Job {} timed out", job_id);
            state.set_notice(Some(StudioError::GenerationTimeout.into()));
            Vec::new()
        }
        JobOutcome::Failed { reason } => {
            studio_warn!("Job {} failed: {}", job_id, reason);
            state.set_notice(Some(StudioError::GenerationFailed(reason).into()));
            Vec::new()
        }
        JobOutcome::Cancelled => {
            state.set_notice(Some(Notice::Info("Generation cancelled".to_string())));
            Vec::new()
        }
    }
}
