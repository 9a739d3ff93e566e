use std::io;
use std::sync::mpsc;
use std::thread;

use studio_core::{Effect, ExportOutcome, GeneratedResult, JobOutcome, Msg, ThumbnailOutcome};
use studio_engine::{
    EngineConfig, EngineEvent, EngineHandle, ExportRequest, GenerationError, GenerationRequest,
};
use studio_logging::{studio_info, studio_warn};

/// Carries reducer effects to the engine and engine events back as messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(config: EngineConfig, msg_tx: mpsc::Sender<Msg>) -> io::Result<Self> {
        let engine = EngineHandle::new(config)?;
        let runner = Self { engine };
        runner.spawn_event_loop(msg_tx);
        Ok(runner)
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartGeneration { job_id, request } => {
                    studio_info!(
                        "StartGeneration job_id={} duration={} aspect={} prompt_len={}",
                        job_id,
                        request.duration,
                        request.aspect_ratio,
                        request.prompt.chars().count()
                    );
                    self.engine.generate(
                        job_id,
                        GenerationRequest {
                            prompt: request.prompt,
                            duration_secs: request.duration.seconds(),
                            aspect_ratio: request.aspect_ratio.label().to_string(),
                        },
                    );
                }
                Effect::CancelGeneration { job_id } => self.engine.cancel(job_id),
                Effect::FetchThumbnail { result_id, url } => {
                    self.engine.fetch_thumbnail(result_id, url.as_str());
                }
                Effect::Export { result } => self.engine.export(export_request(&result)),
            }
        }
    }

    pub fn shutdown(&self) {
        self.engine.shutdown();
    }

    fn spawn_event_loop(&self, msg_tx: mpsc::Sender<Msg>) {
        let engine = self.engine.clone();
        thread::spawn(move || {
            while let Some(event) = engine.recv() {
                if msg_tx.send(map_event(event)).is_err() {
                    break;
                }
            }
        });
    }
}

fn export_request(result: &GeneratedResult) -> ExportRequest {
    ExportRequest {
        result_id: result.id,
        prompt: result.prompt.clone(),
        duration_secs: result.duration.seconds(),
        aspect_ratio: result.aspect_ratio.label().to_string(),
        thumbnail_url: result.thumbnail.to_string(),
        created_at: result.created_at,
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Progress { job_id, percent } => Msg::JobProgress { job_id, percent },
        EngineEvent::JobCompleted { job_id, result } => {
            let outcome = match result {
                Ok(clip) => JobOutcome::Completed {
                    thumbnail: clip.thumbnail,
                    created_at: clip.created_at,
                },
                Err(GenerationError::Timeout) => JobOutcome::TimedOut,
                Err(GenerationError::Cancelled) => JobOutcome::Cancelled,
                Err(GenerationError::Backend(reason)) => {
                    studio_warn!("Job {} failed: {}", job_id, reason);
                    JobOutcome::Failed { reason }
                }
            };
            Msg::JobDone { job_id, outcome }
        }
        EngineEvent::ThumbnailFetched { result_id, result } => Msg::ThumbnailLoaded {
            result_id,
            outcome: match result {
                Ok(bytes) => ThumbnailOutcome::Loaded { bytes },
                Err(err) => ThumbnailOutcome::Failed {
                    reason: err.to_string(),
                },
            },
        },
        EngineEvent::ExportCompleted { result_id, result } => Msg::ExportFinished {
            result_id,
            outcome: match result {
                Ok(summary) => ExportOutcome::Saved {
                    location: summary
                        .media_path
                        .unwrap_or(summary.manifest_path)
                        .display()
                        .to_string(),
                },
                Err(reason) => ExportOutcome::Failed { reason },
            },
        },
    }
}
