use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use studio_logging::studio_debug;
use tokio::time::MissedTickBehavior;

use crate::thumbnail::ThumbnailSource;
use crate::{ClipOutput, EngineEvent, GenerationError, GenerationRequest, JobId};

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelProgressSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// A video-generation provider. The simulated backend is the only one shipped.
#[async_trait::async_trait]
pub trait VideoBackend: Send + Sync {
    async fn generate(
        &self,
        job_id: JobId,
        request: &GenerationRequest,
        sink: &dyn ProgressSink,
    ) -> Result<ClipOutput, GenerationError>;
}

/// Timing of the fake job. One interval drives both the progress bar and
/// completion, so the bar and the result always land together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationSettings {
    pub tick_interval: Duration,
    pub progress_step: u8,
    pub latency: Duration,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(100),
            progress_step: 2,
            latency: Duration::from_secs(5),
        }
    }
}

impl SimulationSettings {
    /// Number of ticks until completion; at least one.
    pub fn total_ticks(&self) -> u64 {
        let tick = self.tick_interval.as_millis().max(1);
        let ticks = self.latency.as_millis().div_ceil(tick);
        u64::try_from(ticks).unwrap_or(u64::MAX).max(1)
    }

    fn effective_interval(&self) -> Duration {
        self.tick_interval.max(Duration::from_millis(1))
    }
}

pub struct SimulatedBackend {
    settings: SimulationSettings,
    thumbnails: ThumbnailSource,
    created_utc: Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>,
}

impl SimulatedBackend {
    pub fn new(
        settings: SimulationSettings,
        thumbnails: ThumbnailSource,
        created_utc: Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>,
    ) -> Self {
        Self {
            settings,
            thumbnails,
            created_utc,
        }
    }
}

#[async_trait::async_trait]
impl VideoBackend for SimulatedBackend {
    async fn generate(
        &self,
        job_id: JobId,
        request: &GenerationRequest,
        sink: &dyn ProgressSink,
    ) -> Result<ClipOutput, GenerationError> {
        studio_debug!(
            "Simulating job {} ({}s, {}) over {:?}",
            job_id,
            request.duration_secs,
            request.aspect_ratio,
            self.settings.latency
        );

        let mut ticker = tokio::time::interval(self.settings.effective_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick of a tokio interval completes immediately.
        ticker.tick().await;

        let mut percent: u8 = 0;
        for _ in 0..self.settings.total_ticks() {
            ticker.tick().await;
            percent = percent.saturating_add(self.settings.progress_step).min(100);
            sink.emit(EngineEvent::Progress { job_id, percent });
        }

        let created_at = (self.created_utc)();
        let seed = created_at.timestamp_millis().to_string();
        let thumbnail = self
            .thumbnails
            .url_for_seed(&seed)
            .map_err(|err| GenerationError::Backend(err.to_string()))?;

        Ok(ClipOutput {
            thumbnail,
            created_at,
        })
    }
}
