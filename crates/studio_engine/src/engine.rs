use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use chrono::{DateTime, Utc};
use studio_logging::{studio_debug, studio_info, studio_warn};
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

use crate::backend::{
    ChannelProgressSink, ProgressSink, SimulatedBackend, SimulationSettings, VideoBackend,
};
use crate::export::{DirectoryExporter, ExportRequest, Exporter};
use crate::fetch::{fetch_with_retry, FetchSettings, ReqwestThumbnailFetcher, ThumbnailFetcher};
use crate::thumbnail::ThumbnailSource;
use crate::{
    ClipOutput, EngineEvent, GenerationError, GenerationRequest, JobId, ResultId, ThumbnailAsset,
};

#[derive(Clone)]
pub struct EngineConfig {
    pub simulation: SimulationSettings,
    pub thumbnails: ThumbnailSource,
    pub fetch: FetchSettings,
    pub generation_timeout: Duration,
    pub export_dir: PathBuf,
    pub created_utc: Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>,
}

impl EngineConfig {
    pub fn default_with_export(export_dir: PathBuf) -> Self {
        Self {
            simulation: SimulationSettings::default(),
            thumbnails: ThumbnailSource::default(),
            fetch: FetchSettings::default(),
            generation_timeout: Duration::from_secs(15),
            export_dir,
            created_utc: Arc::new(Utc::now),
        }
    }
}

/// The collaborators an engine drives. `EngineHandle::new` wires the shipped
/// implementations; tests swap in their own.
#[derive(Clone)]
pub struct EngineParts {
    pub backend: Arc<dyn VideoBackend>,
    pub fetcher: Arc<dyn ThumbnailFetcher>,
    pub exporter: Arc<dyn Exporter>,
    pub generation_timeout: Duration,
    pub fetch_retries: u32,
}

enum EngineCommand {
    Generate {
        job_id: JobId,
        request: GenerationRequest,
    },
    Cancel {
        job_id: JobId,
    },
    FetchThumbnail {
        result_id: ResultId,
        url: String,
    },
    Export(ExportRequest),
    Shutdown,
}

#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> io::Result<Self> {
        let backend = SimulatedBackend::new(
            config.simulation,
            config.thumbnails.clone(),
            config.created_utc.clone(),
        );
        Self::with_parts(EngineParts {
            backend: Arc::new(backend),
            fetcher: Arc::new(ReqwestThumbnailFetcher::new(config.fetch.clone())),
            exporter: Arc::new(DirectoryExporter::new(config.export_dir.clone())),
            generation_timeout: config.generation_timeout,
            fetch_retries: config.fetch.retries,
        })
    }

    pub fn with_parts(parts: EngineParts) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = Runtime::new()?;

        thread::Builder::new()
            .name("studio-engine".to_string())
            .spawn(move || {
                let worker = Worker::new(parts, event_tx);
                while let Ok(command) = cmd_rx.recv() {
                    if !worker.handle(&runtime, command) {
                        break;
                    }
                }
                worker.cancel_all();
                runtime.shutdown_timeout(Duration::from_millis(250));
                studio_info!("Engine stopped");
            })?;

        Ok(Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        })
    }

    pub fn generate(&self, job_id: JobId, request: GenerationRequest) {
        let _ = self.cmd_tx.send(EngineCommand::Generate { job_id, request });
    }

    pub fn cancel(&self, job_id: JobId) {
        let _ = self.cmd_tx.send(EngineCommand::Cancel { job_id });
    }

    pub fn fetch_thumbnail(&self, result_id: ResultId, url: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::FetchThumbnail {
            result_id,
            url: url.into(),
        });
    }

    pub fn export(&self, request: ExportRequest) {
        let _ = self.cmd_tx.send(EngineCommand::Export(request));
    }

    /// Cancels every running job clock and stops the worker thread.
    pub fn shutdown(&self) {
        let _ = self.cmd_tx.send(EngineCommand::Shutdown);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.recv_timeout(timeout).ok()
    }

    /// Blocks for the next event. `None` once the engine has stopped and every
    /// pending event has been delivered.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.recv().ok()
    }
}

struct Worker {
    parts: EngineParts,
    event_tx: mpsc::Sender<EngineEvent>,
    root: CancellationToken,
    jobs: Arc<Mutex<HashMap<JobId, CancellationToken>>>,
    thumbnails: Arc<Mutex<HashMap<ResultId, ThumbnailAsset>>>,
}

impl Worker {
    fn new(parts: EngineParts, event_tx: mpsc::Sender<EngineEvent>) -> Self {
        Self {
            parts,
            event_tx,
            root: CancellationToken::new(),
            jobs: Arc::new(Mutex::new(HashMap::new())),
            thumbnails: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Returns false once the engine should stop.
    fn handle(&self, runtime: &Runtime, command: EngineCommand) -> bool {
        match command {
            EngineCommand::Generate { job_id, request } => {
                self.spawn_generation(runtime, job_id, request)
            }
            EngineCommand::Cancel { job_id } => {
                let token = self.jobs.lock().ok().and_then(|mut jobs| jobs.remove(&job_id));
                if let Some(token) = token {
                    studio_info!("Cancelling job {}", job_id);
                    token.cancel();
                }
            }
            EngineCommand::FetchThumbnail { result_id, url } => {
                self.spawn_thumbnail_fetch(runtime, result_id, url)
            }
            EngineCommand::Export(request) => self.spawn_export(runtime, request),
            EngineCommand::Shutdown => return false,
        }
        true
    }

    fn spawn_generation(&self, runtime: &Runtime, job_id: JobId, request: GenerationRequest) {
        let token = self.root.child_token();
        if let Ok(mut jobs) = self.jobs.lock() {
            jobs.insert(job_id, token.clone());
        }
        let backend = self.parts.backend.clone();
        let timeout = self.parts.generation_timeout;
        let jobs = self.jobs.clone();
        let event_tx = self.event_tx.clone();

        studio_info!("Generate job_id={} prompt_len={}", job_id, request.prompt.len());
        runtime.spawn(async move {
            let sink = ChannelProgressSink::new(event_tx.clone());
            let result =
                run_generation(backend.as_ref(), job_id, &request, &sink, timeout, &token).await;
            if let Ok(mut jobs) = jobs.lock() {
                jobs.remove(&job_id);
            }
            let _ = event_tx.send(EngineEvent::JobCompleted { job_id, result });
        });
    }

    fn spawn_thumbnail_fetch(&self, runtime: &Runtime, result_id: ResultId, url: String) {
        let fetcher = self.parts.fetcher.clone();
        let retries = self.parts.fetch_retries;
        let cache = self.thumbnails.clone();
        let event_tx = self.event_tx.clone();
        let token = self.root.child_token();

        runtime.spawn(async move {
            let fetched = tokio::select! {
                _ = token.cancelled() => return,
                fetched = fetch_with_retry(fetcher.as_ref(), &url, retries) => fetched,
            };
            let result = match fetched {
                Ok(asset) => {
                    let len = asset.bytes.len() as u64;
                    studio_debug!("Thumbnail for result {} loaded ({} bytes)", result_id, len);
                    if let Ok(mut cache) = cache.lock() {
                        cache.insert(result_id, asset);
                    }
                    Ok(len)
                }
                Err(err) => {
                    studio_warn!("Thumbnail for result {} failed: {}", result_id, err);
                    Err(err)
                }
            };
            let _ = event_tx.send(EngineEvent::ThumbnailFetched { result_id, result });
        });
    }

    fn spawn_export(&self, runtime: &Runtime, request: ExportRequest) {
        let asset = self
            .thumbnails
            .lock()
            .ok()
            .and_then(|cache| cache.get(&request.result_id).cloned());
        let exporter = self.parts.exporter.clone();
        let event_tx = self.event_tx.clone();

        runtime.spawn_blocking(move || {
            let result_id = request.result_id;
            let result = exporter
                .export(&request, asset.as_ref())
                .map_err(|err| err.to_string());
            match &result {
                Ok(summary) => studio_info!(
                    "Exported result {} to {:?}",
                    result_id,
                    summary.manifest_path
                ),
                Err(err) => studio_warn!("Export of result {} failed: {}", result_id, err),
            }
            let _ = event_tx.send(EngineEvent::ExportCompleted { result_id, result });
        });
    }

    fn cancel_all(&self) {
        self.root.cancel();
        if let Ok(mut jobs) = self.jobs.lock() {
            jobs.clear();
        }
    }
}

/// Drives one backend job under a deadline and a cancellation token.
pub(crate) async fn run_generation(
    backend: &dyn VideoBackend,
    job_id: JobId,
    request: &GenerationRequest,
    sink: &dyn ProgressSink,
    timeout: Duration,
    token: &CancellationToken,
) -> Result<ClipOutput, GenerationError> {
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(GenerationError::Cancelled),
        outcome = tokio::time::timeout(timeout, backend.generate(job_id, request, sink)) => {
            outcome.unwrap_or(Err(GenerationError::Timeout))
        }
    }
}
