//! Studio engine: job clock, placeholder thumbnails and export IO.
mod backend;
mod engine;
mod export;
mod fetch;
mod filename;
mod persist;
mod thumbnail;
mod types;

pub use backend::{
    ChannelProgressSink, ProgressSink, SimulatedBackend, SimulationSettings, VideoBackend,
};
pub use engine::{EngineConfig, EngineHandle, EngineParts};
pub use export::{DirectoryExporter, ExportError, ExportRequest, ExportSummary, Exporter};
pub use fetch::{fetch_with_retry, FetchSettings, ReqwestThumbnailFetcher, ThumbnailFetcher};
pub use filename::deterministic_filename;
pub use persist::{ensure_export_dir, AtomicFileWriter, PersistError};
pub use thumbnail::ThumbnailSource;
pub use types::{
    ClipOutput, EngineEvent, FailureKind, FetchError, GenerationError, GenerationRequest, JobId,
    ResultId, ThumbnailAsset,
};
