use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::filename::deterministic_filename;
use crate::persist::{AtomicFileWriter, PersistError};
use crate::{ResultId, ThumbnailAsset};

/// Everything an exporter needs to know about one gallery result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub result_id: ResultId,
    pub prompt: String,
    pub duration_secs: u32,
    pub aspect_ratio: String,
    pub thumbnail_url: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    /// Absent when the thumbnail never loaded.
    pub media_path: Option<PathBuf>,
    pub manifest_path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
    #[error("manifest encoding failed: {0}")]
    Manifest(#[from] serde_json::Error),
}

/// The download action. Callers supply the destination.
pub trait Exporter: Send + Sync {
    fn export(
        &self,
        request: &ExportRequest,
        thumbnail: Option<&ThumbnailAsset>,
    ) -> Result<ExportSummary, ExportError>;
}

#[derive(Serialize)]
struct Manifest<'a> {
    id: ResultId,
    prompt: &'a str,
    duration_secs: u32,
    aspect_ratio: &'a str,
    thumbnail_url: &'a str,
    created_utc: String,
    media_file: Option<String>,
    thumbnail: &'static str,
}

/// Writes the cached thumbnail bytes and a JSON sidecar into one directory.
#[derive(Debug, Clone)]
pub struct DirectoryExporter {
    dir: PathBuf,
}

impl DirectoryExporter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

impl Exporter for DirectoryExporter {
    fn export(
        &self,
        request: &ExportRequest,
        thumbnail: Option<&ThumbnailAsset>,
    ) -> Result<ExportSummary, ExportError> {
        let key = format!("{}:{}", request.result_id, request.created_at.to_rfc3339());
        let writer = AtomicFileWriter::new(self.dir.clone());

        let media_path = match thumbnail {
            Some(asset) => {
                let ext = extension_for(asset.content_type.as_deref());
                let name = deterministic_filename(&request.prompt, &key, ext);
                Some(writer.write(&name, &asset.bytes)?)
            }
            None => None,
        };

        let manifest = Manifest {
            id: request.result_id,
            prompt: &request.prompt,
            duration_secs: request.duration_secs,
            aspect_ratio: &request.aspect_ratio,
            thumbnail_url: &request.thumbnail_url,
            created_utc: request.created_at.to_rfc3339(),
            media_file: media_path
                .as_ref()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned()),
            thumbnail: if media_path.is_some() {
                "embedded"
            } else {
                "fallback"
            },
        };
        let body = serde_json::to_vec_pretty(&manifest)?;
        let manifest_name = deterministic_filename(&request.prompt, &key, "json");
        let manifest_path = writer.write(&manifest_name, &body)?;

        Ok(ExportSummary {
            media_path,
            manifest_path,
        })
    }
}

fn extension_for(content_type: Option<&str>) -> &'static str {
    let essence = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().to_ascii_lowercase());
    match essence.as_deref() {
        Some("image/png") => "png",
        Some("image/webp") => "webp",
        Some("image/gif") => "gif",
        _ => "jpg",
    }
}
