use thiserror::Error;

/// Session-local failures. None of them is fatal; each ends up as a notice
/// shown under the input form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StudioError {
    #[error("describe the video before generating")]
    Validation,
    #[error("generation timed out; your prompt was kept so you can retry")]
    GenerationTimeout,
    #[error("generation failed: {0}")]
    GenerationFailed(String),
    #[error("thumbnail unavailable, showing a placeholder: {0}")]
    AssetFetch(String),
    #[error("export failed: {0}")]
    Export(String),
}

/// The single message line the workspace shows to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(StudioError),
}

impl From<StudioError> for Notice {
    fn from(err: StudioError) -> Self {
        Notice::Error(err)
    }
}
