use url::Url;

use crate::{GeneratedResult, JobId, JobRequest, ResultId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    StartGeneration { job_id: JobId, request: JobRequest },
    CancelGeneration { job_id: JobId },
    FetchThumbnail { result_id: ResultId, url: Url },
    Export { result: GeneratedResult },
}
