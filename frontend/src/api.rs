use gloo_file::File as GlooFile;
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use shared::{Endpoints, JobId, Mode, ModelCatalog, Route, StartAnalysisRequest, StatusResponse, SubmitResponse};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] gloo_net::Error),
    #[error("Server error: {status} - {body}")]
    Status { status: u16, body: String },
    #[error("Server response carried no job id")]
    MissingJobId,
    #[error("Failed to build upload form")]
    Form,
}

pub type ApiResult<T> = Result<T, ApiError>;

async fn ensure_ok(response: Response) -> ApiResult<Response> {
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Status { status, body })
}

async fn read_json<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    Ok(ensure_ok(response).await?.json::<T>().await?)
}

/// Uploads the batch and returns the page the backend's answer leads to.
pub async fn submit_images(endpoints: &Endpoints, files: &[GlooFile], mode: Mode) -> ApiResult<Route> {
    let form = web_sys::FormData::new().map_err(|_| ApiError::Form)?;
    for file in files {
        form.append_with_blob_and_filename("images", file.as_ref(), &file.name())
            .map_err(|_| ApiError::Form)?;
    }
    form.append_with_str("mode", mode.as_ref())
        .map_err(|_| ApiError::Form)?;

    log::info!("Submitting {} image(s) in {} mode", files.len(), mode);
    let response = Request::post(&endpoints.submit_images())
        .body(form)?
        .send()
        .await?;
    let submitted: SubmitResponse = read_json(response).await?;
    submitted.next_route().ok_or(ApiError::MissingJobId)
}

pub async fn fetch_models(endpoints: &Endpoints) -> ApiResult<ModelCatalog> {
    let response = Request::get(&endpoints.models()).send().await?;
    read_json(response).await
}

/// Response body is ignored; only the status matters.
pub async fn start_analysis(endpoints: &Endpoints, job_id: &JobId, request: &StartAnalysisRequest) -> ApiResult<()> {
    log::info!("Starting {} analysis for job {}", request.mode, job_id);
    let response = Request::post(&endpoints.start_analysis(job_id))
        .json(request)?
        .send()
        .await?;
    ensure_ok(response).await?;
    Ok(())
}

pub async fn fetch_status(endpoints: &Endpoints, job_id: &JobId) -> ApiResult<StatusResponse> {
    let response = Request::get(&endpoints.status(job_id)).send().await?;
    read_json(response).await
}
