use crate::models::JobId;

/// URLs of the analysis backend, built from one base address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: String,
}

impl Endpoints {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn submit_images(&self) -> String {
        format!("{}/submit_images", self.base)
    }

    pub fn models(&self) -> String {
        format!("{}/models", self.base)
    }

    pub fn start_analysis(&self, job_id: &JobId) -> String {
        format!("{}/start_analysis/{}", self.base, urlencoding::encode(job_id.as_str()))
    }

    pub fn status(&self, job_id: &JobId) -> String {
        format!("{}/status/{}", self.base, urlencoding::encode(job_id.as_str()))
    }

    /// Navigated to directly by the browser, never fetched.
    pub fn download_report(&self, job_id: &JobId) -> String {
        format!("{}/download_report/{}", self.base, urlencoding::encode(job_id.as_str()))
    }
}
