pub mod config;
pub mod endpoints;
pub mod lifecycle;
pub mod models;
pub mod processing;
pub mod results;
pub mod routes;
pub mod status;
pub mod upload;

pub use config::{ClientConfig, ImageLimits};
pub use endpoints::Endpoints;
pub use models::{
    JobId, JobStatus, Mode, ModelCatalog, ModelResult, ResultsBundle, StartAnalysisRequest, StatusResponse,
    SubmitResponse,
};
pub use processing::{Applied, Phase, PollOutcome, PollTicket, ProcessingState};
pub use routes::{HistorySink, Navigator, Route};
pub use status::StatusLine;
