//! AI teacher for the chalkboard
//!
//! Sends a snapshot of the active board plus a prompt to an
//! image-understanding service and returns its text. The boundary to the
//! rest of the app is [`analyze_or_message`]: it never fails, errors
//! become a sentence the shell can show as-is. Each request carries an
//! [`AnalysisHandle`] the session keeps so a dismissal can abandon it.

mod handle;
mod protocol;
mod remote;

pub use handle::AnalysisHandle;
pub use remote::RemoteAnalysis;

use painting::{Snapshot, SnapshotError};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Shown when the service could not be reached or returned garbage
pub const FAILURE_MESSAGE: &str =
    "Sorry, I could not analyze the board at this moment. Please check your network.";

/// Shown when the service answered with no text
pub const EMPTY_RESPONSE_TEXT: &str = "Thinking...";

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Service returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("No API key configured")]
    MissingApiKey,

    #[error("Invalid snapshot: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("Cancelled")]
    Cancelled,
}

/// What gets analyzed
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    /// Board content, PNG encoded
    pub snapshot: Snapshot,
    pub prompt: String,
    /// Identifies this request and cancels it
    pub handle: AnalysisHandle,
}

impl AnalysisRequest {
    pub fn new(snapshot: Snapshot, prompt: impl Into<String>) -> Self {
        Self {
            snapshot,
            prompt: prompt.into(),
            handle: AnalysisHandle::new(),
        }
    }

    /// Build from a `data:image/...;base64,` URL as produced by a web shell
    pub fn from_data_url(url: &str, prompt: impl Into<String>) -> Result<Self, AnalysisError> {
        Ok(Self::new(Snapshot::from_data_url(url)?, prompt))
    }
}

/// Trait for analysis backends
#[allow(async_fn_in_trait)]
pub trait AnalysisBackend {
    /// Analyze the snapshot and return the model's text
    async fn analyze(&mut self, request: AnalysisRequest) -> Result<String, AnalysisError>;
}

/// Run an analysis and turn every outcome into displayable text
///
/// The backend future is dropped as soon as the request's handle is
/// cancelled, which aborts any HTTP call in progress.
pub async fn analyze_or_message<B: AnalysisBackend>(
    backend: &mut B,
    request: AnalysisRequest,
) -> String {
    info!(
        "Requesting analysis ({} byte snapshot)",
        request.snapshot.len()
    );
    let handle = request.handle.clone();
    let result = tokio::select! {
        biased;
        _ = handle.cancelled() => Err(AnalysisError::Cancelled),
        result = backend.analyze(request) => result,
    };
    match result {
        Ok(text) if text.trim().is_empty() => EMPTY_RESPONSE_TEXT.to_string(),
        Ok(text) => text,
        Err(AnalysisError::Cancelled) => {
            debug!("Analysis cancelled");
            FAILURE_MESSAGE.to_string()
        }
        Err(err) => {
            warn!("Analysis failed: {}", err);
            FAILURE_MESSAGE.to_string()
        }
    }
}
