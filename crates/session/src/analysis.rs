//! AI teacher state of the session
//!
//! The session only prepares requests and records results. Running the
//! backend is the caller's job so the session never blocks on the network.

use chalkboard_analysis::{AnalysisHandle, AnalysisRequest};
use chalkboard_ipc::Language;
use tracing::{debug, info};

use crate::SessionError;
use crate::session::BoardSession;

impl BoardSession {
    /// Snapshot the active board and mark an analysis as running
    ///
    /// A restore still in flight is applied first so the request sees the
    /// whole board. The prompt follows the current language.
    pub fn begin_analysis(&mut self) -> Result<AnalysisRequest, SessionError> {
        if self.analysis.is_some() {
            return Err(SessionError::AnalysisInProgress);
        }
        let snapshot = self.export_active()?;
        let prompt = self.language.translation().ai_prompt;

        let request = AnalysisRequest::new(snapshot, prompt);
        self.analysis = Some(request.handle.clone());
        self.last_analysis = None;
        info!(
            "begin_analysis: board {} ({} bytes, {})",
            self.active,
            request.snapshot.len(),
            self.language
        );
        Ok(request)
    }

    /// Record the text produced for the request behind `handle`
    ///
    /// Returns false and drops the text when that request was dismissed
    /// or is not the one in flight.
    pub fn finish_analysis(&mut self, handle: &AnalysisHandle, text: impl Into<String>) -> bool {
        let current = self
            .analysis
            .as_ref()
            .is_some_and(|running| running.same_request(handle));
        if !current {
            debug!("finish_analysis: dropping result of an abandoned request");
            return false;
        }
        let text = text.into();
        debug!("finish_analysis: {} chars", text.chars().count());
        self.analysis = None;
        self.last_analysis = Some(text);
        true
    }

    /// Close the result panel, cancelling a request still in flight
    pub fn dismiss_analysis(&mut self) {
        if let Some(handle) = self.analysis.take() {
            info!("dismiss_analysis: cancelling request in flight");
            handle.cancel();
        }
        self.last_analysis = None;
    }

    pub fn is_analyzing(&self) -> bool {
        self.analysis.is_some()
    }

    pub fn last_analysis(&self) -> Option<&str> {
        self.last_analysis.as_deref()
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        info!("set_language: {}", language);
        self.language = language;
    }
}
