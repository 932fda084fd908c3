//! Drives a board session from a command script
//!
//! Restore tickets are decoded on the blocking pool while later commands
//! keep running, the same way a shell keeps sending pointer input while
//! a board's content is loading. Finished decodes are handed back before
//! each command; stale ones are discarded by the session. Analyses run as
//! tasks too, so a later `DismissAnalysis` can still cancel them.

use std::io::Write;
use std::mem::size_of;

use anyhow::{Context, Result};
use chalkboard_analysis::{AnalysisHandle, RemoteAnalysis, analyze_or_message};
use chalkboard_ipc::{ShellCommand, ShellEvent, encode_event};
use chalkboard_session::BoardSession;
use painting::{ChalkPipeline, DecodedRestore, RestoreOutcome, TileCoord};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace};

/// Tally of what happened during a replay
#[derive(Debug, Default)]
pub struct ReplaySummary {
    pub commands: usize,
    pub events: usize,
    pub restores_applied: usize,
    pub restores_superseded: usize,
    pub restores_failed: usize,
    /// Tiles a shell would have re-uploaded
    pub tiles_repainted: usize,
    /// Texture bytes those uploads would have moved
    pub bytes_uploaded: usize,
    pub analyses: Vec<String>,
    /// Analyses dismissed before their text arrived
    pub analyses_dropped: usize,
}

type AnalysisTask = JoinHandle<(AnalysisHandle, String)>;

pub struct Replay<'a> {
    session: &'a mut BoardSession,
    backend: RemoteAnalysis,
    in_flight: Vec<JoinHandle<DecodedRestore>>,
    analyses: Vec<AnalysisTask>,
    events_out: Option<Box<dyn Write + 'a>>,
    summary: ReplaySummary,
}

impl<'a> Replay<'a> {
    pub fn new(session: &'a mut BoardSession, backend: RemoteAnalysis) -> Self {
        Self {
            session,
            backend,
            in_flight: Vec::new(),
            analyses: Vec::new(),
            events_out: None,
            summary: ReplaySummary::default(),
        }
    }

    /// Write every shell event as one JSON line
    pub fn with_events_out(mut self, out: impl Write + 'a) -> Self {
        self.events_out = Some(Box::new(out));
        self
    }

    pub async fn run(mut self, commands: Vec<ShellCommand>) -> Result<ReplaySummary> {
        let initialize = self.session.initialize_event();
        self.emit(&initialize)?;

        for command in commands {
            self.collect_finished().await?;
            self.step(command).await?;
        }

        // Let every outstanding task land before the caller reads boards
        for handle in std::mem::take(&mut self.in_flight) {
            let decoded = handle.await.context("restore decode task failed")?;
            self.complete(decoded);
        }
        for task in std::mem::take(&mut self.analyses) {
            let (handle, text) = task.await.context("analysis task failed")?;
            self.complete_analysis(&handle, text)?;
        }

        info!(
            "Replayed {} commands, {} events",
            self.summary.commands, self.summary.events
        );
        Ok(self.summary)
    }

    async fn step(&mut self, command: ShellCommand) -> Result<()> {
        self.summary.commands += 1;
        let outcome = self.session.handle(command);
        for event in &outcome.events {
            self.emit(event)?;
        }

        if let Some(ticket) = outcome.restore {
            debug!("Decoding restore ({} bytes)", ticket.snapshot().len());
            self.in_flight
                .push(tokio::task::spawn_blocking(move || ticket.decode()));
        }

        let dirty = self.session.pipeline_mut().take_dirty_tiles();
        if !dirty.is_empty() {
            let bytes = upload_size(self.session.pipeline(), &dirty);
            trace!("{} tiles to repaint, {} bytes", dirty.len(), bytes);
            self.summary.tiles_repainted += dirty.len();
            self.summary.bytes_uploaded += bytes;
        }

        if let Some(request) = outcome.analysis {
            let mut backend = self.backend.clone();
            let handle = request.handle.clone();
            self.analyses.push(tokio::spawn(async move {
                let text = analyze_or_message(&mut backend, request).await;
                (handle, text)
            }));
        }
        Ok(())
    }

    fn complete_analysis(&mut self, handle: &AnalysisHandle, text: String) -> Result<()> {
        match self.session.complete_analysis(handle, text.clone()) {
            Some(event) => {
                self.emit(&event)?;
                self.summary.analyses.push(text);
            }
            None => self.summary.analyses_dropped += 1,
        }
        Ok(())
    }

    async fn collect_finished(&mut self) -> Result<()> {
        let mut pending = Vec::with_capacity(self.in_flight.len());
        for handle in std::mem::take(&mut self.in_flight) {
            if handle.is_finished() {
                let decoded = handle.await.context("restore decode task failed")?;
                self.complete(decoded);
            } else {
                pending.push(handle);
            }
        }
        self.in_flight = pending;

        let mut running = Vec::with_capacity(self.analyses.len());
        for task in std::mem::take(&mut self.analyses) {
            if task.is_finished() {
                let (handle, text) = task.await.context("analysis task failed")?;
                self.complete_analysis(&handle, text)?;
            } else {
                running.push(task);
            }
        }
        self.analyses = running;
        Ok(())
    }

    fn complete(&mut self, decoded: DecodedRestore) {
        match self.session.complete_restore(decoded) {
            RestoreOutcome::Applied => self.summary.restores_applied += 1,
            RestoreOutcome::Superseded => self.summary.restores_superseded += 1,
            RestoreOutcome::Failed => self.summary.restores_failed += 1,
        }
    }

    fn emit(&mut self, event: &ShellEvent) -> Result<()> {
        self.summary.events += 1;
        if let Some(out) = self.events_out.as_mut() {
            writeln!(out, "{}", encode_event(event)?)?;
        }
        Ok(())
    }
}

/// Bytes a shell uploads for `dirty`: one region when it is partial,
/// the whole texture when the tiles cover the surface
fn upload_size(pipeline: &ChalkPipeline, dirty: &[TileCoord]) -> usize {
    let Some(bounds) = pipeline.compute_tiles_bounding_box(dirty) else {
        return 0;
    };
    if bounds.width >= pipeline.width() && bounds.height >= pipeline.height() {
        pipeline.surface_as_bytes().len()
    } else {
        pipeline.get_region_data(bounds).len() * size_of::<[f32; 4]>()
    }
}
