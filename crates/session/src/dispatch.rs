//! Shell command dispatch

use chalkboard_analysis::{AnalysisHandle, AnalysisRequest};
use chalkboard_ipc::{ShellCommand, ShellEvent};
use painting::{PointerOutcome, RestoreTicket, SIZE_PRESETS};
use tracing::{debug, warn};

use crate::SessionError;
use crate::session::BoardSession;

/// What handling one command produced
///
/// `restore` must be decoded (off the UI thread if possible) and handed
/// back to [`BoardSession::complete_restore`]. `analysis` must be run
/// against a backend and its text handed to
/// [`BoardSession::complete_analysis`]. A later `DismissAnalysis` cancels
/// it through its handle.
#[derive(Debug, Default)]
pub struct CommandOutcome {
    pub events: Vec<ShellEvent>,
    pub restore: Option<RestoreTicket>,
    pub analysis: Option<AnalysisRequest>,
}

impl CommandOutcome {
    fn event(event: ShellEvent) -> Self {
        Self {
            events: vec![event],
            ..Default::default()
        }
    }
}

impl BoardSession {
    /// Full state for a shell that just loaded
    pub fn initialize_event(&self) -> ShellEvent {
        ShellEvent::Initialize {
            boards: self.board_infos(),
            active: self.active,
            tool: self.tool,
            language: self.language,
            size_presets: SIZE_PRESETS.to_vec(),
        }
    }

    fn boards_changed(&self) -> ShellEvent {
        ShellEvent::BoardsChanged {
            boards: self.board_infos(),
            active: self.active,
        }
    }

    /// Apply one shell command
    ///
    /// Failures are reported as `Error` events, never returned.
    pub fn handle(&mut self, command: ShellCommand) -> CommandOutcome {
        debug!("handle: {:?}", command);
        match self.try_handle(command) {
            Ok(outcome) => outcome,
            Err(SessionError::CapacityReached { max }) => {
                CommandOutcome::event(ShellEvent::CapacityReached { max_boards: max })
            }
            Err(err) => {
                warn!("handle: {}", err);
                CommandOutcome::event(ShellEvent::error(err.code(), &err))
            }
        }
    }

    fn try_handle(&mut self, command: ShellCommand) -> Result<CommandOutcome, SessionError> {
        let outcome = match command {
            ShellCommand::SetColor { color } => {
                self.select_color(color);
                CommandOutcome::event(ShellEvent::ToolChanged { tool: self.tool })
            }
            ShellCommand::SelectEraser => {
                self.select_eraser();
                CommandOutcome::event(ShellEvent::ToolChanged { tool: self.tool })
            }
            ShellCommand::SetSize { size } => {
                if self.set_size(size) {
                    CommandOutcome::event(ShellEvent::ToolChanged { tool: self.tool })
                } else {
                    CommandOutcome::event(ShellEvent::error(
                        "invalid_size",
                        format!("Size must be positive, got {size}"),
                    ))
                }
            }
            ShellCommand::Clear => {
                self.clear_active();
                CommandOutcome::event(ShellEvent::SurfaceCleared { board: self.active })
            }
            ShellCommand::AddBoard => {
                self.add_board()?;
                CommandOutcome::event(self.boards_changed())
            }
            ShellCommand::SelectBoard { id } => {
                let restore = self.set_active(id)?;
                let mut events = vec![self.boards_changed()];
                if restore.is_some() {
                    events.push(ShellEvent::RestorePending { board: id });
                }
                CommandOutcome {
                    events,
                    restore,
                    analysis: None,
                }
            }
            ShellCommand::Analyze => {
                let request = self.begin_analysis()?;
                CommandOutcome {
                    events: vec![ShellEvent::AnalysisStarted],
                    restore: None,
                    analysis: Some(request),
                }
            }
            ShellCommand::DismissAnalysis => {
                self.dismiss_analysis();
                CommandOutcome::event(ShellEvent::AnalysisDismissed)
            }
            ShellCommand::SetLanguage { language } => {
                self.set_language(language);
                CommandOutcome::event(ShellEvent::LanguageChanged { language })
            }
            ShellCommand::Resize { width, height } => {
                let restore = self.resize(width, height);
                let events = restore
                    .is_some()
                    .then(|| ShellEvent::RestorePending { board: self.active })
                    .into_iter()
                    .collect();
                CommandOutcome {
                    events,
                    restore,
                    analysis: None,
                }
            }
            ShellCommand::RefreshSnapshot => {
                self.refresh_snapshot()?;
                CommandOutcome::event(self.boards_changed())
            }
            ShellCommand::PointerDown(input) => {
                self.pointer_down(input.into());
                CommandOutcome::default()
            }
            ShellCommand::PointerMove(input) => {
                self.pointer_move(input.into());
                CommandOutcome::default()
            }
            ShellCommand::PointerUp => {
                let outcome = self.pointer_up()?;
                self.stroke_outcome(outcome)
            }
            ShellCommand::PointerLeave => {
                let outcome = self.pointer_leave()?;
                self.stroke_outcome(outcome)
            }
        };
        Ok(outcome)
    }

    fn stroke_outcome(&self, outcome: PointerOutcome) -> CommandOutcome {
        if outcome.is_stroke_completed() {
            CommandOutcome::event(ShellEvent::StrokeCompleted { board: self.active })
        } else {
            CommandOutcome::default()
        }
    }

    /// Record a finished analysis and build the event for the shell
    ///
    /// `None` when the request was dismissed in the meantime.
    pub fn complete_analysis(
        &mut self,
        handle: &AnalysisHandle,
        text: impl Into<String>,
    ) -> Option<ShellEvent> {
        let text = text.into();
        self.finish_analysis(handle, text.clone())
            .then_some(ShellEvent::AnalysisFinished { text })
    }
}
