//! Boards, the active surface and the shared tool

use std::time::Duration;

use chalkboard_analysis::AnalysisHandle;
use chalkboard_config::ChalkboardConfig;
use chalkboard_ipc::{BoardId, BoardInfo, Language};
use painting::{
    ChalkColor, ChalkPipeline, CpuSurface, DecodedRestore, HapticFeedback, HapticSettings,
    NoHaptics, PointerOutcome, PointerSample, RasterSurface, RestoreOutcome, RestoreTicket,
    Snapshot, StrokeRenderer, ToolState, surface_dimension,
};
use tracing::{debug, info, warn};

use crate::SessionError;
use crate::board::Board;

/// State of one chalkboard window
pub struct BoardSession {
    pub(crate) boards: Vec<Board>,
    pub(crate) active: BoardId,
    next_id: u64,
    max_boards: usize,
    pub(crate) tool: ToolState,
    pub(crate) pipeline: ChalkPipeline,
    pub(crate) language: Language,
    /// Request in flight, if any
    pub(crate) analysis: Option<AnalysisHandle>,
    pub(crate) last_analysis: Option<String>,
}

impl BoardSession {
    /// Session without haptics
    pub fn new(config: &ChalkboardConfig) -> Self {
        Self::with_haptics(config, NoHaptics)
    }

    /// Session with one empty board, "Board 1", active
    pub fn with_haptics(config: &ChalkboardConfig, haptics: impl HapticFeedback + 'static) -> Self {
        let renderer = match config.render.seed {
            Some(seed) => StrokeRenderer::with_seed(seed),
            None => StrokeRenderer::from_time(),
        }
        .with_max_dabs(config.render.max_dabs_per_segment);

        // Configs built in code never went through validate()
        let width = surface_dimension(i64::from(config.display.width));
        let height = surface_dimension(i64::from(config.display.height));
        let surface = RasterSurface::new(width, height, config.render.tile_size);
        let settings = HapticSettings {
            enabled: config.haptics.enabled,
            stroke_start: Duration::from_millis(config.haptics.stroke_start_ms),
            grain: Duration::from_millis(config.haptics.grain_ms),
            grain_distance: config.haptics.grain_distance,
        };
        let pipeline = ChalkPipeline::from_parts(surface, renderer).with_haptics(haptics, settings);

        let first = Board::new(BoardId(1), board_name(1));
        info!(
            "Session started: {}x{} surface, up to {} boards",
            width, height, config.boards.max_boards
        );

        Self {
            active: first.id,
            boards: vec![first],
            next_id: 2,
            max_boards: config.boards.max_boards.max(1),
            tool: ToolState::chalk(ChalkColor::default(), config.tool.default_size),
            pipeline,
            language: Language::default(),
            analysis: None,
            last_analysis: None,
        }
    }

    // ------------------------------------------------------------------
    // Read accessors for the shell
    // ------------------------------------------------------------------

    pub fn boards(&self) -> &[Board] {
        &self.boards
    }

    pub fn board_infos(&self) -> Vec<BoardInfo> {
        self.boards.iter().map(Board::info).collect()
    }

    pub fn board(&self, id: BoardId) -> Option<&Board> {
        self.boards.iter().find(|board| board.id == id)
    }

    pub fn active_id(&self) -> BoardId {
        self.active
    }

    pub fn max_boards(&self) -> usize {
        self.max_boards
    }

    pub fn tool(&self) -> &ToolState {
        &self.tool
    }

    pub fn pipeline(&self) -> &ChalkPipeline {
        &self.pipeline
    }

    /// Live surface, for repaint and dirty tile draining
    pub fn pipeline_mut(&mut self) -> &mut ChalkPipeline {
        &mut self.pipeline
    }

    // ------------------------------------------------------------------
    // Tool
    // ------------------------------------------------------------------

    pub fn select_color(&mut self, color: ChalkColor) {
        self.tool.select_color(color);
    }

    pub fn select_eraser(&mut self) {
        self.tool.select_eraser();
    }

    /// Returns false and keeps the old size for non-positive values
    pub fn set_size(&mut self, size: f32) -> bool {
        self.tool.set_size(size)
    }

    // ------------------------------------------------------------------
    // Boards
    // ------------------------------------------------------------------

    /// Append "Board N" and make it active
    ///
    /// At the board limit nothing changes and `CapacityReached` is returned.
    pub fn add_board(&mut self) -> Result<BoardId, SessionError> {
        if self.boards.len() >= self.max_boards {
            warn!("add_board: limit of {} boards reached", self.max_boards);
            return Err(SessionError::CapacityReached {
                max: self.max_boards,
            });
        }

        // Outgoing board is stored before the list changes so a failed
        // export leaves the session untouched
        self.leave_active()?;

        let id = BoardId(self.next_id);
        self.next_id += 1;
        self.boards.push(Board::new(id, board_name(self.boards.len() + 1)));
        info!("add_board: created board {}", id);

        // New board has no stored content, so this only clears
        self.activate(id);
        Ok(id)
    }

    /// Make another board active
    ///
    /// A stroke in progress is ended first (as if the pointer went up).
    /// The outgoing surface is stored in its record; the returned ticket,
    /// if any, restores the incoming board's stored content.
    pub fn set_active(&mut self, id: BoardId) -> Result<Option<RestoreTicket>, SessionError> {
        if self.board(id).is_none() {
            return Err(SessionError::UnknownBoard(id));
        }
        if id == self.active {
            return Ok(None);
        }

        self.leave_active()?;
        Ok(self.activate(id))
    }

    fn leave_active(&mut self) -> Result<(), SessionError> {
        if self.pipeline.is_drawing() {
            debug!("ending stroke in progress on board {}", self.active);
            self.pipeline.pointer_up();
        }
        self.store_active_snapshot()
    }

    fn activate(&mut self, id: BoardId) -> Option<RestoreTicket> {
        let previous = self.active;
        self.active = id;
        info!("set_active: board {} -> {}", previous, id);

        let stored = self.board(id).and_then(|board| board.image_data.clone());
        match stored {
            Some(snapshot) => Some(self.pipeline.import_snapshot(snapshot)),
            None => {
                self.pipeline.clear();
                None
            }
        }
    }

    /// Store the active surface in the active board record
    pub fn on_stroke_completed(&mut self) -> Result<(), SessionError> {
        self.store_active_snapshot()
    }

    /// Same as a stroke completion, on explicit request
    pub fn refresh_snapshot(&mut self) -> Result<(), SessionError> {
        self.store_active_snapshot()
    }

    /// Clear the active surface
    ///
    /// The stored snapshot is left alone until the next stroke
    /// completion or refresh.
    pub fn clear_active(&mut self) {
        info!("clear_active: board {}", self.active);
        self.pipeline.clear();
    }

    /// Encoded content of any board
    ///
    /// The active board is read from the live surface; an inactive board
    /// without stored content is blank at the current size.
    pub fn export_board(&mut self, id: BoardId) -> Result<Snapshot, SessionError> {
        if id == self.active {
            return self.export_active();
        }
        let board = self.board(id).ok_or(SessionError::UnknownBoard(id))?;
        match &board.image_data {
            Some(snapshot) => Ok(snapshot.clone()),
            None => {
                let blank = CpuSurface::new(self.pipeline.width(), self.pipeline.height());
                Ok(Snapshot::encode(&blank)?)
            }
        }
    }

    /// Complete snapshot of the live surface, pending restores included
    pub(crate) fn export_active(&mut self) -> Result<Snapshot, SessionError> {
        self.pipeline.flush_pending_restore();
        Ok(self.pipeline.export_snapshot()?)
    }

    fn store_active_snapshot(&mut self) -> Result<(), SessionError> {
        let snapshot = self.export_active()?;
        let active = self.active;
        if let Some(board) = self.boards.iter_mut().find(|board| board.id == active) {
            debug!("store snapshot for board {} ({} bytes)", active, snapshot.len());
            board.image_data = Some(snapshot);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Surface
    // ------------------------------------------------------------------

    /// Follow a container resize
    pub fn resize(&mut self, width: f64, height: f64) -> Option<RestoreTicket> {
        self.pipeline.resize(width, height)
    }

    /// Hand back a decoded ticket from `set_active` or `resize`
    pub fn complete_restore(&mut self, decoded: DecodedRestore) -> RestoreOutcome {
        self.pipeline.complete_restore(decoded)
    }

    // ------------------------------------------------------------------
    // Pointer input
    // ------------------------------------------------------------------

    pub fn pointer_down(&mut self, sample: PointerSample) -> PointerOutcome {
        self.pipeline.pointer_down(&self.tool, sample)
    }

    pub fn pointer_move(&mut self, sample: PointerSample) -> PointerOutcome {
        self.pipeline.pointer_move(&self.tool, sample)
    }

    /// End the stroke and store the board's snapshot
    pub fn pointer_up(&mut self) -> Result<PointerOutcome, SessionError> {
        let outcome = self.pipeline.pointer_up();
        self.after_stroke(outcome)
    }

    pub fn pointer_leave(&mut self) -> Result<PointerOutcome, SessionError> {
        let outcome = self.pipeline.pointer_leave();
        self.after_stroke(outcome)
    }

    fn after_stroke(&mut self, outcome: PointerOutcome) -> Result<PointerOutcome, SessionError> {
        if outcome.is_stroke_completed() {
            self.on_stroke_completed()?;
        }
        Ok(outcome)
    }
}

fn board_name(number: usize) -> String {
    format!("Board {number}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_config;

    fn draw_line(session: &mut BoardSession, x0: f32, y0: f32, x1: f32, y1: f32) {
        session.pointer_down(PointerSample::new(x0, y0, 1.0, 0));
        session.pointer_move(PointerSample::new(x1, y1, 1.0, 16));
        session.pointer_up().unwrap();
    }

    fn covered(session: &BoardSession) -> usize {
        session.pipeline().surface.surface().covered_pixel_count()
    }

    #[test]
    fn test_initial_state() {
        let session = BoardSession::new(&test_config());
        assert_eq!(session.boards().len(), 1);
        assert_eq!(session.boards()[0].name, "Board 1");
        assert_eq!(session.active_id(), session.boards()[0].id);
        assert_eq!(*session.tool(), ToolState::default());
        assert_eq!(session.pipeline().width(), 120);
    }

    #[test]
    fn test_oversized_display_is_clamped() {
        assert_eq!(
            chalkboard_config::MAX_DISPLAY_DIMENSION,
            painting::MAX_SURFACE_DIMENSION
        );

        let mut config = test_config();
        config.display.width = 20_000;
        config.display.height = 1;
        let session = BoardSession::new(&config);
        assert_eq!(session.pipeline().width(), painting::MAX_SURFACE_DIMENSION);
        assert_eq!(session.pipeline().height(), 1);
    }

    #[test]
    fn test_add_board_up_to_capacity() {
        let mut session = BoardSession::new(&test_config());
        let mut ids = vec![session.active_id()];
        for n in 2..=4 {
            let id = session.add_board().unwrap();
            assert_eq!(session.active_id(), id);
            assert_eq!(session.boards().last().unwrap().name, format!("Board {n}"));
            assert!(!ids.contains(&id));
            ids.push(id);
        }

        let before: Vec<BoardInfo> = session.board_infos();
        let active = session.active_id();
        assert!(matches!(
            session.add_board(),
            Err(SessionError::CapacityReached { max: 4 })
        ));
        assert_eq!(session.board_infos(), before);
        assert_eq!(session.active_id(), active);
    }

    #[test]
    fn test_add_board_stores_outgoing_content() {
        let mut session = BoardSession::new(&test_config());
        let first = session.active_id();
        session.pointer_down(PointerSample::new(20.0, 20.0, 1.0, 0));
        session.pointer_move(PointerSample::new(60.0, 20.0, 1.0, 8));
        session.add_board().unwrap();

        assert!(!session.pipeline().is_drawing());
        assert!(session.board(first).unwrap().image_data.is_some());
        assert_eq!(covered(&session), 0);
    }

    #[test]
    fn test_switching_preserves_content_by_reference() {
        let mut session = BoardSession::new(&test_config());
        let first = session.active_id();
        draw_line(&mut session, 10.0, 10.0, 100.0, 10.0);
        let first_covered = covered(&session);

        let second = session.add_board().unwrap();
        assert_eq!(covered(&session), 0);
        draw_line(&mut session, 10.0, 60.0, 100.0, 60.0);

        let stored_first = session.board(first).unwrap().image_data.clone().unwrap();
        let ticket = session.set_active(first).unwrap().unwrap();
        assert!(Snapshot::ptr_eq(ticket.snapshot(), &stored_first));
        assert!(session.board(second).unwrap().image_data.is_some());

        assert_eq!(
            session.complete_restore(ticket.decode()),
            RestoreOutcome::Applied
        );
        assert!(covered(&session) > 0 && covered(&session) <= first_covered);
        // Second board's stroke is not on the first board
        let row = session.pipeline().get_pixel(50, 60).unwrap();
        assert_eq!(row[3], 0.0);

        // Record is still the very same blob after the round trip
        assert!(Snapshot::ptr_eq(
            session.board(first).unwrap().image_data.as_ref().unwrap(),
            &stored_first
        ));
    }

    #[test]
    fn test_switch_to_empty_board_clears() {
        let mut session = BoardSession::new(&test_config());
        let first = session.active_id();
        draw_line(&mut session, 10.0, 10.0, 100.0, 10.0);
        let second = session.add_board().unwrap();

        assert_eq!(covered(&session), 0);
        assert!(!session.pipeline().has_pending_restore());
        assert!(session.board(second).unwrap().image_data.is_none());
        assert!(session.board(first).unwrap().image_data.is_some());
    }

    #[test]
    fn test_switch_mid_stroke_ends_stroke() {
        let mut session = BoardSession::new(&test_config());
        let first = session.active_id();
        let second = session.add_board().unwrap();
        session.set_active(first).unwrap();

        session.pointer_down(PointerSample::new(10.0, 10.0, 1.0, 0));
        session.pointer_move(PointerSample::new(50.0, 10.0, 1.0, 8));
        session.set_active(second).unwrap();

        assert!(!session.pipeline().is_drawing());
        assert!(session.board(first).unwrap().image_data.is_some());
        // Subsequent move belongs to no stroke
        assert_eq!(
            session.pointer_move(PointerSample::new(90.0, 10.0, 1.0, 16)),
            PointerOutcome::Ignored
        );
        assert_eq!(covered(&session), 0);
    }

    #[test]
    fn test_unknown_board() {
        let mut session = BoardSession::new(&test_config());
        assert!(matches!(
            session.set_active(BoardId(99)),
            Err(SessionError::UnknownBoard(BoardId(99)))
        ));
        assert!(session.set_active(session.active_id()).unwrap().is_none());
    }

    #[test]
    fn test_stale_restore_after_quick_switch() {
        let mut session = BoardSession::new(&test_config());
        let first = session.active_id();
        draw_line(&mut session, 10.0, 10.0, 100.0, 10.0);
        let second = session.add_board().unwrap();
        draw_line(&mut session, 10.0, 60.0, 100.0, 60.0);

        let to_first = session.set_active(first).unwrap().unwrap();
        // Leave again before the decode lands
        let to_second = session.set_active(second).unwrap().unwrap();

        assert_eq!(
            session.complete_restore(to_first.decode()),
            RestoreOutcome::Superseded
        );
        assert_eq!(
            session.complete_restore(to_second.decode()),
            RestoreOutcome::Applied
        );
        assert_eq!(session.pipeline().get_pixel(50, 10).unwrap()[3], 0.0);

        // The first board kept its content even though it was never decoded while active
        let first_snapshot = session.export_board(first).unwrap();
        let image = first_snapshot.decode().unwrap();
        assert!(image.pixels().any(|p| p.0[3] > 0));
    }

    #[test]
    fn test_clear_keeps_stored_snapshot_until_next_stroke() {
        let mut session = BoardSession::new(&test_config());
        let id = session.active_id();
        draw_line(&mut session, 10.0, 10.0, 100.0, 10.0);
        let stored = session.board(id).unwrap().image_data.clone().unwrap();

        session.clear_active();
        assert_eq!(covered(&session), 0);
        assert!(Snapshot::ptr_eq(
            session.board(id).unwrap().image_data.as_ref().unwrap(),
            &stored
        ));

        session.refresh_snapshot().unwrap();
        let refreshed = session.board(id).unwrap().image_data.clone().unwrap();
        assert!(!Snapshot::ptr_eq(&refreshed, &stored));
        let blank = Snapshot::encode(&CpuSurface::new(120, 80)).unwrap();
        assert_eq!(refreshed, blank);
    }

    #[test]
    fn test_pointer_up_without_down_is_noop() {
        let mut session = BoardSession::new(&test_config());
        let id = session.active_id();
        assert_eq!(session.pointer_up().unwrap(), PointerOutcome::Ignored);
        assert!(session.board(id).unwrap().image_data.is_none());
    }

    #[test]
    fn test_tool_is_shared_across_boards() {
        let mut session = BoardSession::new(&test_config());
        session.select_color(ChalkColor::Green);
        assert!(!session.set_size(-1.0));
        assert!(session.set_size(8.0));
        session.add_board().unwrap();

        assert_eq!(session.tool().color(), ChalkColor::Green);
        assert_eq!(session.tool().size(), 8.0);

        session.select_eraser();
        assert!(session.tool().is_eraser());
        session.select_color(ChalkColor::Red);
        assert!(!session.tool().is_eraser());
    }

    #[test]
    fn test_eraser_stroke_through_session() {
        let mut session = BoardSession::new(&test_config());
        draw_line(&mut session, 10.0, 40.0, 110.0, 40.0);
        assert!(covered(&session) > 0);

        session.select_eraser();
        draw_line(&mut session, 10.0, 40.0, 110.0, 40.0);
        assert_eq!(covered(&session), 0);
    }

    #[test]
    fn test_resize_keeps_active_content() {
        let mut session = BoardSession::new(&test_config());
        draw_line(&mut session, 10.0, 10.0, 100.0, 10.0);

        let ticket = session.resize(240.0, 160.0).unwrap();
        assert_eq!(session.pipeline().width(), 240);
        assert_eq!(
            session.complete_restore(ticket.decode()),
            RestoreOutcome::Applied
        );
        assert!(covered(&session) > 0);

        assert!(session.resize(0.0, -3.0).is_none());
        assert_eq!(session.pipeline().width(), 0);
        // Drawing on an empty surface is harmless
        draw_line(&mut session, 1.0, 1.0, 5.0, 5.0);
    }

    #[test]
    fn test_export_inactive_board_without_content() {
        let mut session = BoardSession::new(&test_config());
        let first = session.active_id();
        session.add_board().unwrap();
        let snapshot = session.export_board(first).unwrap();
        assert_eq!(snapshot.decode().unwrap().dimensions(), (120, 80));
        assert!(session.export_board(BoardId(42)).is_err());
    }
}
