use std::cell::{Cell, RefCell};

use futures::future::LocalBoxFuture;

use crate::constants::DEFAULT_ROUNDS;
use crate::prize::{Prize, PrizeCatalog};
use crate::reel::builder::{ReelBuilder, ReelLayout};
use crate::reel::error::ReelError;
use crate::reel::gate::AttemptGate;
use crate::reel::offset::CellMetrics;
use crate::reel::outcome::{OutcomeMode, OutcomeSource, SessionStatus, SpinOutcome};
use crate::reel::pointer::{PointerResolver, Rect, RenderedCell};

/// The rendering layer the reel is drawn into.
pub trait ReelSurface {
    /// Replaces every rendered cell with `cells`, in order.
    fn render(&self, cells: &[Prize]);
    /// Drops any running transition and puts the strip back at zero.
    fn reset(&self);
    /// Width of one rendered cell including margins, if one is rendered.
    fn cell_width(&self) -> Option<f64>;
    /// Width available to the reel, before framing.
    fn viewport_width(&self) -> f64;
    /// Narrows the visible window to `width`, centered in the available space.
    /// The pointer sits at the middle of this window.
    fn fit_viewport(&self, width: f64);
    /// Starts the stop animation and resolves when it has finished.
    fn animate_to(&self, offset: f64) -> LocalBoxFuture<'_, ()>;
    fn pointer_rect(&self) -> Option<Rect>;
    /// Cell rects including their margins, so neighbours share a border.
    fn rendered_cells(&self) -> Vec<RenderedCell>;
}

/// Outbound channel to whatever application hosts the widget.
pub trait HostChannel {
    fn send_result(&self, prize: &Prize);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinState {
    Idle,
    Requesting,
    Animating,
    Resolving,
    Failed,
}

/// Per-spin state, alive from layout until the spin resolves.
#[derive(Debug, Clone, PartialEq)]
pub struct SpinSession {
    pub outcome: SpinOutcome,
    pub winning_index: usize,
    pub step_index: usize,
    pub offset: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpinReport {
    pub prize: Prize,
    pub won: bool,
    pub attempts_left: u32,
    pub step_index: usize,
    /// Catalog index the pointer was found over, if any.
    pub landed_index: Option<usize>,
    pub mismatch: Option<ReelError>,
}

#[derive(Debug, Clone, Copy)]
pub struct ControllerConfig {
    pub rounds: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            rounds: DEFAULT_ROUNDS,
        }
    }
}

/// Runs spins end to end: Idle → Requesting → Animating → Resolving → Idle,
/// or Requesting → Failed. `Failed` is reported until the next spin starts.
/// One instance per page session.
pub struct SpinController<O, R, H> {
    catalog: PrizeCatalog,
    builder: ReelBuilder,
    source: O,
    surface: R,
    host: H,
    gate: AttemptGate,
    user_id: Cell<Option<i64>>,
    disabled: Cell<bool>,
    alive: Cell<bool>,
    state: Cell<SpinState>,
    session: RefCell<Option<SpinSession>>,
}

impl<O, R, H> SpinController<O, R, H>
where
    O: OutcomeSource,
    R: ReelSurface,
    H: HostChannel,
{
    pub fn new(catalog: PrizeCatalog, source: O, surface: R, host: H, config: ControllerConfig) -> Self {
        Self {
            catalog,
            builder: ReelBuilder::new(config.rounds),
            source,
            surface,
            host,
            gate: AttemptGate::default(),
            user_id: Cell::new(None),
            disabled: Cell::new(false),
            alive: Cell::new(true),
            state: Cell::new(SpinState::Idle),
            session: RefCell::new(None),
        }
    }

    /// Validates the user, announces them and loads the attempt counter.
    /// Any failure here disables spinning for the whole session.
    pub async fn start(&self, user_id: Option<i64>) -> Result<SessionStatus, ReelError> {
        let result = self.open_session(user_id).await;
        if let Err(e) = &result {
            log::error!("session start failed, spinning disabled: {}", e);
            self.disabled.set(true);
        }
        result
    }

    async fn open_session(&self, user_id: Option<i64>) -> Result<SessionStatus, ReelError> {
        let user_id = match user_id {
            Some(id) if id > 0 => id,
            Some(id) => return Err(ReelError::InvalidUser(format!("bad user id {}", id))),
            None => return Err(ReelError::InvalidUser("no user identity".to_string())),
        };
        self.source.announce(user_id).await?;
        let status = self.source.status(user_id).await?;
        self.gate.refresh(status.attempts_left);
        self.user_id.set(Some(user_id));
        log::info!(
            "session open for user {} with {} attempts ({:?} outcomes)",
            user_id,
            status.attempts_left,
            self.source.mode()
        );
        Ok(status)
    }

    /// Reloads attempts and gifts from the outcome source.
    pub async fn refresh_status(&self) -> Result<SessionStatus, ReelError> {
        let user_id = self.active_user()?;
        let status = self.source.status(user_id).await?;
        self.gate.refresh(status.attempts_left);
        Ok(status)
    }

    /// Draws the resting strip shown before any spin.
    pub fn render_idle(&self) {
        let metrics = self.frame();
        let layout = ReelBuilder::idle(&self.catalog, metrics.visible_count());
        self.surface.reset();
        self.surface.render(&layout.sequence);
    }

    pub fn can_spin(&self) -> bool {
        self.alive.get()
            && !self.disabled.get()
            && self.user_id.get().is_some()
            && self.gate.authorize()
    }

    pub async fn spin(&self) -> Result<SpinReport, ReelError> {
        if !self.alive.get() {
            return Err(ReelError::SessionClosed);
        }
        let user_id = self.active_user()?;
        let _guard = self.gate.try_begin()?;

        self.state.set(SpinState::Requesting);
        let outcome = match self.source.spin(user_id).await {
            Ok(outcome) => outcome,
            Err(e) => {
                self.fail(&e);
                return Err(e);
            }
        };
        if !self.alive.get() {
            self.state.set(SpinState::Idle);
            return Err(ReelError::SessionClosed);
        }

        self.state.set(SpinState::Animating);
        let session = match self.lay_out(outcome) {
            Ok(session) => session,
            Err(e) => {
                self.fail(&e);
                return Err(e);
            }
        };
        *self.session.borrow_mut() = Some(session.clone());
        log::debug!(
            "animating to step {} (catalog index {}, offset {}px)",
            session.step_index,
            session.winning_index,
            session.offset
        );
        self.surface.animate_to(session.offset).await;

        if !self.alive.get() {
            self.session.borrow_mut().take();
            self.state.set(SpinState::Idle);
            return Err(ReelError::SessionClosed);
        }

        self.state.set(SpinState::Resolving);
        let report = self.resolve(user_id, &session);
        self.session.borrow_mut().take();
        self.state.set(SpinState::Idle);
        Ok(report)
    }

    /// Marks the page as gone. Callbacks that fire afterwards change nothing.
    pub fn teardown(&self) {
        self.alive.set(false);
    }

    fn active_user(&self) -> Result<i64, ReelError> {
        match (self.disabled.get(), self.user_id.get()) {
            (false, Some(id)) => Ok(id),
            _ => Err(ReelError::InvalidUser("session not started".to_string())),
        }
    }

    fn fail(&self, error: &ReelError) {
        self.state.set(SpinState::Failed);
        log::warn!("spin failed, no attempt consumed: {}", error);
    }

    /// Measures the surface and narrows its window to an odd cell count.
    fn frame(&self) -> CellMetrics {
        let metrics =
            CellMetrics::measure(self.surface.cell_width(), self.surface.viewport_width()).framed();
        self.surface.fit_viewport(metrics.viewport_width);
        metrics
    }

    fn lay_out(&self, outcome: SpinOutcome) -> Result<SpinSession, ReelError> {
        let winning_index = match self.catalog.index_of(&outcome.prize) {
            Ok(index) => index,
            Err(e) => {
                let index = outcome.fallback_index(self.catalog.len());
                log::warn!("{}; landing on catalog index {} instead", e, index);
                index
            }
        };

        let before = self.frame();
        let mut layout = self.render_layout(winning_index, before.visible_count())?;

        // Real cells can differ from the fallback width.
        let mut metrics = self.frame();
        if metrics.visible_count() > before.visible_count() {
            layout = self.render_layout(winning_index, metrics.visible_count())?;
            metrics = self.frame();
        }

        Ok(SpinSession {
            offset: metrics.offset(layout.step_index),
            step_index: layout.step_index,
            winning_index,
            outcome,
        })
    }

    fn render_layout(&self, winning_index: usize, visible_count: usize) -> Result<ReelLayout, ReelError> {
        let layout = self.builder.build(&self.catalog, winning_index, visible_count)?;
        self.surface.reset();
        self.surface.render(&layout.sequence);
        Ok(layout)
    }

    fn resolve(&self, user_id: i64, session: &SpinSession) -> SpinReport {
        let cells = self.surface.rendered_cells();
        let landing = self
            .surface
            .pointer_rect()
            .and_then(|pointer| PointerResolver::new(&self.catalog).resolve(pointer, &cells));

        let mut mismatch = None;
        let prize = match landing {
            None => {
                log::debug!("no cell under the pointer, keeping the computed outcome");
                session.outcome.prize.clone()
            }
            Some(landing) => {
                if landing.catalog_index != session.winning_index {
                    let expected = self
                        .catalog
                        .get(session.winning_index)
                        .map(|p| p.name.clone())
                        .unwrap_or_default();
                    let e = ReelError::GeometryMismatch {
                        expected,
                        landed: landing.prize.name.clone(),
                    };
                    log::warn!("{} (cell {}, step {})", e, landing.cell_index, session.step_index);
                    mismatch = Some(e);
                }
                match self.source.mode() {
                    OutcomeMode::Server => session.outcome.prize.clone(),
                    OutcomeMode::LocalFallback => landing.prize.clone(),
                }
            }
        };

        self.gate.consume();
        self.gate.refresh(session.outcome.attempts_left);

        if let Err(e) = self.source.settle(user_id, &prize) {
            log::error!("failed to record spin result: {}", e);
        }
        if prize.is_win() {
            log::info!("spin won `{}` ({})", prize.name, prize.value);
        } else {
            log::info!("spin landed on an empty slot");
        }
        self.host.send_result(&prize);

        SpinReport {
            won: prize.is_win(),
            attempts_left: self.gate.remaining(),
            step_index: session.step_index,
            landed_index: landing.map(|l| l.catalog_index),
            mismatch,
            prize,
        }
    }

    pub fn catalog(&self) -> &PrizeCatalog {
        &self.catalog
    }

    pub fn gate(&self) -> &AttemptGate {
        &self.gate
    }

    pub fn source(&self) -> &O {
        &self.source
    }

    pub fn surface(&self) -> &R {
        &self.surface
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn state(&self) -> SpinState {
        self.state.get()
    }

    pub fn session(&self) -> Option<SpinSession> {
        self.session.borrow().clone()
    }

    pub fn mode(&self) -> OutcomeMode {
        self.source.mode()
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reel::outcome::{AttemptStore, LocalFallbackOutcomeSource, LocalRecord, MemoryStore};
    use futures::channel::oneshot;
    use futures::executor::{block_on, LocalPool};
    use futures::future;
    use futures::task::LocalSpawnExt;
    use futures::FutureExt;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::rc::Rc;

    const POINTER_WIDTH: f64 = 4.0;

    /// Lays cells out side by side and shifts them by the applied offset,
    /// the way a browser would after the transition. The pointer is centered
    /// in the fitted window, like `.reel-pointer` with `translateX(-50%)`.
    struct FakeSurface {
        cell_width: f64,
        viewport_width: f64,
        fitted_width: Cell<Option<f64>>,
        cells: RefCell<Vec<Prize>>,
        offset: Cell<f64>,
        /// Extra shift the layout applies on top of the offset.
        drift: f64,
        paint: bool,
        hold: RefCell<Option<oneshot::Receiver<()>>>,
    }

    impl FakeSurface {
        fn new(cell_width: f64, viewport_width: f64) -> Self {
            Self {
                cell_width,
                viewport_width,
                fitted_width: Cell::new(None),
                cells: RefCell::new(vec![]),
                offset: Cell::new(0.0),
                drift: 0.0,
                paint: true,
                hold: RefCell::new(None),
            }
        }

        fn unpainted(mut self) -> Self {
            self.paint = false;
            self
        }

        fn drifting(mut self, drift: f64) -> Self {
            self.drift = drift;
            self
        }

        /// Keeps the next animation running until the returned sender fires.
        fn hold_animation(&self) -> oneshot::Sender<()> {
            let (release, hold) = oneshot::channel();
            *self.hold.borrow_mut() = Some(hold);
            release
        }

        fn window(&self) -> f64 {
            self.fitted_width.get().unwrap_or(self.viewport_width)
        }
    }

    impl ReelSurface for FakeSurface {
        fn render(&self, cells: &[Prize]) {
            *self.cells.borrow_mut() = cells.to_vec();
        }

        fn reset(&self) {
            self.offset.set(0.0);
        }

        fn cell_width(&self) -> Option<f64> {
            if self.cells.borrow().is_empty() {
                None
            } else {
                Some(self.cell_width)
            }
        }

        fn viewport_width(&self) -> f64 {
            self.viewport_width
        }

        fn fit_viewport(&self, width: f64) {
            self.fitted_width.set(Some(width));
        }

        fn animate_to(&self, offset: f64) -> LocalBoxFuture<'_, ()> {
            self.offset.set(offset);
            let hold = self.hold.borrow_mut().take();
            async move {
                if let Some(hold) = hold {
                    let _ = hold.await;
                }
            }
            .boxed_local()
        }

        fn pointer_rect(&self) -> Option<Rect> {
            Some(Rect::new(self.window() / 2.0 - POINTER_WIDTH / 2.0, POINTER_WIDTH))
        }

        fn rendered_cells(&self) -> Vec<RenderedCell> {
            if !self.paint {
                return vec![];
            }
            self.cells
                .borrow()
                .iter()
                .enumerate()
                .map(|(i, prize)| RenderedCell {
                    rect: Rect::new(
                        i as f64 * self.cell_width - self.offset.get() + self.drift,
                        self.cell_width,
                    ),
                    label: prize.name.clone(),
                })
                .collect()
        }
    }

    #[derive(Default)]
    struct RecordingHost {
        sent: RefCell<Vec<Prize>>,
    }

    impl HostChannel for RecordingHost {
        fn send_result(&self, prize: &Prize) {
            self.sent.borrow_mut().push(prize.clone());
        }
    }

    struct FakeServer {
        prize: Prize,
        index_hint: Option<usize>,
        attempts: Cell<u32>,
        spins: Cell<u32>,
        fail_with: RefCell<Option<ReelError>>,
        hold: RefCell<Option<oneshot::Receiver<()>>>,
    }

    impl FakeServer {
        fn new(prize: Prize, attempts: u32) -> Self {
            Self {
                prize,
                index_hint: None,
                attempts: Cell::new(attempts),
                spins: Cell::new(0),
                fail_with: RefCell::new(None),
                hold: RefCell::new(None),
            }
        }
    }

    impl OutcomeSource for FakeServer {
        fn mode(&self) -> OutcomeMode {
            OutcomeMode::Server
        }

        fn announce(&self, _user_id: i64) -> LocalBoxFuture<'_, Result<(), ReelError>> {
            future::ready(Ok(())).boxed_local()
        }

        fn status(&self, _user_id: i64) -> LocalBoxFuture<'_, Result<SessionStatus, ReelError>> {
            let status = SessionStatus {
                attempts_left: self.attempts.get(),
                gifts: vec![],
            };
            future::ready(Ok(status)).boxed_local()
        }

        fn spin(&self, _user_id: i64) -> LocalBoxFuture<'_, Result<SpinOutcome, ReelError>> {
            self.spins.set(self.spins.get() + 1);
            if let Some(e) = self.fail_with.borrow().clone() {
                return future::ready(Err(e)).boxed_local();
            }
            self.attempts.set(self.attempts.get().saturating_sub(1));
            let outcome = SpinOutcome {
                prize: self.prize.clone(),
                attempts_left: self.attempts.get(),
                index_hint: self.index_hint,
            };
            let hold = self.hold.borrow_mut().take();
            async move {
                if let Some(hold) = hold {
                    let _ = hold.await;
                }
                Ok(outcome)
            }
            .boxed_local()
        }
    }

    type ServerController = SpinController<FakeServer, FakeSurface, RecordingHost>;

    fn ring() -> Prize {
        Prize::new("Bonded Ring", Some("images/bonded_ring.png"), 37_500)
    }

    fn controller(server: FakeServer, surface: FakeSurface) -> ServerController {
        SpinController::new(
            PrizeCatalog::standard(),
            server,
            surface,
            RecordingHost::default(),
            ControllerConfig::default(),
        )
    }

    #[test]
    fn test_server_spin_lands_on_outcome() {
        let c = controller(FakeServer::new(ring(), 2), FakeSurface::new(100.0, 500.0));
        block_on(c.start(Some(42))).unwrap();
        assert!(c.can_spin());

        let report = block_on(c.spin()).unwrap();
        assert_eq!(report.prize, ring());
        assert!(report.won);
        assert_eq!(report.step_index, 5 * 4 + 1);
        assert_eq!(report.landed_index, Some(1));
        assert_eq!(report.mismatch, None);
        assert_eq!(report.attempts_left, 1);
        assert_eq!(c.gate().remaining(), 1);
        assert_eq!(c.host().sent.borrow().as_slice(), &[ring()]);
        assert_eq!(c.state(), SpinState::Idle);
        assert!(c.session().is_none());

        let rendered = c.surface().cells.borrow();
        assert_eq!(rendered.len(), 21 + 5 + 2);
        assert_eq!(rendered[report.step_index], ring());
    }

    #[test]
    fn test_zero_attempts_never_requests() {
        let c = controller(FakeServer::new(ring(), 0), FakeSurface::new(100.0, 500.0));
        block_on(c.start(Some(42))).unwrap();
        assert!(!c.can_spin());
        assert_eq!(block_on(c.spin()), Err(ReelError::NoAttemptsLeft));
        assert_eq!(c.source().spins.get(), 0);
    }

    #[test]
    fn test_failed_request_consumes_nothing() {
        let server = FakeServer::new(ring(), 2);
        *server.fail_with.borrow_mut() = Some(ReelError::OutcomeFetchFailed("boom".to_string()));
        let c = controller(server, FakeSurface::new(100.0, 500.0));
        block_on(c.start(Some(42))).unwrap();

        assert!(matches!(block_on(c.spin()), Err(ReelError::OutcomeFetchFailed(_))));
        assert_eq!(c.gate().remaining(), 2);
        assert!(!c.gate().in_progress());
        assert_eq!(c.state(), SpinState::Failed);
        assert!(c.host().sent.borrow().is_empty());
        assert!(c.can_spin());

        // The user retries by hand; the next spin leaves `Failed` behind.
        c.source().fail_with.borrow_mut().take();
        assert!(block_on(c.spin()).is_ok());
        assert_eq!(c.state(), SpinState::Idle);
        assert_eq!(c.gate().remaining(), 1);
        assert_eq!(c.source().spins.get(), 2);
    }

    #[test]
    fn test_unknown_prize_uses_hint() {
        let stranger = Prize::new("Golden Duck", None, 500);
        let mut server = FakeServer::new(stranger.clone(), 2);
        server.index_hint = Some(6);
        let c = controller(server, FakeSurface::new(100.0, 500.0));
        block_on(c.start(Some(42))).unwrap();

        let report = block_on(c.spin()).unwrap();
        assert_eq!(report.prize, stranger);
        assert_eq!(report.step_index, 5 * 4 + 2);
        assert_eq!(report.landed_index, Some(2));
        assert_eq!(c.source().spins.get(), 1);
        assert_eq!(c.gate().remaining(), 1);
    }

    #[test]
    fn test_invalid_user_disables_session() {
        let c = controller(FakeServer::new(ring(), 2), FakeSurface::new(100.0, 500.0));
        assert!(matches!(block_on(c.start(Some(0))), Err(ReelError::InvalidUser(_))));
        assert!(c.is_disabled());
        assert!(!c.can_spin());
        assert!(matches!(block_on(c.spin()), Err(ReelError::InvalidUser(_))));

        let c = controller(FakeServer::new(ring(), 2), FakeSurface::new(100.0, 500.0));
        assert!(block_on(c.start(None)).unwrap_err().disables_session());
    }

    #[test]
    fn test_even_viewport_is_framed_to_odd_cells() {
        for (cell, viewport) in [(100.0, 400.0), (100.0, 600.0), (100.0, 800.0), (87.5, 390.0)] {
            let c = controller(FakeServer::new(ring(), 2), FakeSurface::new(cell, viewport));
            block_on(c.start(Some(42))).unwrap();

            let report = block_on(c.spin()).unwrap();
            assert_eq!(report.landed_index, Some(1), "viewport {}", viewport);
            assert_eq!(report.mismatch, None, "viewport {}", viewport);

            // The step cell's middle sits exactly under the pointer's middle.
            let window = c.surface().window();
            let cell_left = report.step_index as f64 * cell - c.surface().offset.get();
            assert_eq!(cell_left + cell / 2.0, window / 2.0, "viewport {}", viewport);
            assert!(window <= viewport);
            assert_eq!((window / cell) as usize % 2, 1);
        }
    }

    #[test]
    fn test_server_mode_keeps_outcome_on_mismatch() {
        // Layout pushed one cell to the right, so the pointer reads the cell
        // before the step cell.
        let c = controller(
            FakeServer::new(ring(), 2),
            FakeSurface::new(100.0, 500.0).drifting(100.0),
        );
        block_on(c.start(Some(42))).unwrap();

        let report = block_on(c.spin()).unwrap();
        assert_eq!(report.prize, ring());
        assert_eq!(report.landed_index, Some(0));
        assert!(matches!(report.mismatch, Some(ReelError::GeometryMismatch { .. })));
    }

    #[test]
    fn test_unpainted_surface_keeps_outcome() {
        let c = controller(
            FakeServer::new(ring(), 2),
            FakeSurface::new(100.0, 500.0).unpainted(),
        );
        block_on(c.start(Some(42))).unwrap();
        let report = block_on(c.spin()).unwrap();
        assert_eq!(report.prize, ring());
        assert_eq!(report.landed_index, None);
        assert_eq!(report.mismatch, None);
    }

    type LocalController =
        SpinController<LocalFallbackOutcomeSource<MemoryStore>, FakeSurface, RecordingHost>;

    fn local_controller(surface: FakeSurface) -> LocalController {
        SpinController::new(
            PrizeCatalog::standard(),
            LocalFallbackOutcomeSource::with_rng(
                PrizeCatalog::standard(),
                MemoryStore::new(LocalRecord::default()),
                2,
                StdRng::seed_from_u64(3),
            ),
            surface,
            RecordingHost::default(),
            ControllerConfig::default(),
        )
    }

    #[test]
    fn test_local_mode_lands_on_drawn_prize() {
        let c = local_controller(FakeSurface::new(100.0, 400.0));
        block_on(c.start(Some(1))).unwrap();
        let report = block_on(c.spin()).unwrap();

        assert_eq!(report.mismatch, None);
        let landed = report.landed_index.unwrap();
        assert_eq!(&report.prize, c.catalog().get(landed).unwrap());
        assert_eq!(c.source().store().load().attempts_used, 1);
    }

    #[test]
    fn test_local_mode_trusts_landed_cell() {
        let c = local_controller(FakeSurface::new(100.0, 500.0).drifting(100.0));
        block_on(c.start(Some(1))).unwrap();
        let report = block_on(c.spin()).unwrap();

        let landed = report.landed_index.unwrap();
        assert_eq!(&report.prize, c.catalog().get(landed).unwrap());
        assert!(report.mismatch.is_some());
        assert_eq!(c.host().sent.borrow().as_slice(), &[report.prize.clone()]);
        assert_eq!(c.gate().remaining(), 1);

        let stored = c.source().store().load();
        assert_eq!(stored.attempts_used, 1);
        let expected_gifts = usize::from(report.prize.is_win());
        assert_eq!(stored.gifts.len(), expected_gifts);
    }

    #[test]
    fn test_second_click_during_spin_is_rejected() {
        let (release, hold) = oneshot::channel();
        let server = FakeServer::new(ring(), 2);
        *server.hold.borrow_mut() = Some(hold);
        let c = Rc::new(controller(server, FakeSurface::new(100.0, 500.0)));
        block_on(c.start(Some(42))).unwrap();

        let mut pool = LocalPool::new();
        let result = Rc::new(RefCell::new(None));
        {
            let c = c.clone();
            let result = result.clone();
            pool.spawner()
                .spawn_local(async move {
                    *result.borrow_mut() = Some(c.spin().await);
                })
                .unwrap();
        }
        pool.run_until_stalled();

        assert_eq!(c.state(), SpinState::Requesting);
        assert!(!c.gate().authorize());
        assert!(!c.can_spin());
        assert_eq!(block_on(c.spin()), Err(ReelError::SpinInProgress));

        release.send(()).unwrap();
        pool.run();

        assert!(result.borrow_mut().take().unwrap().is_ok());
        assert_eq!(c.source().spins.get(), 1);
        assert_eq!(c.gate().remaining(), 1);
        assert_eq!(c.host().sent.borrow().len(), 1);
    }

    #[test]
    fn test_second_click_during_animation_is_rejected() {
        let c = Rc::new(controller(FakeServer::new(ring(), 2), FakeSurface::new(100.0, 500.0)));
        block_on(c.start(Some(42))).unwrap();
        let release = c.surface().hold_animation();

        let mut pool = LocalPool::new();
        let result = Rc::new(RefCell::new(None));
        {
            let c = c.clone();
            let result = result.clone();
            pool.spawner()
                .spawn_local(async move {
                    *result.borrow_mut() = Some(c.spin().await);
                })
                .unwrap();
        }
        pool.run_until_stalled();

        assert_eq!(c.state(), SpinState::Animating);
        assert!(c.session().is_some());
        assert!(!c.gate().authorize());
        assert!(!c.can_spin());
        assert_eq!(block_on(c.spin()), Err(ReelError::SpinInProgress));
        assert_eq!(c.gate().remaining(), 2);

        release.send(()).unwrap();
        pool.run();

        assert!(result.borrow_mut().take().unwrap().is_ok());
        assert_eq!(c.source().spins.get(), 1);
        assert_eq!(c.gate().remaining(), 1);
        assert_eq!(c.host().sent.borrow().len(), 1);
        assert!(c.gate().authorize());
    }

    #[test]
    fn test_local_teardown_mid_animation_keeps_attempt() {
        let c = Rc::new(local_controller(FakeSurface::new(100.0, 500.0)));
        block_on(c.start(Some(1))).unwrap();
        let release = c.surface().hold_animation();

        let mut pool = LocalPool::new();
        let result = Rc::new(RefCell::new(None));
        {
            let c = c.clone();
            let result = result.clone();
            pool.spawner()
                .spawn_local(async move {
                    *result.borrow_mut() = Some(c.spin().await);
                })
                .unwrap();
        }
        pool.run_until_stalled();
        assert_eq!(c.state(), SpinState::Animating);

        c.teardown();
        release.send(()).unwrap();
        pool.run();

        assert_eq!(result.borrow_mut().take(), Some(Err(ReelError::SessionClosed)));
        let stored = c.source().store().load();
        assert_eq!(stored.attempts_used, 0);
        assert!(stored.gifts.is_empty());
        assert_eq!(block_on(c.source().status(1)).unwrap().attempts_left, 2);
        assert!(c.host().sent.borrow().is_empty());
    }

    #[test]
    fn test_teardown_abandons_spin() {
        let (release, hold) = oneshot::channel();
        let server = FakeServer::new(ring(), 2);
        *server.hold.borrow_mut() = Some(hold);
        let c = Rc::new(controller(server, FakeSurface::new(100.0, 500.0)));
        block_on(c.start(Some(42))).unwrap();

        let mut pool = LocalPool::new();
        let result = Rc::new(RefCell::new(None));
        {
            let c = c.clone();
            let result = result.clone();
            pool.spawner()
                .spawn_local(async move {
                    *result.borrow_mut() = Some(c.spin().await);
                })
                .unwrap();
        }
        pool.run_until_stalled();
        c.teardown();
        release.send(()).unwrap();
        pool.run();

        assert_eq!(result.borrow_mut().take(), Some(Err(ReelError::SessionClosed)));
        assert_eq!(c.gate().remaining(), 2);
        assert!(!c.gate().in_progress());
        assert!(c.host().sent.borrow().is_empty());
    }

    #[test]
    fn test_render_idle() {
        let c = controller(FakeServer::new(ring(), 2), FakeSurface::new(100.0, 500.0));
        c.render_idle();
        // Nothing rendered yet, so the fallback width (100) gives 5 visible cells.
        assert_eq!(c.surface().cells.borrow().len(), 3 * 4 + 5 + 2);
    }
}
