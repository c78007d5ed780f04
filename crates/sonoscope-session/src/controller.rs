//! Interactive session controller.
//!
//! Owns the current [`SessionParameters`], recomputes the three views on a
//! dedicated worker thread, debounces rapid updates, and publishes results
//! lock-free via `ArcSwap`. Logical recomputation is serialized here; a
//! single computation parallelizes internally over frames and segments.

use crate::error::{Result, SessionError};
use crate::params::SessionParameters;
use crate::views::{compute_views, AnalysisViews};
use arc_swap::ArcSwapOption;
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender, TryRecvError};
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Quiet period after a parameter change before computation starts, so a
/// burst of slider events collapses into one snapshot.
pub const DEBOUNCE: Duration = Duration::from_millis(25);

/// Number of computed view sets kept for parameter tuples seen before.
const CACHE_CAPACITY: usize = 32;

/// Controller state: at most one computation is ever in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Computing,
}

/// What the controller should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    /// Begin computing from a fresh snapshot.
    StartCompute,
    /// A computation is already running; the change is coalesced.
    Defer,
    /// The finished result is superseded; recompute from the latest snapshot.
    Recompute,
    /// Publish the finished result and return to idle.
    Publish,
}

/// The `Idle -> Computing -> Idle` cycle with a stale flag.
///
/// A parameter change while computing marks the in-flight result stale
/// instead of restarting; on completion a stale result is dropped and the
/// newest snapshot is computed instead. Intermediate parameter sets are never
/// computed.
#[derive(Debug, Default)]
pub struct SessionFsm {
    state: SessionState,
    stale: bool,
}

impl SessionFsm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// A parameter mutation arrived.
    pub fn on_params_changed(&mut self) -> SessionAction {
        match self.state {
            SessionState::Idle => {
                self.state = SessionState::Computing;
                SessionAction::StartCompute
            }
            SessionState::Computing => {
                self.stale = true;
                SessionAction::Defer
            }
        }
    }

    /// The in-flight computation finished.
    pub fn on_compute_done(&mut self) -> SessionAction {
        debug_assert_eq!(self.state, SessionState::Computing);
        if self.stale {
            self.stale = false;
            SessionAction::Recompute
        } else {
            self.state = SessionState::Idle;
            SessionAction::Publish
        }
    }
}

enum SessionCommand {
    Update(SessionParameters),
    Shutdown,
}

/// Handle to a running analysis session.
///
/// Mutations go through [`mutate`](Self::mutate); the latest published views
/// are readable from any thread without blocking the worker.
pub struct SessionController {
    tx: Sender<SessionCommand>,
    params: Mutex<SessionParameters>,
    views: Arc<ArcSwapOption<AnalysisViews>>,
    last_error: Arc<Mutex<Option<SessionError>>>,
    notify_rx: Receiver<u64>,
    worker: Option<JoinHandle<()>>,
}

impl SessionController {
    /// Spawn the worker and schedule an initial computation of `params`.
    pub fn new(params: SessionParameters) -> Self {
        let (tx, rx) = unbounded();
        let (notify_tx, notify_rx) = unbounded();
        let views: Arc<ArcSwapOption<AnalysisViews>> = Arc::new(ArcSwapOption::empty());
        let last_error: Arc<Mutex<Option<SessionError>>> = Arc::new(Mutex::new(None));

        let worker = {
            let views = views.clone();
            let last_error = last_error.clone();
            std::thread::spawn(move || worker_loop(rx, views, last_error, notify_tx))
        };

        // Initial views appear without an explicit first mutation.
        let _ = tx.send(SessionCommand::Update(params.clone()));

        Self {
            tx,
            params: Mutex::new(params),
            views,
            last_error,
            notify_rx,
            worker: Some(worker),
        }
    }

    /// Apply a mutation to the parameter set and schedule recomputation.
    ///
    /// The closure sees the current parameters; if it fails, nothing is
    /// scheduled and the parameters are left as the closure left them valid
    /// (individual setters never leave a partial state).
    pub fn mutate<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut SessionParameters) -> Result<()>,
    {
        let snapshot = {
            let mut params = self.params.lock();
            f(&mut params)?;
            params.clone()
        };
        self.tx
            .send(SessionCommand::Update(snapshot))
            .map_err(|_| SessionError::Disconnected)
    }

    /// Copy of the current parameter set.
    pub fn params(&self) -> SessionParameters {
        self.params.lock().clone()
    }

    /// Latest published views, if any computation has completed yet.
    ///
    /// A failed computation never clears this; the last good result stays
    /// visible.
    pub fn current_views(&self) -> Option<Arc<AnalysisViews>> {
        self.views.load_full()
    }

    /// Error from the most recent computation, if it failed.
    pub fn last_error(&self) -> Option<SessionError> {
        self.last_error.lock().clone()
    }

    /// Block until the next publication (returns its parameter key), or
    /// `None` on timeout.
    pub fn wait_for_update(&self, timeout: Duration) -> Option<u64> {
        self.notify_rx.recv_timeout(timeout).ok()
    }

    /// Stop the worker and wait for it to finish.
    pub fn shutdown(mut self) {
        self.shutdown_inner();
    }

    fn shutdown_inner(&mut self) {
        let _ = self.tx.send(SessionCommand::Shutdown);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.shutdown_inner();
    }
}

fn worker_loop(
    rx: Receiver<SessionCommand>,
    views: Arc<ArcSwapOption<AnalysisViews>>,
    last_error: Arc<Mutex<Option<SessionError>>>,
    notify_tx: Sender<u64>,
) {
    let mut fsm = SessionFsm::new();
    let mut cache: LruCache<u64, Arc<AnalysisViews>> = LruCache::new(
        NonZeroUsize::new(CACHE_CAPACITY).expect("BUG: cache capacity is non-zero"),
    );

    'outer: loop {
        let mut latest = match rx.recv() {
            Ok(SessionCommand::Update(params)) => params,
            Ok(SessionCommand::Shutdown) | Err(_) => break,
        };

        // Debounce: keep draining until the channel stays quiet, so a burst
        // of slider events becomes one snapshot.
        loop {
            match rx.recv_timeout(DEBOUNCE) {
                Ok(SessionCommand::Update(params)) => latest = params,
                Ok(SessionCommand::Shutdown) => break 'outer,
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        fsm.on_params_changed();

        loop {
            let key = latest.cache_key();
            let result = match cache.get(&key) {
                Some(hit) => {
                    log::debug!("session: cache hit for {key:016x}");
                    Ok(hit.clone())
                }
                None => {
                    log::debug!("session: computing views for {key:016x}");
                    let computed = compute_views(&latest).map(Arc::new);
                    if let Ok(views) = &computed {
                        cache.put(key, views.clone());
                    }
                    computed
                }
            };

            // Changes that landed while computing mark the result stale.
            loop {
                match rx.try_recv() {
                    Ok(SessionCommand::Update(params)) => {
                        latest = params;
                        fsm.on_params_changed();
                    }
                    Ok(SessionCommand::Shutdown) => break 'outer,
                    Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
                }
            }

            match fsm.on_compute_done() {
                SessionAction::Recompute => {
                    log::debug!("session: result superseded, recomputing");
                    continue;
                }
                _ => {
                    match result {
                        Ok(computed) => {
                            views.store(Some(computed));
                            *last_error.lock() = None;
                            let _ = notify_tx.send(key);
                        }
                        Err(e) => {
                            // Last good views stay visible.
                            log::warn!("session: analysis failed: {e}");
                            *last_error.lock() = Some(e);
                        }
                    }
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sonoscope_core::SampleBuffer;

    fn sine_params(len: usize) -> SessionParameters {
        let samples: Vec<f32> = (0..len)
            .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 44_100.0).sin())
            .collect();
        SessionParameters::new(Arc::new(SampleBuffer::from_mono(44_100, samples).unwrap()))
    }

    #[test]
    fn test_fsm_idle_change_starts_compute() {
        let mut fsm = SessionFsm::new();
        assert_eq!(fsm.on_params_changed(), SessionAction::StartCompute);
        assert_eq!(fsm.state(), SessionState::Computing);
        assert!(!fsm.is_stale());
    }

    #[test]
    fn test_fsm_change_while_computing_defers() {
        let mut fsm = SessionFsm::new();
        fsm.on_params_changed();
        assert_eq!(fsm.on_params_changed(), SessionAction::Defer);
        assert_eq!(fsm.on_params_changed(), SessionAction::Defer);
        assert!(fsm.is_stale());
        // Still only one computation in flight.
        assert_eq!(fsm.state(), SessionState::Computing);
    }

    #[test]
    fn test_fsm_stale_result_is_recomputed_not_published() {
        let mut fsm = SessionFsm::new();
        fsm.on_params_changed();
        fsm.on_params_changed();
        assert_eq!(fsm.on_compute_done(), SessionAction::Recompute);
        assert_eq!(fsm.state(), SessionState::Computing);
        // Second completion with no further changes publishes.
        assert_eq!(fsm.on_compute_done(), SessionAction::Publish);
        assert_eq!(fsm.state(), SessionState::Idle);
    }

    #[test]
    fn test_initial_views_published() {
        let controller = SessionController::new(sine_params(8192));
        let key = controller
            .wait_for_update(Duration::from_secs(5))
            .expect("initial computation should publish");

        let views = controller.current_views().expect("views published");
        assert_eq!(views.params_key, key);
        assert!(controller.last_error().is_none());
    }

    #[test]
    fn test_rapid_updates_coalesce_to_one_publication() {
        let controller = SessionController::new(sine_params(8192));
        // Swallow the initial publication.
        controller.wait_for_update(Duration::from_secs(5)).unwrap();

        // Simulated slider drag: 10 mutations well inside the debounce
        // window. Exactly one publication, from the final set only.
        for length in [128usize, 256, 512, 1024, 2048, 128, 256, 512, 1024, 4096] {
            controller
                .mutate(|p| p.set_window_length(length))
                .unwrap();
        }
        let final_key = controller.params().cache_key();

        let published = controller
            .wait_for_update(Duration::from_secs(5))
            .expect("burst should publish once");
        assert_eq!(published, final_key);
        assert_eq!(controller.current_views().unwrap().params_key, final_key);
        assert_eq!(
            controller.current_views().unwrap().spectrogram.freq_bins.len(),
            4096 / 2 + 1
        );

        // No further publications from the burst.
        assert!(controller.wait_for_update(Duration::from_millis(300)).is_none());
    }

    #[test]
    fn test_failed_computation_keeps_last_good_views() {
        let controller = SessionController::new(sine_params(8192));
        controller.wait_for_update(Duration::from_secs(5)).unwrap();
        let good = controller.current_views().unwrap();

        // An empty buffer makes the periodogram fail downstream of the
        // parameter validation.
        let empty = Arc::new(SampleBuffer::from_mono(44_100, vec![]).unwrap());
        controller
            .mutate(|p| {
                p.set_buffer(empty.clone());
                Ok(())
            })
            .unwrap();

        // No publication; the error is reportable and the old views remain.
        assert!(controller.wait_for_update(Duration::from_secs(2)).is_none());
        assert!(controller.last_error().is_some());
        assert_eq!(controller.current_views().unwrap(), good);
    }

    #[test]
    fn test_repeated_tuple_served_from_cache() {
        let controller = SessionController::new(sine_params(8192));
        controller.wait_for_update(Duration::from_secs(5)).unwrap();
        let original_key = controller.params().cache_key();

        controller.mutate(|p| p.set_window_length(2048)).unwrap();
        controller.wait_for_update(Duration::from_secs(5)).unwrap();

        // Slider returns to the previous value: same key is published again.
        controller.mutate(|p| p.set_window_length(1024)).unwrap();
        let republished = controller.wait_for_update(Duration::from_secs(5)).unwrap();
        assert_eq!(republished, original_key);
    }

    #[test]
    fn test_shutdown_joins_worker() {
        let controller = SessionController::new(sine_params(1024));
        controller.wait_for_update(Duration::from_secs(5)).unwrap();
        controller.shutdown();
    }
}
