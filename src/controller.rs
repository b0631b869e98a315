//! Ownership of the single active macro run.
//!
//! The controller is the only state shared between the control surfaces
//! (UI, hotkey workers) and the engine thread. Every start/stop/toggle
//! decision is taken while holding its lock, so two callers can never both
//! conclude that no run is active.

use crate::backend::ActionBackend;
use crate::config::EngineConfig;
use crate::engine::{Engine, RunOutcome};
use crate::error::{ControllerError, NodeFault};
use crate::graph::GraphDocument;
use crate::observer::RunObserver;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{info, warn};

/// How often [`RunController::wait`] re-checks the worker.
const WAIT_POLL: Duration = Duration::from_millis(5);

/// What a start or toggle request did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlAction {
    Started,
    Stopped,
    /// Another run is active; nothing was started or interrupted.
    Refused { active_start_node: String },
}

struct ActiveRun {
    document: Arc<GraphDocument>,
    running: Arc<AtomicBool>,
    handle: JoinHandle<Result<RunOutcome, NodeFault>>,
}

impl ActiveRun {
    fn start_node_id(&self) -> &str {
        self.document.start_node_id()
    }

    /// The same document rooted at the same start node.
    fn runs(&self, document: &GraphDocument) -> bool {
        self.document.same_document(document)
            && self.document.start_node_id() == document.start_node_id()
    }

    fn is_alive(&self) -> bool {
        !self.handle.is_finished()
    }
}

/// Starts, stops and toggles macro runs, guaranteeing that at most one run
/// is active at any time.
pub struct RunController {
    backend: Arc<dyn ActionBackend>,
    observer: Arc<dyn RunObserver>,
    config: EngineConfig,
    active: Mutex<Option<ActiveRun>>,
}

impl RunController {
    pub fn new(
        backend: Arc<dyn ActionBackend>,
        observer: Arc<dyn RunObserver>,
        config: EngineConfig,
    ) -> Self {
        Self {
            backend,
            observer,
            config,
            active: Mutex::new(None),
        }
    }

    /// Starts `document` on a dedicated worker unless any run is active.
    pub fn start(&self, document: Arc<GraphDocument>) -> Result<ControlAction, ControllerError> {
        let mut active = self.lock();
        if let Some(run) = active.as_ref().filter(|run| run.is_alive()) {
            warn!(
                requested = %document.start_node_id(),
                active = %run.start_node_id(),
                "a macro is already running"
            );
            return Ok(ControlAction::Refused {
                active_start_node: run.start_node_id().to_string(),
            });
        }
        self.launch(&mut active, document)
    }

    /// Starts `document` when idle, stops it when it is the active run, and
    /// refuses when a different run is active. Documents built separately
    /// are different even if their start node ids match.
    pub fn toggle(&self, document: Arc<GraphDocument>) -> Result<ControlAction, ControllerError> {
        let mut active = self.lock();
        match active.as_ref().filter(|run| run.is_alive()) {
            Some(run) if run.runs(&document) => {
                run.running.store(false, Ordering::SeqCst);
                info!(start_node = %run.start_node_id(), "macro toggled off");
                Ok(ControlAction::Stopped)
            }
            Some(run) => {
                warn!(
                    requested = %document.start_node_id(),
                    active = %run.start_node_id(),
                    "refusing toggle while another macro is running"
                );
                Ok(ControlAction::Refused {
                    active_start_node: run.start_node_id().to_string(),
                })
            }
            None => self.launch(&mut active, document),
        }
    }

    /// Requests cancellation of the active run, if any. Returns whether a
    /// run was signalled.
    pub fn stop(&self) -> bool {
        let active = self.lock();
        match active.as_ref().filter(|run| run.is_alive()) {
            Some(run) => {
                run.running.store(false, Ordering::SeqCst);
                info!(start_node = %run.start_node_id(), "macro stop requested");
                true
            }
            None => false,
        }
    }

    /// Stops whichever run is active, unconditionally.
    pub fn emergency_stop(&self) {
        if self.stop() {
            warn!("emergency stop activated");
        }
    }

    pub fn is_running(&self) -> bool {
        self.lock().as_ref().is_some_and(ActiveRun::is_alive)
    }

    /// Start node id of the active run.
    pub fn active_start_node(&self) -> Option<String> {
        self.lock()
            .as_ref()
            .filter(|run| run.is_alive())
            .map(|run| run.start_node_id().to_string())
    }

    /// Blocks until the most recent run terminates and returns its outcome.
    /// `Ok(None)` means no run had been started since the last wait.
    pub fn wait(&self) -> Result<Option<RunOutcome>, ControllerError> {
        loop {
            {
                let mut active = self.lock();
                let finished = match active.as_ref() {
                    None => return Ok(None),
                    Some(run) => !run.is_alive(),
                };
                if finished {
                    if let Some(run) = active.take() {
                        return Self::join(run).map(Some);
                    }
                }
            }
            thread::sleep(WAIT_POLL);
        }
    }

    fn launch(
        &self,
        active: &mut MutexGuard<'_, Option<ActiveRun>>,
        document: Arc<GraphDocument>,
    ) -> Result<ControlAction, ControllerError> {
        if let Some(previous) = active.take() {
            // Already finished; collect its result so it is not lost silently.
            if let Err(e) = Self::join(previous) {
                warn!(error = %e, "previous macro run ended with an error");
            }
        }

        let running = Arc::new(AtomicBool::new(true));
        let backend = Arc::clone(&self.backend);
        let observer = Arc::clone(&self.observer);
        let config = self.config.clone();
        let flag = Arc::clone(&running);
        let worker_document = Arc::clone(&document);

        let handle = thread::Builder::new()
            .name(format!("macro-{}", document.start_node_id()))
            .spawn(move || {
                let document = worker_document;
                Engine::new(&document, backend.as_ref(), observer.as_ref(), &config, flag).run()
            })?;

        info!(start_node = %document.start_node_id(), "macro started");
        **active = Some(ActiveRun {
            document,
            running,
            handle,
        });
        Ok(ControlAction::Started)
    }

    fn join(run: ActiveRun) -> Result<RunOutcome, ControllerError> {
        match run.handle.join() {
            Ok(result) => result.map_err(ControllerError::from),
            Err(_) => Err(ControllerError::WorkerPanicked),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<ActiveRun>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
