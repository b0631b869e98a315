use crate::backend::ActionBackend;
use crate::config::EngineConfig;
use crate::error::{ActionError, NodeFault};
use crate::evaluator::{DataEvaluator, DynamicOutputs};
use crate::graph::{GraphDocument, Node};
use crate::observer::RunObserver;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, error, info};

mod handlers;

/// How a run ended, when it did not fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The exec path ran out of connected pins.
    Completed,
    /// Cancellation was observed before the path finished.
    Stopped,
}

/// Per-run mutable state, owned by exactly one [`Engine`].
#[derive(Debug)]
pub struct RunState {
    running: Arc<AtomicBool>,
    dynamic_outputs: DynamicOutputs,
}

impl RunState {
    pub fn new(running: Arc<AtomicBool>) -> Self {
        Self {
            running,
            dynamic_outputs: DynamicOutputs::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn dynamic_outputs(&self) -> &DynamicOutputs {
        &self.dynamic_outputs
    }
}

/// Walks the exec edges of a [`GraphDocument`], dispatching each node to its
/// handler.
///
/// Cancellation is cooperative: the shared `running` flag is checked before
/// every node, before every loop iteration and between every sleep
/// increment. An action already in flight always finishes.
pub struct Engine<'a> {
    document: &'a GraphDocument,
    backend: &'a dyn ActionBackend,
    observer: &'a dyn RunObserver,
    config: &'a EngineConfig,
    state: RunState,
    nodes_executed: usize,
}

impl<'a> Engine<'a> {
    pub fn new(
        document: &'a GraphDocument,
        backend: &'a dyn ActionBackend,
        observer: &'a dyn RunObserver,
        config: &'a EngineConfig,
        running: Arc<AtomicBool>,
    ) -> Self {
        Self {
            document,
            backend,
            observer,
            config,
            state: RunState::new(running),
            nodes_executed: 0,
        }
    }

    /// Runs the document from its start node until the path ends, the run is
    /// cancelled or a node faults.
    ///
    /// The run proceeds only while `running` is set, so callers raise the
    /// flag before handing it over; it is cleared on return.
    pub fn run(mut self) -> Result<RunOutcome, NodeFault> {
        let document = self.document;
        let start_node_id = document.start_node_id();
        info!(start_node = %start_node_id, "starting macro run");
        self.observer.on_highlights_cleared();

        let result = self.run_from_start();

        self.observer.on_highlights_cleared();
        let outcome = match result {
            Ok(()) if self.state.is_running() => Ok(RunOutcome::Completed),
            Ok(()) => Ok(RunOutcome::Stopped),
            Err(fault) => {
                error!(error = %fault, "macro run faulted");
                Err(fault)
            }
        };
        self.state.running.store(false, Ordering::SeqCst);

        info!(
            start_node = %start_node_id,
            nodes_executed = self.nodes_executed,
            outcome = ?outcome,
            "macro run finished"
        );
        outcome
    }

    fn run_from_start(&mut self) -> Result<(), NodeFault> {
        let document = self.document;
        let Some(start) = document.node(document.start_node_id()) else {
            return Ok(());
        };
        let repeat = self.evaluator().boolean(start, "Loop Continuously", false);

        loop {
            self.walk(&start.id)?;
            if !repeat || !self.state.is_running() {
                return Ok(());
            }
            debug!(start_node = %start.id, "repeating continuous macro");
            self.wait(start, self.config.repeat_pause())?;
        }
    }

    /// Executes the exec path beginning at `from` until it ends or the run is
    /// cancelled. Loop bodies re-enter here for their sub-paths.
    fn walk(&mut self, from: &str) -> Result<(), NodeFault> {
        let document = self.document;
        let mut current = Some(from);

        while let Some(node_id) = current {
            if !self.state.is_running() {
                break;
            }
            let Some(node) = document.node(node_id) else {
                break;
            };

            self.observer.on_node_entered(&node.id);
            debug!(node_id = %node.id, node_type = %node.kind, "executing node");
            self.nodes_executed += 1;

            let fired = self.execute_node(node)?;

            if !self.state.is_running() {
                break;
            }
            current = fired.and_then(|pin| document.next_exec(&node.id, pin));
        }
        Ok(())
    }

    fn evaluator(&self) -> DataEvaluator<'_> {
        DataEvaluator::new(self.document, &self.state.dynamic_outputs)
    }

    /// Blocks for `duration` in polling increments, returning early once the
    /// run is cancelled.
    fn wait(&self, node: &Node, duration: Duration) -> Result<(), NodeFault> {
        let increment = self.config.poll_interval();
        let mut remaining = duration;
        while !remaining.is_zero() && self.state.is_running() {
            let slice = remaining.min(increment);
            self.backend
                .sleep(slice.as_secs_f64())
                .map_err(|source| fault(node, source))?;
            remaining = remaining.saturating_sub(slice);
        }
        Ok(())
    }
}

fn fault(node: &Node, source: ActionError) -> NodeFault {
    NodeFault {
        node_id: node.id.clone(),
        node_type: node.kind.type_name().to_string(),
        source,
    }
}

/// Converts a wait in seconds into a `Duration`. Negative or non-finite
/// input waits for nothing.
pub(crate) fn seconds_to_duration(seconds: f64) -> Duration {
    if seconds.is_finite() && seconds > 0.0 {
        Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX)
    } else {
        Duration::ZERO
    }
}

/// Converts a duration in `unit` to seconds. Unknown units count as seconds.
pub(crate) fn to_seconds(amount: f64, unit: &str) -> f64 {
    match unit {
        "milliseconds" | "millisecond" | "ms" => amount / 1000.0,
        "minutes" | "minute" | "min" => amount * 60.0,
        _ => amount,
    }
}
