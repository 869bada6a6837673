//! Work-stealing depth-first executor.
//!
//! Every worker owns a LIFO deque of [`SearchNode`]s: it pushes the children
//! of the node it expands and pops the most recent one, which keeps its own
//! walk depth-first. Idle workers steal from the cold end of a peer's deque,
//! i.e. the shallowest pending node and with it the largest subtree.
//!
//! Termination uses a single in-flight counter: a child is counted before
//! it is pushed and its parent is uncounted only after it has been fully
//! expanded, so the counter reaches zero exactly when no node is pending.

use super::engine::{expand_node, SearchNode};
use crate::gap::collector::BatchFilteringCollector;
use crate::gap::dataset::Dataset;
use crate::gap::error::{MineError, Result};
use crossbeam_deque::{Steal, Stealer, Worker};
use crossbeam_utils::Backoff;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutorStats {
    pub workers: usize,
    pub nodes_expanded: usize,
    pub steals: usize,
}

pub struct DepthFirstExecutor {
    workers: usize,
}

/// State shared by all workers of one run.
struct Shared<D> {
    stealers: Vec<Stealer<SearchNode<D>>>,
    in_flight: AtomicUsize,
    failed: AtomicBool,
    error: Mutex<Option<MineError>>,
    nodes_expanded: AtomicUsize,
    steals: AtomicUsize,
}

impl<D> Shared<D> {
    fn fail(&self, error: MineError) {
        self.error.lock().get_or_insert(error);
        self.failed.store(true, Ordering::Release);
    }

    fn steal(&self, thief: usize) -> Option<SearchNode<D>> {
        let n = self.stealers.len();
        for offset in 1..n {
            let victim = (thief + offset) % n;
            loop {
                match self.stealers[victim].steal() {
                    Steal::Success(node) => {
                        self.steals.fetch_add(1, Ordering::Relaxed);
                        trace!(thief, victim, "stole search node");
                        return Some(node);
                    }
                    Steal::Empty => break,
                    Steal::Retry => continue,
                }
            }
        }
        None
    }
}

/// Marks the run as failed if its worker unwinds.
struct PanicGuard<'a, D> {
    shared: &'a Shared<D>,
    worker: usize,
}

impl<D> Drop for PanicGuard<'_, D> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.shared.fail(MineError::WorkerPanicked { worker: self.worker });
        }
    }
}

impl DepthFirstExecutor {
    pub fn new(workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(MineError::InvalidConfig("worker count must be at least 1".to_string()));
        }
        Ok(Self { workers })
    }

    /// Explores the whole search tree below `root`, reporting emerging
    /// patterns to `collector`. Returns once every worker has stopped.
    pub fn mine<D: Dataset>(
        &self,
        root: SearchNode<D>,
        collector: Arc<BatchFilteringCollector>,
    ) -> Result<ExecutorStats> {
        let locals: Vec<Worker<SearchNode<D>>> =
            (0..self.workers).map(|_| Worker::new_lifo()).collect();
        let shared = Shared {
            stealers: locals.iter().map(Worker::stealer).collect(),
            in_flight: AtomicUsize::new(1),
            failed: AtomicBool::new(false),
            error: Mutex::new(None),
            nodes_expanded: AtomicUsize::new(0),
            steals: AtomicUsize::new(0),
        };
        locals[0].push(root);

        info!(workers = self.workers, "starting depth-first mining");

        thread::scope(|scope| {
            let mut handles = Vec::with_capacity(self.workers);
            for (id, local) in locals.into_iter().enumerate() {
                let shared = &shared;
                let collector = Arc::clone(&collector);
                let spawned = thread::Builder::new()
                    .name(format!("gapminer-worker-{id}"))
                    .spawn_scoped(scope, move || worker_loop(id, local, shared, &collector));
                match spawned {
                    Ok(handle) => handles.push(handle),
                    Err(err) => {
                        shared.fail(MineError::WorkerSpawn(err));
                        break;
                    }
                }
            }
            for handle in handles {
                // a panicking worker has already recorded itself through its guard
                let _ = handle.join();
            }
        });

        if let Some(error) = shared.error.into_inner() {
            return Err(error);
        }

        let stats = ExecutorStats {
            workers: self.workers,
            nodes_expanded: shared.nodes_expanded.into_inner(),
            steals: shared.steals.into_inner(),
        };
        info!(
            nodes = stats.nodes_expanded,
            steals = stats.steals,
            "depth-first mining finished"
        );
        Ok(stats)
    }
}

fn worker_loop<D: Dataset>(
    id: usize,
    local: Worker<SearchNode<D>>,
    shared: &Shared<D>,
    collector: &BatchFilteringCollector,
) {
    let _guard = PanicGuard { shared, worker: id };
    let backoff = Backoff::new();
    let mut expanded = 0usize;

    loop {
        if shared.failed.load(Ordering::Acquire) {
            break;
        }

        let Some(node) = local.pop().or_else(|| shared.steal(id)) else {
            if shared.in_flight.load(Ordering::Acquire) == 0 {
                break;
            }
            if backoff.is_completed() {
                thread::sleep(Duration::from_micros(50));
            } else {
                backoff.snooze();
            }
            continue;
        };
        backoff.reset();

        let outcome = expand_node(node, collector, |child| {
            shared.in_flight.fetch_add(1, Ordering::AcqRel);
            local.push(child);
        });
        if let Err(error) = outcome {
            shared.fail(error);
        }
        expanded += 1;
        shared.nodes_expanded.fetch_add(1, Ordering::Relaxed);
        shared.in_flight.fetch_sub(1, Ordering::AcqRel);
    }

    debug!(worker = id, expanded, "worker stopped");
}
