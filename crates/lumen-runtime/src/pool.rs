use std::any::Any;
use std::collections::VecDeque;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::{
    Receiver, RecvTimeoutError, SendError, Sender, TryRecvError, bounded, unbounded,
};
use hashbrown::HashMap;
use log::{debug, trace, warn};
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};

use crate::TaskError;

pub type TaskId = u64;

struct Done<R> {
    unit: usize,
    id: TaskId,
    outcome: Result<R, String>,
}

/// Future-style handle for one submitted task. It is resolved by the pool
/// while the owner of the pool polls it.
pub struct TaskHandle<R> {
    id: TaskId,
    rx: Receiver<Result<R, TaskError>>,
}

impl<R> TaskHandle<R> {
    #[inline]
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// The task's result if it has been resolved. A handle whose result was
    /// already taken, or whose pool is gone, yields `Disconnected`.
    pub fn try_take(&self) -> Option<Result<R, TaskError>> {
        match self.rx.try_recv() {
            Ok(r) => Some(r),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(TaskError::Disconnected)),
        }
    }
}

impl<R> fmt::Debug for TaskHandle<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskHandle").field("id", &self.id).finish()
    }
}

/// Fixed set of background units, each running one job at a time.
///
/// Jobs go to an idle unit straight away or wait in a FIFO queue. Bookkeeping
/// (idle set, queue, pending handles) lives on the owning thread and is only
/// touched from `submit` and the `poll*` calls, so it needs no locking.
pub struct TaskPool<J, R> {
    units: Vec<Sender<(TaskId, J)>>,
    done_rx: Receiver<Done<R>>,
    idle: VecDeque<usize>,
    busy: Vec<Option<TaskId>>,
    queue: VecDeque<(TaskId, J)>,
    pending: HashMap<TaskId, Sender<Result<R, TaskError>>>,
    next_id: TaskId,
    // Units whose thread is gone. They are never handed work again.
    lost: usize,
    _threads: ThreadPool,
}

impl<J, R> TaskPool<J, R>
where
    J: Send + 'static,
    R: Send + 'static,
{
    /// Starts `size` units (at least one) named `{name_prefix}-{i}`. Every
    /// unit runs `work`; an `Err` or a panic rejects only that task.
    pub fn new<F, E>(size: usize, name_prefix: &str, work: F) -> Result<Self, ThreadPoolBuildError>
    where
        F: Fn(J) -> Result<R, E> + Send + Sync + 'static,
        E: fmt::Display,
    {
        let size = size.max(1);
        let prefix = name_prefix.to_string();
        let threads = ThreadPoolBuilder::new()
            .num_threads(size)
            .thread_name(move |i| format!("{prefix}-{i}"))
            .build()?;
        let (done_tx, done_rx) = unbounded::<Done<R>>();
        let work = Arc::new(work);
        let mut units = Vec::with_capacity(size);
        for unit in 0..size {
            let (tx, rx) = unbounded::<(TaskId, J)>();
            let done_tx = done_tx.clone();
            let work = Arc::clone(&work);
            threads.spawn(move || {
                while let Ok((id, job)) = rx.recv() {
                    let outcome = match panic::catch_unwind(AssertUnwindSafe(|| work(job))) {
                        Ok(r) => r.map_err(|e| e.to_string()),
                        Err(payload) => Err(panic_message(payload.as_ref())),
                    };
                    if done_tx.send(Done { unit, id, outcome }).is_err() {
                        break;
                    }
                }
            });
            units.push(tx);
        }
        debug!(target: "pool", "started {size} units");
        Ok(Self {
            units,
            done_rx,
            idle: (0..size).collect(),
            busy: vec![None; size],
            queue: VecDeque::new(),
            pending: HashMap::new(),
            next_id: 0,
            lost: 0,
            _threads: threads,
        })
    }

    pub fn submit(&mut self, job: J) -> TaskHandle<R> {
        let id = self.next_id;
        self.next_id += 1;
        let (tx, rx) = bounded(1);
        self.pending.insert(id, tx);
        if self.lost == self.units.len() {
            self.resolve(id, Err(TaskError::Disconnected));
            return TaskHandle { id, rx };
        }
        match self.idle.pop_front() {
            Some(unit) => self.dispatch(unit, id, job),
            None => {
                self.queue.push_back((id, job));
                trace!(target: "pool", "task {id} queued ({} waiting)", self.queue.len());
            }
        }
        TaskHandle { id, rx }
    }

    fn dispatch(&mut self, unit: usize, id: TaskId, job: J) {
        self.busy[unit] = Some(id);
        if let Err(SendError((id, _))) = self.units[unit].send((id, job)) {
            self.busy[unit] = None;
            self.lost += 1;
            warn!(target: "pool", "unit {unit} is gone, rejecting task {id}");
            self.resolve(id, Err(TaskError::Disconnected));
            if self.lost == self.units.len() {
                let stranded: Vec<TaskId> = self.queue.drain(..).map(|(id, _)| id).collect();
                if !stranded.is_empty() {
                    warn!(target: "pool", "no units left, rejecting {} queued tasks", stranded.len());
                }
                for id in stranded {
                    self.resolve(id, Err(TaskError::Disconnected));
                }
            }
            return;
        }
        trace!(target: "pool", "task {id} -> unit {unit}");
    }

    fn resolve(&mut self, id: TaskId, result: Result<R, TaskError>) {
        if let Some(tx) = self.pending.remove(&id) {
            // The caller may have dropped its handle.
            let _ = tx.send(result);
        }
    }

    fn complete(&mut self, done: Done<R>) {
        let Done { unit, id, outcome } = done;
        self.busy[unit] = None;
        let result = outcome.map_err(|e| {
            warn!(target: "pool", "task {id} failed on unit {unit}: {e}");
            TaskError::WorkerFault(e)
        });
        self.resolve(id, result);
        match self.queue.pop_front() {
            Some((next, job)) => self.dispatch(unit, next, job),
            None => self.idle.push_back(unit),
        }
    }

    /// Processes every completion that has already arrived. Never blocks.
    pub fn poll(&mut self) -> usize {
        let mut n = 0;
        while let Ok(done) = self.done_rx.try_recv() {
            self.complete(done);
            n += 1;
        }
        n
    }

    /// Waits up to `timeout` for at least one completion, then drains the
    /// rest. Returns `Ok(0)` at once when nothing is running.
    pub fn poll_blocking(&mut self, timeout: Duration) -> Result<usize, TaskError> {
        if self.in_flight() == 0 {
            return Ok(0);
        }
        match self.done_rx.recv_timeout(timeout) {
            Ok(done) => {
                self.complete(done);
                Ok(1 + self.poll())
            }
            Err(RecvTimeoutError::Timeout) => Err(TaskError::Timeout),
            Err(RecvTimeoutError::Disconnected) => Err(TaskError::Disconnected),
        }
    }

    /// Drives completions until `handle` resolves or `timeout` passes.
    pub fn wait_for(&mut self, handle: &TaskHandle<R>, timeout: Duration) -> Result<R, TaskError> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(result) = handle.try_take() {
                return result;
            }
            let now = Instant::now();
            if now >= deadline {
                return Err(TaskError::Timeout);
            }
            match self.poll_blocking(deadline - now) {
                Ok(_) | Err(TaskError::Timeout) => {}
                Err(e) => return Err(e),
            }
        }
    }

    /// Cuts the coordinator's link to `unit`, as if its thread had exited.
    #[cfg(test)]
    pub(crate) fn close_unit(&mut self, unit: usize) {
        let (tx, _) = unbounded();
        self.units[unit] = tx;
    }

    /// `(busy units, total units)`.
    pub fn utilization(&self) -> (usize, usize) {
        (self.in_flight(), self.units.len())
    }

    #[inline]
    pub fn in_flight(&self) -> usize {
        self.busy.iter().filter(|b| b.is_some()).count()
    }

    #[inline]
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_empty() && self.in_flight() == 0
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked".to_string()
    }
}
