//! Fixed-size worker pool with a cancellable FIFO task queue.
//!
//! The pool moves between exactly two states, Stopped and Running, via
//! [`WorkerPool::start`] and [`WorkerPool::stop`]. Workers block on a
//! condition variable while the queue is empty and claim one task at a
//! time under the queue lock, so a task is executed by exactly one
//! worker. There is no work-stealing, no priorities, and no mid-task
//! cancellation: `stop()` drops queued tasks but lets in-flight ones
//! finish before joining.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::JoinHandle;

/// A unit of work claimed and run by one worker.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Queue state guarded by the pool mutex.
#[derive(Default)]
struct PoolState {
    queue: VecDeque<Task>,
    /// Tasks currently executing on a worker
    in_flight: usize,
}

struct PoolShared {
    state: Mutex<PoolState>,
    /// Signalled when tasks arrive or shutdown is requested
    available: Condvar,
    /// Signalled when the queue drains and the last task finishes
    idle: Condvar,
    shutdown: AtomicBool,
}

/// Fixed-size pool of OS threads pulling from one shared FIFO queue.
pub struct WorkerPool {
    thread_count: usize,
    shared: Arc<PoolShared>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Create a pool in the Stopped state.
    pub fn new(thread_count: usize) -> Self {
        Self {
            thread_count: thread_count.max(1),
            shared: Arc::new(PoolShared {
                state: Mutex::new(PoolState::default()),
                available: Condvar::new(),
                idle: Condvar::new(),
                shutdown: AtomicBool::new(false),
            }),
            workers: Vec::new(),
        }
    }

    /// Number of worker threads spawned by `start()`.
    pub fn thread_count(&self) -> usize {
        self.thread_count
    }

    pub fn is_running(&self) -> bool {
        !self.workers.is_empty()
    }

    /// Spawn the workers. Calling `start()` on a Running pool is a no-op.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }

        log::info!("starting worker pool with {} threads", self.thread_count);
        self.shared.shutdown.store(false, Ordering::Release);

        for _ in 0..self.thread_count {
            let shared = Arc::clone(&self.shared);
            self.workers
                .push(std::thread::spawn(move || worker_loop(&shared)));
        }
    }

    /// Request shutdown, drop queued tasks, and join every worker.
    ///
    /// Tasks already claimed by a worker run to completion; nothing
    /// executes after `stop()` returns. On a Stopped pool this only
    /// clears the queue.
    pub fn stop(&mut self) {
        let dropped = self.clear_tasks();
        if !self.is_running() {
            return;
        }

        log::info!(
            "stopping worker pool ({} queued tasks dropped)",
            dropped
        );
        self.shared.shutdown.store(true, Ordering::Release);
        {
            // Notify under the lock so a worker between its shutdown
            // check and its wait cannot miss the wakeup.
            let _state = self.shared.state.lock().expect("pool mutex poisoned");
            self.shared.available.notify_all();
        }

        for worker in self.workers.drain(..) {
            // A worker that panicked already tore down its task; there
            // is nothing useful to do with the payload here.
            let _ = worker.join();
        }

        self.shared.idle.notify_all();
    }

    /// Enqueue a batch of tasks and wake the workers.
    ///
    /// Safe to call while workers are executing; tasks are appended in
    /// order behind any queued work.
    pub fn add_tasks(&self, tasks: impl IntoIterator<Item = Task>) {
        let mut state = self.shared.state.lock().expect("pool mutex poisoned");
        state.queue.extend(tasks);
        self.shared.available.notify_all();
    }

    /// Drop all queued (not yet claimed) tasks, returning how many were
    /// discarded. In-flight tasks are unaffected.
    pub fn clear_tasks(&self) -> usize {
        let mut state = self.shared.state.lock().expect("pool mutex poisoned");
        let dropped = state.queue.len();
        state.queue.clear();
        if state.in_flight == 0 {
            self.shared.idle.notify_all();
        }
        dropped
    }

    /// Number of tasks waiting in the queue.
    pub fn queued_tasks(&self) -> usize {
        self.shared
            .state
            .lock()
            .expect("pool mutex poisoned")
            .queue
            .len()
    }

    /// Block until the queue is empty and no task is executing.
    ///
    /// Also returns as soon as shutdown is requested, so callers are
    /// never stranded across a `stop()`.
    pub fn wait_idle(&self) {
        let mut state = self.shared.state.lock().expect("pool mutex poisoned");
        while !(state.queue.is_empty() && state.in_flight == 0)
            && !self.shared.shutdown.load(Ordering::Acquire)
        {
            state = self
                .shared
                .idle
                .wait(state)
                .expect("pool mutex poisoned");
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.stop();
    }
}

fn worker_loop(shared: &PoolShared) {
    loop {
        let task = {
            let mut state = shared.state.lock().expect("pool mutex poisoned");
            loop {
                if shared.shutdown.load(Ordering::Acquire) {
                    return;
                }
                if let Some(task) = state.queue.pop_front() {
                    state.in_flight += 1;
                    break task;
                }
                state = shared
                    .available
                    .wait(state)
                    .expect("pool mutex poisoned");
            }
        };

        task();

        let mut state = shared.state.lock().expect("pool mutex poisoned");
        state.in_flight -= 1;
        if state.in_flight == 0 && state.queue.is_empty() {
            shared.idle.notify_all();
        }
    }
}
