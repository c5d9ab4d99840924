//! Per-frame task scheduling
//!
//! A refresh chain is a task the scheduler runs once before every display
//! repaint. Each chain carries a cancellation token owned by the command
//! that installed it; a replaced chain is cancelled explicitly instead of
//! polling forever.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use uuid::Uuid;

/// Cancellation token for one refresh chain
#[derive(Debug, Clone)]
pub struct RefreshToken {
    id: Uuid,
    cancelled: Rc<Cell<bool>>,
}

impl RefreshToken {
    /// Create a live token
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            cancelled: Rc::new(Cell::new(false)),
        }
    }

    /// Unique identifier for this chain
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Cancel the chain; the scheduler drops the task on its next frame
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    /// Whether the chain has been cancelled
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

impl Default for RefreshToken {
    fn default() -> Self {
        Self::new()
    }
}

/// A parameterless unit of work plus the token bounding its lifetime
pub struct FrameTask {
    token: RefreshToken,
    run: Box<dyn FnMut()>,
}

impl FrameTask {
    /// Create a task governed by the given token
    pub fn new(token: RefreshToken, run: impl FnMut() + 'static) -> Self {
        Self {
            token,
            run: Box::new(run),
        }
    }

    /// The task's cancellation token
    pub fn token(&self) -> &RefreshToken {
        &self.token
    }

    /// Run the task once
    pub fn run_once(&mut self) {
        (self.run)();
    }
}

/// Schedules a task to run once before every display repaint until its
/// token is cancelled
pub trait FrameScheduler {
    /// Install the task
    fn schedule(&self, task: FrameTask);
}

/// Host-driven scheduler
///
/// The host calls [`run_frame`](RepaintScheduler::run_frame) once per
/// display repaint; every live task runs once and cancelled tasks are
/// dropped. Tasks installed during a frame first run on the next frame.
#[derive(Default)]
pub struct RepaintScheduler {
    tasks: RefCell<Vec<FrameTask>>,
}

impl RepaintScheduler {
    /// Create an empty scheduler
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live tasks
    pub fn task_count(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Run every live task once and drop cancelled tasks
    pub fn run_frame(&self) {
        // Take the queue so tasks may schedule new work reentrantly
        let mut current = self.tasks.take();
        current.retain(|task| !task.token.is_cancelled());
        for task in &mut current {
            task.run_once();
        }
        // A task may have cancelled itself while running
        current.retain(|task| !task.token.is_cancelled());

        let mut tasks = self.tasks.borrow_mut();
        current.append(&mut tasks);
        *tasks = current;
    }
}

impl FrameScheduler for RepaintScheduler {
    fn schedule(&self, task: FrameTask) {
        log::debug!("Scheduling refresh chain {}", task.token.id());
        self.tasks.borrow_mut().push(task);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_runs_every_frame() {
        let scheduler = RepaintScheduler::new();
        let count = Rc::new(Cell::new(0u32));

        let counter = Rc::clone(&count);
        scheduler.schedule(FrameTask::new(RefreshToken::new(), move || {
            counter.set(counter.get() + 1);
        }));

        scheduler.run_frame();
        scheduler.run_frame();
        scheduler.run_frame();
        assert_eq!(count.get(), 3);
        assert_eq!(scheduler.task_count(), 1);
    }

    #[test]
    fn test_cancelled_task_is_dropped() {
        let scheduler = RepaintScheduler::new();
        let count = Rc::new(Cell::new(0u32));
        let token = RefreshToken::new();

        let counter = Rc::clone(&count);
        scheduler.schedule(FrameTask::new(token.clone(), move || {
            counter.set(counter.get() + 1);
        }));

        scheduler.run_frame();
        token.cancel();
        scheduler.run_frame();
        assert_eq!(count.get(), 1);
        assert_eq!(scheduler.task_count(), 0);
    }

    #[test]
    fn test_self_cancelling_task() {
        let scheduler = RepaintScheduler::new();
        let token = RefreshToken::new();

        let own = token.clone();
        scheduler.schedule(FrameTask::new(token, move || own.cancel()));

        scheduler.run_frame();
        assert_eq!(scheduler.task_count(), 0);
    }

    #[test]
    fn test_task_scheduled_during_frame_runs_next_frame() {
        let scheduler = Rc::new(RepaintScheduler::new());
        let count = Rc::new(Cell::new(0u32));
        let outer = RefreshToken::new();

        let sched = Rc::clone(&scheduler);
        let counter = Rc::clone(&count);
        let once = outer.clone();
        scheduler.schedule(FrameTask::new(outer, move || {
            once.cancel();
            let inner_counter = Rc::clone(&counter);
            sched.schedule(FrameTask::new(RefreshToken::new(), move || {
                inner_counter.set(inner_counter.get() + 1);
            }));
        }));

        scheduler.run_frame();
        assert_eq!(count.get(), 0);
        scheduler.run_frame();
        assert_eq!(count.get(), 1);
    }
}
