//! Deferred tasks
//!
//! Cast completion and death cleanup happen some time after the event that
//! triggered them. Instead of closures capturing a unit, the world schedules a
//! `DeferredTask` naming the unit id and the unit's epoch at scheduling time.
//! When the task comes due the world re-resolves the id; a missing unit or a
//! newer epoch means the task is stale and is dropped.

use smallvec::SmallVec;

use crate::units::UnitId;

/// Tolerance for float drift when comparing due times
const DUE_EPSILON: f64 = 1e-6;

/// Work to run once a delay has elapsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredTask {
    /// Clear the casting flag
    FinishCast { unit: UnitId, epoch: u32 },
    /// Hide a dead player-side unit and keep it as an inert corpse
    HideCorpse { unit: UnitId, epoch: u32 },
    /// Remove a dead non-player unit from the roster
    Despawn { unit: UnitId, epoch: u32 },
}

impl DeferredTask {
    pub fn unit(&self) -> UnitId {
        match *self {
            DeferredTask::FinishCast { unit, .. }
            | DeferredTask::HideCorpse { unit, .. }
            | DeferredTask::Despawn { unit, .. } => unit,
        }
    }

    pub fn epoch(&self) -> u32 {
        match *self {
            DeferredTask::FinishCast { epoch, .. }
            | DeferredTask::HideCorpse { epoch, .. }
            | DeferredTask::Despawn { epoch, .. } => epoch,
        }
    }
}

/// Cancellation handle for a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

/// Timer collaborator. The world asks it to hold tasks and, once per tick,
/// collects the ones that came due.
pub trait Scheduler: Send + Sync {
    fn schedule_once(&mut self, delay_secs: f32, task: DeferredTask) -> TaskHandle;

    /// Returns false if the task already ran or was cancelled.
    fn cancel(&mut self, handle: TaskHandle) -> bool;

    /// Advance the clock by `dt` and return due tasks, earliest first.
    fn advance(&mut self, dt: f32) -> SmallVec<[(TaskHandle, DeferredTask); 4]>;

    fn pending(&self) -> usize;
}

#[derive(Debug, Clone)]
struct PendingTask {
    handle: TaskHandle,
    due: f64,
    task: DeferredTask,
}

/// Scheduler driven by the simulation's own tick clock
#[derive(Debug, Clone, Default)]
pub struct TickScheduler {
    now: f64,
    next_handle: u64,
    queue: Vec<PendingTask>,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulation time seen by the scheduler
    pub fn now(&self) -> f64 {
        self.now
    }
}

impl Scheduler for TickScheduler {
    fn schedule_once(&mut self, delay_secs: f32, task: DeferredTask) -> TaskHandle {
        let handle = TaskHandle(self.next_handle);
        self.next_handle += 1;
        self.queue.push(PendingTask {
            handle,
            due: self.now + f64::from(delay_secs.max(0.0)),
            task,
        });
        handle
    }

    fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.queue.len();
        self.queue.retain(|p| p.handle != handle);
        self.queue.len() != before
    }

    fn advance(&mut self, dt: f32) -> SmallVec<[(TaskHandle, DeferredTask); 4]> {
        self.now += f64::from(dt.max(0.0));
        let now = self.now;

        let mut due: SmallVec<[PendingTask; 4]> = SmallVec::new();
        self.queue.retain(|p| {
            if p.due <= now + DUE_EPSILON {
                due.push(p.clone());
                false
            } else {
                true
            }
        });
        // Handles are allocated in scheduling order, so they break ties
        due.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.handle.0.cmp(&b.handle.0)));
        due.into_iter().map(|p| (p.handle, p.task)).collect()
    }

    fn pending(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cast(unit: u32) -> DeferredTask {
        DeferredTask::FinishCast {
            unit: UnitId::from_raw(unit),
            epoch: 0,
        }
    }

    fn tasks(fired: SmallVec<[(TaskHandle, DeferredTask); 4]>) -> Vec<DeferredTask> {
        fired.into_iter().map(|(_, task)| task).collect()
    }

    #[test]
    fn test_task_fires_once_after_delay() {
        let mut scheduler = TickScheduler::new();
        let handle = scheduler.schedule_once(1.5, cast(1));

        assert!(scheduler.advance(1.0).is_empty());
        let fired = scheduler.advance(0.5);
        assert_eq!(fired.as_slice(), &[(handle, cast(1))]);
        assert!(scheduler.advance(10.0).is_empty());
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_cancelled_task_never_fires() {
        let mut scheduler = TickScheduler::new();
        let handle = scheduler.schedule_once(0.5, cast(1));
        assert!(scheduler.cancel(handle));
        assert!(!scheduler.cancel(handle));
        assert!(scheduler.advance(1.0).is_empty());
    }

    #[test]
    fn test_due_tasks_come_back_earliest_first() {
        let mut scheduler = TickScheduler::new();
        scheduler.schedule_once(2.0, cast(2));
        scheduler.schedule_once(1.5, cast(1));
        scheduler.schedule_once(2.0, cast(3));

        let fired = tasks(scheduler.advance(3.0));
        assert_eq!(fired, vec![cast(1), cast(2), cast(3)]);
    }

    #[test]
    fn test_small_steps_reach_due_time() {
        let mut scheduler = TickScheduler::new();
        scheduler.schedule_once(1.5, cast(7));
        let mut fired_at = None;
        for step in 1..=120 {
            if !scheduler.advance(1.0 / 60.0).is_empty() {
                fired_at = Some(step);
                break;
            }
        }
        let step = fired_at.expect("task should fire within two seconds");
        assert!((90..=91).contains(&step), "fired at step {}", step);
    }
}
