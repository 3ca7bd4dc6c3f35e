//! Timed tasks on the simulation clock
//!
//! Tasks never run on their own thread: the simulation pops due firings at
//! the start of each tick, so a firing is always serialized with the frame
//! update and the contact pass. A repeating task keeps its cadence however
//! the frames fall, firing as many times as its interval fits.

use crate::error::{Result, SimError};
use destroyer_combat::EntityId;

/// What a task does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// Count one frame of the owner's attack
    AttackTick,
    /// Remove the owner's corpse
    Despawn,
}

/// Handle to a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u64);

/// One occurrence of a task
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Firing {
    pub task: TaskId,
    pub owner: EntityId,
    pub kind: TaskKind,
    /// Simulation time the occurrence was due
    pub due: f64,
}

#[derive(Debug, Clone)]
struct Task {
    id: TaskId,
    owner: EntityId,
    kind: TaskKind,
    start: f64,
    /// Zero for one-shot tasks
    interval: f64,
    /// Occurrences already fired
    fired: u64,
}

impl Task {
    fn next_due(&self) -> f64 {
        if self.interval > 0.0 {
            self.start + self.interval * (self.fired + 1) as f64
        } else {
            self.start
        }
    }
}

/// Fixed-interval and one-shot tasks keyed by owner
#[derive(Debug, Default)]
pub struct Scheduler {
    tasks: Vec<Task>,
    next_id: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, task: impl FnOnce(TaskId) -> Task) -> TaskId {
        self.next_id += 1;
        let id = TaskId(self.next_id);
        self.tasks.push(task(id));
        id
    }

    /// Fire every `interval` seconds, first at `now + interval`
    pub fn every(&mut self, owner: EntityId, kind: TaskKind, interval: f64, now: f64) -> Result<TaskId> {
        if !(interval.is_finite() && interval > 0.0) {
            return Err(SimError::InvalidInterval(interval));
        }

        Ok(self.insert(|id| Task {
            id,
            owner,
            kind,
            start: now,
            interval,
            fired: 0,
        }))
    }

    /// Fire once at `now + delay`
    pub fn after(&mut self, owner: EntityId, kind: TaskKind, delay: f64, now: f64) -> TaskId {
        self.insert(|id| Task {
            id,
            owner,
            kind,
            start: now + delay.max(0.0),
            interval: 0.0,
            fired: 0,
        })
    }

    /// Cancel the owner's tasks of one kind; returns how many were removed
    pub fn cancel(&mut self, owner: EntityId, kind: TaskKind) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| !(t.owner == owner && t.kind == kind));
        before - self.tasks.len()
    }

    /// Cancel every task of an owner
    pub fn cancel_owner(&mut self, owner: EntityId) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.owner != owner);
        before - self.tasks.len()
    }

    /// Whether the owner has a task of this kind
    pub fn is_scheduled(&self, owner: EntityId, kind: TaskKind) -> bool {
        self.tasks.iter().any(|t| t.owner == owner && t.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Pop the earliest occurrence due at or before `now`.
    ///
    /// Ties go to the task scheduled first. Call in a loop; cancellations
    /// made between calls take effect immediately.
    pub fn pop_due(&mut self, now: f64) -> Option<Firing> {
        let index = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.next_due() <= now)
            .min_by(|(_, a), (_, b)| a.next_due().total_cmp(&b.next_due()).then(a.id.cmp(&b.id)))
            .map(|(i, _)| i)?;

        let task = &mut self.tasks[index];
        let firing = Firing {
            task: task.id,
            owner: task.owner,
            kind: task.kind,
            due: task.next_due(),
        };

        if task.interval > 0.0 {
            task.fired += 1;
        } else {
            self.tasks.swap_remove(index);
        }
        Some(firing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: EntityId = EntityId(1);
    const B: EntityId = EntityId(2);

    fn drain(scheduler: &mut Scheduler, now: f64) -> Vec<Firing> {
        std::iter::from_fn(|| scheduler.pop_due(now)).collect()
    }

    #[test]
    fn test_repeating_cadence() {
        let mut scheduler = Scheduler::new();
        scheduler.every(A, TaskKind::AttackTick, 0.05, 1.0).unwrap();

        assert!(drain(&mut scheduler, 1.04).is_empty());
        assert_eq!(drain(&mut scheduler, 1.051).len(), 1);
        // A long frame catches up on every missed occurrence
        assert_eq!(drain(&mut scheduler, 1.21).len(), 3);
        assert!(scheduler.is_scheduled(A, TaskKind::AttackTick));
    }

    #[test]
    fn test_one_shot() {
        let mut scheduler = Scheduler::new();
        scheduler.after(A, TaskKind::Despawn, 3.0, 10.0);

        assert!(drain(&mut scheduler, 12.9).is_empty());
        let fired = drain(&mut scheduler, 13.0);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].kind, TaskKind::Despawn);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_time_order_across_owners() {
        let mut scheduler = Scheduler::new();
        scheduler.every(A, TaskKind::AttackTick, 0.1, 0.0).unwrap();
        scheduler.every(B, TaskKind::AttackTick, 0.05, 0.02).unwrap();

        let owners: Vec<_> = drain(&mut scheduler, 0.205).iter().map(|f| f.owner).collect();
        // B at 0.07, A at 0.1, B at 0.12, B at 0.17, A at 0.2
        assert_eq!(owners, vec![B, A, B, B, A]);
    }

    #[test]
    fn test_cancel() {
        let mut scheduler = Scheduler::new();
        scheduler.every(A, TaskKind::AttackTick, 0.05, 0.0).unwrap();
        scheduler.after(A, TaskKind::Despawn, 3.0, 0.0);
        scheduler.every(B, TaskKind::AttackTick, 0.05, 0.0).unwrap();

        assert_eq!(scheduler.cancel(A, TaskKind::AttackTick), 1);
        assert!(scheduler.is_scheduled(A, TaskKind::Despawn));
        assert_eq!(scheduler.cancel_owner(A), 1);
        assert_eq!(scheduler.len(), 1);
        assert_eq!(scheduler.cancel(A, TaskKind::AttackTick), 0);
    }

    #[test]
    fn test_rejects_bad_interval() {
        let mut scheduler = Scheduler::new();
        assert!(scheduler.every(A, TaskKind::AttackTick, 0.0, 0.0).is_err());
        assert!(scheduler.every(A, TaskKind::AttackTick, f64::NAN, 0.0).is_err());
    }
}
