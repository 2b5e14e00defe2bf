/// Millisecond clock and queue of deferred effects.
///
/// Effects that run on their own cadence (the post-hit blink, enemy death
/// flashes) are queued here instead of being driven by the 25 ms tick.
/// Every task is stamped with the session generation it was scheduled in;
/// the session ignores tasks from an older generation, so a reset can never
/// be undone by a task that was already in flight.

use crate::entities::EntityId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskKind {
    /// Next visibility toggle of the post-hit blink.
    BlinkPlayer,
    /// Next step of an enemy death flash.
    AdvanceFlash(EntityId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduledTask {
    pub due_ms: u64,
    pub generation: u64,
    pub kind: TaskKind,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scheduler {
    now_ms: u64,
    tasks: Vec<ScheduledTask>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    pub fn schedule_at(&mut self, due_ms: u64, generation: u64, kind: TaskKind) {
        self.tasks.push(ScheduledTask {
            due_ms,
            generation,
            kind,
        });
    }

    pub fn schedule_in(&mut self, delay_ms: u64, generation: u64, kind: TaskKind) {
        self.schedule_at(self.now_ms + delay_ms, generation, kind);
    }

    pub fn advance(&mut self, elapsed_ms: u64) {
        self.now_ms = self.now_ms.saturating_add(elapsed_ms);
    }

    /// Remove and return the earliest task that is due.  Tasks due at the
    /// same instant come out in the order they were scheduled.
    pub fn pop_due(&mut self) -> Option<ScheduledTask> {
        let now = self.now_ms;
        let index = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| task.due_ms <= now)
            .min_by_key(|(i, task)| (task.due_ms, *i))
            .map(|(i, _)| i)?;
        Some(self.tasks.remove(index))
    }

    /// Drop every task stamped with a generation older than `generation`.
    pub fn cancel_before(&mut self, generation: u64) {
        self.tasks.retain(|task| task.generation >= generation);
    }
}
