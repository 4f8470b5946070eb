// Chunk: docs/chunks/render_suppression - Token-validated input suppression
//!
//! Deferred work queue.
//!
//! The session is single-threaded and runs every operation to completion. The
//! only thing that has to happen "later" is lifting input suppression after a
//! render, so that later is modelled as a queue drained one turn at a time by
//! whoever drives the session's event loop.

use std::collections::VecDeque;

use crate::replica::Side;

/// Work scheduled for the next turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredTask {
    /// Lift `side`'s input suppression if `token` is still its latest render.
    ReleaseSuppression { side: Side, token: u64 },
}

#[derive(Debug, Default)]
pub struct DeferredQueue {
    tasks: VecDeque<DeferredTask>,
}

impl DeferredQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, task: DeferredTask) {
        self.tasks.push_back(task);
    }

    /// Removes and returns everything queued so far, oldest first.
    pub fn take_turn(&mut self) -> Vec<DeferredTask> {
        self.tasks.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_turn_is_fifo_and_empties_queue() {
        let mut queue = DeferredQueue::new();
        queue.push(DeferredTask::ReleaseSuppression { side: Side::A, token: 1 });
        queue.push(DeferredTask::ReleaseSuppression { side: Side::B, token: 4 });

        let turn = queue.take_turn();
        assert_eq!(
            turn,
            vec![
                DeferredTask::ReleaseSuppression { side: Side::A, token: 1 },
                DeferredTask::ReleaseSuppression { side: Side::B, token: 4 },
            ]
        );
        assert!(queue.is_empty());
    }
}
