use crate::foundation::core::{FrameId, NodeId};
use crate::scene::geometry::{CameraTarget, SubMove};
use std::collections::VecDeque;

/// Deferred camera work. Steps only enqueue; geometry is read when the session settles.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Task {
    /// Suppress camera commits until the matching `Unlock`.
    Lock,
    Unlock,
    /// Show a frame, reusing its recorded placement when there is one.
    Goto {
        frame: FrameId,
        delay: Option<f64>,
    },
    /// Align `node` inside `frame`.
    SubMove {
        frame: FrameId,
        node: NodeId,
        motion: SubMove,
        delay: f64,
    },
    /// Frame `node` itself.
    Focus {
        frame: FrameId,
        node: NodeId,
        delay: f64,
    },
    /// Explicit placement requested by a script.
    Move {
        frame: FrameId,
        target: CameraTarget,
        delay: f64,
    },
}

#[derive(Debug, Default)]
pub(crate) struct TaskQueue {
    tasks: VecDeque<Task>,
}

impl TaskQueue {
    pub(crate) fn push(&mut self, task: Task) {
        self.tasks.push_back(task);
    }

    pub(crate) fn pop(&mut self) -> Option<Task> {
        self.tasks.pop_front()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.tasks.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn clear(&mut self) {
        self.tasks.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/tasks.rs"]
mod tests;
