use crate::engine::path::StepPath;
use crate::foundation::core::FrameId;
use crate::frame::tree::FrameTree;

/// Frames from the root down to the active one. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationStack {
    frames: Vec<FrameId>,
}

impl NavigationStack {
    /// Stack holding only `root`.
    pub fn new(root: FrameId) -> Self {
        Self { frames: vec![root] }
    }

    /// Active frame.
    pub fn top(&self) -> FrameId {
        self.frames[self.frames.len() - 1]
    }

    /// Bottom of the stack.
    pub fn root(&self) -> FrameId {
        self.frames[0]
    }

    /// Number of levels, at least 1.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always false.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// True when only the root is left.
    pub fn at_root(&self) -> bool {
        self.frames.len() == 1
    }

    /// Frames, root first.
    pub fn as_slice(&self) -> &[FrameId] {
        &self.frames
    }

    /// Frame directly below the top, if any.
    pub fn parent_of_top(&self) -> Option<FrameId> {
        self.frames.len().checked_sub(2).map(|i| self.frames[i])
    }

    pub(crate) fn push(&mut self, frame: FrameId) {
        self.frames.push(frame);
    }

    /// Pop the top frame. The root is never popped.
    pub(crate) fn pop(&mut self) -> Option<FrameId> {
        if self.at_root() {
            return None;
        }
        self.frames.pop()
    }

    pub(crate) fn reset(&mut self, root: FrameId) {
        self.frames.clear();
        self.frames.push(root);
    }

    /// Step index of every level, root first.
    pub fn path(&self, tree: &FrameTree) -> StepPath {
        StepPath(
            self.frames
                .iter()
                .map(|&f| tree.frame(f).step_index())
                .collect(),
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/stack.rs"]
mod tests;
