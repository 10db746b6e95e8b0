use crate::engine::tasks::{Task, TaskQueue};
use crate::foundation::core::{FrameId, NodeId};
use crate::foundation::error::{SlipwayError, SlipwayResult};
use crate::frame::effect::{FigureOp, ScriptRef};
use crate::frame::interpret::apply_figure_op;
use crate::frame::pause::lookup_in_scope;
use crate::scene::geometry::{CameraTarget, SubMove};
use crate::scene::tree::{NodeState, Placement, Reveal, SceneTree};
use std::collections::HashMap;
use std::fmt;

/// Boxed script handler.
pub type ScriptFn = Box<dyn FnMut(&mut ScriptCtx<'_>) -> anyhow::Result<()>>;

/// Named script handlers, invoked by `exec-at` steps and by step actions.
#[derive(Default)]
pub struct ScriptRegistry {
    handlers: HashMap<String, ScriptFn>,
}

impl fmt::Debug for ScriptRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("ScriptRegistry")
            .field("handlers", &names)
            .finish()
    }
}

impl ScriptRegistry {
    /// Register (or replace) a handler.
    pub fn register<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: FnMut(&mut ScriptCtx<'_>) -> anyhow::Result<()> + 'static,
    {
        self.handlers.insert(name.into(), Box::new(f));
    }

    /// Whether a handler is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// True when no handler is registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub(crate) fn run(&mut self, script: &ScriptRef, ctx: &mut ScriptCtx<'_>) -> SlipwayResult<()> {
        let Some(handler) = self.handlers.get_mut(&script.handler) else {
            tracing::warn!(handler = script.handler.as_str(), "no script registered, skipping");
            return Ok(());
        };
        handler(ctx).map_err(|e| SlipwayError::script(script.handler.as_str(), e))
    }
}

/// What a running script may touch: the nodes of its own frame and the camera queue.
pub struct ScriptCtx<'a> {
    pub(crate) scene: &'a mut SceneTree,
    pub(crate) tasks: &'a mut TaskQueue,
    pub(crate) frame: FrameId,
    pub(crate) scope: &'a [NodeId],
    pub(crate) step: i64,
    pub(crate) node: NodeId,
    pub(crate) delay: f64,
}

impl ScriptCtx<'_> {
    /// Frame running the script.
    pub fn frame(&self) -> FrameId {
        self.frame
    }

    /// Step being applied.
    pub fn step(&self) -> i64 {
        self.step
    }

    /// Node the script is attached to.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Resolve a document id among the frame's own nodes.
    pub fn lookup(&self, key: &str) -> SlipwayResult<NodeId> {
        lookup_in_scope(self.scene, self.scope, key)
            .ok_or_else(|| SlipwayError::validation(format!("no node '{key}' in this frame")))
    }

    /// Current state of a node of the frame.
    pub fn state(&self, key: &str) -> SlipwayResult<NodeState> {
        Ok(self.scene.state(self.lookup(key)?))
    }

    /// Show a node.
    pub fn reveal(&mut self, key: &str) -> SlipwayResult<()> {
        let id = self.lookup(key)?;
        self.scene.state_mut(id).reveal = Reveal::Shown;
        Ok(())
    }

    /// Hide a node.
    pub fn hide(&mut self, key: &str) -> SlipwayResult<()> {
        let id = self.lookup(key)?;
        self.scene.state_mut(id).reveal = Reveal::Hidden;
        Ok(())
    }

    /// Put a node back into layout flow.
    pub fn make_static(&mut self, key: &str) -> SlipwayResult<()> {
        let id = self.lookup(key)?;
        self.scene.state_mut(id).placement = Placement::InFlow;
        Ok(())
    }

    /// Take a node out of layout flow.
    pub fn make_unstatic(&mut self, key: &str) -> SlipwayResult<()> {
        let id = self.lookup(key)?;
        self.scene.state_mut(id).placement = Placement::OutOfFlow;
        Ok(())
    }

    /// Set emphasis on a node.
    pub fn emphasize(&mut self, key: &str, on: bool) -> SlipwayResult<()> {
        let id = self.lookup(key)?;
        self.scene.state_mut(id).emphasized = on;
        Ok(())
    }

    /// Jump a figure to `step`, clamped to its frames.
    pub fn set_figure_step(&mut self, key: &str, step: u32) -> SlipwayResult<()> {
        let id = self.lookup(key)?;
        apply_figure_op(self.scene, id, FigureOp::Set(step));
        Ok(())
    }

    /// Frame a node of this frame.
    pub fn focus(&mut self, key: &str) -> SlipwayResult<()> {
        let node = self.lookup(key)?;
        self.tasks.push(Task::Focus {
            frame: self.frame,
            node,
            delay: self.delay,
        });
        Ok(())
    }

    /// Return to the frame's own placement.
    pub fn unfocus(&mut self) {
        self.tasks.push(Task::Goto {
            frame: self.frame,
            delay: Some(self.delay),
        });
    }

    /// Align a node inside the frame.
    pub fn align(&mut self, key: &str, motion: SubMove) -> SlipwayResult<()> {
        let node = self.lookup(key)?;
        self.tasks.push(Task::SubMove {
            frame: self.frame,
            node,
            motion,
            delay: self.delay,
        });
        Ok(())
    }

    /// Move the camera to an explicit placement.
    pub fn move_camera(&mut self, target: CameraTarget, delay: f64) {
        self.tasks.push(Task::Move {
            frame: self.frame,
            target,
            delay,
        });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/script.rs"]
mod tests;
