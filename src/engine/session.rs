use crate::document::presentation::Document;
use crate::engine::camera::{Camera, CameraState, NullViewport, Viewport};
use crate::engine::path::StepPath;
use crate::engine::remote::{DeepLinkStore, RemoteControlPort};
use crate::engine::script::{ScriptCtx, ScriptRegistry};
use crate::engine::stack::NavigationStack;
use crate::engine::tasks::{Task, TaskQueue};
use crate::fingerprint::{Fingerprint, fingerprint_state};
use crate::foundation::core::{BezPath, FrameId};
use crate::foundation::error::{SlipwayError, SlipwayResult};
use crate::frame::effect::{Effect, ScriptRef};
use crate::frame::interpret::StepCx;
use crate::frame::slip::{CameraRecord, FrameKind, Rewind, StepOutcome};
use crate::frame::tree::FrameTree;
use crate::scene::geometry::CameraTarget;
use crate::scene::tree::SceneTree;
use crate::toc::counter::counter_label;
use crate::toc::outline::{TocEntry, TocFrame, table_of_contents};

/// Options for [`PresentationSession`].
#[derive(Clone, Debug)]
pub struct SessionOpts {
    /// Transition length, in seconds, of camera moves requested by step effects.
    pub effect_delay: f64,
    /// Gap kept between an aligned element and the viewport edge, in canvas heights.
    pub margin: f64,
    /// Transition length, in seconds, of focus and unfocus moves.
    pub focus_delay: f64,
    /// Path to restore on [`PresentationSession::start`] when no deep link is stored.
    pub starting_point: Option<StepPath>,
}

impl Default for SessionOpts {
    fn default() -> Self {
        Self {
            effect_delay: 1.0,
            margin: 0.0125,
            focus_delay: 1.0,
            starting_point: None,
        }
    }
}

/// What a navigation call changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NavOutcome {
    /// Nothing moved (start or end of the presentation).
    Unchanged,
    /// The active frame moved by one step.
    Stepped,
    /// A frame was entered or left.
    StackChanged,
}

/// A running presentation: scene, frames, navigation stack and camera.
///
/// Every public operation settles the deferred camera queue before returning, then
/// publishes the new [`StepPath`] to the deep-link store and the remote port.
pub struct PresentationSession {
    opts: SessionOpts,
    scene: SceneTree,
    frames: FrameTree,
    stack: NavigationStack,
    tasks: TaskQueue,
    scripts: ScriptRegistry,
    camera: Camera,
    deep_link: Option<Box<dyn DeepLinkStore>>,
    remote: Option<Box<dyn RemoteControlPort>>,
    published: Option<StepPath>,
    quiet: bool,
}

impl std::fmt::Debug for PresentationSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresentationSession")
            .field("opts", &self.opts)
            .field("frames", &self.frames.len())
            .field("stack", &self.stack)
            .field("camera", &self.camera.state)
            .finish_non_exhaustive()
    }
}

impl PresentationSession {
    /// Validate `doc` and compile it into a session. The session has not started yet.
    #[tracing::instrument(skip(doc, opts))]
    pub fn new(doc: &Document, opts: SessionOpts) -> SlipwayResult<Self> {
        doc.validate()?;
        let mut scene = SceneTree::from_document(doc.def())?;
        let frames = FrameTree::build(&mut scene)?;
        let camera = Camera::new(scene.canvas(), Box::new(NullViewport));
        Ok(Self {
            opts,
            stack: NavigationStack::new(frames.root()),
            scene,
            frames,
            tasks: TaskQueue::default(),
            scripts: ScriptRegistry::default(),
            camera,
            deep_link: None,
            remote: None,
            published: None,
            quiet: false,
        })
    }

    /// Deliver camera commits to `viewport`.
    pub fn with_viewport(mut self, viewport: impl Viewport + 'static) -> Self {
        self.camera.set_viewport(Box::new(viewport));
        self
    }

    /// Persist the current path into `store`, and restore from it on start.
    pub fn with_deep_link(mut self, store: impl DeepLinkStore + 'static) -> Self {
        self.deep_link = Some(Box::new(store));
        self
    }

    /// Mirror committed paths to `port` and accept goto requests from it.
    pub fn with_remote(mut self, port: impl RemoteControlPort + 'static) -> Self {
        self.remote = Some(Box::new(port));
        self
    }

    /// Options the session was built with.
    pub fn opts(&self) -> &SessionOpts {
        &self.opts
    }

    /// Scene with the live node states.
    pub fn scene(&self) -> &SceneTree {
        &self.scene
    }

    /// Frame arena.
    pub fn frames(&self) -> &FrameTree {
        &self.frames
    }

    /// Navigation stack.
    pub fn stack(&self) -> &NavigationStack {
        &self.stack
    }

    /// Live camera.
    pub fn camera(&self) -> CameraState {
        self.camera.state
    }

    /// Step index of every stack level.
    pub fn path(&self) -> StepPath {
        self.stack.path(&self.frames)
    }

    /// Stack counters as shown to the audience, e.g. `"III.2"`.
    pub fn counter_label(&self) -> String {
        counter_label(&self.path())
    }

    /// Table of contents marked against the live stack.
    pub fn toc(&self) -> TocFrame {
        table_of_contents(&self.frames, &self.stack)
    }

    /// Jump to the step a ToC entry stands for.
    pub fn activate(&mut self, entry: &TocEntry) -> SlipwayResult<NavOutcome> {
        self.go_to_state(&entry.path)
    }

    /// Stable hash of the presentation state (nodes, frames, pauses, stack).
    pub fn fingerprint(&self) -> Fingerprint {
        fingerprint_state(&self.scene, &self.frames, &self.stack)
    }

    /// Script handlers.
    pub fn scripts_mut(&mut self) -> &mut ScriptRegistry {
        &mut self.scripts
    }

    /// Register a script handler under `name`.
    pub fn register_script<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: FnMut(&mut ScriptCtx<'_>) -> anyhow::Result<()> + 'static,
    {
        self.scripts.register(name, f);
    }

    /// Run the script `handler` when `frame` reaches `step`.
    ///
    /// Only possible before the frame's step count has been used.
    pub fn add_step_action(
        &mut self,
        frame: FrameId,
        step: i64,
        handler: impl Into<String>,
    ) -> SlipwayResult<()> {
        let f = self
            .frames
            .get(frame)
            .ok_or_else(|| SlipwayError::validation(format!("no frame {}", frame.0)))?;
        let effect = Effect::ScriptExec(ScriptRef {
            handler: handler.into(),
            node: f.anchor(),
        });
        self.frames.frame_mut(frame).add_action(step, effect)
    }

    /// Whether the node with document id `key` is currently shown.
    pub fn is_visible(&self, key: &str) -> SlipwayResult<bool> {
        Ok(self.scene.is_visible(self.scene.require(key)?))
    }

    /// Add an annotation stroke to the overlay `key`. Strokes survive every refresh.
    pub fn annotate(&mut self, key: &str, stroke: BezPath) -> SlipwayResult<()> {
        let id = self.scene.require(key)?;
        self.scene.push_stroke(id, stroke)
    }

    /// Show the presentation: restore the stored deep link (or the configured starting
    /// point) if there is one, otherwise play the first step.
    #[tracing::instrument(skip(self))]
    pub fn start(&mut self) -> SlipwayResult<NavOutcome> {
        let stored = self.deep_link.as_ref().and_then(|d| d.read()).and_then(|raw| {
            StepPath::parse(&raw)
                .inspect_err(|e| {
                    tracing::warn!(fragment = raw.as_str(), error = %e, "ignoring stored deep link");
                })
                .ok()
        });
        match stored.or_else(|| self.opts.starting_point.clone()) {
            Some(target) => {
                self.quiet = true;
                let res = self.replay_to_path(&target);
                let res = self.finish(res);
                self.quiet = false;
                res
            }
            None => {
                self.reset_all();
                self.tasks.push(Task::Goto {
                    frame: self.frames.root(),
                    delay: Some(0.0),
                });
                let res = self.advance();
                self.finish(res)
            }
        }
    }

    /// Go back to the very first step.
    #[tracing::instrument(skip(self))]
    pub fn restart(&mut self) -> SlipwayResult<NavOutcome> {
        self.reset_all();
        self.tasks.push(Task::Goto {
            frame: self.frames.root(),
            delay: None,
        });
        let res = self.advance();
        self.finish(res)
    }

    /// One step forward.
    #[tracing::instrument(skip(self))]
    pub fn next(&mut self) -> SlipwayResult<NavOutcome> {
        let res = self.advance();
        self.finish(res)
    }

    /// One step back, replaying the active frame from its start.
    #[tracing::instrument(skip(self))]
    pub fn previous(&mut self) -> SlipwayResult<NavOutcome> {
        let res = self.retreat(None);
        self.finish(res)
    }

    /// Step forward until a frame is entered or left.
    pub fn next_frame(&mut self) -> SlipwayResult<NavOutcome> {
        let res = self.repeat(Self::advance);
        self.finish(res)
    }

    /// Step back until a frame is entered or left.
    pub fn previous_frame(&mut self) -> SlipwayResult<NavOutcome> {
        let res = self.repeat(|s| s.retreat(None));
        self.finish(res)
    }

    /// Reset the innermost live frame to its pristine state.
    pub fn refresh_current(&mut self) -> SlipwayResult<()> {
        let top = self.stack.top();
        self.frames.refresh(top, &mut self.scene);
        self.tasks.push(Task::Goto {
            frame: self.stack.top(),
            delay: None,
        });
        self.finish(Ok(()))
    }

    /// Replay from the start up to `path`, with every transition instant.
    #[tracing::instrument(skip(self), fields(path = %path))]
    pub fn go_to_state(&mut self, path: &StepPath) -> SlipwayResult<NavOutcome> {
        let res = self.replay_to_path(path);
        self.finish(res)
    }

    /// Handle a goto request from a remote: restart and fast-replay to `msg`.
    /// The resulting path is not echoed back to the remote.
    pub fn on_goto_path(&mut self, msg: &str) -> SlipwayResult<NavOutcome> {
        let path = StepPath::parse(msg)?;
        self.quiet = true;
        let res = self.replay_to_path(&path);
        let res = self.finish(res);
        self.quiet = false;
        res
    }

    /// Apply every goto request waiting on the remote port; returns how many were applied.
    pub fn poll_remote(&mut self) -> SlipwayResult<usize> {
        let mut applied = 0;
        while let Some(msg) = self.remote.as_mut().and_then(|r| r.take_goto()) {
            self.on_goto_path(&msg)?;
            applied += 1;
        }
        Ok(applied)
    }

    /// Move the camera relative to where it is, without touching the navigation state.
    pub fn nudge_camera(
        &mut self,
        dx: f64,
        dy: f64,
        dscale: f64,
        drotation: f64,
        delay: f64,
    ) -> SlipwayResult<()> {
        let cur = self.camera.state.target;
        let target = CameraTarget {
            x: cur.x + dx,
            y: cur.y + dy,
            scale: cur.scale + dscale,
            rotation: cur.rotation + drotation,
        };
        self.camera.commit(target, delay).map(|_| ())
    }

    fn repeat(
        &mut self,
        mut step: impl FnMut(&mut Self) -> SlipwayResult<NavOutcome>,
    ) -> SlipwayResult<NavOutcome> {
        loop {
            match step(self)? {
                NavOutcome::Stepped => continue,
                other => return Ok(other),
            }
        }
    }

    fn reset_all(&mut self) {
        let root = self.frames.root();
        self.stack.reset(root);
        self.frames.refresh_all(root, &mut self.scene);
        self.camera.state.locked = false;
    }

    fn step_frame(&mut self, id: FrameId) -> SlipwayResult<StepOutcome> {
        let Self {
            scene,
            frames,
            tasks,
            scripts,
            opts,
            ..
        } = self;
        let mut cx = StepCx {
            scene,
            tasks,
            scripts,
            effect_delay: opts.effect_delay,
            focus_delay: opts.focus_delay,
        };
        frames.frame_mut(id).next(&mut cx)
    }

    fn rewind_frame(&mut self, id: FrameId) -> SlipwayResult<Rewind> {
        let Self {
            scene,
            frames,
            tasks,
            scripts,
            opts,
            ..
        } = self;
        let mut cx = StepCx {
            scene,
            tasks,
            scripts,
            effect_delay: opts.effect_delay,
            focus_delay: opts.focus_delay,
        };
        frames.frame_mut(id).previous(&mut cx)
    }

    fn advance(&mut self) -> SlipwayResult<NavOutcome> {
        let top = self.stack.top();
        if let Some(child) = self.frames.frame(top).current_child()
            && self.frames.frame(child).is_pristine()
        {
            self.descend(child)?;
            return Ok(NavOutcome::StackChanged);
        }

        let mut popped = false;
        loop {
            let top = self.stack.top();
            match self.step_frame(top)? {
                StepOutcome::Advanced => {
                    return Ok(if popped {
                        NavOutcome::StackChanged
                    } else {
                        NavOutcome::Stepped
                    });
                }
                StepOutcome::Descend(child) => {
                    self.descend(child)?;
                    return Ok(NavOutcome::StackChanged);
                }
                StepOutcome::Exhausted => {
                    let Some(left) = self.stack.pop() else {
                        return Ok(if popped {
                            NavOutcome::StackChanged
                        } else {
                            NavOutcome::Unchanged
                        });
                    };
                    popped = true;
                    let parent = self.stack.top();
                    tracing::debug!(left = left.0, parent = parent.0, "leaving exhausted frame");
                    let pf = self.frames.frame(parent);
                    if self.stack.at_root() && pf.step_index() >= pf.max_step() {
                        self.tasks.push(Task::Goto {
                            frame: parent,
                            delay: None,
                        });
                        return Ok(NavOutcome::StackChanged);
                    }
                    if pf.next_stage_needs_goto() {
                        self.tasks.push(Task::Goto {
                            frame: parent,
                            delay: None,
                        });
                    }
                }
            }
        }
    }

    /// Enter `child`: camera to it, push it, play its first step.
    fn descend(&mut self, child: FrameId) -> SlipwayResult<()> {
        tracing::debug!(frame = child.0, depth = self.stack.len(), "entering frame");
        self.tasks.push(Task::Goto {
            frame: child,
            delay: None,
        });
        self.stack.push(child);
        match self.step_frame(child)? {
            StepOutcome::Descend(grandchild) => self.descend(grandchild),
            StepOutcome::Advanced | StepOutcome::Exhausted => Ok(()),
        }
    }

    fn retreat(&mut self, carried: Option<f64>) -> SlipwayResult<NavOutcome> {
        let top = self.stack.top();
        let frame = self.frames.frame(top);
        if self.stack.at_root() && frame.step_index() <= 0 {
            return Ok(NavOutcome::Unchanged);
        }
        let last_delay = frame.camera_record().map(|r| r.delay).or(carried);

        match self.rewind_frame(top)? {
            Rewind::AtStart => {
                self.stack.pop();
                tracing::debug!(frame = top.0, "backing out of pristine frame");
                self.retreat(last_delay)?;
                Ok(NavOutcome::StackChanged)
            }
            Rewind::Rewound => {
                self.stack.pop();
                let parent = self.stack.top();
                tracing::debug!(frame = top.0, parent = parent.0, "frame rewound, back to parent");
                self.tasks.push(Task::Goto {
                    frame: parent,
                    delay: last_delay,
                });
                Ok(NavOutcome::StackChanged)
            }
            Rewind::Replayed(StepOutcome::Descend(child)) => {
                let mut cur = child;
                loop {
                    if self.frames.frame(cur).is_pristine() {
                        self.descend(cur)?;
                        break;
                    }
                    self.stack.push(cur);
                    match self.frames.frame(cur).current_child() {
                        Some(next) => cur = next,
                        None => {
                            self.tasks.push(Task::Goto {
                                frame: cur,
                                delay: carried,
                            });
                            break;
                        }
                    }
                }
                tracing::debug!(depth = self.stack.len(), "back inside nested frame");
                Ok(NavOutcome::StackChanged)
            }
            Rewind::Replayed(_) => {
                if carried.is_some() {
                    self.tasks.push(Task::Goto {
                        frame: top,
                        delay: carried,
                    });
                }
                Ok(NavOutcome::Stepped)
            }
        }
    }

    fn replay_to_path(&mut self, path: &StepPath) -> SlipwayResult<NavOutcome> {
        if path.is_empty() {
            return Err(SlipwayError::validation("step path is empty"));
        }
        let before = (self.stack.clone(), self.path());
        self.camera.state.fast_override = true;

        self.reset_all();
        let mut res = Ok(());
        while self.path().is_before(path) {
            match self.advance() {
                Ok(NavOutcome::Unchanged) => break,
                Ok(_) => {}
                Err(e) => {
                    res = Err(e);
                    break;
                }
            }
        }
        self.tasks.push(Task::Goto {
            frame: self.stack.top(),
            delay: None,
        });
        let settled = self.settle();
        self.camera.state.fast_override = false;
        res?;
        settled?;

        Ok(if self.stack != before.0 {
            NavOutcome::StackChanged
        } else if self.path() != before.1 {
            NavOutcome::Stepped
        } else {
            NavOutcome::Unchanged
        })
    }

    /// Settle the camera queue and publish the path, then report `res`.
    fn finish<T>(&mut self, res: SlipwayResult<T>) -> SlipwayResult<T> {
        let settled = self.settle();
        self.publish();
        let out = res?;
        settled?;
        Ok(out)
    }

    fn publish(&mut self) {
        let path = self.path();
        if self.published.as_ref() == Some(&path) {
            return;
        }
        if let Some(link) = self.deep_link.as_mut() {
            link.write(&path.to_string());
        }
        if !self.quiet
            && let Some(remote) = self.remote.as_mut()
        {
            remote.on_step_committed(&path);
        }
        self.published = Some(path);
    }

    /// Run every queued camera task in order. Geometry that cannot be framed is skipped.
    fn settle(&mut self) -> SlipwayResult<()> {
        let mut first_err = None;
        while let Some(task) = self.tasks.pop() {
            match self.run_task(task) {
                Ok(()) => {}
                Err(SlipwayError::Geometry(msg)) => {
                    tracing::warn!(error = msg.as_str(), "skipping camera move");
                }
                Err(e) => {
                    first_err.get_or_insert(e);
                }
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    fn run_task(&mut self, task: Task) -> SlipwayResult<()> {
        match task {
            Task::Lock => self.camera.state.locked = true,
            Task::Unlock => self.camera.state.locked = false,
            Task::Goto { frame, delay } => {
                let f = self.frames.frame(frame);
                let record = f.camera_record();
                let target = match record {
                    Some(r) => r.target,
                    None => self.placement(frame)?,
                };
                let delay = delay
                    .or(record.map(|r| r.delay))
                    .unwrap_or(f.delay);
                self.move_camera(frame, target, delay)?;
            }
            Task::SubMove {
                frame,
                node,
                motion,
                delay,
            } => {
                let base = self.placement(frame)?;
                let anchor = self.frames.frame(frame).anchor();
                let target = self
                    .scene
                    .sub_move(base, anchor, node, motion, self.opts.margin);
                self.move_camera(frame, target, delay)?;
            }
            Task::Focus { frame, node, delay } => {
                // not recorded on the frame: unfocus returns to the frame's own placement
                let target = self.scene.element_framing(node)?;
                tracing::debug!(frame = frame.0, node = node.0, "focus");
                self.camera.commit(target, delay)?;
            }
            Task::Move {
                frame,
                target,
                delay,
            } => self.move_camera(frame, target, delay)?,
        }
        Ok(())
    }

    /// Where the camera shows `frame` when nothing was recorded for it.
    fn placement(&self, frame: FrameId) -> SlipwayResult<CameraTarget> {
        let f = self.frames.frame(frame);
        match f.kind() {
            FrameKind::Slip => Ok(self.scene.frame_position(f.anchor(), f.rotation)),
            FrameKind::Inline => self.scene.element_framing(f.anchor()),
        }
    }

    fn move_camera(&mut self, frame: FrameId, target: CameraTarget, delay: f64) -> SlipwayResult<()> {
        self.frames.frame_mut(frame).camera = Some(CameraRecord { target, delay });
        self.camera.commit(target, delay)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/session.rs"]
mod tests;
