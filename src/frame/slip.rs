use crate::engine::tasks::Task;
use crate::foundation::core::{FrameId, NodeId};
use crate::foundation::error::{SlipwayError, SlipwayResult};
use crate::frame::effect::Effect;
use crate::frame::interpret::{StepCx, apply_effect, do_attributes};
use crate::frame::pause::{MarkerKind, PauseMarker, PauseState};
use crate::frame::schedule::StepSchedule;
use crate::scene::geometry::CameraTarget;
use crate::scene::tree::{NodeState, SceneTree};
use std::cell::OnceCell;
use std::collections::BTreeMap;

/// How a frame came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameKind {
    /// A declared frame node; the camera shows it top-aligned at its own scale.
    Slip,
    /// A pause marker promoted to a frame; the camera frames it like a focused element.
    Inline,
}

/// Result of advancing a frame by one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepOutcome {
    /// The step was applied inside the frame.
    Advanced,
    /// The step enters a child frame.
    Descend(FrameId),
    /// Nothing left; the frame did not change.
    Exhausted,
}

/// Result of stepping a frame backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rewind {
    /// The frame had not been entered.
    AtStart,
    /// The frame was at its first step and is pristine again.
    Rewound,
    /// The frame was reset and replayed up to the previous step.
    Replayed(StepOutcome),
}

/// Last camera request made on behalf of a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRecord {
    /// Requested placement.
    pub target: CameraTarget,
    /// Requested transition length in seconds.
    pub delay: f64,
}

/// One navigable unit of the presentation.
#[derive(Debug, Clone)]
pub struct Frame {
    pub(crate) id: FrameId,
    pub(crate) anchor: NodeId,
    pub(crate) kind: FrameKind,
    pub(crate) title: String,
    pub(crate) parent: Option<FrameId>,
    pub(crate) rotation: f64,
    pub(crate) delay: f64,
    pub(crate) scope: Vec<NodeId>,
    pub(crate) actions: BTreeMap<i64, Effect>,
    pub(crate) pause_children: BTreeMap<i64, FrameId>,
    pub(crate) markers: Vec<PauseMarker>,
    pub(crate) schedule: StepSchedule,
    pub(crate) max_step: OnceCell<i64>,
    pub(crate) step_index: i64,
    pub(crate) snapshot: Vec<(NodeId, NodeState)>,
    pub(crate) camera: Option<CameraRecord>,
}

impl Frame {
    pub(crate) fn new(
        id: FrameId,
        anchor: NodeId,
        kind: FrameKind,
        title: String,
        parent: Option<FrameId>,
    ) -> Self {
        Self {
            id,
            anchor,
            kind,
            title,
            parent,
            rotation: 0.0,
            delay: 1.0,
            scope: Vec::new(),
            actions: BTreeMap::new(),
            pause_children: BTreeMap::new(),
            markers: Vec::new(),
            schedule: StepSchedule::default(),
            max_step: OnceCell::new(),
            step_index: -1,
            snapshot: Vec::new(),
            camera: None,
        }
    }

    /// Arena id.
    pub fn id(&self) -> FrameId {
        self.id
    }

    /// Scene node the frame is anchored on.
    pub fn anchor(&self) -> NodeId {
        self.anchor
    }

    /// Declared or promoted.
    pub fn kind(&self) -> FrameKind {
        self.kind
    }

    /// Human-readable title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Enclosing frame; `None` for the root.
    pub fn parent(&self) -> Option<FrameId> {
        self.parent
    }

    /// Current step, `-1` before the frame is entered.
    pub fn step_index(&self) -> i64 {
        self.step_index
    }

    /// True when the frame has not been entered since its last reset.
    pub fn is_pristine(&self) -> bool {
        self.step_index < 0
    }

    /// Last camera request recorded for this frame.
    pub fn camera_record(&self) -> Option<CameraRecord> {
        self.camera
    }

    /// State of the pause markers, in document order.
    pub fn pause_states(&self) -> impl Iterator<Item = (NodeId, MarkerKind, PauseState)> + '_ {
        self.markers.iter().map(|m| (m.node, m.kind, m.state))
    }

    /// Highest reachable step. Computed once; afterwards the action table is frozen.
    pub fn max_step(&self) -> i64 {
        *self.max_step.get_or_init(|| {
            let actions = self.actions.keys().next_back().copied().unwrap_or(0);
            let pauses: i64 = self.markers.iter().map(|m| i64::from(m.count)).sum();
            actions
                .max(self.schedule.trigger_max())
                .max(pauses)
                .max(0)
        })
    }

    /// Child frame entered at `step`, if any.
    pub fn child_at(&self, step: i64) -> Option<FrameId> {
        match self.actions.get(&step) {
            Some(Effect::EnterChildFrame(c)) => Some(*c),
            _ => self.pause_children.get(&step).copied(),
        }
    }

    /// Child frame entered at the current step, if any.
    pub fn current_child(&self) -> Option<FrameId> {
        self.child_at(self.step_index)
    }

    /// Every child frame with the step that enters it, in step order.
    pub fn children(&self) -> Vec<(i64, FrameId)> {
        let mut out: Vec<(i64, FrameId)> = self
            .actions
            .keys()
            .chain(self.pause_children.keys())
            .filter_map(|&s| self.child_at(s).map(|c| (s, c)))
            .collect();
        out.sort_unstable_by_key(|(s, _)| *s);
        out.dedup();
        out
    }

    /// Attach an action to `step`. Rejected once `max_step` has been computed.
    pub(crate) fn add_action(&mut self, step: i64, effect: Effect) -> SlipwayResult<()> {
        if self.max_step.get().is_some() {
            return Err(SlipwayError::navigation(format!(
                "frame '{}' already started; its steps are fixed",
                self.title
            )));
        }
        if step < 0 {
            return Err(SlipwayError::validation("action step must be >= 0"));
        }
        if self.actions.contains_key(&step) {
            return Err(SlipwayError::validation(format!(
                "frame '{}' already has an action at step {step}",
                self.title
            )));
        }
        self.actions.insert(step, effect);
        Ok(())
    }

    /// Whether the step after the current one happens inside this frame, so the camera
    /// has to come back to it.
    pub(crate) fn next_stage_needs_goto(&self) -> bool {
        self.step_index < self.max_step() && self.child_at(self.step_index + 1).is_none()
    }

    pub(crate) fn next(&mut self, cx: &mut StepCx<'_>) -> SlipwayResult<StepOutcome> {
        if self.step_index >= self.max_step() {
            return Ok(StepOutcome::Exhausted);
        }
        self.step_index += 1;
        tracing::trace!(frame = self.id.0, step = self.step_index, "step");

        do_attributes(self, cx)?;
        if self.step_index > 0 {
            self.incr_pause(cx)?;
        }

        match self.actions.get(&self.step_index) {
            Some(Effect::EnterChildFrame(c)) => return Ok(StepOutcome::Descend(*c)),
            Some(effect) => apply_effect(self, effect, cx)?,
            None => {}
        }
        Ok(match self.pause_children.get(&self.step_index) {
            Some(c) => StepOutcome::Descend(*c),
            None => StepOutcome::Advanced,
        })
    }

    fn incr_pause(&mut self, cx: &mut StepCx<'_>) -> SlipwayResult<()> {
        let Some(i) = self.markers.iter().position(|m| !m.is_released()) else {
            return Ok(());
        };
        let released = self.markers[i].advance();
        if self.markers[i].kind == MarkerKind::Pause {
            self.update_pause_gate(cx.scene);
        }
        if released {
            for effect in &self.markers[i].on_release {
                apply_effect(self, effect, cx)?;
            }
        }
        Ok(())
    }

    pub(crate) fn previous(&mut self, cx: &mut StepCx<'_>) -> SlipwayResult<Rewind> {
        let target = self.step_index;
        let saved_delay = self.camera.map(|c| c.delay);

        cx.tasks.push(Task::Lock);
        self.reset(cx.scene);
        if target <= 0 {
            cx.tasks.push(Task::Unlock);
            return Ok(if target < 0 {
                Rewind::AtStart
            } else {
                Rewind::Rewound
            });
        }

        let replay = self.replay_to(target - 1, cx);
        cx.tasks.push(Task::Unlock);
        let last = replay?;
        cx.tasks.push(Task::Goto {
            frame: self.id,
            delay: saved_delay,
        });
        Ok(Rewind::Replayed(last))
    }

    fn replay_to(&mut self, step: i64, cx: &mut StepCx<'_>) -> SlipwayResult<StepOutcome> {
        let mut last = StepOutcome::Advanced;
        while self.step_index < step {
            last = self.next(cx)?;
            if last == StepOutcome::Exhausted {
                break;
            }
        }
        Ok(last)
    }

    /// Back to the pristine state: snapshot restored, pauses re-armed, camera record
    /// cleared. Nested frames and overlays are left alone.
    pub(crate) fn reset(&mut self, scene: &mut SceneTree) {
        for (node, state) in &self.snapshot {
            *scene.state_mut(*node) = *state;
        }
        for m in &mut self.markers {
            m.reset();
        }
        self.camera = None;
        self.step_index = -1;
        self.update_pause_gate(scene);
    }

    /// Hold back everything after the first unreleased `pause` marker.
    pub(crate) fn update_pause_gate(&self, scene: &mut SceneTree) {
        let gate = self
            .markers
            .iter()
            .find(|m| m.kind == MarkerKind::Pause && !m.is_released())
            .map(|m| scene.subtree_end(m.node));
        for &n in &self.scope {
            scene.state_mut(n).paused = gate.is_some_and(|g| n.0 >= g);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frame/slip.rs"]
mod tests;
