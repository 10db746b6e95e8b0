use crate::document::attrs;
use crate::foundation::core::{FrameId, NodeId};
use crate::foundation::error::{SlipwayError, SlipwayResult};
use crate::frame::effect::Effect;
use crate::frame::pause::{MarkerKind, PauseMarker};
use crate::frame::schedule::StepSchedule;
use crate::frame::slip::{Frame, FrameKind};
use crate::scene::tree::{NodeKind, Placement, Reveal, SceneTree};
use std::collections::{BTreeSet, HashSet};

/// Arena of every frame of a presentation.
#[derive(Debug, Clone)]
pub struct FrameTree {
    frames: Vec<Frame>,
    root: FrameId,
}

impl FrameTree {
    /// Compile the frame tree of `scene`, priming every node's initial state.
    #[tracing::instrument(skip(scene), fields(nodes = scene.len()))]
    pub(crate) fn build(scene: &mut SceneTree) -> SlipwayResult<Self> {
        let root_node = scene.root();
        if *scene.node(root_node).kind() != NodeKind::Frame {
            return Err(SlipwayError::validation("root node must be a frame"));
        }
        let mut b = Builder {
            scene,
            frames: Vec::new(),
            anchored: HashSet::new(),
        };
        let root = b.build_frame(root_node, FrameKind::Slip, None)?;
        let frames = b.frames;
        tracing::debug!(frames = frames.len(), "frame tree built");
        Ok(Self { frames, root })
    }

    /// The root frame.
    pub fn root(&self) -> FrameId {
        self.root
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always false for a built tree.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame by id.
    pub fn get(&self, id: FrameId) -> Option<&Frame> {
        self.frames.get(id.index())
    }

    pub(crate) fn frame(&self, id: FrameId) -> &Frame {
        &self.frames[id.index()]
    }

    pub(crate) fn frame_mut(&mut self, id: FrameId) -> &mut Frame {
        &mut self.frames[id.index()]
    }

    /// All frames, in arena order.
    pub fn iter(&self) -> impl Iterator<Item = &Frame> {
        self.frames.iter()
    }

    /// Frame anchored on `node`.
    pub fn by_anchor(&self, node: NodeId) -> Option<FrameId> {
        self.frames.iter().find(|f| f.anchor == node).map(|f| f.id)
    }

    /// Reset `id` and every frame below it.
    pub(crate) fn refresh_all(&mut self, id: FrameId, scene: &mut SceneTree) {
        for (_, child) in self.frame(id).children() {
            self.refresh_all(child, scene);
        }
        self.frame_mut(id).reset(scene);
    }

    /// Reset the innermost live frame below `id`: the child entered at the current step if
    /// there is one, otherwise `id` itself.
    pub(crate) fn refresh(&mut self, id: FrameId, scene: &mut SceneTree) {
        match self.frame(id).current_child() {
            Some(child) => self.refresh(child, scene),
            None => self.frame_mut(id).reset(scene),
        }
    }
}

struct Builder<'a> {
    scene: &'a mut SceneTree,
    frames: Vec<Frame>,
    anchored: HashSet<NodeId>,
}

impl Builder<'_> {
    fn build_frame(
        &mut self,
        anchor: NodeId,
        kind: FrameKind,
        parent: Option<FrameId>,
    ) -> SlipwayResult<FrameId> {
        if !self.anchored.insert(anchor) {
            return Err(SlipwayError::validation(format!(
                "node {} is entered as a frame more than once",
                anchor.0
            )));
        }

        let id = FrameId(self.frames.len() as u32);
        let node = self.scene.node(anchor);
        let title = node
            .attr(attrs::TOC_TITLE)
            .or(node.key())
            .map(str::to_owned)
            .unwrap_or_else(|| {
                if parent.is_none() {
                    "Presentation".to_owned()
                } else {
                    String::new()
                }
            });
        let mut frame = Frame::new(id, anchor, kind, title, parent);
        frame.rotation = attrs::parse_f64(attrs::ROTATE, node.attrs.get(attrs::ROTATE), 0.0);
        frame.delay = attrs::parse_f64(attrs::DELAY, node.attrs.get(attrs::DELAY), 1.0).max(0.0);
        self.frames.push(frame);

        let scope = self.scope_of(anchor);
        let markers: Vec<(NodeId, MarkerKind, u32)> = scope
            .iter()
            .filter_map(|&n| MarkerKind::of(self.scene, n).map(|(k, c)| (n, k, c)))
            .collect();

        let mut actions = Vec::new();
        for &n in &scope {
            let Some(raw) = self.scene.node(n).attr(attrs::ENTER_AT) else {
                continue;
            };
            if *self.scene.node(n).kind() != NodeKind::Frame {
                tracing::warn!(node = n.0, "enter-at on a node that is not a frame");
                continue;
            }
            let Some(step) = attrs::parse_steps(attrs::ENTER_AT, raw)
                .into_iter()
                .find(|s| *s >= 0)
            else {
                tracing::warn!(node = n.0, "enter-at without a usable step");
                continue;
            };
            if actions.iter().any(|(s, _)| *s == step) {
                tracing::warn!(node = n.0, step, "two frames entered at the same step");
                continue;
            }
            let child = self.build_frame(n, FrameKind::Slip, Some(id))?;
            actions.push((step, child));
        }

        let mut pause_children = Vec::new();
        let mut slot: i64 = 1;
        for &(n, mk, count) in &markers {
            let count = i64::from(count);
            match mk {
                MarkerKind::AutoEnter => {
                    let child = self.build_frame(n, FrameKind::Inline, Some(id))?;
                    pause_children.push((slot, child));
                }
                MarkerKind::ImmediateEnter => {
                    let child = self.build_frame(n, FrameKind::Inline, Some(id))?;
                    pause_children.push((slot - 1, child));
                }
                MarkerKind::Pause | MarkerKind::Step => {
                    if let Some(target) = self.unpause_entry(anchor, n) {
                        let kind = if *self.scene.node(target).kind() == NodeKind::Frame {
                            FrameKind::Slip
                        } else {
                            FrameKind::Inline
                        };
                        let child = self.build_frame(target, kind, Some(id))?;
                        pause_children.push((slot + count - 1, child));
                    }
                }
            }
            slot += count;
        }

        for &n in &scope {
            if *self.scene.node(n).kind() == NodeKind::Frame && !self.anchored.contains(&n) {
                tracing::warn!(node = n.0, "frame is never entered and will not be navigable");
            }
        }

        let schedule = StepSchedule::compile(self.scene, &scope);
        let markers: Vec<PauseMarker> = markers
            .into_iter()
            .map(|(n, k, c)| PauseMarker::compile(self.scene, &scope, n, k, c))
            .collect();

        for &n in &scope {
            let node = self.scene.node(n);
            let hidden = node.attr(attrs::CHG_VISIB_AT).is_some();
            let unstatic = node.attr(attrs::STATIC_AT).is_some();
            let state = self.scene.state_mut(n);
            if hidden {
                state.reveal = Reveal::Hidden;
            }
            if unstatic {
                state.placement = Placement::OutOfFlow;
            }
        }

        let frame = &mut self.frames[id.index()];
        for (step, child) in actions {
            frame.actions.insert(step, Effect::EnterChildFrame(child));
        }
        for (step, child) in pause_children {
            if frame.pause_children.insert(step, child).is_some() {
                tracing::warn!(step, "two pause-flow frames share a step; keeping the last");
            }
        }
        frame.schedule = schedule;
        frame.markers = markers;
        frame.update_pause_gate(self.scene);
        frame.snapshot = scope
            .iter()
            .filter(|n| !self.scene.node(**n).is_overlay())
            .map(|&n| (n, self.scene.state(n)))
            .collect();
        frame.scope = scope;

        tracing::debug!(frame = id.0, anchor = anchor.0, "frame compiled");
        Ok(id)
    }

    /// Nodes owned by the frame anchored at `anchor`: its descendants, minus the insides
    /// of nested frames. Nested frame roots themselves belong to the enclosing frame.
    fn scope_of(&self, anchor: NodeId) -> Vec<NodeId> {
        let mut referenced = Vec::new();
        let first = self.walk(anchor, &BTreeSet::new(), |n, me| {
            let node = me.scene.node(n);
            let self_entering = match MarkerKind::of(me.scene, n) {
                Some((k, _)) if k.enters_itself() => true,
                Some(_) => match node.attr(attrs::ENTER_AT_UNPAUSE) {
                    Some(raw) if raw.trim().is_empty() => true,
                    Some(raw) => {
                        referenced.extend(raw.split_whitespace().map(str::to_owned));
                        false
                    }
                    None => false,
                },
                None => false,
            };
            *node.kind() == NodeKind::Frame || self_entering
        });

        let mut boundaries: BTreeSet<NodeId> = first
            .into_iter()
            .filter_map(|(n, boundary)| boundary.then_some(n))
            .collect();
        for key in referenced {
            match self.scene.find(&key) {
                Some(n) if self.scene.is_ancestor(anchor, n) => {
                    boundaries.insert(n);
                }
                _ => tracing::warn!(id = key.as_str(), "enter-at-unpause target not found"),
            }
        }

        self.walk(anchor, &boundaries, |n, me| {
            *me.scene.node(n).kind() == NodeKind::Frame
        })
        .into_iter()
        .map(|(n, _)| n)
        .collect()
    }

    /// Pre-order walk of `anchor`'s descendants. `is_boundary` decides per node whether its
    /// subtree is skipped; nodes inside `skip` subtrees are never visited.
    fn walk(
        &self,
        anchor: NodeId,
        skip: &BTreeSet<NodeId>,
        mut is_boundary: impl FnMut(NodeId, &Self) -> bool,
    ) -> Vec<(NodeId, bool)> {
        let mut out = Vec::new();
        let end = self.scene.subtree_end(anchor);
        let mut i = anchor.0 + 1;
        while i < end {
            let n = NodeId(i);
            let boundary = skip.contains(&n) || is_boundary(n, self);
            out.push((n, boundary));
            i = if boundary {
                self.scene.subtree_end(n)
            } else {
                i + 1
            };
        }
        out
    }

    fn unpause_entry(&self, anchor: NodeId, marker: NodeId) -> Option<NodeId> {
        let raw = self.scene.node(marker).attr(attrs::ENTER_AT_UNPAUSE)?;
        let key = raw.split_whitespace().next();
        match key {
            None => Some(marker),
            Some(key) => self
                .scene
                .find(key)
                .filter(|n| self.scene.is_ancestor(anchor, *n)),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frame/tree.rs"]
mod tests;
