use crate::document::attrs::{self, Targets};
use crate::foundation::core::NodeId;
use crate::frame::effect::{CameraMotion, Effect, FigureOp, ScriptRef};
use crate::scene::geometry::SubMove;
use crate::scene::tree::{NodeKind, SceneTree};
use smallvec::SmallVec;

/// Which attribute made a node a pause marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    /// `pause[=n]`: holds back the content that follows it.
    Pause,
    /// `step[=n]`: consumes steps without hiding anything.
    Step,
    /// `auto-enter`: the marker is a frame entered when it releases.
    AutoEnter,
    /// `immediate-enter`: the marker is a frame entered one step before it releases.
    ImmediateEnter,
}

impl MarkerKind {
    pub(crate) fn of(scene: &SceneTree, node: NodeId) -> Option<(Self, u32)> {
        let n = scene.node(node);
        if let Some(raw) = n.attr(attrs::STEP) {
            return Some((Self::Step, attrs::parse_count(attrs::STEP, raw)));
        }
        if n.attr(attrs::AUTO_ENTER).is_some() {
            return Some((Self::AutoEnter, 1));
        }
        if n.attr(attrs::IMMEDIATE_ENTER).is_some() {
            return Some((Self::ImmediateEnter, 1));
        }
        n.attr(attrs::PAUSE)
            .map(|raw| (Self::Pause, attrs::parse_count(attrs::PAUSE, raw)))
    }

    /// Markers whose own node becomes a child frame.
    pub(crate) fn enters_itself(self) -> bool {
        matches!(self, Self::AutoEnter | Self::ImmediateEnter)
    }
}

/// Pause automaton state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PauseState {
    /// Nothing consumed yet.
    #[default]
    Open,
    /// Partially consumed; `remaining` slots left.
    Consuming(u32),
    /// Fully consumed; on-release effects have fired.
    Released,
}

#[derive(Debug, Clone)]
pub(crate) struct PauseMarker {
    pub(crate) node: NodeId,
    pub(crate) kind: MarkerKind,
    pub(crate) count: u32,
    pub(crate) state: PauseState,
    pub(crate) on_release: SmallVec<[Effect; 2]>,
}

impl PauseMarker {
    pub(crate) fn compile(
        scene: &SceneTree,
        scope: &[NodeId],
        node: NodeId,
        kind: MarkerKind,
        count: u32,
    ) -> Self {
        let mut on_release = SmallVec::new();
        let n = scene.node(node);
        let each = |attr: &str, f: &mut dyn FnMut(NodeId)| {
            if let Some(raw) = n.attr(attr) {
                for target in resolve_targets(scene, scope, node, attr, raw) {
                    f(target);
                }
            }
        };

        each(attrs::STATIC_AT_UNPAUSE, &mut |t| {
            on_release.push(Effect::TogglePlacement { node: t, in_flow: true });
        });
        each(attrs::UNSTATIC_AT_UNPAUSE, &mut |t| {
            on_release.push(Effect::TogglePlacement { node: t, in_flow: false });
        });
        for (attr, motion) in [
            (attrs::DOWN_AT_UNPAUSE, SubMove::Down),
            (attrs::UP_AT_UNPAUSE, SubMove::Up),
            (attrs::CENTER_AT_UNPAUSE, SubMove::Center),
        ] {
            each(attr, &mut |t| {
                on_release.push(Effect::CameraSubMove {
                    node: t,
                    motion: CameraMotion::Align(motion),
                });
            });
        }
        each(attrs::EXEC_AT_UNPAUSE, &mut |t| match scene.node(t).kind() {
            NodeKind::Script { handler } => on_release.push(Effect::ScriptExec(ScriptRef {
                handler: handler.clone(),
                node: t,
            })),
            _ => tracing::warn!(node = t.0, "exec-at-unpause target is not a script"),
        });
        each(attrs::REVEAL_AT_UNPAUSE, &mut |t| {
            on_release.push(Effect::ToggleVisibility { node: t, visible: true });
        });
        each(attrs::HIDE_AT_UNPAUSE, &mut |t| {
            on_release.push(Effect::ToggleVisibility { node: t, visible: false });
        });

        if let Some(raw) = n.attr(attrs::FIGURE_SET_AT_UNPAUSE) {
            match attrs::parse_figure_set(raw)
                .and_then(|(key, step)| Some((lookup_in_scope(scene, scope, &key)?, step)))
            {
                Some((fig, step)) if is_figure(scene, fig) => on_release.push(Effect::FigureStep {
                    node: fig,
                    op: FigureOp::Set(step),
                }),
                _ => tracing::warn!(value = raw, "ignoring malformed figure-set-at-unpause"),
            }
        }
        for (attr, op) in [
            (attrs::FIGURE_NEXT_AT_UNPAUSE, FigureOp::Next),
            (attrs::FIGURE_PREVIOUS_AT_UNPAUSE, FigureOp::Previous),
        ] {
            each(attr, &mut |t| {
                if is_figure(scene, t) {
                    on_release.push(Effect::FigureStep { node: t, op });
                } else {
                    tracing::warn!(node = t.0, attr, "figure step target is not a figure");
                }
            });
        }
        each(attrs::FOCUS_AT_UNPAUSE, &mut |t| {
            on_release.push(Effect::CameraSubMove {
                node: t,
                motion: CameraMotion::Focus,
            });
        });
        each(attrs::UNFOCUS_AT_UNPAUSE, &mut |t| {
            on_release.push(Effect::CameraSubMove {
                node: t,
                motion: CameraMotion::Unfocus,
            });
        });

        Self {
            node,
            kind,
            count,
            state: PauseState::Open,
            on_release,
        }
    }

    /// Consume one slot. Returns true when this call released the marker.
    pub(crate) fn advance(&mut self) -> bool {
        let remaining = match self.state {
            PauseState::Released => return false,
            PauseState::Open => self.count,
            PauseState::Consuming(r) => r,
        };
        if remaining <= 1 {
            self.state = PauseState::Released;
            true
        } else {
            self.state = PauseState::Consuming(remaining - 1);
            false
        }
    }

    pub(crate) fn is_released(&self) -> bool {
        self.state == PauseState::Released
    }

    pub(crate) fn reset(&mut self) {
        self.state = PauseState::Open;
    }
}

fn is_figure(scene: &SceneTree, id: NodeId) -> bool {
    matches!(scene.node(id).kind(), NodeKind::Figure { .. })
}

/// Find a node by document id among the frame's own nodes.
pub(crate) fn lookup_in_scope(scene: &SceneTree, scope: &[NodeId], key: &str) -> Option<NodeId> {
    scene
        .find(key)
        .filter(|id| scope.binary_search(id).is_ok())
}

fn resolve_targets(
    scene: &SceneTree,
    scope: &[NodeId],
    marker: NodeId,
    attr: &str,
    raw: &str,
) -> SmallVec<[NodeId; 2]> {
    match attrs::parse_targets(raw) {
        Targets::Marker => smallvec::smallvec![marker],
        Targets::Ids(keys) => keys
            .iter()
            .filter_map(|k| {
                let found = lookup_in_scope(scene, scope, k);
                if found.is_none() {
                    tracing::warn!(attr, id = k.as_str(), "unpause target not found in frame");
                }
                found
            })
            .collect(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frame/pause.rs"]
mod tests;
