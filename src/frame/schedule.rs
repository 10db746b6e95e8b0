use crate::document::attrs::{self, StepList};
use crate::foundation::core::NodeId;
use crate::frame::effect::{CameraMotion, Effect, FigureOp, ScriptRef};
use crate::scene::geometry::SubMove;
use crate::scene::tree::{NodeKind, SceneTree};
use smallvec::SmallVec;
use std::collections::BTreeMap;

/// Application order of per-step attributes. Effects of one step run rank by rank,
/// document order within a rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) enum AttrRank {
    MkHidden,
    MkVisible,
    MkEmphasize,
    MkUnemphasize,
    EmphasizeAt,
    ChgVisib,
    StaticAt,
    Down,
    Up,
    Center,
    Focus,
    Unfocus,
    Exec,
    FigureNext,
    FigurePrevious,
}

impl AttrRank {
    const ALL: [AttrRank; 15] = [
        AttrRank::MkHidden,
        AttrRank::MkVisible,
        AttrRank::MkEmphasize,
        AttrRank::MkUnemphasize,
        AttrRank::EmphasizeAt,
        AttrRank::ChgVisib,
        AttrRank::StaticAt,
        AttrRank::Down,
        AttrRank::Up,
        AttrRank::Center,
        AttrRank::Focus,
        AttrRank::Unfocus,
        AttrRank::Exec,
        AttrRank::FigureNext,
        AttrRank::FigurePrevious,
    ];

    fn attr(self) -> &'static str {
        attrs::STEP_ATTRS[self as usize]
    }
}

fn forward(steps: &StepList) -> impl Iterator<Item = i64> + '_ {
    steps.iter().copied().filter(|s| *s >= 0)
}

pub(crate) type Bucket = SmallVec<[(AttrRank, Effect); 2]>;

/// Per-frame map from step index to the ordered effects of that step, compiled once from
/// the attributes of the frame's scope.
#[derive(Debug, Clone, Default)]
pub(crate) struct StepSchedule {
    by_step: BTreeMap<i64, Bucket>,
    exclusive: Vec<Effect>,
    trigger_max: i64,
}

impl StepSchedule {
    pub(crate) fn compile(scene: &SceneTree, scope: &[NodeId]) -> Self {
        let mut out = Self::default();

        for &id in scope {
            if let Some(raw) = scene.node(id).attr(attrs::ENTER_AT) {
                out.note_triggers(&attrs::parse_steps(attrs::ENTER_AT, raw));
            }
        }

        for rank in AttrRank::ALL {
            let name = rank.attr();
            for &id in scope {
                let Some(raw) = scene.node(id).attr(name) else {
                    continue;
                };
                let steps = attrs::parse_steps(name, raw);
                out.note_triggers(&steps);
                out.compile_attr(scene, rank, id, steps);
            }
        }
        out
    }

    fn note_triggers(&mut self, steps: &StepList) {
        for s in steps {
            self.trigger_max = self.trigger_max.max(s.saturating_abs());
        }
    }

    fn compile_attr(&mut self, scene: &SceneTree, rank: AttrRank, node: NodeId, steps: StepList) {
        match rank {
            AttrRank::MkHidden | AttrRank::MkVisible => {
                let visible = rank == AttrRank::MkVisible;
                for s in forward(&steps) {
                    self.push(s, rank, Effect::ToggleVisibility { node, visible });
                }
            }
            AttrRank::MkEmphasize | AttrRank::MkUnemphasize => {
                let emphasized = rank == AttrRank::MkEmphasize;
                for s in forward(&steps) {
                    self.push(s, rank, Effect::ToggleEmphasis { node, emphasized });
                }
            }
            AttrRank::EmphasizeAt => {
                self.exclusive.push(Effect::ExclusiveEmphasis { node, steps });
            }
            AttrRank::ChgVisib => {
                // at any step, showing comes before hiding; `0` does both
                for s in steps.iter().copied().filter(|s| *s >= 0) {
                    self.push(s, rank, Effect::ToggleVisibility { node, visible: true });
                }
                for s in steps.iter().filter(|s| **s <= 0).map(|s| s.saturating_abs()) {
                    self.push(s, rank, Effect::ToggleVisibility { node, visible: false });
                }
            }
            AttrRank::StaticAt => {
                let unstatic: StepList = steps
                    .iter()
                    .filter(|s| **s <= 0)
                    .map(|s| s.saturating_abs())
                    .collect();
                for s in steps.iter().copied().filter(|s| *s > 0) {
                    if !unstatic.contains(&s) {
                        self.push(s, rank, Effect::TogglePlacement { node, in_flow: true });
                    }
                }
                for s in unstatic {
                    self.push(s, rank, Effect::TogglePlacement { node, in_flow: false });
                }
            }
            AttrRank::Down | AttrRank::Up | AttrRank::Center | AttrRank::Focus | AttrRank::Unfocus => {
                let motion = match rank {
                    AttrRank::Down => CameraMotion::Align(SubMove::Down),
                    AttrRank::Up => CameraMotion::Align(SubMove::Up),
                    AttrRank::Center => CameraMotion::Align(SubMove::Center),
                    AttrRank::Focus => CameraMotion::Focus,
                    _ => CameraMotion::Unfocus,
                };
                for s in forward(&steps) {
                    self.push(s, rank, Effect::CameraSubMove { node, motion });
                }
            }
            AttrRank::Exec => {
                let NodeKind::Script { handler } = scene.node(node).kind() else {
                    tracing::warn!(node = node.0, "exec-at on a node that is not a script");
                    return;
                };
                for s in forward(&steps) {
                    let script = ScriptRef {
                        handler: handler.clone(),
                        node,
                    };
                    self.push(s, rank, Effect::ScriptExec(script));
                }
            }
            AttrRank::FigureNext | AttrRank::FigurePrevious => {
                if !matches!(scene.node(node).kind(), NodeKind::Figure { .. }) {
                    tracing::warn!(node = node.0, attr = rank.attr(), "figure step on a non-figure");
                    return;
                }
                let op = if rank == AttrRank::FigureNext {
                    FigureOp::Next
                } else {
                    FigureOp::Previous
                };
                for s in forward(&steps) {
                    self.push(s, rank, Effect::FigureStep { node, op });
                }
            }
        }
    }

    fn push(&mut self, step: i64, rank: AttrRank, effect: Effect) {
        let bucket = self.by_step.entry(step).or_default();
        let at = bucket.partition_point(|(r, _)| *r <= rank);
        bucket.insert(at, (rank, effect));
    }

    /// Effects scheduled for `step`, in application order.
    pub(crate) fn at(&self, step: i64) -> &[(AttrRank, Effect)] {
        self.by_step.get(&step).map_or(&[], |b| b.as_slice())
    }

    /// Effects evaluated at every step.
    pub(crate) fn exclusive(&self) -> &[Effect] {
        &self.exclusive
    }

    /// Highest absolute step referenced by any attribute.
    pub(crate) fn trigger_max(&self) -> i64 {
        self.trigger_max
    }

    #[cfg(test)]
    pub(crate) fn effect_count(&self) -> usize {
        self.by_step.values().map(SmallVec::len).sum::<usize>() + self.exclusive.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frame/schedule.rs"]
mod tests;
