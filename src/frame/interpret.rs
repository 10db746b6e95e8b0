use crate::engine::script::{ScriptCtx, ScriptRegistry};
use crate::engine::tasks::{Task, TaskQueue};
use crate::foundation::core::NodeId;
use crate::foundation::error::SlipwayResult;
use crate::frame::effect::{CameraMotion, Effect, FigureOp};
use crate::frame::schedule::AttrRank;
use crate::frame::slip::Frame;
use crate::scene::tree::{NodeKind, Placement, Reveal, SceneTree};

/// Everything a frame step may touch outside the frame itself.
pub(crate) struct StepCx<'a> {
    pub(crate) scene: &'a mut SceneTree,
    pub(crate) tasks: &'a mut TaskQueue,
    pub(crate) scripts: &'a mut ScriptRegistry,
    /// Transition length of camera moves requested by effects.
    pub(crate) effect_delay: f64,
    /// Transition length of focus and unfocus moves.
    pub(crate) focus_delay: f64,
}

/// Apply the scheduled effects of the frame's current step.
pub(crate) fn do_attributes(frame: &Frame, cx: &mut StepCx<'_>) -> SlipwayResult<()> {
    let bucket = frame.schedule.at(frame.step_index);
    let split = bucket.partition_point(|(r, _)| *r < AttrRank::EmphasizeAt);
    for (_, effect) in &bucket[..split] {
        apply_effect(frame, effect, cx)?;
    }
    for effect in frame.schedule.exclusive() {
        apply_effect(frame, effect, cx)?;
    }
    for (_, effect) in &bucket[split..] {
        apply_effect(frame, effect, cx)?;
    }
    Ok(())
}

pub(crate) fn apply_effect(frame: &Frame, effect: &Effect, cx: &mut StepCx<'_>) -> SlipwayResult<()> {
    match effect {
        Effect::ToggleVisibility { node, visible } => {
            cx.scene.state_mut(*node).reveal = if *visible {
                Reveal::Shown
            } else {
                Reveal::Hidden
            };
        }
        Effect::ToggleEmphasis { node, emphasized } => {
            cx.scene.state_mut(*node).emphasized = *emphasized;
        }
        Effect::TogglePlacement { node, in_flow } => {
            cx.scene.state_mut(*node).placement = if *in_flow {
                Placement::InFlow
            } else {
                Placement::OutOfFlow
            };
        }
        Effect::ExclusiveEmphasis { node, steps } => {
            cx.scene.state_mut(*node).emphasized = steps.contains(&frame.step_index);
        }
        Effect::CameraSubMove { node, motion } => {
            let task = match *motion {
                CameraMotion::Align(motion) => Task::SubMove {
                    frame: frame.id,
                    node: *node,
                    motion,
                    delay: cx.effect_delay,
                },
                CameraMotion::Focus => Task::Focus {
                    frame: frame.id,
                    node: *node,
                    delay: cx.focus_delay,
                },
                CameraMotion::Unfocus => Task::Goto {
                    frame: frame.id,
                    delay: Some(cx.focus_delay),
                },
            };
            cx.tasks.push(task);
        }
        Effect::ScriptExec(script) => {
            let mut sctx = ScriptCtx {
                scene: &mut *cx.scene,
                tasks: &mut *cx.tasks,
                frame: frame.id,
                scope: &frame.scope,
                step: frame.step_index,
                node: script.node,
                delay: cx.effect_delay,
            };
            cx.scripts.run(script, &mut sctx)?;
        }
        Effect::FigureStep { node, op } => apply_figure_op(cx.scene, *node, *op),
        // descending is the engine's job
        Effect::EnterChildFrame(_) => {}
    }
    Ok(())
}

/// Move a figure, clamped to `[0, frames - 1]`.
pub(crate) fn apply_figure_op(scene: &mut SceneTree, node: NodeId, op: FigureOp) {
    let NodeKind::Figure { frames } = *scene.node(node).kind() else {
        return;
    };
    let last = frames.saturating_sub(1);
    let state = scene.state_mut(node);
    state.figure_step = match op {
        FigureOp::Next => state.figure_step.saturating_add(1),
        FigureOp::Previous => state.figure_step.saturating_sub(1),
        FigureOp::Set(step) => step,
    }
    .min(last);
}

#[cfg(test)]
#[path = "../../tests/unit/frame/interpret.rs"]
mod tests;
