use crate::foundation::core::{FrameId, NodeId};
use crate::scene::geometry::SubMove;
use smallvec::SmallVec;

/// Camera motion requested by a step, resolved against geometry when tasks settle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraMotion {
    /// Align the element inside the current frame.
    Align(SubMove),
    /// Frame the element itself.
    Focus,
    /// Return to the frame's own placement.
    Unfocus,
}

/// Registered script invoked by a step.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScriptRef {
    /// Registry key.
    pub handler: String,
    /// Node the script belongs to.
    pub node: NodeId,
}

/// Figure state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FigureOp {
    /// One state forward.
    Next,
    /// One state back.
    Previous,
    /// Jump to a state.
    Set(u32),
}

/// Everything a step can do.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Effect {
    /// Show or hide a node.
    ToggleVisibility {
        /// Target node.
        node: NodeId,
        /// Shown when true.
        visible: bool,
    },
    /// Turn emphasis on or off.
    ToggleEmphasis {
        /// Target node.
        node: NodeId,
        /// Emphasized when true.
        emphasized: bool,
    },
    /// Move a node into or out of layout flow.
    TogglePlacement {
        /// Target node.
        node: NodeId,
        /// In flow when true.
        in_flow: bool,
    },
    /// Emphasis on at the listed steps and off at every other step.
    ExclusiveEmphasis {
        /// Target node.
        node: NodeId,
        /// Steps at which the node is emphasized.
        steps: SmallVec<[i64; 4]>,
    },
    /// Camera motion relative to a node.
    CameraSubMove {
        /// Reference node.
        node: NodeId,
        /// Requested motion.
        motion: CameraMotion,
    },
    /// Invoke a registered script.
    ScriptExec(ScriptRef),
    /// Change a figure's state.
    FigureStep {
        /// Figure node.
        node: NodeId,
        /// Change to apply.
        op: FigureOp,
    },
    /// Descend into a child frame.
    EnterChildFrame(FrameId),
}
