//! Slipway is a zooming, step-driven presentation engine.
//!
//! A presentation is a tree of nested frames laid out on one large canvas. Each frame
//! advances through numbered steps that reveal, hide or emphasize content, move the camera
//! and run scripts; stepping back replays the frame from its start. The public API is
//! session-oriented:
//!
//! - Load and validate a [`Document`]
//! - Create a [`PresentationSession`]
//! - Drive it with `next` / `previous` / `go_to_state`, and watch the camera through a
//!   [`Viewport`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod document;
pub(crate) mod engine;
pub(crate) mod fingerprint;
pub(crate) mod frame;
pub(crate) mod scene;
pub(crate) mod toc;

pub use crate::foundation::core::{
    Affine, BezPath, Canvas, FrameId, NodeId, Point, Rect, Size, Vec2,
};
pub use crate::foundation::error::{SlipwayError, SlipwayResult};

pub use crate::document::presentation::Document;
pub use crate::engine::camera::{
    CameraCommit, CameraState, NullViewport, RecordingViewport, Viewport, universe_transform,
};
pub use crate::engine::path::StepPath;
pub use crate::engine::remote::{DeepLinkStore, LinkedPort, MemoryDeepLink, RemoteControlPort};
pub use crate::engine::script::{ScriptCtx, ScriptFn, ScriptRegistry};
pub use crate::engine::session::{NavOutcome, PresentationSession, SessionOpts};
pub use crate::engine::stack::NavigationStack;
pub use crate::fingerprint::Fingerprint;
pub use crate::frame::pause::{MarkerKind, PauseState};
pub use crate::frame::slip::{CameraRecord, Frame, FrameKind};
pub use crate::frame::tree::FrameTree;
pub use crate::scene::geometry::{CameraTarget, SubMove};
pub use crate::scene::tree::{
    NodeKind, NodeState, OverlayLayer, Placement, Reveal, SceneNode, SceneTree,
};
pub use crate::toc::counter::{CounterStyle, counter_label};
pub use crate::toc::outline::{EntryStatus, TocEntry, TocFrame, table_of_contents};
