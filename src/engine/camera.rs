use crate::foundation::core::{Affine, Canvas, Vec2};
use crate::foundation::error::{SlipwayError, SlipwayResult};
use crate::scene::geometry::CameraTarget;
use std::cell::RefCell;
use std::rc::Rc;

/// Live camera of a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    /// Placement currently shown.
    pub target: CameraTarget,
    /// While set, commits are suppressed.
    pub locked: bool,
    /// While set, every transition takes zero seconds.
    pub fast_override: bool,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            target: CameraTarget::HOME,
            locked: false,
            fast_override: false,
        }
    }
}

/// One camera move handed to the [`Viewport`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraCommit {
    /// Placement to reach.
    pub target: CameraTarget,
    /// Transition length in seconds.
    pub duration: f64,
    /// Universe-to-screen transform for `target`.
    pub transform: Affine,
}

/// Receiver of camera commits, in commit order.
pub trait Viewport {
    /// Show `commit`. Later commits supersede earlier ones still in flight.
    fn commit(&mut self, commit: &CameraCommit) -> SlipwayResult<()>;
}

/// Viewport that only records what it was asked to show.
///
/// Clones share the same log, so a test can keep one handle and give the other to a session.
#[derive(Debug, Default, Clone)]
pub struct RecordingViewport {
    commits: Rc<RefCell<Vec<CameraCommit>>>,
}

impl RecordingViewport {
    /// Empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Commits received so far.
    pub fn commits(&self) -> Vec<CameraCommit> {
        self.commits.borrow().clone()
    }

    /// Most recent commit.
    pub fn last(&self) -> Option<CameraCommit> {
        self.commits.borrow().last().copied()
    }

    /// Forget everything recorded.
    pub fn clear(&self) {
        self.commits.borrow_mut().clear();
    }
}

impl Viewport for RecordingViewport {
    fn commit(&mut self, commit: &CameraCommit) -> SlipwayResult<()> {
        self.commits.borrow_mut().push(*commit);
        Ok(())
    }
}

/// Viewport that drops every commit; used when nobody watches.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullViewport;

impl Viewport for NullViewport {
    fn commit(&mut self, _commit: &CameraCommit) -> SlipwayResult<()> {
        Ok(())
    }
}

/// Transform placing the universe so that `target` fills a `canvas`-sized screen.
pub fn universe_transform(target: CameraTarget, canvas: Canvas) -> Affine {
    let (w, h) = (canvas.w(), canvas.h());
    Affine::translate(Vec2::new(w / 2.0, h / 2.0))
        * Affine::rotate(target.rotation.to_radians())
        * Affine::scale(1.0 / target.scale)
        * Affine::translate(Vec2::new(-target.x * w, -target.y * h))
}

pub(crate) struct Camera {
    pub(crate) state: CameraState,
    canvas: Canvas,
    viewport: Box<dyn Viewport>,
}

impl Camera {
    pub(crate) fn new(canvas: Canvas, viewport: Box<dyn Viewport>) -> Self {
        Self {
            state: CameraState::default(),
            canvas,
            viewport,
        }
    }

    pub(crate) fn set_viewport(&mut self, viewport: Box<dyn Viewport>) {
        self.viewport = viewport;
    }

    /// Show `target` unless locked. Returns whether anything was committed.
    pub(crate) fn commit(&mut self, target: CameraTarget, delay: f64) -> SlipwayResult<bool> {
        if self.state.locked {
            return Ok(false);
        }
        if !(target.scale.is_finite() && target.scale > 0.0) {
            return Err(SlipwayError::geometry(format!(
                "camera scale must be > 0, got {}",
                target.scale
            )));
        }
        let duration = if self.state.fast_override {
            0.0
        } else {
            delay.max(0.0)
        };
        self.state.target = target;
        self.viewport.commit(&CameraCommit {
            target,
            duration,
            transform: universe_transform(target, self.canvas),
        })?;
        tracing::trace!(x = target.x, y = target.y, scale = target.scale, duration, "camera commit");
        Ok(true)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/camera.rs"]
mod tests;
