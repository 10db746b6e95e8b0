use crate::foundation::core::{Affine, NodeId, Rect};
use crate::foundation::error::{SlipwayError, SlipwayResult};
use crate::scene::tree::SceneTree;

/// Camera placement in normalised canvas units: `(x, y)` is the point shown at the
/// center of the viewport, `scale` the fraction of the canvas height visible.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CameraTarget {
    /// Horizontal center, canvas widths.
    pub x: f64,
    /// Vertical center, canvas heights.
    pub y: f64,
    /// Zoom-out factor; 1 shows one full canvas.
    pub scale: f64,
    /// Rotation in degrees.
    pub rotation: f64,
}

impl CameraTarget {
    /// Home position: one canvas, unrotated.
    pub const HOME: Self = Self {
        x: 0.5,
        y: 0.5,
        scale: 1.0,
        rotation: 0.0,
    };
}

impl Default for CameraTarget {
    fn default() -> Self {
        Self::HOME
    }
}

/// Vertical alignment of an element inside its frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SubMove {
    /// Element top at the viewport top (minus margin).
    Up,
    /// Element bottom at the viewport bottom (plus margin).
    Down,
    /// Element middle at the viewport middle.
    Center,
}

impl SceneTree {
    /// Accumulated `translate(origin) * scale(s)` from the root down to `id`.
    pub fn world_transform(&self, id: NodeId) -> Affine {
        let mut chain: Vec<NodeId> = self.ancestors(id).collect();
        chain.reverse();
        chain.push(id);
        chain.into_iter().fold(Affine::IDENTITY, |acc, n| {
            let node = self.node(n);
            acc * Affine::translate(node.bounds.origin().to_vec2()) * Affine::scale(node.scale)
        })
    }

    /// Product of the scales of `id` and all its ancestors.
    pub fn accumulated_scale(&self, id: NodeId) -> f64 {
        self.ancestors(id)
            .fold(self.node(id).scale, |acc, n| acc * self.node(n).scale)
    }

    /// Bounding box of `id` in universe pixels.
    pub fn universe_rect(&self, id: NodeId) -> Rect {
        let b = self.node(id).bounds;
        self.world_transform(id)
            .transform_rect_bbox(Rect::new(0.0, 0.0, b.width(), b.height()))
    }

    /// Bounding box of `id` in the unscaled local pixels of `frame`.
    pub(crate) fn rect_in(&self, frame: NodeId, id: NodeId) -> Rect {
        let b = self.node(id).bounds;
        let local = self.world_transform(frame).inverse() * self.world_transform(id);
        local.transform_rect_bbox(Rect::new(0.0, 0.0, b.width(), b.height()))
    }

    /// Camera placement showing a declared frame: horizontally centred, top aligned.
    pub fn frame_position(&self, frame: NodeId, rotation: f64) -> CameraTarget {
        let canvas = self.canvas();
        let r = self.universe_rect(frame);
        let scale = self.accumulated_scale(frame);
        CameraTarget {
            x: r.center().x / canvas.w(),
            y: r.y0 / canvas.h() + 0.5 * scale,
            scale,
            rotation,
        }
    }

    /// Camera placement fitting one element, unrotated.
    pub fn element_framing(&self, id: NodeId) -> SlipwayResult<CameraTarget> {
        let canvas = self.canvas();
        let r = self.universe_rect(id);
        let scale = (r.width() / canvas.w()).max(r.height() / canvas.h());
        if !scale.is_finite() || scale <= 0.0 {
            return Err(SlipwayError::geometry(format!(
                "node {} has an empty box and cannot be framed",
                id.0
            )));
        }
        let c = r.center();
        Ok(CameraTarget {
            x: c.x / canvas.w(),
            y: c.y / canvas.h(),
            scale,
            rotation: 0.0,
        })
    }

    /// Shift `base` (the placement of `frame`) vertically so `id` lines up as `motion` asks.
    pub fn sub_move(
        &self,
        base: CameraTarget,
        frame: NodeId,
        id: NodeId,
        motion: SubMove,
        margin: f64,
    ) -> CameraTarget {
        let h = self.canvas().h();
        let r = self.rect_in(frame, id);
        let delta = match motion {
            SubMove::Up => r.y0 / h - margin,
            SubMove::Down => r.y1 / h - 1.0 + margin,
            SubMove::Center => (r.y0 + r.height() / 2.0) / h - 0.5,
        };
        CameraTarget {
            y: base.y + delta * base.scale,
            ..base
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/geometry.rs"]
mod tests;
