use crate::document::attrs;
use crate::document::model::{DocumentDef, NodeDef, NodeKindDef, OverlayLayerDef};
use crate::foundation::core::{BezPath, Canvas, NodeId, Rect};
use crate::foundation::error::{SlipwayError, SlipwayResult};
use std::collections::{BTreeMap, HashMap};

/// What a scene node is, as far as navigation cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Plain content.
    Block,
    /// Declared navigable frame.
    Frame,
    /// Reference to a handler in the script registry.
    Script {
        /// Registry key.
        handler: String,
    },
    /// Multi-step figure, `frames` states wide.
    Figure {
        /// Number of figure states.
        frames: u32,
    },
    /// Long-lived annotation layer.
    Overlay(OverlayLayer),
}

/// Annotation layer kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayLayer {
    /// Freehand drawing.
    Draw,
    /// Highlighter strokes.
    Highlight,
}

/// Explicit visibility toggle applied by steps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Reveal {
    /// Untouched.
    #[default]
    Default,
    /// Revealed.
    Shown,
    /// Hidden.
    Hidden,
}

/// Whether a node takes part in layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Placement {
    /// Laid out normally.
    #[default]
    InFlow,
    /// Removed from layout and not displayed.
    OutOfFlow,
}

/// Mutable visual state of one node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NodeState {
    /// Visibility toggle.
    pub reveal: Reveal,
    /// Emphasis toggle.
    pub emphasized: bool,
    /// Layout participation.
    pub placement: Placement,
    /// Current state of a figure node.
    pub figure_step: u32,
    /// Held back by an unreleased pause marker.
    pub paused: bool,
}

/// One node of the render tree.
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub(crate) key: Option<String>,
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) subtree_end: u32,
    pub(crate) bounds: Rect,
    pub(crate) scale: f64,
    pub(crate) attrs: BTreeMap<String, String>,
    pub(crate) state: NodeState,
    pub(crate) strokes: Vec<BezPath>,
}

impl SceneNode {
    /// Document id, if any.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Node kind.
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Parent node; `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Direct children in document order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Box in parent-local pixels.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Own scale factor (1 unless the node is a scaled frame).
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Raw attribute value.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Current visual state.
    pub fn state(&self) -> NodeState {
        self.state
    }

    /// Annotation strokes (overlay nodes only).
    pub fn strokes(&self) -> &[BezPath] {
        &self.strokes
    }

    pub(crate) fn is_overlay(&self) -> bool {
        matches!(self.kind, NodeKind::Overlay(_))
    }
}

/// Arena render tree. Node ids are pre-order indices, so a subtree is the contiguous id
/// range `id..subtree_end`.
#[derive(Debug, Clone)]
pub struct SceneTree {
    canvas: Canvas,
    nodes: Vec<SceneNode>,
    by_key: HashMap<String, NodeId>,
}

impl SceneTree {
    pub(crate) fn from_document(def: &DocumentDef) -> SlipwayResult<Self> {
        let canvas = Canvas::new(def.canvas.width, def.canvas.height)?;
        let mut tree = Self {
            canvas,
            nodes: Vec::new(),
            by_key: HashMap::new(),
        };
        tree.push_node(&def.root, None)?;
        Ok(tree)
    }

    fn push_node(&mut self, def: &NodeDef, parent: Option<NodeId>) -> SlipwayResult<NodeId> {
        let id = NodeId(self.nodes.len() as u32);
        let kind = match &def.kind {
            NodeKindDef::Block => NodeKind::Block,
            NodeKindDef::Frame => NodeKind::Frame,
            NodeKindDef::Script { handler } => NodeKind::Script {
                handler: handler.clone(),
            },
            NodeKindDef::Figure { frames } => NodeKind::Figure { frames: *frames },
            NodeKindDef::Overlay { layer } => NodeKind::Overlay(match layer {
                OverlayLayerDef::Draw => OverlayLayer::Draw,
                OverlayLayerDef::Highlight => OverlayLayer::Highlight,
            }),
        };

        let b = def.bounds;
        let (mut w, mut h) = (b.w, b.h);
        let mut scale = 1.0;
        if kind == NodeKind::Frame {
            if w == 0.0 {
                w = self.canvas.w();
            }
            if h == 0.0 {
                h = self.canvas.h();
            }
            scale = attrs::parse_f64(attrs::SCALE, def.attrs.get(attrs::SCALE), 1.0);
        }

        let mut strokes = Vec::with_capacity(def.strokes.len());
        for d in &def.strokes {
            let path = BezPath::from_svg(d)
                .map_err(|e| SlipwayError::validation(format!("overlay stroke: {e}")))?;
            strokes.push(path);
        }

        if let Some(key) = &def.id {
            if self.by_key.insert(key.clone(), id).is_some() {
                return Err(SlipwayError::validation(format!("duplicate node id '{key}'")));
            }
        }

        self.nodes.push(SceneNode {
            key: def.id.clone(),
            kind,
            parent,
            children: Vec::with_capacity(def.children.len()),
            subtree_end: id.0 + 1,
            bounds: Rect::new(b.x, b.y, b.x + w, b.y + h),
            scale,
            attrs: def.attrs.clone(),
            state: NodeState::default(),
            strokes,
        });

        for child in &def.children {
            let cid = self.push_node(child, Some(id))?;
            self.nodes[id.index()].children.push(cid);
        }
        self.nodes[id.index()].subtree_end = self.nodes.len() as u32;
        Ok(id)
    }

    /// Canvas the tree is laid out against.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false for a built tree; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The document root.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Node by id.
    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.index())
    }

    pub(crate) fn node(&self, id: NodeId) -> &SceneNode {
        &self.nodes[id.index()]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut SceneNode {
        &mut self.nodes[id.index()]
    }

    /// Look up a node by document id.
    pub fn find(&self, key: &str) -> Option<NodeId> {
        self.by_key.get(key).copied()
    }

    /// Look up a node by document id, failing with a validation error.
    pub fn require(&self, key: &str) -> SlipwayResult<NodeId> {
        self.find(key)
            .ok_or_else(|| SlipwayError::validation(format!("unknown node id '{key}'")))
    }

    /// Current state of a node.
    pub fn state(&self, id: NodeId) -> NodeState {
        self.node(id).state
    }

    pub(crate) fn state_mut(&mut self, id: NodeId) -> &mut NodeState {
        &mut self.node_mut(id).state
    }

    /// True when `a` is a strict ancestor of `b`.
    pub fn is_ancestor(&self, a: NodeId, b: NodeId) -> bool {
        a.0 < b.0 && b.0 < self.node(a).subtree_end
    }

    /// Strict descendants in pre-order.
    #[cfg(test)]
    pub(crate) fn descendants(&self, id: NodeId) -> impl Iterator<Item = NodeId> + use<> {
        (id.0 + 1..self.node(id).subtree_end).map(NodeId)
    }

    /// One past the last id of `id`'s subtree.
    pub(crate) fn subtree_end(&self, id: NodeId) -> u32 {
        self.node(id).subtree_end
    }

    /// Strict ancestors, nearest first.
    pub(crate) fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.node(id).parent,
        }
    }

    /// Effective visibility: the node and all of its ancestors are shown, in flow and not
    /// held back by a pause.
    pub fn is_visible(&self, id: NodeId) -> bool {
        let shown = |n: NodeId| {
            let s = self.node(n).state;
            s.reveal != Reveal::Hidden && s.placement == Placement::InFlow && !s.paused
        };
        shown(id) && self.ancestors(id).all(shown)
    }

    /// Overlay nodes in document order.
    pub fn overlays(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_overlay())
            .map(|(i, _)| NodeId(i as u32))
    }

    pub(crate) fn push_stroke(&mut self, id: NodeId, stroke: BezPath) -> SlipwayResult<()> {
        let node = self.node_mut(id);
        if !node.is_overlay() {
            return Err(SlipwayError::validation("strokes can only be added to overlays"));
        }
        node.strokes.push(stroke);
        Ok(())
    }
}

pub(crate) struct Ancestors<'a> {
    tree: &'a SceneTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let cur = self.next?;
        self.next = self.tree.node(cur).parent;
        Some(cur)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/tree.rs"]
mod tests;
