use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub(crate) const DOCUMENT_VERSION: &str = "1";

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub(crate) struct CanvasDef {
    pub(crate) width: u32,
    pub(crate) height: u32,
}

impl Default for CanvasDef {
    fn default() -> Self {
        Self {
            width: 1440,
            height: 1080,
        }
    }
}

/// `[x, y, w, h]` or `{ "x": .., "y": .., "w": .., "h": .. }` in parent-local pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub(crate) struct BoxDef {
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) w: f64,
    pub(crate) h: f64,
}

impl<'de> Deserialize<'de> for BoxDef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Arr([f64; 4]),
            Obj { x: f64, y: f64, w: f64, h: f64 },
        }

        match Repr::deserialize(deserializer)? {
            Repr::Arr([x, y, w, h]) => Ok(Self { x, y, w, h }),
            Repr::Obj { x, y, w, h } => Ok(Self { x, y, w, h }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct DocumentDef {
    pub(crate) version: String,
    #[serde(default)]
    pub(crate) canvas: CanvasDef,
    pub(crate) root: NodeDef,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct NodeDef {
    #[serde(default)]
    pub(crate) id: Option<String>,
    #[serde(default)]
    pub(crate) kind: NodeKindDef,
    #[serde(default, rename = "box")]
    pub(crate) bounds: BoxDef,
    #[serde(default)]
    pub(crate) attrs: BTreeMap<String, String>,
    /// SVG path data of annotation strokes, overlay nodes only.
    #[serde(default)]
    pub(crate) strokes: Vec<String>,
    #[serde(default)]
    pub(crate) children: Vec<NodeDef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum NodeKindDef {
    #[default]
    Block,
    Frame,
    Script {
        handler: String,
    },
    Figure {
        frames: u32,
    },
    Overlay {
        layer: OverlayLayerDef,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum OverlayLayerDef {
    Draw,
    Highlight,
}

#[cfg(test)]
#[path = "../../tests/unit/document/model.rs"]
mod tests;
