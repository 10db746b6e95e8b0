use crate::document::attrs;
use crate::document::model::{DOCUMENT_VERSION, DocumentDef, NodeDef, NodeKindDef};
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SchemaPathElem {
    Field(&'static str),
    Index(usize),
}

#[derive(Debug, Clone)]
pub(crate) struct SchemaError {
    pub(crate) path: Vec<SchemaPathElem>,
    pub(crate) message: String,
}

impl SchemaError {
    fn at(path: &[SchemaPathElem], message: impl Into<String>) -> Self {
        Self {
            path: path.to_vec(),
            message: message.into(),
        }
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            return write!(f, "{}", self.message);
        }
        write!(f, "{}: {}", format_path(&self.path), self.message)
    }
}

fn format_path(path: &[SchemaPathElem]) -> String {
    let mut s = String::from("$");
    for p in path {
        match *p {
            SchemaPathElem::Field(name) => {
                s.push('.');
                s.push_str(name);
            }
            SchemaPathElem::Index(i) => {
                s.push('[');
                s.push_str(&i.to_string());
                s.push(']');
            }
        }
    }
    s
}

#[derive(Debug, Clone)]
pub(crate) struct SchemaErrors {
    pub(crate) errors: Vec<SchemaError>,
}

impl fmt::Display for SchemaErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaErrors {}

const MARKER_ATTRS: [&str; 4] = [
    attrs::STEP,
    attrs::AUTO_ENTER,
    attrs::IMMEDIATE_ENTER,
    attrs::PAUSE,
];

pub(crate) fn validate_document(def: &DocumentDef) -> Result<(), SchemaErrors> {
    let mut errors = Vec::new();

    if def.version != DOCUMENT_VERSION {
        errors.push(SchemaError::at(
            &[SchemaPathElem::Field("version")],
            format!("version must be \"{DOCUMENT_VERSION}\""),
        ));
    }
    if def.canvas.width == 0 || def.canvas.height == 0 {
        errors.push(SchemaError::at(
            &[SchemaPathElem::Field("canvas")],
            "canvas width/height must be > 0",
        ));
    }
    if def.root.kind != NodeKindDef::Frame {
        errors.push(SchemaError::at(
            &[SchemaPathElem::Field("root"), SchemaPathElem::Field("kind")],
            "root node must be a frame",
        ));
    }

    let mut ids = HashSet::<String>::new();
    validate_node(
        &def.root,
        &mut vec![SchemaPathElem::Field("root")],
        &mut ids,
        &mut errors,
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(SchemaErrors { errors })
    }
}

fn validate_node(
    node: &NodeDef,
    path: &mut Vec<SchemaPathElem>,
    ids: &mut HashSet<String>,
    errors: &mut Vec<SchemaError>,
) {
    if let Some(id) = &node.id {
        if id.trim().is_empty() || id.contains(char::is_whitespace) {
            errors.push(SchemaError::at(path, "node id must be a non-empty word"));
        } else if !ids.insert(id.clone()) {
            errors.push(SchemaError::at(path, format!("duplicate node id '{id}'")));
        }
    }

    let b = node.bounds;
    if ![b.x, b.y, b.w, b.h].iter().all(|v| v.is_finite()) {
        errors.push(SchemaError::at(path, "box values must be finite"));
    } else if b.w < 0.0 || b.h < 0.0 {
        errors.push(SchemaError::at(path, "box width/height must be >= 0"));
    }

    if let Some(raw) = node.attrs.get(attrs::SCALE) {
        match raw.trim().parse::<f64>() {
            Ok(v) if v.is_finite() && v > 0.0 => {}
            _ => errors.push(SchemaError::at(path, "scale must be a finite number > 0")),
        }
    }

    for name in attrs::STEP_ATTRS.iter().chain([&attrs::ENTER_AT]) {
        if let Some(raw) = node.attrs.get(*name)
            && raw
                .split_whitespace()
                .filter_map(|t| t.parse::<i64>().ok())
                .any(|v| v.unsigned_abs() > attrs::MAX_STEP.unsigned_abs())
        {
            errors.push(SchemaError::at(
                path,
                format!("{name} steps must lie within +/-{}", attrs::MAX_STEP),
            ));
        }
    }
    for name in [attrs::STEP, attrs::PAUSE] {
        if let Some(raw) = node.attrs.get(name)
            && raw
                .trim()
                .parse::<u64>()
                .is_ok_and(|n| n > attrs::MAX_STEP.unsigned_abs())
        {
            errors.push(SchemaError::at(
                path,
                format!("{name} count must be <= {}", attrs::MAX_STEP),
            ));
        }
    }

    let markers = MARKER_ATTRS
        .iter()
        .filter(|a| node.attrs.contains_key(**a))
        .count();
    if markers > 1 {
        errors.push(SchemaError::at(
            path,
            "a node carries at most one of step / auto-enter / immediate-enter / pause",
        ));
    }

    match &node.kind {
        NodeKindDef::Figure { frames } if *frames == 0 => {
            errors.push(SchemaError::at(path, "figure must declare frames > 0"));
        }
        NodeKindDef::Script { handler } if handler.trim().is_empty() => {
            errors.push(SchemaError::at(path, "script handler must be non-empty"));
        }
        NodeKindDef::Overlay { .. } if !node.children.is_empty() => {
            errors.push(SchemaError::at(path, "overlay nodes cannot have children"));
        }
        _ => {}
    }

    if !node.strokes.is_empty() {
        if !matches!(node.kind, NodeKindDef::Overlay { .. }) {
            errors.push(SchemaError::at(path, "strokes are only allowed on overlays"));
        }
        for (i, d) in node.strokes.iter().enumerate() {
            if kurbo::BezPath::from_svg(d).is_err() {
                path.push(SchemaPathElem::Field("strokes"));
                path.push(SchemaPathElem::Index(i));
                errors.push(SchemaError::at(path, "invalid SVG path data"));
                path.pop();
                path.pop();
            }
        }
    }

    for (i, child) in node.children.iter().enumerate() {
        path.push(SchemaPathElem::Field("children"));
        path.push(SchemaPathElem::Index(i));
        validate_node(child, path, ids, errors);
        path.pop();
        path.pop();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/document/validate.rs"]
mod tests;
