use crate::document::model::DocumentDef;
use crate::document::validate::validate_document;
use crate::foundation::core::Canvas;
use crate::foundation::error::{SlipwayError, SlipwayResult};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Presentation document boundary object.
///
/// This is the JSON-facing, human-edited description of the frame tree. It is validated and
/// compiled into a scene and a frame tree when constructing a
/// [`crate::PresentationSession`].
#[derive(Debug, Clone)]
pub struct Document {
    def: DocumentDef,
}

impl Document {
    /// Parse a document from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> SlipwayResult<Self> {
        let def: DocumentDef = serde_json::from_reader(r)
            .map_err(|e| SlipwayError::serde(format!("parse presentation JSON: {e}")))?;
        Ok(Self { def })
    }

    /// Parse a document from a JSON string.
    pub fn from_json_str(s: &str) -> SlipwayResult<Self> {
        let def: DocumentDef = serde_json::from_str(s)
            .map_err(|e| SlipwayError::serde(format!("parse presentation JSON: {e}")))?;
        Ok(Self { def })
    }

    /// Parse a document from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> SlipwayResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            SlipwayError::validation(format!("open presentation JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Validate the document structure.
    pub fn validate(&self) -> SlipwayResult<()> {
        validate_document(&self.def)
            .map_err(|e| SlipwayError::validation(format!("document validation failed: {e}")))
    }

    /// Canvas every frame is laid out against.
    pub fn canvas(&self) -> SlipwayResult<Canvas> {
        Canvas::new(self.def.canvas.width, self.def.canvas.height)
    }

    pub(crate) fn def(&self) -> &DocumentDef {
        &self.def
    }
}
