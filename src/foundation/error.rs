/// Convenience result type used across slipway.
pub type SlipwayResult<T> = Result<T, SlipwayError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum SlipwayError {
    /// Invalid document data or invalid arguments to a session call.
    #[error("validation error: {0}")]
    Validation(String),

    /// Navigation request that cannot be honoured in the current state.
    #[error("navigation error: {0}")]
    Navigation(String),

    /// Geometry that cannot be turned into a camera target.
    #[error("geometry error: {0}")]
    Geometry(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// A registered script handler failed while a step was being applied.
    #[error("script '{handler}' failed: {source}")]
    Script {
        /// Name the handler was registered under.
        handler: String,
        /// Error returned by the handler.
        #[source]
        source: anyhow::Error,
    },

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SlipwayError {
    /// Build a [`SlipwayError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SlipwayError::Navigation`] value.
    pub fn navigation(msg: impl Into<String>) -> Self {
        Self::Navigation(msg.into())
    }

    /// Build a [`SlipwayError::Geometry`] value.
    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry(msg.into())
    }

    /// Build a [`SlipwayError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`SlipwayError::Script`] value.
    pub fn script(handler: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Script {
            handler: handler.into(),
            source,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
