pub(crate) mod attrs;
pub(crate) mod model;
pub(crate) mod presentation;
pub(crate) mod validate;
