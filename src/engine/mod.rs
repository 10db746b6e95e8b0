pub(crate) mod camera;
pub(crate) mod path;
pub(crate) mod remote;
pub(crate) mod script;
pub(crate) mod session;
pub(crate) mod stack;
pub(crate) mod tasks;
