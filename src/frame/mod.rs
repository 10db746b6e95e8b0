pub(crate) mod effect;
pub(crate) mod interpret;
pub(crate) mod pause;
pub(crate) mod schedule;
pub(crate) mod slip;
pub(crate) mod tree;
