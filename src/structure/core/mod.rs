pub(crate) mod lattice;
pub(crate) mod coords;
pub(crate) mod kind;
pub(crate) mod structure;
