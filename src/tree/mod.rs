pub mod importance;
pub mod predict;
pub mod tree;
