pub mod config;
pub mod random_forest;
pub(crate) mod tree;
