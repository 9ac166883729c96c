pub mod builder;
pub mod flatten;
pub mod node;
pub mod operations;
pub mod tree;
