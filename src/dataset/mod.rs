//! Training dataset assembly (cross join, capping, labelling).

pub mod assemble;

pub use assemble::*;
